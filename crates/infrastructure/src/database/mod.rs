pub mod sqlite;

pub use sqlite::{SqliteGenreRepository, SqliteTaskRepository};

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use tasktrack_config::DatabaseConfig;
use tracing::{debug, info};

/// 表结构，按依赖顺序创建 (tasks 引用 genres)
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS genres (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tasks (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL DEFAULT '',
        explanation TEXT,
        status INTEGER NOT NULL DEFAULT 0 CHECK (status IN (0, 1, 2)),
        priority INTEGER NOT NULL DEFAULT 1 CHECK (priority IN (0, 1, 2)),
        genre_id INTEGER NOT NULL,
        deadline_date TEXT,
        created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
        FOREIGN KEY (genre_id) REFERENCES genres(id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_tasks_status ON tasks(status)",
    "CREATE INDEX IF NOT EXISTS idx_tasks_genre_id ON tasks(genre_id)",
];

pub struct DatabaseManager {
    pool: SqlitePool,
}

impl DatabaseManager {
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        config.validate()?;

        // 外键约束必须按连接开启，否则分类引用检查不会生效
        let connect_options = SqliteConnectOptions::from_str(&config.url)
            .with_context(|| format!("解析数据库URL失败: {}", config.url))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = if config.is_in_memory() {
            // 每个内存库连接都是独立数据库，只能保留一个常驻连接
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds))
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(connect_options)
                .await
        } else {
            SqlitePoolOptions::new()
                .max_connections(config.max_connections)
                .min_connections(config.min_connections)
                .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds))
                .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
                .max_lifetime(Duration::from_secs(1800)) // 30分钟默认生命周期
                .connect_with(connect_options.journal_mode(SqliteJournalMode::Wal))
                .await
        }
        .context("创建数据库连接池失败")?;

        info!("数据库连接池创建完成: {}", config.url);
        Ok(Self { pool })
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// 运行数据库迁移，可重复执行
    pub async fn migrate(&self) -> Result<()> {
        debug!("运行SQLite数据库迁移");
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .with_context(|| format!("执行迁移语句失败: {}", statement.trim()))?;
        }
        info!("数据库迁移完成");
        Ok(())
    }

    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
