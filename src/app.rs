use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use tasktrack_api::{create_app, AppState};
use tasktrack_config::AppConfig;
use tasktrack_infrastructure::database::{
    DatabaseManager, SqliteGenreRepository, SqliteTaskRepository,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

use crate::shutdown::ShutdownManager;

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// 应用实例：数据库连接池加上 HTTP 路由
pub struct Application {
    config: AppConfig,
    database: DatabaseManager,
    router: Router,
}

impl Application {
    /// 连接数据库并执行迁移
    pub async fn new(config: AppConfig) -> Result<Self> {
        config.validate().context("配置验证失败")?;

        info!("连接数据库: {}", mask_database_url(&config.database.url));
        let database = DatabaseManager::new(&config.database)
            .await
            .context("创建数据库连接池失败")?;
        database.migrate().await.context("运行数据库迁移失败")?;

        let pool = database.pool().clone();
        let state = AppState::new(
            Arc::new(SqliteTaskRepository::new(pool.clone())),
            Arc::new(SqliteGenreRepository::new(pool)),
        );
        let router = create_app(state, &config.api);

        Ok(Self {
            config,
            database,
            router,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub async fn bind(&self) -> Result<TcpListener> {
        let address = &self.config.api.bind_address;
        TcpListener::bind(address)
            .await
            .with_context(|| format!("绑定地址失败: {address}"))
    }

    pub async fn run(self, shutdown_rx: broadcast::Receiver<()>) -> Result<()> {
        let listener = self.bind().await?;
        self.serve(listener, shutdown_rx).await
    }

    /// 运行直到 `shutdown_signal` 完成后优雅关闭；服务器提前失败时返回其错误
    pub async fn run_until_shutdown<S>(self, shutdown_signal: S) -> Result<()>
    where
        S: Future<Output = ()>,
    {
        let shutdown_manager = ShutdownManager::new();
        let shutdown_rx = shutdown_manager.subscribe().await;
        let mut app_handle = tokio::spawn(self.run(shutdown_rx));

        tokio::select! {
            result = &mut app_handle => {
                return match result {
                    Ok(Ok(())) => {
                        warn!("应用在收到关闭信号前退出");
                        Ok(())
                    }
                    Ok(Err(e)) => Err(e.context("应用运行失败")),
                    Err(e) => Err(anyhow::Error::new(e).context("应用任务异常终止")),
                };
            }
            _ = shutdown_signal => {}
        }

        info!("收到关闭信号，开始优雅关闭...");
        shutdown_manager.shutdown().await;

        // 等待应用关闭，设置超时
        match tokio::time::timeout(SHUTDOWN_TIMEOUT, app_handle).await {
            Ok(Ok(Ok(()))) => info!("应用已优雅关闭"),
            Ok(Ok(Err(e))) => return Err(e.context("应用关闭时发生错误")),
            Ok(Err(e)) => error!("应用任务异常终止: {e}"),
            Err(_) => warn!("应用关闭超时，强制退出"),
        }
        Ok(())
    }

    /// 在给定监听器上提供服务，收到关闭信号后停止接受新连接并关闭连接池
    pub async fn serve(
        self,
        listener: TcpListener,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<()> {
        let address: SocketAddr = listener.local_addr().context("获取监听地址失败")?;
        info!("API服务器启动在 http://{address}");

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
                info!("API服务器收到关闭信号");
            })
            .await
            .context("API服务器运行失败")?;

        self.database.close().await;
        info!("API服务器已停止");
        Ok(())
    }
}

/// 隐藏 URL 中的查询参数
fn mask_database_url(url: &str) -> String {
    match url.split_once('?') {
        Some((path, _)) => format!("{path}?***"),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_database_url() {
        assert_eq!(mask_database_url("sqlite:tasks.db"), "sqlite:tasks.db");
        assert_eq!(
            mask_database_url("sqlite:tasks.db?mode=rwc"),
            "sqlite:tasks.db?***"
        );
    }
}
