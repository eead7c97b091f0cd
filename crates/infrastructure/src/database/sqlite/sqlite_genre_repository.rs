use async_trait::async_trait;
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tasktrack_domain::{
    entities::{Genre, NewGenre},
    repositories::GenreRepository,
};
use tasktrack_errors::{TrackerError, TrackerResult};
use tracing::{debug, instrument};

use crate::{error_handling::RepositoryErrorHelpers, repo_context};

pub struct SqliteGenreRepository {
    pool: SqlitePool,
}

impl SqliteGenreRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_genre(row: &SqliteRow) -> TrackerResult<Genre> {
        Ok(Genre {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[async_trait]
impl GenreRepository for SqliteGenreRepository {
    #[instrument(skip(self, genre), fields(genre_name = %genre.name))]
    async fn create(&self, genre: &NewGenre) -> TrackerResult<Genre> {
        let context = repo_context!(Create, Genre, name = &genre.name);

        let row = sqlx::query(
            r#"
            INSERT INTO genres (name, created_at, updated_at)
            VALUES (?1, ?2, ?2)
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(&genre.name)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryErrorHelpers::database_error(&context, e))?;

        let created = Self::row_to_genre(&row)?;
        RepositoryErrorHelpers::log_operation_success(
            &context.with_id(created.id),
            &created.name,
        );
        Ok(created)
    }

    #[instrument(skip(self), fields(genre_id = %id))]
    async fn find_by_id(&self, id: i64) -> TrackerResult<Option<Genre>> {
        let context = repo_context!(Read, Genre, id = id);

        let row = sqlx::query("SELECT id, name, created_at, updated_at FROM genres WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryErrorHelpers::database_error(&context, e))?;

        row.as_ref().map(Self::row_to_genre).transpose()
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> TrackerResult<Vec<Genre>> {
        let context = repo_context!(Read, Genre);

        let rows = sqlx::query("SELECT id, name, created_at, updated_at FROM genres ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryErrorHelpers::database_error(&context, e))?;

        let genres = rows
            .iter()
            .map(Self::row_to_genre)
            .collect::<TrackerResult<Vec<_>>>()?;
        debug!("查询到 {} 个分类", genres.len());
        Ok(genres)
    }

    #[instrument(skip(self, genre), fields(genre_id = %genre.id, genre_name = %genre.name))]
    async fn update(&self, genre: &Genre) -> TrackerResult<Genre> {
        let context = repo_context!(Update, Genre, id = genre.id, name = &genre.name);

        let row = sqlx::query(
            r#"
            UPDATE genres SET name = ?1, updated_at = ?2
            WHERE id = ?3
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(&genre.name)
        .bind(Utc::now())
        .bind(genre.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryErrorHelpers::database_error(&context, e))?;

        match row {
            Some(row) => {
                let updated = Self::row_to_genre(&row)?;
                RepositoryErrorHelpers::log_operation_success(&context, &updated.name);
                Ok(updated)
            }
            None => Err(TrackerError::genre_not_found(genre.id)),
        }
    }

    /// 仍被任务引用时数据库返回外键错误，由服务层转换为冲突
    #[instrument(skip(self), fields(genre_id = %id))]
    async fn delete(&self, id: i64) -> TrackerResult<bool> {
        let context = repo_context!(Delete, Genre, id = id);

        let result = sqlx::query("DELETE FROM genres WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryErrorHelpers::database_error(&context, e))?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), fields(genre_id = %id))]
    async fn exists(&self, id: i64) -> TrackerResult<bool> {
        let context = repo_context!(Read, Genre, id = id);

        let found: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM genres WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryErrorHelpers::database_error(&context, e))?;

        Ok(found.is_some())
    }
}
