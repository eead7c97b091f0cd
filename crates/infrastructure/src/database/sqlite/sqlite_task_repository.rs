use async_trait::async_trait;
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tasktrack_domain::{
    entities::{NewTask, Task, TaskStatus},
    repositories::TaskRepository,
};
use tasktrack_errors::{TrackerError, TrackerResult};
use tracing::{debug, instrument};

use crate::{error_handling::RepositoryErrorHelpers, repo_context};

const TASK_COLUMNS: &str =
    "id, name, explanation, status, priority, genre_id, deadline_date, created_at, updated_at";

pub struct SqliteTaskRepository {
    pool: SqlitePool,
}

impl SqliteTaskRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_task(row: &SqliteRow) -> TrackerResult<Task> {
        Ok(Task {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            explanation: row.try_get("explanation")?,
            status: row.try_get("status")?,
            priority: row.try_get("priority")?,
            genre_id: row.try_get("genre_id")?,
            deadline_date: row.try_get("deadline_date")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    #[instrument(skip(self, task), fields(
        task_name = %task.name,
        genre_id = %task.genre_id,
    ))]
    async fn create(&self, task: &NewTask) -> TrackerResult<Task> {
        let context = repo_context!(Create, Task, name = &task.name);
        let now = Utc::now();

        let sql = format!(
            r#"
            INSERT INTO tasks (name, explanation, status, priority, genre_id, deadline_date, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
            RETURNING {TASK_COLUMNS}
            "#
        );
        let row = sqlx::query(&sql)
            .bind(&task.name)
            .bind(&task.explanation)
            .bind(task.status)
            .bind(task.priority)
            .bind(task.genre_id)
            .bind(task.deadline_date)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryErrorHelpers::database_error(&context, e))?;

        let created = Self::row_to_task(&row)?;
        RepositoryErrorHelpers::log_operation_success(
            &context.with_id(created.id),
            &created.entity_description(),
        );
        Ok(created)
    }

    #[instrument(skip(self), fields(task_id = %id))]
    async fn find_by_id(&self, id: i64) -> TrackerResult<Option<Task>> {
        let context = repo_context!(Read, Task, id = id);

        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryErrorHelpers::database_error(&context, e))?;

        match row {
            Some(row) => Ok(Some(Self::row_to_task(&row)?)),
            None => {
                debug!("任务不存在: ID {}", id);
                Ok(None)
            }
        }
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> TrackerResult<Vec<Task>> {
        let context = repo_context!(Read, Task);

        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY id");
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryErrorHelpers::database_error(&context, e))?;

        let tasks = rows
            .iter()
            .map(Self::row_to_task)
            .collect::<TrackerResult<Vec<_>>>()?;
        debug!("查询到 {} 个任务", tasks.len());
        Ok(tasks)
    }

    #[instrument(skip(self, task), fields(
        task_id = %task.id,
        task_name = %task.name,
    ))]
    async fn update(&self, task: &Task) -> TrackerResult<Task> {
        let context = repo_context!(Update, Task, id = task.id, name = &task.name);

        let sql = format!(
            r#"
            UPDATE tasks
            SET name = ?1, explanation = ?2, status = ?3, priority = ?4,
                genre_id = ?5, deadline_date = ?6, updated_at = ?7
            WHERE id = ?8
            RETURNING {TASK_COLUMNS}
            "#
        );
        let row = sqlx::query(&sql)
            .bind(&task.name)
            .bind(&task.explanation)
            .bind(task.status)
            .bind(task.priority)
            .bind(task.genre_id)
            .bind(task.deadline_date)
            .bind(Utc::now())
            .bind(task.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryErrorHelpers::database_error(&context, e))?;

        let updated = match row {
            Some(row) => Self::row_to_task(&row)?,
            None => return Err(TrackerError::task_not_found(task.id)),
        };
        RepositoryErrorHelpers::log_operation_success(&context, &updated.entity_description());
        Ok(updated)
    }

    #[instrument(skip(self), fields(task_id = %id))]
    async fn delete(&self, id: i64) -> TrackerResult<bool> {
        let context = repo_context!(Delete, Task, id = id);

        let result = sqlx::query("DELETE FROM tasks WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryErrorHelpers::database_error(&context, e))?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            RepositoryErrorHelpers::log_operation_success(&context, &context.entity_description());
        }
        Ok(deleted)
    }

    #[instrument(skip(self))]
    async fn count_by_status(&self) -> TrackerResult<Vec<(TaskStatus, i64)>> {
        let context = repo_context!(Query, Task);

        let rows = sqlx::query("SELECT status, COUNT(*) AS count FROM tasks GROUP BY status")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryErrorHelpers::database_error(&context, e))?;

        rows.iter()
            .map(|row| -> TrackerResult<(TaskStatus, i64)> {
                Ok((row.try_get("status")?, row.try_get("count")?))
            })
            .collect()
    }
}
