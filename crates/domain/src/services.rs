//! # 领域服务模块
//!
//! 任务与分类的业务操作。期望内的失败（校验不通过、引用的分类不存在）
//! 以 [`ServiceResult::Failure`] 返回；数据库故障与记录不存在以
//! [`TrackerError`] 返回。

use std::sync::Arc;

use tasktrack_errors::{TrackerError, TrackerResult};
use tracing::{debug, info};

use crate::entities::{Genre, NewGenre, NewTask, Task};
use crate::repositories::{GenreRepository, TaskRepository};
use crate::service_result::ServiceResult;
use crate::validation::ValidationErrors;
use crate::value_objects::{EnumInput, TaskChanges, TaskFields};

fn missing_genre() -> ValidationErrors {
    ValidationErrors::single("genre", "must exist")
}

#[derive(Clone)]
pub struct TaskService {
    tasks: Arc<dyn TaskRepository>,
    genres: Arc<dyn GenreRepository>,
}

impl TaskService {
    pub fn new(tasks: Arc<dyn TaskRepository>, genres: Arc<dyn GenreRepository>) -> Self {
        Self { tasks, genres }
    }

    pub async fn list_tasks(&self) -> TrackerResult<Vec<Task>> {
        self.tasks.find_all().await
    }

    /// 按ID查找，不存在时返回 TaskNotFound
    pub async fn find_task(&self, id: i64) -> TrackerResult<Task> {
        self.tasks
            .find_by_id(id)
            .await?
            .ok_or_else(|| TrackerError::task_not_found(id))
    }

    pub async fn create_task(&self, fields: TaskFields) -> TrackerResult<ServiceResult<Task>> {
        let new_task = match fields.normalize() {
            Ok(task) => task,
            Err(errors) => return Ok(ServiceResult::failure(errors)),
        };
        let result = self.save(&new_task).await?;
        if let ServiceResult::Success(task) = &result {
            info!(task_id = task.id, genre_id = task.genre_id, "任务创建成功");
        }
        Ok(result)
    }

    pub async fn duplicate_task(&self, task: &Task) -> TrackerResult<ServiceResult<Task>> {
        let copy = task.duplicate();
        let result = self.save(&copy).await?;
        if let ServiceResult::Success(created) = &result {
            info!(source_id = task.id, task_id = created.id, "任务复制成功");
        }
        Ok(result)
    }

    pub async fn update_task(
        &self,
        id: i64,
        changes: TaskChanges,
    ) -> TrackerResult<ServiceResult<Task>> {
        let task = self.find_task(id).await?;
        let genre_changed = changes.genre_id.is_change();

        let updated = match changes.apply_to(&task) {
            Ok(updated) => updated,
            Err(errors) => return Ok(ServiceResult::failure(errors)),
        };
        if genre_changed && !self.genres.exists(updated.genre_id).await? {
            return Ok(ServiceResult::failure(missing_genre()));
        }

        match self.tasks.update(&updated).await {
            Ok(task) => {
                debug!(task_id = task.id, "任务已更新");
                Ok(ServiceResult::success(task))
            }
            Err(e) if e.is_foreign_key_violation() => Ok(ServiceResult::failure(missing_genre())),
            Err(e) => Err(e),
        }
    }

    pub async fn update_status(
        &self,
        id: i64,
        status: EnumInput,
    ) -> TrackerResult<ServiceResult<Task>> {
        self.update_task(id, TaskChanges::status_only(status)).await
    }

    pub async fn delete_task(&self, id: i64) -> TrackerResult<()> {
        if !self.tasks.delete(id).await? {
            return Err(TrackerError::task_not_found(id));
        }
        info!(task_id = id, "任务已删除");
        Ok(())
    }

    async fn save(&self, task: &NewTask) -> TrackerResult<ServiceResult<Task>> {
        if !self.genres.exists(task.genre_id).await? {
            return Ok(ServiceResult::failure(missing_genre()));
        }
        match self.tasks.create(task).await {
            Ok(task) => Ok(ServiceResult::success(task)),
            // 检查与写入之间分类被删除时由外键兜底
            Err(e) if e.is_foreign_key_violation() => Ok(ServiceResult::failure(missing_genre())),
            Err(e) => Err(e),
        }
    }
}

#[derive(Clone)]
pub struct GenreService {
    genres: Arc<dyn GenreRepository>,
}

impl GenreService {
    pub fn new(genres: Arc<dyn GenreRepository>) -> Self {
        Self { genres }
    }

    pub async fn list_genres(&self) -> TrackerResult<Vec<Genre>> {
        self.genres.find_all().await
    }

    pub async fn find_genre(&self, id: i64) -> TrackerResult<Genre> {
        self.genres
            .find_by_id(id)
            .await?
            .ok_or_else(|| TrackerError::genre_not_found(id))
    }

    pub async fn create_genre(&self, name: Option<String>) -> TrackerResult<ServiceResult<Genre>> {
        let name = match validate_genre_name(name) {
            Ok(name) => name,
            Err(errors) => return Ok(ServiceResult::failure(errors)),
        };
        let genre = self.genres.create(&NewGenre { name }).await?;
        info!(genre_id = genre.id, "分类创建成功");
        Ok(ServiceResult::success(genre))
    }

    pub async fn rename_genre(
        &self,
        id: i64,
        name: Option<String>,
    ) -> TrackerResult<ServiceResult<Genre>> {
        let mut genre = self.find_genre(id).await?;
        genre.name = match validate_genre_name(name) {
            Ok(name) => name,
            Err(errors) => return Ok(ServiceResult::failure(errors)),
        };
        let genre = self.genres.update(&genre).await?;
        Ok(ServiceResult::success(genre))
    }

    pub async fn delete_genre(&self, id: i64) -> TrackerResult<()> {
        match self.genres.delete(id).await {
            Ok(true) => {
                info!(genre_id = id, "分类已删除");
                Ok(())
            }
            Ok(false) => Err(TrackerError::genre_not_found(id)),
            Err(e) if e.is_foreign_key_violation() => Err(TrackerError::genre_in_use(id)),
            Err(e) => Err(e),
        }
    }
}

fn validate_genre_name(name: Option<String>) -> Result<String, ValidationErrors> {
    match name {
        Some(name) if !name.trim().is_empty() => Ok(name),
        _ => Err(ValidationErrors::single("name", "can't be blank")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{TaskPriority, TaskStatus};
    use crate::repositories::{MockGenreRepository, MockTaskRepository};
    use chrono::{NaiveDate, Utc};
    use mockall::predicate::eq;

    fn persisted(id: i64, new_task: &NewTask) -> Task {
        let now = Utc::now();
        Task {
            id,
            name: new_task.name.clone(),
            explanation: new_task.explanation.clone(),
            status: new_task.status,
            priority: new_task.priority,
            genre_id: new_task.genre_id,
            deadline_date: new_task.deadline_date,
            created_at: now,
            updated_at: now,
        }
    }

    fn stored_task() -> Task {
        let mut new_task = NewTask::new("元タスク", 1);
        new_task.status = TaskStatus::Completed;
        new_task.priority = TaskPriority::Low;
        new_task.explanation = Some("説明".to_string());
        new_task.deadline_date = NaiveDate::from_ymd_opt(2025, 5, 1);
        persisted(1, &new_task)
    }

    fn genre_exists(exists: bool) -> MockGenreRepository {
        let mut genres = MockGenreRepository::new();
        genres.expect_exists().returning(move |_| Ok(exists));
        genres
    }

    fn service(tasks: MockTaskRepository, genres: MockGenreRepository) -> TaskService {
        TaskService::new(Arc::new(tasks), Arc::new(genres))
    }

    #[tokio::test]
    async fn test_create_task_success_applies_defaults() {
        let mut tasks = MockTaskRepository::new();
        tasks
            .expect_create()
            .withf(|t: &NewTask| {
                t.name == "タスク"
                    && t.status == TaskStatus::NotStarted
                    && t.priority == TaskPriority::Medium
                    && t.genre_id == 1
            })
            .times(1)
            .returning(|t| Ok(persisted(5, t)));

        let fields = TaskFields {
            name: Some("タスク".to_string()),
            genre_id: Some(1),
            ..TaskFields::default()
        };
        let result = service(tasks, genre_exists(true))
            .create_task(fields)
            .await
            .unwrap();

        assert!(result.is_success());
        assert_eq!(result.value().unwrap().id, 5);
    }

    #[tokio::test]
    async fn test_create_task_without_genre_fails_without_touching_store() {
        let mut tasks = MockTaskRepository::new();
        tasks.expect_create().never();
        let mut genres = MockGenreRepository::new();
        genres.expect_exists().never();

        let fields = TaskFields {
            name: Some("タスク".to_string()),
            ..TaskFields::default()
        };
        let result = service(tasks, genres).create_task(fields).await.unwrap();

        assert!(result.is_failure());
        assert!(result.errors().unwrap().contains("genre"));
    }

    #[tokio::test]
    async fn test_create_task_with_unknown_genre_fails() {
        let mut tasks = MockTaskRepository::new();
        tasks.expect_create().never();

        let fields = TaskFields {
            genre_id: Some(999),
            ..TaskFields::default()
        };
        let result = service(tasks, genre_exists(false))
            .create_task(fields)
            .await
            .unwrap();

        assert_eq!(
            result.errors().unwrap().get("genre"),
            Some(&["must exist".to_string()][..])
        );
    }

    #[tokio::test]
    async fn test_duplicate_task_persists_transformed_copy() {
        let original = stored_task();
        let mut tasks = MockTaskRepository::new();
        tasks
            .expect_create()
            .withf(|t: &NewTask| {
                t.name == "元タスク(コピー)"
                    && t.status == TaskStatus::NotStarted
                    && t.deadline_date.is_none()
                    && t.priority == TaskPriority::Low
                    && t.explanation.as_deref() == Some("説明")
            })
            .times(1)
            .returning(|t| Ok(persisted(2, t)));

        let result = service(tasks, genre_exists(true))
            .duplicate_task(&original)
            .await
            .unwrap();

        let copy = result.value().unwrap();
        assert_ne!(copy.id, original.id);
        assert_eq!(copy.genre_id, original.genre_id);
        assert_eq!(original.name, "元タスク");
        assert_eq!(original.status, TaskStatus::Completed);
    }

    #[tokio::test]
    async fn test_duplicate_task_with_dangling_genre_fails() {
        let mut tasks = MockTaskRepository::new();
        tasks.expect_create().never();

        let result = service(tasks, genre_exists(false))
            .duplicate_task(&stored_task())
            .await
            .unwrap();

        assert!(result.is_failure());
    }

    #[tokio::test]
    async fn test_create_task_propagates_store_errors() {
        let mut tasks = MockTaskRepository::new();
        tasks
            .expect_create()
            .returning(|_| Err(TrackerError::internal("disk full")));

        let fields = TaskFields {
            genre_id: Some(1),
            ..TaskFields::default()
        };
        let result = service(tasks, genre_exists(true)).create_task(fields).await;

        assert!(matches!(result, Err(TrackerError::Internal(_))));
    }

    #[tokio::test]
    async fn test_find_task_not_found() {
        let mut tasks = MockTaskRepository::new();
        tasks.expect_find_by_id().with(eq(42)).returning(|_| Ok(None));

        let err = service(tasks, MockGenreRepository::new())
            .find_task(42)
            .await
            .unwrap_err();

        assert!(matches!(err, TrackerError::TaskNotFound { id: 42 }));
    }

    #[tokio::test]
    async fn test_update_status_only_changes_status() {
        let original = stored_task();
        let lookup = original.clone();
        let mut tasks = MockTaskRepository::new();
        tasks
            .expect_find_by_id()
            .with(eq(1))
            .returning(move |_| Ok(Some(lookup.clone())));
        tasks
            .expect_update()
            .withf(|t: &Task| t.status == TaskStatus::InProgress && t.name == "元タスク")
            .times(1)
            .returning(|t| Ok(t.clone()));
        let mut genres = MockGenreRepository::new();
        genres.expect_exists().never();

        let result = service(tasks, genres)
            .update_status(1, EnumInput::Label("in_progress".to_string()))
            .await
            .unwrap();

        let updated = result.value().unwrap();
        assert_eq!(updated.status, TaskStatus::InProgress);
        assert_eq!(updated.deadline_date, original.deadline_date);
    }

    #[tokio::test]
    async fn test_update_task_to_unknown_genre_fails() {
        let lookup = stored_task();
        let mut tasks = MockTaskRepository::new();
        tasks
            .expect_find_by_id()
            .returning(move |_| Ok(Some(lookup.clone())));
        tasks.expect_update().never();

        let changes = TaskChanges {
            genre_id: crate::value_objects::UpdateValue::Set(77),
            ..TaskChanges::default()
        };
        let result = service(tasks, genre_exists(false))
            .update_task(1, changes)
            .await
            .unwrap();

        assert!(result.errors().unwrap().contains("genre"));
    }

    #[tokio::test]
    async fn test_update_unknown_task_is_not_found() {
        let mut tasks = MockTaskRepository::new();
        tasks.expect_find_by_id().returning(|_| Ok(None));

        let result = service(tasks, MockGenreRepository::new())
            .update_status(9, EnumInput::Ordinal(2))
            .await;

        assert!(matches!(result, Err(TrackerError::TaskNotFound { id: 9 })));
    }

    #[tokio::test]
    async fn test_delete_task() {
        let mut tasks = MockTaskRepository::new();
        tasks.expect_delete().with(eq(1)).returning(|_| Ok(true));
        tasks.expect_delete().with(eq(2)).returning(|_| Ok(false));
        let service = service(tasks, MockGenreRepository::new());

        assert!(service.delete_task(1).await.is_ok());
        assert!(matches!(
            service.delete_task(2).await,
            Err(TrackerError::TaskNotFound { id: 2 })
        ));
    }

    #[tokio::test]
    async fn test_create_genre_requires_name() {
        let mut genres = MockGenreRepository::new();
        genres.expect_create().never();
        let service = GenreService::new(Arc::new(genres));

        let blank = service.create_genre(Some("   ".to_string())).await.unwrap();
        assert!(blank.errors().unwrap().contains("name"));

        let missing = service.create_genre(None).await.unwrap();
        assert!(missing.is_failure());
    }

    #[tokio::test]
    async fn test_delete_genre_missing() {
        let mut genres = MockGenreRepository::new();
        genres.expect_delete().returning(|_| Ok(false));

        let result = GenreService::new(Arc::new(genres)).delete_genre(3).await;
        assert!(matches!(result, Err(TrackerError::GenreNotFound { id: 3 })));
    }
}
