//! 领域仓储抽象
//!
//! 定义数据访问的抽象接口，遵循依赖倒置原则

use async_trait::async_trait;
use tasktrack_errors::TrackerResult;

use crate::entities::{Genre, NewGenre, NewTask, Task, TaskStatus};

/// 任务仓储抽象
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn create(&self, task: &NewTask) -> TrackerResult<Task>;
    async fn find_by_id(&self, id: i64) -> TrackerResult<Option<Task>>;
    /// 按 id 升序返回全部任务
    async fn find_all(&self) -> TrackerResult<Vec<Task>>;
    async fn update(&self, task: &Task) -> TrackerResult<Task>;
    async fn delete(&self, id: i64) -> TrackerResult<bool>;
    /// 每个出现过的状态及其任务数，未出现的状态不返回
    async fn count_by_status(&self) -> TrackerResult<Vec<(TaskStatus, i64)>>;
}

/// 分类仓储抽象
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenreRepository: Send + Sync {
    async fn create(&self, genre: &NewGenre) -> TrackerResult<Genre>;
    async fn find_by_id(&self, id: i64) -> TrackerResult<Option<Genre>>;
    async fn find_all(&self) -> TrackerResult<Vec<Genre>>;
    async fn update(&self, genre: &Genre) -> TrackerResult<Genre>;
    async fn delete(&self, id: i64) -> TrackerResult<bool>;
    async fn exists(&self, id: i64) -> TrackerResult<bool>;
}
