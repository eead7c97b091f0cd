use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tasktrack_domain::{GenreRepository, GenreService, TaskReportService, TaskRepository, TaskService};

use crate::handlers::{
    genres::{create_genre, delete_genre, get_genre, list_genres, update_genre},
    health::health_check,
    tasks::{
        create_task, delete_task, duplicate_task, list_tasks, task_report, update_task,
        update_task_status,
    },
};

/// API应用状态
#[derive(Clone)]
pub struct AppState {
    pub task_service: TaskService,
    pub genre_service: GenreService,
    pub report_service: TaskReportService,
}

impl AppState {
    pub fn new(tasks: Arc<dyn TaskRepository>, genres: Arc<dyn GenreRepository>) -> Self {
        Self {
            task_service: TaskService::new(tasks.clone(), genres.clone()),
            genre_service: GenreService::new(genres),
            report_service: TaskReportService::new(tasks),
        }
    }
}

/// 创建API路由
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        // 健康检查
        .route("/health", get(health_check))
        // 任务
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/report", get(task_report))
        .route(
            "/tasks/{id}",
            axum::routing::patch(update_task)
                .put(update_task)
                .delete(delete_task),
        )
        .route("/tasks/{id}/status", post(update_task_status))
        .route("/tasks/{id}/duplicate", post(duplicate_task))
        // 分类
        .route("/genres", get(list_genres).post(create_genre))
        .route(
            "/genres/{id}",
            get(get_genre)
                .patch(update_genre)
                .put(update_genre)
                .delete(delete_genre),
        )
        .with_state(state)
}
