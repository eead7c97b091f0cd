//! # Tasktrack API
//!
//! 任务管理的REST API，基于Axum构建。
//!
//! ## API 端点
//!
//! ### 任务
//! - `GET /tasks` - 全部任务
//! - `POST /tasks` - 创建任务，返回全部任务
//! - `PATCH|PUT /tasks/{id}` - 更新任务
//! - `DELETE /tasks/{id}` - 删除任务
//! - `POST /tasks/{id}/status` - 仅更新状态
//! - `POST /tasks/{id}/duplicate` - 复制任务
//! - `GET /tasks/report` - 完成情况统计
//!
//! ### 分类
//! - `GET|POST /genres`
//! - `GET|PATCH|PUT|DELETE /genres/{id}`
//!
//! ## 错误响应
//!
//! 校验失败返回 422 和 `{"errors": {"genre": ["must exist"]}}`；
//! 其它错误返回 `{"error": {"message", "type", "code", "timestamp"}}`。

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;

use axum::{error_handling::HandleErrorLayer, extract::DefaultBodyLimit, Router};
use std::time::Duration;
use tasktrack_config::ApiConfig;
use tower::{timeout::TimeoutLayer, ServiceBuilder};

use middleware::{cors_layer, handle_timeout_error, request_logging, trace_layer};
pub use routes::{create_routes, AppState};

/// 创建完整的API应用
pub fn create_app(state: AppState, api_config: &ApiConfig) -> Router {
    let router = create_routes(state).layer(
        ServiceBuilder::new()
            .layer(trace_layer())
            .layer(axum::middleware::from_fn(request_logging))
            .layer(HandleErrorLayer::new(handle_timeout_error))
            .layer(TimeoutLayer::new(Duration::from_secs(
                api_config.request_timeout_seconds,
            )))
            .layer(DefaultBodyLimit::max(api_config.max_request_size_bytes())),
    );

    if api_config.cors_enabled {
        router.layer(cors_layer(api_config))
    } else {
        router
    }
}
