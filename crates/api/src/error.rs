use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tasktrack_domain::ValidationErrors;
use tasktrack_errors::TrackerError;
use tracing::error;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("服务错误: {0}")]
    Tracker(#[from] TrackerError),

    #[error("验证错误: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("请求参数错误: {0}")]
    BadRequest(String),

    #[error("请求超时")]
    Timeout,

    #[error("内部服务器错误: {0}")]
    Internal(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message, error_type) = match &self {
            // 校验失败使用 {"errors": {字段: [消息]}} 结构
            ApiError::Validation(errors) => {
                return (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({ "errors": errors })),
                )
                    .into_response();
            }
            ApiError::Tracker(TrackerError::TaskNotFound { id }) => (
                StatusCode::NOT_FOUND,
                format!("任务 ID {} 不存在", id),
                "TASK_NOT_FOUND",
            ),
            ApiError::Tracker(TrackerError::GenreNotFound { id }) => (
                StatusCode::NOT_FOUND,
                format!("分类 ID {} 不存在", id),
                "GENRE_NOT_FOUND",
            ),
            ApiError::Tracker(TrackerError::GenreInUse { id }) => (
                StatusCode::CONFLICT,
                format!("分类 ID {} 仍被任务引用，无法删除", id),
                "GENRE_IN_USE",
            ),
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                format!("请求参数错误: {}", msg),
                "BAD_REQUEST",
            ),
            ApiError::Timeout => (
                StatusCode::REQUEST_TIMEOUT,
                "请求处理超时".to_string(),
                "REQUEST_TIMEOUT",
            ),
            ApiError::Tracker(err) => {
                error!("请求处理失败: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    err.user_message().to_string(),
                    "INTERNAL_ERROR",
                )
            }
            ApiError::Internal(msg) => {
                error!("内部服务器错误: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "内部服务器错误".to_string(),
                    "INTERNAL_ERROR",
                )
            }
        };

        let body = Json(json!({
            "error": {
                "message": error_message,
                "type": error_type,
                "code": status.as_u16(),
                "timestamp": chrono::Utc::now().to_rfc3339(),
            }
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
