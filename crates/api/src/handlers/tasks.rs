use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tasktrack_domain::{EnumInput, IdInput, TaskChanges, TaskFields, UpdateValue};

use crate::{
    error::ApiResult,
    response::{task_views, ReportView, TaskView},
    routes::AppState,
};

/// 任务创建请求，未列出的字段被忽略
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub name: Option<String>,
    pub explanation: Option<String>,
    pub status: Option<EnumInput>,
    pub priority: Option<EnumInput>,
    #[serde(alias = "genre_id")]
    pub genre_id: Option<IdInput>,
    #[serde(alias = "deadline_date")]
    pub deadline_date: Option<String>,
}

impl From<CreateTaskRequest> for TaskFields {
    fn from(request: CreateTaskRequest) -> Self {
        Self {
            name: request.name,
            explanation: request.explanation,
            status: request.status,
            priority: request.priority,
            genre_id: request.genre_id.and_then(IdInput::into_id),
            deadline_date: request.deadline_date,
        }
    }
}

/// 任务更新请求，缺失字段保持不变，null 表示清空
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[serde(default)]
    pub name: UpdateValue<String>,
    #[serde(default)]
    pub explanation: UpdateValue<String>,
    #[serde(default)]
    pub status: UpdateValue<EnumInput>,
    #[serde(default)]
    pub priority: UpdateValue<EnumInput>,
    #[serde(default, alias = "genre_id")]
    pub genre_id: UpdateValue<IdInput>,
    #[serde(default, alias = "deadline_date")]
    pub deadline_date: UpdateValue<String>,
}

impl From<UpdateTaskRequest> for TaskChanges {
    fn from(request: UpdateTaskRequest) -> Self {
        Self {
            name: request.name,
            explanation: request.explanation,
            status: request.status,
            priority: request.priority,
            genre_id: request.genre_id.map(IdInput::into_id).flatten(),
            deadline_date: request.deadline_date,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: EnumInput,
}

async fn all_tasks(state: &AppState) -> ApiResult<Json<Vec<TaskView>>> {
    let tasks = state.task_service.list_tasks().await?;
    Ok(Json(task_views(tasks)))
}

/// 获取任务列表
pub async fn list_tasks(State(state): State<AppState>) -> ApiResult<Json<Vec<TaskView>>> {
    all_tasks(&state).await
}

/// 创建任务，成功后返回全部任务
pub async fn create_task(
    State(state): State<AppState>,
    body: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> ApiResult<Json<Vec<TaskView>>> {
    let Json(request) = body?;
    state
        .task_service
        .create_task(request.into())
        .await?
        .into_result()?;
    all_tasks(&state).await
}

/// 更新任务
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> ApiResult<Json<Vec<TaskView>>> {
    let Json(request) = body?;
    state
        .task_service
        .update_task(id, request.into())
        .await?
        .into_result()?;
    all_tasks(&state).await
}

/// 仅更新任务状态
pub async fn update_task_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> ApiResult<Json<Vec<TaskView>>> {
    let Json(request) = body?;
    state
        .task_service
        .update_status(id, request.status)
        .await?
        .into_result()?;
    all_tasks(&state).await
}

/// 删除任务
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<TaskView>>> {
    state.task_service.delete_task(id).await?;
    all_tasks(&state).await
}

/// 复制任务，返回新建的副本
pub async fn duplicate_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let original = state.task_service.find_task(id).await?;
    let copy = state
        .task_service
        .duplicate_task(&original)
        .await?
        .into_result()?;
    Ok((StatusCode::CREATED, Json(TaskView::from(copy))))
}

/// 任务完成情况统计
pub async fn task_report(State(state): State<AppState>) -> ApiResult<Json<ReportView>> {
    let report = state.report_service.generate_report().await?;
    Ok(Json(report.into()))
}
