use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::{error::ApiResult, response::GenreView, routes::AppState};

#[derive(Debug, Default, Deserialize)]
pub struct GenreRequest {
    pub name: Option<String>,
}

pub async fn list_genres(State(state): State<AppState>) -> ApiResult<Json<Vec<GenreView>>> {
    let genres = state.genre_service.list_genres().await?;
    Ok(Json(genres.into_iter().map(GenreView::from).collect()))
}

pub async fn get_genre(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<GenreView>> {
    let genre = state.genre_service.find_genre(id).await?;
    Ok(Json(genre.into()))
}

pub async fn create_genre(
    State(state): State<AppState>,
    body: Result<Json<GenreRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(request) = body?;
    let genre = state
        .genre_service
        .create_genre(request.name)
        .await?
        .into_result()?;
    Ok((StatusCode::CREATED, Json(GenreView::from(genre))))
}

pub async fn update_genre(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Result<Json<GenreRequest>, JsonRejection>,
) -> ApiResult<Json<GenreView>> {
    let Json(request) = body?;
    let genre = state
        .genre_service
        .rename_genre(id, request.name)
        .await?
        .into_result()?;
    Ok(Json(genre.into()))
}

/// 仍被任务引用的分类返回 409
pub async fn delete_genre(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.genre_service.delete_genre(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
