//! History Routes - Past analyses of the current user

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Extension, Json, Router,
};
use uuid::Uuid;

use saju::AuthUser;

use crate::models::{
    ApiError, ErrorResponse, HistoryDetailResponse, HistoryItemResponse, HistoryQuery,
};
use crate::AppState;

/// List the current user's analyses, newest first
#[utoipa::path(
    get,
    path = "/api/history",
    params(HistoryQuery),
    responses(
        (status = 200, description = "History entries", body = Vec<HistoryItemResponse>),
        (status = 401, description = "Login required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "History"
)]
pub async fn list_history(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<HistoryItemResponse>>, ApiError> {
    let records = state.history.list(&user.id, query.limit).await?;
    Ok(Json(records.iter().map(Into::into).collect()))
}

/// Get one stored analysis
#[utoipa::path(
    get,
    path = "/api/history/{id}",
    params(
        ("id" = Uuid, Path, description = "History entry ID")
    ),
    responses(
        (status = 200, description = "History entry", body = HistoryDetailResponse),
        (status = 401, description = "Login required", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "History"
)]
pub async fn get_history(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<HistoryDetailResponse>, ApiError> {
    let record = state.history.get(&user.id, id).await?;
    Ok(Json(record.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/history", get(list_history))
        .route("/api/history/:id", get(get_history))
}
