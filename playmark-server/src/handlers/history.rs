use axum::{
    Extension, Json,
    extract::{Query, State, rejection::QueryRejection},
};
use playmark_core::api::types::{ApiResponse, ViewingHistoryEntry};
use serde::Deserialize;

use crate::{
    auth::AuthenticatedUser,
    infra::{app_state::AppState, errors::AppResult},
};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
}

/// In-progress rows for the caller, most recently watched first.
pub async fn continue_watching_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> AppResult<Json<ApiResponse<Vec<ViewingHistoryEntry>>>> {
    let Query(query) = query?;
    let entries = state
        .history
        .continue_watching(user.user_id, query.limit)
        .await?;
    Ok(Json(ApiResponse::success(entries)))
}

/// Every row for the caller, completed included.
pub async fn viewing_history_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> AppResult<Json<ApiResponse<Vec<ViewingHistoryEntry>>>> {
    let Query(query) = query?;
    let entries = state
        .history
        .viewing_history(user.user_id, query.limit)
        .await?;
    Ok(Json(ApiResponse::success(entries)))
}
