use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
};
use playmark_core::{
    api::types::{
        FinalPositionRequest, HistoryRequest, PlaybackPositionRequest,
        StreamingInfoResponse, SuccessResponse,
    },
    database::ports::viewing_history::FinalProgress,
};
use tracing::{debug, info};

use super::{ensure_body_matches, parse_content_id};
use crate::{
    auth::AuthenticatedUser,
    infra::{app_state::AppState, errors::AppResult},
};

/// Resolve where the caller streams from and where to resume.
///
/// Never creates a viewing record; content the caller has not watched
/// resumes at 0.
pub async fn stream_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> AppResult<Json<StreamingInfoResponse>> {
    let content_id = parse_content_id(&id)?;
    let resolved = state.resolver.resolve(content_id, user.user_id).await?;

    Ok(Json(StreamingInfoResponse {
        content_id,
        streaming_url: resolved.grant.streaming_url,
        duration: resolved.content.duration,
        last_position: resolved.grant.resume_position,
    }))
}

/// Periodic heartbeat. Overwrites the stored position unconditionally.
pub async fn playback_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    payload: Result<Json<PlaybackPositionRequest>, JsonRejection>,
) -> AppResult<Json<SuccessResponse>> {
    let content_id = parse_content_id(&id)?;
    let Json(request) = payload?;
    ensure_body_matches(content_id, request.content_id)?;

    state
        .history
        .upsert_position(user.user_id, content_id, request.current_position)
        .await?;

    debug!(
        user_id = %user.user_id,
        %content_id,
        position = request.current_position,
        "heartbeat stored"
    );
    Ok(Json(SuccessResponse::OK))
}

/// Terminal write sent when a watch session ends.
pub async fn final_position_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    payload: Result<Json<FinalPositionRequest>, JsonRejection>,
) -> AppResult<Json<SuccessResponse>> {
    let Json(request) = payload?;
    record_final(&state, user, &id, request).await
}

/// Same write as [`final_position_handler`], addressed at the history
/// resource. Accepts `last_position` or `final_position`.
pub async fn history_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    payload: Result<Json<HistoryRequest>, JsonRejection>,
) -> AppResult<Json<SuccessResponse>> {
    let Json(request) = payload?;
    record_final(&state, user, &id, request.into()).await
}

async fn record_final(
    state: &AppState,
    user: AuthenticatedUser,
    raw_id: &str,
    request: FinalPositionRequest,
) -> AppResult<Json<SuccessResponse>> {
    let content_id = parse_content_id(raw_id)?;
    ensure_body_matches(content_id, request.content_id)?;

    let progress = FinalProgress {
        final_position: request.final_position,
        watch_duration: request.watch_duration,
        is_completed: request.is_completed,
    };
    let record = state
        .history
        .upsert_final(user.user_id, content_id, progress)
        .await?;

    info!(
        user_id = %user.user_id,
        %content_id,
        last_position = record.last_position,
        is_completed = record.is_completed,
        "session finalized"
    );
    Ok(Json(SuccessResponse::OK))
}
