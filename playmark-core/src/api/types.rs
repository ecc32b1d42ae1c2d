//! Wire DTOs shared by the server handlers and the player client.

use chrono::{DateTime, Utc};
use playmark_model::{ContentId, ContentSummary, ViewingRecord};
use serde::{Deserialize, Serialize};

/// Standard API envelope used for list responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: "success".to_string(),
            data: Some(data),
        }
    }
}

/// Acknowledgement returned by every progress write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub const OK: SuccessResponse = SuccessResponse { success: true };
}

/// Response of `GET /api/contents/{id}/stream`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamingInfoResponse {
    pub content_id: ContentId,
    pub streaming_url: String,
    pub duration: f64,
    pub last_position: f64,
}

/// Heartbeat body for `POST /api/contents/{id}/playback`.
///
/// `watch_duration` is the fixed interval length the client claims to have
/// played; the store does not persist it for heartbeats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackPositionRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_id: Option<ContentId>,
    pub current_position: f64,
    #[serde(default)]
    pub watch_duration: f64,
}

/// Terminal body for `POST /api/contents/{id}/final-position`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalPositionRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_id: Option<ContentId>,
    #[serde(alias = "last_position")]
    pub final_position: f64,
    pub watch_duration: f64,
    #[serde(default)]
    pub is_completed: bool,
}

/// Terminal body for `POST /api/contents/{id}/history`.
///
/// Same payload as [`FinalPositionRequest`]; browser clients name the
/// position `last_position` here, so both spellings are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_id: Option<ContentId>,
    #[serde(alias = "final_position")]
    pub last_position: f64,
    pub watch_duration: f64,
    #[serde(default)]
    pub is_completed: bool,
}

impl From<HistoryRequest> for FinalPositionRequest {
    fn from(value: HistoryRequest) -> Self {
        Self {
            content_id: value.content_id,
            final_position: value.last_position,
            watch_duration: value.watch_duration,
            is_completed: value.is_completed,
        }
    }
}

/// One row of the continue-watching or viewing-history views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewingHistoryEntry {
    pub content_id: ContentId,
    pub title: String,
    pub thumbnail_url: String,
    pub duration: f64,
    pub watch_duration: f64,
    pub last_position: f64,
    pub progress_percent: f64,
    pub is_completed: bool,
    pub watched_at: DateTime<Utc>,
}

impl ViewingHistoryEntry {
    pub fn from_parts(record: &ViewingRecord, content: &ContentSummary) -> Self {
        Self {
            content_id: record.content_id,
            title: content.title.clone(),
            thumbnail_url: content.thumbnail_url.clone(),
            duration: content.duration,
            watch_duration: record.watch_duration,
            last_position: record.last_position,
            progress_percent: content.progress_percent(record.last_position),
            is_completed: record.is_completed,
            watched_at: record.watched_at,
        }
    }
}
