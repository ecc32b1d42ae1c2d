use anyhow::Result;
use async_trait::async_trait;
use playmark_core::api::types::{
    FinalPositionRequest, HistoryRequest, PlaybackPositionRequest,
    StreamingInfoResponse,
};
use playmark_model::ContentId;
use std::fmt::Debug;

/// Server operations a watch session depends on.
#[async_trait]
pub trait PlaybackGateway: Send + Sync + Debug {
    /// Streaming URL, duration and resume offset for `content_id`.
    async fn stream_info(
        &self,
        content_id: ContentId,
    ) -> Result<StreamingInfoResponse>;

    async fn update_playback(
        &self,
        content_id: ContentId,
        request: PlaybackPositionRequest,
    ) -> Result<()>;

    async fn save_final_position(
        &self,
        content_id: ContentId,
        request: FinalPositionRequest,
    ) -> Result<()>;

    async fn update_history(
        &self,
        content_id: ContentId,
        request: HistoryRequest,
    ) -> Result<()>;
}
