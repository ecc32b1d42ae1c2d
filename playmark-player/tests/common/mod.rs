#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use playmark_core::api::types::{
    FinalPositionRequest, HistoryRequest, PlaybackPositionRequest,
    StreamingInfoResponse,
};
use playmark_model::ContentId;
use playmark_player::PlaybackGateway;
use playmark_player::infra::testing::RecordingGateway;
use tokio::sync::Notify;

pub fn stream(id: i64, duration: f64, last_position: f64) -> StreamingInfoResponse {
    StreamingInfoResponse {
        content_id: ContentId(id),
        streaming_url: format!("https://cdn.example.com/videos/{id}.mp4"),
        duration,
        last_position,
    }
}

pub fn gateway_with(streams: &[StreamingInfoResponse]) -> Arc<RecordingGateway> {
    let gateway = streams
        .iter()
        .cloned()
        .fold(RecordingGateway::new(), RecordingGateway::with_stream);
    Arc::new(gateway)
}

/// Gateway whose heartbeat writes block until the test releases them.
#[derive(Debug)]
pub struct HeldGateway {
    pub inner: Arc<RecordingGateway>,
    release: Notify,
}

impl HeldGateway {
    pub fn new(inner: Arc<RecordingGateway>) -> Arc<Self> {
        Arc::new(Self {
            inner,
            release: Notify::new(),
        })
    }

    /// Let one held heartbeat through.
    pub fn release_one(&self) {
        self.release.notify_one();
    }
}

#[async_trait]
impl PlaybackGateway for HeldGateway {
    async fn stream_info(&self, content_id: ContentId) -> Result<StreamingInfoResponse> {
        self.inner.stream_info(content_id).await
    }

    async fn update_playback(
        &self,
        content_id: ContentId,
        request: PlaybackPositionRequest,
    ) -> Result<()> {
        self.release.notified().await;
        self.inner.update_playback(content_id, request).await
    }

    async fn save_final_position(
        &self,
        content_id: ContentId,
        request: FinalPositionRequest,
    ) -> Result<()> {
        self.inner.save_final_position(content_id, request).await
    }

    async fn update_history(
        &self,
        content_id: ContentId,
        request: HistoryRequest,
    ) -> Result<()> {
        self.inner.update_history(content_id, request).await
    }
}
