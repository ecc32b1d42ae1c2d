//! In-process [`PlaybackGateway`] that records every call.
//!
//! Used by the crate's own tests and by embedders that want to drive a
//! watch session without a server.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use parking_lot::Mutex;
use playmark_core::api::types::{
    FinalPositionRequest, HistoryRequest, PlaybackPositionRequest,
    StreamingInfoResponse,
};
use playmark_model::ContentId;

use crate::domains::progress::PlaybackGateway;

#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Heartbeat(ContentId, PlaybackPositionRequest),
    FinalPosition(ContentId, FinalPositionRequest),
    History(ContentId, HistoryRequest),
}

#[derive(Debug, Default)]
pub struct RecordingGateway {
    streams: Mutex<HashMap<ContentId, StreamingInfoResponse>>,
    calls: Mutex<Vec<RecordedCall>>,
    fail_writes: AtomicBool,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stream(self, info: StreamingInfoResponse) -> Self {
        self.streams.lock().insert(info.content_id, info);
        self
    }

    /// Make every write fail, as an unreachable server would.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn heartbeats(&self) -> Vec<PlaybackPositionRequest> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                RecordedCall::Heartbeat(_, request) => Some(request.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn final_positions(&self) -> Vec<FinalPositionRequest> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                RecordedCall::FinalPosition(_, request) => Some(request.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn histories(&self) -> Vec<HistoryRequest> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                RecordedCall::History(_, request) => Some(request.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: RecordedCall) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(anyhow!("simulated network failure"));
        }
        self.calls.lock().push(call);
        Ok(())
    }
}

#[async_trait]
impl PlaybackGateway for RecordingGateway {
    async fn stream_info(
        &self,
        content_id: ContentId,
    ) -> Result<StreamingInfoResponse> {
        self.streams
            .lock()
            .get(&content_id)
            .cloned()
            .ok_or_else(|| anyhow!("content {} not found", content_id))
    }

    async fn update_playback(
        &self,
        content_id: ContentId,
        request: PlaybackPositionRequest,
    ) -> Result<()> {
        self.record(RecordedCall::Heartbeat(content_id, request))
    }

    async fn save_final_position(
        &self,
        content_id: ContentId,
        request: FinalPositionRequest,
    ) -> Result<()> {
        self.record(RecordedCall::FinalPosition(content_id, request))
    }

    async fn update_history(
        &self,
        content_id: ContentId,
        request: HistoryRequest,
    ) -> Result<()> {
        self.record(RecordedCall::History(content_id, request))
    }
}
