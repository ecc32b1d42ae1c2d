use std::sync::Arc;

use anyhow::{Context, Result};
use playmark_model::ContentId;

use crate::domains::player::{PlaybackClock, PlaybackSession};
use crate::domains::progress::{
    BestEffortDispatcher, DeliveryStats, FinalizeOutcome, PlaybackGateway,
    PositionReporter, ReporterConfig, ReporterState, SessionFinalizer,
};

/// Owner of one watch session, from mount to unmount.
///
/// Mounting resolves the stream and resume offset and starts the heartbeat
/// reporter. Unmounting (or dropping the controller) stops the reporter and
/// sends the final position once.
#[derive(Debug)]
pub struct WatchController {
    clock: PlaybackClock,
    reporter: PositionReporter,
    finalizer: SessionFinalizer,
    dispatcher: BestEffortDispatcher,
    streaming_url: String,
    resume_position: f64,
}

impl WatchController {
    pub async fn mount(
        gateway: Arc<dyn PlaybackGateway>,
        content_id: ContentId,
        config: ReporterConfig,
    ) -> Result<Self> {
        let info = gateway
            .stream_info(content_id)
            .await
            .with_context(|| format!("failed to resolve stream for content {}", content_id))?;

        log::info!(
            "[Watch] Mounted {} resuming at {:.1}s",
            content_id,
            info.last_position
        );

        let clock = PlaybackClock::new(content_id, info.last_position);
        let dispatcher = BestEffortDispatcher::new();
        let reporter = PositionReporter::spawn(
            &clock,
            Arc::clone(&gateway),
            dispatcher.clone(),
            config,
        );
        let finalizer =
            SessionFinalizer::new(clock.clone(), gateway, dispatcher.clone());

        Ok(Self {
            clock,
            reporter,
            finalizer,
            dispatcher,
            streaming_url: info.streaming_url,
            resume_position: info.last_position,
        })
    }

    pub fn streaming_url(&self) -> &str {
        &self.streaming_url
    }

    /// Offset the element should seek to before playing.
    pub fn resume_position(&self) -> f64 {
        self.resume_position
    }

    pub fn clock(&self) -> &PlaybackClock {
        &self.clock
    }

    pub fn session(&self) -> PlaybackSession {
        self.clock.snapshot()
    }

    /// Metadata loaded; `duration` is what the element reports.
    pub fn on_media_ready(&self, duration: f64) {
        self.clock.set_duration(duration);
    }

    pub fn on_time_update(&self, position: f64) {
        self.clock.update_position(position);
    }

    pub fn play(&self) {
        self.clock.play();
    }

    pub fn pause(&self) {
        self.clock.pause();
    }

    pub fn begin_seek(&self) {
        self.clock.begin_seek();
    }

    pub fn end_seek(&self, position: f64) {
        self.clock.end_seek(position);
    }

    pub fn reporter_state(&self) -> ReporterState {
        self.reporter.state()
    }

    pub fn delivery_stats(&self) -> DeliveryStats {
        self.dispatcher.stats()
    }

    pub fn dispatcher(&self) -> &BestEffortDispatcher {
        &self.dispatcher
    }

    /// Stop heartbeats and send the final position. Idempotent.
    pub fn unmount(&mut self) -> FinalizeOutcome {
        self.reporter.stop();
        self.finalizer.finalize()
    }

    /// Wait for every write this session has dispatched.
    pub async fn settle(&self) {
        self.dispatcher.settle().await;
    }
}

impl Drop for WatchController {
    fn drop(&mut self) {
        if !self.finalizer.is_finalized() {
            log::debug!("[Watch] Controller dropped without unmount; finalizing");
            self.unmount();
        }
    }
}
