use std::sync::Arc;

use playmark_core::api::types::{FinalPositionRequest, HistoryRequest};
use playmark_model::{ContentId, is_completed_at};

use super::dispatcher::BestEffortDispatcher;
use super::gateway::PlaybackGateway;
use crate::domains::player::PlaybackClock;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FinalizeOutcome {
    /// Both terminal writes were handed to the dispatcher.
    Dispatched {
        final_position: f64,
        is_completed: bool,
    },
    /// The element never reported a usable duration; nothing was written.
    SkippedUnknownDuration,
    AlreadyFinalized,
}

/// Sends the terminal position exactly once per session.
#[derive(Debug)]
pub struct SessionFinalizer {
    clock: PlaybackClock,
    gateway: Arc<dyn PlaybackGateway>,
    dispatcher: BestEffortDispatcher,
    armed: Option<ContentId>,
}

impl SessionFinalizer {
    pub fn new(
        clock: PlaybackClock,
        gateway: Arc<dyn PlaybackGateway>,
        dispatcher: BestEffortDispatcher,
    ) -> Self {
        let armed = Some(clock.content_id());
        Self {
            clock,
            gateway,
            dispatcher,
            armed,
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.armed.is_none()
    }

    /// Read the clock and fire the final-position and history writes.
    ///
    /// Completion is `position > 0.9 * duration`. Later calls are no-ops,
    /// and so is a session whose duration is zero or unknown.
    pub fn finalize(&mut self) -> FinalizeOutcome {
        let Some(content_id) = self.armed.take() else {
            return FinalizeOutcome::AlreadyFinalized;
        };

        let session = self.clock.snapshot();
        let Some(duration) = session.known_duration() else {
            log::debug!(
                "[Finalizer] No duration for {}; skipping final write",
                content_id
            );
            return FinalizeOutcome::SkippedUnknownDuration;
        };

        let final_position = session.position;
        let is_completed = is_completed_at(final_position, duration);
        log::info!(
            "[Finalizer] Closing {} at {:.1}/{:.1}s (completed: {})",
            content_id,
            final_position,
            duration,
            is_completed
        );

        // watch_duration mirrors the reached position.
        let final_request = FinalPositionRequest {
            content_id: Some(content_id),
            final_position,
            watch_duration: final_position,
            is_completed,
        };
        let history_request = HistoryRequest {
            content_id: Some(content_id),
            last_position: final_position,
            watch_duration: final_position,
            is_completed,
        };

        let gateway = Arc::clone(&self.gateway);
        self.dispatcher.dispatch("final-position", async move {
            gateway.save_final_position(content_id, final_request).await
        });
        let gateway = Arc::clone(&self.gateway);
        self.dispatcher.dispatch("history", async move {
            gateway.update_history(content_id, history_request).await
        });

        FinalizeOutcome::Dispatched {
            final_position,
            is_completed,
        }
    }
}
