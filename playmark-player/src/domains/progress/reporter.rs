use std::sync::Arc;
use std::time::Duration;

use playmark_core::api::types::PlaybackPositionRequest;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;

use super::dispatcher::BestEffortDispatcher;
use super::gateway::PlaybackGateway;
use crate::domains::player::{PlaybackClock, PlaybackSession};

pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReporterConfig {
    /// Time between heartbeats while playing. Also sent as the heartbeat's
    /// `watch_duration`.
    pub heartbeat_interval: Duration,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval: DEFAULT_HEARTBEAT_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReporterState {
    Idle,
    Playing,
    Seeking,
}

impl ReporterState {
    pub fn of(session: &PlaybackSession) -> Self {
        if session.is_seeking {
            ReporterState::Seeking
        } else if session.is_playing {
            ReporterState::Playing
        } else {
            ReporterState::Idle
        }
    }
}

/// Periodic heartbeat sender for one watch session.
///
/// While the session is playing, a heartbeat goes out every
/// `heartbeat_interval`. Seeking suspends the timer; every new playing run
/// (resume after pause, end of a seek) waits a full interval before its
/// first heartbeat.
#[derive(Debug)]
pub struct PositionReporter {
    session: watch::Receiver<PlaybackSession>,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl PositionReporter {
    /// Spawn the reporter task on the current runtime.
    pub fn spawn(
        clock: &PlaybackClock,
        gateway: Arc<dyn PlaybackGateway>,
        dispatcher: BestEffortDispatcher,
        config: ReporterConfig,
    ) -> Self {
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run(
            clock.subscribe(),
            gateway,
            dispatcher,
            config,
            cancel.clone(),
        ));

        Self {
            session: clock.subscribe(),
            cancel,
            handle: Some(handle),
        }
    }

    pub fn state(&self) -> ReporterState {
        if self.cancel.is_cancelled() {
            return ReporterState::Idle;
        }
        ReporterState::of(&self.session.borrow())
    }

    /// Cancel the scheduled timer. Heartbeats already handed to the
    /// dispatcher keep running.
    pub fn stop(&mut self) {
        self.cancel.cancel();
        self.handle.take();
    }
}

impl Drop for PositionReporter {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run(
    mut session: watch::Receiver<PlaybackSession>,
    gateway: Arc<dyn PlaybackGateway>,
    dispatcher: BestEffortDispatcher,
    config: ReporterConfig,
    cancel: CancellationToken,
) {
    let period = config.heartbeat_interval;

    loop {
        // Wait for a playing run.
        let epoch = loop {
            let current = session.borrow_and_update().clone();
            if ReporterState::of(&current) == ReporterState::Playing {
                break current.run_epoch;
            }
            tokio::select! {
                _ = cancel.cancelled() => return,
                changed = session.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
            }
        };

        log::debug!("[Reporter] Playing run {} started", epoch);
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = ticker.tick() => {
                    let current = session.borrow().clone();
                    if !same_run(&current, epoch) {
                        break;
                    }
                    send_heartbeat(&gateway, &dispatcher, &current, period);
                }
                changed = session.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    // Position updates keep the run; anything else ends it.
                    if !same_run(&session.borrow_and_update(), epoch) {
                        break;
                    }
                }
            }
        }
    }
}

fn same_run(session: &PlaybackSession, epoch: u64) -> bool {
    ReporterState::of(session) == ReporterState::Playing
        && session.run_epoch == epoch
}

fn send_heartbeat(
    gateway: &Arc<dyn PlaybackGateway>,
    dispatcher: &BestEffortDispatcher,
    session: &PlaybackSession,
    period: Duration,
) {
    let content_id = session.content_id;
    let request = PlaybackPositionRequest {
        content_id: Some(content_id),
        current_position: session.position,
        watch_duration: period.as_secs_f64(),
    };
    log::debug!(
        "[Reporter] Heartbeat for {} at {:.1}s",
        content_id,
        request.current_position
    );

    let gateway = Arc::clone(gateway);
    dispatcher.dispatch("heartbeat", async move {
        gateway.update_playback(content_id, request).await
    });
}
