use std::sync::Arc;

use playmark_model::ContentId;
use tokio::sync::watch;

/// Snapshot of the media element for one watch session.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSession {
    pub content_id: ContentId,
    /// Current time in seconds.
    pub position: f64,
    /// Duration reported by the media element; `None` until metadata loads.
    pub duration: Option<f64>,
    pub is_playing: bool,
    pub is_seeking: bool,
    /// Bumped whenever a playing run (re)starts: play after pause, and the
    /// end of a seek. The reporter restarts its timer on every bump.
    pub run_epoch: u64,
}

impl PlaybackSession {
    pub fn new(content_id: ContentId, resume_position: f64) -> Self {
        Self {
            content_id,
            position: resume_position,
            duration: None,
            is_playing: false,
            is_seeking: false,
            run_epoch: 0,
        }
    }

    /// Duration usable for completion math, if the element reported one.
    pub fn known_duration(&self) -> Option<f64> {
        self.duration
            .filter(|duration| duration.is_finite() && *duration > 0.0)
    }
}

/// Shared handle over the session state.
///
/// The watch controller owns the clock and hands clones to the reporter and
/// the finalizer; everyone observes the same session.
#[derive(Debug, Clone)]
pub struct PlaybackClock {
    tx: Arc<watch::Sender<PlaybackSession>>,
}

impl PlaybackClock {
    pub fn new(content_id: ContentId, resume_position: f64) -> Self {
        let (tx, _rx) =
            watch::channel(PlaybackSession::new(content_id, resume_position));
        Self { tx: Arc::new(tx) }
    }

    pub fn subscribe(&self) -> watch::Receiver<PlaybackSession> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> PlaybackSession {
        self.tx.borrow().clone()
    }

    pub fn content_id(&self) -> ContentId {
        self.tx.borrow().content_id
    }

    pub fn set_duration(&self, duration: f64) {
        self.tx.send_if_modified(|session| {
            if session.duration == Some(duration) {
                return false;
            }
            session.duration = Some(duration);
            true
        });
    }

    /// `timeupdate` from the element. Ignored while a seek is in progress.
    pub fn update_position(&self, position: f64) {
        self.tx.send_if_modified(|session| {
            if session.is_seeking || session.position == position {
                return false;
            }
            session.position = position;
            true
        });
    }

    pub fn play(&self) {
        self.tx.send_if_modified(|session| {
            if session.is_playing {
                return false;
            }
            session.is_playing = true;
            session.run_epoch += 1;
            true
        });
    }

    pub fn pause(&self) {
        self.tx.send_if_modified(|session| {
            if !session.is_playing {
                return false;
            }
            session.is_playing = false;
            true
        });
    }

    pub fn begin_seek(&self) {
        self.tx.send_if_modified(|session| {
            if session.is_seeking {
                return false;
            }
            session.is_seeking = true;
            true
        });
    }

    /// Seek finished at `position`; a playing session starts a fresh run.
    pub fn end_seek(&self, position: f64) {
        self.tx.send_modify(|session| {
            session.is_seeking = false;
            session.position = position;
            session.run_epoch += 1;
        });
    }
}
