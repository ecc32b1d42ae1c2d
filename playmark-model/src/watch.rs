use chrono::{DateTime, Utc};

use crate::ids::{ContentId, UserId};

/// Fraction of the duration beyond which a view counts as complete.
pub const COMPLETION_THRESHOLD: f64 = 0.9;

/// `true` when `position` is strictly past [`COMPLETION_THRESHOLD`] of
/// `duration`. Unknown or zero durations never complete.
pub fn is_completed_at(position: f64, duration: f64) -> bool {
    duration.is_finite()
        && duration > 0.0
        && position > duration * COMPLETION_THRESHOLD
}

/// Durable progress row for one (user, content) pair.
///
/// Every write replaces the progress fields wholesale; nothing accumulates
/// across writes. `watch_duration` mirrors what the client reports, which
/// is the reached position rather than a sum of played seconds.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewingRecord {
    pub user_id: UserId,
    pub content_id: ContentId,
    pub last_position: f64,
    pub watch_duration: f64,
    pub is_completed: bool,
    pub watched_at: DateTime<Utc>,
}

impl ViewingRecord {
    /// Record as it looks right after the first heartbeat.
    pub fn first_heartbeat(
        user_id: UserId,
        content_id: ContentId,
        position: f64,
        watched_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            content_id,
            last_position: position,
            watch_duration: 0.0,
            is_completed: false,
            watched_at,
        }
    }

    pub fn state(&self) -> ViewingState {
        if self.is_completed {
            ViewingState::Completed
        } else {
            ViewingState::InProgress
        }
    }
}

/// Per-user, per-content lifecycle derived from the stored record.
///
/// `Completed -> InProgress` is legal: a replay recomputes completion and
/// the store keeps whatever the latest write says.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ViewingState {
    NeverWatched,
    InProgress,
    Completed,
}

impl ViewingState {
    pub fn of(record: Option<&ViewingRecord>) -> Self {
        record.map_or(ViewingState::NeverWatched, ViewingRecord::state)
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, ViewingState::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_is_strictly_past_ninety_percent() {
        assert!(!is_completed_at(1080.0, 1200.0));
        assert!(is_completed_at(1080.5, 1200.0));
        assert!(is_completed_at(1100.0, 1200.0));
        assert!(!is_completed_at(10.0, 600.0));
        assert!(is_completed_at(600.0, 600.0));
    }

    #[test]
    fn unknown_duration_never_completes() {
        assert!(!is_completed_at(100.0, 0.0));
        assert!(!is_completed_at(100.0, f64::NAN));
        assert!(!is_completed_at(100.0, f64::INFINITY));
    }

    #[test]
    fn state_follows_record() {
        assert_eq!(ViewingState::of(None), ViewingState::NeverWatched);

        let mut record = ViewingRecord::first_heartbeat(
            UserId(1),
            ContentId(2),
            30.0,
            Utc::now(),
        );
        assert_eq!(ViewingState::of(Some(&record)), ViewingState::InProgress);

        record.is_completed = true;
        assert!(ViewingState::of(Some(&record)).is_completed());

        // replay
        record.is_completed = false;
        assert_eq!(record.state(), ViewingState::InProgress);
    }
}
