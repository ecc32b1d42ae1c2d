use async_trait::async_trait;
use chrono::{DateTime, Utc};
use playmark_model::{ContentId, UserId, ViewingRecord};

use crate::error::Result;

/// Terminal progress written when a session ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinalProgress {
    pub final_position: f64,
    pub watch_duration: f64,
    pub is_completed: bool,
}

/// Which rows a history listing returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryFilter {
    All,
    InProgressOnly,
}

/// Durable store of one [`ViewingRecord`] per (user, content).
///
/// Writes are last-write-wins in arrival order. Implementations must set
/// the whole field set of a write at once so concurrent writers can only
/// race on which write lands last, never leave a mix of two writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ViewingHistoryRepository: Send + Sync {
    async fn find(
        &self,
        user_id: UserId,
        content_id: ContentId,
    ) -> Result<Option<ViewingRecord>>;

    /// Creates the record (watch duration 0, not completed) or overwrites
    /// only `last_position` and `watched_at` on an existing one.
    async fn upsert_position(
        &self,
        user_id: UserId,
        content_id: ContentId,
        position: f64,
        at: DateTime<Utc>,
    ) -> Result<ViewingRecord>;

    /// Overwrites position, watch duration and completion in one write.
    async fn upsert_final(
        &self,
        user_id: UserId,
        content_id: ContentId,
        progress: FinalProgress,
        at: DateTime<Utc>,
    ) -> Result<ViewingRecord>;

    /// Newest first by `watched_at`, at most `limit` rows.
    async fn list_for_user(
        &self,
        user_id: UserId,
        filter: HistoryFilter,
        limit: usize,
    ) -> Result<Vec<ViewingRecord>>;
}
