use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use playmark_model::{ContentId, UserId, ViewingRecord};

use crate::database::ports::viewing_history::{
    FinalProgress, HistoryFilter, ViewingHistoryRepository,
};
use crate::error::Result;

/// Process-local viewing history keyed by (user, content).
///
/// Each write replaces the map entry under the shard lock, so a reader sees
/// either the previous write or the next one in full.
#[derive(Debug, Default)]
pub struct InMemoryViewingHistoryRepository {
    records: DashMap<(UserId, ContentId), ViewingRecord>,
}

impl InMemoryViewingHistoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl ViewingHistoryRepository for InMemoryViewingHistoryRepository {
    async fn find(
        &self,
        user_id: UserId,
        content_id: ContentId,
    ) -> Result<Option<ViewingRecord>> {
        Ok(self
            .records
            .get(&(user_id, content_id))
            .map(|entry| entry.value().clone()))
    }

    async fn upsert_position(
        &self,
        user_id: UserId,
        content_id: ContentId,
        position: f64,
        at: DateTime<Utc>,
    ) -> Result<ViewingRecord> {
        let mut entry = self
            .records
            .entry((user_id, content_id))
            .or_insert_with(|| {
                ViewingRecord::first_heartbeat(user_id, content_id, position, at)
            });
        entry.last_position = position;
        entry.watched_at = at;
        Ok(entry.clone())
    }

    async fn upsert_final(
        &self,
        user_id: UserId,
        content_id: ContentId,
        progress: FinalProgress,
        at: DateTime<Utc>,
    ) -> Result<ViewingRecord> {
        let record = ViewingRecord {
            user_id,
            content_id,
            last_position: progress.final_position,
            watch_duration: progress.watch_duration,
            is_completed: progress.is_completed,
            watched_at: at,
        };
        self.records.insert((user_id, content_id), record.clone());
        Ok(record)
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        filter: HistoryFilter,
        limit: usize,
    ) -> Result<Vec<ViewingRecord>> {
        let mut rows: Vec<ViewingRecord> = self
            .records
            .iter()
            .filter(|entry| entry.key().0 == user_id)
            .filter(|entry| match filter {
                HistoryFilter::All => true,
                HistoryFilter::InProgressOnly => !entry.is_completed,
            })
            .map(|entry| entry.value().clone())
            .collect();

        rows.sort_by(|a, b| b.watched_at.cmp(&a.watched_at));
        rows.truncate(limit);
        Ok(rows)
    }
}
