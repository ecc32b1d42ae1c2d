use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use playmark_model::{ContentId, UserId, ViewingRecord};
use tracing::{debug, warn};

use crate::api::types::ViewingHistoryEntry;
use crate::application::AppUnitOfWork;
use crate::database::ports::{
    content_catalog::ContentCatalog,
    viewing_history::{FinalProgress, HistoryFilter, ViewingHistoryRepository},
};
use crate::error::{PlaybackError, Result};

/// Rows returned by a history view when the caller gives no limit.
pub const DEFAULT_LIST_LIMIT: usize = 20;
/// Upper bound applied to any caller-supplied limit.
pub const MAX_LIST_LIMIT: usize = 100;

/// Cap a caller-supplied limit at `MAX_LIST_LIMIT`. Zero stays zero.
pub fn clamp_limit(limit: Option<usize>) -> usize {
    limit.unwrap_or(DEFAULT_LIST_LIMIT).min(MAX_LIST_LIMIT)
}

fn ensure_non_negative(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(PlaybackError::Validation(format!(
            "{field} must be a finite number of seconds"
        )));
    }
    if value < 0.0 {
        return Err(PlaybackError::Validation(format!(
            "{field} must not be negative"
        )));
    }
    Ok(())
}

/// Write and read side of the durable per-user progress store.
///
/// Writes are last-write-wins in arrival order: there is no sequence guard,
/// so a stale heartbeat that lands after a newer write moves the stored
/// position back.
#[derive(Clone)]
pub struct ViewingHistoryService {
    contents: Arc<dyn ContentCatalog>,
    history: Arc<dyn ViewingHistoryRepository>,
}

impl std::fmt::Debug for ViewingHistoryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewingHistoryService").finish_non_exhaustive()
    }
}

impl ViewingHistoryService {
    pub fn new(
        contents: Arc<dyn ContentCatalog>,
        history: Arc<dyn ViewingHistoryRepository>,
    ) -> Self {
        Self { contents, history }
    }

    pub fn from_unit_of_work(uow: &AppUnitOfWork) -> Self {
        Self::new(uow.contents.clone(), uow.viewing_history.clone())
    }

    async fn ensure_content(&self, content_id: ContentId) -> Result<()> {
        match self.contents.find_content(content_id).await? {
            Some(_) => Ok(()),
            None => Err(PlaybackError::content_not_found(content_id)),
        }
    }

    /// Heartbeat write. Validation runs before the catalog lookup so a bad
    /// body never touches storage.
    pub async fn upsert_position(
        &self,
        user_id: UserId,
        content_id: ContentId,
        position: f64,
    ) -> Result<ViewingRecord> {
        ensure_non_negative("current_position", position)?;
        self.ensure_content(content_id).await?;

        self.history
            .upsert_position(user_id, content_id, position, Utc::now())
            .await
    }

    /// Terminal write: replaces position, watch duration and completion.
    pub async fn upsert_final(
        &self,
        user_id: UserId,
        content_id: ContentId,
        progress: FinalProgress,
    ) -> Result<ViewingRecord> {
        ensure_non_negative("final_position", progress.final_position)?;
        ensure_non_negative("watch_duration", progress.watch_duration)?;
        self.ensure_content(content_id).await?;

        let record = self
            .history
            .upsert_final(user_id, content_id, progress, Utc::now())
            .await?;
        debug!(
            %user_id,
            %content_id,
            state = ?record.state(),
            "final position recorded"
        );
        Ok(record)
    }

    /// In-progress rows, newest first.
    pub async fn continue_watching(
        &self,
        user_id: UserId,
        limit: Option<usize>,
    ) -> Result<Vec<ViewingHistoryEntry>> {
        self.list(user_id, HistoryFilter::InProgressOnly, limit).await
    }

    /// Every row for the user, completed included, newest first.
    pub async fn viewing_history(
        &self,
        user_id: UserId,
        limit: Option<usize>,
    ) -> Result<Vec<ViewingHistoryEntry>> {
        self.list(user_id, HistoryFilter::All, limit).await
    }

    async fn list(
        &self,
        user_id: UserId,
        filter: HistoryFilter,
        limit: Option<usize>,
    ) -> Result<Vec<ViewingHistoryEntry>> {
        let limit = clamp_limit(limit);
        if limit == 0 {
            return Ok(Vec::new());
        }
        let records = self.history.list_for_user(user_id, filter, limit).await?;
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<ContentId> = records.iter().map(|r| r.content_id).collect();
        let contents: HashMap<ContentId, _> = self
            .contents
            .find_many(&ids)
            .await?
            .into_iter()
            .map(|content| (content.id, content))
            .collect();

        let entries = records
            .iter()
            .filter_map(|record| match contents.get(&record.content_id) {
                Some(content) => {
                    Some(ViewingHistoryEntry::from_parts(record, content))
                }
                None => {
                    warn!(
                        content_id = %record.content_id,
                        "viewing record points at missing content; skipped"
                    );
                    None
                }
            })
            .collect();
        Ok(entries)
    }
}
