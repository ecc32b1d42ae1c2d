use std::sync::Arc;

use playmark_model::{ContentId, ContentSummary, StreamingGrant, UserId};
use tracing::debug;

use crate::application::AppUnitOfWork;
use crate::database::ports::{
    content_catalog::ContentCatalog, viewing_history::ViewingHistoryRepository,
};
use crate::error::{PlaybackError, Result};

/// Content facts plus the grant a session starts from.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStream {
    pub content: ContentSummary,
    pub grant: StreamingGrant,
}

/// Answers "where do I stream from and where do I resume".
///
/// Read-only: resolving never creates a viewing record.
#[derive(Clone)]
pub struct StreamingResolver {
    contents: Arc<dyn ContentCatalog>,
    history: Arc<dyn ViewingHistoryRepository>,
}

impl std::fmt::Debug for StreamingResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamingResolver").finish_non_exhaustive()
    }
}

impl StreamingResolver {
    pub fn new(
        contents: Arc<dyn ContentCatalog>,
        history: Arc<dyn ViewingHistoryRepository>,
    ) -> Self {
        Self { contents, history }
    }

    pub fn from_unit_of_work(uow: &AppUnitOfWork) -> Self {
        Self::new(uow.contents.clone(), uow.viewing_history.clone())
    }

    pub async fn resolve(
        &self,
        content_id: ContentId,
        user_id: UserId,
    ) -> Result<ResolvedStream> {
        let content = self
            .contents
            .find_content(content_id)
            .await?
            .ok_or_else(|| PlaybackError::content_not_found(content_id))?;

        let resume_position = self
            .history
            .find(user_id, content_id)
            .await?
            .map_or(0.0, |record| record.last_position);

        debug!(%user_id, %content_id, resume_position, "resolved stream");

        let grant = StreamingGrant::new(content.video_url.clone(), resume_position);
        Ok(ResolvedStream { content, grant })
    }
}
