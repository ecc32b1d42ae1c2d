use async_trait::async_trait;
use playmark_model::{ContentId, ContentSummary};

use crate::error::Result;

/// Read side of the external content catalog.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentCatalog: Send + Sync {
    async fn find_content(
        &self,
        content_id: ContentId,
    ) -> Result<Option<ContentSummary>>;

    /// Unknown ids are skipped; order is unspecified.
    async fn find_many(
        &self,
        content_ids: &[ContentId],
    ) -> Result<Vec<ContentSummary>>;
}
