use async_trait::async_trait;
use dashmap::DashMap;
use playmark_model::{ContentId, ContentSummary};

use crate::database::ports::content_catalog::ContentCatalog;
use crate::error::Result;

/// Catalog backed by a concurrent map, seeded at startup.
#[derive(Debug, Default)]
pub struct InMemoryContentCatalog {
    contents: DashMap<ContentId, ContentSummary>,
}

impl InMemoryContentCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(contents: impl IntoIterator<Item = ContentSummary>) -> Self {
        let catalog = Self::new();
        for content in contents {
            catalog.insert(content);
        }
        catalog
    }

    pub fn insert(&self, content: ContentSummary) {
        self.contents.insert(content.id, content);
    }
}

#[async_trait]
impl ContentCatalog for InMemoryContentCatalog {
    async fn find_content(
        &self,
        content_id: ContentId,
    ) -> Result<Option<ContentSummary>> {
        Ok(self.contents.get(&content_id).map(|c| c.value().clone()))
    }

    async fn find_many(
        &self,
        content_ids: &[ContentId],
    ) -> Result<Vec<ContentSummary>> {
        Ok(content_ids
            .iter()
            .filter_map(|id| self.contents.get(id).map(|c| c.value().clone()))
            .collect())
    }
}
