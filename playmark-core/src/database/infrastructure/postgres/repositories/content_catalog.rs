use async_trait::async_trait;
use playmark_model::{ContentId, ContentSummary};
use sqlx::{FromRow, PgPool};

use crate::{
    database::ports::content_catalog::ContentCatalog,
    error::{PlaybackError, Result},
};

#[derive(Debug, FromRow)]
struct ContentRow {
    id: i64,
    title: String,
    thumbnail_url: String,
    video_url: String,
    duration: f64,
}

impl From<ContentRow> for ContentSummary {
    fn from(row: ContentRow) -> Self {
        ContentSummary {
            id: ContentId(row.id),
            title: row.title,
            thumbnail_url: row.thumbnail_url,
            video_url: row.video_url,
            duration: row.duration,
        }
    }
}

/// Reads the catalog's `contents` table. The catalog owns the rows.
#[derive(Clone, Debug)]
pub struct PostgresContentCatalog {
    pool: PgPool,
}

impl PostgresContentCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentCatalog for PostgresContentCatalog {
    async fn find_content(
        &self,
        content_id: ContentId,
    ) -> Result<Option<ContentSummary>> {
        let row = sqlx::query_as::<_, ContentRow>(
            "SELECT id, title, thumbnail_url, video_url, duration \
             FROM contents WHERE id = $1",
        )
        .bind(content_id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            PlaybackError::Internal(format!("Failed to load content: {}", e))
        })?;

        Ok(row.map(ContentSummary::from))
    }

    async fn find_many(
        &self,
        content_ids: &[ContentId],
    ) -> Result<Vec<ContentSummary>> {
        if content_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = content_ids.iter().map(|id| id.get()).collect();
        let rows = sqlx::query_as::<_, ContentRow>(
            "SELECT id, title, thumbnail_url, video_url, duration \
             FROM contents WHERE id = ANY($1)",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            PlaybackError::Internal(format!(
                "Failed to load content batch: {}",
                e
            ))
        })?;

        Ok(rows.into_iter().map(ContentSummary::from).collect())
    }
}
