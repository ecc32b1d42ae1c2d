use async_trait::async_trait;
use chrono::{DateTime, Utc};
use playmark_model::{ContentId, UserId, ViewingRecord};
use sqlx::{FromRow, PgPool};
use tracing::debug;

use crate::{
    database::ports::viewing_history::{
        FinalProgress, HistoryFilter, ViewingHistoryRepository,
    },
    error::{PlaybackError, Result},
};

const RECORD_COLUMNS: &str = "user_id, content_id, last_position, \
     watch_duration, is_completed, watched_at";

#[derive(Debug, FromRow)]
struct ViewingRow {
    user_id: i64,
    content_id: i64,
    last_position: f64,
    watch_duration: f64,
    is_completed: bool,
    watched_at: DateTime<Utc>,
}

impl From<ViewingRow> for ViewingRecord {
    fn from(row: ViewingRow) -> Self {
        ViewingRecord {
            user_id: UserId(row.user_id),
            content_id: ContentId(row.content_id),
            last_position: row.last_position,
            watch_duration: row.watch_duration,
            is_completed: row.is_completed,
            watched_at: row.watched_at,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PostgresViewingHistoryRepository {
    pool: PgPool,
}

impl PostgresViewingHistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ViewingHistoryRepository for PostgresViewingHistoryRepository {
    async fn find(
        &self,
        user_id: UserId,
        content_id: ContentId,
    ) -> Result<Option<ViewingRecord>> {
        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM viewing_histories \
             WHERE user_id = $1 AND content_id = $2"
        );
        let row = sqlx::query_as::<_, ViewingRow>(&sql)
            .bind(user_id.get())
            .bind(content_id.get())
            .fetch_optional(self.pool())
            .await
            .map_err(|e| {
                PlaybackError::Internal(format!(
                    "Failed to load viewing record: {}",
                    e
                ))
            })?;

        Ok(row.map(ViewingRecord::from))
    }

    async fn upsert_position(
        &self,
        user_id: UserId,
        content_id: ContentId,
        position: f64,
        at: DateTime<Utc>,
    ) -> Result<ViewingRecord> {
        // New rows start with zero watch duration and not completed; existing
        // rows only move position and timestamp.
        let sql = format!(
            r#"
            INSERT INTO viewing_histories (
                user_id, content_id, last_position, watch_duration, is_completed, watched_at
            )
            VALUES ($1, $2, $3, 0, FALSE, $4)
            ON CONFLICT (user_id, content_id) DO UPDATE SET
                last_position = EXCLUDED.last_position,
                watched_at = EXCLUDED.watched_at
            RETURNING {RECORD_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, ViewingRow>(&sql)
            .bind(user_id.get())
            .bind(content_id.get())
            .bind(position)
            .bind(at)
            .fetch_one(self.pool())
            .await
            .map_err(|e| {
                PlaybackError::Internal(format!(
                    "Failed to upsert playback position: {}",
                    e
                ))
            })?;

        debug!(%user_id, %content_id, position, "stored heartbeat position");
        Ok(row.into())
    }

    async fn upsert_final(
        &self,
        user_id: UserId,
        content_id: ContentId,
        progress: FinalProgress,
        at: DateTime<Utc>,
    ) -> Result<ViewingRecord> {
        let sql = format!(
            r#"
            INSERT INTO viewing_histories (
                user_id, content_id, last_position, watch_duration, is_completed, watched_at
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id, content_id) DO UPDATE SET
                last_position = EXCLUDED.last_position,
                watch_duration = EXCLUDED.watch_duration,
                is_completed = EXCLUDED.is_completed,
                watched_at = EXCLUDED.watched_at
            RETURNING {RECORD_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, ViewingRow>(&sql)
            .bind(user_id.get())
            .bind(content_id.get())
            .bind(progress.final_position)
            .bind(progress.watch_duration)
            .bind(progress.is_completed)
            .bind(at)
            .fetch_one(self.pool())
            .await
            .map_err(|e| {
                PlaybackError::Internal(format!(
                    "Failed to upsert final position: {}",
                    e
                ))
            })?;

        debug!(
            %user_id,
            %content_id,
            final_position = progress.final_position,
            is_completed = progress.is_completed,
            "stored final position"
        );
        Ok(row.into())
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        filter: HistoryFilter,
        limit: usize,
    ) -> Result<Vec<ViewingRecord>> {
        let completed_clause = match filter {
            HistoryFilter::All => "",
            HistoryFilter::InProgressOnly => "AND is_completed = FALSE",
        };
        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM viewing_histories \
             WHERE user_id = $1 {completed_clause} \
             ORDER BY watched_at DESC \
             LIMIT $2"
        );
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let rows = sqlx::query_as::<_, ViewingRow>(&sql)
            .bind(user_id.get())
            .bind(limit)
            .fetch_all(self.pool())
            .await
            .map_err(|e| {
                PlaybackError::Internal(format!(
                    "Failed to list viewing history: {}",
                    e
                ))
            })?;

        Ok(rows.into_iter().map(ViewingRecord::from).collect())
    }
}
