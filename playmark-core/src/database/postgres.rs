use crate::{
    database::infrastructure::postgres::{
        PostgresContentCatalog, PostgresViewingHistoryRepository,
    },
    error::{PlaybackError, Result},
};
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{fmt, time::Duration};
use tracing::info;

/// Statistics about the connection pool
#[derive(Debug, Clone)]
pub struct PoolStats {
    pub size: u32,
    pub idle: u32,
    pub max_size: u32,
}

/// Pool handle plus the repositories built on it.
#[derive(Clone)]
pub struct PostgresDatabase {
    pool: PgPool,
    max_connections: u32,
}

impl fmt::Debug for PostgresDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresDatabase")
            .field("pool_size", &self.pool.size())
            .field("idle_connections", &self.pool.num_idle())
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl PostgresDatabase {
    pub async fn connect(
        connection_string: &str,
        max_connections: u32,
    ) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(30))
            .max_lifetime(Duration::from_secs(1800)) // 30 min lifetime
            .idle_timeout(Duration::from_secs(600)) // 10 min idle timeout
            .test_before_acquire(true)
            .connect(connection_string)
            .await
            .map_err(|e| {
                PlaybackError::Internal(format!(
                    "Database connection failed: {}",
                    e
                ))
            })?;

        info!(max_connections, "Database pool initialized");

        Ok(Self::from_pool(pool, max_connections))
    }

    pub fn from_pool(pool: PgPool, max_connections: u32) -> Self {
        Self {
            pool,
            max_connections,
        }
    }

    /// Apply the embedded migrations.
    pub async fn migrate(&self) -> Result<()> {
        crate::MIGRATOR.run(&self.pool).await.map_err(|e| {
            PlaybackError::Internal(format!("Migration failed: {}", e))
        })?;
        info!("Database migrations applied");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn pool_stats(&self) -> PoolStats {
        PoolStats {
            size: self.pool.size(),
            idle: self.pool.num_idle() as u32,
            max_size: self.max_connections,
        }
    }

    pub fn viewing_history(&self) -> PostgresViewingHistoryRepository {
        PostgresViewingHistoryRepository::new(self.pool.clone())
    }

    pub fn content_catalog(&self) -> PostgresContentCatalog {
        PostgresContentCatalog::new(self.pool.clone())
    }
}
