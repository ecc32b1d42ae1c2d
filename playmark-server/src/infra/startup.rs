use anyhow::{Context, Result, anyhow};
use playmark_config::{Config, ContentSeed, StorageBackend};
use playmark_core::{
    application::AppUnitOfWork,
    database::{PostgresDatabase, infrastructure::memory::InMemoryContentCatalog},
};
use playmark_model::{ContentId, ContentSummary};
use tracing::{info, warn};

use super::app_state::AppState;

/// Connect storage for the configured backend and assemble [`AppState`].
pub async fn build_app_state(config: Config) -> Result<AppState> {
    match config.storage {
        StorageBackend::Postgres => {
            let url = config
                .database
                .url
                .as_deref()
                .ok_or_else(|| anyhow!("DATABASE_URL is required for the postgres backend"))?;

            let db = PostgresDatabase::connect(url, config.database.max_connections)
                .await
                .context("failed to connect to Postgres")?;
            db.migrate().await.context("failed to apply migrations")?;

            if !config.seed_contents.is_empty() {
                warn!(
                    count = config.seed_contents.len(),
                    "[[content]] entries are only loaded by the memory backend; ignoring"
                );
            }

            let uow = AppUnitOfWork::postgres(&db);
            Ok(AppState::new(uow, Some(db), config))
        }
        StorageBackend::Memory => {
            let catalog = seed_catalog(&config.seed_contents);
            info!(
                contents = config.seed_contents.len(),
                "using in-memory storage"
            );
            let uow = AppUnitOfWork::in_memory(catalog);
            Ok(AppState::new(uow, None, config))
        }
    }
}

pub fn seed_catalog(seeds: &[ContentSeed]) -> InMemoryContentCatalog {
    InMemoryContentCatalog::seeded(seeds.iter().map(content_from_seed))
}

fn content_from_seed(seed: &ContentSeed) -> ContentSummary {
    ContentSummary {
        id: ContentId(seed.id),
        title: seed.title.clone(),
        thumbnail_url: seed.thumbnail_url.clone(),
        video_url: seed.video_url.clone(),
        duration: seed.duration,
    }
}
