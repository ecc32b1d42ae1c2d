use std::{fmt, sync::Arc};

use playmark_config::Config;
use playmark_core::{
    application::AppUnitOfWork,
    database::PostgresDatabase,
    playback::{StreamingResolver, ViewingHistoryService},
};

use crate::auth::JwtKeys;

#[derive(Clone)]
pub struct AppState {
    pub unit_of_work: Arc<AppUnitOfWork>,
    pub resolver: Arc<StreamingResolver>,
    pub history: Arc<ViewingHistoryService>,
    /// Present only when the Postgres backend is active.
    pub postgres: Option<Arc<PostgresDatabase>>,
    pub tokens: Arc<JwtKeys>,
    pub config: Arc<Config>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("unit_of_work", &self.unit_of_work)
            .field("storage", &self.config.storage)
            .finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(
        unit_of_work: AppUnitOfWork,
        postgres: Option<PostgresDatabase>,
        config: Config,
    ) -> Self {
        let resolver = StreamingResolver::from_unit_of_work(&unit_of_work);
        let history = ViewingHistoryService::from_unit_of_work(&unit_of_work);
        let tokens = JwtKeys::from_secret(&config.auth.jwt_secret);

        Self {
            unit_of_work: Arc::new(unit_of_work),
            resolver: Arc::new(resolver),
            history: Arc::new(history),
            postgres: postgres.map(Arc::new),
            tokens: Arc::new(tokens),
            config: Arc::new(config),
        }
    }

    pub fn unit_of_work(&self) -> &AppUnitOfWork {
        &self.unit_of_work
    }
}
