use std::any::type_name;
use std::fmt;
use std::sync::Arc;

use crate::database::infrastructure::memory::{
    InMemoryContentCatalog, InMemoryViewingHistoryRepository,
};
#[cfg(feature = "database")]
use crate::database::infrastructure::postgres::{
    PostgresContentCatalog, PostgresViewingHistoryRepository,
};
#[cfg(feature = "database")]
use crate::database::postgres::PostgresDatabase;
use crate::database::ports::{
    content_catalog::ContentCatalog, viewing_history::ViewingHistoryRepository,
};

/// Concrete adapter type names, captured while the ports are still typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AdapterNames {
    viewing_history: &'static str,
    contents: &'static str,
}

/// Aggregates the repository ports used by the playback services.
#[derive(Clone)]
pub struct AppUnitOfWork {
    pub viewing_history: Arc<dyn ViewingHistoryRepository>,
    pub contents: Arc<dyn ContentCatalog>,
    adapters: AdapterNames,
}

impl fmt::Debug for AppUnitOfWork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppUnitOfWork")
            .field("viewing_history", &self.adapters.viewing_history)
            .field("contents", &self.adapters.contents)
            .finish()
    }
}

impl AppUnitOfWork {
    pub fn builder() -> AppUnitOfWorkBuilder {
        AppUnitOfWorkBuilder::new()
    }

    /// Process-local wiring over an already seeded catalog.
    pub fn in_memory(contents: InMemoryContentCatalog) -> Self {
        Self {
            viewing_history: Arc::new(InMemoryViewingHistoryRepository::new()),
            contents: Arc::new(contents),
            adapters: AdapterNames {
                viewing_history: type_name::<InMemoryViewingHistoryRepository>(),
                contents: type_name::<InMemoryContentCatalog>(),
            },
        }
    }

    #[cfg(feature = "database")]
    pub fn postgres(db: &PostgresDatabase) -> Self {
        Self {
            viewing_history: Arc::new(db.viewing_history()),
            contents: Arc::new(db.content_catalog()),
            adapters: AdapterNames {
                viewing_history: type_name::<PostgresViewingHistoryRepository>(),
                contents: type_name::<PostgresContentCatalog>(),
            },
        }
    }

    /// Type name of the viewing-history adapter in use.
    pub fn viewing_history_adapter(&self) -> &'static str {
        self.adapters.viewing_history
    }

    /// Type name of the content-catalog adapter in use.
    pub fn contents_adapter(&self) -> &'static str {
        self.adapters.contents
    }
}

#[derive(Default)]
pub struct AppUnitOfWorkBuilder {
    viewing_history: Option<(Arc<dyn ViewingHistoryRepository>, &'static str)>,
    contents: Option<(Arc<dyn ContentCatalog>, &'static str)>,
}

impl fmt::Debug for AppUnitOfWorkBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppUnitOfWorkBuilder")
            .field(
                "viewing_history",
                &self.viewing_history.as_ref().map(|(_, name)| *name),
            )
            .field("contents", &self.contents.as_ref().map(|(_, name)| *name))
            .finish()
    }
}

impl AppUnitOfWorkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_viewing_history<R>(mut self, repo: Arc<R>) -> Self
    where
        R: ViewingHistoryRepository + 'static,
    {
        let repo: Arc<dyn ViewingHistoryRepository> = repo;
        self.viewing_history = Some((repo, type_name::<R>()));
        self
    }

    pub fn with_contents<C>(mut self, repo: Arc<C>) -> Self
    where
        C: ContentCatalog + 'static,
    {
        let repo: Arc<dyn ContentCatalog> = repo;
        self.contents = Some((repo, type_name::<C>()));
        self
    }

    /// Build a validated AppUnitOfWork. Returns a string error if any required
    /// repository is missing.
    pub fn build(self) -> Result<AppUnitOfWork, String> {
        let (viewing_history, history_name) = self
            .viewing_history
            .ok_or_else(|| "missing ViewingHistoryRepository".to_string())?;
        let (contents, contents_name) = self
            .contents
            .ok_or_else(|| "missing ContentCatalog".to_string())?;

        Ok(AppUnitOfWork {
            viewing_history,
            contents,
            adapters: AdapterNames {
                viewing_history: history_name,
                contents: contents_name,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_reports_missing_port() {
        let err = AppUnitOfWork::builder()
            .with_contents(Arc::new(InMemoryContentCatalog::new()))
            .build()
            .unwrap_err();
        assert_eq!(err, "missing ViewingHistoryRepository");
    }

    #[test]
    fn debug_names_adapters() {
        let uow = AppUnitOfWork::in_memory(InMemoryContentCatalog::new());
        let rendered = format!("{uow:?}");
        assert!(rendered.contains("InMemoryViewingHistoryRepository"));
        assert!(rendered.contains("InMemoryContentCatalog"));
        assert!(
            uow.viewing_history_adapter()
                .ends_with("InMemoryViewingHistoryRepository")
        );
    }

    #[test]
    fn builder_records_custom_adapters() {
        let uow = AppUnitOfWork::builder()
            .with_viewing_history(Arc::new(InMemoryViewingHistoryRepository::new()))
            .with_contents(Arc::new(InMemoryContentCatalog::new()))
            .build()
            .unwrap();
        assert!(uow.contents_adapter().ends_with("InMemoryContentCatalog"));
    }
}
