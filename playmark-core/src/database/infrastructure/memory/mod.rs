//! In-process adapters used in dev mode and by tests.

mod content_catalog;
mod viewing_history;

pub use content_catalog::InMemoryContentCatalog;
pub use viewing_history::InMemoryViewingHistoryRepository;
