//! PostgreSQL infrastructure adapters implementing the database ports.

pub mod repositories;

pub use repositories::content_catalog::PostgresContentCatalog;
pub use repositories::viewing_history::PostgresViewingHistoryRepository;
