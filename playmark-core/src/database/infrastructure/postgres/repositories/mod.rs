pub mod content_catalog;
pub mod viewing_history;
