//! Core data model definitions shared across Playmark crates.
#![allow(missing_docs)]

pub mod content;
pub mod error;
pub mod ids;
pub mod streaming;
pub mod watch;

pub use content::ContentSummary;
pub use error::{ModelError, Result as ModelResult};
pub use ids::{ContentId, UserId};
pub use streaming::StreamingGrant;
pub use watch::{
    COMPLETION_THRESHOLD, ViewingRecord, ViewingState, is_completed_at,
};
