//! Playback bounded context: resume resolution and progress persistence.

pub mod history;
pub mod resolver;

pub use history::{
    DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT, ViewingHistoryService, clamp_limit,
};
pub use resolver::{ResolvedStream, StreamingResolver};
