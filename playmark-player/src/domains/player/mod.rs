//! Media-element state for a single watch session.

pub mod state;

pub use state::{PlaybackClock, PlaybackSession};
