//! Repository ports (interfaces) the playback services depend on.
//! Implementations live under `database::infrastructure`.

pub mod content_catalog;
pub mod viewing_history;
