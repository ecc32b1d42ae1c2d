pub mod player;
pub mod progress;
pub mod watch;
