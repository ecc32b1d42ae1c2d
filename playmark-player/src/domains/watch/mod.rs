//! Watch-view lifecycle.

pub mod controller;

pub use controller::WatchController;
