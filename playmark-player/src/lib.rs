//! Playmark Player library
//!
//! Client half of the viewing-progress engine. A [`WatchController`]
//! owns one watch session: it resolves where to stream from and where to
//! resume, reports the position on a fixed interval while playing, and sends
//! the final position once when the session ends.
//!
//! All progress writes are best effort. They run in the background, are
//! never retried, and failures only show up in logs and [`DeliveryStats`].
//!
//! [`WatchController`]: domains::watch::WatchController
//! [`DeliveryStats`]: domains::progress::DeliveryStats

pub mod domains;
pub mod infra;

pub use domains::progress::{PlaybackGateway, ReporterConfig};
pub use domains::watch::WatchController;
pub use infra::ApiClient;
