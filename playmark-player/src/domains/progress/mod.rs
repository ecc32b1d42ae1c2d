//! Progress reporting for a watch session: periodic heartbeats while
//! playing and one terminal write when the session ends.

pub mod dispatcher;
pub mod finalizer;
pub mod gateway;
pub mod reporter;

pub use dispatcher::{BestEffortDispatcher, DeliveryStats};
pub use finalizer::{FinalizeOutcome, SessionFinalizer};
pub use gateway::PlaybackGateway;
pub use reporter::{
    DEFAULT_HEARTBEAT_INTERVAL, PositionReporter, ReporterConfig, ReporterState,
};
