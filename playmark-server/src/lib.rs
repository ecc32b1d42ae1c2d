//! HTTP surface of the Playmark viewing-progress engine.
//!
//! The binary in `main.rs` composes configuration, storage and the router;
//! everything it wires lives here so integration tests can build the same
//! application over the in-memory backend.

pub mod auth;
pub mod handlers;
pub mod infra;
pub mod routes;

pub use infra::app_state::AppState;
