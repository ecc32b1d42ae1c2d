//! # Playmark Core
//!
//! Server-side half of the viewing-progress engine: the durable
//! per-user-per-content progress store, the resume resolver, and the wire
//! contract shared with the player.
//!
//! ## Overview
//!
//! - **Viewing history**: last-write-wins upserts of one record per
//!   (user, content), with completion derived from a fixed ratio
//! - **Resume resolution**: streaming URL plus resume offset per session start
//! - **Read views**: continue-watching and full viewing history
//! - **Persistence**: async-trait repository ports with Postgres and
//!   in-memory adapters, aggregated by [`application::AppUnitOfWork`]
//! - **API contract**: route constants and request/response DTOs
//!
//! ## Feature Flags
//!
//! - `database`: Postgres adapters and embedded migrations (SQLx)
//! - `pg-tests`: Postgres-backed integration tests
//!
//! ## Examples
//!
//! ```no_run
//! use playmark_core::{
//!     application::AppUnitOfWork,
//!     database::infrastructure::memory::InMemoryContentCatalog,
//!     playback::{StreamingResolver, ViewingHistoryService},
//! };
//! use playmark_model::{ContentId, UserId};
//!
//! async fn resume() -> playmark_core::error::Result<f64> {
//!     let uow = AppUnitOfWork::in_memory(InMemoryContentCatalog::new());
//!     let history = ViewingHistoryService::from_unit_of_work(&uow);
//!     history.upsert_position(UserId(1), ContentId(7), 95.0).await?;
//!
//!     let resolver = StreamingResolver::from_unit_of_work(&uow);
//!     let resolved = resolver.resolve(ContentId(7), UserId(1)).await?;
//!     Ok(resolved.grant.resume_position)
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

/// Route constants and wire DTOs shared by server and player
pub mod api;

/// Application-level composition utilities (Unit of Work)
pub mod application;

/// Repository ports and their adapters
pub mod database;

#[cfg(feature = "database")]
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Error types and error handling utilities
pub mod error;

/// Resume resolution and progress persistence services
pub mod playback;

pub use error::{PlaybackError, Result};
