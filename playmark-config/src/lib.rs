//! Configuration library for the Playmark server.
//!
//! Loads `.env`, an optional `playmark.toml` and the process environment
//! into a single [`Config`], then applies guard rails that either reject
//! unsafe combinations or report them as [`ConfigWarnings`].

pub mod constants;
pub mod loader;
pub mod models;
pub mod util;
pub mod validation;

pub use loader::{
    ConfigLoad, ConfigLoader, ConfigLoaderOptions, error::ConfigLoadError,
};
pub use models::{
    AuthConfig, Config, ConfigMetadata, ContentSeed, CorsConfig,
    DatabaseConfig, ServerConfig, StorageBackend,
};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
