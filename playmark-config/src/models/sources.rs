use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::CONFIG_PATH_VAR;
use crate::util::{non_blank, parse_bool, parse_csv};

use super::ContentSeed;

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    #[serde(default)]
    pub server: FileServerConfig,
    #[serde(default)]
    pub database: FileDatabaseConfig,
    #[serde(default)]
    pub storage: FileStorageConfig,
    #[serde(default)]
    pub auth: FileAuthConfig,
    #[serde(default)]
    pub cors: FileCorsConfig,
    pub dev_mode: Option<bool>,
    #[serde(default, rename = "content", skip_serializing_if = "Vec::is_empty")]
    pub contents: Vec<ContentSeed>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileDatabaseConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<u32>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileStorageConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileAuthConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jwt_secret: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileCorsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_origins: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_credentials: Option<bool>,
}

/// Environment-derived configuration values.
///
/// Numeric and boolean variables are kept raw so the loader can report a
/// malformed value instead of silently falling back.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub server_host: Option<String>,
    pub server_port: Option<String>,
    pub database_url: Option<String>,
    pub database_url_file: Option<PathBuf>,
    pub database_max_connections: Option<String>,
    pub storage_backend: Option<String>,
    pub jwt_secret: Option<String>,
    pub cors_allowed_origins: Option<Vec<String>>,
    pub cors_allow_credentials: Option<bool>,
    pub dev_mode: Option<bool>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| non_blank(lookup(key));
        Self {
            config_path: get(CONFIG_PATH_VAR).map(PathBuf::from),
            server_host: get("SERVER_HOST"),
            server_port: get("SERVER_PORT"),
            database_url: get("DATABASE_URL"),
            database_url_file: get("DATABASE_URL_FILE").map(PathBuf::from),
            database_max_connections: get("DATABASE_MAX_CONNECTIONS"),
            storage_backend: get("STORAGE_BACKEND"),
            jwt_secret: get("JWT_SECRET"),
            cors_allowed_origins: get("CORS_ALLOWED_ORIGINS")
                .map(|raw| parse_csv(&raw)),
            cors_allow_credentials: get("CORS_ALLOW_CREDENTIALS")
                .and_then(|raw| parse_bool(&raw)),
            dev_mode: get("DEV_MODE").and_then(|raw| parse_bool(&raw)),
        }
    }
}
