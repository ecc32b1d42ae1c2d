use thiserror::Error;
use url::Url;

use crate::constants::MIN_SECRET_LENGTH;
use crate::models::{AuthConfig, Config, CorsConfig, StorageBackend};

#[derive(Debug, Error)]
pub enum ConfigGuardRailError {
    #[error("authentication secret {field} {reason}")]
    WeakSecret { field: &'static str, reason: String },
    #[error("CORS wildcard origins are not allowed when DEV_MODE is false")]
    DangerousCorsWildcard,
    #[error("invalid CORS configuration: {reason}")]
    InvalidCorsConfig { reason: String },
    #[error("STORAGE_BACKEND=postgres requires DATABASE_URL")]
    MissingDatabaseUrl,
    #[error("content seed {id} is invalid: {reason}")]
    InvalidContentSeed { id: i64, reason: String },
}

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigWarning> {
        self.items.iter()
    }
}

pub fn apply_guard_rails(
    config: &Config,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    if config.dev_mode {
        if config.auth.is_default_secret() {
            warnings.push_with_hint(
                "JWT_SECRET uses the built-in development value",
                "Set JWT_SECRET before exposing the server beyond localhost",
            );
        }
    } else {
        enforce_secret(&config.auth)?;
        if config.cors.is_wildcard_included() {
            return Err(ConfigGuardRailError::DangerousCorsWildcard);
        }
    }

    validate_cors(&config.cors)?;

    match config.storage {
        StorageBackend::Postgres => {
            if config.database.url.is_none() {
                return Err(ConfigGuardRailError::MissingDatabaseUrl);
            }
            if !config.seed_contents.is_empty() {
                warnings.push(
                    "content seeds are ignored by the postgres backend; the catalog table is authoritative",
                );
            }
        }
        StorageBackend::Memory => {
            warnings.push_with_hint(
                "STORAGE_BACKEND=memory; viewing history is lost on restart",
                "Use the postgres backend outside of local development",
            );
            if config.seed_contents.is_empty() {
                warnings.push(
                    "in-memory catalog has no [[content]] entries; every content id will be unknown",
                );
            }
        }
    }

    for seed in &config.seed_contents {
        if !seed.duration.is_finite() || seed.duration < 0.0 {
            return Err(ConfigGuardRailError::InvalidContentSeed {
                id: seed.id,
                reason: "duration must be a finite, non-negative number".into(),
            });
        }
    }

    if config.cors.allow_credentials && config.cors.is_wildcard_included() {
        warnings.push(
            "CORS credentials allowed alongside wildcard origin; browsers will reject such configuration",
        );
    }

    Ok(warnings)
}

fn enforce_secret(auth: &AuthConfig) -> Result<(), ConfigGuardRailError> {
    if auth.is_default_secret() {
        return Err(ConfigGuardRailError::WeakSecret {
            field: "JWT_SECRET",
            reason: "uses the default placeholder value".into(),
        });
    }

    if auth.jwt_secret.len() < MIN_SECRET_LENGTH {
        return Err(ConfigGuardRailError::WeakSecret {
            field: "JWT_SECRET",
            reason: format!("must be at least {MIN_SECRET_LENGTH} characters"),
        });
    }

    Ok(())
}

fn validate_cors(cors: &CorsConfig) -> Result<(), ConfigGuardRailError> {
    for origin in &cors.allowed_origins {
        let origin = origin.trim();
        if origin == "*" {
            continue;
        }
        let parsed = Url::parse(origin).map_err(|_| {
            ConfigGuardRailError::InvalidCorsConfig {
                reason: format!("invalid origin `{origin}` in CORS_ALLOWED_ORIGINS"),
            }
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigGuardRailError::InvalidCorsConfig {
                reason: format!("origin `{origin}` must use http or https"),
            });
        }
    }

    Ok(())
}
