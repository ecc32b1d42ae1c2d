/// Placeholder signing secret; accepted only in dev mode.
pub const DEFAULT_JWT_SECRET: &str = "playmark-insecure-dev-secret";

/// Minimum length of a non-default signing secret outside dev mode.
pub const MIN_SECRET_LENGTH: usize = 32;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_VAR: &str = "PLAYMARK_CONFIG";
