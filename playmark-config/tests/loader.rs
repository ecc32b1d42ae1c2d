use std::collections::HashMap;
use std::io::Write;

use playmark_config::models::sources::EnvConfig;
use playmark_config::{
    ConfigGuardRailError, ConfigLoadError, ConfigLoader, StorageBackend,
};
use tempfile::NamedTempFile;

const STRONG_SECRET: &str = "0123456789abcdef0123456789abcdef-test";

fn write_config(body: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp config");
    file.write_all(body.as_bytes()).expect("write config");
    file
}

fn env_from(pairs: &[(&str, &str)]) -> EnvConfig {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    EnvConfig::from_lookup(|key| map.get(key).cloned())
}

#[test]
fn environment_wins_over_file() {
    let file = write_config(&format!(
        r#"
        [server]
        host = "127.0.0.1"
        port = 4000

        [database]
        url = "postgres://file@localhost/playmark"
        max_connections = 3

        [auth]
        jwt_secret = "{STRONG_SECRET}"
        "#
    ));

    let env = env_from(&[
        ("SERVER_PORT", "5050"),
        ("DATABASE_URL", "postgres://env@localhost/playmark"),
    ]);
    let load = ConfigLoader::new()
        .with_config_path(file.path())
        .load_with_env(env)
        .unwrap();

    let config = load.config;
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 5050);
    assert_eq!(config.database.max_connections, 3);
    assert!(
        config
            .database
            .url
            .as_deref()
            .unwrap()
            .starts_with("postgres://env@")
    );
    assert_eq!(config.storage, StorageBackend::Postgres);
    assert_eq!(config.metadata.config_path.as_deref(), Some(file.path()));
}

#[test]
fn dotenv_values_feed_the_environment_snapshot() {
    let mut dotenv = NamedTempFile::new().unwrap();
    writeln!(dotenv, "STORAGE_BACKEND=memory").unwrap();
    writeln!(dotenv, "DEV_MODE=true").unwrap();
    writeln!(dotenv, "SERVER_PORT=8088").unwrap();

    let parsed: HashMap<String, String> = dotenvy::from_path_iter(dotenv.path())
        .unwrap()
        .map(|item| item.unwrap())
        .collect();
    let env = EnvConfig::from_lookup(|key| parsed.get(key).cloned());

    let load = ConfigLoader::new().load_with_env(env).unwrap();
    assert_eq!(load.config.storage, StorageBackend::Memory);
    assert!(load.config.dev_mode);
    assert_eq!(load.config.server.port, 8088);
}

#[test]
fn memory_backend_in_dev_mode_warns() {
    let file = write_config(
        r#"
        dev_mode = true

        [storage]
        backend = "memory"

        [[content]]
        id = 1
        title = "Pilot"
        video_url = "https://cdn.example.com/pilot.mp4"
        duration = 1200.0
        "#,
    );

    let load = ConfigLoader::new()
        .with_config_path(file.path())
        .load_with_env(EnvConfig::default())
        .unwrap();

    assert_eq!(load.config.seed_contents.len(), 1);
    assert_eq!(load.config.seed_contents[0].duration, 1200.0);
    let messages: Vec<&str> =
        load.warnings.iter().map(|w| w.message.as_str()).collect();
    assert!(messages.iter().any(|m| m.contains("STORAGE_BACKEND=memory")));
    assert!(messages.iter().any(|m| m.contains("JWT_SECRET")));
}

#[test]
fn default_secret_is_rejected_outside_dev_mode() {
    let env = env_from(&[
        ("STORAGE_BACKEND", "memory"),
        ("DATABASE_URL", "postgres://localhost/playmark"),
    ]);
    let err = ConfigLoader::new().load_with_env(env).unwrap_err();
    assert!(matches!(
        err,
        ConfigLoadError::GuardRail(ConfigGuardRailError::WeakSecret { .. })
    ));
}

#[test]
fn postgres_backend_requires_database_url() {
    let env = env_from(&[("JWT_SECRET", STRONG_SECRET)]);
    let err = ConfigLoader::new().load_with_env(env).unwrap_err();
    assert!(matches!(
        err,
        ConfigLoadError::GuardRail(ConfigGuardRailError::MissingDatabaseUrl)
    ));
}

#[test]
fn wildcard_cors_needs_dev_mode() {
    let env = env_from(&[
        ("JWT_SECRET", STRONG_SECRET),
        ("DATABASE_URL", "postgres://localhost/playmark"),
        ("CORS_ALLOWED_ORIGINS", "*"),
    ]);
    let err = ConfigLoader::new().load_with_env(env).unwrap_err();
    assert!(matches!(
        err,
        ConfigLoadError::GuardRail(ConfigGuardRailError::DangerousCorsWildcard)
    ));
}

#[test]
fn malformed_port_is_reported() {
    let env = env_from(&[("SERVER_PORT", "eighty")]);
    let err = ConfigLoader::new().load_with_env(env).unwrap_err();
    match err {
        ConfigLoadError::InvalidValue { key, value } => {
            assert_eq!(key, "SERVER_PORT");
            assert_eq!(value, "eighty");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn explicit_missing_file_is_an_error() {
    let err = ConfigLoader::new()
        .with_config_path("/definitely/not/here/playmark.toml")
        .load_with_env(EnvConfig::default())
        .unwrap_err();
    assert!(matches!(err, ConfigLoadError::MissingConfig { .. }));
}

#[test]
fn unparsable_toml_names_the_file() {
    let file = write_config("[server\nport = ");
    let err = ConfigLoader::new()
        .with_config_path(file.path())
        .load_with_env(EnvConfig::default())
        .unwrap_err();
    match err {
        ConfigLoadError::Parse { path, .. } => assert_eq!(path, file.path()),
        other => panic!("unexpected error: {other:?}"),
    }
}
