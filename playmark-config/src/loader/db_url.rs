use std::{fs, path::Path};

use url::Url;

use crate::{
    ConfigLoadError,
    models::sources::{EnvConfig, FileDatabaseConfig},
};

/// Effective connection URL: `DATABASE_URL`, then `DATABASE_URL_FILE`, then
/// the file's `[database] url`. The result is parsed so a typo fails at
/// load time rather than at first connect.
pub fn resolve_database_url(
    env: &EnvConfig,
    file_database: &FileDatabaseConfig,
) -> Result<Option<String>, ConfigLoadError> {
    let raw = if let Some(url) = env.database_url.clone() {
        Some(url)
    } else if let Some(path) = env.database_url_file.as_ref() {
        read_secret_file(path)?
    } else {
        file_database
            .url
            .clone()
            .filter(|value| !value.trim().is_empty())
    };

    let Some(raw) = raw else {
        return Ok(None);
    };

    let parsed = Url::parse(raw.trim())
        .map_err(|source| ConfigLoadError::InvalidDatabaseUrl { source })?;
    if !matches!(parsed.scheme(), "postgres" | "postgresql") {
        return Err(ConfigLoadError::UnsupportedDatabaseScheme);
    }
    Ok(Some(parsed.to_string()))
}

fn read_secret_file(path: &Path) -> Result<Option<String>, ConfigLoadError> {
    let contents =
        fs::read_to_string(path).map_err(|source| ConfigLoadError::SecretFileIo {
            path: path.to_path_buf(),
            source,
        })?;
    let trimmed = contents.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        Ok(Some(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn env_url_beats_file_url() {
        let env = EnvConfig {
            database_url: Some("postgres://env@localhost/playmark".into()),
            ..EnvConfig::default()
        };
        let file = FileDatabaseConfig {
            url: Some("postgres://file@localhost/playmark".into()),
            max_connections: None,
        };
        let url = resolve_database_url(&env, &file).unwrap().unwrap();
        assert!(url.starts_with("postgres://env@"));
    }

    #[test]
    fn url_file_is_trimmed() {
        let mut secret = tempfile::NamedTempFile::new().unwrap();
        writeln!(secret, "  postgresql://app:pw@db:5432/playmark  ").unwrap();
        let env = EnvConfig {
            database_url_file: Some(secret.path().to_path_buf()),
            ..EnvConfig::default()
        };
        let url = resolve_database_url(&env, &FileDatabaseConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(url, "postgresql://app:pw@db:5432/playmark");
    }

    #[test]
    fn rejects_foreign_scheme() {
        let env = EnvConfig {
            database_url: Some("mysql://localhost/playmark".into()),
            ..EnvConfig::default()
        };
        let err = resolve_database_url(&env, &FileDatabaseConfig::default())
            .unwrap_err();
        assert!(matches!(err, ConfigLoadError::UnsupportedDatabaseScheme));
    }
}
