//! Process configuration.
//!
//! # Responsibility
//! - Select the storage backend and locate the database file.
//! - Carry logging preferences.
//!
//! # Invariants
//! - Missing sections and fields fall back to defaults; an unreadable or
//!   unparseable file is an error, not a silent default.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::str::FromStr;

/// Storage backend selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageMode {
    /// Map-backed store; state is lost when the process exits.
    Memory,
    /// SQLite database file.
    Database,
}

impl FromStr for StorageMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "database" => Ok(Self::Database),
            other => Err(format!(
                "unsupported storage mode `{other}`; expected memory|database"
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite database file path, used in database mode.
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "memodate.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level; falls back to the build-mode default when unset.
    pub level: Option<String>,
    /// Log directory; file logging is skipped when unset.
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageMode,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageMode::Database,
            database: DatabaseConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref()).map_err(|err| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            source: err,
        })?;
        toml::from_str(&text).map_err(|err| ConfigError::Parse {
            path: path.as_ref().display().to_string(),
            source: err,
        })
    }
}

/// Error loading or parsing the configuration file.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: String,
        source: std::io::Error,
    },
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read config file `{path}`: {source}")
            }
            Self::Parse { path, source } => {
                write!(f, "cannot parse config file `{path}`: {source}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, StorageMode};

    #[test]
    fn defaults_select_database_storage() {
        let config = Config::default();
        assert_eq!(config.storage, StorageMode::Database);
        assert_eq!(config.database.path, "memodate.db");
        assert!(config.logging.level.is_none());
    }

    #[test]
    fn parses_full_config() {
        let config: Config = toml::from_str(
            r#"
            storage = "memory"

            [database]
            path = "/tmp/dates.db"

            [logging]
            level = "debug"
            dir = "/tmp/logs"
            "#,
        )
        .unwrap();
        assert_eq!(config.storage, StorageMode::Memory);
        assert_eq!(config.database.path, "/tmp/dates.db");
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
        assert_eq!(config.logging.dir.as_deref(), Some("/tmp/logs"));
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config: Config = toml::from_str("storage = \"memory\"").unwrap();
        assert_eq!(config.storage, StorageMode::Memory);
        assert_eq!(config.database.path, "memodate.db");
    }

    #[test]
    fn storage_mode_parses_case_insensitively() {
        assert_eq!("Memory".parse::<StorageMode>(), Ok(StorageMode::Memory));
        assert_eq!(
            " DATABASE ".parse::<StorageMode>(),
            Ok(StorageMode::Database)
        );
        assert!("postgres".parse::<StorageMode>().is_err());
    }

    #[test]
    fn unknown_toml_is_a_parse_error() {
        assert!(toml::from_str::<Config>("storage = \"redis\"").is_err());
    }
}
