//! Configuration file parsing and structures.
//!
//! catpoint reads an optional TOML file. Every section has defaults, so an
//! empty file (or no file at all) yields a working in-place setup: a JSON
//! repository next to the working directory and a camera that never sees a
//! cat.

use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use catpoint_image::ClassifierConfig;
use serde::Deserialize;
use serde::Serialize;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::filter::Targets;

use crate::security::RepositoryError;
use crate::security::SecurityRepository;
use crate::store::FileRepository;
use crate::store::MemoryRepository;

/// Top-level configuration structure
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub repository: RepositoryConfig,

    #[serde(default)]
    pub camera: CameraConfig,
}

#[derive(Debug, Default, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default)]
    pub level: LogLevel,

    /// Per-target levels, e.g. `"catpoint::security" = "debug"`
    #[serde(default)]
    pub overrides: HashMap<String, LogLevel>,
}

impl LoggingConfig {
    /// Build the subscriber filter for this logging configuration
    pub fn targets(&self) -> Targets {
        self.overrides.iter().fold(
            Targets::new().with_default(LevelFilter::from(self.level)),
            |targets, (target, level)| {
                targets.with_target(target.clone(), LevelFilter::from(*level))
            },
        )
    }
}

fn default_repository_path() -> PathBuf {
    PathBuf::from("catpoint.json")
}

/// Where sensors and statuses are kept
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RepositoryConfig {
    /// Lost when the process exits
    Memory,

    /// JSON document on disk
    File {
        #[serde(default = "default_repository_path")]
        path: PathBuf,
    },
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self::File {
            path: default_repository_path(),
        }
    }
}

impl RepositoryConfig {
    /// Open the configured repository
    pub fn open(&self) -> Result<Box<dyn SecurityRepository>, RepositoryError> {
        match self {
            Self::Memory => Ok(Box::new(MemoryRepository::new())),
            Self::File { path } => Ok(Box::new(FileRepository::open(path)?)),
        }
    }
}

fn default_scan_interval_secs() -> u64 {
    10
}

/// Camera settings
#[derive(Debug, Deserialize)]
pub struct CameraConfig {
    /// Seconds between image scans when running as a daemon
    #[serde(default = "default_scan_interval_secs")]
    pub scan_interval_secs: u64,

    #[serde(default)]
    pub classifier: ClassifierConfig,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            scan_interval_secs: default_scan_interval_secs(),
            classifier: ClassifierConfig::default(),
        }
    }
}

impl CameraConfig {
    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval_secs.max(1))
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(path.as_ref().to_path_buf(), e))?;

        toml::from_str(&contents).map_err(ConfigError::Parse)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_parse_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.logging.level, LogLevel::Info);
        assert!(config.logging.overrides.is_empty());
        assert_eq!(config.repository, RepositoryConfig::default());
        assert_eq!(config.camera.scan_interval_secs, 10);
        assert_eq!(config.camera.classifier, ClassifierConfig::Fixed { cat: false });
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
            [logging]
            level = "debug"

            [logging.overrides]
            "catpoint::store" = "trace"

            [repository]
            kind = "file"
            path = "/var/lib/catpoint/state.json"

            [camera]
            scan_interval_secs = 3

            [camera.classifier]
            kind = "scripted"
            sequence = [false, false, true]
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(
            config.logging.overrides.get("catpoint::store"),
            Some(&LogLevel::Trace)
        );
        assert_eq!(
            config.repository,
            RepositoryConfig::File {
                path: PathBuf::from("/var/lib/catpoint/state.json")
            }
        );
        assert_eq!(config.camera.scan_interval(), Duration::from_secs(3));
        assert_eq!(
            config.camera.classifier,
            ClassifierConfig::Scripted {
                sequence: vec![false, false, true]
            }
        );
    }

    #[test]
    fn test_parse_memory_repository() {
        let config: Config = toml::from_str(
            r#"
            [repository]
            kind = "memory"
            "#,
        )
        .unwrap();
        assert_eq!(config.repository, RepositoryConfig::Memory);

        let repo = config.repository.open().unwrap();
        assert!(repo.sensors().unwrap().is_empty());
    }

    #[test]
    fn test_file_repository_default_path() {
        let config: Config = toml::from_str(
            r#"
            [repository]
            kind = "file"
            "#,
        )
        .unwrap();
        assert_eq!(config.repository, RepositoryConfig::default());
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let result: Result<Config, _> = toml::from_str(
            r#"
            [logging]
            level = "loud"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_scan_interval_is_clamped() {
        let config: Config = toml::from_str(
            r#"
            [camera]
            scan_interval_secs = 0
            "#,
        )
        .unwrap();
        assert_eq!(config.camera.scan_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("catpoint.toml");
        fs::write(&path, "[logging]\nlevel = \"warn\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.logging.level, LogLevel::Warn);
    }

    #[test]
    fn test_missing_file_error() {
        let err = Config::from_file("/nonexistent/catpoint.toml").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Failed to read config file"));
        assert!(msg.contains("/nonexistent/catpoint.toml"));
    }
}
