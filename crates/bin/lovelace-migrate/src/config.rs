//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `lovelace-migrate.toml` in the working directory unless a path
//! is given. Every field has a sensible default so the file is optional.
//! Environment variables take precedence over file values; command-line
//! flags are applied on top by the caller before [`Config::validate`].

use std::path::{Path, PathBuf};

use lovelace_adapter_source_http::{DEFAULT_ENDPOINT, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_SCHEME};
use lovelace_adapter_writer_fs::DEFAULT_BACKUP_SUFFIX;
use lovelace_domain::naming::DEFAULT_TITLE;
use serde::Deserialize;

/// File read when no `--config` is given.
pub const CONFIG_FILE: &str = "lovelace-migrate.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Home Assistant API location.
    pub source: SourceConfig,
    /// Output file settings.
    pub output: OutputConfig,
    /// Classification settings.
    pub migration: MigrationConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// API location used when the input is not a full URL.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// `http` or `https`.
    pub scheme: String,
    pub host: String,
    /// TCP port.
    pub port: u16,
    /// API path prefix (e.g. `/api`).
    pub endpoint: String,
}

/// Output file configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Destination of the rendered dashboard.
    pub path: PathBuf,
    /// Appended to the file name of the previous output when backing it up.
    pub backup_suffix: String,
}

/// Migration settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MigrationConfig {
    /// Title used when neither `--title` nor the location name is available.
    pub title: String,
    /// Domains left out of the dashboard.
    pub exclude_domains: Vec<String>,
    /// Leave out entities with `hidden: true`.
    pub skip_hidden: bool,
    /// Dedicated cards for cameras, media players, plants and weather.
    pub domain_cards: bool,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `path` (or `lovelace-migrate.toml` if present)
    /// then apply environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is malformed, or if an explicitly given
    /// file cannot be read.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path, true)?,
            None => Self::from_file(Path::new(CONFIG_FILE), false)?,
        };
        config.apply_env_overrides_from(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn from_file(path: &Path, required: bool) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound && !required => {
                Ok(Self::default())
            }
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    /// Apply `LOVELACE_MIGRATE_*` overrides read through `lookup`.
    ///
    /// `RUST_LOG` is not read here; it replaces the whole filter when the
    /// subscriber is installed.
    pub fn apply_env_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("LOVELACE_MIGRATE_SCHEME") {
            self.source.scheme = val;
        }
        if let Some(val) = lookup("LOVELACE_MIGRATE_HOST") {
            self.source.host = val;
        }
        if let Some(port) = lookup("LOVELACE_MIGRATE_PORT").and_then(|val| val.parse().ok()) {
            self.source.port = port;
        }
        if let Some(val) = lookup("LOVELACE_MIGRATE_ENDPOINT") {
            self.source.endpoint = val;
        }
        if let Some(val) = lookup("LOVELACE_MIGRATE_OUTPUT") {
            self.output.path = PathBuf::from(val);
        }
        if let Some(val) = lookup("LOVELACE_MIGRATE_BACKUP_SUFFIX") {
            self.output.backup_suffix = val;
        }
        if let Some(val) = lookup("LOVELACE_MIGRATE_TITLE") {
            self.migration.title = val;
        }
        if let Some(val) = lookup("LOVELACE_MIGRATE_EXCLUDE_DOMAINS") {
            self.migration.exclude_domains = val
                .split(',')
                .map(str::trim)
                .filter(|domain| !domain.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(skip) = lookup("LOVELACE_MIGRATE_SKIP_HIDDEN").and_then(|val| val.parse().ok()) {
            self.migration.skip_hidden = skip;
        }
        if let Some(enabled) = lookup("LOVELACE_MIGRATE_DOMAIN_CARDS").and_then(|val| val.parse().ok())
        {
            self.migration.domain_cards = enabled;
        }
        if let Some(val) = lookup("LOVELACE_MIGRATE_LOG") {
            self.logging.filter = val;
        }
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for a zero port, an empty output
    /// path or an empty backup suffix.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.output.path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "output path must not be empty".to_string(),
            ));
        }
        if self.output.backup_suffix.is_empty() {
            return Err(ConfigError::Validation(
                "backup suffix must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            scheme: DEFAULT_SCHEME.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("ui-lovelace.yaml"),
            backup_suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
        }
    }
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            exclude_domains: Vec::new(),
            skip_hidden: true,
            domain_cards: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "lovelace_migrate=info,lovelace=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
