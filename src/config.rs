//! Runtime configuration for hosts embedding the issue store.
//!
//! Settings come from `TODO_*` environment variables or a JSON document, and
//! fall back to an in-memory store with `info` logging.

use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// Environment variable selecting the storage backend.
pub const BACKEND_ENV: &str = "TODO_BACKEND";
/// Environment variable holding the `PostgreSQL` connection URL.
pub const DATABASE_URL_ENV: &str = "TODO_DATABASE_URL";
/// Environment variable holding the connection pool size.
pub const POOL_SIZE_ENV: &str = "TODO_POOL_SIZE";
/// Environment variable holding the `tracing` filter directive.
pub const LOG_ENV: &str = "TODO_LOG";

const DEFAULT_POOL_SIZE: u32 = 8;
const DEFAULT_LOG_FILTER: &str = "info";

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A setting has an unusable value.
    #[error("invalid value '{value}' for {field}: {reason}")]
    InvalidValue {
        /// Setting name.
        field: &'static str,
        /// Rejected value.
        value: String,
        /// Why the value was rejected.
        reason: &'static str,
    },

    /// The `postgres` backend was selected without a database URL.
    #[error("the postgres backend requires TODO_DATABASE_URL to be set")]
    MissingDatabaseUrl,

    /// A JSON configuration document could not be parsed.
    #[error("invalid configuration document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Storage backend behind the issue repository port.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Process-local storage; lists are lost on restart.
    #[default]
    Memory,
    /// Durable `PostgreSQL` storage.
    Postgres,
}

impl BackendKind {
    /// Returns the configuration spelling of the backend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Postgres => "postgres",
        }
    }
}

impl TryFrom<&str> for BackendKind {
    type Error = ConfigError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            _ => Err(ConfigError::InvalidValue {
                field: BACKEND_ENV,
                value: value.to_owned(),
                reason: "expected 'memory' or 'postgres'",
            }),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issue store settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Storage backend.
    pub backend: BackendKind,
    /// `PostgreSQL` connection URL, required for the `postgres` backend.
    pub database_url: Option<String>,
    /// Maximum number of pooled database connections.
    pub pool_size: u32,
    /// `tracing` filter directive, for example `info,todobot=debug`.
    pub log_filter: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Memory,
            database_url: None,
            pool_size: DEFAULT_POOL_SIZE,
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
        }
    }
}

impl StoreConfig {
    /// Loads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is invalid or the resulting
    /// settings fail [`validate`](Self::validate).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads settings through a variable lookup function.
    ///
    /// Unset or blank variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is invalid or the resulting
    /// settings fail [`validate`](Self::validate).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(backend) = read(BACKEND_ENV) {
            config.backend = BackendKind::try_from(backend.as_str())?;
        }
        if let Some(url) = read(DATABASE_URL_ENV) {
            config.database_url = Some(url.trim().to_owned());
        }
        if let Some(size) = read(POOL_SIZE_ENV) {
            config.pool_size = size
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue {
                    field: POOL_SIZE_ENV,
                    value: size.clone(),
                    reason: "expected a positive integer",
                })?;
        }
        if let Some(filter) = read(LOG_ENV) {
            config.log_filter = filter.trim().to_owned();
        }

        config.validate()?;
        Ok(config)
    }

    /// Parses settings from a JSON document; missing fields keep defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed documents or unknown
    /// fields, and any [`validate`](Self::validate) failure.
    pub fn from_json(document: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(document)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a zero pool size and
    /// [`ConfigError::MissingDatabaseUrl`] when `postgres` lacks a URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pool_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: POOL_SIZE_ENV,
                value: self.pool_size.to_string(),
                reason: "expected a positive integer",
            });
        }
        if self.backend == BackendKind::Postgres && self.database_url.is_none() {
            return Err(ConfigError::MissingDatabaseUrl);
        }
        Ok(())
    }
}
