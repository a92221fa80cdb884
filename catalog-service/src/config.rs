use crate::utils::file::DEFAULT_CATALOG_PATH;
use std::num::NonZeroUsize;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 7004;
pub const DEFAULT_BOOKS_PER_PAGE: usize = 36;
pub const DEFAULT_SESSION_TTL_SECS: u64 = 30 * 60;
pub const DEFAULT_LOG_FILTER: &str = "catalog_service=info,tower_http=info";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("BOOKS_PER_PAGE must be a positive integer, got {0:?}")]
    InvalidPageSize(String),
    #[error("PORT must be a valid port number, got {0:?}")]
    InvalidPort(String),
    #[error("SESSION_TTL_SECS must be a positive number of seconds, got {0:?}")]
    InvalidSessionTtl(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub port: u16,
    pub catalog_path: String,
    pub books_per_page: NonZeroUsize,
    /// How long a browse session may sit idle before it is dropped.
    pub session_ttl: Duration,
    pub log_filter: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            catalog_path: DEFAULT_CATALOG_PATH.to_string(),
            books_per_page: NonZeroUsize::new(DEFAULT_BOOKS_PER_PAGE)
                .unwrap_or(NonZeroUsize::MIN),
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(value))?,
            None => defaults.port,
        };

        let books_per_page = match lookup("BOOKS_PER_PAGE") {
            Some(value) => value
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(NonZeroUsize::new)
                .ok_or(ConfigError::InvalidPageSize(value))?,
            None => defaults.books_per_page,
        };

        let session_ttl = match lookup("SESSION_TTL_SECS") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::InvalidSessionTtl(value))?,
            None => defaults.session_ttl,
        };

        Ok(Self {
            port,
            catalog_path: lookup("CATALOG_PATH").unwrap_or(defaults.catalog_path),
            books_per_page,
            session_ttl,
            log_filter: lookup("LOG_FILTER").unwrap_or(defaults.log_filter),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

/// Log filter to start tracing with, even when the rest of the config is invalid.
pub fn startup_log_filter(config: &Result<ServiceConfig, ConfigError>) -> &str {
    config
        .as_ref()
        .map(|config| config.log_filter.as_str())
        .unwrap_or(DEFAULT_LOG_FILTER)
}
