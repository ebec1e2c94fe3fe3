//! Server configuration parsed from environment variables.
//!
//! Required for a working app:
//! - `TRAVEL_LOG_BACKEND_URL`, `TRAVEL_LOG_BACKEND_ANON_KEY`
//!
//! Optional:
//! - `TRAVEL_LOG_STORAGE_BUCKET`: default `medias`
//! - `PORT`: default 3000
//!
//! A missing or malformed backend config does not stop the server: the shell
//! is rendered without backend `<meta>` tags and the client reports the
//! problem itself.

use client::config::{ANON_KEY_ENV, BackendConfig, ConfigError, STORAGE_BUCKET_ENV, URL_ENV};

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("invalid PORT: {0}")]
    InvalidPort(String),
    #[error("leptos configuration: {0}")]
    Leptos(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub backend: Result<BackendConfig, ConfigError>,
}

impl ServerConfig {
    /// # Errors
    ///
    /// Returns an error when `PORT` is set but not a port number.
    pub fn from_env() -> Result<Self, ServerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error when `PORT` is set but not a port number.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ServerError> {
        let port = match lookup("PORT") {
            Some(raw) if !raw.trim().is_empty() => {
                raw.trim().parse::<u16>().map_err(|_| ServerError::InvalidPort(raw.clone()))?
            }
            _ => DEFAULT_PORT,
        };
        let backend = BackendConfig::parse(
            lookup(URL_ENV).as_deref(),
            lookup(ANON_KEY_ENV).as_deref(),
            lookup(STORAGE_BUCKET_ENV).as_deref(),
        );
        Ok(Self { port, backend })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
