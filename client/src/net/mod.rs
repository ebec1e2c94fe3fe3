//! Networking modules for the hosted backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `backend` defines the capability traits, `auth_client` / `rest_client` /
//! `storage_client` implement them over HTTP, and `Backend` bundles one
//! instance of each. The app builds a single `Backend` at startup and
//! provides it through context; no screen constructs its own client.

pub mod auth_client;
pub mod backend;
pub mod error;
pub mod events;
mod http;
#[cfg(test)]
pub(crate) mod memory;
pub mod offline;
pub mod query;
pub mod rest_client;
pub mod session_storage;
pub mod storage_client;
pub mod types;

use std::sync::Arc;

use self::auth_client::AuthClient;
use self::backend::{DataBackend, IdentityBackend, ObjectStore};
use self::offline::OfflineBackend;
use self::rest_client::RestClient;
use self::storage_client::StorageClient;
use crate::config::{BackendConfig, ConfigError};

/// One shared handle per backend capability.
#[derive(Clone)]
pub struct Backend {
    pub identity: Arc<dyn IdentityBackend>,
    pub data: Arc<dyn DataBackend>,
    pub objects: Arc<dyn ObjectStore>,
}

impl Backend {
    /// HTTP clients sharing one auth client (and therefore one session).
    pub fn connect(config: BackendConfig) -> Self {
        let auth = Arc::new(AuthClient::new(config.clone()));
        let data = Arc::new(RestClient::new(config.clone(), Arc::clone(&auth)));
        let objects = Arc::new(StorageClient::new(config, Arc::clone(&auth)));
        Self { identity: auth, data, objects }
    }

    /// A backend whose every call reports `reason`.
    pub fn offline(reason: impl Into<String>) -> Self {
        let offline = Arc::new(OfflineBackend::new(reason));
        Self { identity: offline.clone(), data: offline.clone(), objects: offline }
    }

    /// Connect when configuration resolved, otherwise go offline with its error.
    pub fn from_config(config: Result<BackendConfig, ConfigError>) -> Self {
        match config {
            Ok(config) => Self::connect(config),
            Err(e) => {
                log::warn!("backend not configured: {e}");
                Self::offline(e.to_string())
            }
        }
    }
}
