//! Object-storage client for uploaded media.
//!
//! Images live in a storage bucket; media rows only keep the public URL and
//! the object path, never the image bytes.

#[cfg(test)]
#[path = "storage_client_test.rs"]
mod storage_client_test;

use std::sync::Arc;

use async_trait::async_trait;

use super::auth_client::AuthClient;
use super::backend::ObjectStore;
use super::error::BackendError;
#[cfg(not(feature = "hydrate"))]
use super::http::SSR_UNAVAILABLE;
#[cfg(feature = "hydrate")]
use super::http::{Payload, bearer, send};
use crate::config::BackendConfig;

/// Characters kept from a user-supplied file name; everything else becomes `-`.
pub(crate) fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') { c } else { '-' })
        .collect();
    let cleaned = cleaned.trim_matches(|c| c == '-' || c == '.');
    if cleaned.is_empty() { "image".to_owned() } else { cleaned.to_owned() }
}

/// Object path for a new upload: `{user}/{voyage}/{unique}-{file}`.
pub(crate) fn object_path(user_id: &str, voyage_id: i64, unique: &str, file_name: &str) -> String {
    format!("{user_id}/{voyage_id}/{unique}-{}", sanitize_file_name(file_name))
}

/// HTTP implementation of [`ObjectStore`].
pub struct StorageClient {
    config: BackendConfig,
    auth: Arc<AuthClient>,
}

impl StorageClient {
    pub fn new(config: BackendConfig, auth: Arc<AuthClient>) -> Self {
        Self { config, auth }
    }
}

#[async_trait(?Send)]
impl ObjectStore for StorageClient {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, BackendError> {
        #[cfg(feature = "hydrate")]
        {
            let token = self.auth.access_token().await?;
            let builder = gloo_net::http::Request::post(&self.config.object_endpoint(path))
                .header("apikey", &self.config.anon_key)
                .header("Authorization", &bearer(&token));
            send(builder, Payload::Bytes { bytes, content_type: content_type.to_owned() }).await?;
            Ok(self.config.public_object_url(path))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (path, bytes, content_type, &self.auth);
            Err(BackendError::Unavailable(SSR_UNAVAILABLE.to_owned()))
        }
    }

    async fn remove(&self, path: &str) -> Result<(), BackendError> {
        #[cfg(feature = "hydrate")]
        {
            let token = self.auth.access_token().await?;
            let builder = gloo_net::http::Request::delete(&self.config.object_endpoint(path))
                .header("apikey", &self.config.anon_key)
                .header("Authorization", &bearer(&token));
            send(builder, Payload::Empty).await?;
            Ok(())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (path, &self.config);
            Err(BackendError::Unavailable(SSR_UNAVAILABLE.to_owned()))
        }
    }
}
