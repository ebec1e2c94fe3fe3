//! Backend configuration: the hosted backend's base URL and public API key.
//!
//! SYSTEM CONTEXT
//! ==============
//! The SSR host reads these values from its environment and injects them into
//! the HTML shell as `<meta>` tags. At hydration the client reads the tags
//! back; when they are absent it falls back to values captured at build time.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

pub const URL_ENV: &str = "TRAVEL_LOG_BACKEND_URL";
pub const ANON_KEY_ENV: &str = "TRAVEL_LOG_BACKEND_ANON_KEY";
pub const STORAGE_BUCKET_ENV: &str = "TRAVEL_LOG_STORAGE_BUCKET";

pub const URL_META: &str = "travel-log-backend-url";
pub const ANON_KEY_META: &str = "travel-log-backend-anon-key";
pub const STORAGE_BUCKET_META: &str = "travel-log-storage-bucket";

pub const DEFAULT_STORAGE_BUCKET: &str = "medias";

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} is not set")]
    Missing { name: &'static str },
    #[error("{name} is not a valid http(s) URL: {value}")]
    InvalidUrl { name: &'static str, value: String },
}

/// Connection settings for the identity, table and storage endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL without a trailing slash, e.g. `https://xyz.supabase.co`.
    pub url: String,
    /// Public (anon) API key sent as `apikey` on every request.
    pub anon_key: String,
    /// Object-storage bucket holding uploaded media.
    pub storage_bucket: String,
}

impl BackendConfig {
    /// Validate raw values into a config. Blank values count as missing.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the URL or key is missing, or the URL is not
    /// an absolute `http`/`https` URL.
    pub fn parse(url: Option<&str>, anon_key: Option<&str>, storage_bucket: Option<&str>) -> Result<Self, ConfigError> {
        let url = non_blank(url).ok_or(ConfigError::Missing { name: URL_ENV })?;
        let anon_key = non_blank(anon_key).ok_or(ConfigError::Missing { name: ANON_KEY_ENV })?;

        let parsed = url::Url::parse(url).map_err(|_| ConfigError::InvalidUrl { name: URL_ENV, value: url.to_owned() })?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(ConfigError::InvalidUrl { name: URL_ENV, value: url.to_owned() });
        }

        Ok(Self {
            url: url.trim_end_matches('/').to_owned(),
            anon_key: anon_key.to_owned(),
            storage_bucket: non_blank(storage_bucket).unwrap_or(DEFAULT_STORAGE_BUCKET).to_owned(),
        })
    }

    /// Resolve the config for the running client.
    ///
    /// # Errors
    ///
    /// Returns the build-time lookup error when neither source is usable.
    pub fn load() -> Result<Self, ConfigError> {
        #[cfg(feature = "hydrate")]
        {
            if let Ok(config) = Self::from_document() {
                return Ok(config);
            }
        }
        Self::from_build_env()
    }

    /// Values captured by `option_env!` when the crate was compiled.
    ///
    /// # Errors
    ///
    /// Same as [`BackendConfig::parse`].
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::parse(
            option_env!("TRAVEL_LOG_BACKEND_URL"),
            option_env!("TRAVEL_LOG_BACKEND_ANON_KEY"),
            option_env!("TRAVEL_LOG_STORAGE_BUCKET"),
        )
    }

    #[cfg(feature = "hydrate")]
    fn from_document() -> Result<Self, ConfigError> {
        let url = read_meta(URL_META);
        let key = read_meta(ANON_KEY_META);
        let bucket = read_meta(STORAGE_BUCKET_META);
        Self::parse(url.as_deref(), key.as_deref(), bucket.as_deref())
    }

    /// `{url}/auth/v1/{path}`
    pub fn auth_endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.url, path.trim_start_matches('/'))
    }

    /// `{url}/rest/v1/{table}`
    pub fn table_endpoint(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.url)
    }

    /// Upload/delete endpoint for an object in the media bucket.
    pub fn object_endpoint(&self, path: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.url, self.storage_bucket, path.trim_start_matches('/'))
    }

    /// Public URL under which an uploaded object is served.
    pub fn public_object_url(&self, path: &str) -> String {
        format!("{}/storage/v1/object/public/{}/{}", self.url, self.storage_bucket, path.trim_start_matches('/'))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(feature = "hydrate")]
fn read_meta(name: &str) -> Option<String> {
    use wasm_bindgen::JsCast as _;

    let doc = web_sys::window()?.document()?;
    let el = doc.query_selector(&format!("meta[name=\"{name}\"]")).ok()??;
    let meta = el.dyn_into::<web_sys::HtmlMetaElement>().ok()?;
    Some(meta.content())
}
