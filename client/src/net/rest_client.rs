//! Table client for the backend's PostgREST-compatible endpoints.
//!
//! Reads and writes carry the signed-in user's token so the backend's row
//! policies apply; mutations ask for `return=representation` so callers get
//! the stored rows back.

#[cfg(test)]
#[path = "rest_client_test.rs"]
mod rest_client_test;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::auth_client::AuthClient;
use super::backend::DataBackend;
use super::error::BackendError;
#[cfg(not(feature = "hydrate"))]
use super::http::SSR_UNAVAILABLE;
#[cfg(feature = "hydrate")]
use super::http::{Payload, bearer, parse_body, send};
use super::query::Query;
use crate::config::BackendConfig;

/// URL for reading rows matched by `query`, including order and limit.
pub(crate) fn select_url(config: &BackendConfig, query: &Query) -> String {
    build_url(config, query.table(), query.to_params())
}

/// URL for mutating rows matched by `query`; only the filters apply.
pub(crate) fn mutation_url(config: &BackendConfig, query: &Query) -> String {
    build_url(config, query.table(), query.filter_params())
}

fn build_url(config: &BackendConfig, table: &str, params: Vec<(String, String)>) -> String {
    let base = config.table_endpoint(table);
    let Ok(mut url) = url::Url::parse(&base) else {
        return base;
    };
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("select", "*");
        for (key, value) in &params {
            pairs.append_pair(key, value);
        }
    }
    url.into()
}

/// Unfiltered updates and deletes would touch the whole table; refuse them.
pub(crate) fn require_filters(query: &Query, action: &str) -> Result<(), BackendError> {
    if query.filters().is_empty() {
        return Err(BackendError::Rejected {
            status: 400,
            message: format!("refusing to {action} {} without a filter", query.table()),
        });
    }
    Ok(())
}

/// HTTP implementation of [`DataBackend`].
pub struct RestClient {
    config: BackendConfig,
    auth: Arc<AuthClient>,
}

impl RestClient {
    pub fn new(config: BackendConfig, auth: Arc<AuthClient>) -> Self {
        Self { config, auth }
    }

    /// Attach the public key and a fresh bearer token.
    #[cfg(feature = "hydrate")]
    async fn authorize(
        &self,
        builder: gloo_net::http::RequestBuilder,
    ) -> Result<gloo_net::http::RequestBuilder, BackendError> {
        let token = self.auth.access_token().await?;
        Ok(builder.header("apikey", &self.config.anon_key).header("Authorization", &bearer(&token)))
    }
}

#[async_trait(?Send)]
impl DataBackend for RestClient {
    async fn select(&self, query: &Query) -> Result<Vec<Value>, BackendError> {
        let url = select_url(&self.config, query);
        #[cfg(feature = "hydrate")]
        {
            let body = send(self.authorize(gloo_net::http::Request::get(&url)).await?, Payload::Empty).await?;
            parse_body(&body)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (url, &self.auth);
            Err(BackendError::Unavailable(SSR_UNAVAILABLE.to_owned()))
        }
    }

    async fn insert(&self, table: &str, rows: Vec<Value>) -> Result<Vec<Value>, BackendError> {
        let url = build_url(&self.config, table, Vec::new());
        #[cfg(feature = "hydrate")]
        {
            let builder = self
                .authorize(gloo_net::http::Request::post(&url))
                .await?
                .header("Prefer", "return=representation");
            let body = send(builder, Payload::Json(Value::Array(rows))).await?;
            parse_body(&body)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (url, rows);
            Err(BackendError::Unavailable(SSR_UNAVAILABLE.to_owned()))
        }
    }

    async fn update(&self, query: &Query, patch: Value) -> Result<Vec<Value>, BackendError> {
        require_filters(query, "update")?;
        let url = mutation_url(&self.config, query);
        #[cfg(feature = "hydrate")]
        {
            let builder = self
                .authorize(gloo_net::http::Request::patch(&url))
                .await?
                .header("Prefer", "return=representation");
            let body = send(builder, Payload::Json(patch)).await?;
            parse_body(&body)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (url, patch);
            Err(BackendError::Unavailable(SSR_UNAVAILABLE.to_owned()))
        }
    }

    async fn delete(&self, query: &Query) -> Result<(), BackendError> {
        require_filters(query, "delete")?;
        let url = mutation_url(&self.config, query);
        #[cfg(feature = "hydrate")]
        {
            send(self.authorize(gloo_net::http::Request::delete(&url)).await?, Payload::Empty).await?;
            Ok(())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = url;
            Err(BackendError::Unavailable(SSR_UNAVAILABLE.to_owned()))
        }
    }
}
