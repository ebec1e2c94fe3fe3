//! Capability traits for the hosted backend.
//!
//! ARCHITECTURE
//! ============
//! Identity, table access and object storage are separate seams so screens
//! and services depend only on what they call. Futures are `?Send` because
//! browser fetches are bound to the event-loop thread; the trait objects
//! themselves stay `Send + Sync` so they can live in Leptos context.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::BackendError;
use super::events::{AuthListener, Subscription};
use super::query::Query;
use super::types::{OAuthProvider, Session, SignUpOutcome};

/// Identity endpoints plus the auth-change stream.
#[async_trait(?Send)]
pub trait IdentityBackend: Send + Sync {
    /// The session the backend currently considers active, if any.
    async fn current_session(&self) -> Result<Option<Session>, BackendError>;

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<(), BackendError>;

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, BackendError>;

    /// Start a redirect-based login. The session arrives after redirect-back.
    async fn sign_in_with_oauth(&self, provider: OAuthProvider, redirect_to: &str) -> Result<(), BackendError>;

    async fn sign_out(&self) -> Result<(), BackendError>;

    /// Register for session changes until the guard is released.
    fn subscribe(&self, listener: AuthListener) -> Subscription;
}

/// Row-level access to remote tables.
#[async_trait(?Send)]
pub trait DataBackend: Send + Sync {
    async fn select(&self, query: &Query) -> Result<Vec<Value>, BackendError>;

    /// Insert rows into `table`, returning them as stored.
    async fn insert(&self, table: &str, rows: Vec<Value>) -> Result<Vec<Value>, BackendError>;

    /// Apply `patch` to every row matched by `query`, returning the updated rows.
    async fn update(&self, query: &Query, patch: Value) -> Result<Vec<Value>, BackendError>;

    async fn delete(&self, query: &Query) -> Result<(), BackendError>;
}

/// Binary object storage for uploaded media.
#[async_trait(?Send)]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` under `path`, returning the public URL.
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, BackendError>;

    async fn remove(&self, path: &str) -> Result<(), BackendError>;
}

// =============================================================================
// TYPED HELPERS
// =============================================================================

/// Run `query` and decode every row.
///
/// # Errors
///
/// Propagates backend failures; rows that fail to decode yield `Decode`.
pub async fn fetch_all<T: DeserializeOwned>(data: &dyn DataBackend, query: &Query) -> Result<Vec<T>, BackendError> {
    let rows = data.select(query).await?;
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(BackendError::from))
        .collect()
}

/// Run `query` and decode the first row, if any.
///
/// # Errors
///
/// Propagates backend and decode failures.
pub async fn fetch_optional<T: DeserializeOwned>(data: &dyn DataBackend, query: &Query) -> Result<Option<T>, BackendError> {
    let query = query.clone().limit(1);
    let mut rows = fetch_all::<T>(data, &query).await?;
    Ok(if rows.is_empty() { None } else { Some(rows.swap_remove(0)) })
}

/// Insert one row and decode the stored representation.
///
/// # Errors
///
/// Propagates backend and decode failures, and `Decode` when the backend
/// returns no row.
pub async fn insert_one<T: DeserializeOwned, R: Serialize>(
    data: &dyn DataBackend,
    table: &str,
    row: &R,
) -> Result<T, BackendError> {
    let value = serde_json::to_value(row)?;
    let mut rows = data.insert(table, vec![value]).await?;
    if rows.is_empty() {
        return Err(BackendError::Decode(format!("insert into {table} returned no row")));
    }
    Ok(serde_json::from_value(rows.swap_remove(0))?)
}

/// Update the rows matched by `query` with a serialized patch.
///
/// # Errors
///
/// Propagates backend and decode failures.
pub async fn update_all<T: DeserializeOwned, P: Serialize>(
    data: &dyn DataBackend,
    query: &Query,
    patch: &P,
) -> Result<Vec<T>, BackendError> {
    let rows = data.update(query, serde_json::to_value(patch)?).await?;
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(BackendError::from))
        .collect()
}
