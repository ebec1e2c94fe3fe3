//! Backend used when no usable configuration exists.
//!
//! Every call fails fast with the configuration problem, so screens show one
//! clear message instead of a stream of network errors.

use async_trait::async_trait;
use serde_json::Value;

use super::backend::{DataBackend, IdentityBackend, ObjectStore};
use super::error::BackendError;
use super::events::{AuthListener, Subscription};
use super::query::Query;
use super::types::{OAuthProvider, Session, SignUpOutcome};

pub struct OfflineBackend {
    reason: String,
}

impl OfflineBackend {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }

    fn unavailable<T>(&self) -> Result<T, BackendError> {
        Err(BackendError::Unavailable(self.reason.clone()))
    }
}

#[async_trait(?Send)]
impl IdentityBackend for OfflineBackend {
    async fn current_session(&self) -> Result<Option<Session>, BackendError> {
        self.unavailable()
    }

    async fn sign_in_with_password(&self, _email: &str, _password: &str) -> Result<(), BackendError> {
        self.unavailable()
    }

    async fn sign_up(&self, _email: &str, _password: &str) -> Result<SignUpOutcome, BackendError> {
        self.unavailable()
    }

    async fn sign_in_with_oauth(&self, _provider: OAuthProvider, _redirect_to: &str) -> Result<(), BackendError> {
        self.unavailable()
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        self.unavailable()
    }

    fn subscribe(&self, _listener: AuthListener) -> Subscription {
        Subscription::detached()
    }
}

#[async_trait(?Send)]
impl DataBackend for OfflineBackend {
    async fn select(&self, _query: &Query) -> Result<Vec<Value>, BackendError> {
        self.unavailable()
    }

    async fn insert(&self, _table: &str, _rows: Vec<Value>) -> Result<Vec<Value>, BackendError> {
        self.unavailable()
    }

    async fn update(&self, _query: &Query, _patch: Value) -> Result<Vec<Value>, BackendError> {
        self.unavailable()
    }

    async fn delete(&self, _query: &Query) -> Result<(), BackendError> {
        self.unavailable()
    }
}

#[async_trait(?Send)]
impl ObjectStore for OfflineBackend {
    async fn upload(&self, _path: &str, _bytes: Vec<u8>, _content_type: &str) -> Result<String, BackendError> {
        self.unavailable()
    }

    async fn remove(&self, _path: &str) -> Result<(), BackendError> {
        self.unavailable()
    }
}
