//! Identity client for the backend's GoTrue-compatible auth endpoints.
//!
//! SYSTEM CONTEXT
//! ==============
//! This is the only place a session is created, refreshed or destroyed.
//! Every change is written to browser storage and pushed through
//! `AuthEvents`, which the session provider subscribes to exactly once.
//!
//! OAuth logins leave the page; the backend redirects back with the tokens in
//! the URL fragment, which `current_session` exchanges for a session on the
//! next load.

#[cfg(test)]
#[path = "auth_client_test.rs"]
mod auth_client_test;

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
#[cfg(any(test, feature = "hydrate"))]
use serde::Deserialize;

use super::backend::IdentityBackend;
use super::error::BackendError;
use super::events::{AuthEvents, AuthListener, Subscription};
#[cfg(feature = "hydrate")]
use super::http::{Payload, bearer, parse_body, send};
#[cfg(not(feature = "hydrate"))]
use super::http::SSR_UNAVAILABLE;
use super::session_storage;
#[cfg(any(test, feature = "hydrate"))]
use super::types::AuthUser;
use super::types::{AuthEvent, OAuthProvider, Session, SignUpOutcome};
use crate::config::BackendConfig;

/// Lifetime assumed when a token response omits both expiry fields.
#[cfg(any(test, feature = "hydrate"))]
const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

/// Token grant response (`/token`, and `/signup` when no confirmation is needed).
#[cfg(any(test, feature = "hydrate"))]
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: AuthUser,
}

#[cfg(any(test, feature = "hydrate"))]
impl TokenResponse {
    pub(crate) fn into_session(self, now_secs: i64) -> Session {
        let expires_at = self
            .expires_at
            .unwrap_or_else(|| now_secs + self.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS));
        Session { access_token: self.access_token, refresh_token: self.refresh_token, expires_at, user: self.user }
    }
}

/// Tokens carried in the URL fragment after an OAuth redirect-back.
#[cfg(any(test, feature = "hydrate"))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct FragmentTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: i64,
}

#[cfg(any(test, feature = "hydrate"))]
impl FragmentTokens {
    pub(crate) fn into_session(self, user: AuthUser) -> Session {
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at: self.expires_at,
            user,
        }
    }
}

/// Parse `#access_token=…&refresh_token=…&expires_in=…` fragments.
#[cfg(any(test, feature = "hydrate"))]
pub(crate) fn parse_session_fragment(fragment: &str, now_secs: i64) -> Option<FragmentTokens> {
    let raw = fragment.trim_start_matches('#');
    let mut access_token = None;
    let mut refresh_token = None;
    let mut expires_in = None;
    let mut expires_at = None;
    for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
        match key.as_ref() {
            "access_token" => access_token = Some(value.into_owned()),
            "refresh_token" => refresh_token = Some(value.into_owned()),
            "expires_in" => expires_in = value.parse::<i64>().ok(),
            "expires_at" => expires_at = value.parse::<i64>().ok(),
            _ => {}
        }
    }
    let access_token = access_token.filter(|t| !t.is_empty())?;
    let expires_at = expires_at.unwrap_or_else(|| now_secs + expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS));
    Some(FragmentTokens { access_token, refresh_token, expires_at })
}

/// Interpret a `/signup` response: a session when the account is active,
/// nothing when a confirmation email was sent instead.
#[cfg(any(test, feature = "hydrate"))]
pub(crate) fn parse_sign_up(body: &serde_json::Value, now_secs: i64) -> Result<Option<Session>, BackendError> {
    if body.get("access_token").is_some() {
        let token: TokenResponse = serde_json::from_value(body.clone())?;
        return Ok(Some(token.into_session(now_secs)));
    }
    Ok(None)
}

/// Authorize URL that starts a redirect-based login.
pub(crate) fn authorize_url(config: &BackendConfig, provider: OAuthProvider, redirect_to: &str) -> String {
    let base = config.auth_endpoint("authorize");
    match url::Url::parse_with_params(&base, [("provider", provider.as_str()), ("redirect_to", redirect_to)]) {
        Ok(url) => url.into(),
        Err(_) => base,
    }
}

#[cfg(feature = "hydrate")]
fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Identity client holding the in-memory copy of the current session.
pub struct AuthClient {
    config: BackendConfig,
    session: Mutex<Option<Session>>,
    events: AuthEvents,
    /// Serializes refreshes so concurrent requests spend the refresh token once.
    refreshing: futures::lock::Mutex<()>,
}

impl AuthClient {
    pub fn new(config: BackendConfig) -> Self {
        Self {
            config,
            session: Mutex::new(None),
            events: AuthEvents::new(),
            refreshing: futures::lock::Mutex::new(()),
        }
    }

    /// Bearer token for data requests: the user's token, or the public key.
    ///
    /// An expired session is refreshed first, so a stale token is never sent.
    /// A rejected refresh signs out and falls back to the public key.
    ///
    /// # Errors
    ///
    /// Whatever the refresh grant fails with, other than a rejection.
    pub async fn access_token(&self) -> Result<String, BackendError> {
        let Some(session) = self.cached() else {
            return Ok(self.config.anon_key.clone());
        };
        if !session.is_expired() {
            return Ok(session.access_token);
        }
        let session = self.refresh_cached().await?;
        Ok(session.map_or_else(|| self.config.anon_key.clone(), |s| s.access_token))
    }

    /// Refresh the cached session unless another caller already did.
    async fn refresh_cached(&self) -> Result<Option<Session>, BackendError> {
        let _turn = self.refreshing.lock().await;
        match self.cached() {
            Some(session) if !session.is_expired() => Ok(Some(session)),
            Some(stale) => self.refresh(stale).await,
            None => Ok(None),
        }
    }

    fn cached(&self) -> Option<Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Replace the session everywhere it is kept, then notify subscribers.
    fn commit(&self, event: AuthEvent, session: Option<Session>) {
        match &session {
            Some(s) => session_storage::save(s),
            None => session_storage::clear(),
        }
        self.session.lock().unwrap_or_else(PoisonError::into_inner).clone_from(&session);
        log::debug!("auth change: {event:?}");
        self.events.emit(event, session.as_ref());
    }

    /// Adopt a stored session without notifying (initial restore).
    fn adopt(&self, session: Session) {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = Some(session);
    }

    #[cfg(feature = "hydrate")]
    async fn grant(&self, grant_type: &str, payload: serde_json::Value) -> Result<Session, BackendError> {
        let url = self.config.auth_endpoint(&format!("token?grant_type={grant_type}"));
        let builder = gloo_net::http::Request::post(&url).header("apikey", &self.config.anon_key);
        let body = send(builder, Payload::Json(payload)).await?;
        let token: TokenResponse = parse_body(&body)?;
        Ok(token.into_session(now_secs()))
    }

    #[cfg(not(feature = "hydrate"))]
    async fn grant(&self, grant_type: &str, payload: serde_json::Value) -> Result<Session, BackendError> {
        let _ = (grant_type, payload);
        Err(BackendError::Unavailable(SSR_UNAVAILABLE.to_owned()))
    }

    /// Revoke `access_token` on the backend.
    #[cfg(feature = "hydrate")]
    async fn revoke(&self, access_token: &str) -> Result<(), BackendError> {
        let builder = gloo_net::http::Request::post(&self.config.auth_endpoint("logout"))
            .header("apikey", &self.config.anon_key)
            .header("Authorization", &bearer(access_token));
        send(builder, Payload::Empty).await.map(|_| ())
    }

    #[cfg(not(feature = "hydrate"))]
    async fn revoke(&self, access_token: &str) -> Result<(), BackendError> {
        let _ = access_token;
        Err(BackendError::Unavailable(SSR_UNAVAILABLE.to_owned()))
    }

    #[cfg(feature = "hydrate")]
    async fn fetch_user(&self, access_token: &str) -> Result<AuthUser, BackendError> {
        let builder = gloo_net::http::Request::get(&self.config.auth_endpoint("user"))
            .header("apikey", &self.config.anon_key)
            .header("Authorization", &bearer(access_token));
        let body = send(builder, Payload::Empty).await?;
        parse_body(&body)
    }

    /// Exchange OAuth redirect-back tokens, then strip them from the address bar.
    #[cfg(feature = "hydrate")]
    async fn take_redirect_session(&self) -> Result<Option<Session>, BackendError> {
        let Some(window) = web_sys::window() else {
            return Ok(None);
        };
        let hash = window.location().hash().unwrap_or_default();
        let Some(tokens) = parse_session_fragment(&hash, now_secs()) else {
            return Ok(None);
        };
        if let Ok(history) = window.history() {
            let path = window.location().pathname().unwrap_or_else(|_| "/".to_owned());
            let search = window.location().search().unwrap_or_default();
            let _ = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&format!("{path}{search}")));
        }
        let user = self.fetch_user(&tokens.access_token).await?;
        Ok(Some(tokens.into_session(user)))
    }

    /// Refresh an expired stored session; a rejected refresh signs out.
    async fn refresh(&self, stored: Session) -> Result<Option<Session>, BackendError> {
        let Some(refresh_token) = stored.refresh_token else {
            self.commit(AuthEvent::SignedOut, None);
            return Ok(None);
        };
        let outcome = self
            .grant("refresh_token", serde_json::json!({ "refresh_token": refresh_token }))
            .await;
        self.settle_refresh(outcome)
    }

    fn settle_refresh(&self, outcome: Result<Session, BackendError>) -> Result<Option<Session>, BackendError> {
        match outcome {
            Ok(session) => {
                self.commit(AuthEvent::TokenRefreshed, Some(session.clone()));
                Ok(Some(session))
            }
            Err(BackendError::Rejected { .. }) => {
                self.commit(AuthEvent::SignedOut, None);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Apply the backend's answer to a logout. The local session is only
    /// dropped once the backend no longer honours the token.
    fn settle_sign_out(&self, result: Result<(), BackendError>) -> Result<(), BackendError> {
        match result {
            Ok(()) | Err(BackendError::Rejected { status: 401 | 403 | 404, .. }) => {
                self.commit(AuthEvent::SignedOut, None);
                Ok(())
            }
            Err(e) => {
                log::warn!("logout failed, keeping the session: {e}");
                Err(e)
            }
        }
    }
}

#[async_trait(?Send)]
impl IdentityBackend for AuthClient {
    async fn current_session(&self) -> Result<Option<Session>, BackendError> {
        if let Some(session) = self.cached().filter(|s| !s.is_expired()) {
            return Ok(Some(session));
        }
        #[cfg(feature = "hydrate")]
        {
            if let Some(session) = self.take_redirect_session().await? {
                self.commit(AuthEvent::SignedIn, Some(session.clone()));
                return Ok(Some(session));
            }
            let Some(stored) = self.cached().or_else(session_storage::load) else {
                return Ok(None);
            };
            if stored.is_expired() {
                let _turn = self.refreshing.lock().await;
                return self.refresh(stored).await;
            }
            self.adopt(stored.clone());
            Ok(Some(stored))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            match session_storage::load() {
                Some(stored) if !stored.is_expired() => {
                    self.adopt(stored.clone());
                    Ok(Some(stored))
                }
                _ => Ok(None),
            }
        }
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<(), BackendError> {
        #[cfg(feature = "hydrate")]
        {
            let session = self
                .grant("password", serde_json::json!({ "email": email, "password": password }))
                .await?;
            self.commit(AuthEvent::SignedIn, Some(session));
            Ok(())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (email, password);
            Err(BackendError::Unavailable(SSR_UNAVAILABLE.to_owned()))
        }
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, BackendError> {
        #[cfg(feature = "hydrate")]
        {
            let builder = gloo_net::http::Request::post(&self.config.auth_endpoint("signup"))
                .header("apikey", &self.config.anon_key);
            let payload = serde_json::json!({ "email": email, "password": password });
            let body = send(builder, Payload::Json(payload)).await?;
            let value: serde_json::Value = parse_body(&body)?;
            match parse_sign_up(&value, now_secs())? {
                Some(session) => {
                    self.commit(AuthEvent::SignedIn, Some(session));
                    Ok(SignUpOutcome::SignedIn)
                }
                None => Ok(SignUpOutcome::ConfirmationSent),
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (email, password);
            Err(BackendError::Unavailable(SSR_UNAVAILABLE.to_owned()))
        }
    }

    async fn sign_in_with_oauth(&self, provider: OAuthProvider, redirect_to: &str) -> Result<(), BackendError> {
        let url = authorize_url(&self.config, provider, redirect_to);
        #[cfg(feature = "hydrate")]
        {
            let window = web_sys::window().ok_or_else(|| BackendError::Unavailable("no browser window".to_owned()))?;
            window
                .location()
                .set_href(&url)
                .map_err(|_| BackendError::Transport("could not start the OAuth redirect".to_owned()))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = url;
            Err(BackendError::Unavailable(SSR_UNAVAILABLE.to_owned()))
        }
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        let result = match self.cached() {
            Some(session) => self.revoke(&session.access_token).await,
            None => Ok(()),
        };
        self.settle_sign_out(result)
    }

    fn subscribe(&self, listener: AuthListener) -> Subscription {
        self.events.subscribe(listener)
    }
}
