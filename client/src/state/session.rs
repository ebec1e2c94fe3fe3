//! Process-wide authentication session for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! The app root builds one `SessionProvider`, calls `initialize` once after
//! hydration and `teardown` on cleanup. Route guards and user-aware screens
//! read `SessionState` snapshots through a context signal that the provider's
//! observer keeps current.
//!
//! DESIGN
//! ======
//! The provider never writes the session after a login or signup call; the
//! identity backend's change notifications are the single writer. Login and
//! signup only validate input and report failures as display strings.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::net::backend::IdentityBackend;
use crate::net::events::Subscription;
use crate::net::types::{AuthUser, OAuthProvider, Session, SignUpOutcome};

/// Snapshot of what the app knows about the current session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionState {
    pub session: Option<Session>,
    /// True until the first session lookup settles.
    pub loading: bool,
    /// Set when the session lookup itself failed.
    pub error: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self { session: None, loading: true, error: None }
    }
}

impl SessionState {
    pub fn user(&self) -> Option<&AuthUser> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn user_id(&self) -> Option<String> {
        self.user().map(|u| u.id.clone())
    }
}

// =============================================================================
// CREDENTIAL POLICY
// =============================================================================

/// Local checks applied before credentials are sent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CredentialPolicy {
    /// Non-empty email and password.
    Minimal,
    /// Email shaped like `local@domain.tld`; password of 6+ characters with a
    /// digit and a symbol.
    #[default]
    Hardened,
}

pub const MIN_PASSWORD_LEN: usize = 6;

/// Check an already-trimmed email address.
///
/// # Errors
///
/// Returns the message to show next to the field.
pub fn validate_email(policy: CredentialPolicy, email: &str) -> Result<(), &'static str> {
    if email.is_empty() {
        return Err("Email is required.");
    }
    if policy == CredentialPolicy::Minimal {
        return Ok(());
    }
    if email.chars().any(char::is_whitespace) {
        return Err("Enter a valid email address.");
    }
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err("Enter a valid email address.");
    };
    // With both ends checked, any remaining dot is an inner one.
    if local.is_empty() || !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err("Enter a valid email address.");
    }
    Ok(())
}

/// Check a password.
///
/// # Errors
///
/// Returns the message to show next to the field.
pub fn validate_password(policy: CredentialPolicy, password: &str) -> Result<(), &'static str> {
    if password.is_empty() {
        return Err("Password is required.");
    }
    if policy == CredentialPolicy::Minimal {
        return Ok(());
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Password must be at least 6 characters.");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("Password must contain at least one digit.");
    }
    if password.chars().all(char::is_alphanumeric) {
        return Err("Password must contain at least one symbol.");
    }
    Ok(())
}

/// Trim the email and run both field checks.
///
/// # Errors
///
/// Returns the first failing field's message.
pub fn validate_credentials(policy: CredentialPolicy, email: &str, password: &str) -> Result<String, &'static str> {
    let email = email.trim();
    validate_email(policy, email)?;
    validate_password(policy, password)?;
    Ok(email.to_owned())
}

// =============================================================================
// PROVIDER
// =============================================================================

/// Called with every new snapshot; the app root forwards it into a signal.
pub type SessionObserver = Arc<dyn Fn(&SessionState) + Send + Sync>;

/// Owner of the session and of the single auth-change subscription.
pub struct SessionProvider {
    identity: Arc<dyn IdentityBackend>,
    policy: CredentialPolicy,
    state: Arc<Mutex<SessionState>>,
    observer: Option<SessionObserver>,
    subscription: Mutex<Option<Subscription>>,
    initialized: AtomicBool,
}

impl SessionProvider {
    pub fn new(identity: Arc<dyn IdentityBackend>, policy: CredentialPolicy) -> Self {
        Self {
            identity,
            policy,
            state: Arc::new(Mutex::new(SessionState::default())),
            observer: None,
            subscription: Mutex::new(None),
            initialized: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn with_observer(mut self, observer: SessionObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn policy(&self) -> CredentialPolicy {
        self.policy
    }

    pub fn snapshot(&self) -> SessionState {
        lock(&self.state).clone()
    }

    /// Subscribe to session changes and look up the current session.
    ///
    /// Only the first call does anything.
    pub async fn initialize(&self) {
        if self.initialized.swap(true, Ordering::SeqCst) {
            return;
        }
        self.subscribe();
        self.lookup().await;
    }

    /// Re-run the session lookup after a failed one.
    pub async fn retry(&self) {
        self.lookup().await;
    }

    /// Validate, then submit an email/password login.
    ///
    /// # Errors
    ///
    /// Returns the validation message or the backend's rejection message.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), String> {
        let email = validate_credentials(self.policy, email, password)?;
        self.identity
            .sign_in_with_password(&email, password)
            .await
            .map_err(|e| e.to_string())
    }

    /// Validate, then submit an account creation.
    ///
    /// # Errors
    ///
    /// Returns the validation message or the backend's rejection message.
    pub async fn signup(&self, email: &str, password: &str) -> Result<SignUpOutcome, String> {
        let email = validate_credentials(self.policy, email, password)?;
        self.identity.sign_up(&email, password).await.map_err(|e| e.to_string())
    }

    /// Start a provider login that comes back to `{origin}/voyages`.
    ///
    /// # Errors
    ///
    /// Returns a message when the redirect could not be started.
    pub async fn login_with_oauth(&self, provider: OAuthProvider, origin: &str) -> Result<(), String> {
        let redirect_to = oauth_redirect_target(origin);
        self.identity
            .sign_in_with_oauth(provider, &redirect_to)
            .await
            .map_err(|e| e.to_string())
    }

    /// Ask the backend to end the session.
    ///
    /// # Errors
    ///
    /// Returns the backend's message when the request failed.
    pub async fn logout(&self) -> Result<(), String> {
        self.identity.sign_out().await.map_err(|e| e.to_string())
    }

    /// Release the auth-change subscription.
    pub fn teardown(&self) {
        if let Some(subscription) = lock(&self.subscription).take() {
            subscription.unsubscribe();
            log::debug!("session provider unsubscribed");
        }
    }

    pub fn is_subscribed(&self) -> bool {
        lock(&self.subscription).is_some()
    }

    fn subscribe(&self) {
        let state = Arc::clone(&self.state);
        let observer = self.observer.clone();
        let subscription = self.identity.subscribe(Arc::new(move |event, session| {
            log::debug!("auth event {event:?}");
            let snapshot = {
                let mut state = lock(&state);
                state.session = session.cloned();
                state.loading = false;
                state.error = None;
                state.clone()
            };
            if let Some(observer) = &observer {
                observer(&snapshot);
            }
        }));
        *lock(&self.subscription) = Some(subscription);
    }

    async fn lookup(&self) {
        self.apply(|state| {
            state.loading = true;
            state.error = None;
        });
        let result = self.identity.current_session().await;
        self.apply(|state| {
            state.loading = false;
            match result {
                Ok(session) => state.session = session,
                Err(e) => {
                    log::warn!("session lookup failed: {e}");
                    state.session = None;
                    state.error = Some(e.to_string());
                }
            }
        });
    }

    fn apply(&self, f: impl FnOnce(&mut SessionState)) {
        let snapshot = {
            let mut state = lock(&self.state);
            f(&mut state);
            state.clone()
        };
        if let Some(observer) = &self.observer {
            observer(&snapshot);
        }
    }
}

impl Drop for SessionProvider {
    fn drop(&mut self) {
        self.teardown();
    }
}

pub fn oauth_redirect_target(origin: &str) -> String {
    format!("{}/voyages", origin.trim_end_matches('/'))
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
