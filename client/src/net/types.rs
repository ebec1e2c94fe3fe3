//! Identity DTOs exchanged with the auth endpoints.
//!
//! DESIGN
//! ======
//! `Session` is the client's own shape (stored in browser storage and held
//! by the session provider); token responses from the backend are converted
//! into it by the auth client.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// Seconds before the real expiry at which a session is treated as expired,
/// so a request never leaves with a token about to lapse.
pub const EXPIRY_MARGIN_SECS: i64 = 30;

/// Identity embedded in a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// Backend user id (UUID string).
    pub id: String,
    /// Email address, absent for some OAuth identities.
    #[serde(default)]
    pub email: Option<String>,
}

/// The authenticated-identity credential bundle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Expiry in Unix seconds.
    pub expires_at: i64,
    pub user: AuthUser,
}

impl Session {
    pub fn is_expired_at(&self, now_secs: i64) -> bool {
        now_secs >= self.expires_at - EXPIRY_MARGIN_SECS
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(chrono::Utc::now().timestamp())
    }
}

/// Third-party identity providers offered on the login screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OAuthProvider {
    Google,
    GitHub,
}

impl OAuthProvider {
    pub const ALL: [Self; 2] = [Self::Google, Self::GitHub];

    /// Provider identifier expected by the authorize endpoint.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::GitHub => "github",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Google => "Google",
            Self::GitHub => "GitHub",
        }
    }
}

/// Kind of change pushed to auth subscribers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn,
    SignedOut,
    TokenRefreshed,
}

/// Result of an account creation request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// The account is active and a session was issued.
    SignedIn,
    /// The account must be confirmed from the email that was just sent.
    ConfirmationSent,
}
