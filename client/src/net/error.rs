//! Backend error taxonomy shared by the auth, table and storage clients.
//!
//! ERROR HANDLING
//! ==============
//! Every backend call returns `BackendError`; screens render its `Display`
//! text directly, so messages stay human-readable and never include raw
//! response bodies.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use serde::Deserialize;

/// Failure surfaced by a backend call.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// The backend answered with a non-success status.
    #[error("{message}")]
    Rejected { status: u16, message: String },
    /// The request never produced a usable response.
    #[error("network error: {0}")]
    Transport(String),
    /// The response body did not match the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
    /// An operation that needs a signed-in user ran without one.
    #[error("you must be signed in")]
    NotSignedIn,
    /// The backend is not configured or not reachable from this environment.
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

impl BackendError {
    /// Build a rejection from an HTTP status and the raw response body.
    pub fn rejected(status: u16, body: &str) -> Self {
        Self::Rejected { status, message: rejection_message(status, body) }
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Union of the error body shapes returned by the auth and table endpoints.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

/// Extract the most specific human-readable message from an error body.
pub(crate) fn rejection_message(status: u16, body: &str) -> String {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    [parsed.message, parsed.msg, parsed.error_description, parsed.error]
        .into_iter()
        .flatten()
        .map(|m| m.trim().to_owned())
        .find(|m| !m.is_empty())
        .unwrap_or_else(|| format!("request failed: {status}"))
}
