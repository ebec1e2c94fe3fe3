//! Browser HTTP plumbing shared by the auth, table and storage clients.
//!
//! Every request carries the public `apikey` header plus a bearer token (the
//! signed-in user's access token, or the public key when signed out). Only
//! the `hydrate` build performs requests; server rendering answers with
//! `BackendError::Unavailable`.

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

#[cfg(any(test, feature = "hydrate"))]
use super::error::BackendError;

#[cfg(not(feature = "hydrate"))]
pub(crate) const SSR_UNAVAILABLE: &str = "not available during server rendering";

/// Value of the `Authorization` header for the given token.
#[cfg(any(test, feature = "hydrate"))]
pub(crate) fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

#[cfg(feature = "hydrate")]
pub(crate) enum Payload {
    Empty,
    Json(serde_json::Value),
    Bytes { bytes: Vec<u8>, content_type: String },
}

#[cfg(feature = "hydrate")]
fn transport(err: impl std::fmt::Display) -> BackendError {
    BackendError::Transport(err.to_string())
}

/// Send a prepared request and return the body of a successful response.
///
/// # Errors
///
/// `Transport` when the request cannot be built or sent, `Rejected` for a
/// non-2xx status.
#[cfg(feature = "hydrate")]
pub(crate) async fn send(builder: gloo_net::http::RequestBuilder, payload: Payload) -> Result<String, BackendError> {
    let request = match payload {
        Payload::Empty => builder.build(),
        Payload::Json(value) => builder.json(&value),
        Payload::Bytes { bytes, content_type } => builder
            .header("Content-Type", &content_type)
            .body(js_sys::Uint8Array::from(bytes.as_slice())),
    }
    .map_err(transport)?;

    let resp = request.send().await.map_err(transport)?;
    let status = resp.status();
    let body = resp.text().await.map_err(transport)?;
    if !resp.ok() {
        return Err(BackendError::rejected(status, &body));
    }
    Ok(body)
}

/// Parse a JSON response body, treating an empty body as `null`.
///
/// # Errors
///
/// `Decode` when the body is not valid JSON for `T`.
#[cfg(any(test, feature = "hydrate"))]
pub(crate) fn parse_body<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, BackendError> {
    let body = if body.trim().is_empty() { "null" } else { body };
    Ok(serde_json::from_str(body)?)
}
