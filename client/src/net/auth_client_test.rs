use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::executor::block_on;

use super::*;

fn config() -> BackendConfig {
    BackendConfig::parse(Some("https://demo.supabase.co"), Some("anon"), None).unwrap()
}

// =============================================================
// Token responses
// =============================================================

#[test]
fn token_response_prefers_explicit_expiry() {
    let body = serde_json::json!({
        "access_token": "a",
        "token_type": "bearer",
        "expires_in": 3600,
        "expires_at": 1_700_000_000,
        "refresh_token": "r",
        "user": { "id": "u1", "email": "a@b.co" }
    });
    let token: TokenResponse = serde_json::from_value(body).unwrap();
    let session = token.into_session(5);
    assert_eq!(session.expires_at, 1_700_000_000);
    assert_eq!(session.refresh_token.as_deref(), Some("r"));
    assert_eq!(session.user.email.as_deref(), Some("a@b.co"));
}

#[test]
fn token_response_derives_expiry_from_lifetime() {
    let body = serde_json::json!({ "access_token": "a", "expires_in": 60, "user": { "id": "u1" } });
    let token: TokenResponse = serde_json::from_value(body).unwrap();
    assert_eq!(token.into_session(1_000).expires_at, 1_060);
}

#[test]
fn sign_up_with_session_signs_in() {
    let body = serde_json::json!({ "access_token": "a", "expires_in": 60, "user": { "id": "u1" } });
    let session = parse_sign_up(&body, 0).unwrap();
    assert_eq!(session.map(|s| s.user.id), Some("u1".to_owned()));
}

#[test]
fn sign_up_without_session_means_confirmation_sent() {
    let body = serde_json::json!({ "id": "u1", "email": "a@b.co", "confirmation_sent_at": "2024-01-01T00:00:00Z" });
    assert_eq!(parse_sign_up(&body, 0).unwrap(), None);
}

// =============================================================
// OAuth redirect
// =============================================================

#[test]
fn fragment_with_tokens_parses() {
    let tokens = parse_session_fragment("#access_token=abc&expires_in=120&refresh_token=def&token_type=bearer", 1_000)
        .unwrap();
    assert_eq!(
        tokens,
        FragmentTokens { access_token: "abc".to_owned(), refresh_token: Some("def".to_owned()), expires_at: 1_120 }
    );
}

#[test]
fn fragment_without_access_token_is_ignored() {
    assert_eq!(parse_session_fragment("", 0), None);
    assert_eq!(parse_session_fragment("#section-2", 0), None);
    assert_eq!(parse_session_fragment("#access_token=&expires_in=5", 0), None);
}

#[test]
fn fragment_tokens_become_session_with_user() {
    let tokens = parse_session_fragment("access_token=t&expires_at=99", 0).unwrap();
    let session = tokens.into_session(AuthUser { id: "u2".to_owned(), email: None });
    assert_eq!(session.expires_at, 99);
    assert_eq!(session.user.id, "u2");
}

#[test]
fn authorize_url_encodes_provider_and_redirect() {
    let url = authorize_url(&config(), OAuthProvider::GitHub, "http://localhost:3000/voyages");
    assert_eq!(
        url,
        "https://demo.supabase.co/auth/v1/authorize?provider=github&redirect_to=http%3A%2F%2Flocalhost%3A3000%2Fvoyages"
    );
}

// =============================================================
// Client outside the browser
// =============================================================

fn session(token: &str, expires_at: i64, refresh_token: Option<&str>) -> Session {
    Session {
        access_token: token.to_owned(),
        refresh_token: refresh_token.map(str::to_owned),
        expires_at,
        user: AuthUser { id: "u1".to_owned(), email: None },
    }
}

fn later() -> i64 {
    chrono::Utc::now().timestamp() + 3600
}

fn record_events(client: &AuthClient) -> (Arc<Mutex<Vec<AuthEvent>>>, Subscription) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let guard = client.subscribe(Arc::new(move |event, _| sink.lock().unwrap().push(event)));
    (events, guard)
}

#[test]
fn signed_out_client_uses_public_key_as_bearer() {
    let client = AuthClient::new(config());
    assert_eq!(block_on(client.access_token()), Ok("anon".to_owned()));
}

#[test]
fn live_session_token_is_sent_as_is() {
    let client = AuthClient::new(config());
    client.adopt(session("live", later(), Some("r")));
    assert_eq!(block_on(client.access_token()), Ok("live".to_owned()));
}

#[test]
fn expired_session_without_refresh_token_falls_back_to_public_key() {
    let client = AuthClient::new(config());
    let (events, _guard) = record_events(&client);
    client.adopt(session("stale", 0, None));

    assert_eq!(block_on(client.access_token()), Ok("anon".to_owned()));
    assert_eq!(*events.lock().unwrap(), vec![AuthEvent::SignedOut]);
    assert_eq!(client.cached(), None);
}

#[test]
fn expired_token_is_never_sent_when_refresh_cannot_run() {
    let client = AuthClient::new(config());
    client.adopt(session("stale", 0, Some("r")));

    let result = block_on(client.access_token());
    assert!(matches!(result, Err(BackendError::Unavailable(_))), "got {result:?}");
}

#[test]
fn successful_refresh_replaces_the_token() {
    let client = AuthClient::new(config());
    let (events, _guard) = record_events(&client);
    client.adopt(session("stale", 0, Some("r")));

    let refreshed = session("fresh", later(), Some("r2"));
    assert_eq!(client.settle_refresh(Ok(refreshed.clone())), Ok(Some(refreshed)));
    assert_eq!(*events.lock().unwrap(), vec![AuthEvent::TokenRefreshed]);
    assert_eq!(block_on(client.access_token()), Ok("fresh".to_owned()));
}

#[test]
fn rejected_refresh_signs_out() {
    let client = AuthClient::new(config());
    let (events, _guard) = record_events(&client);
    client.adopt(session("stale", 0, Some("revoked")));

    let rejected = BackendError::Rejected { status: 400, message: "Invalid Refresh Token".to_owned() };
    assert_eq!(client.settle_refresh(Err(rejected)), Ok(None));
    assert_eq!(*events.lock().unwrap(), vec![AuthEvent::SignedOut]);
    assert_eq!(block_on(client.access_token()), Ok("anon".to_owned()));
}

#[test]
fn server_side_session_lookup_is_empty() {
    let client = AuthClient::new(config());
    assert_eq!(block_on(client.current_session()), Ok(None));
}

#[test]
fn server_side_password_login_is_unavailable() {
    let client = AuthClient::new(config());
    let result = block_on(client.sign_in_with_password("a@b.co", "abc123!"));
    assert!(matches!(result, Err(BackendError::Unavailable(_))));
}

#[test]
fn sign_out_notifies_subscribers() {
    let client = AuthClient::new(config());
    let count = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&count);
    let _guard = client.subscribe(Arc::new(move |event, session| {
        assert_eq!(event, AuthEvent::SignedOut);
        assert!(session.is_none());
        seen.fetch_add(1, Ordering::SeqCst);
    }));
    block_on(client.sign_out()).unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn failed_logout_keeps_the_session() {
    let client = AuthClient::new(config());
    let (events, _guard) = record_events(&client);
    client.adopt(session("live", later(), Some("r")));

    let result = block_on(client.sign_out());
    assert!(result.is_err());
    assert!(events.lock().unwrap().is_empty());
    assert_eq!(client.cached().map(|s| s.access_token), Some("live".to_owned()));
}

#[test]
fn logout_transport_error_is_reported_without_signing_out() {
    let client = AuthClient::new(config());
    client.adopt(session("live", later(), None));

    let err = BackendError::Transport("offline".to_owned());
    assert_eq!(client.settle_sign_out(Err(err.clone())), Err(err));
    assert!(client.cached().is_some());
}

#[test]
fn confirmed_logout_clears_the_session() {
    let client = AuthClient::new(config());
    let (events, _guard) = record_events(&client);
    client.adopt(session("live", later(), None));

    assert_eq!(client.settle_sign_out(Ok(())), Ok(()));
    assert_eq!(*events.lock().unwrap(), vec![AuthEvent::SignedOut]);
    assert_eq!(client.cached(), None);
}

#[test]
fn logout_of_an_already_revoked_token_clears_the_session() {
    let client = AuthClient::new(config());
    client.adopt(session("gone", later(), None));

    let rejected = BackendError::Rejected { status: 401, message: "invalid JWT".to_owned() };
    assert_eq!(client.settle_sign_out(Err(rejected)), Ok(()));
    assert_eq!(client.cached(), None);
}
