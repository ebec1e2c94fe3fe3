use super::*;

fn session(expires_at: i64) -> Session {
    Session {
        access_token: "tok".to_owned(),
        refresh_token: Some("ref".to_owned()),
        expires_at,
        user: AuthUser { id: "u1".to_owned(), email: Some("a@b.co".to_owned()) },
    }
}

#[test]
fn session_expiry_applies_margin() {
    let s = session(1_000);
    assert!(!s.is_expired_at(1_000 - EXPIRY_MARGIN_SECS - 1));
    assert!(s.is_expired_at(1_000 - EXPIRY_MARGIN_SECS));
    assert!(s.is_expired_at(2_000));
}

#[test]
fn session_round_trips_through_storage_json() {
    let s = session(42);
    let raw = serde_json::to_string(&s).unwrap();
    assert_eq!(serde_json::from_str::<Session>(&raw).unwrap(), s);
}

#[test]
fn user_without_email_deserializes() {
    let user: AuthUser = serde_json::from_str(r#"{"id":"u9","aud":"authenticated"}"#).unwrap();
    assert_eq!(user.id, "u9");
    assert_eq!(user.email, None);
}

#[test]
fn oauth_provider_identifiers() {
    assert_eq!(OAuthProvider::Google.as_str(), "google");
    assert_eq!(OAuthProvider::GitHub.as_str(), "github");
    assert_eq!(OAuthProvider::GitHub.label(), "GitHub");
}
