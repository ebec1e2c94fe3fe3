use std::sync::atomic::AtomicUsize;

use futures::executor::block_on;

use super::*;
use crate::net::memory::{MemoryBackend, session_for};
use crate::net::types::AuthEvent;

fn provider(memory: &Arc<MemoryBackend>) -> SessionProvider {
    SessionProvider::new(memory.clone(), CredentialPolicy::Hardened)
}

// =============================================================================
// VALIDATION
// =============================================================================

#[test]
fn hardened_email_rejects_missing_at_sign() {
    assert_eq!(validate_email(CredentialPolicy::Hardened, "abc"), Err("Enter a valid email address."));
}

#[test]
fn hardened_email_requires_domain_with_inner_dot() {
    let policy = CredentialPolicy::Hardened;
    assert!(validate_email(policy, "ana@example.com").is_ok());
    assert!(validate_email(policy, "ana@localhost").is_err());
    assert!(validate_email(policy, "ana@.com").is_err());
    assert!(validate_email(policy, "ana@example.").is_err());
    assert!(validate_email(policy, "@example.com").is_err());
    assert!(validate_email(policy, "a@b@example.com").is_err());
    assert!(validate_email(policy, "ana maria@example.com").is_err());
}

#[test]
fn minimal_email_only_requires_a_value() {
    assert!(validate_email(CredentialPolicy::Minimal, "abc").is_ok());
    assert_eq!(validate_email(CredentialPolicy::Minimal, ""), Err("Email is required."));
}

#[test]
fn hardened_password_needs_digit_and_symbol() {
    let policy = CredentialPolicy::Hardened;
    assert_eq!(validate_password(policy, "abcdef"), Err("Password must contain at least one digit."));
    assert_eq!(validate_password(policy, "abc123"), Err("Password must contain at least one symbol."));
    assert_eq!(validate_password(policy, "a1!"), Err("Password must be at least 6 characters."));
    assert!(validate_password(policy, "abc123!").is_ok());
}

#[test]
fn minimal_password_accepts_short_values() {
    assert!(validate_password(CredentialPolicy::Minimal, "abc").is_ok());
    assert_eq!(validate_password(CredentialPolicy::Minimal, ""), Err("Password is required."));
}

#[test]
fn validate_credentials_trims_email() {
    assert_eq!(
        validate_credentials(CredentialPolicy::Hardened, "  ana@example.com ", "abc123!"),
        Ok("ana@example.com".to_owned())
    );
}

#[test]
fn default_policy_is_hardened() {
    assert_eq!(CredentialPolicy::default(), CredentialPolicy::Hardened);
}

// =============================================================================
// PROVIDER
// =============================================================================

#[test]
fn state_starts_loading_without_session() {
    let state = SessionState::default();
    assert!(state.loading);
    assert!(state.user().is_none());
}

#[test]
fn initialize_loads_existing_session() {
    let memory = Arc::new(MemoryBackend::new().with_signed_in("user-7"));
    let provider = provider(&memory);

    block_on(provider.initialize());

    let state = provider.snapshot();
    assert!(!state.loading);
    assert_eq!(state.user_id().as_deref(), Some("user-7"));
}

#[test]
fn initialize_twice_keeps_one_subscription() {
    let memory = Arc::new(MemoryBackend::new());
    let provider = provider(&memory);

    block_on(provider.initialize());
    block_on(provider.initialize());

    assert_eq!(memory.listener_count(), 1);
}

#[test]
fn failed_lookup_records_error() {
    let memory = Arc::new(MemoryBackend::new().failing_session_lookup("offline"));
    let provider = provider(&memory);

    block_on(provider.initialize());

    let state = provider.snapshot();
    assert!(!state.loading);
    assert!(state.session.is_none());
    assert_eq!(state.error.as_deref(), Some("network error: offline"));
}

#[test]
fn pushed_changes_overwrite_session_and_reach_observer() {
    let memory = Arc::new(MemoryBackend::new());
    let seen = Arc::new(AtomicUsize::new(0));
    let seen_observer = Arc::clone(&seen);
    let provider = provider(&memory).with_observer(Arc::new(move |_| {
        seen_observer.fetch_add(1, Ordering::SeqCst);
    }));
    block_on(provider.initialize());
    let before = seen.load(Ordering::SeqCst);

    memory.push_session(AuthEvent::SignedIn, Some(session_for("user-3", None)));
    assert_eq!(provider.snapshot().user_id().as_deref(), Some("user-3"));

    memory.push_session(AuthEvent::SignedOut, None);
    assert!(provider.snapshot().session.is_none());
    assert_eq!(seen.load(Ordering::SeqCst), before + 2);
}

#[test]
fn login_with_invalid_email_never_reaches_backend() {
    let memory = Arc::new(MemoryBackend::new());
    let provider = provider(&memory);

    let result = block_on(provider.login("abc", "abc123!"));

    assert_eq!(result, Err("Enter a valid email address.".to_owned()));
    assert_eq!(memory.auth_calls(), 0);
}

#[test]
fn login_success_is_delivered_by_subscription() {
    let memory = Arc::new(MemoryBackend::new().with_account("ana@example.com", "abc123!"));
    let provider = provider(&memory);
    block_on(provider.initialize());

    assert_eq!(block_on(provider.login("ana@example.com", "abc123!")), Ok(()));

    let state = provider.snapshot();
    assert_eq!(state.user().and_then(|u| u.email.as_deref()), Some("ana@example.com"));
}

#[test]
fn login_rejection_returns_backend_message() {
    let memory = Arc::new(MemoryBackend::new().with_account("ana@example.com", "abc123!"));
    let provider = provider(&memory);

    let result = block_on(provider.login("ana@example.com", "wrong1!"));

    assert_eq!(result, Err("Invalid login credentials".to_owned()));
    assert_eq!(memory.auth_calls(), 1);
}

#[test]
fn signup_reports_confirmation_outcome() {
    let memory = Arc::new(MemoryBackend::new().requiring_confirmation());
    let provider = provider(&memory);
    block_on(provider.initialize());

    let outcome = block_on(provider.signup("new@example.com", "abc123!"));

    assert_eq!(outcome, Ok(SignUpOutcome::ConfirmationSent));
    assert!(provider.snapshot().session.is_none());
}

#[test]
fn signup_signs_in_when_no_confirmation_needed() {
    let memory = Arc::new(MemoryBackend::new());
    let provider = provider(&memory);
    block_on(provider.initialize());

    let outcome = block_on(provider.signup("new@example.com", "abc123!"));

    assert_eq!(outcome, Ok(SignUpOutcome::SignedIn));
    assert!(provider.snapshot().session.is_some());
}

#[test]
fn signup_with_weak_password_is_rejected_locally() {
    let memory = Arc::new(MemoryBackend::new());
    let provider = provider(&memory);

    let result = block_on(provider.signup("new@example.com", "abcdef"));

    assert!(result.is_err());
    assert_eq!(memory.auth_calls(), 0);
}

#[test]
fn oauth_login_redirects_back_to_trip_list() {
    let memory = Arc::new(MemoryBackend::new());
    let provider = provider(&memory);

    block_on(provider.login_with_oauth(OAuthProvider::GitHub, "https://travel.example/")).unwrap();

    assert_eq!(
        memory.oauth_requests(),
        vec![(OAuthProvider::GitHub, "https://travel.example/voyages".to_owned())]
    );
}

#[test]
fn logout_clears_session_via_subscription() {
    let memory = Arc::new(MemoryBackend::new().with_signed_in("user-1"));
    let provider = provider(&memory);
    block_on(provider.initialize());

    block_on(provider.logout()).unwrap();

    assert!(provider.snapshot().session.is_none());
}

#[test]
fn teardown_releases_subscription_once() {
    let memory = Arc::new(MemoryBackend::new());
    let provider = provider(&memory);
    block_on(provider.initialize());
    assert!(provider.is_subscribed());

    provider.teardown();
    provider.teardown();

    assert!(!provider.is_subscribed());
    assert_eq!(memory.listener_count(), 0);
}

#[test]
fn retry_clears_previous_error() {
    let memory = Arc::new(MemoryBackend::new().failing_session_lookup("offline"));
    let provider = provider(&memory);
    block_on(provider.initialize());
    assert!(provider.snapshot().error.is_some());

    memory.clear_session_error();
    block_on(provider.retry());

    assert!(provider.snapshot().error.is_none());
}
