use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::net::types::AuthUser;

fn counter_listener(count: &Arc<AtomicUsize>) -> AuthListener {
    let count = Arc::clone(count);
    Arc::new(move |_, _| {
        count.fetch_add(1, Ordering::SeqCst);
    })
}

#[test]
fn emit_reaches_every_subscriber() {
    let events = AuthEvents::new();
    let count = Arc::new(AtomicUsize::new(0));
    let _a = events.subscribe(counter_listener(&count));
    let _b = events.subscribe(counter_listener(&count));

    events.emit(AuthEvent::SignedOut, None);
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[test]
fn unsubscribe_removes_only_that_listener() {
    let events = AuthEvents::new();
    let count = Arc::new(AtomicUsize::new(0));
    let a = events.subscribe(counter_listener(&count));
    let _b = events.subscribe(counter_listener(&count));
    assert_eq!(events.listener_count(), 2);

    a.unsubscribe();
    assert_eq!(events.listener_count(), 1);

    events.emit(AuthEvent::SignedOut, None);
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn dropping_guard_unsubscribes() {
    let events = AuthEvents::new();
    {
        let _guard = events.subscribe(Arc::new(|_, _| {}));
        assert_eq!(events.listener_count(), 1);
    }
    assert_eq!(events.listener_count(), 0);
}

#[test]
fn listener_receives_session_payload() {
    let events = AuthEvents::new();
    let seen = Arc::new(Mutex::new(None::<String>));
    let sink = Arc::clone(&seen);
    let _guard = events.subscribe(Arc::new(move |event, session| {
        assert_eq!(event, AuthEvent::SignedIn);
        *sink.lock().unwrap() = session.map(|s| s.user.id.clone());
    }));

    let session = Session {
        access_token: "t".to_owned(),
        refresh_token: None,
        expires_at: 0,
        user: AuthUser { id: "u7".to_owned(), email: None },
    };
    events.emit(AuthEvent::SignedIn, Some(&session));
    assert_eq!(seen.lock().unwrap().as_deref(), Some("u7"));
}

#[test]
fn guard_outliving_registry_is_harmless() {
    let guard = {
        let events = AuthEvents::new();
        events.subscribe(Arc::new(|_, _| {}))
    };
    drop(guard);
    Subscription::detached().unsubscribe();
}
