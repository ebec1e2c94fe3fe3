use super::*;
use crate::net::memory::session_for;

fn settled(session: bool) -> SessionState {
    SessionState {
        session: session.then(|| session_for("user-1", None)),
        loading: false,
        error: None,
    }
}

#[test]
fn loading_snapshot_keeps_checking() {
    assert_eq!(GateState::Checking.advance(&SessionState::default()), GateState::Checking);
}

#[test]
fn null_session_settles_unauthenticated() {
    assert_eq!(GateState::Checking.advance(&settled(false)), GateState::Unauthenticated);
}

#[test]
fn present_session_settles_authenticated() {
    assert_eq!(GateState::Checking.advance(&settled(true)), GateState::Authenticated);
}

#[test]
fn lookup_error_settles_unavailable() {
    let snapshot = SessionState { session: None, loading: false, error: Some("network error: down".to_owned()) };
    assert_eq!(
        GateState::Checking.advance(&snapshot),
        GateState::Unavailable("network error: down".to_owned())
    );
}

#[test]
fn settled_states_ignore_later_snapshots() {
    assert_eq!(GateState::Authenticated.advance(&settled(false)), GateState::Authenticated);
    assert_eq!(GateState::Unauthenticated.advance(&settled(true)), GateState::Unauthenticated);
    let unavailable = GateState::Unavailable("x".to_owned());
    assert_eq!(unavailable.advance(&settled(true)), unavailable);
}

#[test]
fn latch_fires_exactly_once() {
    let latch = RedirectLatch::new();
    assert!(!latch.has_fired());
    assert!(latch.take());
    assert!(!latch.take());
    assert!(latch.clone().has_fired());
}

#[test]
fn null_session_produces_one_redirect_across_repeated_snapshots() {
    let latch = RedirectLatch::new();
    let mut gate = GateState::Checking;
    let mut redirects = 0;
    for snapshot in [SessionState::default(), settled(false), settled(false), settled(true)] {
        gate = gate.advance(&snapshot);
        if gate == GateState::Unauthenticated && latch.take() {
            redirects += 1;
        }
    }
    assert_eq!(redirects, 1);
}
