use futures::executor::block_on;

use super::*;

#[test]
fn fresh_ticket_is_current() {
    let guard = FetchGuard::new();
    assert!(guard.begin().is_current());
}

#[test]
fn newer_fetch_supersedes_older_ticket() {
    let guard = FetchGuard::new();
    let first = guard.begin();
    let second = guard.begin();
    assert!(!first.is_current());
    assert!(second.is_current());
}

#[test]
fn invalidate_drops_outstanding_tickets() {
    let guard = FetchGuard::new();
    let ticket = guard.begin();
    guard.invalidate();
    assert!(!ticket.is_current());
}

#[test]
fn clones_share_one_counter() {
    let guard = FetchGuard::new();
    let ticket = guard.begin();
    guard.clone().invalidate();
    assert!(!ticket.is_current());
}

#[test]
fn current_ticket_applies_result() {
    let guard = FetchGuard::new();
    let mut applied = None;
    let done = block_on(apply_if_current(guard.begin(), async { 5 }, |v| applied = Some(v)));
    assert!(done);
    assert_eq!(applied, Some(5));
}

#[test]
fn superseded_ticket_discards_result() {
    let guard = FetchGuard::new();
    let stale = guard.begin();
    let _fresh = guard.begin();
    let mut applied = false;
    assert!(!block_on(apply_if_current(stale, async { 1 }, |_| applied = true)));
    assert!(!applied);
}

#[test]
fn invalidation_during_fetch_discards_result() {
    let guard = FetchGuard::new();
    let ticket = guard.begin();
    let cleanup = guard.clone();
    let mut applied = false;
    let fetch = async move {
        cleanup.invalidate();
        "late"
    };
    assert!(!block_on(apply_if_current(ticket, fetch, |_| applied = true)));
    assert!(!applied);
}
