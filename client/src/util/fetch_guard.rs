//! Stale-result protection for screen fetches.
//!
//! SYSTEM CONTEXT
//! ==============
//! Screens start fetches with `spawn_local` and apply the results to signals
//! when they settle. A screen takes a ticket before each fetch and applies the
//! result only if the ticket is still current: a newer fetch, or the screen's
//! cleanup, invalidates every older ticket.

#[cfg(test)]
#[path = "fetch_guard_test.rs"]
mod fetch_guard_test;

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Per-screen generation counter.
#[derive(Clone, Debug, Default)]
pub struct FetchGuard {
    generation: Arc<AtomicU64>,
}

/// Proof that a fetch was issued at a given generation.
#[derive(Clone, Debug)]
pub struct FetchTicket {
    generation: u64,
    guard: FetchGuard,
}

impl FetchGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fetch, superseding every earlier ticket.
    pub fn begin(&self) -> FetchTicket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        FetchTicket { generation, guard: self.clone() }
    }

    /// Drop every outstanding ticket (screen unmounted).
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

impl FetchTicket {
    pub fn is_current(&self) -> bool {
        self.guard.generation.load(Ordering::SeqCst) == self.generation
    }
}

/// Await `fetch` and hand its output to `apply` only if `ticket` is still
/// current afterwards. Returns whether the output was applied.
pub async fn apply_if_current<T>(ticket: FetchTicket, fetch: impl Future<Output = T>, apply: impl FnOnce(T)) -> bool {
    let value = fetch.await;
    if !ticket.is_current() {
        return false;
    }
    apply(value);
    true
}

/// Start a guarded fetch on the browser event loop.
pub fn spawn_guarded<T: 'static>(
    guard: &FetchGuard,
    fetch: impl Future<Output = T> + 'static,
    apply: impl FnOnce(T) + 'static,
) {
    let ticket = guard.begin();
    super::task::spawn(async move {
        apply_if_current(ticket, fetch, apply).await;
    });
}
