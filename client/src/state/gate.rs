//! Access-gate state machine for protected screens.
//!
//! DESIGN
//! ======
//! A mounted gate starts in `Checking` and settles exactly once on the first
//! snapshot that is no longer loading. Later snapshots do not move a settled
//! gate; only remounting or an explicit retry puts it back into `Checking`.
//! The redirect latch makes the unauthenticated redirect fire once per mount
//! even if the reactive effect that drives it re-runs.

#[cfg(test)]
#[path = "gate_test.rs"]
mod gate_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::session::SessionState;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum GateState {
    /// Session not known yet.
    #[default]
    Checking,
    Authenticated,
    /// No session: send the visitor to the login screen.
    Unauthenticated,
    /// The session lookup failed; offer a retry instead of redirecting.
    Unavailable(String),
}

impl GateState {
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Checking)
    }

    /// What a fresh gate would show for `snapshot`.
    pub fn from_snapshot(snapshot: &SessionState) -> Self {
        if snapshot.loading {
            Self::Checking
        } else if let Some(error) = &snapshot.error {
            Self::Unavailable(error.clone())
        } else if snapshot.session.is_some() {
            Self::Authenticated
        } else {
            Self::Unauthenticated
        }
    }

    /// Advance a mounted gate; settled states are kept.
    pub fn advance(&self, snapshot: &SessionState) -> Self {
        if self.is_settled() { self.clone() } else { Self::from_snapshot(snapshot) }
    }
}

/// One-shot flag guarding the login redirect of a single gate mount.
#[derive(Clone, Debug, Default)]
pub struct RedirectLatch {
    fired: Arc<AtomicBool>,
}

impl RedirectLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// True exactly once per latch.
    pub fn take(&self) -> bool {
        !self.fired.swap(true, Ordering::SeqCst)
    }

    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }
}
