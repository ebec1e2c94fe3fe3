//! In-process auth-change notifications.
//!
//! The auth client pushes every session change (sign-in, sign-out, token
//! refresh) through an `AuthEvents` registry. Subscribing returns a
//! `Subscription` guard; dropping it, or calling `unsubscribe`, removes the
//! listener, so a listener can never outlive its owner.

#[cfg(test)]
#[path = "events_test.rs"]
mod events_test;

use std::sync::{Arc, Mutex, PoisonError, Weak};

use super::types::{AuthEvent, Session};

/// Callback invoked with the change kind and the new session (if any).
pub type AuthListener = Arc<dyn Fn(AuthEvent, Option<&Session>) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, AuthListener)>,
}

/// Registry of auth-change listeners.
#[derive(Clone, Default)]
pub struct AuthEvents {
    inner: Arc<Mutex<Listeners>>,
}

impl AuthEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener until the returned guard is released.
    pub fn subscribe(&self, listener: AuthListener) -> Subscription {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.next_id += 1;
        let id = inner.next_id;
        inner.entries.push((id, listener));
        Subscription { id, registry: Arc::downgrade(&self.inner) }
    }

    /// Deliver a change to every current listener.
    pub fn emit(&self, event: AuthEvent, session: Option<&Session>) {
        // Snapshot first: a listener may subscribe or unsubscribe re-entrantly.
        let listeners: Vec<AuthListener> = {
            let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.entries.iter().map(|(_, l)| Arc::clone(l)).collect()
        };
        for listener in listeners {
            listener(event, session);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).entries.len()
    }
}

/// Guard for one registered listener.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Listeners>>,
}

impl Subscription {
    /// A guard attached to nothing, for backends without change notifications.
    pub fn detached() -> Self {
        Self { id: 0, registry: Weak::new() }
    }

    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            let mut inner = registry.lock().unwrap_or_else(PoisonError::into_inner);
            inner.entries.retain(|(id, _)| *id != self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish_non_exhaustive()
    }
}
