//! Fire-and-forget async work from event handlers and effects.

use std::future::Future;

/// Run `future` on the browser event loop. Outside the browser the future is
/// dropped unpolled: server rendering never performs user actions.
pub fn spawn(future: impl Future<Output = ()> + 'static) {
    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(future);
    #[cfg(not(feature = "hydrate"))]
    drop(future);
}
