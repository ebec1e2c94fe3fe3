//! Navigation requested from async tasks.
//!
//! DESIGN
//! ======
//! Event handlers and spawned tasks only need a `RwSignal` (which is `Send`
//! and `Copy`); a single effect owns the router's navigate function and
//! performs the pending navigation.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

/// Install the navigation effect for the current screen and return the
/// signal that triggers it.
pub fn install_redirect() -> RwSignal<Option<String>> {
    let target = RwSignal::new(None::<String>);
    let navigate = use_navigate();
    Effect::new(move || {
        if let Some(path) = target.get() {
            target.set(None);
            navigate(&path, NavigateOptions::default());
        }
    });
    target
}
