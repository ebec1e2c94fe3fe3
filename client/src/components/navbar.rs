//! Top navigation bar.

use std::sync::Arc;

use leptos::prelude::*;

use crate::routes;
use crate::state::session::{SessionProvider, SessionState};
use crate::util::navigation::install_redirect;
use crate::util::task;

#[component]
pub fn Navbar() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let provider = expect_context::<Arc<SessionProvider>>();
    let redirect = install_redirect();
    let error = RwSignal::new(None::<String>);

    let on_logout = Callback::new(move |()| {
        let provider = Arc::clone(&provider);
        task::spawn(async move {
            match provider.logout().await {
                Ok(()) => {
                    error.set(None);
                    redirect.set(Some(routes::LOGIN.to_owned()));
                }
                Err(e) => {
                    log::warn!("logout failed: {e}");
                    error.set(Some(e));
                }
            }
        });
    });

    let signed_in = move || session.with(|s| s.session.is_some());
    let email = move || session.with(|s| s.user().and_then(|u| u.email.clone()).unwrap_or_default());

    view! {
        <nav class="navbar">
            <a class="navbar__brand" href=routes::HOME>"Travel Log"</a>
            <span class="navbar__spacer"></span>
            <Show
                when=signed_in
                fallback=|| {
                    view! {
                        <a class="navbar__link" href=routes::LOGIN>"Log in"</a>
                        <a class="navbar__link navbar__link--cta" href=routes::SIGNUP>"Sign up"</a>
                    }
                }
            >
                <a class="navbar__link" href=routes::VOYAGES>"My trips"</a>
                <a class="navbar__link" href=routes::NEW_VOYAGE>"New trip"</a>
                <a class="navbar__link" href=routes::TAGS>"Tags"</a>
                <span class="navbar__user">{email}</span>
                <button class="btn navbar__logout" on:click=move |_| on_logout.run(())>"Log out"</button>
            </Show>
            <Show when=move || error.get().is_some()>
                <span class="navbar__error" role="alert">{move || error.get().unwrap_or_default()}</span>
            </Show>
        </nav>
    }
}
