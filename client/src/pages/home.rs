//! Landing page.

use leptos::prelude::*;

use crate::routes;
use crate::state::session::SessionState;

#[component]
pub fn HomePage() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let signed_in = move || session.with(|s| s.session.is_some());

    view! {
        <section class="home-page">
            <h1>"Travel Log"</h1>
            <p class="home-page__lead">
                "Plan your trips, record every stop and keep your best photos in one place."
            </p>
            <div class="home-page__actions">
                <Show
                    when=signed_in
                    fallback=|| {
                        view! {
                            <a class="btn btn--primary" href=routes::SIGNUP>"Create an account"</a>
                            <a class="btn" href=routes::LOGIN>"Log in"</a>
                        }
                    }
                >
                    <a class="btn btn--primary" href=routes::VOYAGES>"My trips"</a>
                    <a class="btn" href=routes::NEW_VOYAGE>"Plan a new trip"</a>
                </Show>
            </div>
        </section>
    }
}
