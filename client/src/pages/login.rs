//! Login page: email + password, or a third-party provider.

use std::sync::Arc;

use leptos::prelude::*;

use crate::net::types::OAuthProvider;
use crate::routes;
use crate::state::session::{SessionProvider, SessionState};
use crate::util::navigation::install_redirect;
use crate::util::{browser, task};

#[component]
pub fn LoginPage() -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let provider = expect_context::<Arc<SessionProvider>>();
    let redirect = install_redirect();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    // Already signed in (or just signed in through the subscription).
    Effect::new(move || {
        if session.with(|s| s.session.is_some()) {
            redirect.set(Some(routes::VOYAGES.to_owned()));
        }
    });

    let on_submit = {
        let provider = Arc::clone(&provider);
        move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            if busy.get() {
                return;
            }
            busy.set(true);
            info.set(String::new());
            let provider = Arc::clone(&provider);
            let (email_value, password_value) = (email.get(), password.get());
            task::spawn(async move {
                match provider.login(&email_value, &password_value).await {
                    Ok(()) => redirect.set(Some(routes::VOYAGES.to_owned())),
                    Err(e) => info.set(e),
                }
                busy.set(false);
            });
        }
    };

    let oauth_buttons = OAuthProvider::ALL
        .into_iter()
        .map(|oauth| {
            let provider = Arc::clone(&provider);
            let on_click = move |_| {
                let provider = Arc::clone(&provider);
                task::spawn(async move {
                    if let Err(e) = provider.login_with_oauth(oauth, &browser::origin()).await {
                        info.set(e);
                    }
                });
            };
            view! {
                <button class="btn login-card__oauth" type="button" on:click=on_click>
                    {format!("Continue with {}", oauth.label())}
                </button>
            }
        })
        .collect::<Vec<_>>();

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Log in"</h1>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="email"
                        placeholder="you@example.com"
                        autocomplete="email"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        placeholder="Password"
                        autocomplete="current-password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        {move || if busy.get() { "Logging in..." } else { "Log in" }}
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message" role="alert">{move || info.get()}</p>
                </Show>
                <div class="login-divider"></div>
                <p class="login-card__subtitle">"Or"</p>
                {oauth_buttons}
                <p class="login-card__switch">
                    "No account yet? " <a href=routes::SIGNUP>"Sign up"</a>
                </p>
            </div>
        </div>
    }
}
