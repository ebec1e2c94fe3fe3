//! Account creation page.

#[cfg(test)]
#[path = "signup_test.rs"]
mod signup_test;

use std::sync::Arc;

use leptos::prelude::*;

use crate::net::types::SignUpOutcome;
use crate::routes;
use crate::state::session::{MIN_PASSWORD_LEN, SessionProvider};
use crate::util::navigation::install_redirect;
use crate::util::task;

/// Where to go after a successful signup, or the notice to show instead.
pub fn signup_next_step(outcome: SignUpOutcome) -> Result<&'static str, &'static str> {
    match outcome {
        SignUpOutcome::SignedIn => Ok(routes::VOYAGES),
        SignUpOutcome::ConfirmationSent => Err("Check your inbox to confirm your email, then log in."),
    }
}

/// Both password fields must match before anything else is checked.
pub fn passwords_match(password: &str, confirmation: &str) -> Result<(), &'static str> {
    if password == confirmation { Ok(()) } else { Err("Passwords do not match.") }
}

#[component]
pub fn SignupPage() -> impl IntoView {
    let provider = expect_context::<Arc<SessionProvider>>();
    let redirect = install_redirect();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirmation = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let password_value = password.get();
        if let Err(message) = passwords_match(&password_value, &confirmation.get()) {
            info.set(message.to_owned());
            return;
        }
        busy.set(true);
        info.set(String::new());
        let provider = Arc::clone(&provider);
        let email_value = email.get();
        task::spawn(async move {
            match provider.signup(&email_value, &password_value).await {
                Ok(outcome) => match signup_next_step(outcome) {
                    Ok(route) => redirect.set(Some(route.to_owned())),
                    Err(notice) => info.set(notice.to_owned()),
                },
                Err(e) => info.set(e),
            }
            busy.set(false);
        });
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Create an account"</h1>
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
                        autocomplete="new-password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        placeholder="Confirm password"
                        autocomplete="new-password"
                        prop:value=move || confirmation.get()
                        on:input=move |ev| confirmation.set(event_target_value(&ev))
                    />
                    <p class="login-card__hint">
                        {format!("At least {MIN_PASSWORD_LEN} characters, with a digit and a symbol.")}
                    </p>
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        {move || if busy.get() { "Creating account..." } else { "Sign up" }}
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message" role="alert">{move || info.get()}</p>
                </Show>
                <p class="login-card__switch">
                    "Already registered? " <a href=routes::LOGIN>"Log in"</a>
                </p>
            </div>
        </div>
    }
}
