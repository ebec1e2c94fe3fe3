//! Route guard for screens that need a signed-in user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Wraps every protected route in `app`. The gate follows the session
//! signal through `GateState`: a neutral placeholder while checking, the
//! wrapped screen once authenticated, a single history-replacing redirect to
//! `/login` when there is no session, and a retry prompt when the lookup
//! itself failed.

use std::sync::Arc;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::routes;
use crate::state::gate::{GateState, RedirectLatch};
use crate::state::session::{SessionProvider, SessionState};
use crate::util::task;

#[component]
pub fn RequireAuth(children: ChildrenFn) -> impl IntoView {
    let session = expect_context::<RwSignal<SessionState>>();
    let provider = expect_context::<Arc<SessionProvider>>();
    let gate = RwSignal::new(GateState::Checking);
    let latch = RedirectLatch::new();
    let navigate = use_navigate();

    Effect::new(move || {
        let snapshot = session.get();
        let current = gate.get_untracked();
        let next = current.advance(&snapshot);
        if next != current {
            gate.set(next.clone());
        }
        if next == GateState::Unauthenticated && latch.take() {
            navigate(routes::LOGIN, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });

    let on_retry = move |_| {
        gate.set(GateState::Checking);
        let provider = Arc::clone(&provider);
        task::spawn(async move { provider.retry().await });
    };

    move || match gate.get() {
        GateState::Checking => view! { <p class="gate gate--checking">"Checking your session..."</p> }.into_any(),
        GateState::Authenticated => children().into_any(),
        GateState::Unauthenticated => view! { <p class="gate">"Redirecting to login..."</p> }.into_any(),
        GateState::Unavailable(message) => {
            let on_retry = on_retry.clone();
            view! {
                <div class="gate gate--error" role="alert">
                    <p>"We could not check your session."</p>
                    <p class="gate__detail">{message}</p>
                    <button class="btn" on:click=on_retry>"Retry"</button>
                </div>
            }
            .into_any()
        }
    }
}
