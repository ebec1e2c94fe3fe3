//! Tag editor for `/tags/new` and `/tags/:id/edit`.

use leptos::prelude::*;
use leptos_router::hooks::use_params_map;

use crate::components::bound_input::BoundInput;
use crate::net::Backend;
use crate::routes;
use crate::services::tags::{self, TagForm};
use crate::state::session::SessionState;
use crate::util::fetch_guard::{FetchGuard, spawn_guarded};
use crate::util::navigation::install_redirect;
use crate::util::task;

#[component]
pub fn TagFormPage() -> impl IntoView {
    let backend = expect_context::<Backend>();
    let session = expect_context::<RwSignal<SessionState>>();
    let params = use_params_map();
    let editing = Memo::new(move |_| params.read().get("id").and_then(|raw| routes::parse_id(&raw)));
    let redirect = install_redirect();

    let guard = FetchGuard::new();
    on_cleanup({
        let guard = guard.clone();
        move || guard.invalidate()
    });

    let form = RwSignal::new(TagForm::default());
    let loading = RwSignal::new(false);
    let not_found = RwSignal::new(false);
    let error = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    Effect::new({
        let backend = backend.clone();
        move || {
            let Some(id) = editing.get() else {
                form.set(TagForm::default());
                return;
            };
            loading.set(true);
            let backend = backend.clone();
            spawn_guarded(
                &guard,
                async move { tags::get(backend.data.as_ref(), id).await },
                move |result| {
                    match result {
                        Ok(Some(tag)) => form.set(TagForm::from_tag(&tag)),
                        Ok(None) => not_found.set(true),
                        Err(e) => error.set(Some(e.to_string())),
                    }
                    loading.set(false);
                },
            );
        }
    });

    let on_submit = Callback::new(move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let Some(user_id) = session.with_untracked(SessionState::user_id) else {
            return;
        };
        let (current, id) = (form.get(), editing.get_untracked());
        busy.set(true);
        error.set(None);
        let backend = backend.clone();
        task::spawn(async move {
            match tags::save(backend.data.as_ref(), &user_id, id, &current).await {
                Ok(route) => redirect.set(Some(route)),
                Err(e) => error.set(Some(e)),
            }
            busy.set(false);
        });
    });

    view! {
        <section class="tag-form-page">
            <header class="page-header">
                <h1>{move || if editing.get().is_some() { "Edit tag" } else { "New tag" }}</h1>
                <a class="btn btn--ghost" href=routes::TAGS>"← All tags"</a>
            </header>
            <Show when=move || !loading.get() fallback=|| view! { <p class="loading">"Loading..."</p> }>
                <Show
                    when=move || !not_found.get()
                    fallback=|| {
                        view! {
                            <div class="not-found">
                                <h2>"Tag not found"</h2>
                                <a class="btn" href=routes::TAGS>"Back to my tags"</a>
                            </div>
                        }
                    }
                >
                    <form class="card card-form" on:submit=move |ev| on_submit.run(ev)>
                        <BoundInput
                            state=form
                            label="Title"
                            required=true
                            get=|f: &TagForm| f.title.clone()
                            set=|f: &mut TagForm, v| f.title = v
                        />
                        <Show when=move || error.get().is_some()>
                            <p class="form-error" role="alert">{move || error.get().unwrap_or_default()}</p>
                        </Show>
                        <button class="btn btn--primary" type="submit" disabled=move || busy.get()>
                            {move || if busy.get() { "Saving..." } else { "Save" }}
                        </button>
                    </form>
                </Show>
            </Show>
        </section>
    }
}
