//! Tag management: live title search, edit links and confirmed delete.

use leptos::prelude::*;

use crate::components::confirm_dialog::ConfirmDialog;
use crate::net::Backend;
use crate::routes;
use crate::services::tags::{self, Tag};
use crate::state::session::SessionState;
use crate::util::fetch_guard::{FetchGuard, spawn_guarded};
use crate::util::task;

#[component]
pub fn TagListPage() -> impl IntoView {
    let backend = expect_context::<Backend>();
    let session = expect_context::<RwSignal<SessionState>>();

    let guard = FetchGuard::new();
    on_cleanup({
        let guard = guard.clone();
        move || guard.invalidate()
    });

    let search = RwSignal::new(String::new());
    let rows = RwSignal::new(Vec::<Tag>::new());
    let loading = RwSignal::new(true);
    let error = RwSignal::new(None::<String>);
    let pending_delete = RwSignal::new(None::<Tag>);
    let reload = RwSignal::new(0_u32);

    Effect::new({
        let backend = backend.clone();
        move || {
            reload.track();
            let term = search.get();
            let Some(user_id) = session.with_untracked(SessionState::user_id) else {
                return;
            };
            loading.set(true);
            let backend = backend.clone();
            spawn_guarded(
                &guard,
                async move { tags::list(backend.data.as_ref(), &user_id, &term).await },
                move |result| {
                    match result {
                        Ok(found) => {
                            rows.set(found);
                            error.set(None);
                        }
                        Err(e) => {
                            log::warn!("tag list failed: {e}");
                            rows.set(Vec::new());
                            error.set(Some(e.to_string()));
                        }
                    }
                    loading.set(false);
                },
            );
        }
    });

    let on_confirm = Callback::new(move |()| {
        let Some(tag) = pending_delete.get_untracked() else {
            return;
        };
        pending_delete.set(None);
        let backend = backend.clone();
        task::spawn(async move {
            match tags::delete(backend.data.as_ref(), tag.id).await {
                Ok(()) => reload.update(|n| *n += 1),
                Err(e) => error.set(Some(e.to_string())),
            }
        });
    });
    let on_cancel = Callback::new(move |()| pending_delete.set(None));

    view! {
        <section class="tag-list-page">
            <header class="page-header">
                <h1>"My tags"</h1>
                <a class="btn btn--primary" href=routes::NEW_TAG>"+ New tag"</a>
            </header>
            <input
                class="field__input"
                type="search"
                placeholder="Search tags"
                prop:value=move || search.get()
                on:input=move |ev| search.set(event_target_value(&ev))
            />
            <Show when=move || error.get().is_some()>
                <p class="page-error" role="alert">{move || error.get().unwrap_or_default()}</p>
            </Show>
            <Show when=move || !loading.get() fallback=|| view! { <p class="loading">"Loading tags..."</p> }>
                <Show
                    when=move || !rows.with(Vec::is_empty)
                    fallback=move || {
                        let text = if search.with(String::is_empty) { "No tags yet." } else { "No tag matches this search." };
                        view! { <p class="empty">{text}</p> }
                    }
                >
                    <ul class="tag-list">
                        {move || {
                            rows.get()
                                .into_iter()
                                .map(|tag| {
                                    let id = tag.id;
                                    let for_delete = tag.clone();
                                    view! {
                                        <li class="tag-list__item">
                                            <span class="tag">{tag.title}</span>
                                            <a class="btn" href=routes::tag_edit(id)>"Edit"</a>
                                            <button
                                                class="btn btn--danger"
                                                on:click=move |_| pending_delete.set(Some(for_delete.clone()))
                                            >
                                                "Delete"
                                            </button>
                                        </li>
                                    }
                                })
                                .collect::<Vec<_>>()
                        }}
                    </ul>
                </Show>
            </Show>
            <Show when=move || pending_delete.with(Option::is_some)>
                <ConfirmDialog
                    title="Delete tag"
                    message=Signal::derive(move || {
                        pending_delete
                            .with(|t| t.as_ref().map(|t| format!("Delete the tag \"{}\"?", t.title)))
                            .unwrap_or_default()
                    })
                    on_confirm=on_confirm
                    on_cancel=on_cancel
                />
            </Show>
        </section>
    }
}
