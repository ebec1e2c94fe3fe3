//! Trip list with search, filters, sorting and delete.
//!
//! SYSTEM CONTEXT
//! ==============
//! Authenticated landing route after login. Every filter change re-runs the
//! list query; the fetch guard drops results of superseded queries so the
//! list always matches the latest controls.

use leptos::prelude::*;

use crate::components::bound_input::BoundInput;
use crate::components::voyage_card::VoyageCard;
use crate::net::Backend;
use crate::routes;
use crate::services::voyages::{self, Voyage, VoyageFilter, VoyageSort};
use crate::state::session::SessionState;
use crate::util::fetch_guard::{FetchGuard, spawn_guarded};
use crate::util::{browser, task};

#[component]
pub fn VoyageListPage() -> impl IntoView {
    let backend = expect_context::<Backend>();
    let session = expect_context::<RwSignal<SessionState>>();
    let guard = FetchGuard::new();
    on_cleanup({
        let guard = guard.clone();
        move || guard.invalidate()
    });

    let filter = RwSignal::new(VoyageFilter::default());
    let items = RwSignal::new(Vec::<Voyage>::new());
    let loading = RwSignal::new(true);
    let error = RwSignal::new(None::<String>);
    let reload = RwSignal::new(0_u32);

    Effect::new({
        let backend = backend.clone();
        move || {
            reload.track();
            let current = filter.get();
            let Some(user_id) = session.with_untracked(SessionState::user_id) else {
                return;
            };
            loading.set(true);
            let backend = backend.clone();
            spawn_guarded(
                &guard,
                async move { voyages::list(backend.data.as_ref(), &user_id, &current).await },
                move |result| {
                    match result {
                        Ok(list) => {
                            items.set(list);
                            error.set(None);
                        }
                        Err(e) => {
                            log::warn!("trip list failed: {e}");
                            items.set(Vec::new());
                            error.set(Some(e.to_string()));
                        }
                    }
                    loading.set(false);
                },
            );
        }
    });

    let on_delete = Callback::new(move |id: i64| {
        let backend = backend.clone();
        task::spawn(async move {
            match voyages::delete_confirmed(backend.data.as_ref(), id, browser::confirm).await {
                Ok(true) => reload.update(|n| *n += 1),
                Ok(false) => {}
                Err(e) => error.set(Some(e.to_string())),
            }
        });
    });

    view! {
        <section class="voyage-list-page">
            <header class="page-header">
                <h1>"My trips"</h1>
                <a class="btn btn--primary" href=routes::NEW_VOYAGE>"+ New trip"</a>
            </header>
            <form class="filters" on:submit=|ev: leptos::ev::SubmitEvent| ev.prevent_default()>
                <BoundInput
                    state=filter
                    label="Search"
                    kind="search"
                    get=|f: &VoyageFilter| f.search.clone()
                    set=|f: &mut VoyageFilter, v| f.search = v
                />
                <BoundInput
                    state=filter
                    label="Country"
                    kind="text"
                    get=|f: &VoyageFilter| f.country.clone()
                    set=|f: &mut VoyageFilter, v| f.country = v
                />
                <BoundInput
                    state=filter
                    label="Departing after"
                    kind="date"
                    get=|f: &VoyageFilter| f.departs_after.clone()
                    set=|f: &mut VoyageFilter, v| f.departs_after = v
                />
                <BoundInput
                    state=filter
                    label="Returning before"
                    kind="date"
                    get=|f: &VoyageFilter| f.returns_before.clone()
                    set=|f: &mut VoyageFilter, v| f.returns_before = v
                />
                <BoundInput
                    state=filter
                    label="Max budget"
                    kind="number"
                    get=|f: &VoyageFilter| f.max_budget.clone()
                    set=|f: &mut VoyageFilter, v| f.max_budget = v
                />
                <label class="filters__field">
                    "Sort by"
                    <select
                        prop:value=move || filter.with(|f| f.sort.value())
                        on:change=move |ev| {
                            let sort = VoyageSort::from_value(&event_target_value(&ev));
                            filter.update(|f| f.sort = sort);
                        }
                    >
                        {VoyageSort::OPTIONS
                            .into_iter()
                            .map(|(sort, label)| view! { <option value=sort.value()>{label}</option> })
                            .collect::<Vec<_>>()}
                    </select>
                </label>
                <button
                    class="btn"
                    type="button"
                    disabled=move || !filter.with(VoyageFilter::is_narrowed)
                    on:click=move |_| {
                        filter.update(|f| {
                            *f = VoyageFilter { sort: f.sort, ..VoyageFilter::default() };
                        });
                    }
                >
                    "Clear filters"
                </button>
            </form>
            <Show when=move || error.get().is_some()>
                <p class="page-error" role="alert">{move || error.get().unwrap_or_default()}</p>
            </Show>
            <Show when=move || !loading.get() fallback=|| view! { <p class="loading">"Loading trips..."</p> }>
                <Show
                    when=move || !items.with(Vec::is_empty)
                    fallback=move || {
                        view! {
                            <p class="empty">
                                {move || {
                                    if filter.with(VoyageFilter::is_narrowed) {
                                        "No trip matches these filters."
                                    } else {
                                        "No trips yet. Plan your first one!"
                                    }
                                }}
                            </p>
                        }
                    }
                >
                    <div class="voyage-list">
                        {move || {
                            items
                                .get()
                                .into_iter()
                                .map(|voyage| view! { <VoyageCard voyage=voyage on_delete=on_delete/> })
                                .collect::<Vec<_>>()
                        }}
                    </div>
                </Show>
            </Show>
        </section>
    }
}
