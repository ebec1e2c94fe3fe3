//! Trip editor for `/voyages/new` and `/voyages/:id/edit`.
//!
//! SYSTEM CONTEXT
//! ==============
//! Creating a trip lands on its edit screen, which additionally manages the
//! trip's stops and photos. Tag choices are saved together with the trip.

#[cfg(test)]
#[path = "voyage_form_test.rs"]
mod voyage_form_test;

use leptos::prelude::*;
use leptos_router::hooks::use_params_map;

use crate::components::bound_input::BoundInput;
use crate::components::media_gallery::MediaGallery;
use crate::components::tag_picker::TagPicker;
use crate::net::Backend;
use crate::net::error::BackendError;
use crate::routes;
use crate::services::associations::{self, Parent};
use crate::services::etapes::{self, Etape};
use crate::services::media::{self, Media, MediaOwner};
use crate::services::tags::{self, Tag};
use crate::services::voyages::{self, VoyageForm};
use crate::state::session::SessionState;
use crate::util::fetch_guard::{FetchGuard, spawn_guarded};
use crate::util::navigation::install_redirect;
use crate::util::{browser, task};

pub fn form_heading(editing: Option<i64>) -> &'static str {
    if editing.is_some() { "Edit trip" } else { "New trip" }
}

/// Everything the editor shows besides the form fields.
#[derive(Clone, Debug, Default, PartialEq)]
struct Loaded {
    form: VoyageForm,
    all_tags: Vec<Tag>,
    selected: Vec<i64>,
    etapes: Vec<Etape>,
    media: Vec<Media>,
}

async fn load(backend: &Backend, user_id: &str, editing: Option<i64>) -> Result<Option<Loaded>, BackendError> {
    let data = backend.data.as_ref();
    let all_tags = tags::list(data, user_id, "").await?;
    let Some(id) = editing else {
        return Ok(Some(Loaded { all_tags, ..Loaded::default() }));
    };
    let Some(voyage) = voyages::get(data, id).await? else {
        return Ok(None);
    };
    Ok(Some(Loaded {
        form: VoyageForm::from_voyage(&voyage),
        all_tags,
        selected: associations::tag_ids(data, Parent::Voyage(id)).await?,
        etapes: etapes::list_for_voyage(data, id).await?,
        media: media::list_for_voyage(data, id).await?,
    }))
}

#[component]
pub fn VoyageFormPage() -> impl IntoView {
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

    let form = RwSignal::new(VoyageForm::default());
    let all_tags = RwSignal::new(Vec::<Tag>::new());
    let selected = RwSignal::new(Vec::<i64>::new());
    let etape_rows = RwSignal::new(Vec::<Etape>::new());
    let media_rows = RwSignal::new(Vec::<Media>::new());
    let loading = RwSignal::new(true);
    let not_found = RwSignal::new(false);
    let error = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);
    let reload = RwSignal::new(0_u32);

    Effect::new({
        let backend = backend.clone();
        let guard = guard.clone();
        move || {
            reload.track();
            let id = editing.get();
            let Some(user_id) = session.with_untracked(SessionState::user_id) else {
                return;
            };
            loading.set(true);
            let backend = backend.clone();
            spawn_guarded(
                &guard,
                async move { load(&backend, &user_id, id).await },
                move |result| {
                    match result {
                        Ok(Some(loaded)) => {
                            form.set(loaded.form);
                            all_tags.set(loaded.all_tags);
                            selected.set(loaded.selected);
                            etape_rows.set(loaded.etapes);
                            media_rows.set(loaded.media);
                            not_found.set(false);
                        }
                        Ok(None) => not_found.set(true),
                        Err(e) => {
                            log::warn!("trip editor failed to load: {e}");
                            error.set(Some(e.to_string()));
                        }
                    }
                    loading.set(false);
                },
            );
        }
    });

    let reload_media = Callback::new({
        let backend = backend.clone();
        let guard = FetchGuard::new();
        move |()| {
            let Some(id) = editing.get_untracked() else {
                return;
            };
            let backend = backend.clone();
            spawn_guarded(
                &guard,
                async move { media::list_for_voyage(backend.data.as_ref(), id).await },
                move |result| match result {
                    Ok(rows) => media_rows.set(rows),
                    Err(e) => error.set(Some(e.to_string())),
                },
            );
        }
    });

    let delete_etape = Callback::new({
        let backend = backend.clone();
        move |etape_id: i64| {
            let backend = backend.clone();
            task::spawn(async move {
                match etapes::delete_confirmed(backend.data.as_ref(), etape_id, browser::confirm).await {
                    Ok(true) => reload.update(|n| *n += 1),
                    Ok(false) => {}
                    Err(e) => error.set(Some(e.to_string())),
                }
            });
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
        let (current, chosen, id) = (form.get(), selected.get(), editing.get_untracked());
        busy.set(true);
        error.set(None);
        let backend = backend.clone();
        task::spawn(async move {
            match voyages::save(backend.data.as_ref(), &user_id, id, &current, &chosen).await {
                Ok(route) => {
                    // Same route after an edit: reload to show stored values.
                    if id.is_some() {
                        reload.update(|n| *n += 1);
                    }
                    redirect.set(Some(route));
                }
                Err(e) => error.set(Some(e)),
            }
            busy.set(false);
        });
    });

    view! {
        <section class="voyage-form-page">
            <header class="page-header">
                <h1>{move || form_heading(editing.get())}</h1>
                <a class="btn btn--ghost" href=routes::VOYAGES>"← All trips"</a>
            </header>
            <Show when=move || !loading.get() fallback=|| view! { <p class="loading">"Loading..."</p> }>
                <Show
                    when=move || !not_found.get()
                    fallback=|| {
                        view! {
                            <div class="not-found">
                                <h2>"Trip not found"</h2>
                                <a class="btn" href=routes::VOYAGES>"Back to my trips"</a>
                            </div>
                        }
                    }
                >
                    <form class="card card-form" on:submit=move |ev| on_submit.run(ev)>
                        <BoundInput
                            state=form
                            label="Trip name"
                            required=true
                            get=|f: &VoyageForm| f.label.clone()
                            set=|f: &mut VoyageForm, v| f.label = v
                        />
                        <BoundInput
                            state=form
                            label="Countries"
                            placeholder="Italy, France"
                            get=|f: &VoyageForm| f.countries.clone()
                            set=|f: &mut VoyageForm, v| f.countries = v
                        />
                        <BoundInput
                            state=form
                            label="Regions"
                            placeholder="Tuscany, Provence"
                            get=|f: &VoyageForm| f.regions.clone()
                            set=|f: &mut VoyageForm, v| f.regions = v
                        />
                        <BoundInput
                            state=form
                            label="Cities"
                            placeholder="Florence, Nice"
                            get=|f: &VoyageForm| f.cities.clone()
                            set=|f: &mut VoyageForm, v| f.cities = v
                        />
                        <BoundInput
                            state=form
                            label="Departure"
                            kind="date"
                            get=|f: &VoyageForm| f.departure.clone()
                            set=|f: &mut VoyageForm, v| f.departure = v
                        />
                        <BoundInput
                            state=form
                            label="Return"
                            kind="date"
                            get=|f: &VoyageForm| f.arrival.clone()
                            set=|f: &mut VoyageForm, v| f.arrival = v
                        />
                        <BoundInput
                            state=form
                            label="Budget (€)"
                            kind="number"
                            get=|f: &VoyageForm| f.budget.clone()
                            set=|f: &mut VoyageForm, v| f.budget = v
                        />
                        <BoundInput
                            state=form
                            label="Expenses (€)"
                            kind="number"
                            get=|f: &VoyageForm| f.expenses.clone()
                            set=|f: &mut VoyageForm, v| f.expenses = v
                        />
                        <TagPicker tags=all_tags selected=selected/>
                        <Show when=move || error.get().is_some()>
                            <p class="form-error" role="alert">{move || error.get().unwrap_or_default()}</p>
                        </Show>
                        <button class="btn btn--primary" type="submit" disabled=move || busy.get()>
                            {move || if busy.get() { "Saving..." } else { "Save" }}
                        </button>
                    </form>
                    {move || {
                        editing
                            .get()
                            .map(|id| {
                                view! {
                                    <EtapeSection voyage_id=id etapes=etape_rows on_delete=delete_etape/>
                                    <MediaGallery
                                        media=media_rows
                                        owner=MediaOwner { voyage_id: id, etape_id: None }
                                        on_changed=reload_media
                                        allow_primary=true
                                    />
                                }
                            })
                    }}
                </Show>
            </Show>
        </section>
    }
}

/// Stops of the trip being edited.
#[component]
fn EtapeSection(voyage_id: i64, etapes: RwSignal<Vec<Etape>>, on_delete: Callback<i64>) -> impl IntoView {
    view! {
        <section class="etape-section">
            <header class="page-header">
                <h2>"Stops"</h2>
                <a class="btn" href=routes::new_etape(voyage_id)>"+ Add a stop"</a>
            </header>
            <Show when=move || !etapes.with(Vec::is_empty) fallback=|| view! { <p class="empty">"No stops yet."</p> }>
                <ol class="etape-list">
                    {move || {
                        etapes
                            .get()
                            .into_iter()
                            .map(|etape| {
                                let etape_id = etape.id;
                                view! {
                                    <li class="etape-list__item">
                                        <a href=routes::etape(voyage_id, etape_id)>{etape.label}</a>
                                        <a class="btn" href=routes::etape_edit(voyage_id, etape_id)>"Edit"</a>
                                        <button class="btn btn--danger" on:click=move |_| on_delete.run(etape_id)>
                                            "Delete"
                                        </button>
                                    </li>
                                }
                            })
                            .collect::<Vec<_>>()
                    }}
                </ol>
            </Show>
        </section>
    }
}
