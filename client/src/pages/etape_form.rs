//! Stop editor for `/voyages/:id/etapes/new` and `.../etapes/:etape_id/edit`.

use leptos::prelude::*;
use leptos_router::hooks::use_params_map;

use crate::components::bound_input::BoundInput;
use crate::components::media_gallery::MediaGallery;
use crate::components::tag_picker::TagPicker;
use crate::net::Backend;
use crate::net::error::BackendError;
use crate::routes;
use crate::services::associations::{self, Parent};
use crate::services::etapes::{self, EtapeForm};
use crate::services::media::{self, Media, MediaOwner};
use crate::services::tags::{self, Tag};
use crate::state::session::SessionState;
use crate::util::fetch_guard::{FetchGuard, spawn_guarded};
use crate::util::navigation::install_redirect;
use crate::util::task;

#[derive(Clone, Debug, Default)]
struct Loaded {
    form: EtapeForm,
    all_tags: Vec<Tag>,
    selected: Vec<i64>,
    media: Vec<Media>,
}

async fn load(
    backend: &Backend,
    user_id: &str,
    voyage_id: i64,
    editing: Option<i64>,
) -> Result<Option<Loaded>, BackendError> {
    let data = backend.data.as_ref();
    let all_tags = tags::list(data, user_id, "").await?;
    let Some(etape_id) = editing else {
        return Ok(Some(Loaded { all_tags, ..Loaded::default() }));
    };
    let Some(etape) = etapes::get(data, voyage_id, etape_id).await? else {
        return Ok(None);
    };
    Ok(Some(Loaded {
        form: EtapeForm::from_etape(&etape),
        all_tags,
        selected: associations::tag_ids(data, Parent::Etape(etape_id)).await?,
        media: media::list_for_etape(data, etape_id).await?,
    }))
}

#[component]
pub fn EtapeFormPage() -> impl IntoView {
    let backend = expect_context::<Backend>();
    let session = expect_context::<RwSignal<SessionState>>();
    let params = use_params_map();
    let voyage_id = Memo::new(move |_| params.read().get("id").and_then(|raw| routes::parse_id(&raw)));
    let editing = Memo::new(move |_| params.read().get("etape_id").and_then(|raw| routes::parse_id(&raw)));
    let redirect = install_redirect();

    let guard = FetchGuard::new();
    on_cleanup({
        let guard = guard.clone();
        move || guard.invalidate()
    });

    let form = RwSignal::new(EtapeForm::default());
    let all_tags = RwSignal::new(Vec::<Tag>::new());
    let selected = RwSignal::new(Vec::<i64>::new());
    let media_rows = RwSignal::new(Vec::<Media>::new());
    let loading = RwSignal::new(true);
    let not_found = RwSignal::new(false);
    let error = RwSignal::new(None::<String>);
    let busy = RwSignal::new(false);

    Effect::new({
        let backend = backend.clone();
        let guard = guard.clone();
        move || {
            let (Some(trip), id) = (voyage_id.get(), editing.get()) else {
                not_found.set(true);
                loading.set(false);
                return;
            };
            let Some(user_id) = session.with_untracked(SessionState::user_id) else {
                return;
            };
            loading.set(true);
            let backend = backend.clone();
            spawn_guarded(
                &guard,
                async move { load(&backend, &user_id, trip, id).await },
                move |result| {
                    match result {
                        Ok(Some(loaded)) => {
                            form.set(loaded.form);
                            all_tags.set(loaded.all_tags);
                            selected.set(loaded.selected);
                            media_rows.set(loaded.media);
                            not_found.set(false);
                        }
                        Ok(None) => not_found.set(true),
                        Err(e) => {
                            log::warn!("stop editor failed to load: {e}");
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
            let Some(etape_id) = editing.get_untracked() else {
                return;
            };
            let backend = backend.clone();
            spawn_guarded(
                &guard,
                async move { media::list_for_etape(backend.data.as_ref(), etape_id).await },
                move |result| match result {
                    Ok(rows) => media_rows.set(rows),
                    Err(e) => error.set(Some(e.to_string())),
                },
            );
        }
    });

    let on_submit = Callback::new(move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let (Some(user_id), Some(trip)) = (session.with_untracked(SessionState::user_id), voyage_id.get_untracked())
        else {
            return;
        };
        let (current, chosen, id) = (form.get(), selected.get(), editing.get_untracked());
        busy.set(true);
        error.set(None);
        let backend = backend.clone();
        task::spawn(async move {
            match etapes::save(backend.data.as_ref(), &user_id, trip, id, &current, &chosen).await {
                Ok(route) => redirect.set(Some(route)),
                Err(e) => error.set(Some(e)),
            }
            busy.set(false);
        });
    });

    let back = move || voyage_id.get().map_or_else(|| routes::VOYAGES.to_owned(), routes::voyage_edit);

    view! {
        <section class="etape-form-page">
            <header class="page-header">
                <h1>{move || if editing.get().is_some() { "Edit stop" } else { "New stop" }}</h1>
                <a class="btn btn--ghost" href=back>"← Back to trip"</a>
            </header>
            <Show when=move || !loading.get() fallback=|| view! { <p class="loading">"Loading..."</p> }>
                <Show
                    when=move || !not_found.get()
                    fallback=move || {
                        view! {
                            <div class="not-found">
                                <h2>"Stop not found"</h2>
                                <a class="btn" href=back()>"Back to trip"</a>
                            </div>
                        }
                    }
                >
                    <form class="card card-form" on:submit=move |ev| on_submit.run(ev)>
                        <BoundInput
                            state=form
                            label="Stop name"
                            required=true
                            get=|f: &EtapeForm| f.label.clone()
                            set=|f: &mut EtapeForm, v| f.label = v
                        />
                        <BoundInput
                            state=form
                            label="Address"
                            get=|f: &EtapeForm| f.address.clone()
                            set=|f: &mut EtapeForm, v| f.address = v
                        />
                        <BoundInput
                            state=form
                            label="Country"
                            get=|f: &EtapeForm| f.country.clone()
                            set=|f: &mut EtapeForm, v| f.country = v
                        />
                        <BoundInput
                            state=form
                            label="Region"
                            get=|f: &EtapeForm| f.region.clone()
                            set=|f: &mut EtapeForm, v| f.region = v
                        />
                        <BoundInput
                            state=form
                            label="Expenses (€)"
                            kind="number"
                            get=|f: &EtapeForm| f.expenses.clone()
                            set=|f: &mut EtapeForm, v| f.expenses = v
                        />
                        <BoundInput
                            state=form
                            label="Notes"
                            multiline=true
                            get=|f: &EtapeForm| f.notes.clone()
                            set=|f: &mut EtapeForm, v| f.notes = v
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
                        let trip = voyage_id.get()?;
                        let etape_id = editing.get()?;
                        Some(
                            view! {
                                <MediaGallery
                                    media=media_rows
                                    owner=MediaOwner { voyage_id: trip, etape_id: Some(etape_id) }
                                    on_changed=reload_media
                                />
                            },
                        )
                    }}
                </Show>
            </Show>
        </section>
    }
}
