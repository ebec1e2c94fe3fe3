//! Read-only trip page: dates, places, money, tags, stops and cover image.

use leptos::prelude::*;
use leptos_router::hooks::use_params_map;

use crate::components::voyage_card::date_range_text;
use crate::net::Backend;
use crate::net::error::BackendError;
use crate::routes;
use crate::services::associations::{self, Parent};
use crate::services::etapes::{self, Etape};
use crate::services::fields::display_amount;
use crate::services::media::{self, Media};
use crate::services::tags::Tag;
use crate::services::voyages::{self, Voyage};
use crate::util::fetch_guard::{FetchGuard, spawn_guarded};
use crate::util::text_list::display_list;

#[derive(Clone, Debug, PartialEq)]
struct VoyageDetail {
    voyage: Voyage,
    tags: Vec<Tag>,
    etapes: Vec<Etape>,
    cover: Option<Media>,
}

async fn load_detail(backend: &Backend, id: i64) -> Result<Option<VoyageDetail>, BackendError> {
    let data = backend.data.as_ref();
    let Some(voyage) = voyages::get(data, id).await? else {
        return Ok(None);
    };
    let tags = associations::tags_for(data, Parent::Voyage(id)).await?;
    let etapes = etapes::list_for_voyage(data, id).await?;
    let cover = media::primary_for_voyage(data, id).await?;
    Ok(Some(VoyageDetail { voyage, tags, etapes, cover }))
}

#[component]
pub fn VoyageDetailPage() -> impl IntoView {
    let backend = expect_context::<Backend>();
    let params = use_params_map();
    let voyage_id = Memo::new(move |_| params.read().get("id").and_then(|raw| routes::parse_id(&raw)));

    let guard = FetchGuard::new();
    on_cleanup({
        let guard = guard.clone();
        move || guard.invalidate()
    });
    // `None` while loading, then `Some(None)` for a missing trip.
    let detail = RwSignal::new(None::<Option<VoyageDetail>>);
    let error = RwSignal::new(None::<String>);

    Effect::new(move || {
        detail.set(None);
        let Some(id) = voyage_id.get() else {
            detail.set(Some(None));
            return;
        };
        let backend = backend.clone();
        spawn_guarded(
            &guard,
            async move { load_detail(&backend, id).await },
            move |result| match result {
                Ok(found) => detail.set(Some(found)),
                Err(e) => {
                    log::warn!("trip {id} failed to load: {e}");
                    error.set(Some(e.to_string()));
                    detail.set(Some(None));
                }
            },
        );
    });

    view! {
        <section class="voyage-detail-page">
            <a class="btn btn--ghost" href=routes::VOYAGES>"← All trips"</a>
            <Show when=move || error.get().is_some()>
                <p class="page-error" role="alert">{move || error.get().unwrap_or_default()}</p>
            </Show>
            {move || match detail.get() {
                None => view! { <p class="loading">"Loading trip..."</p> }.into_any(),
                Some(None) => {
                    view! {
                        <div class="not-found">
                            <h1>"Trip not found"</h1>
                            <a class="btn" href=routes::VOYAGES>"Back to my trips"</a>
                        </div>
                    }
                        .into_any()
                }
                Some(Some(found)) => view! { <VoyageDetailView detail=found/> }.into_any(),
            }}
        </section>
    }
}

#[component]
fn VoyageDetailView(detail: VoyageDetail) -> impl IntoView {
    let VoyageDetail { voyage, tags, etapes, cover } = detail;
    let id = voyage.id;
    let spent = etapes::total_expenses(&etapes);
    let no_stops = etapes.is_empty();

    view! {
        <article class="voyage-detail">
            <header class="page-header">
                <h1>{voyage.label.clone()}</h1>
                <a class="btn btn--primary" href=routes::voyage_edit(id)>"Edit"</a>
            </header>
            {cover.map(|m| view! { <img class="voyage-detail__cover" src=m.url alt=m.name/> })}
            <dl class="voyage-detail__facts">
                <dt>"Dates"</dt>
                <dd>{date_range_text(voyage.departure, voyage.arrival)}</dd>
                <dt>"Countries"</dt>
                <dd>{display_list(&voyage.countries)}</dd>
                <dt>"Regions"</dt>
                <dd>{display_list(&voyage.regions)}</dd>
                <dt>"Cities"</dt>
                <dd>{display_list(&voyage.cities)}</dd>
                <dt>"Budget"</dt>
                <dd>{display_amount(voyage.budget)}</dd>
                <dt>"Expenses"</dt>
                <dd>{display_amount(voyage.expenses)}</dd>
                <dt>"Spent at stops"</dt>
                <dd>{display_amount(Some(spent))}</dd>
            </dl>
            <ul class="tag-list tag-list--inline">
                {tags.into_iter().map(|t| view! { <li class="tag">{t.title}</li> }).collect::<Vec<_>>()}
            </ul>
            <h2>"Stops"</h2>
            {no_stops.then(|| view! { <p class="empty">"No stops yet."</p> })}
            <ol class="etape-list">
                {etapes
                    .into_iter()
                    .map(|e| {
                        view! {
                            <li>
                                <a href=routes::etape(id, e.id)>{e.label}</a>
                                {e.country.map(|c| view! { <span class="etape-list__place">{c}</span> })}
                            </li>
                        }
                    })
                    .collect::<Vec<_>>()}
            </ol>
        </article>
    }
}
