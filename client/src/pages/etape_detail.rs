//! Read-only stop page with its tags and photos.

use leptos::prelude::*;
use leptos_router::hooks::use_params_map;

use crate::net::Backend;
use crate::net::error::BackendError;
use crate::routes;
use crate::services::associations::{self, Parent};
use crate::services::etapes::{self, Etape};
use crate::services::fields::display_amount;
use crate::services::media::{self, Media};
use crate::services::tags::Tag;
use crate::util::fetch_guard::{FetchGuard, spawn_guarded};

#[derive(Clone, Debug, PartialEq)]
struct EtapeDetail {
    etape: Etape,
    tags: Vec<Tag>,
    media: Vec<Media>,
}

async fn load_detail(backend: &Backend, voyage_id: i64, etape_id: i64) -> Result<Option<EtapeDetail>, BackendError> {
    let data = backend.data.as_ref();
    let Some(etape) = etapes::get(data, voyage_id, etape_id).await? else {
        return Ok(None);
    };
    let tags = associations::tags_for(data, Parent::Etape(etape_id)).await?;
    let media = media::list_for_etape(data, etape_id).await?;
    Ok(Some(EtapeDetail { etape, tags, media }))
}

fn optional_text(value: Option<String>) -> String {
    value.filter(|v| !v.trim().is_empty()).unwrap_or_else(|| "Not specified".to_owned())
}

#[component]
pub fn EtapeDetailPage() -> impl IntoView {
    let backend = expect_context::<Backend>();
    let params = use_params_map();
    let ids = Memo::new(move |_| {
        params.with(|p| {
            let voyage_id = p.get("id").and_then(|raw| routes::parse_id(&raw))?;
            let etape_id = p.get("etape_id").and_then(|raw| routes::parse_id(&raw))?;
            Some((voyage_id, etape_id))
        })
    });

    let guard = FetchGuard::new();
    on_cleanup({
        let guard = guard.clone();
        move || guard.invalidate()
    });
    let detail = RwSignal::new(None::<Option<EtapeDetail>>);
    let error = RwSignal::new(None::<String>);

    Effect::new(move || {
        detail.set(None);
        let Some((voyage_id, etape_id)) = ids.get() else {
            detail.set(Some(None));
            return;
        };
        let backend = backend.clone();
        spawn_guarded(
            &guard,
            async move { load_detail(&backend, voyage_id, etape_id).await },
            move |result| match result {
                Ok(found) => detail.set(Some(found)),
                Err(e) => {
                    log::warn!("stop {etape_id} failed to load: {e}");
                    error.set(Some(e.to_string()));
                    detail.set(Some(None));
                }
            },
        );
    });

    let back = move || ids.get().map_or_else(|| routes::VOYAGES.to_owned(), |(voyage_id, _)| routes::voyage(voyage_id));

    view! {
        <section class="etape-detail-page">
            <a class="btn btn--ghost" href=back>"← Back to trip"</a>
            <Show when=move || error.get().is_some()>
                <p class="page-error" role="alert">{move || error.get().unwrap_or_default()}</p>
            </Show>
            {move || match detail.get() {
                None => view! { <p class="loading">"Loading stop..."</p> }.into_any(),
                Some(None) => {
                    view! {
                        <div class="not-found">
                            <h1>"Stop not found"</h1>
                            <a class="btn" href=back()>"Back to trip"</a>
                        </div>
                    }
                        .into_any()
                }
                Some(Some(EtapeDetail { etape, tags, media })) => {
                    view! {
                        <article class="etape-detail">
                            <header class="page-header">
                                <h1>{etape.label.clone()}</h1>
                                <a class="btn btn--primary" href=routes::etape_edit(etape.voyage_id, etape.id)>
                                    "Edit"
                                </a>
                            </header>
                            <dl class="etape-detail__facts">
                                <dt>"Address"</dt>
                                <dd>{optional_text(etape.address)}</dd>
                                <dt>"Country"</dt>
                                <dd>{optional_text(etape.country)}</dd>
                                <dt>"Region"</dt>
                                <dd>{optional_text(etape.region)}</dd>
                                <dt>"Expenses"</dt>
                                <dd>{display_amount(etape.expenses)}</dd>
                            </dl>
                            {etape.notes.map(|notes| view! { <p class="etape-detail__notes">{notes}</p> })}
                            <ul class="tag-list tag-list--inline">
                                {tags.into_iter().map(|t| view! { <li class="tag">{t.title}</li> }).collect::<Vec<_>>()}
                            </ul>
                            <div class="media-grid">
                                {media
                                    .into_iter()
                                    .map(|m| {
                                        view! {
                                            <figure class="media-grid__item">
                                                <img src=m.url alt=m.name.clone()/>
                                                <figcaption>{m.name}</figcaption>
                                            </figure>
                                        }
                                    })
                                    .collect::<Vec<_>>()}
                            </div>
                        </article>
                    }
                        .into_any()
                }
            }}
        </section>
    }
}
