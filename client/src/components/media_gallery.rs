//! Image gallery with upload, rename, delete and primary-image controls.
//!
//! SYSTEM CONTEXT
//! ==============
//! Shown on the trip and stop editors. The owning page loads the media list
//! and passes it in; after any change the gallery asks the page to reload
//! through `on_changed`, so the list always reflects the backend.

use leptos::prelude::*;

use crate::net::Backend;
use crate::services::media::{self, Media, MediaOwner};
use crate::state::session::SessionState;
use crate::util::{browser, task};

#[component]
pub fn MediaGallery(
    #[prop(into)] media: Signal<Vec<Media>>,
    owner: MediaOwner,
    on_changed: Callback<()>,
    #[prop(optional)] allow_primary: bool,
) -> impl IntoView {
    let backend = expect_context::<Backend>();
    let session = expect_context::<RwSignal<SessionState>>();
    let busy = RwSignal::new(false);
    let error = RwSignal::new(None::<String>);

    let on_file = {
        let backend = backend.clone();
        move |ev: leptos::ev::Event| {
            #[cfg(feature = "hydrate")]
            {
                let Some(file) = browser::selected_file(&ev) else {
                    return;
                };
                let Some(user_id) = session.get_untracked().user_id() else {
                    return;
                };
                busy.set(true);
                error.set(None);
                let backend = backend.clone();
                task::spawn(async move {
                    let result = match browser::read_file(&file).await {
                        Ok(upload) => {
                            media::upload(backend.data.as_ref(), backend.objects.as_ref(), &user_id, owner, upload)
                                .await
                                .map_err(|e| e.to_string())
                        }
                        Err(e) => Err(e),
                    };
                    busy.set(false);
                    match result {
                        Ok(_) => on_changed.run(()),
                        Err(e) => {
                            log::warn!("upload failed: {e}");
                            error.set(Some(e));
                        }
                    }
                });
            }
            #[cfg(not(feature = "hydrate"))]
            {
                let _ = (ev, &backend, session);
            }
        }
    };

    let delete = Callback::new({
        let backend = backend.clone();
        move |item: Media| {
            let backend = backend.clone();
            task::spawn(async move {
                match media::delete_confirmed(backend.data.as_ref(), backend.objects.as_ref(), &item, browser::confirm).await {
                    Ok(true) => on_changed.run(()),
                    Ok(false) => {}
                    Err(e) => error.set(Some(e.to_string())),
                }
            });
        }
    });

    let rename = Callback::new({
        let backend = backend.clone();
        move |item: Media| {
            let Some(name) = browser::prompt("New name for this photo", &item.name) else {
                return;
            };
            if name.trim().is_empty() || name.trim() == item.name {
                return;
            }
            let backend = backend.clone();
            task::spawn(async move {
                match media::rename(backend.data.as_ref(), item.id, &name).await {
                    Ok(()) => on_changed.run(()),
                    Err(e) => error.set(Some(e.to_string())),
                }
            });
        }
    });

    let make_primary = Callback::new(move |media_id: i64| {
        let backend = backend.clone();
        task::spawn(async move {
            match media::set_primary(backend.data.as_ref(), owner.voyage_id, media_id).await {
                Ok(()) => on_changed.run(()),
                Err(e) => error.set(Some(e.to_string())),
            }
        });
    });

    view! {
        <section class="media-gallery">
            <h2>"Photos"</h2>
            <label class="btn media-gallery__upload" class:btn--disabled=move || busy.get()>
                {move || if busy.get() { "Uploading..." } else { "Add a photo" }}
                <input type="file" accept="image/*" hidden disabled=move || busy.get() on:change=on_file/>
            </label>
            <Show when=move || error.get().is_some()>
                <p class="media-gallery__error" role="alert">{move || error.get().unwrap_or_default()}</p>
            </Show>
            <Show
                when=move || !media.with(Vec::is_empty)
                fallback=|| view! { <p class="media-gallery__empty">"No photos yet."</p> }
            >
                <ul class="media-gallery__grid">
                    {move || {
                        media
                            .get()
                            .into_iter()
                            .map(|item| {
                                let id = item.id;
                                let primary = item.primary;
                                let for_delete = item.clone();
                                let for_rename = item.clone();
                                view! {
                                    <li class="media-gallery__item" class:media-gallery__item--primary=primary>
                                        <img src=item.url alt=item.name.clone() loading="lazy"/>
                                        <span class="media-gallery__name">{item.name}</span>
                                        <div class="media-gallery__actions">
                                            <Show when=move || allow_primary && !primary>
                                                <button class="btn" on:click=move |_| make_primary.run(id)>
                                                    "Set as cover"
                                                </button>
                                            </Show>
                                            <Show when=move || primary>
                                                <span class="media-gallery__badge">"Cover"</span>
                                            </Show>
                                            <button class="btn" on:click=move |_| rename.run(for_rename.clone())>
                                                "Rename"
                                            </button>
                                            <button
                                                class="btn btn--danger"
                                                on:click=move |_| delete.run(for_delete.clone())
                                            >
                                                "Delete"
                                            </button>
                                        </div>
                                    </li>
                                }
                            })
                            .collect::<Vec<_>>()
                    }}
                </ul>
            </Show>
        </section>
    }
}
