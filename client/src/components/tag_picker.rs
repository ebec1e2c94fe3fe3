//! Checkbox list for choosing a record's tags.

#[cfg(test)]
#[path = "tag_picker_test.rs"]
mod tag_picker_test;

use leptos::prelude::*;

use crate::routes;
use crate::services::tags::Tag;

/// Add `id` to the selection, or remove it if already selected.
pub fn toggle_tag(selected: &mut Vec<i64>, id: i64) {
    if let Some(pos) = selected.iter().position(|t| *t == id) {
        selected.remove(pos);
    } else {
        selected.push(id);
        selected.sort_unstable();
    }
}

#[component]
pub fn TagPicker(#[prop(into)] tags: Signal<Vec<Tag>>, selected: RwSignal<Vec<i64>>) -> impl IntoView {
    view! {
        <fieldset class="tag-picker">
            <legend>"Tags"</legend>
            <Show
                when=move || !tags.with(Vec::is_empty)
                fallback=|| {
                    view! {
                        <p class="tag-picker__empty">
                            "No tags yet. " <a href=routes::NEW_TAG>"Create one"</a>
                        </p>
                    }
                }
            >
                {move || {
                    tags.get()
                        .into_iter()
                        .map(|tag| {
                            let id = tag.id;
                            view! {
                                <label class="tag-picker__option">
                                    <input
                                        type="checkbox"
                                        prop:checked=move || selected.with(|s| s.contains(&id))
                                        on:change=move |_| selected.update(|s| toggle_tag(s, id))
                                    />
                                    <span>{tag.title}</span>
                                </label>
                            }
                        })
                        .collect::<Vec<_>>()
                }}
            </Show>
        </fieldset>
    }
}
