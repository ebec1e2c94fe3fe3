//! Labelled input bound to one text field of a form-state signal.
//!
//! DESIGN
//! ======
//! Forms keep their raw inputs in a single `RwSignal<Form>`; each control
//! gets a plain getter/setter pair instead of its own signal, so submitting
//! reads one consistent snapshot.

use leptos::prelude::*;

#[component]
pub fn BoundInput<T>(
    state: RwSignal<T>,
    label: &'static str,
    get: fn(&T) -> String,
    set: fn(&mut T, String),
    #[prop(default = "text")] kind: &'static str,
    #[prop(optional)] multiline: bool,
    #[prop(optional)] required: bool,
    #[prop(optional)] placeholder: &'static str,
) -> impl IntoView
where
    T: Send + Sync + 'static,
{
    let on_input = move |ev: leptos::ev::Event| {
        let value = event_target_value(&ev);
        state.update(|s| set(s, value));
    };
    let control = if multiline {
        view! {
            <textarea class="field__input" placeholder=placeholder prop:value=move || state.with(get) on:input=on_input></textarea>
        }
        .into_any()
    } else {
        view! {
            <input
                class="field__input"
                type=kind
                required=required
                placeholder=placeholder
                prop:value=move || state.with(get)
                on:input=on_input
            />
        }
        .into_any()
    };
    view! {
        <label class="field">
            <span class="field__label">{label}</span>
            {control}
        </label>
    }
}
