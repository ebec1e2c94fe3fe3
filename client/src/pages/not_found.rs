//! Shown for `/404`; every unknown path redirects here.

use leptos::prelude::*;

use crate::routes;

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <section class="not-found-page">
            <h1>"404"</h1>
            <p>"This page does not exist."</p>
            <div class="not-found-page__actions">
                <a class="btn" href=routes::HOME>"Home"</a>
                <a class="btn btn--primary" href=routes::VOYAGES>"My trips"</a>
            </div>
        </section>
    }
}
