//! Trip summary card used by the trip list.

#[cfg(test)]
#[path = "voyage_card_test.rs"]
mod voyage_card_test;

use chrono::NaiveDate;
use leptos::prelude::*;

use crate::routes;
use crate::services::fields::display_amount;
use crate::services::voyages::Voyage;
use crate::util::text_list::display_list;

/// "1 May 2024 → 12 May 2024", with open ends shown as "?".
pub fn date_range_text(departure: Option<NaiveDate>, arrival: Option<NaiveDate>) -> String {
    let show = |d: Option<NaiveDate>| d.map_or_else(|| "?".to_owned(), |d| d.format("%-d %b %Y").to_string());
    match (departure, arrival) {
        (None, None) => "Dates not set".to_owned(),
        _ => format!("{} → {}", show(departure), show(arrival)),
    }
}

#[component]
pub fn VoyageCard(voyage: Voyage, on_delete: Callback<i64>) -> impl IntoView {
    let id = voyage.id;
    view! {
        <article class="voyage-card">
            <h2 class="voyage-card__title">
                <a href=routes::voyage(id)>{voyage.label}</a>
            </h2>
            <p class="voyage-card__dates">{date_range_text(voyage.departure, voyage.arrival)}</p>
            <p class="voyage-card__places">{display_list(&voyage.countries)}</p>
            <p class="voyage-card__budget">"Budget: " {display_amount(voyage.budget)}</p>
            <div class="voyage-card__actions">
                <a class="btn" href=routes::voyage(id)>"View"</a>
                <a class="btn" href=routes::voyage_edit(id)>"Edit"</a>
                <button class="btn btn--danger" on:click=move |_| on_delete.run(id)>"Delete"</button>
            </div>
        </article>
    }
}
