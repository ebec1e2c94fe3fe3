//! Stops ("etapes") of a trip, kept in creation order.

#[cfg(test)]
#[path = "etapes_test.rs"]
mod etapes_test;

use serde::{Deserialize, Serialize};

use super::associations::{self, Parent};
use super::fields::{amount_text, optional_text, parse_amount};
use crate::net::backend::{DataBackend, fetch_all, fetch_optional, insert_one, update_all};
use crate::net::error::BackendError;
use crate::net::query::{Direction, Query};
use crate::routes;

pub const TABLE: &str = "Etapes";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Etape {
    pub id: i64,
    pub label: String,
    #[serde(rename = "adresse", default)]
    pub address: Option<String>,
    #[serde(rename = "pays", default)]
    pub country: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(rename = "depenses", default)]
    pub expenses: Option<f64>,
    pub voyage_id: i64,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct EtapeDraft {
    pub label: String,
    #[serde(rename = "adresse")]
    pub address: Option<String>,
    #[serde(rename = "pays")]
    pub country: Option<String>,
    pub region: Option<String>,
    pub notes: Option<String>,
    #[serde(rename = "depenses")]
    pub expenses: Option<f64>,
}

#[derive(Serialize)]
struct NewEtape<'a> {
    #[serde(flatten)]
    draft: &'a EtapeDraft,
    voyage_id: i64,
    user_id: &'a str,
}

/// Raw stop editor inputs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EtapeForm {
    pub label: String,
    pub address: String,
    pub country: String,
    pub region: String,
    pub notes: String,
    pub expenses: String,
}

impl EtapeForm {
    pub fn from_etape(etape: &Etape) -> Self {
        Self {
            label: etape.label.clone(),
            address: etape.address.clone().unwrap_or_default(),
            country: etape.country.clone().unwrap_or_default(),
            region: etape.region.clone().unwrap_or_default(),
            notes: etape.notes.clone().unwrap_or_default(),
            expenses: amount_text(etape.expenses),
        }
    }

    /// # Errors
    ///
    /// Returns the first message to show.
    pub fn validate(&self) -> Result<EtapeDraft, &'static str> {
        let label = self.label.trim();
        if label.is_empty() {
            return Err("Stop name is required.");
        }
        Ok(EtapeDraft {
            label: label.to_owned(),
            address: optional_text(&self.address),
            country: optional_text(&self.country),
            region: optional_text(&self.region),
            notes: optional_text(&self.notes),
            expenses: parse_amount(&self.expenses, "Expenses must be a non-negative number.")?,
        })
    }
}

/// Stops of a trip, oldest first.
///
/// # Errors
///
/// Propagates backend failures.
pub async fn list_for_voyage(data: &dyn DataBackend, voyage_id: i64) -> Result<Vec<Etape>, BackendError> {
    let query = Query::from(TABLE).eq("voyage_id", voyage_id).order("id", Direction::Ascending);
    fetch_all(data, &query).await
}

/// A stop, only if it belongs to `voyage_id`.
///
/// # Errors
///
/// Propagates backend failures.
pub async fn get(data: &dyn DataBackend, voyage_id: i64, etape_id: i64) -> Result<Option<Etape>, BackendError> {
    fetch_optional(data, &Query::from(TABLE).eq("id", etape_id).eq("voyage_id", voyage_id)).await
}

/// Validate and store the stop and its tag set; returns the route to show next.
///
/// # Errors
///
/// Returns the validation message (nothing sent) or the backend's message.
pub async fn save(
    data: &dyn DataBackend,
    user_id: &str,
    voyage_id: i64,
    editing: Option<i64>,
    form: &EtapeForm,
    tag_ids: &[i64],
) -> Result<String, String> {
    let draft = form.validate()?;
    let etape_id = match editing {
        None => {
            let row = NewEtape { draft: &draft, voyage_id, user_id };
            insert_one::<Etape, _>(data, TABLE, &row).await.map_err(|e| e.to_string())?.id
        }
        Some(id) => {
            let query = Query::from(TABLE).eq("id", id).eq("voyage_id", voyage_id);
            let rows: Vec<Etape> = update_all(data, &query, &draft).await.map_err(|e| e.to_string())?;
            if rows.is_empty() {
                return Err("Stop not found.".to_owned());
            }
            id
        }
    };
    associations::replace(data, Parent::Etape(etape_id), tag_ids)
        .await
        .map_err(|e| e.to_string())?;
    log::info!("saved stop {etape_id} of trip {voyage_id}");
    Ok(routes::voyage_edit(voyage_id))
}

pub const DELETE_PROMPT: &str = "Delete this stop?";

/// Delete the stop if `confirm` accepts; true when a delete was issued.
///
/// # Errors
///
/// Propagates backend failures.
pub async fn delete_confirmed(
    data: &dyn DataBackend,
    etape_id: i64,
    confirm: impl FnOnce(&str) -> bool,
) -> Result<bool, BackendError> {
    if !confirm(DELETE_PROMPT) {
        return Ok(false);
    }
    data.delete(&Query::from(TABLE).eq("id", etape_id)).await?;
    log::info!("deleted stop {etape_id}");
    Ok(true)
}

/// Sum of the stops' expenses.
pub fn total_expenses(etapes: &[Etape]) -> f64 {
    etapes.iter().filter_map(|e| e.expenses).sum()
}
