//! Trips ("voyages"): the top-level travel records.
//!
//! DESIGN
//! ======
//! `VoyageForm` mirrors the editor inputs as raw text; `validate` turns it
//! into a `VoyageDraft` or the first error message. The list screen builds a
//! `Query` from `VoyageFilter`, adding one filter per non-blank field.

#[cfg(test)]
#[path = "voyages_test.rs"]
mod voyages_test;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::associations::{self, Parent};
use super::fields::{amount_text, date_text, nullable_list, parse_amount, parse_date};
use crate::net::backend::{DataBackend, fetch_all, fetch_optional, insert_one, update_all};
use crate::net::error::BackendError;
use crate::net::query::{Direction, Query};
use crate::routes;
use crate::util::text_list::{join_list, split_list};

pub const TABLE: &str = "Voyages";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Voyage {
    pub id: i64,
    pub label: String,
    #[serde(default, deserialize_with = "nullable_list")]
    pub regions: Vec<String>,
    #[serde(rename = "pays", default, deserialize_with = "nullable_list")]
    pub countries: Vec<String>,
    #[serde(rename = "villes", default, deserialize_with = "nullable_list")]
    pub cities: Vec<String>,
    #[serde(rename = "date_depart", default)]
    pub departure: Option<NaiveDate>,
    #[serde(rename = "date_arrivee", default)]
    pub arrival: Option<NaiveDate>,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(rename = "depenses", default)]
    pub expenses: Option<f64>,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Validated trip fields, as written to the table.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct VoyageDraft {
    pub label: String,
    pub regions: Vec<String>,
    #[serde(rename = "pays")]
    pub countries: Vec<String>,
    #[serde(rename = "villes")]
    pub cities: Vec<String>,
    #[serde(rename = "date_depart")]
    pub departure: Option<NaiveDate>,
    #[serde(rename = "date_arrivee")]
    pub arrival: Option<NaiveDate>,
    pub budget: Option<f64>,
    #[serde(rename = "depenses")]
    pub expenses: Option<f64>,
}

#[derive(Serialize)]
struct NewVoyage<'a> {
    #[serde(flatten)]
    draft: &'a VoyageDraft,
    user_id: &'a str,
}

// =============================================================================
// FORM
// =============================================================================

/// Raw editor inputs. List fields are comma-separated text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VoyageForm {
    pub label: String,
    pub regions: String,
    pub countries: String,
    pub cities: String,
    pub departure: String,
    pub arrival: String,
    pub budget: String,
    pub expenses: String,
}

impl VoyageForm {
    pub fn from_voyage(voyage: &Voyage) -> Self {
        Self {
            label: voyage.label.clone(),
            regions: join_list(&voyage.regions),
            countries: join_list(&voyage.countries),
            cities: join_list(&voyage.cities),
            departure: date_text(voyage.departure),
            arrival: date_text(voyage.arrival),
            budget: amount_text(voyage.budget),
            expenses: amount_text(voyage.expenses),
        }
    }

    /// # Errors
    ///
    /// Returns the first message to show, in field order.
    pub fn validate(&self) -> Result<VoyageDraft, &'static str> {
        let label = self.label.trim();
        if label.is_empty() {
            return Err("Trip name is required.");
        }
        let departure = parse_date(&self.departure, "Departure date is not a valid date.")?;
        let arrival = parse_date(&self.arrival, "Return date is not a valid date.")?;
        if let (Some(start), Some(end)) = (departure, arrival) {
            if end < start {
                return Err("Return date cannot be before the departure date.");
            }
        }
        Ok(VoyageDraft {
            label: label.to_owned(),
            regions: split_list(&self.regions),
            countries: split_list(&self.countries),
            cities: split_list(&self.cities),
            departure,
            arrival,
            budget: parse_amount(&self.budget, "Budget must be a non-negative number.")?,
            expenses: parse_amount(&self.expenses, "Expenses must be a non-negative number.")?,
        })
    }
}

// =============================================================================
// LIST FILTER
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Departure,
    Name,
    Budget,
}

impl SortKey {
    pub fn column(self) -> &'static str {
        match self {
            Self::Departure => "date_depart",
            Self::Name => "label",
            Self::Budget => "budget",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VoyageSort {
    pub key: SortKey,
    pub direction: Direction,
}

impl Default for VoyageSort {
    fn default() -> Self {
        Self { key: SortKey::Departure, direction: Direction::Descending }
    }
}

impl VoyageSort {
    pub const OPTIONS: [(Self, &'static str); 6] = [
        (Self { key: SortKey::Departure, direction: Direction::Descending }, "Departure (latest first)"),
        (Self { key: SortKey::Departure, direction: Direction::Ascending }, "Departure (earliest first)"),
        (Self { key: SortKey::Name, direction: Direction::Ascending }, "Name (A to Z)"),
        (Self { key: SortKey::Name, direction: Direction::Descending }, "Name (Z to A)"),
        (Self { key: SortKey::Budget, direction: Direction::Ascending }, "Budget (lowest first)"),
        (Self { key: SortKey::Budget, direction: Direction::Descending }, "Budget (highest first)"),
    ];

    /// `<select>` option value, e.g. `date_depart.desc`.
    pub fn value(self) -> String {
        let direction = match self.direction {
            Direction::Ascending => "asc",
            Direction::Descending => "desc",
        };
        format!("{}.{direction}", self.key.column())
    }

    /// Inverse of [`value`](Self::value); unknown values give the default.
    pub fn from_value(value: &str) -> Self {
        Self::OPTIONS
            .iter()
            .map(|(sort, _)| *sort)
            .find(|sort| sort.value() == value)
            .unwrap_or_default()
    }
}

/// Trip list controls as typed. Blank or unparsable fields are ignored.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VoyageFilter {
    pub search: String,
    pub country: String,
    pub departs_after: String,
    pub returns_before: String,
    pub max_budget: String,
    pub sort: VoyageSort,
}

impl VoyageFilter {
    pub fn to_query(&self, user_id: &str) -> Query {
        let mut query = Query::from(TABLE).eq("user_id", user_id);
        let search = self.search.trim();
        if !search.is_empty() {
            query = query.ilike("label", search);
        }
        let country = self.country.trim();
        if !country.is_empty() {
            query = query.contains("pays", vec![country.to_owned()]);
        }
        if let Ok(Some(date)) = parse_date(&self.departs_after, "") {
            query = query.gte("date_depart", date.to_string());
        }
        if let Ok(Some(date)) = parse_date(&self.returns_before, "") {
            query = query.lte("date_arrivee", date.to_string());
        }
        if let Ok(Some(budget)) = parse_amount(&self.max_budget, "") {
            query = query.lte("budget", budget);
        }
        query.order(self.sort.key.column(), self.sort.direction)
    }

    pub fn is_narrowed(&self) -> bool {
        self.to_query("").filters().len() > 1
    }
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// # Errors
///
/// Propagates backend failures.
pub async fn list(data: &dyn DataBackend, user_id: &str, filter: &VoyageFilter) -> Result<Vec<Voyage>, BackendError> {
    fetch_all(data, &filter.to_query(user_id)).await
}

/// # Errors
///
/// Propagates backend failures.
pub async fn get(data: &dyn DataBackend, id: i64) -> Result<Option<Voyage>, BackendError> {
    fetch_optional(data, &Query::from(TABLE).eq("id", id)).await
}

/// # Errors
///
/// Propagates backend failures.
pub async fn create(data: &dyn DataBackend, user_id: &str, draft: &VoyageDraft) -> Result<Voyage, BackendError> {
    insert_one(data, TABLE, &NewVoyage { draft, user_id }).await
}

/// # Errors
///
/// Propagates backend failures; a missing row is a 404 rejection.
pub async fn update(data: &dyn DataBackend, id: i64, draft: &VoyageDraft) -> Result<Voyage, BackendError> {
    let mut rows: Vec<Voyage> = update_all(data, &Query::from(TABLE).eq("id", id), draft).await?;
    rows.pop().ok_or_else(|| BackendError::Rejected { status: 404, message: "Trip not found.".to_owned() })
}

/// Validate and store the trip and its tag set; returns the route to show next.
///
/// # Errors
///
/// Returns the validation message (nothing sent) or the backend's message.
pub async fn save(
    data: &dyn DataBackend,
    user_id: &str,
    editing: Option<i64>,
    form: &VoyageForm,
    tag_ids: &[i64],
) -> Result<String, String> {
    let draft = form.validate()?;
    let voyage = match editing {
        None => create(data, user_id, &draft).await,
        Some(id) => update(data, id, &draft).await,
    }
    .map_err(|e| e.to_string())?;
    associations::replace(data, Parent::Voyage(voyage.id), tag_ids)
        .await
        .map_err(|e| e.to_string())?;
    log::info!("saved trip {}", voyage.id);
    Ok(routes::voyage_edit(voyage.id))
}

pub const DELETE_PROMPT: &str = "Delete this trip?";

/// Delete the trip if `confirm` accepts; true when a delete was issued.
///
/// Stops, media and tag links are removed by the backend's cascade.
///
/// # Errors
///
/// Propagates backend failures.
pub async fn delete_confirmed(
    data: &dyn DataBackend,
    id: i64,
    confirm: impl FnOnce(&str) -> bool,
) -> Result<bool, BackendError> {
    if !confirm(DELETE_PROMPT) {
        return Ok(false);
    }
    data.delete(&Query::from(TABLE).eq("id", id)).await?;
    log::info!("deleted trip {id}");
    Ok(true)
}
