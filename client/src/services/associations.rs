//! Tag associations for trips and stops.
//!
//! DESIGN
//! ======
//! A save replaces the whole association set: every row for the parent is
//! deleted, then the selection is inserted. The result is exactly the
//! selection, and saving the same selection again is a no-op in effect.
//!
//! TRADE-OFFS
//! ==========
//! The two requests are not atomic. If the insert fails after the delete,
//! the parent is left without tags until the next save.

#[cfg(test)]
#[path = "associations_test.rs"]
mod associations_test;

use std::collections::BTreeSet;

use serde::Deserialize;
use serde_json::{Value, json};

use super::tags::{self, Tag};
use crate::net::backend::{DataBackend, fetch_all};
use crate::net::error::BackendError;
use crate::net::query::{Direction, Query};

/// Record that owns a tag set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Parent {
    Voyage(i64),
    Etape(i64),
}

impl Parent {
    pub fn table(self) -> &'static str {
        match self {
            Self::Voyage(_) => "Voyages_Tags",
            Self::Etape(_) => "Etapes_Tags",
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            Self::Voyage(_) => "voyage_id",
            Self::Etape(_) => "etape_id",
        }
    }

    pub fn id(self) -> i64 {
        match self {
            Self::Voyage(id) | Self::Etape(id) => id,
        }
    }

    fn rows_query(self) -> Query {
        Query::from(self.table()).eq(self.column(), self.id())
    }
}

#[derive(Deserialize)]
struct Link {
    tag_id: i64,
}

/// Ids of the tags attached to `parent`, ascending and without duplicates.
///
/// # Errors
///
/// Propagates backend failures.
pub async fn tag_ids(data: &dyn DataBackend, parent: Parent) -> Result<Vec<i64>, BackendError> {
    let links: Vec<Link> = fetch_all(data, &parent.rows_query()).await?;
    let ids: BTreeSet<i64> = links.into_iter().map(|l| l.tag_id).collect();
    Ok(ids.into_iter().collect())
}

/// The tags attached to `parent`, ordered by title.
///
/// # Errors
///
/// Propagates backend failures.
pub async fn tags_for(data: &dyn DataBackend, parent: Parent) -> Result<Vec<Tag>, BackendError> {
    let ids = tag_ids(data, parent).await?;
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let query = Query::from(tags::TABLE)
        .is_in("id", ids.into_iter().map(Value::from).collect())
        .order("titre", Direction::Ascending);
    fetch_all(data, &query).await
}

/// Make the association set of `parent` exactly `selected`.
///
/// # Errors
///
/// Propagates backend failures from either step.
pub async fn replace(data: &dyn DataBackend, parent: Parent, selected: &[i64]) -> Result<(), BackendError> {
    data.delete(&parent.rows_query()).await?;
    let unique: BTreeSet<i64> = selected.iter().copied().collect();
    if unique.is_empty() {
        return Ok(());
    }
    let rows = unique
        .into_iter()
        .map(|tag_id| json!({ parent.column(): parent.id(), "tag_id": tag_id }))
        .collect();
    data.insert(parent.table(), rows).await?;
    log::debug!("{} tags set for {:?}", selected.len(), parent);
    Ok(())
}
