//! Tags: user-owned labels attached to trips and stops.

#[cfg(test)]
#[path = "tags_test.rs"]
mod tags_test;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::net::backend::{DataBackend, fetch_all, fetch_optional, insert_one, update_all};
use crate::net::error::BackendError;
use crate::net::query::{Direction, Query};
use crate::routes;

pub const TABLE: &str = "Tags";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    #[serde(rename = "titre")]
    pub title: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Tag editor input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagForm {
    pub title: String,
}

impl TagForm {
    pub fn from_tag(tag: &Tag) -> Self {
        Self { title: tag.title.clone() }
    }

    /// # Errors
    ///
    /// Returns the message to show when the title is blank.
    pub fn validate(&self) -> Result<String, &'static str> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err("Tag title is required.");
        }
        Ok(title.to_owned())
    }
}

/// The user's tags, ordered by title, optionally narrowed by a search.
pub fn list_query(user_id: &str, search: &str) -> Query {
    let mut query = Query::from(TABLE).eq("user_id", user_id);
    let search = search.trim();
    if !search.is_empty() {
        query = query.ilike("titre", search);
    }
    query.order("titre", Direction::Ascending)
}

/// # Errors
///
/// Propagates backend failures.
pub async fn list(data: &dyn DataBackend, user_id: &str, search: &str) -> Result<Vec<Tag>, BackendError> {
    fetch_all(data, &list_query(user_id, search)).await
}

/// # Errors
///
/// Propagates backend failures.
pub async fn get(data: &dyn DataBackend, id: i64) -> Result<Option<Tag>, BackendError> {
    fetch_optional(data, &Query::from(TABLE).eq("id", id)).await
}

/// Validate and store the form, returning the route to show next.
///
/// # Errors
///
/// Returns the validation message (nothing sent) or the backend's message.
pub async fn save(data: &dyn DataBackend, user_id: &str, editing: Option<i64>, form: &TagForm) -> Result<String, String> {
    let title = form.validate()?;
    match editing {
        None => {
            insert_one::<Tag, _>(data, TABLE, &json!({ "titre": title, "user_id": user_id }))
                .await
                .map_err(|e| e.to_string())?;
        }
        Some(id) => {
            let rows: Vec<Tag> = update_all(data, &Query::from(TABLE).eq("id", id), &json!({ "titre": title }))
                .await
                .map_err(|e| e.to_string())?;
            if rows.is_empty() {
                return Err("Tag not found.".to_owned());
            }
        }
    }
    Ok(routes::TAGS.to_owned())
}

/// # Errors
///
/// Propagates backend failures.
pub async fn delete(data: &dyn DataBackend, id: i64) -> Result<(), BackendError> {
    log::info!("deleting tag {id}");
    data.delete(&Query::from(TABLE).eq("id", id)).await
}
