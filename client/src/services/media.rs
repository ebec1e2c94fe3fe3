//! Photo media attached to trips and stops.
//!
//! SYSTEM CONTEXT
//! ==============
//! Image bytes go to the object store; the `Medias` row keeps the public URL
//! (`url`) and the object path (`chemin`) so a delete can remove both. A
//! trip may flag at most one of its images as primary (`principal`).

#[cfg(test)]
#[path = "media_test.rs"]
mod media_test;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::net::backend::{DataBackend, ObjectStore, fetch_all, fetch_optional, insert_one};
use crate::net::error::BackendError;
use crate::net::query::{Direction, Query};
use crate::net::storage_client::object_path;

pub const TABLE: &str = "Medias";

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Media {
    pub id: i64,
    #[serde(rename = "nom")]
    pub name: String,
    pub url: String,
    #[serde(rename = "chemin", default)]
    pub path: Option<String>,
    pub voyage_id: i64,
    #[serde(default)]
    pub etape_id: Option<i64>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(rename = "principal", default)]
    pub primary: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A file read from the browser, ready to upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Where an upload belongs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MediaOwner {
    pub voyage_id: i64,
    pub etape_id: Option<i64>,
}

fn newest_first(query: Query) -> Query {
    query.order("created_at", Direction::Descending).order("id", Direction::Descending)
}

/// Every image of a trip, its stops' images included.
///
/// # Errors
///
/// Propagates backend failures.
pub async fn list_for_voyage(data: &dyn DataBackend, voyage_id: i64) -> Result<Vec<Media>, BackendError> {
    fetch_all(data, &newest_first(Query::from(TABLE).eq("voyage_id", voyage_id))).await
}

/// # Errors
///
/// Propagates backend failures.
pub async fn list_for_etape(data: &dyn DataBackend, etape_id: i64) -> Result<Vec<Media>, BackendError> {
    fetch_all(data, &newest_first(Query::from(TABLE).eq("etape_id", etape_id))).await
}

/// The image flagged as the trip's primary one, if any.
///
/// # Errors
///
/// Propagates backend failures.
pub async fn primary_for_voyage(data: &dyn DataBackend, voyage_id: i64) -> Result<Option<Media>, BackendError> {
    let query = Query::from(TABLE).eq("voyage_id", voyage_id).eq("principal", true);
    fetch_optional(data, &query).await
}

/// Store the bytes, then record the media row pointing at them.
///
/// # Errors
///
/// Propagates failures from either step. A failed row insert removes the
/// stored object again.
pub async fn upload(
    data: &dyn DataBackend,
    objects: &dyn ObjectStore,
    user_id: &str,
    owner: MediaOwner,
    upload: MediaUpload,
) -> Result<Media, BackendError> {
    let unique = uuid::Uuid::new_v4().simple().to_string();
    let path = object_path(user_id, owner.voyage_id, &unique, &upload.file_name);
    let content_type = if upload.content_type.is_empty() { FALLBACK_CONTENT_TYPE } else { &upload.content_type };
    let url = objects.upload(&path, upload.bytes, content_type).await?;

    let row = json!({
        "nom": upload.file_name,
        "url": url,
        "chemin": path,
        "voyage_id": owner.voyage_id,
        "etape_id": owner.etape_id,
        "user_id": user_id,
        "principal": false,
    });
    match insert_one::<Media, _>(data, TABLE, &row).await {
        Ok(media) => {
            log::info!("uploaded {} to {path}", media.name);
            Ok(media)
        }
        Err(e) => {
            if let Err(cleanup) = objects.remove(&path).await {
                log::warn!("orphaned object {path}: {cleanup}");
            }
            Err(e)
        }
    }
}

/// # Errors
///
/// Propagates backend failures.
pub async fn rename(data: &dyn DataBackend, media_id: i64, name: &str) -> Result<(), BackendError> {
    data.update(&Query::from(TABLE).eq("id", media_id), json!({ "nom": name.trim() })).await?;
    Ok(())
}

pub const DELETE_PROMPT: &str = "Delete this image?";

/// Delete the media row if `confirm` accepts, then its stored object.
///
/// Object removal is best effort: the row is what the screens list.
///
/// # Errors
///
/// Propagates the row delete failure.
pub async fn delete_confirmed(
    data: &dyn DataBackend,
    objects: &dyn ObjectStore,
    media: &Media,
    confirm: impl FnOnce(&str) -> bool,
) -> Result<bool, BackendError> {
    if !confirm(DELETE_PROMPT) {
        return Ok(false);
    }
    data.delete(&Query::from(TABLE).eq("id", media.id)).await?;
    if let Some(path) = &media.path {
        if let Err(e) = objects.remove(path).await {
            log::warn!("could not remove object {path}: {e}");
        }
    }
    Ok(true)
}

/// Flag `media_id` as the trip's only primary image.
///
/// # Errors
///
/// Propagates backend failures.
pub async fn set_primary(data: &dyn DataBackend, voyage_id: i64, media_id: i64) -> Result<(), BackendError> {
    let current = Query::from(TABLE).eq("voyage_id", voyage_id).eq("principal", true);
    data.update(&current, json!({ "principal": false })).await?;
    let chosen = Query::from(TABLE).eq("id", media_id).eq("voyage_id", voyage_id);
    let updated = data.update(&chosen, json!({ "principal": true })).await?;
    if updated.is_empty() {
        return Err(BackendError::Rejected { status: 404, message: "Image not found.".to_owned() });
    }
    Ok(())
}
