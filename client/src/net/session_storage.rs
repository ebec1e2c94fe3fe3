//! Browser persistence for the current session.
//!
//! The session survives reloads in `localStorage`, the way the hosted
//! backend's own browser SDK keeps it. Server rendering has no storage, so
//! every call is a no-op there.
//!
//! TRADE-OFFS
//! ==========
//! Storage access is best-effort: a blocked or full storage area only costs a
//! re-login on the next visit, so failures are logged and swallowed.

use super::types::Session;

#[cfg(feature = "hydrate")]
const STORAGE_KEY: &str = "travel_log_session";

#[cfg(feature = "hydrate")]
fn storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

/// Read the stored session, discarding entries that no longer parse.
pub fn load() -> Option<Session> {
    #[cfg(feature = "hydrate")]
    {
        let raw = storage()?.get_item(STORAGE_KEY).ok()??;
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                log::warn!("discarding unreadable stored session: {e}");
                clear();
                None
            }
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        None
    }
}

pub fn save(session: &Session) {
    #[cfg(feature = "hydrate")]
    {
        let Some(storage) = storage() else {
            return;
        };
        match serde_json::to_string(session) {
            Ok(raw) => {
                if storage.set_item(STORAGE_KEY, &raw).is_err() {
                    log::warn!("could not persist session to localStorage");
                }
            }
            Err(e) => log::warn!("could not serialize session: {e}"),
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = session;
    }
}

pub fn clear() {
    #[cfg(feature = "hydrate")]
    {
        if let Some(storage) = storage() {
            let _ = storage.remove_item(STORAGE_KEY);
        }
    }
}
