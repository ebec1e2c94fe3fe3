//! Client-side paths, in one place so links and redirects agree with the
//! router table in `app`.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

pub const HOME: &str = "/";
pub const LOGIN: &str = "/login";
pub const SIGNUP: &str = "/signup";
pub const VOYAGES: &str = "/voyages";
pub const NEW_VOYAGE: &str = "/voyages/new";
pub const TAGS: &str = "/tags";
pub const NEW_TAG: &str = "/tags/new";
pub const NOT_FOUND: &str = "/404";

pub fn voyage(id: i64) -> String {
    format!("/voyages/{id}")
}

pub fn voyage_edit(id: i64) -> String {
    format!("/voyages/{id}/edit")
}

pub fn new_etape(voyage_id: i64) -> String {
    format!("/voyages/{voyage_id}/etapes/new")
}

pub fn etape(voyage_id: i64, etape_id: i64) -> String {
    format!("/voyages/{voyage_id}/etapes/{etape_id}")
}

pub fn etape_edit(voyage_id: i64, etape_id: i64) -> String {
    format!("/voyages/{voyage_id}/etapes/{etape_id}/edit")
}

pub fn tag_edit(id: i64) -> String {
    format!("/tags/{id}/edit")
}

/// Parse a numeric path parameter.
pub fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse().ok().filter(|id| *id > 0)
}
