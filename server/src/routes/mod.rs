//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The server has no API of its own: every record lives in the hosted
//! backend. It renders the Leptos shell for each client route, serves the
//! compiled WASM bundle under `/pkg`, answers `/healthz`, and redirects any
//! other path to the not-found screen.

use std::path::PathBuf;

use axum::Router;
use axum::http::StatusCode;
use axum::response::Redirect;
use axum::routing::get;
use client::config::BackendConfig;
use leptos::prelude::*;
use leptos_axum::{LeptosRoutes, generate_route_list};
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::ServerError;

/// Leptos SSR app plus static assets and the health check.
///
/// # Errors
///
/// Returns an error if the Leptos configuration cannot be loaded (missing or
/// malformed `[workspace.metadata.leptos]` section).
pub fn leptos_app(backend: Option<BackendConfig>) -> Result<Router, ServerError> {
    let conf = get_configuration(None).map_err(|e| ServerError::Leptos(e.to_string()))?;
    let leptos_options = conf.leptos_options;
    let routes = generate_route_list(client::app::App);

    let leptos_router = Router::new()
        .leptos_routes(&leptos_options, routes, {
            let opts = leptos_options.clone();
            move || client::app::shell(opts.clone(), backend.clone())
        })
        .with_state(leptos_options.clone());

    let site_root_path = PathBuf::from(leptos_options.site_root.as_ref());

    Ok(Router::new()
        .route("/healthz", get(healthz))
        .merge(leptos_router)
        .nest_service("/pkg", ServeDir::new(site_root_path.join("pkg")))
        .fallback(redirect_unknown)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http()))
}

/// Paths outside the route table land on the app's not-found screen.
async fn redirect_unknown() -> Redirect {
    Redirect::temporary(client::routes::NOT_FOUND)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
