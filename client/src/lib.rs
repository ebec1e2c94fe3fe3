//! # client
//!
//! Leptos + WASM frontend for the travel journal: trips ("voyages") made of
//! ordered stops ("etapes"), with tags and photo media attached.
//!
//! Every record lives in the hosted backend. This crate holds the pages,
//! components, session state, domain services and the HTTP clients that
//! talk to the backend's auth, table and object-storage endpoints.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod routes;
pub mod services;
pub mod state;
pub mod util;

/// Browser entry point: install logging and hydrate the server-rendered shell.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        leptos::logging::warn!("console logger already installed: {e}");
    }
    leptos::mount::hydrate_body(app::App);
}
