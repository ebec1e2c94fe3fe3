//! Application state shared through Leptos context.

pub mod gate;
pub mod session;
