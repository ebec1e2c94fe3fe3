//! Reusable UI components shared by the pages.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components read the backend handle and the session signal from context;
//! page-specific state arrives through props.

pub mod access_gate;
pub mod bound_input;
pub mod confirm_dialog;
pub mod media_gallery;
pub mod navbar;
pub mod tag_picker;
pub mod voyage_card;
