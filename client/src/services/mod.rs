//! Domain services for trips, stops, tags and media.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages call these functions with the shared backend handles from context.
//! Each service owns one table's column mapping, its form validation and
//! the follow-up route after a save, so pages only bind inputs to signals.
//!
//! ERROR HANDLING
//! ==============
//! Reads return `BackendError`; form submissions return display strings,
//! with validation messages produced before any request is made.

pub mod associations;
pub mod etapes;
pub mod fields;
pub mod media;
pub mod tags;
pub mod voyages;
