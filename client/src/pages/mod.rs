//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration (params, fetch guards, submit
//! handlers) and delegates persistence to `services` and rendering details
//! to `components`.

pub mod etape_detail;
pub mod etape_form;
pub mod home;
pub mod login;
pub mod not_found;
pub mod signup;
pub mod tag_form;
pub mod tag_list;
pub mod voyage_detail;
pub mod voyage_form;
pub mod voyage_list;
