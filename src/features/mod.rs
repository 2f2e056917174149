//! Domain features (auth, current user, admin) and their shared validation. The
//! views import these modules to keep console code focused on rendering while
//! endpoint paths and payload shapes stay in one place per feature.

pub mod admin;
pub mod auth;
pub mod me;
pub mod validation;
