//! Admin feature: dashboard counts, user CRUD and the login-activity audit log.
//! The backend enforces authorization; the console only gates the views.

pub mod client;
pub mod filters;
pub mod types;

pub use filters::{ActivityFilter, UserFilter};
pub use types::{AdminDashboard, RecentLogin, User, UserDraft};
