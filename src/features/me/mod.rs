//! Current-user feature: profile read/update, password change and the caller's
//! own login history.

pub mod client;
pub mod types;

pub use types::{LoginRecord, PasswordChange, Profile, ProfileUpdate};
