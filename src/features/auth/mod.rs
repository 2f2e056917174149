//! Auth feature: login, registration and logout. Login stores the minimal
//! session cache; logout clears it whatever the server says. Passwords are held
//! as `SecretString` and are only exposed while serializing the request body.

pub mod client;
pub mod types;

pub use types::{LoginResponse, RegisterRequest};
