use crate::session::Role;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Profile {
    pub id: u64,
    pub email: String,
    #[serde(default)]
    pub username: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Editable profile fields; `None` leaves the field unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl ProfileUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.username.is_none()
    }
}

#[derive(Debug)]
pub struct PasswordChange {
    pub old_password: SecretString,
    pub new_password: SecretString,
    pub confirm_password: SecretString,
}

impl PasswordChange {
    pub(crate) fn body(&self) -> PasswordChangeBody<'_> {
        PasswordChangeBody {
            old_password: self.old_password.expose_secret(),
            new_password: self.new_password.expose_secret(),
            confirm_password: self.confirm_password.expose_secret(),
        }
    }
}

#[derive(Serialize)]
pub(crate) struct PasswordChangeBody<'a> {
    pub old_password: &'a str,
    pub new_password: &'a str,
    pub confirm_password: &'a str,
}

/// One successful login, as recorded by the server.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LoginRecord {
    pub id: u64,
    pub user_email: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    pub timestamp: DateTime<Utc>,
}
