use crate::{api::AppError, session::Role};
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct User {
    pub id: u64,
    pub email: String,
    #[serde(default)]
    pub username: Option<String>,
    pub role: Role,
    pub is_active: bool,
    #[serde(default)]
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
}

/// Admin-authored user, used for both create and edit. On edit a missing
/// password leaves the current one in place.
#[derive(Debug)]
pub struct UserDraft {
    pub email: String,
    pub username: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub password: Option<SecretString>,
}

impl UserDraft {
    /// Pre-fills a draft from an existing user for editing.
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self {
            email: user.email.clone(),
            username: user.username.clone(),
            role: user.role.clone(),
            is_active: user.is_active,
            password: None,
        }
    }

    /// Refuses a role this client could not read back from the server, so
    /// saving an edited user never overwrites it with `unknown`.
    ///
    /// # Errors
    /// Returns `AppError::Validation` when the role is `Role::Unknown`.
    pub fn check_role(&self) -> Result<(), AppError> {
        if self.role == Role::Unknown {
            return Err(AppError::Validation(
                "Please choose a role (admin or user) before saving".to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn body(&self) -> UserDraftBody<'_> {
        UserDraftBody {
            email: self.email.trim(),
            username: self
                .username
                .as_deref()
                .map(str::trim)
                .filter(|username| !username.is_empty()),
            role: &self.role,
            is_active: self.is_active,
            password: self
                .password
                .as_ref()
                .map(|password| password.expose_secret())
                .filter(|password| !password.is_empty()),
        }
    }
}

#[derive(Serialize)]
pub(crate) struct UserDraftBody<'a> {
    pub email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<&'a str>,
    pub role: &'a Role,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<&'a str>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RecentLogin {
    pub user_email: String,
    #[serde(default)]
    pub ip_address: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AdminDashboard {
    pub total_users: u64,
    pub total_admins: u64,
    pub total_regular_users: u64,
    #[serde(default)]
    pub recent_logins: Vec<RecentLogin>,
}
