//! Query filters for the admin list endpoints. Blank fields are omitted from the
//! request entirely; `all` selections for role and status mean "no filter".

use crate::{api::QueryParams, session::Role};

/// Filters for `/admin/users/`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub search: String,
    /// `None` lists every role.
    pub role: Option<Role>,
    /// `None` lists active and inactive users.
    pub active: Option<bool>,
    pub ordering: Option<String>,
}

impl UserFilter {
    /// Parses the role selector used by the console (`all`, `admin`, `user`).
    #[must_use]
    pub fn parse_role(value: &str) -> Option<Role> {
        match value.trim().to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "user" => Some(Role::User),
            _ => None,
        }
    }

    /// Parses the status selector used by the console (`all`, `active`, `inactive`).
    #[must_use]
    pub fn parse_status(value: &str) -> Option<bool> {
        match value.trim().to_lowercase().as_str() {
            "active" => Some(true),
            "inactive" => Some(false),
            _ => None,
        }
    }

    #[must_use]
    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params
            .insert("search", &self.search)
            .insert_opt("role", self.role.as_ref().map(ToString::to_string))
            .insert_opt("active", self.active.map(|active| active.to_string()))
            .insert_opt("ordering", self.ordering.as_deref());
        params
    }
}

/// Filters for `/admin/login-activities/`, as typed into the form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActivityFilter {
    pub user_id: String,
    pub start_date: String,
    pub end_date: String,
    pub ordering: Option<String>,
}

impl ActivityFilter {
    #[must_use]
    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params
            .insert("user_id", &self.user_id)
            .insert("start_date", &self.start_date)
            .insert("end_date", &self.end_date)
            .insert_opt("ordering", self.ordering.as_deref());
        params
    }
}
