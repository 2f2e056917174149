//! Client wrappers for admin endpoints. Paths stay centralized here and the
//! backend enforces authorization.

use crate::{
    api::{AppError, QueryParams},
    features::admin::{
        filters::{ActivityFilter, UserFilter},
        types::{AdminDashboard, User, UserDraft},
    },
    features::me::LoginRecord,
    service::SessionService,
};
use serde_json::Value;

const DASHBOARD_PATH: &str = "/admin/dashboard/";
const USERS_PATH: &str = "/admin/users/";
const CREATE_USER_PATH: &str = "/admin/users/create/";
const LOGIN_ACTIVITIES_PATH: &str = "/admin/login-activities/";

fn user_path(id: u64) -> String {
    format!("{USERS_PATH}{id}/")
}

fn params_or_none(params: QueryParams) -> Option<QueryParams> {
    if params.is_empty() {
        None
    } else {
        Some(params)
    }
}

impl SessionService {
    /// Fetches aggregate counts and the most recent logins.
    ///
    /// # Errors
    /// Returns the pipeline's `AppError` after it has been toasted.
    pub async fn admin_dashboard(&self) -> Result<AdminDashboard, AppError> {
        self.guarded(self.api().get(DASHBOARD_PATH, None)).await
    }

    /// Lists users matching `filter`.
    ///
    /// # Errors
    /// Returns the pipeline's `AppError` after it has been toasted.
    pub async fn users(&self, filter: &UserFilter) -> Result<Vec<User>, AppError> {
        let params = params_or_none(filter.to_params());
        self.guarded(self.api().get(USERS_PATH, params)).await
    }

    /// Fetches one user.
    ///
    /// # Errors
    /// Returns the pipeline's `AppError` after it has been toasted.
    pub async fn user(&self, id: u64) -> Result<User, AppError> {
        let path = user_path(id);
        self.guarded(self.api().get(&path, None)).await
    }

    /// Creates a user on behalf of an admin.
    ///
    /// # Errors
    /// Returns `AppError::Validation` without sending anything when the draft's
    /// role is unknown, otherwise the pipeline's `AppError` after it has been toasted.
    pub async fn create_user(&self, draft: &UserDraft) -> Result<Value, AppError> {
        draft.check_role()?;
        self.guarded(async {
            self.api()
                .post(CREATE_USER_PATH, Some(&draft.body()))
                .await
        })
        .await
    }

    /// Replaces a user's editable fields.
    ///
    /// # Errors
    /// Returns `AppError::Validation` without sending anything when the draft's
    /// role is unknown, otherwise the pipeline's `AppError` after it has been toasted.
    pub async fn update_user(&self, id: u64, draft: &UserDraft) -> Result<User, AppError> {
        draft.check_role()?;
        let path = user_path(id);
        self.guarded(async { self.api().put(&path, &draft.body()).await })
            .await
    }

    /// Deletes a user. The server refuses to delete the caller's own account.
    ///
    /// # Errors
    /// Returns the pipeline's `AppError` after it has been toasted.
    pub async fn delete_user(&self, id: u64) -> Result<(), AppError> {
        let path = user_path(id);
        self.guarded(async {
            self.api().delete::<Value>(&path).await.map(|_| ())
        })
        .await
    }

    /// Lists login activities matching `filter`, newest first unless ordered otherwise.
    ///
    /// # Errors
    /// Returns the pipeline's `AppError` after it has been toasted.
    pub async fn login_activities(&self, filter: &ActivityFilter) -> Result<Vec<LoginRecord>, AppError> {
        let params = params_or_none(filter.to_params());
        self.guarded(self.api().get(LOGIN_ACTIVITIES_PATH, params))
            .await
    }
}
