//! Client wrappers for current-user endpoints.

use crate::{
    api::AppError,
    features::me::types::{LoginRecord, PasswordChange, Profile, ProfileUpdate},
    service::SessionService,
    session::PROFILE_PATH,
};
use serde_json::Value;

const CHANGE_PASSWORD_PATH: &str = "/user/change-password/";
const LOGIN_HISTORY_PATH: &str = "/user/login-history/";

impl SessionService {
    /// Fetches the authenticated user's profile.
    ///
    /// # Errors
    /// Returns the pipeline's `AppError` after it has been toasted.
    pub async fn profile(&self) -> Result<Profile, AppError> {
        self.guarded(self.api().get(PROFILE_PATH, None)).await
    }

    /// Updates email and/or username; the server returns the new profile.
    ///
    /// # Errors
    /// Returns the pipeline's `AppError` after it has been toasted.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Profile, AppError> {
        self.guarded(self.api().put(PROFILE_PATH, update)).await
    }

    /// Rotates the password. Never log the request.
    ///
    /// # Errors
    /// Returns the pipeline's `AppError` after it has been toasted.
    pub async fn change_password(&self, change: &PasswordChange) -> Result<Value, AppError> {
        self.guarded(async {
            self.api()
                .post(CHANGE_PASSWORD_PATH, Some(&change.body()))
                .await
        })
        .await
    }

    /// Lists the caller's own login records.
    ///
    /// # Errors
    /// Returns the pipeline's `AppError` after it has been toasted.
    pub async fn login_history(&self) -> Result<Vec<LoginRecord>, AppError> {
        self.guarded(self.api().get(LOGIN_HISTORY_PATH, None)).await
    }
}
