//! Client wrappers for the auth endpoints.

use crate::{
    api::{AppError, RequestOptions},
    features::auth::types::{LoginBody, LoginResponse, RegisterRequest},
    service::SessionService,
    session::UserSession,
};
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, info};

const LOGIN_PATH: &str = "/auth/login/";
const REGISTER_PATH: &str = "/auth/register/";
const LOGOUT_PATH: &str = "/auth/logout/";

impl SessionService {
    /// Authenticates and lets the server set the session cookie. On success the
    /// minimal session cache is stored.
    ///
    /// # Errors
    /// Returns the pipeline's `AppError` after it has been toasted.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<LoginResponse, AppError> {
        let response: LoginResponse = self
            .guarded(async {
                let body = LoginBody {
                    email: email.trim(),
                    password: password.expose_secret(),
                };
                self.api().post(LOGIN_PATH, Some(&body)).await
            })
            .await?;

        info!(role = %response.role, "login succeeded");
        self.session().set(UserSession::from(response.clone()));
        Ok(response)
    }

    /// Creates an account.
    ///
    /// # Errors
    /// Returns the pipeline's `AppError` after it has been toasted.
    pub async fn register(&self, request: &RegisterRequest) -> Result<Value, AppError> {
        self.guarded(async {
            self.api()
                .post(REGISTER_PATH, Some(&request.body()))
                .await
        })
        .await
    }

    /// Invalidates the server session. A 401 means the session is already gone
    /// and is not an error. The local cache is cleared in every case.
    ///
    /// # Errors
    /// Returns the pipeline's `AppError` for failures other than 401.
    pub async fn logout(&self) -> Result<(), AppError> {
        let result = self
            .guarded(async {
                let options = RequestOptions::new().tolerate_unauthorized();
                match self
                    .api()
                    .request::<Value>(Method::POST, LOGOUT_PATH, options)
                    .await
                {
                    Ok(_) => Ok(()),
                    Err(err) if err.is_unauthorized() => {
                        debug!("logout: session already expired");
                        Ok(())
                    }
                    Err(err) => Err(err),
                }
            })
            .await;

        self.session().teardown();
        result
    }
}
