//! Centralized API error handling. Every service call is wrapped on its own:
//! a failure surfaces exactly one toast and the original error is handed back to
//! the caller, which may still recover locally (keep a form filled, show an
//! inline banner) but must not toast the same error again.

use crate::{api::AppError, notify::NotificationStore};
use std::future::Future;
use tracing::debug;

pub const INVALID_REQUEST: &str = "Invalid request";
pub const SESSION_EXPIRED: &str = "Session expired. Please login again.";
pub const PERMISSION_DENIED: &str = "Permission denied";
pub const REQUEST_FAILED: &str = "An error occurred. Please try again.";
pub const NETWORK_ERROR: &str = "Network error. Please check your connection.";
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred.";

/// Error classes used to pick the user-facing message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    Validation,
    Authentication,
    Authorization,
    Server,
    Network,
    Unexpected,
}

impl ErrorClass {
    #[must_use]
    pub fn of(err: &AppError) -> Self {
        match err {
            AppError::Http { status: 400, .. } => Self::Validation,
            AppError::Http { status: 401, .. } => Self::Authentication,
            AppError::Http { status: 403, .. } => Self::Authorization,
            AppError::Http { .. } => Self::Server,
            AppError::Network(_) | AppError::Timeout(_) => Self::Network,
            _ => Self::Unexpected,
        }
    }
}

/// User-facing message for a failed call.
#[must_use]
pub fn notice(err: &AppError) -> String {
    match ErrorClass::of(err) {
        ErrorClass::Validation => err.detail().unwrap_or(INVALID_REQUEST).to_string(),
        ErrorClass::Authentication => SESSION_EXPIRED.to_string(),
        ErrorClass::Authorization => PERMISSION_DENIED.to_string(),
        ErrorClass::Server => REQUEST_FAILED.to_string(),
        ErrorClass::Network => NETWORK_ERROR.to_string(),
        ErrorClass::Unexpected => UNEXPECTED_ERROR.to_string(),
    }
}

/// Emits the toast for `err`. Only the status and class are logged, never the body.
pub fn handle_api_error(err: &AppError, notifier: &NotificationStore) {
    let class = ErrorClass::of(err);
    debug!(status = ?err.status(), class = ?class, "api error");
    notifier.error(notice(err), None);
}

/// Awaits `operation`; on failure notifies once and returns the original error.
///
/// # Errors
/// Returns the error produced by `operation`, unchanged.
pub async fn with_error_handling<T, F>(notifier: &NotificationStore, operation: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    match operation.await {
        Ok(value) => Ok(value),
        Err(err) => {
            handle_api_error(&err, notifier);
            Err(err)
        }
    }
}
