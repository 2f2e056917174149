//! Client-side form checks run before any request is sent. Failures are
//! reported as `AppError::Validation` and never reach the network.

use crate::api::AppError;
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use std::sync::LazyLock;

pub const MIN_PASSWORD_LENGTH: usize = 8;

// compiled once; `None` only if the literal pattern fails to build
static EMAIL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

#[must_use]
pub fn valid_email(email: &str) -> bool {
    EMAIL
        .as_ref()
        .is_some_and(|re| re.is_match(email.trim()))
}

/// Returns the message for a too-short password, if any.
#[must_use]
pub fn password_problem(password: &str) -> Option<&'static str> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        Some("Password must be at least 8 characters long")
    } else {
        None
    }
}

/// Registration form: email, password and confirmation are required.
///
/// # Errors
/// Returns `AppError::Validation` with the first problem found.
pub fn validate_registration(
    email: &str,
    password: &SecretString,
    confirm: &SecretString,
) -> Result<(), AppError> {
    let password = password.expose_secret();
    let confirm = confirm.expose_secret();

    if email.trim().is_empty() || password.is_empty() || confirm.is_empty() {
        return Err(invalid("Please fill in all required fields"));
    }
    if !valid_email(email) {
        return Err(invalid("Please enter a valid email address"));
    }
    if let Some(problem) = password_problem(password) {
        return Err(invalid(problem));
    }
    if password != confirm {
        return Err(invalid("Passwords do not match"));
    }
    Ok(())
}

/// Admin user form. New users need a password; edits may leave it blank.
///
/// # Errors
/// Returns `AppError::Validation` with the first problem found.
pub fn validate_user_form(
    email: &str,
    password: Option<&SecretString>,
    confirm: Option<&SecretString>,
    is_edit: bool,
) -> Result<(), AppError> {
    if email.trim().is_empty() {
        return Err(invalid("Email is required"));
    }
    if !valid_email(email) {
        return Err(invalid("Please enter a valid email address"));
    }

    let password = password.map_or("", |secret| secret.expose_secret());
    let confirm = confirm.map_or("", |secret| secret.expose_secret());

    if password.is_empty() {
        if is_edit {
            return Ok(());
        }
        return Err(invalid("Password is required for new users"));
    }
    if let Some(problem) = password_problem(password) {
        return Err(invalid(problem));
    }
    if password != confirm {
        return Err(invalid("Passwords do not match"));
    }
    Ok(())
}

/// Password change form.
///
/// # Errors
/// Returns `AppError::Validation` when the new password and confirmation differ.
pub fn validate_password_change(new: &SecretString, confirm: &SecretString) -> Result<(), AppError> {
    if new.expose_secret() != confirm.expose_secret() {
        return Err(invalid("New passwords do not match"));
    }
    Ok(())
}

fn invalid(message: &str) -> AppError {
    AppError::Validation(message.to_string())
}
