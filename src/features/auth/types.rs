//! Request and response types for auth calls. Request types holding passwords
//! are never logged; their `Debug` output redacts the secret.

use crate::session::{Role, UserSession};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Wire body for `/auth/login/`.
#[derive(Serialize)]
pub(crate) struct LoginBody<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Login response; token fields the server may add are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub email: String,
    #[serde(default)]
    pub username: Option<String>,
    pub role: Role,
}

impl From<LoginResponse> for UserSession {
    fn from(response: LoginResponse) -> Self {
        Self {
            email: response.email,
            username: response.username,
            role: response.role,
        }
    }
}

/// Self-service registration.
#[derive(Debug)]
pub struct RegisterRequest {
    pub email: String,
    pub username: Option<String>,
    pub password: SecretString,
    pub role: Option<Role>,
}

impl RegisterRequest {
    pub(crate) fn body(&self) -> RegisterBody<'_> {
        RegisterBody {
            email: self.email.trim(),
            username: self
                .username
                .as_deref()
                .map(str::trim)
                .filter(|username| !username.is_empty()),
            password: self.password.expose_secret(),
            role: self.role.as_ref(),
        }
    }
}

#[derive(Serialize)]
pub(crate) struct RegisterBody<'a> {
    pub email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<&'a str>,
    pub password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<&'a Role>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn register_body_omits_blank_username_and_role() {
        let request = RegisterRequest {
            email: " ada@example.com ".to_string(),
            username: Some("  ".to_string()),
            password: SecretString::from("correct horse".to_string()),
            role: None,
        };

        let body = serde_json::to_value(request.body()).unwrap();
        assert_eq!(
            body,
            json!({"email": "ada@example.com", "password": "correct horse"})
        );
    }

    #[test]
    fn register_debug_redacts_password() {
        let request = RegisterRequest {
            email: "ada@example.com".to_string(),
            username: None,
            password: SecretString::from("correct horse".to_string()),
            role: Some(Role::User),
        };
        assert!(!format!("{request:?}").contains("correct horse"));
    }

    #[test]
    fn login_response_ignores_tokens() {
        let raw = json!({
            "email": "ada@example.com",
            "username": "ada",
            "role": "admin",
            "access": "a",
            "refresh": "r"
        });
        let response: LoginResponse = serde_json::from_value(raw).unwrap();
        let session = UserSession::from(response);
        assert!(session.role.is_admin());
        assert_eq!(session.username.as_deref(), Some("ada"));
    }
}
