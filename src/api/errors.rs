use serde_json::Value;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Timeout: {0}")]
    Timeout(String),
    #[error("Request failed ({status}): {message}")]
    Http {
        status: u16,
        message: String,
        detail: Option<String>,
    },
    #[error("Response error: {0}")]
    Parse(String),
    #[error("Request error: {0}")]
    Serialization(String),
    #[error("{0}")]
    Validation(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

impl AppError {
    /// HTTP status of the failed response, if one was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// True when the request never produced a response.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout(_))
    }

    /// Server-supplied detail message, if any.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Http { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Per-field validation messages from a 400 body, formatted as `field: message`.
    #[must_use]
    pub fn field_errors(&self) -> Vec<String> {
        let Self::Http {
            status: 400,
            message,
            ..
        } = self
        else {
            return Vec::new();
        };

        let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(message) else {
            return Vec::new();
        };

        fields
            .iter()
            .filter(|(field, _)| field.as_str() != "detail")
            .filter_map(|(field, value)| {
                first_message(value).map(|text| {
                    if field == "non_field_errors" {
                        text.to_string()
                    } else {
                        format!("{field}: {text}")
                    }
                })
            })
            .collect()
    }
}

/// Extracts the `detail` message from a JSON error body, falling back to the
/// first `non_field_errors` entry.
pub(crate) fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    value
        .get("detail")
        .and_then(Value::as_str)
        .or_else(|| value.get("non_field_errors").and_then(first_message))
        .map(str::trim)
        .filter(|detail| !detail.is_empty())
        .map(ToString::to_string)
}

fn first_message(value: &Value) -> Option<&str> {
    match value {
        Value::String(text) => Some(text.as_str()),
        Value::Array(items) => items.first().and_then(Value::as_str),
        _ => None,
    }
}
