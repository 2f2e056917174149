//! Console configuration with defaults and optional overrides. Overrides come
//! from the command line or the `GOLDENLOCK_*` environment variables and are
//! normalized before use, so blank values never replace a default.
//! Configuration values are public; do not store secrets here.

use crate::api::AppError;
use std::{path::PathBuf, time::Duration};
use url::Url;

/// Default API base URL, matching the backend's development address.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
/// Default request timeout applied to every HTTP call.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
/// Default toast lifetime in milliseconds.
pub const DEFAULT_TOAST_DURATION_MS: u64 = 5_000;

/// Console configuration.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_base_url: String,
    pub timeout: Duration,
    pub toast_duration_ms: u64,
    pub session_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            toast_duration_ms: DEFAULT_TOAST_DURATION_MS,
            session_file: default_session_file(),
        }
    }
}

impl AppConfig {
    /// Builds a config from defaults and the provided overrides.
    ///
    /// # Errors
    /// Returns `AppError::Config` when the API base URL is not an absolute http(s) URL.
    pub fn load(overrides: Overrides) -> Result<Self, AppError> {
        let mut config = Self::default();
        apply_overrides(&mut config, overrides);
        config.api_base_url = validate_base_url(&config.api_base_url)?;
        Ok(config)
    }
}

/// Optional values that replace defaults when present.
#[derive(Debug, Default)]
pub struct Overrides {
    pub api_base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub toast_duration_ms: Option<u64>,
    pub session_file: Option<String>,
}

fn apply_overrides(config: &mut AppConfig, overrides: Overrides) {
    if let Some(value) = overrides.api_base_url.as_deref().and_then(normalize_value) {
        config.api_base_url = value;
    }
    if let Some(seconds) = overrides.timeout_seconds.filter(|seconds| *seconds > 0) {
        config.timeout = Duration::from_secs(seconds);
    }
    if let Some(duration) = overrides.toast_duration_ms {
        config.toast_duration_ms = duration;
    }
    if let Some(path) = overrides.session_file.as_deref().and_then(normalize_value) {
        config.session_file = Some(PathBuf::from(path));
    }
}

/// Trims a value and rejects it when empty.
pub(crate) fn normalize_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn validate_base_url(raw: &str) -> Result<String, AppError> {
    let url = Url::parse(raw)
        .map_err(|err| AppError::Config(format!("Invalid API base URL {raw}: {err}")))?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(AppError::Config(format!(
                "Invalid API base URL {raw}: unsupported scheme {scheme}"
            )))
        }
    }

    if url.host().is_none() {
        return Err(AppError::Config(format!(
            "Invalid API base URL {raw}: no host specified"
        )));
    }

    Ok(raw.trim_end_matches('/').to_string())
}

fn default_session_file() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(|home| PathBuf::from(home).join(".goldenlock").join("session.json"))
}
