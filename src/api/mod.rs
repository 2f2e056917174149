//! HTTP client for the goldenlock JSON API with consistent timeouts and error
//! handling. Every request carries the session cookie jar and declares JSON
//! content negotiation. The client never reads or stores the cookie itself; it
//! only lets the jar replay what the server set.
//!
//! A 401 response emits `Route::Login` to the navigator so the console lands on
//! the login view. Calls that expect a 401 as a normal outcome (logout, the
//! silent session probe) opt out with [`RequestOptions::tolerate_unauthorized`].

mod errors;
mod params;

pub use errors::AppError;
pub use params::QueryParams;

use crate::{
    config::AppConfig,
    navigation::{Navigator, Route},
    APP_USER_AGENT,
};
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT},
    Client, Method, Response, StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info_span, warn, Instrument};

/// Maximum number of error body characters surfaced to the UI.
const MAX_ERROR_CHARS: usize = 200;

/// Per-request options.
#[derive(Clone, Debug, Default)]
pub struct RequestOptions {
    body: Option<Value>,
    params: QueryParams,
    tolerate_unauthorized: bool,
}

impl RequestOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes `body` as the JSON payload.
    ///
    /// # Errors
    /// Returns `AppError::Serialization` if the body cannot be encoded.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, AppError> {
        let value = serde_json::to_value(body)
            .map_err(|err| AppError::Serialization(format!("Failed to encode request: {err}")))?;
        self.body = Some(value);
        Ok(self)
    }

    #[must_use]
    pub fn params(mut self, params: QueryParams) -> Self {
        self.params = params;
        self
    }

    /// Skips the global 401 redirect for this request.
    #[must_use]
    pub fn tolerate_unauthorized(mut self) -> Self {
        self.tolerate_unauthorized = true;
        self
    }
}

/// Cookie-carrying JSON client. Cloning shares the connection pool and cookie jar.
#[derive(Clone, Debug)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    client: Client,
    base_url: String,
    navigator: Navigator,
}

impl ApiClient {
    /// Builds a client from the console config.
    ///
    /// # Errors
    /// Returns `AppError::Config` if the HTTP client cannot be constructed.
    pub fn new(config: &AppConfig, navigator: Navigator) -> Result<Self, AppError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .default_headers(headers)
            .cookie_store(true)
            .timeout(config.timeout)
            .build()
            .map_err(|err| AppError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            inner: Arc::new(Inner {
                client,
                base_url: config.api_base_url.clone(),
                navigator,
            }),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// GET a JSON resource, with optional query parameters.
    ///
    /// # Errors
    /// Returns an `AppError` on transport failure, non-success status, or undecodable body.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Option<QueryParams>,
    ) -> Result<T, AppError> {
        let options = RequestOptions::new().params(params.unwrap_or_default());
        self.request(Method::GET, path, options).await
    }

    /// POST an optional JSON body.
    ///
    /// # Errors
    /// Returns an `AppError` on transport failure, non-success status, or undecodable body.
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, AppError> {
        let mut options = RequestOptions::new();
        if let Some(body) = body {
            options = options.json(body)?;
        }
        self.request(Method::POST, path, options).await
    }

    /// PUT a JSON body.
    ///
    /// # Errors
    /// Returns an `AppError` on transport failure, non-success status, or undecodable body.
    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AppError> {
        let options = RequestOptions::new().json(body)?;
        self.request(Method::PUT, path, options).await
    }

    /// DELETE a resource; an empty 204 body decodes as `()`.
    ///
    /// # Errors
    /// Returns an `AppError` on transport failure, non-success status, or undecodable body.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        self.request(Method::DELETE, path, RequestOptions::new()).await
    }

    /// GET a JSON resource and return `None` on 204 or 401, without redirecting.
    ///
    /// # Errors
    /// Returns an `AppError` on transport failure, other non-success statuses, or undecodable body.
    pub async fn get_optional<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, AppError> {
        let options = RequestOptions::new().tolerate_unauthorized();
        let response = self.send(Method::GET, path, options).await?;

        match response.status() {
            StatusCode::NO_CONTENT | StatusCode::UNAUTHORIZED => Ok(None),
            _ => handle_json_response(response).await.map(Some),
        }
    }

    /// Sends a request and decodes the JSON response.
    ///
    /// # Errors
    /// Returns an `AppError` on transport failure, non-success status, or undecodable body.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, AppError> {
        let response = self.send(method, path, options).await?;
        handle_json_response(response).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<Response, AppError> {
        let url = build_url(&self.inner.base_url, path);
        let span = info_span!("api.request", http.method = %method, path = %path);

        let mut builder = self.inner.client.request(method, &url);
        if !options.params.is_empty() {
            builder = builder.query(options.params.as_pairs());
        }
        if let Some(body) = &options.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .instrument(span)
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        debug!(path = %path, status = status.as_u16(), "api response");

        if status == StatusCode::UNAUTHORIZED && !options.tolerate_unauthorized {
            warn!(path = %path, "unauthorized response, redirecting to login");
            self.inner.navigator.navigate(Route::Login);
        }

        Ok(response)
    }
}

/// Builds a URL from a base URL and the provided path.
fn build_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

/// Maps transport errors into `AppError` variants with timeout detection.
fn map_request_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::Timeout("Request timed out. Please try again.".to_string())
    } else if err.is_builder() {
        AppError::Config(format!("Failed to build request: {err}"))
    } else {
        AppError::Network(format!("Unable to reach the server: {err}"))
    }
}

/// Maps failures while reading a response body. The headers already arrived, so
/// a dropped or truncated body is still a transport failure.
fn map_read_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::Timeout("Request timed out. Please try again.".to_string())
    } else if err.is_body() || err.is_request() || err.is_connect() || err.is_decode() {
        AppError::Network(format!("Connection lost while reading the response: {err}"))
    } else {
        AppError::Parse(format!("Failed to read response: {err}"))
    }
}

/// Parses JSON responses and surfaces HTTP errors with sanitized bodies.
/// Empty success bodies decode as JSON `null`, so `()` and `Option<T>` work for 204s.
async fn handle_json_response<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
    let status = response.status();
    let body = response.text().await.map_err(map_read_error)?;

    if status.is_success() {
        let text = if body.trim().is_empty() { "null" } else { body.as_str() };
        serde_json::from_str(text)
            .map_err(|err| AppError::Parse(format!("Failed to decode response: {err}")))
    } else {
        let detail = errors::extract_detail(&body);
        Err(AppError::Http {
            status: status.as_u16(),
            message: sanitize_body(&body),
            detail,
        })
    }
}

/// Sanitizes HTTP error bodies for user-facing messages by trimming and truncating.
fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_url_joins_base_and_path() {
        assert_eq!(
            build_url("http://localhost:8000/", "/auth/login/"),
            "http://localhost:8000/auth/login/"
        );
        assert_eq!(
            build_url("http://localhost:8000", "user/profile/"),
            "http://localhost:8000/user/profile/"
        );
        assert_eq!(build_url("  ", "/auth/login/"), "/auth/login/");
    }

    #[test]
    fn sanitize_body_trims_and_truncates() {
        assert_eq!(sanitize_body("   "), "Request failed.");
        assert_eq!(sanitize_body("  nope \n"), "nope");
        let long = "x".repeat(MAX_ERROR_CHARS + 50);
        assert_eq!(sanitize_body(&long).chars().count(), MAX_ERROR_CHARS);
    }

    #[test]
    fn request_options_encode_body() {
        let options = RequestOptions::new()
            .json(&serde_json::json!({"email": "a@b.co"}))
            .map(RequestOptions::tolerate_unauthorized);
        let options = options.unwrap();
        assert!(options.tolerate_unauthorized);
        assert_eq!(options.body, Some(serde_json::json!({"email": "a@b.co"})));
    }
}
