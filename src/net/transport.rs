//! HTTP transport seam between [`super::api::ApiClient`] and the network.
//!
//! DESIGN
//! ======
//! `ApiClient` builds [`ApiRequest`] values and interprets [`RawResponse`]
//! values; only the [`Transport`] implementation touches sockets. Tests swap
//! in a scripted transport, production uses [`HttpTransport`].
//!
//! Two policies live here because they apply to every call:
//! - credentials: the reqwest cookie store keeps the backend's session cookie
//!   and sends it back on every request;
//! - content type: `application/json` unless the request overrides it.

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};

use super::error::ApiError;
use crate::config::HttpTimeouts;

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// A transport-agnostic request description.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: reqwest::Method,
    /// Path plus optional query string, relative to the base URL.
    pub path: String,
    pub body: Option<serde_json::Value>,
    /// Per-call header overrides, applied after the defaults.
    pub headers: Vec<(String, String)>,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: reqwest::Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), body: None, headers: Vec::new() }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(reqwest::Method::GET, path)
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(reqwest::Method::POST, path)
    }

    #[must_use]
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(reqwest::Method::PATCH, path)
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(reqwest::Method::DELETE, path)
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidInput`] if `body` cannot be serialized.
    pub fn json<T: serde::Serialize>(mut self, body: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::InvalidInput(e.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Headers as they will be sent: defaults first, then overrides by name.
    #[must_use]
    pub fn effective_headers(&self) -> Vec<(String, String)> {
        let mut out = vec![(CONTENT_TYPE.as_str().to_owned(), JSON_CONTENT_TYPE.to_owned())];
        for (name, value) in &self.headers {
            match out.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
                Some(existing) => existing.1.clone_from(value),
                None => out.push((name.clone(), value.clone())),
            }
        }
        out
    }
}

/// Status line and body text of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl RawResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Async seam for sending requests. Enables scripted transports in tests.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Send one request and return the raw response, whatever its status.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] when no HTTP response was received.
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, ApiError>;
}

// =============================================================================
// REQWEST TRANSPORT
// =============================================================================

/// Production transport backed by a cookie-keeping `reqwest::Client`.
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Build a transport rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] if the HTTP client cannot be constructed.
    pub fn new(base_url: &str, timeouts: HttpTimeouts) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(non_zero(timeouts.request))
            .connect_timeout(non_zero(timeouts.connect))
            .build()
            .map_err(|e| ApiError::Network(format!("http client build failed: {e}")))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_owned() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn non_zero(duration: Duration) -> Duration {
    if duration.is_zero() { Duration::from_secs(1) } else { duration }
}

fn header_map(pairs: &[(String, String)]) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    for (name, value) in pairs {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ApiError::InvalidInput(format!("invalid header name {name:?}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ApiError::InvalidInput(format!("invalid header value: {e}")))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        let url = format!("{}{}", self.base_url, request.path);
        let headers = header_map(&request.effective_headers())?;

        let mut builder = self.http.request(request.method.clone(), url).headers(headers);
        if let Some(body) = &request.body {
            let bytes = serde_json::to_vec(body).map_err(|e| ApiError::InvalidInput(e.to_string()))?;
            builder = builder.body(bytes);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or_default().to_owned();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(RawResponse { status: status.as_u16(), status_text, body })
    }
}
