//! HTTP transport seam.
//!
//! The fetcher and mutators build an [`HttpRequest`] and hand it to a
//! [`Transport`]. [`ReqwestTransport`] is the real one; tests substitute a
//! recording fake so they can assert on exactly what would hit the wire.

use std::time::Duration;

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::config::Timeouts;
use crate::error::ApiError;

/// One outgoing HTTP exchange, fully resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Value of the first header named `name` (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Status and raw body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request and returns whatever the server answered.
///
/// Non-success statuses are not errors at this layer; only failures to
/// complete the exchange are.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] when the request cannot be sent or the
    /// response cannot be read.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// [`Transport`] over a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the HTTP client cannot be built.
    pub fn new(timeouts: Timeouts) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::Config(format!("HTTP client build failed: {e}")))?;
        Ok(Self { http })
    }
}

fn header_map(headers: &[(String, String)]) -> Result<HeaderMap, ApiError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ApiError::Transport(format!("invalid header name `{name}`: {e}")))?;
        let value =
            HeaderValue::from_str(value).map_err(|e| ApiError::Transport(format!("invalid value for `{name}`: {e}")))?;
        map.append(name, value);
    }
    Ok(map)
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let headers = header_map(&request.headers)?;
        let builder = self.http.request(request.method, &request.url).headers(headers);
        let builder = match request.body {
            Some(body) => builder.body(body),
            None => builder,
        };

        let response = builder.send().await.map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
#[path = "transport_test.rs"]
mod tests;
