//! Authenticated fetcher: one HTTP call with the stored session attached.
//!
//! HEADERS
//! =======
//! `Content-Type: application/json`, then caller headers, then the five
//! session headers. Caller headers that collide with any of those reserved
//! names are dropped, so callers can add headers but never replace them.
//!
//! ERRORS
//! ======
//! No session → `Unauthenticated` (nothing is sent). Non-2xx →
//! `RequestFailed`. 2xx with an unparseable or mis-shaped body →
//! `MalformedResponse`. Exchange failures → `Transport`.

use std::sync::Arc;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ApiError, message_field};
use crate::session::{SESSION_HEADERS, Session};
use crate::store::SessionStore;
use crate::transport::{HttpRequest, HttpResponse, Transport};

pub const CONTENT_TYPE: &str = "Content-Type";
pub const ACCEPT: &str = "Accept";
pub const JSON: &str = "application/json";

/// Method, body and extra headers for one call.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    #[must_use]
    pub fn new(method: Method) -> Self {
        Self { method, body: None, headers: Vec::new() }
    }

    #[must_use]
    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

pub struct Fetcher {
    base_url: String,
    transport: Arc<dyn Transport>,
    store: Arc<dyn SessionStore>,
}

impl Fetcher {
    #[must_use]
    pub fn new(base_url: &str, transport: Arc<dyn Transport>, store: Arc<dyn SessionStore>) -> Self {
        Self { base_url: crate::config::trim_base_url(base_url), transport, store }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    #[must_use]
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Absolute URLs pass through; anything else is joined onto the base URL.
    #[must_use]
    pub fn resolve_url(&self, target: &str) -> String {
        resolve_url(&self.base_url, target)
    }

    /// Perform one authenticated call and decode the JSON answer as `T`.
    ///
    /// The session is read once, at call time.
    ///
    /// # Errors
    ///
    /// See the module docs for the four failure kinds.
    pub async fn fetch<T: DeserializeOwned>(&self, target: &str, options: RequestOptions) -> Result<T, ApiError> {
        let session = self.store.read().ok_or(ApiError::Unauthenticated)?;
        let url = self.resolve_url(target);
        let body = options.body.as_ref().map(Value::to_string);
        let request =
            HttpRequest { method: options.method, url, headers: authenticated_headers(&session, options.headers), body };

        tracing::debug!(method = %request.method, url = %request.url, "authenticated request");
        let url = request.url.clone();
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(request_failed(&url, &response));
        }
        decode_json(&response.body)
    }
}

pub(crate) fn resolve_url(base_url: &str, target: &str) -> String {
    if target.starts_with("http://") || target.starts_with("https://") {
        return target.to_owned();
    }
    if target.starts_with('/') {
        format!("{base_url}{target}")
    } else {
        format!("{base_url}/{target}")
    }
}

fn is_reserved(name: &str) -> bool {
    name.eq_ignore_ascii_case(CONTENT_TYPE) || SESSION_HEADERS.iter().any(|reserved| name.eq_ignore_ascii_case(reserved))
}

/// Merge JSON, caller and session headers; caller headers never win.
#[must_use]
pub fn authenticated_headers(session: &Session, extra: Vec<(String, String)>) -> Vec<(String, String)> {
    let mut headers = Vec::with_capacity(extra.len() + 1 + SESSION_HEADERS.len());
    headers.push((CONTENT_TYPE.to_owned(), JSON.to_owned()));
    for (name, value) in extra {
        if is_reserved(&name) {
            tracing::debug!(header = %name, "dropping caller header that shadows a reserved header");
            continue;
        }
        headers.push((name, value));
    }
    headers.extend(session.headers().into_iter().map(|(name, value)| (name.to_owned(), value.to_owned())));
    headers
}

/// Decode a success body. An empty body is JSON `null`.
pub(crate) fn decode_json<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let body = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(|e| ApiError::MalformedResponse(e.to_string()))
}

fn request_failed(url: &str, response: &HttpResponse) -> ApiError {
    let message = serde_json::from_str::<Value>(&response.body)
        .ok()
        .as_ref()
        .and_then(message_field)
        .unwrap_or_else(|| format!("request to {url} failed with status {}", response.status));
    ApiError::RequestFailed { status: response.status, message }
}

#[cfg(test)]
#[path = "fetcher_test.rs"]
mod tests;
