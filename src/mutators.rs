//! Mutators: one HTTP verb each, fire-once.
//!
//! `create`/`update`/`remove` go through the [`Fetcher`] and so require a
//! session. `login` is a raw call: no session exists yet, and none of the
//! session headers are sent even if one is stored.
//!
//! Login failures keep the server's parsed error body as the error value
//! ([`ApiError::LoginRejected`]) because the login flow attributes it to a
//! form field; the other mutators report a generic [`ApiError::RequestFailed`].

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ApiError, message_field};
use crate::fetcher::{ACCEPT, CONTENT_TYPE, Fetcher, JSON, RequestOptions, decode_json};
use crate::session::{LoginCredentials, Session};
use crate::transport::{HttpRequest, Transport};

fn encode_body<B: Serialize + ?Sized>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Encode(e.to_string()))
}

/// `POST` the credentials to `url` and decode the issued session.
///
/// # Errors
///
/// [`ApiError::LoginRejected`] on a non-2xx answer, [`ApiError::MalformedResponse`]
/// when a 2xx body is not a complete login result, [`ApiError::Transport`]
/// when the exchange fails.
pub async fn login(transport: &dyn Transport, url: &str, credentials: &LoginCredentials) -> Result<Session, ApiError> {
    let body = encode_body(credentials)?.to_string();
    let request = HttpRequest {
        method: Method::POST,
        url: url.to_owned(),
        headers: vec![(ACCEPT.to_owned(), JSON.to_owned()), (CONTENT_TYPE.to_owned(), JSON.to_owned())],
        body: Some(body),
    };

    tracing::debug!(%url, "login request");
    let response = transport.send(request).await?;
    if !response.is_success() {
        let detail = serde_json::from_str::<Value>(&response.body).unwrap_or(Value::Null);
        let message =
            message_field(&detail).unwrap_or_else(|| format!("login failed with status {}", response.status));
        return Err(ApiError::LoginRejected { status: response.status, message, detail });
    }

    let session: Session = decode_json(&response.body)?;
    session
        .validate()
        .map_err(|field| ApiError::MalformedResponse(format!("login response has blank `{field}`")))
}

/// `POST` a new resource.
///
/// # Errors
///
/// Any [`Fetcher::fetch`] error.
pub async fn create<B, R>(fetcher: &Fetcher, target: &str, resource: &B) -> Result<R, ApiError>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    mutate(fetcher, Method::POST, target, resource).await
}

/// `PATCH` an existing resource.
///
/// # Errors
///
/// Any [`Fetcher::fetch`] error.
pub async fn update<B, R>(fetcher: &Fetcher, target: &str, resource: &B) -> Result<R, ApiError>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    mutate(fetcher, Method::PATCH, target, resource).await
}

/// `DELETE` a resource.
///
/// # Errors
///
/// Any [`Fetcher::fetch`] error.
pub async fn remove<B, R>(fetcher: &Fetcher, target: &str, resource: &B) -> Result<R, ApiError>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    mutate(fetcher, Method::DELETE, target, resource).await
}

async fn mutate<B, R>(fetcher: &Fetcher, method: Method, target: &str, resource: &B) -> Result<R, ApiError>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    if fetcher.store().read().is_none() {
        return Err(ApiError::Unauthenticated);
    }
    let options = RequestOptions::new(method).body(encode_body(resource)?);
    fetcher.fetch(target, options).await
}

#[cfg(test)]
#[path = "mutators_test.rs"]
mod tests;
