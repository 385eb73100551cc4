//! Error taxonomy shared by the session store, fetcher, mutators and flows.
//!
//! Every failure is one [`ApiError`] variant so callers branch on
//! [`ApiError::kind`] instead of inspecting message strings. Only the flows
//! and the CLI turn these into user-visible text.

use serde_json::Value;

/// Errors produced by the request/session layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// An authenticated call was attempted with no stored session.
    #[error("not logged in")]
    Unauthenticated,

    /// The request could not be sent or the response could not be received.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The server answered an authenticated call with a non-success status.
    #[error("request failed with status {status}: {message}")]
    RequestFailed { status: u16, message: String },

    /// The login endpoint answered with a non-success status.
    ///
    /// `detail` is the parsed error body, kept whole so callers can attribute
    /// the error to a form field.
    #[error("{message}")]
    LoginRejected { status: u16, message: String, detail: Value },

    /// A success status arrived with a body that is not the expected JSON.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("request body encode failed: {0}")]
    Encode(String),

    /// The session store could not be written or cleared.
    #[error("session storage failed: {0}")]
    Storage(String),

    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    Config(String),
}

/// Discriminant of [`ApiError`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unauthenticated,
    Transport,
    RequestFailed,
    LoginRejected,
    MalformedResponse,
    Encode,
    Storage,
    Config,
}

impl ApiError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthenticated => ErrorKind::Unauthenticated,
            Self::Transport(_) => ErrorKind::Transport,
            Self::RequestFailed { .. } => ErrorKind::RequestFailed,
            Self::LoginRejected { .. } => ErrorKind::LoginRejected,
            Self::MalformedResponse(_) => ErrorKind::MalformedResponse,
            Self::Encode(_) => ErrorKind::Encode,
            Self::Storage(_) => ErrorKind::Storage,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// HTTP status carried by the error, if the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } | Self::LoginRejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Structured server-supplied detail, present only on login rejections.
    #[must_use]
    pub fn detail(&self) -> Option<&Value> {
        match self {
            Self::LoginRejected { detail, .. } => Some(detail),
            _ => None,
        }
    }

    /// Grepable error code for logs and CLI output.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "E_UNAUTHENTICATED",
            Self::Transport(_) => "E_TRANSPORT",
            Self::RequestFailed { .. } => "E_REQUEST_FAILED",
            Self::LoginRejected { .. } => "E_LOGIN_REJECTED",
            Self::MalformedResponse(_) => "E_MALFORMED_RESPONSE",
            Self::Encode(_) => "E_ENCODE",
            Self::Storage(_) => "E_STORAGE",
            Self::Config(_) => "E_CONFIG",
        }
    }
}

/// Pull a human-readable `message` field out of a JSON error body.
pub(crate) fn message_field(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .filter(|message| !message.trim().is_empty())
        .map(ToOwned::to_owned)
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
