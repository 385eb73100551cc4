//! Session credential bundle, role tags, and login credentials.
//!
//! A [`Session`] is all-or-nothing: every credential field is present and
//! non-empty, or there is no session. [`Session::validate`] enforces that for
//! both login responses and stored bundles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// ROLE
// =============================================================================

/// Role tag issued with a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    Administrator,
    /// Building representative.
    Predstavnik,
    /// Co-owner.
    Suvlasnik,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Administrator => "Administrator",
            Self::Predstavnik => "Predstavnik",
            Self::Suvlasnik => "Suvlasnik",
        }
    }

    #[must_use]
    pub fn is_admin(self) -> bool {
        self == Self::Administrator
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "Administrator" => Ok(Self::Administrator),
            "Predstavnik" => Ok(Self::Predstavnik),
            "Suvlasnik" => Ok(Self::Suvlasnik),
            _ => Err(UnknownRole(raw.to_owned())),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = UnknownRole;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_owned()
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// Header names derived from a session, in the order they are attached.
pub const SESSION_HEADERS: [&str; 5] = ["access-token", "client", "token-type", "uid", "expiry"];

/// Credential bundle issued by a successful login.
///
/// Deserializes straight from the login response body: the access token may
/// arrive as `accessToken` or `token`, and `expiry` as a string or number.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(alias = "token")]
    pub access_token: String,
    pub client: String,
    pub token_type: String,
    pub uid: String,
    #[serde(deserialize_with = "string_or_number")]
    pub expiry: String,
    pub role: Role,
}

impl Session {
    /// Reject bundles with any blank credential field.
    ///
    /// # Errors
    ///
    /// Returns the name of the first blank field.
    pub fn validate(self) -> Result<Self, &'static str> {
        let fields = [
            ("accessToken", &self.access_token),
            ("client", &self.client),
            ("tokenType", &self.token_type),
            ("uid", &self.uid),
            ("expiry", &self.expiry),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(name);
            }
        }
        Ok(self)
    }

    /// The five session-derived request headers, paired with their values.
    #[must_use]
    pub fn headers(&self) -> [(&'static str, &str); 5] {
        [
            (SESSION_HEADERS[0], self.access_token.as_str()),
            (SESSION_HEADERS[1], self.client.as_str()),
            (SESSION_HEADERS[2], self.token_type.as_str()),
            (SESSION_HEADERS[3], self.uid.as_str()),
            (SESSION_HEADERS[4], self.expiry.as_str()),
        ]
    }
}

// Tokens stay out of logs and panic messages.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .field("client", &self.client)
            .field("token_type", &self.token_type)
            .field("uid", &self.uid)
            .field("expiry", &self.expiry)
            .field("role", &self.role)
            .finish()
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}

// =============================================================================
// LOGIN CREDENTIALS
// =============================================================================

/// Body of the login request.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LoginCredentials {
    Password { email: String, password: String },
    /// ID token issued by Google sign-in.
    OAuth { credential: String },
}

impl LoginCredentials {
    #[must_use]
    pub fn password(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Password { email: email.into(), password: password.into() }
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Password { email, .. } => {
                f.debug_struct("Password").field("email", email).field("password", &"<redacted>").finish()
            }
            Self::OAuth { .. } => f.debug_struct("OAuth").field("credential", &"<redacted>").finish(),
        }
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
