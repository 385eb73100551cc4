//! Client configuration parsed from environment variables.

use std::path::PathBuf;

use crate::store::SESSION_KEY;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_USERS_PATH: &str = "/users";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub login_path: String,
    pub users_path: String,
    pub session_file: PathBuf,
    pub timeouts: Timeouts,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            login_path: DEFAULT_LOGIN_PATH.to_owned(),
            users_path: DEFAULT_USERS_PATH.to_owned(),
            session_file: default_session_file(),
            timeouts: Timeouts::default(),
        }
    }
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// All optional:
    /// - `EZGRADA_API_URL`: API base URL, trailing `/` trimmed
    /// - `EZGRADA_LOGIN_PATH`: default `/login`
    /// - `EZGRADA_USERS_PATH`: default `/users`
    /// - `EZGRADA_SESSION_FILE`: default `session.json` in the platform data dir
    /// - `EZGRADA_REQUEST_TIMEOUT_SECS`: default 30
    /// - `EZGRADA_CONNECT_TIMEOUT_SECS`: default 10
    #[must_use]
    pub fn from_env() -> Self {
        let api_url = std::env::var("EZGRADA_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_owned());
        let login_path = std::env::var("EZGRADA_LOGIN_PATH").unwrap_or_else(|_| DEFAULT_LOGIN_PATH.to_owned());
        let users_path = std::env::var("EZGRADA_USERS_PATH").unwrap_or_else(|_| DEFAULT_USERS_PATH.to_owned());
        let session_file = std::env::var_os("EZGRADA_SESSION_FILE").map_or_else(default_session_file, PathBuf::from);
        let timeouts = Timeouts {
            request_secs: env_parse_u64("EZGRADA_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("EZGRADA_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        Self { api_url: trim_base_url(&api_url), login_path, users_path, session_file, timeouts }
    }

    /// Replace the API base URL, normalizing the trailing slash.
    #[must_use]
    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = trim_base_url(api_url);
        self
    }

    #[must_use]
    pub fn with_session_file(mut self, session_file: impl Into<PathBuf>) -> Self {
        self.session_file = session_file.into();
        self
    }
}

pub(crate) fn trim_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_owned()
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

/// `session.json` in the platform data dir, or the working directory.
#[must_use]
pub fn default_session_file() -> PathBuf {
    let file = format!("{SESSION_KEY}.json");
    if let Some(dirs) = directories::ProjectDirs::from("hr", "ezgrada", "ezgrada") {
        dirs.data_dir().join(file)
    } else {
        PathBuf::from(file)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
