//! `ApiClient` wires configuration, transport and session store together.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::fetcher::{Fetcher, resolve_url};
use crate::forms::NewUser;
use crate::mutators;
use crate::session::{LoginCredentials, Session};
use crate::store::{FileSessionStore, SessionStore};
use crate::transport::{ReqwestTransport, Transport};

pub struct ApiClient {
    config: ClientConfig,
    fetcher: Fetcher,
}

impl ApiClient {
    /// Production wiring: `reqwest` transport, file-backed session store.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the HTTP client cannot be built.
    pub fn from_config(config: ClientConfig) -> Result<Self, ApiError> {
        let transport = Arc::new(ReqwestTransport::new(config.timeouts)?);
        let store = Arc::new(FileSessionStore::new(config.session_file.clone()));
        Ok(Self::new(config, transport, store))
    }

    #[must_use]
    pub fn new(config: ClientConfig, transport: Arc<dyn Transport>, store: Arc<dyn SessionStore>) -> Self {
        let fetcher = Fetcher::new(&config.api_url, transport, store);
        Self { config, fetcher }
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        self.fetcher.store()
    }

    /// Snapshot of the stored session.
    #[must_use]
    pub fn session(&self) -> Option<Session> {
        self.store().read()
    }

    /// Exchange credentials for a session. Does not touch the store.
    ///
    /// # Errors
    ///
    /// See [`mutators::login`].
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<Session, ApiError> {
        let url = resolve_url(&self.config.api_url, &self.config.login_path);
        mutators::login(self.fetcher.transport().as_ref(), &url, credentials).await
    }

    /// # Errors
    ///
    /// See [`mutators::create`].
    pub async fn create<B, R>(&self, target: &str, resource: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        mutators::create(&self.fetcher, target, resource).await
    }

    /// # Errors
    ///
    /// See [`mutators::update`].
    pub async fn update<B, R>(&self, target: &str, resource: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        mutators::update(&self.fetcher, target, resource).await
    }

    /// # Errors
    ///
    /// See [`mutators::remove`].
    pub async fn remove<B, R>(&self, target: &str, resource: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        mutators::remove(&self.fetcher, target, resource).await
    }

    /// `POST` a new user to the configured users path.
    ///
    /// # Errors
    ///
    /// See [`mutators::create`].
    pub async fn create_user(&self, user: &NewUser) -> Result<Value, ApiError> {
        self.create(&self.config.users_path, user).await
    }

    /// Forget the stored session. Local only; the server is not told.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] if the store cannot be cleared.
    pub fn logout(&self) -> Result<(), ApiError> {
        self.store().clear()?;
        tracing::info!("logged out");
        Ok(())
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
