//! Login flow: credentials in, stored session and role redirect out.
//!
//! ORDERING
//! ========
//! On success the session is written to the store before navigation: the
//! destination page issues authenticated calls as soon as it loads.
//!
//! ERROR PLACEMENT
//! ===============
//! A rejected login always lands on the password field, never on email, so
//! the form does not reveal whether an email is registered.

use std::sync::Arc;

use super::{FlowState, StateCell, Submission};
use crate::client::ApiClient;
use crate::forms::{FormErrors, LoginField, LoginForm};
use crate::navigation::{Navigator, Route};
use crate::session::LoginCredentials;

pub type LoginState = FlowState<Route, LoginField>;
pub type LoginSubmission = Submission<Route, LoginField>;

pub struct LoginFlow {
    client: Arc<ApiClient>,
    navigator: Arc<dyn Navigator>,
    state: StateCell<Route, LoginField>,
}

impl LoginFlow {
    #[must_use]
    pub fn new(client: Arc<ApiClient>, navigator: Arc<dyn Navigator>) -> Self {
        Self { client, navigator, state: StateCell::new() }
    }

    #[must_use]
    pub fn state(&self) -> LoginState {
        self.state.get()
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        matches!(self.state.get(), FlowState::Submitting)
    }

    /// Form was reset; clears a finished success or failure.
    pub fn reset(&self) {
        self.state.reset();
    }

    /// A field was edited; same effect as [`reset`](Self::reset).
    pub fn edit(&self) {
        self.state.reset();
    }

    /// Validate and submit the email/password form.
    pub async fn submit(&self, form: &LoginForm) -> LoginSubmission {
        let Some(flight) = self.state.begin() else {
            return Submission::Busy;
        };

        let errors = form.validate();
        if !errors.is_empty() {
            flight.finish(FlowState::Failure(errors.clone()));
            return Submission::Invalid(errors);
        }

        let (next, submission) = self.run(&form.credentials()).await;
        flight.finish(next);
        submission
    }

    /// Submit an OAuth credential (Google sign-in ID token).
    pub async fn submit_oauth(&self, credential: &str) -> LoginSubmission {
        let Some(flight) = self.state.begin() else {
            return Submission::Busy;
        };

        let (next, submission) = self.run(&LoginCredentials::OAuth { credential: credential.to_owned() }).await;
        flight.finish(next);
        submission
    }

    async fn run(&self, credentials: &LoginCredentials) -> (LoginState, LoginSubmission) {
        let session = match self.client.login(credentials).await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(code = e.error_code(), error = %e, "login rejected");
                let errors = FormErrors::single(LoginField::Password, e.to_string());
                return (FlowState::Failure(errors.clone()), Submission::Invalid(errors));
            }
        };

        let role = session.role;
        if let Err(e) = self.client.store().write(&session) {
            tracing::warn!(error = %e, "could not persist session after login");
            let errors = FormErrors::single(LoginField::Form, e.to_string());
            return (FlowState::Failure(errors.clone()), Submission::Invalid(errors));
        }

        let route = Route::for_role(role);
        tracing::info!(uid = %session.uid, %role, %route, "logged in");
        self.navigator.navigate(route);
        (FlowState::Success(route), Submission::Done(route))
    }
}

#[cfg(test)]
#[path = "login_test.rs"]
mod tests;
