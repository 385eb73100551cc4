//! Admin "create user" flow.
//!
//! Server and transport failures are shown on the form-level slot; a missing
//! session sends the user back to `/login`. A successful submit leaves the
//! flow `Idle`, ready for the next user.

use std::sync::Arc;

use serde_json::Value;

use super::{FlowState, StateCell, Submission};
use crate::client::ApiClient;
use crate::error::ErrorKind;
use crate::forms::{CreateUserField, CreateUserForm, FormErrors};
use crate::navigation::{Navigator, Route};

pub type CreateUserState = FlowState<Value, CreateUserField>;
pub type CreateUserSubmission = Submission<Value, CreateUserField>;

pub struct CreateUserFlow {
    client: Arc<ApiClient>,
    navigator: Arc<dyn Navigator>,
    state: StateCell<Value, CreateUserField>,
}

impl CreateUserFlow {
    #[must_use]
    pub fn new(client: Arc<ApiClient>, navigator: Arc<dyn Navigator>) -> Self {
        Self { client, navigator, state: StateCell::new() }
    }

    #[must_use]
    pub fn state(&self) -> CreateUserState {
        self.state.get()
    }

    pub fn reset(&self) {
        self.state.reset();
    }

    pub async fn submit(&self, form: &CreateUserForm) -> CreateUserSubmission {
        let Some(flight) = self.state.begin() else {
            return Submission::Busy;
        };

        let errors = form.validate();
        if !errors.is_empty() {
            flight.finish(FlowState::Failure(errors.clone()));
            return Submission::Invalid(errors);
        }

        match self.client.create_user(&form.to_new_user()).await {
            Ok(created) => {
                tracing::info!(username = %form.username, role = ?form.role, "user created");
                // Form is cleared for the next entry.
                flight.finish(FlowState::Idle);
                Submission::Done(created)
            }
            Err(e) => {
                tracing::warn!(code = e.error_code(), error = %e, "create user failed");
                if e.kind() == ErrorKind::Unauthenticated {
                    self.navigator.navigate(Route::Login);
                }
                let errors = FormErrors::single(CreateUserField::Form, e.to_string());
                flight.finish(FlowState::Failure(errors.clone()));
                Submission::Invalid(errors)
            }
        }
    }
}

#[cfg(test)]
#[path = "create_user_test.rs"]
mod tests;
