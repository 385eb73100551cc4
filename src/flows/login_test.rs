use std::sync::Arc;

use super::*;
use crate::error::ApiError;
use crate::forms::{EMAIL_REQUIRED_LOGIN, PASSWORD_REQUIRED};
use crate::session::Role;
use crate::store::{MemorySessionStore, SessionStore};
use crate::test_helpers::{
    GatedTransport, RecordingNavigator, RecordingTransport, harness, json_response, sample_session, test_config,
};

fn login_ok(role: &str) -> Result<crate::transport::HttpResponse, ApiError> {
    Ok(json_response(
        200,
        serde_json::json!({
            "accessToken": "t1",
            "role": role,
            "client": "c1",
            "tokenType": "Bearer",
            "uid": "u1",
            "expiry": "123"
        }),
    ))
}

fn form() -> LoginForm {
    LoginForm::new("a@b.com", "secret")
}

// =============================================================
// Success
// =============================================================

#[tokio::test]
async fn administrator_is_stored_then_sent_to_create() {
    let h = harness(vec![login_ok("Administrator")]);
    let flow = LoginFlow::new(h.client.clone(), h.navigator.clone());

    let outcome = flow.submit(&form()).await;

    assert_eq!(outcome, Submission::Done(Route::Create));
    assert_eq!(h.store.read(), Some(sample_session(Role::Administrator)));
    // The store already held the session when navigation happened.
    assert_eq!(h.navigator.visits(), vec![(Route::Create, Some(sample_session(Role::Administrator)))]);
    assert_eq!(flow.state(), FlowState::Success(Route::Create));
}

#[tokio::test]
async fn co_owner_is_sent_home() {
    let h = harness(vec![login_ok("Suvlasnik")]);
    let flow = LoginFlow::new(h.client.clone(), h.navigator.clone());

    assert_eq!(flow.submit(&form()).await, Submission::Done(Route::Home));
    assert_eq!(h.navigator.routes(), vec![Route::Home]);
    assert_eq!(h.store.read().map(|s| s.role), Some(Role::Suvlasnik));
}

#[tokio::test]
async fn relogin_replaces_stored_session() {
    let h = harness(vec![login_ok("Suvlasnik"), login_ok("Predstavnik")]);
    let flow = LoginFlow::new(h.client.clone(), h.navigator.clone());

    flow.submit(&form()).await;
    flow.reset();
    flow.submit(&form()).await;

    assert_eq!(h.store.read().map(|s| s.role), Some(Role::Predstavnik));
    assert_eq!(h.navigator.routes(), vec![Route::Home, Route::Home]);
}

#[tokio::test]
async fn oauth_credential_is_posted() {
    let h = harness(vec![login_ok("Suvlasnik")]);
    let flow = LoginFlow::new(h.client.clone(), h.navigator.clone());

    assert_eq!(flow.submit_oauth("google-id-token").await, Submission::Done(Route::Home));
    let body = h.transport.requests()[0].body.clone().unwrap();
    assert_eq!(serde_json::from_str::<serde_json::Value>(&body).unwrap(), serde_json::json!({"credential": "google-id-token"}));
}

// =============================================================
// Failure
// =============================================================

#[tokio::test]
async fn rejection_lands_on_password_field() {
    let h = harness(vec![Ok(json_response(401, serde_json::json!({"message": "Invalid credentials"})))]);
    let flow = LoginFlow::new(h.client.clone(), h.navigator.clone());

    let Submission::Invalid(errors) = flow.submit(&form()).await else {
        panic!("expected invalid submission");
    };

    assert_eq!(errors.get(LoginField::Password), Some("Invalid credentials"));
    assert_eq!(errors.get(LoginField::Email), None);
    assert!(h.store.read().is_none());
    assert!(h.store.raw().is_none());
    assert!(h.navigator.visits().is_empty());
    assert_eq!(flow.state(), FlowState::Failure(errors));
}

#[tokio::test]
async fn transport_failure_also_lands_on_password_field() {
    let h = harness(vec![Err(ApiError::Transport("connection refused".into()))]);
    let flow = LoginFlow::new(h.client.clone(), h.navigator.clone());

    let Submission::Invalid(errors) = flow.submit(&form()).await else {
        panic!("expected invalid submission");
    };
    assert!(errors.get(LoginField::Password).is_some_and(|m| m.contains("connection refused")));
    assert!(h.navigator.visits().is_empty());
}

#[tokio::test]
async fn empty_form_fails_validation_without_request() {
    let h = harness(Vec::new());
    let flow = LoginFlow::new(h.client.clone(), h.navigator.clone());

    let Submission::Invalid(errors) = flow.submit(&LoginForm::default()).await else {
        panic!("expected invalid submission");
    };
    assert_eq!(errors.get(LoginField::Email), Some(EMAIL_REQUIRED_LOGIN));
    assert_eq!(errors.get(LoginField::Password), Some(PASSWORD_REQUIRED));
    assert!(h.transport.requests().is_empty());
}

struct FailingStore;

impl SessionStore for FailingStore {
    fn read(&self) -> Option<crate::session::Session> {
        None
    }

    fn write(&self, _session: &crate::session::Session) -> Result<(), ApiError> {
        Err(ApiError::Storage("disk full".into()))
    }

    fn clear(&self) -> Result<(), ApiError> {
        Ok(())
    }
}

#[tokio::test]
async fn store_write_failure_does_not_navigate() {
    let transport = Arc::new(RecordingTransport::replying(vec![login_ok("Administrator")]));
    let store: Arc<dyn SessionStore> = Arc::new(FailingStore);
    let navigator = Arc::new(RecordingNavigator::new(store.clone()));
    let client = Arc::new(ApiClient::new(test_config(), transport, store));
    let flow = LoginFlow::new(client, navigator.clone());

    let Submission::Invalid(errors) = flow.submit(&form()).await else {
        panic!("expected invalid submission");
    };
    assert!(errors.get(LoginField::Form).is_some_and(|m| m.contains("disk full")));
    assert!(navigator.visits().is_empty());
}

// =============================================================
// In-flight guard
// =============================================================

#[tokio::test]
async fn second_submit_while_in_flight_is_refused() {
    let gate = Arc::new(tokio::sync::Notify::new());
    let transport = Arc::new(GatedTransport {
        gate: gate.clone(),
        inner: RecordingTransport::replying(vec![login_ok("Suvlasnik")]),
    });
    let store = Arc::new(MemorySessionStore::new());
    let navigator = Arc::new(RecordingNavigator::new(store.clone()));
    let client = Arc::new(ApiClient::new(test_config(), transport.clone(), store));
    let flow = Arc::new(LoginFlow::new(client, navigator.clone()));

    let first = tokio::spawn({
        let flow = flow.clone();
        async move { flow.submit(&form()).await }
    });
    while !flow.is_submitting() {
        tokio::task::yield_now().await;
    }

    assert_eq!(flow.submit(&form()).await, Submission::Busy);

    gate.notify_one();
    assert_eq!(first.await.unwrap(), Submission::Done(Route::Home));
    assert_eq!(transport.inner.requests().len(), 1);
    assert_eq!(navigator.routes(), vec![Route::Home]);
}

#[tokio::test]
async fn cancelled_submit_returns_to_idle() {
    let gate = Arc::new(tokio::sync::Notify::new());
    let transport = Arc::new(GatedTransport { gate, inner: RecordingTransport::new() });
    let store = Arc::new(MemorySessionStore::new());
    let navigator = Arc::new(RecordingNavigator::new(store.clone()));
    let client = Arc::new(ApiClient::new(test_config(), transport, store.clone()));
    let flow = LoginFlow::new(client, navigator.clone());

    let timed_out = tokio::time::timeout(std::time::Duration::from_millis(20), flow.submit(&form())).await;

    assert!(timed_out.is_err());
    assert_eq!(flow.state(), FlowState::Idle);
    assert!(store.read().is_none());
    assert!(navigator.visits().is_empty());
}

#[tokio::test]
async fn edit_after_failure_returns_to_idle() {
    let h = harness(vec![Ok(json_response(401, serde_json::json!({"message": "no"})))]);
    let flow = LoginFlow::new(h.client.clone(), h.navigator.clone());

    flow.submit(&form()).await;
    assert!(matches!(flow.state(), FlowState::Failure(_)));
    flow.edit();
    assert_eq!(flow.state(), FlowState::Idle);
}
