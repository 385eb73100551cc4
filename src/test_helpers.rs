//! Fakes and fixtures shared by the unit tests.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::client::ApiClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::navigation::{Navigator, Route};
use crate::session::{Role, Session};
use crate::store::{MemorySessionStore, SessionStore};
use crate::transport::{HttpRequest, HttpResponse, Transport};

pub const BASE_URL: &str = "http://api.test";

#[must_use]
pub fn sample_session(role: Role) -> Session {
    Session {
        access_token: "t1".to_owned(),
        client: "c1".to_owned(),
        token_type: "Bearer".to_owned(),
        uid: "u1".to_owned(),
        expiry: "123".to_owned(),
        role,
    }
}

/// Unique path under the system temp dir; nothing is created.
#[must_use]
pub fn temp_path(label: &str) -> PathBuf {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("ezgrada-test-{}-{label}-{n}.json", std::process::id()))
}

#[must_use]
pub fn json_response(status: u16, body: serde_json::Value) -> HttpResponse {
    HttpResponse { status, body: body.to_string() }
}

// =============================================================================
// TRANSPORT
// =============================================================================

/// Records every request and answers from a queue of canned responses.
///
/// An empty queue answers `200 {}`.
#[derive(Default)]
pub struct RecordingTransport {
    requests: Mutex<Vec<HttpRequest>>,
    responses: Mutex<VecDeque<Result<HttpResponse, ApiError>>>,
}

impl RecordingTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn replying(responses: Vec<Result<HttpResponse, ApiError>>) -> Self {
        Self { requests: Mutex::new(Vec::new()), responses: Mutex::new(responses.into()) }
    }

    #[must_use]
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(json_response(200, serde_json::json!({}))))
    }
}

/// Waits on a `Notify` before answering, so tests can observe the in-flight state.
pub struct GatedTransport {
    pub gate: Arc<tokio::sync::Notify>,
    pub inner: RecordingTransport,
}

#[async_trait::async_trait]
impl Transport for GatedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.gate.notified().await;
        self.inner.send(request).await
    }
}

// =============================================================================
// NAVIGATOR
// =============================================================================

/// Records each navigation together with the store contents at that moment.
pub struct RecordingNavigator {
    store: Arc<dyn SessionStore>,
    visits: Mutex<Vec<(Route, Option<Session>)>>,
}

impl RecordingNavigator {
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store, visits: Mutex::new(Vec::new()) }
    }

    #[must_use]
    pub fn visits(&self) -> Vec<(Route, Option<Session>)> {
        self.visits.lock().unwrap().clone()
    }

    #[must_use]
    pub fn routes(&self) -> Vec<Route> {
        self.visits().into_iter().map(|(route, _)| route).collect()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        let snapshot = self.store.read();
        self.visits.lock().unwrap().push((route, snapshot));
    }
}

// =============================================================================
// WIRING
// =============================================================================

pub struct Harness {
    pub transport: Arc<RecordingTransport>,
    pub store: Arc<MemorySessionStore>,
    pub navigator: Arc<RecordingNavigator>,
    pub client: Arc<ApiClient>,
}

#[must_use]
pub fn harness(responses: Vec<Result<HttpResponse, ApiError>>) -> Harness {
    let transport = Arc::new(RecordingTransport::replying(responses));
    let store = Arc::new(MemorySessionStore::new());
    let navigator = Arc::new(RecordingNavigator::new(store.clone()));
    let client = Arc::new(ApiClient::new(test_config(), transport.clone(), store.clone()));
    Harness { transport, store, navigator, client }
}

#[must_use]
pub fn test_config() -> ClientConfig {
    ClientConfig::default().with_api_url(BASE_URL).with_session_file(temp_path("unused"))
}
