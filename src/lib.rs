//! eZgrada client: authenticated request/session layer.
//!
//! ARCHITECTURE
//! ============
//! Leaf-first: [`store`] holds the session, [`fetcher`] attaches it to HTTP
//! calls over a [`transport`], [`mutators`] bind one verb each, and
//! [`flows`] drive the login and create-user forms through to the session
//! write and the role-based redirect in [`navigation`].
//!
//! Everything that touches shared state is injected (`Arc<dyn Trait>`), so
//! the whole stack runs against in-memory fakes in tests.

pub mod client;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod flows;
pub mod forms;
pub mod mutators;
pub mod navigation;
pub mod session;
pub mod store;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::{ApiError, ErrorKind};
pub use fetcher::{Fetcher, RequestOptions};
pub use flows::{CreateUserFlow, FlowState, LoginFlow, Submission};
pub use forms::{CreateUserField, CreateUserForm, FormErrors, LoginField, LoginForm, NewUserRole};
pub use navigation::{Navigator, Route};
pub use session::{LoginCredentials, Role, Session};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
