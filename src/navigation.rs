//! Routes, role-based redirect, and page-group guards.
//!
//! `/home` and `/create` are the authenticated page group; `/create` is
//! additionally admin-only.

use std::fmt;

use crate::session::{Role, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Landing,
    Login,
    Home,
    /// Admin "create user" page.
    Create,
}

impl Route {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Landing => "/",
            Self::Login => "/login",
            Self::Home => "/home",
            Self::Create => "/create",
        }
    }

    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        match path.trim_end_matches('/') {
            "" => Some(Self::Landing),
            "/login" => Some(Self::Login),
            "/home" => Some(Self::Home),
            "/create" => Some(Self::Create),
            _ => None,
        }
    }

    /// Where a freshly logged-in user lands.
    #[must_use]
    pub fn for_role(role: Role) -> Self {
        if role.is_admin() { Self::Create } else { Self::Home }
    }

    #[must_use]
    pub fn requires_session(self) -> bool {
        matches!(self, Self::Home | Self::Create)
    }

    #[must_use]
    pub fn requires_admin(self) -> bool {
        self == Self::Create
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Route actually shown when `requested` is visited with `session`.
#[must_use]
pub fn guard(requested: Route, session: Option<&Session>) -> Route {
    match session {
        None if requested.requires_session() => Route::Login,
        None => requested,
        Some(session) if requested == Route::Login => Route::for_role(session.role),
        Some(session) if requested.requires_admin() && !session.role.is_admin() => Route::Home,
        Some(_) => requested,
    }
}

/// Receives navigation requests from the flows.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

#[cfg(test)]
#[path = "navigation_test.rs"]
mod tests;
