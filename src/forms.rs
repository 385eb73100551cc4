//! Form models and their validation rules.
//!
//! Messages are the user-facing Croatian texts shown under each field.
//! One error per field; a later rule for the same field replaces the
//! earlier one, matching how the forms render a single message per slot.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::session::{LoginCredentials, Role};

pub const EMAIL_REQUIRED_LOGIN: &str = "Unesite svoj email";
pub const EMAIL_REQUIRED: &str = "Unesite email";
pub const EMAIL_FORMAT: &str = "Unesena vrijednost ne odgovara email formatu";
pub const PASSWORD_REQUIRED: &str = "Unesite lozinku";
pub const USERNAME_REQUIRED: &str = "Unesite korisničko ime";
pub const PASSWORDS_DIFFER: &str = "Lozinka i ponovljena lozinka moraju biti jednake";

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern compiles"));

// =============================================================================
// ERRORS
// =============================================================================

/// Per-field error slots of one form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormErrors<F: Ord> {
    fields: BTreeMap<F, String>,
}

impl<F: Ord> Default for FormErrors<F> {
    fn default() -> Self {
        Self { fields: BTreeMap::new() }
    }
}

impl<F: Ord + Copy> FormErrors<F> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn single(field: F, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.set(field, message);
        errors
    }

    pub fn set(&mut self, field: F, message: impl Into<String>) {
        self.fields.insert(field, message.into());
    }

    #[must_use]
    pub fn get(&self, field: F) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (F, &str)> {
        self.fields.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

// =============================================================================
// LOGIN FORM
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LoginField {
    Email,
    Password,
    /// Errors that belong to no single field.
    Form,
}

#[derive(Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }

    #[must_use]
    pub fn validate(&self) -> FormErrors<LoginField> {
        let mut errors = FormErrors::new();
        if self.email.is_empty() {
            errors.set(LoginField::Email, EMAIL_REQUIRED_LOGIN);
        }
        if self.password.is_empty() {
            errors.set(LoginField::Password, PASSWORD_REQUIRED);
        }
        errors
    }

    #[must_use]
    pub fn credentials(&self) -> LoginCredentials {
        LoginCredentials::password(self.email.clone(), self.password.clone())
    }
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm").field("email", &self.email).field("password", &"<redacted>").finish()
    }
}

// =============================================================================
// CREATE USER FORM
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CreateUserField {
    Username,
    Email,
    Password,
    RepeatedPassword,
    Form,
}

/// Roles an administrator can hand out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewUserRole {
    Predstavnik,
    #[default]
    Suvlasnik,
}

impl From<NewUserRole> for Role {
    fn from(role: NewUserRole) -> Self {
        match role {
            NewUserRole::Predstavnik => Self::Predstavnik,
            NewUserRole::Suvlasnik => Self::Suvlasnik,
        }
    }
}

#[derive(Clone, Default, PartialEq, Eq)]
pub struct CreateUserForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub repeated_password: String,
    pub role: NewUserRole,
}

/// Request body sent for a valid [`CreateUserForm`].
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: NewUserRole,
}

impl CreateUserForm {
    #[must_use]
    pub fn validate(&self) -> FormErrors<CreateUserField> {
        let mut errors = FormErrors::new();

        if self.username.is_empty() {
            errors.set(CreateUserField::Username, USERNAME_REQUIRED);
        }

        if self.email.is_empty() {
            errors.set(CreateUserField::Email, EMAIL_REQUIRED);
        } else if !EMAIL_PATTERN.is_match(&self.email) {
            errors.set(CreateUserField::Email, EMAIL_FORMAT);
        }

        if self.password.is_empty() {
            errors.set(CreateUserField::Password, PASSWORD_REQUIRED);
        }

        if self.repeated_password.is_empty() {
            errors.set(CreateUserField::RepeatedPassword, PASSWORD_REQUIRED);
        } else if self.repeated_password != self.password {
            errors.set(CreateUserField::RepeatedPassword, PASSWORDS_DIFFER);
        }

        errors
    }

    #[must_use]
    pub fn to_new_user(&self) -> NewUser {
        NewUser {
            username: self.username.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            role: self.role,
        }
    }
}

impl std::fmt::Debug for CreateUserForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUserForm")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "forms_test.rs"]
mod tests;
