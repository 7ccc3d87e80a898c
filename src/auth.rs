//! Login and registration over the user store.
//!
//! Each call is a single check against the current contents of `users.json`.
//! Passwords are compared in plaintext; nothing here hashes them.
//!
//! [`AuthError`] is the primary contract. [`AuthService::login_status`] and
//! [`AuthService::register_status`] collapse it to the boolean form for callers
//! that only need "did it work".

use crate::models::User;
use crate::storage::{RecordStore, StorageError, UserStore};
use crate::validation::{self, ValidationError};

/// Why a login or registration failed.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Username already exists")]
    UsernameTaken,

    /// The store refused the insert after the existence check passed.
    #[error("Failed to create user")]
    CreateFailed,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::Validation(_) => "validation",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::UsernameTaken => "username_taken",
            AuthError::CreateFailed => "create_failed",
            AuthError::Storage(_) => "storage",
        }
    }
}

/// Authentication against a user [`RecordStore`], normally a [`UserStore`].
#[derive(Debug, Clone)]
pub struct AuthService<S = UserStore> {
    users: S,
}

/// Reject a value that validated on its raw length but trimmed to nothing.
fn require_content(value: String, field: &'static str, label: &str) -> Result<String, AuthError> {
    if value.is_empty() {
        return Err(ValidationError::new(field, format!("{} must not be blank", label)).into());
    }
    Ok(value)
}

impl<S> AuthService<S>
where
    S: RecordStore<Key = str, Record = User>,
{
    pub fn new(users: S) -> Self {
        Self { users }
    }

    /// Check credentials and return the user's display name.
    pub fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let result = self.try_login(username, password);
        if let Err(e) = &result {
            tracing::warn!(code = e.code(), error = %e, "login failed");
        }
        result
    }

    fn try_login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let username = require_content(
            validation::validate_username(username)?,
            "username",
            "Username",
        )?;
        let password = validation::validate_password(password)?;

        let user = self
            .users
            .get(username.as_str())?
            .ok_or(AuthError::InvalidCredentials)?;

        if user.password != password {
            return Err(AuthError::InvalidCredentials);
        }

        tracing::info!(username = %username, "login succeeded");
        Ok(user.name)
    }

    /// Create an account. The stored username and name are trimmed.
    pub fn register(&self, username: &str, password: &str, name: &str) -> Result<(), AuthError> {
        let result = self.try_register(username, password, name);
        if let Err(e) = &result {
            tracing::warn!(code = e.code(), error = %e, "registration failed");
        }
        result
    }

    fn try_register(&self, username: &str, password: &str, name: &str) -> Result<(), AuthError> {
        let username = require_content(
            validation::validate_username(username)?,
            "username",
            "Username",
        )?;
        let password = validation::validate_password(password)?;
        let name = require_content(validation::validate_name(name)?, "name", "Name")?;

        if self.users.exists(username.as_str())? {
            return Err(AuthError::UsernameTaken);
        }

        // Another writer may have taken the name since the check above.
        if !self.users.create(&User::new(&username, name, password))? {
            return Err(AuthError::CreateFailed);
        }

        tracing::info!(username = %username, "registered user");
        Ok(())
    }

    /// [`AuthService::login`] collapsed to `(success, display_name)`.
    ///
    /// Every failure, including storage errors, yields `(false, "")`.
    pub fn login_status(&self, username: &str, password: &str) -> (bool, String) {
        match self.login(username, password) {
            Ok(name) => (true, name),
            Err(_) => (false, String::new()),
        }
    }

    /// [`AuthService::register`] collapsed to a boolean.
    pub fn register_status(&self, username: &str, password: &str, name: &str) -> bool {
        self.register(username, password, name).is_ok()
    }
}
