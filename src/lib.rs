//! Folio - a file-backed portfolio and project tracker.
//!
//! This library provides the core of the `folio` CLI: JSON record stores for
//! users and projects, input validation, and login/registration.

pub mod auth;
pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod models;
pub mod session;
pub mod storage;
pub mod validation;


/// Library-level error type for folio operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Validation error: {0}")]
    Validation(#[from] validation::ValidationError),

    #[error(transparent)]
    Auth(#[from] auth::AuthError),

    #[error("Not logged in: run `folio login` first")]
    NotAuthenticated,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Stable machine-readable code for error output.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Io(_) | Error::Storage(_) => "storage",
            Error::Json(_) => "json",
            Error::Validation(_) => "validation",
            Error::Auth(e) => e.code(),
            Error::NotAuthenticated => "not_authenticated",
            Error::NotFound(_) => "not_found",
            Error::InvalidInput(_) => "invalid_input",
            Error::Config(_) => "config",
        }
    }
}

/// Result type alias for folio operations.
pub type Result<T> = std::result::Result<T, Error>;
