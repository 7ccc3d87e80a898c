//! Explicit application state and page navigation.
//!
//! State is a plain value: navigation takes the current [`AppState`] and
//! returns the next one. The CLI keeps it in `session.json` between
//! invocations; the record stores know nothing about it.

use crate::storage::StorageError;
use crate::storage::document::{self, DocumentShape};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// File name of the persisted session.
pub const SESSION_FILE: &str = "session.json";
/// Most pages kept in [`AppState::page_history`].
pub const MAX_PAGE_HISTORY: usize = 10;

/// Screens of the application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    #[default]
    Login,
    Signup,
    Main,
    Dashboard,
}

impl Page {
    /// Whether the page is only reachable when logged in.
    pub fn requires_auth(&self) -> bool {
        matches!(self, Page::Main | Page::Dashboard)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Login => "Login",
            Page::Signup => "Sign Up",
            Page::Main => "Main",
            Page::Dashboard => "Dashboard",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Everything the presentation layer tracks between requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    pub authenticated: bool,

    /// Logged-in username, empty when signed out
    #[serde(default)]
    pub username: String,

    /// Display name of the logged-in user
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub current_page: Page,

    /// Pages left behind, oldest first, at most [`MAX_PAGE_HISTORY`]
    #[serde(default)]
    pub page_history: Vec<Page>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State after a successful login: authenticated and on the main page.
    pub fn logged_in(self, username: impl Into<String>, name: impl Into<String>) -> Self {
        let state = Self {
            authenticated: true,
            username: username.into(),
            name: name.into(),
            ..self
        };
        navigate(state, Page::Main)
    }

    /// State after logging out: everything reset, back on the login page.
    pub fn logged_out(self) -> Self {
        Self::default()
    }
}

/// Move to `target`.
///
/// An unauthenticated request for a protected page lands on `Login` instead.
/// Navigating to the current page leaves history untouched. Only the most
/// recent [`MAX_PAGE_HISTORY`] pages are remembered.
pub fn navigate(state: AppState, target: Page) -> AppState {
    let target = if target.requires_auth() && !state.authenticated {
        Page::Login
    } else {
        target
    };

    if target == state.current_page {
        return state;
    }

    let mut page_history = state.page_history;
    page_history.push(state.current_page);
    if page_history.len() > MAX_PAGE_HISTORY {
        let excess = page_history.len() - MAX_PAGE_HISTORY;
        page_history.drain(..excess);
    }
    AppState {
        current_page: target,
        page_history,
        ..state
    }
}

/// Session persisted as a single JSON object.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn open(data_dir: &Path) -> Result<Self, StorageError> {
        document::ensure_dir(data_dir)?;
        Ok(Self {
            path: data_dir.join(SESSION_FILE),
        })
    }

    /// Load the saved state, or a fresh one if nothing is saved.
    pub fn load(&self) -> Result<AppState, StorageError> {
        Ok(document::load(&self.path, DocumentShape::Object)?.unwrap_or_default())
    }

    pub fn save(&self, state: &AppState) -> Result<(), StorageError> {
        document::save(&self.path, state)
    }
}
