//! Command implementations for the folio CLI.
//!
//! Each command resolves its stores from [`ResolvedSettings`], does its work
//! through the library, and returns a value implementing [`Output`].
//! - account commands (`register`, `login`, `logout`, `whoami`) live here
//! - [`project`] holds project CRUD, milestones and the portfolio summary

pub mod project;

pub use project::{
    MilestoneInput, ProjectDeleted, ProjectInput, ProjectList, ProjectPatch, ProjectView,
    SummaryResult, milestone_add, milestone_complete, project_create, project_delete,
    project_list, project_show, project_update, summary,
};

use crate::auth::AuthService;
use crate::config::ResolvedSettings;
use crate::session::{AppState, Page, SessionStore, navigate};
use crate::storage::UserStore;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

/// Display preferences carried into human output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayPrefs {
    pub currency: String,
    pub date_format: String,
}

impl DisplayPrefs {
    pub fn from_settings(settings: &ResolvedSettings) -> Self {
        Self {
            currency: settings.currency().to_string(),
            date_format: settings.date_format().to_string(),
        }
    }

    pub fn money(&self, amount: f64) -> String {
        format_money(amount, &self.currency)
    }

    pub fn date(&self, dt: &DateTime<Utc>) -> String {
        dt.format(&self.date_format).to_string()
    }
}

/// Format an amount with two decimals and thousands separators.
pub fn format_money(amount: f64, currency: &str) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}{}{}.{:02}", sign, currency_prefix(currency), grouped, cents % 100)
}

fn currency_prefix(currency: &str) -> String {
    match currency {
        "EUR" => "€".to_string(),
        "USD" => "$".to_string(),
        "GBP" => "£".to_string(),
        other => format!("{} ", other),
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!(r#"{{"error": "{}"}}"#, e))
}

fn session_store(settings: &ResolvedSettings) -> Result<SessionStore> {
    Ok(SessionStore::open(settings.data_dir())?)
}

fn auth_service(settings: &ResolvedSettings) -> Result<AuthService> {
    Ok(AuthService::new(UserStore::open(settings.data_dir())?))
}

/// Load the session and move it to `page`, failing if the page needs a login
/// that has not happened.
pub(crate) fn enter_page(settings: &ResolvedSettings, page: Page) -> Result<AppState> {
    let sessions = session_store(settings)?;
    let state = navigate(sessions.load()?, page);
    sessions.save(&state)?;
    if state.current_page != page {
        return Err(Error::NotAuthenticated);
    }
    Ok(state)
}

// === Account Commands ===

#[derive(Debug, Serialize)]
pub struct RegisterResult {
    pub registered: bool,
    pub username: String,
    pub name: String,
}

impl Output for RegisterResult {
    fn to_json(&self) -> String {
        to_json(self)
    }

    fn to_human(&self) -> String {
        format!(
            "Registered {} ({}). Log in with `folio login {}`.",
            self.username, self.name, self.username
        )
    }
}

/// Create an account.
pub fn register(
    settings: &ResolvedSettings,
    username: &str,
    password: &str,
    name: &str,
) -> Result<RegisterResult> {
    let auth = auth_service(settings)?;
    auth.register(username, password, name)?;

    // A signed-in session is left where it is; otherwise head to the login page.
    let sessions = session_store(settings)?;
    let state = sessions.load()?;
    if !state.authenticated {
        sessions.save(&navigate(state, Page::Login))?;
    }

    Ok(RegisterResult {
        registered: true,
        username: username.trim().to_string(),
        name: name.trim().to_string(),
    })
}

#[derive(Debug, Serialize)]
pub struct LoginResult {
    pub authenticated: bool,
    pub username: String,
    pub name: String,
    pub page: Page,
}

impl Output for LoginResult {
    fn to_json(&self) -> String {
        to_json(self)
    }

    fn to_human(&self) -> String {
        format!("Welcome, {}!", self.name)
    }
}

/// Check credentials and start a session.
pub fn login(settings: &ResolvedSettings, username: &str, password: &str) -> Result<LoginResult> {
    let auth = auth_service(settings)?;
    let name = auth.login(username, password)?;
    let username = username.trim().to_string();

    let sessions = session_store(settings)?;
    let state = sessions.load()?.logged_in(&username, &name);
    sessions.save(&state)?;

    Ok(LoginResult {
        authenticated: true,
        username,
        name,
        page: state.current_page,
    })
}

#[derive(Debug, Serialize)]
pub struct LogoutResult {
    /// Whether a session was active
    pub logged_out: bool,
}

impl Output for LogoutResult {
    fn to_json(&self) -> String {
        to_json(self)
    }

    fn to_human(&self) -> String {
        if self.logged_out {
            "Logged out.".to_string()
        } else {
            "Not logged in.".to_string()
        }
    }
}

/// End the current session.
pub fn logout(settings: &ResolvedSettings) -> Result<LogoutResult> {
    let sessions = session_store(settings)?;
    let state = sessions.load()?;
    let logged_out = state.authenticated;
    sessions.save(&state.logged_out())?;
    Ok(LogoutResult { logged_out })
}

#[derive(Debug, Serialize)]
pub struct WhoamiResult {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub page: Page,
}

impl Output for WhoamiResult {
    fn to_json(&self) -> String {
        to_json(self)
    }

    fn to_human(&self) -> String {
        match (&self.username, &self.name) {
            (Some(username), Some(name)) => {
                format!("Logged in as {} ({}), on {}", username, name, self.page)
            }
            _ => "Not logged in.".to_string(),
        }
    }
}

/// Report the current session.
pub fn whoami(settings: &ResolvedSettings) -> Result<WhoamiResult> {
    let state = session_store(settings)?.load()?;
    let (username, name) = if state.authenticated {
        (Some(state.username), Some(state.name))
    } else {
        (None, None)
    };
    Ok(WhoamiResult {
        authenticated: state.authenticated,
        username,
        name,
        page: state.current_page,
    })
}

// === Config Commands ===

#[derive(Debug, Serialize)]
pub struct ConfigEntry {
    pub key: &'static str,
    pub value: String,
    pub source: String,
}

#[derive(Debug, Serialize)]
pub struct ConfigShow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<String>,
    pub entries: Vec<ConfigEntry>,
    /// Keys that are configurable but have no effect
    pub unenforced: Vec<&'static str>,
}

impl Output for ConfigShow {
    fn to_json(&self) -> String {
        to_json(self)
    }

    fn to_human(&self) -> String {
        let mut lines = Vec::new();
        if let Some(ref path) = self.config_file {
            lines.push(format!("Config file: {}", path));
        }
        for entry in &self.entries {
            let note = if self.unenforced.contains(&entry.key) {
                " (not enforced)"
            } else {
                ""
            };
            lines.push(format!(
                "  {} = {} [{}]{}",
                entry.key, entry.value, entry.source, note
            ));
        }
        lines.join("\n")
    }
}

/// Show resolved settings with their sources.
pub fn config_show(settings: &ResolvedSettings) -> ConfigShow {
    let limits = &settings.project_limits;
    let limit_source = "resolved".to_string();
    let entries = vec![
        ConfigEntry {
            key: "data-dir",
            value: settings.data_dir().display().to_string(),
            source: settings.data_dir.source.to_string(),
        },
        ConfigEntry {
            key: "currency",
            value: settings.currency().to_string(),
            source: settings.currency.source.to_string(),
        },
        ConfigEntry {
            key: "date-format",
            value: settings.date_format().to_string(),
            source: settings.date_format.source.to_string(),
        },
        ConfigEntry {
            key: "items-per-page",
            value: settings.items_per_page.value.to_string(),
            source: settings.items_per_page.source.to_string(),
        },
        ConfigEntry {
            key: "login-attempt-limit",
            value: settings.login_attempt_limit.value.to_string(),
            source: settings.login_attempt_limit.source.to_string(),
        },
        ConfigEntry {
            key: "max-team-members",
            value: limits.max_team_members.to_string(),
            source: limit_source.clone(),
        },
        ConfigEntry {
            key: "project-name-length",
            value: format!("{}..={}", limits.min_name_length, limits.max_name_length),
            source: limit_source.clone(),
        },
        ConfigEntry {
            key: "project-description-length",
            value: format!(
                "{}..={}",
                limits.min_description_length, limits.max_description_length
            ),
            source: limit_source,
        },
    ];

    ConfigShow {
        config_file: settings
            .config_path
            .as_ref()
            .map(|p| p.display().to_string()),
        entries,
        unenforced: vec!["items-per-page", "login-attempt-limit"],
    }
}
