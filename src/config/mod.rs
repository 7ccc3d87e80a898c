//! Configuration for folio.
//!
//! ## config.kdl - User preferences
//!
//! Located at `~/.config/folio/config.kdl` unless `--config` names another
//! file. Every key is optional:
//!
//! - `data-dir` - Where users.json, projects.json and session.json live
//! - `currency` / `date-format` - Display preferences
//! - `items-per-page` - Listing page size (pagination is not implemented)
//! - `login-attempt-limit` - Reported by `config show`, never enforced
//! - `max-team-members` and the project name/description length bounds
//!
//! ## Precedence
//!
//! CLI flag > environment > config.kdl > defaults.
//!
//! Use the [`resolver`] module for unified precedence resolution.

pub mod resolver;
pub mod schema;

pub use resolver::{
    ConfigOverrides, DATA_DIR_ENV, Resolved, ResolvedSettings, ValueSource, resolve_settings,
    resolve_with,
};
pub use schema::FolioConfig;
