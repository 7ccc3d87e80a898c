//! KDL schema for config.kdl.
//!
//! This module provides:
//! - The `FolioConfig` struct representing the file
//! - Parsing from KDL documents
//! - Validation
//! - Built-in defaults

use crate::{Error, Result};
use chrono::format::{Item, StrftimeItems};
use kdl::KdlDocument;
use std::path::{Path, PathBuf};

/// Default display currency.
pub const DEFAULT_CURRENCY: &str = "EUR";
/// Default display date format (strftime).
pub const DEFAULT_DATE_FORMAT: &str = "%d-%m-%Y";
/// Default page size for listings.
pub const DEFAULT_ITEMS_PER_PAGE: u32 = 10;
/// Default login attempt limit. Recorded but not enforced.
pub const DEFAULT_LOGIN_ATTEMPT_LIMIT: u32 = 3;

/// User preferences stored in config.kdl.
///
/// Every value is optional; missing values fall back to defaults during
/// resolution.
///
/// # KDL Schema
///
/// ```kdl
/// data-dir "/srv/folio"
/// currency "EUR"
/// date-format "%d-%m-%Y"
/// items-per-page 10
/// login-attempt-limit 3
/// max-team-members 20
/// min-project-name-length 3
/// max-project-name-length 100
/// min-project-description-length 10
/// max-project-description-length 1000
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolioConfig {
    /// Directory holding users.json, projects.json and session.json
    pub data_dir: Option<PathBuf>,

    /// Currency code used when displaying money
    pub currency: Option<String>,

    /// strftime format used when displaying dates
    pub date_format: Option<String>,

    /// Listing page size (no pagination is performed)
    pub items_per_page: Option<u32>,

    /// Maximum failed logins (never enforced)
    pub login_attempt_limit: Option<u32>,

    pub max_team_members: Option<usize>,
    pub min_project_name_length: Option<usize>,
    pub max_project_name_length: Option<usize>,
    pub min_project_description_length: Option<usize>,
    pub max_project_description_length: Option<usize>,
}

fn string_value(doc: &KdlDocument, key: &str) -> Option<String> {
    doc.get(key)
        .and_then(|node| node.entries().first())
        .and_then(|entry| entry.value().as_string())
        .map(|s| s.to_string())
}

fn integer_value(doc: &KdlDocument, key: &str) -> Option<i128> {
    doc.get(key)
        .and_then(|node| node.entries().first())
        .and_then(|entry| entry.value().as_integer())
}

impl FolioConfig {
    /// Create an empty config with no values set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read config from a file. A missing file is an empty config.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;

        let doc: KdlDocument = content
            .parse()
            .map_err(|e| Error::Config(format!("Failed to parse KDL in {}: {}", path.display(), e)))?;

        let config = Self::from_kdl(&doc);
        config
            .validate()
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Validate the config values.
    ///
    /// Returns an error message if any value is invalid.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if let Some(ref currency) = self.currency {
            if currency.trim().is_empty() {
                return Err("currency must not be empty".to_string());
            }
        }

        if let Some(ref format) = self.date_format {
            if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
                return Err(format!("date-format is not a valid strftime format: {}", format));
            }
        }

        if self.items_per_page == Some(0) {
            return Err("items-per-page must be at least 1".to_string());
        }

        if let (Some(min), Some(max)) = (self.min_project_name_length, self.max_project_name_length) {
            if min > max {
                return Err(format!(
                    "min-project-name-length ({}) exceeds max-project-name-length ({})",
                    min, max
                ));
            }
        }

        if let (Some(min), Some(max)) = (
            self.min_project_description_length,
            self.max_project_description_length,
        ) {
            if min > max {
                return Err(format!(
                    "min-project-description-length ({}) exceeds max-project-description-length ({})",
                    min, max
                ));
            }
        }

        Ok(())
    }

    /// Parse config from a KDL document.
    ///
    /// Unknown nodes and out-of-range integers are ignored.
    pub fn from_kdl(doc: &KdlDocument) -> Self {
        let count = |key: &str| integer_value(doc, key).and_then(|i| usize::try_from(i).ok());
        let small = |key: &str| integer_value(doc, key).and_then(|i| u32::try_from(i).ok());

        Self {
            data_dir: string_value(doc, "data-dir").map(PathBuf::from),
            currency: string_value(doc, "currency"),
            date_format: string_value(doc, "date-format"),
            items_per_page: small("items-per-page"),
            login_attempt_limit: small("login-attempt-limit"),
            max_team_members: count("max-team-members"),
            min_project_name_length: count("min-project-name-length"),
            max_project_name_length: count("max-project-name-length"),
            min_project_description_length: count("min-project-description-length"),
            max_project_description_length: count("max-project-description-length"),
        }
    }
}
