//! Precedence resolution for configuration.
//!
//! ## Precedence (highest to lowest)
//!
//! 1. CLI flags (passed at runtime)
//! 2. `FOLIO_DATA_DIR` environment variable (data directory only)
//! 3. config.kdl (`--config <path>`, else `~/.config/folio/config.kdl`)
//! 4. Built-in defaults

use crate::config::FolioConfig;
use crate::config::schema::{
    DEFAULT_CURRENCY, DEFAULT_DATE_FORMAT, DEFAULT_ITEMS_PER_PAGE, DEFAULT_LOGIN_ATTEMPT_LIMIT,
};
use crate::validation::ProjectLimits;
use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "FOLIO_DATA_DIR";

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Value from environment variable
    EnvVar(String),
    /// Value from a config.kdl file
    ConfigFile(PathBuf),
    /// Value from CLI flag
    CliFlag,
    /// Built-in default value
    Default,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::EnvVar(name) => write!(f, "env:{}", name),
            ValueSource::ConfigFile(path) => write!(f, "config:{}", path.display()),
            ValueSource::CliFlag => write!(f, "cli"),
            ValueSource::Default => write!(f, "default"),
        }
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone)]
pub struct Resolved<T> {
    /// The resolved value
    pub value: T,
    /// Where the value came from
    pub source: ValueSource,
}

impl<T> Resolved<T> {
    /// Create a new resolved value.
    pub fn new(value: T, source: ValueSource) -> Self {
        Self { value, source }
    }
}

/// Runtime overrides supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Explicit config file path
    pub config_path: Option<PathBuf>,
    /// Data directory override
    pub data_dir: Option<PathBuf>,
}

impl ConfigOverrides {
    /// Create empty overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set config file override.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Set data directory override.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }
}

/// Fully resolved settings with source tracking.
#[derive(Debug, Clone)]
pub struct ResolvedSettings {
    /// Config file that was consulted (it may not exist)
    pub config_path: Option<PathBuf>,
    pub data_dir: Resolved<PathBuf>,
    pub currency: Resolved<String>,
    pub date_format: Resolved<String>,
    pub items_per_page: Resolved<u32>,
    /// Not enforced anywhere; reported for visibility only
    pub login_attempt_limit: Resolved<u32>,
    pub project_limits: ProjectLimits,
}

impl ResolvedSettings {
    pub fn data_dir(&self) -> &Path {
        &self.data_dir.value
    }

    pub fn currency(&self) -> &str {
        &self.currency.value
    }

    pub fn date_format(&self) -> &str {
        &self.date_format.value
    }
}

/// Default config file location: `<config dir>/folio/config.kdl`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("folio").join("config.kdl"))
}

/// Default data directory: `<data dir>/folio`.
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("folio"))
}

/// Resolve settings from overrides, the environment, the config file and defaults.
pub fn resolve_settings(overrides: &ConfigOverrides) -> Result<ResolvedSettings> {
    let config_path = overrides.config_path.clone().or_else(default_config_path);
    let file_config = match &config_path {
        Some(path) => FolioConfig::load(path)?,
        None => FolioConfig::new(),
    };
    let env_data_dir = std::env::var(DATA_DIR_ENV).ok().filter(|v| !v.is_empty());

    resolve_with(config_path, &file_config, overrides, env_data_dir)
}

/// Resolution over already-gathered inputs.
pub fn resolve_with(
    config_path: Option<PathBuf>,
    file_config: &FolioConfig,
    overrides: &ConfigOverrides,
    env_data_dir: Option<String>,
) -> Result<ResolvedSettings> {
    let file_source = || match &config_path {
        Some(path) => ValueSource::ConfigFile(path.clone()),
        None => ValueSource::Default,
    };

    let data_dir = if let Some(ref dir) = overrides.data_dir {
        Resolved::new(dir.clone(), ValueSource::CliFlag)
    } else if let Some(dir) = env_data_dir {
        Resolved::new(
            PathBuf::from(dir),
            ValueSource::EnvVar(DATA_DIR_ENV.to_string()),
        )
    } else if let Some(ref dir) = file_config.data_dir {
        Resolved::new(dir.clone(), file_source())
    } else {
        let dir = default_data_dir()
            .ok_or_else(|| Error::Config("Could not determine data directory".to_string()))?;
        Resolved::new(dir, ValueSource::Default)
    };

    let currency = match file_config.currency {
        Some(ref c) => Resolved::new(c.clone(), file_source()),
        None => Resolved::new(DEFAULT_CURRENCY.to_string(), ValueSource::Default),
    };

    let date_format = match file_config.date_format {
        Some(ref f) => Resolved::new(f.clone(), file_source()),
        None => Resolved::new(DEFAULT_DATE_FORMAT.to_string(), ValueSource::Default),
    };

    let items_per_page = match file_config.items_per_page {
        Some(n) => Resolved::new(n, file_source()),
        None => Resolved::new(DEFAULT_ITEMS_PER_PAGE, ValueSource::Default),
    };

    let login_attempt_limit = match file_config.login_attempt_limit {
        Some(n) => Resolved::new(n, file_source()),
        None => Resolved::new(DEFAULT_LOGIN_ATTEMPT_LIMIT, ValueSource::Default),
    };

    let defaults = ProjectLimits::default();
    let project_limits = ProjectLimits {
        min_name_length: file_config
            .min_project_name_length
            .unwrap_or(defaults.min_name_length),
        max_name_length: file_config
            .max_project_name_length
            .unwrap_or(defaults.max_name_length),
        min_description_length: file_config
            .min_project_description_length
            .unwrap_or(defaults.min_description_length),
        max_description_length: file_config
            .max_project_description_length
            .unwrap_or(defaults.max_description_length),
        max_team_members: file_config
            .max_team_members
            .unwrap_or(defaults.max_team_members),
    };

    Ok(ResolvedSettings {
        config_path,
        data_dir,
        currency,
        date_format,
        items_per_page,
        login_attempt_limit,
        project_limits,
    })
}
