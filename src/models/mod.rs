//! Data models for folio entities.
//!
//! This module defines the core data structures:
//! - `User` - An account keyed by its unique username
//! - `Project` - A tracked project with budget, progress, milestones and team
//! - `ProjectMilestone` - A dated checkpoint within a project
//!
//! Timestamps are stored as ISO-8601 strings and enums as their display labels
//! (e.g. `"In Progress"`, `"High"`).

pub mod portfolio;
pub(crate) mod timestamp;

pub use portfolio::{PortfolioSummary, ProjectFilter};
pub use timestamp::parse_timestamp;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Project lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[default]
    Planning,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "On Hold")]
    OnHold,
    Completed,
    Cancelled,
}

impl ProjectStatus {
    /// Every status, in display order.
    pub const ALL: [ProjectStatus; 5] = [
        ProjectStatus::Planning,
        ProjectStatus::InProgress,
        ProjectStatus::OnHold,
        ProjectStatus::Completed,
        ProjectStatus::Cancelled,
    ];

    /// The stored label for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Planning => "Planning",
            ProjectStatus::InProgress => "In Progress",
            ProjectStatus::OnHold => "On Hold",
            ProjectStatus::Completed => "Completed",
            ProjectStatus::Cancelled => "Cancelled",
        }
    }

    /// Parse from a label, case-insensitive.
    ///
    /// Accepts the stored label as well as `snake_case` and `kebab-case`
    /// spellings (`in_progress`, `on-hold`).
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = normalize_label(s);
        Self::ALL
            .into_iter()
            .find(|status| normalize_label(status.as_str()) == normalized)
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Project priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectPriority {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl ProjectPriority {
    /// Every priority, lowest first.
    pub const ALL: [ProjectPriority; 4] = [
        ProjectPriority::Low,
        ProjectPriority::Medium,
        ProjectPriority::High,
        ProjectPriority::Critical,
    ];

    /// The stored label for this priority.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectPriority::Low => "Low",
            ProjectPriority::Medium => "Medium",
            ProjectPriority::High => "High",
            ProjectPriority::Critical => "Critical",
        }
    }

    /// Parse from a label, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = normalize_label(s);
        Self::ALL
            .into_iter()
            .find(|priority| normalize_label(priority.as_str()) == normalized)
    }
}

impl fmt::Display for ProjectPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn normalize_label(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            '_' | '-' => ' ',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

/// An account that can log in.
///
/// The username is the unique key; it is not repeated inside the stored record.
/// Passwords are stored in plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique login name
    pub username: String,

    /// Display name
    pub name: String,

    /// Plaintext password
    pub password: String,
}

impl User {
    pub fn new(
        username: impl Into<String>,
        name: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            name: name.into(),
            password: password.into(),
        }
    }
}

/// A dated checkpoint attached to a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMilestone {
    pub title: String,

    #[serde(with = "timestamp")]
    pub due_date: DateTime<Utc>,

    #[serde(default)]
    pub completed: bool,

    /// Set when the milestone is marked complete
    #[serde(default, with = "timestamp::option")]
    pub completion_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub description: Option<String>,
}

impl ProjectMilestone {
    /// Create an open milestone due at `due_date`.
    pub fn new(title: impl Into<String>, due_date: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            due_date,
            completed: false,
            completion_date: None,
            description: None,
        }
    }

    /// Mark the milestone complete as of `at`.
    pub fn complete(&mut self, at: DateTime<Utc>) {
        self.completed = true;
        self.completion_date = Some(at);
    }
}

/// A project tracked in the portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Opaque unique identifier, chosen by the caller
    pub id: String,

    pub name: String,

    pub description: String,

    #[serde(with = "timestamp")]
    pub start_date: DateTime<Utc>,

    #[serde(with = "timestamp")]
    pub end_date: DateTime<Utc>,

    pub status: ProjectStatus,

    pub priority: ProjectPriority,

    /// Planned budget, non-negative
    pub budget: f64,

    /// Amount spent so far, non-negative
    pub spent: f64,

    /// Completion percentage in 0-100
    pub progress: f64,

    pub milestones: Vec<ProjectMilestone>,

    /// Member identifiers
    pub team_members: Vec<String>,

    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Create a new project in `Planning` with no spend, progress or milestones.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            start_date,
            end_date,
            status: ProjectStatus::default(),
            priority: ProjectPriority::default(),
            budget: 0.0,
            spent: 0.0,
            progress: 0.0,
            milestones: Vec::new(),
            team_members: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Budget utilisation as a percentage: `spent / budget * 100`, or 0 when
    /// there is no positive budget.
    pub fn budget_status(&self) -> f64 {
        if self.budget > 0.0 {
            self.spent / self.budget * 100.0
        } else {
            0.0
        }
    }

    /// Whether the end date has passed without the project being completed.
    pub fn is_overdue(&self) -> bool {
        self.is_overdue_at(Utc::now())
    }

    /// [`Project::is_overdue`] evaluated at a fixed instant.
    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        now > self.end_date && self.status != ProjectStatus::Completed
    }

    /// Number of milestones marked complete.
    pub fn completed_milestones(&self) -> usize {
        self.milestones.iter().filter(|m| m.completed).count()
    }
}
