//! CLI argument definitions for folio.

use crate::models::{ProjectPriority, ProjectStatus, parse_timestamp};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("FOLIO_GIT_COMMIT"),
    ", built ",
    env!("FOLIO_BUILD_TIMESTAMP"),
    ")"
);

/// Folio - a portfolio and project tracker.
///
/// Register and log in, then manage projects with `folio project`.
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(author, version, long_version = LONG_VERSION, about = "Track a portfolio of projects", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Directory holding users.json, projects.json and session.json.
    /// Overrides FOLIO_DATA_DIR and the config file.
    #[arg(long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Path to config.kdl (default: ~/.config/folio/config.kdl)
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an account
    Register {
        /// Login name (at least 3 characters)
        username: String,

        /// Display name (at least 2 characters)
        name: String,

        /// Password (at least 6 characters)
        #[arg(short, long)]
        password: String,
    },

    /// Log in and start a session
    Login {
        username: String,

        #[arg(short, long)]
        password: String,
    },

    /// End the current session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Project management commands
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },

    /// Portfolio metrics: totals, active and overdue counts, spend
    Summary {
        /// Only count projects with these statuses
        #[arg(short, long = "status", value_parser = parse_status)]
        statuses: Vec<ProjectStatus>,

        /// Only count projects with these priorities
        #[arg(short, long = "priority", value_parser = parse_priority)]
        priorities: Vec<ProjectPriority>,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Project subcommands
#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// Create a new project
    Create {
        /// Project name
        name: String,

        #[arg(short, long)]
        description: String,

        /// Start date (YYYY-MM-DD or RFC 3339)
        #[arg(long, value_parser = parse_date)]
        start: DateTime<Utc>,

        /// End date (YYYY-MM-DD or RFC 3339)
        #[arg(long, value_parser = parse_date)]
        end: DateTime<Utc>,

        /// Planning, "In Progress", "On Hold", Completed, Cancelled
        #[arg(short, long, value_parser = parse_status, default_value = "Planning")]
        status: ProjectStatus,

        /// Low, Medium, High, Critical
        #[arg(short, long, value_parser = parse_priority, default_value = "Low")]
        priority: ProjectPriority,

        #[arg(short, long, default_value_t = 0.0)]
        budget: f64,

        #[arg(long, default_value_t = 0.0)]
        spent: f64,

        /// Completion percentage (0-100)
        #[arg(long, default_value_t = 0.0)]
        progress: f64,

        /// Team member (repeatable)
        #[arg(short, long = "member")]
        members: Vec<String>,
    },

    /// List projects
    List {
        /// Only show projects with these statuses
        #[arg(short, long = "status", value_parser = parse_status)]
        statuses: Vec<ProjectStatus>,

        /// Only show projects with these priorities
        #[arg(short, long = "priority", value_parser = parse_priority)]
        priorities: Vec<ProjectPriority>,
    },

    /// Show project details
    Show { id: String },

    /// Update a project (only the given fields change)
    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(long, value_parser = parse_date)]
        start: Option<DateTime<Utc>>,

        #[arg(long, value_parser = parse_date)]
        end: Option<DateTime<Utc>>,

        #[arg(short, long, value_parser = parse_status)]
        status: Option<ProjectStatus>,

        #[arg(short, long, value_parser = parse_priority)]
        priority: Option<ProjectPriority>,

        #[arg(short, long)]
        budget: Option<f64>,

        #[arg(long)]
        spent: Option<f64>,

        #[arg(long)]
        progress: Option<f64>,

        /// Replace the team with these members (repeatable)
        #[arg(short, long = "member")]
        members: Vec<String>,

        /// Remove every team member
        #[arg(long, conflicts_with = "members")]
        clear_members: bool,
    },

    /// Delete a project
    Delete { id: String },

    /// Milestone commands
    Milestone {
        #[command(subcommand)]
        command: MilestoneCommands,
    },
}

/// Milestone subcommands
#[derive(Subcommand, Debug)]
pub enum MilestoneCommands {
    /// Add a milestone to a project
    Add {
        /// Project ID
        id: String,

        title: String,

        /// Due date (YYYY-MM-DD or RFC 3339)
        #[arg(long, value_parser = parse_date)]
        due: DateTime<Utc>,

        #[arg(short, long)]
        description: Option<String>,
    },

    /// Mark a milestone complete
    Complete {
        /// Project ID
        id: String,

        /// Milestone number as shown by `project show` (starting at 1)
        number: usize,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show resolved settings and where each came from
    Show,
}

fn parse_date(s: &str) -> Result<DateTime<Utc>, String> {
    parse_timestamp(s).ok_or_else(|| format!("invalid date '{}': expected YYYY-MM-DD or RFC 3339", s))
}

fn parse_status(s: &str) -> Result<ProjectStatus, String> {
    ProjectStatus::parse(s).ok_or_else(|| {
        let labels: Vec<&str> = ProjectStatus::ALL.iter().map(|s| s.as_str()).collect();
        format!("invalid status '{}': expected one of {}", s, labels.join(", "))
    })
}

fn parse_priority(s: &str) -> Result<ProjectPriority, String> {
    ProjectPriority::parse(s).ok_or_else(|| {
        let labels: Vec<&str> = ProjectPriority::ALL.iter().map(|p| p.as_str()).collect();
        format!("invalid priority '{}': expected one of {}", s, labels.join(", "))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_project_create() {
        let cli = Cli::try_parse_from([
            "folio",
            "project",
            "create",
            "Harbour Lofts",
            "--description",
            "Warehouse refit",
            "--start",
            "2024-01-01",
            "--end",
            "2024-06-30",
            "--status",
            "in-progress",
            "-m",
            "alice",
            "-m",
            "bob",
        ])
        .unwrap();

        match cli.command {
            Commands::Project {
                command:
                    ProjectCommands::Create {
                        status,
                        priority,
                        members,
                        ..
                    },
            } => {
                assert_eq!(status, ProjectStatus::InProgress);
                assert_eq!(priority, ProjectPriority::Low);
                assert_eq!(members, vec!["alice", "bob"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_bad_status() {
        let result = Cli::try_parse_from(["folio", "project", "list", "--status", "done"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["folio", "whoami", "-H", "--data-dir", "/tmp/x"]).unwrap();
        assert!(cli.human_readable);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
    }
}
