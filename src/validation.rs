//! Input validation for account and project fields.
//!
//! The account validators are pure length checks: no charset rules and no
//! Unicode normalisation. Lengths are counted in characters.

use crate::models::Project;

/// Minimum username length.
pub const MIN_USERNAME_LENGTH: usize = 3;
/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;
/// Minimum display-name length.
pub const MIN_NAME_LENGTH: usize = 2;

/// An input failed a validation rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    /// The field that failed (e.g. "username", "budget")
    pub field: &'static str,
    /// User-facing message
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

fn check_min_length(
    value: &str,
    min: usize,
    field: &'static str,
    label: &str,
) -> Result<(), ValidationError> {
    if value.is_empty() || value.chars().count() < min {
        return Err(ValidationError::new(
            field,
            format!("{} must be at least {} characters long", label, min),
        ));
    }
    Ok(())
}

/// Validate a username. Returns the trimmed value.
///
/// The length rule applies to the raw input, before trimming.
pub fn validate_username(username: &str) -> Result<String, ValidationError> {
    check_min_length(username, MIN_USERNAME_LENGTH, "username", "Username")?;
    Ok(username.trim().to_string())
}

/// Validate a password. Returns it unchanged: surrounding whitespace is part
/// of the password.
pub fn validate_password(password: &str) -> Result<String, ValidationError> {
    check_min_length(password, MIN_PASSWORD_LENGTH, "password", "Password")?;
    Ok(password.to_string())
}

/// Validate a display name. Returns the trimmed value.
pub fn validate_name(name: &str) -> Result<String, ValidationError> {
    check_min_length(name, MIN_NAME_LENGTH, "name", "Name")?;
    Ok(name.trim().to_string())
}

/// Bounds applied to project fields before they are saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLimits {
    pub min_name_length: usize,
    pub max_name_length: usize,
    pub min_description_length: usize,
    pub max_description_length: usize,
    pub max_team_members: usize,
}

impl Default for ProjectLimits {
    fn default() -> Self {
        Self {
            min_name_length: 3,
            max_name_length: 100,
            min_description_length: 10,
            max_description_length: 1000,
            max_team_members: 20,
        }
    }
}

fn is_amount(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

/// Check a project against `limits` and the numeric invariants
/// (non-negative money, progress in 0-100, end not before start).
pub fn validate_project(project: &Project, limits: &ProjectLimits) -> Result<(), ValidationError> {
    let name_len = project.name.trim().chars().count();
    if name_len < limits.min_name_length || name_len > limits.max_name_length {
        return Err(ValidationError::new(
            "name",
            format!(
                "Project name must be between {} and {} characters long",
                limits.min_name_length, limits.max_name_length
            ),
        ));
    }

    let description_len = project.description.trim().chars().count();
    if description_len < limits.min_description_length
        || description_len > limits.max_description_length
    {
        return Err(ValidationError::new(
            "description",
            format!(
                "Description must be between {} and {} characters long",
                limits.min_description_length, limits.max_description_length
            ),
        ));
    }

    if project.team_members.len() > limits.max_team_members {
        return Err(ValidationError::new(
            "team_members",
            format!(
                "A project can have at most {} team members",
                limits.max_team_members
            ),
        ));
    }

    // JSON has no encoding for NaN or infinity.
    if !is_amount(project.budget) {
        return Err(ValidationError::new(
            "budget",
            "Budget must be a finite, non-negative amount",
        ));
    }
    if !is_amount(project.spent) {
        return Err(ValidationError::new(
            "spent",
            "Spent must be a finite, non-negative amount",
        ));
    }
    if !project.progress.is_finite() || !(0.0..=100.0).contains(&project.progress) {
        return Err(ValidationError::new(
            "progress",
            "Progress must be between 0 and 100",
        ));
    }

    if project.end_date < project.start_date {
        return Err(ValidationError::new(
            "end_date",
            "End date must not be before the start date",
        ));
    }

    Ok(())
}
