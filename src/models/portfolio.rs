//! Portfolio-level views over a list of projects: filtering and aggregate metrics.

use super::{Project, ProjectPriority, ProjectStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Multi-select filter over status and priority.
///
/// An empty list places no constraint on that field. A project matches when it
/// satisfies both fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFilter {
    pub statuses: Vec<ProjectStatus>,
    pub priorities: Vec<ProjectPriority>,
}

impl ProjectFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.statuses.push(status);
        self
    }

    pub fn with_priority(mut self, priority: ProjectPriority) -> Self {
        self.priorities.push(priority);
        self
    }

    /// Whether the filter places no constraint at all.
    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty() && self.priorities.is_empty()
    }

    pub fn matches(&self, project: &Project) -> bool {
        (self.statuses.is_empty() || self.statuses.contains(&project.status))
            && (self.priorities.is_empty() || self.priorities.contains(&project.priority))
    }

    /// Keep the matching projects, preserving their order.
    pub fn apply(&self, projects: Vec<Project>) -> Vec<Project> {
        projects.into_iter().filter(|p| self.matches(p)).collect()
    }
}

/// Aggregate metrics across a set of projects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub total_projects: usize,
    /// Projects currently `In Progress`
    pub active_projects: usize,
    pub overdue_projects: usize,
    pub total_budget: f64,
    pub total_spent: f64,
    /// `total_spent / total_budget * 100`, or 0 without a positive budget
    pub budget_utilization: f64,
    /// Project count per status label, including zero counts
    pub by_status: BTreeMap<String, usize>,
}

impl PortfolioSummary {
    /// Summarise `projects` as of now.
    pub fn from_projects(projects: &[Project]) -> Self {
        Self::at(projects, Utc::now())
    }

    /// Summarise `projects`, judging overdue status at `now`.
    pub fn at(projects: &[Project], now: DateTime<Utc>) -> Self {
        let mut by_status: BTreeMap<String, usize> = ProjectStatus::ALL
            .iter()
            .map(|s| (s.as_str().to_string(), 0))
            .collect();
        for project in projects {
            *by_status
                .entry(project.status.as_str().to_string())
                .or_default() += 1;
        }

        let total_budget: f64 = projects.iter().map(|p| p.budget).sum();
        let total_spent: f64 = projects.iter().map(|p| p.spent).sum();
        let budget_utilization = if total_budget > 0.0 {
            total_spent / total_budget * 100.0
        } else {
            0.0
        };

        Self {
            total_projects: projects.len(),
            active_projects: projects
                .iter()
                .filter(|p| p.status == ProjectStatus::InProgress)
                .count(),
            overdue_projects: projects.iter().filter(|p| p.is_overdue_at(now)).count(),
            total_budget,
            total_spent,
            budget_utilization,
            by_status,
        }
    }
}
