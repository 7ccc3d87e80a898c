//! Project commands: CRUD, milestones and the portfolio summary.
//!
//! All of these require a logged-in session; they move it to the dashboard.

use super::{DisplayPrefs, Output, enter_page, to_json};
use crate::config::ResolvedSettings;
use crate::models::{
    PortfolioSummary, Project, ProjectFilter, ProjectMilestone, ProjectPriority, ProjectStatus,
};
use crate::session::Page;
use crate::storage::{ProjectStore, RecordStore};
use crate::validation::validate_project;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Fields for a new project.
#[derive(Debug, Clone)]
pub struct ProjectInput {
    pub name: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: ProjectStatus,
    pub priority: ProjectPriority,
    pub budget: f64,
    pub spent: f64,
    pub progress: f64,
    pub team_members: Vec<String>,
}

/// Changes to an existing project. `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: Option<ProjectStatus>,
    pub priority: Option<ProjectPriority>,
    pub budget: Option<f64>,
    pub spent: Option<f64>,
    pub progress: Option<f64>,
    /// Replaces the whole member list when set
    pub team_members: Option<Vec<String>>,
}

impl ProjectPatch {
    /// Build the replacement record. Identity, creation time and milestones
    /// carry over from `current`.
    fn apply(self, current: Project) -> Project {
        Project {
            name: self.name.unwrap_or(current.name),
            description: self.description.unwrap_or(current.description),
            start_date: self.start_date.unwrap_or(current.start_date),
            end_date: self.end_date.unwrap_or(current.end_date),
            status: self.status.unwrap_or(current.status),
            priority: self.priority.unwrap_or(current.priority),
            budget: self.budget.unwrap_or(current.budget),
            spent: self.spent.unwrap_or(current.spent),
            progress: self.progress.unwrap_or(current.progress),
            team_members: self.team_members.unwrap_or(current.team_members),
            ..current
        }
    }
}

/// A new milestone.
#[derive(Debug, Clone)]
pub struct MilestoneInput {
    pub title: String,
    pub due_date: DateTime<Utc>,
    pub description: Option<String>,
}

fn open_store(settings: &ResolvedSettings) -> Result<ProjectStore> {
    enter_page(settings, Page::Dashboard)?;
    Ok(ProjectStore::open(settings.data_dir())?)
}

fn fetch(store: &ProjectStore, id: &str) -> Result<Project> {
    store
        .get(id)?
        .ok_or_else(|| Error::NotFound(format!("Project not found: {}", id)))
}

/// Validate and write back a modified project.
fn save_update(
    settings: &ResolvedSettings,
    store: &ProjectStore,
    project: Project,
) -> Result<ProjectView> {
    validate_project(&project, &settings.project_limits)?;
    if !store.update(&project)? {
        // Deleted between our read and our write.
        return Err(Error::NotFound(format!("Project not found: {}", project.id)));
    }
    let saved = fetch(store, &project.id)?;
    Ok(ProjectView::new(saved, settings))
}

/// A project plus its derived fields.
#[derive(Debug, Serialize)]
pub struct ProjectView {
    #[serde(flatten)]
    pub project: Project,
    pub budget_status: f64,
    pub is_overdue: bool,
    #[serde(skip)]
    display: DisplayPrefs,
}

impl ProjectView {
    pub fn new(project: Project, settings: &ResolvedSettings) -> Self {
        Self {
            budget_status: project.budget_status(),
            is_overdue: project.is_overdue(),
            project,
            display: DisplayPrefs::from_settings(settings),
        }
    }

    fn headline(&self) -> String {
        let p = &self.project;
        let overdue = if self.is_overdue { " [overdue]" } else { "" };
        format!(
            "{} {} [{}] [{}] {:.0}%{}",
            p.id, p.name, p.status, p.priority, p.progress, overdue
        )
    }
}

impl Output for ProjectView {
    fn to_json(&self) -> String {
        to_json(self)
    }

    fn to_human(&self) -> String {
        let p = &self.project;
        let d = &self.display;
        let mut lines = vec![
            self.headline(),
            format!("  {}", p.description),
            format!(
                "  Dates: {} -> {}",
                d.date(&p.start_date),
                d.date(&p.end_date)
            ),
            format!(
                "  Budget: {} / {} ({:.1}%)",
                d.money(p.spent),
                d.money(p.budget),
                self.budget_status
            ),
        ];
        if !p.team_members.is_empty() {
            lines.push(format!("  Team: {}", p.team_members.join(", ")));
        }
        if !p.milestones.is_empty() {
            lines.push(format!(
                "  Milestones ({}/{} complete):",
                p.completed_milestones(),
                p.milestones.len()
            ));
            for (i, m) in p.milestones.iter().enumerate() {
                let mark = if m.completed { "x" } else { " " };
                lines.push(format!(
                    "    {}. [{}] {} (due {})",
                    i + 1,
                    mark,
                    m.title,
                    d.date(&m.due_date)
                ));
            }
        }
        lines.join("\n")
    }
}

/// Create a project with a freshly generated id.
pub fn project_create(settings: &ResolvedSettings, input: ProjectInput) -> Result<ProjectView> {
    let store = open_store(settings)?;

    let mut project = Project::new(
        uuid::Uuid::new_v4().to_string(),
        input.name.trim(),
        input.description.trim(),
        input.start_date,
        input.end_date,
    );
    project.status = input.status;
    project.priority = input.priority;
    project.budget = input.budget;
    project.spent = input.spent;
    project.progress = input.progress;
    project.team_members = input.team_members;

    validate_project(&project, &settings.project_limits)?;

    if !store.create(&project)? {
        return Err(Error::InvalidInput(format!(
            "Project id already exists: {}",
            project.id
        )));
    }
    tracing::info!(id = %project.id, name = %project.name, "project created");
    Ok(ProjectView::new(project, settings))
}

#[derive(Debug, Serialize)]
pub struct ProjectList {
    pub projects: Vec<ProjectView>,
    pub count: usize,
}

impl Output for ProjectList {
    fn to_json(&self) -> String {
        to_json(self)
    }

    fn to_human(&self) -> String {
        if self.projects.is_empty() {
            return "No projects found.".to_string();
        }
        let mut lines = vec![format!("{} project(s):", self.count)];
        lines.extend(self.projects.iter().map(|v| {
            format!(
                "  {} | {} / {}",
                v.headline(),
                v.display.money(v.project.spent),
                v.display.money(v.project.budget)
            )
        }));
        lines.join("\n")
    }
}

/// List projects matching `filter`, in stored order.
pub fn project_list(settings: &ResolvedSettings, filter: &ProjectFilter) -> Result<ProjectList> {
    let store = open_store(settings)?;
    let projects: Vec<ProjectView> = filter
        .apply(store.read_all()?)
        .into_iter()
        .map(|p| ProjectView::new(p, settings))
        .collect();
    Ok(ProjectList {
        count: projects.len(),
        projects,
    })
}

/// Show one project.
pub fn project_show(settings: &ResolvedSettings, id: &str) -> Result<ProjectView> {
    let store = open_store(settings)?;
    Ok(ProjectView::new(fetch(&store, id)?, settings))
}

/// Apply `patch` to a project and save it as a whole-record replacement.
pub fn project_update(
    settings: &ResolvedSettings,
    id: &str,
    patch: ProjectPatch,
) -> Result<ProjectView> {
    let store = open_store(settings)?;
    let current = fetch(&store, id)?;
    save_update(settings, &store, patch.apply(current))
}

#[derive(Debug, Serialize)]
pub struct ProjectDeleted {
    pub id: String,
    pub deleted: bool,
}

impl Output for ProjectDeleted {
    fn to_json(&self) -> String {
        to_json(self)
    }

    fn to_human(&self) -> String {
        format!("Deleted project {}", self.id)
    }
}

/// Delete a project.
pub fn project_delete(settings: &ResolvedSettings, id: &str) -> Result<ProjectDeleted> {
    let store = open_store(settings)?;
    if !store.delete(id)? {
        return Err(Error::NotFound(format!("Project not found: {}", id)));
    }
    tracing::info!(id = %id, "project deleted");
    Ok(ProjectDeleted {
        id: id.to_string(),
        deleted: true,
    })
}

/// Append a milestone to a project.
pub fn milestone_add(
    settings: &ResolvedSettings,
    id: &str,
    input: MilestoneInput,
) -> Result<ProjectView> {
    let title = input.title.trim();
    if title.is_empty() {
        return Err(Error::InvalidInput(
            "Milestone title must not be empty".to_string(),
        ));
    }

    let store = open_store(settings)?;
    let mut project = fetch(&store, id)?;
    let mut milestone = ProjectMilestone::new(title, input.due_date);
    milestone.description = input.description.filter(|d| !d.trim().is_empty());
    project.milestones.push(milestone);
    save_update(settings, &store, project)
}

/// Mark the milestone at 1-based `position` complete.
pub fn milestone_complete(
    settings: &ResolvedSettings,
    id: &str,
    position: usize,
) -> Result<ProjectView> {
    let store = open_store(settings)?;
    let mut project = fetch(&store, id)?;
    let count = project.milestones.len();
    let milestone = position
        .checked_sub(1)
        .and_then(|i| project.milestones.get_mut(i))
        .ok_or_else(|| {
            Error::InvalidInput(format!(
                "Milestone {} does not exist (project has {})",
                position, count
            ))
        })?;
    if !milestone.completed {
        milestone.complete(Utc::now());
    }
    save_update(settings, &store, project)
}

#[derive(Debug, Serialize)]
pub struct SummaryResult {
    #[serde(flatten)]
    pub summary: PortfolioSummary,
    #[serde(skip)]
    display: DisplayPrefs,
}

impl Output for SummaryResult {
    fn to_json(&self) -> String {
        to_json(self)
    }

    fn to_human(&self) -> String {
        let s = &self.summary;
        let d = &self.display;
        let mut lines = vec![
            format!("Total Projects:  {}", s.total_projects),
            format!("Active Projects: {}", s.active_projects),
            format!("Overdue:         {}", s.overdue_projects),
            format!("Total Budget:    {}", d.money(s.total_budget)),
            format!(
                "Total Spent:     {} ({:.1}%)",
                d.money(s.total_spent),
                s.budget_utilization
            ),
            "By status:".to_string(),
        ];
        for status in ProjectStatus::ALL {
            let count = s.by_status.get(status.as_str()).copied().unwrap_or(0);
            lines.push(format!("  {}: {}", status, count));
        }
        lines.join("\n")
    }
}

/// Aggregate metrics over projects matching `filter`.
pub fn summary(settings: &ResolvedSettings, filter: &ProjectFilter) -> Result<SummaryResult> {
    let store = open_store(settings)?;
    let projects = filter.apply(store.read_all()?);
    Ok(SummaryResult {
        summary: PortfolioSummary::from_projects(&projects),
        display: DisplayPrefs::from_settings(settings),
    })
}
