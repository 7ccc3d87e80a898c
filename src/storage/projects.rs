//! Project store backed by `projects.json`.

use super::document::{self, DocumentShape};
use super::{PROJECTS_FILE, RecordStore, StorageError};
use crate::models::Project;
use chrono::Utc;
use std::path::{Path, PathBuf};

/// Projects kept as an ordered sequence, looked up by linear scan on `id`.
#[derive(Debug, Clone)]
pub struct ProjectStore {
    path: PathBuf,
}

impl ProjectStore {
    /// Open the store in `data_dir`, creating the directory if needed.
    pub fn open(data_dir: &Path) -> Result<Self, StorageError> {
        document::ensure_dir(data_dir)?;
        Ok(Self {
            path: data_dir.join(PROJECTS_FILE),
        })
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the whole document with `projects`.
    ///
    /// This is the write half of every mutation. It does not look at what is
    /// currently on disk, so a caller holding an older snapshot overwrites any
    /// change made since that snapshot was read.
    pub fn replace_all(&self, projects: &[Project]) -> Result<(), StorageError> {
        document::save(&self.path, projects)
    }
}

impl RecordStore for ProjectStore {
    type Key = str;
    type Record = Project;

    fn read_all(&self) -> Result<Vec<Project>, StorageError> {
        Ok(document::load(&self.path, DocumentShape::Array)?.unwrap_or_default())
    }

    fn get(&self, id: &str) -> Result<Option<Project>, StorageError> {
        if id.is_empty() {
            return Ok(None);
        }
        Ok(self.read_all()?.into_iter().find(|p| p.id == id))
    }

    fn create(&self, project: &Project) -> Result<bool, StorageError> {
        let mut projects = self.read_all()?;
        if projects.iter().any(|p| p.id == project.id) {
            return Ok(false);
        }

        projects.push(project.clone());
        self.replace_all(&projects)?;
        tracing::debug!(id = %project.id, "created project");
        Ok(true)
    }

    /// Replace the matching project and stamp `updated_at`.
    ///
    /// The new `updated_at` is the current time, or the previous value if the
    /// clock has moved backwards, so it never decreases.
    fn update(&self, project: &Project) -> Result<bool, StorageError> {
        let mut projects = self.read_all()?;
        let Some(slot) = projects.iter_mut().find(|p| p.id == project.id) else {
            return Ok(false);
        };

        let updated_at = Utc::now().max(slot.updated_at);
        *slot = Project {
            updated_at,
            ..project.clone()
        };
        self.replace_all(&projects)?;
        tracing::debug!(id = %project.id, "updated project");
        Ok(true)
    }

    fn delete(&self, id: &str) -> Result<bool, StorageError> {
        let mut projects = self.read_all()?;
        let before = projects.len();
        projects.retain(|p| p.id != id);
        if projects.len() == before {
            return Ok(false);
        }

        self.replace_all(&projects)?;
        tracing::debug!(id = %id, "deleted project");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProjectMilestone, ProjectPriority, ProjectStatus};
    use crate::test_utils::TestEnv;
    use chrono::{Duration, TimeZone};
    use std::fs;

    fn create_test_store() -> (TestEnv, ProjectStore) {
        let env = TestEnv::new();
        let store = env.project_store();
        (env, store)
    }

    fn project(id: &str) -> Project {
        let start = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let mut project = Project::new(
            id,
            format!("Project {}", id),
            "A project used in tests",
            start,
            start + Duration::days(60),
        );
        project.budget = 5000.0;
        project
    }

    #[test]
    fn test_empty_store() {
        let (_env, store) = create_test_store();
        assert!(store.read_all().unwrap().is_empty());
        assert!(store.get("p-1").unwrap().is_none());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_create_and_get() {
        let (_env, store) = create_test_store();
        let p = project("p-1");

        assert!(store.create(&p).unwrap());
        assert_eq!(store.get("p-1").unwrap(), Some(p));
        assert!(store.get("").unwrap().is_none());
    }

    #[test]
    fn test_create_preserves_order() {
        let (_env, store) = create_test_store();
        for id in ["c", "a", "b"] {
            store.create(&project(id)).unwrap();
        }

        let ids: Vec<String> = store.read_all().unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_create_duplicate_id() {
        let (_env, store) = create_test_store();
        store.create(&project("p-1")).unwrap();

        let mut clash = project("p-1");
        clash.name = "Other".to_string();
        assert!(!store.create(&clash).unwrap());

        let all = store.read_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Project p-1");
    }

    #[test]
    fn test_update_missing_leaves_store_unchanged() {
        let (_env, store) = create_test_store();
        store.create(&project("p-1")).unwrap();
        let before = fs::read_to_string(store.path()).unwrap();

        assert!(!store.update(&project("p-2")).unwrap());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
    }

    #[test]
    fn test_update_replaces_all_fields() {
        let (_env, store) = create_test_store();
        let original = project("p-1");
        store.create(&original).unwrap();

        let mut changed = original.clone();
        changed.name = "Renamed".to_string();
        changed.description = "A new description entirely".to_string();
        changed.status = ProjectStatus::OnHold;
        changed.priority = ProjectPriority::Critical;
        changed.spent = 1200.0;
        changed.progress = 35.0;
        changed.team_members = vec!["dana".to_string()];
        changed.milestones = vec![ProjectMilestone::new("Kickoff", original.start_date)];

        assert!(store.update(&changed).unwrap());

        let loaded = store.get("p-1").unwrap().unwrap();
        assert!(loaded.updated_at >= original.updated_at);
        assert_eq!(
            loaded,
            Project {
                updated_at: loaded.updated_at,
                ..changed
            }
        );
    }

    #[test]
    fn test_update_never_moves_updated_at_backwards() {
        let (_env, store) = create_test_store();
        let mut future = project("p-1");
        future.updated_at = Utc::now() + Duration::days(365);
        store.create(&future).unwrap();

        let mut stale = future.clone();
        stale.updated_at = future.created_at - Duration::days(365);
        store.update(&stale).unwrap();

        let loaded = store.get("p-1").unwrap().unwrap();
        assert_eq!(loaded.updated_at, future.updated_at);
    }

    #[test]
    fn test_delete() {
        let (_env, store) = create_test_store();
        store.create(&project("p-1")).unwrap();
        store.create(&project("p-2")).unwrap();

        assert!(store.delete("p-1").unwrap());
        assert!(!store.delete("p-1").unwrap());
        assert!(!store.delete("").unwrap());

        let ids: Vec<String> = store.read_all().unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["p-2"]);
    }

    #[test]
    fn test_roundtrip_through_disk() {
        let (_env, store) = create_test_store();
        let mut p = project("p-1");
        p.status = ProjectStatus::InProgress;
        p.priority = ProjectPriority::High;
        p.team_members = vec!["alice".into(), "bob".into()];
        let mut milestone = ProjectMilestone::new("Survey", p.start_date + Duration::days(5));
        milestone.description = Some("Site survey".to_string());
        milestone.complete(p.start_date + Duration::days(4));
        p.milestones = vec![milestone, ProjectMilestone::new("Handover", p.end_date)];

        store.create(&p).unwrap();
        assert_eq!(store.get("p-1").unwrap(), Some(p));

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"status\": \"In Progress\""));
        assert!(raw.contains("\"priority\": \"High\""));
    }

    #[test]
    fn test_reads_naive_timestamps() {
        let (_env, store) = create_test_store();
        fs::write(
            store.path(),
            r#"[{
                "id": "legacy",
                "name": "Legacy",
                "description": "Written without offsets",
                "start_date": "2024-01-01T00:00:00",
                "end_date": "2024-03-01T00:00:00",
                "status": "On Hold",
                "priority": "Medium",
                "budget": 100.0,
                "spent": 0.0,
                "progress": 10.0,
                "milestones": [{
                    "title": "First",
                    "due_date": "2024-02-01T00:00:00",
                    "completed": true,
                    "completion_date": "2024-01-28T12:30:00.250000",
                    "description": null
                }],
                "team_members": [],
                "created_at": "2023-12-20T09:00:00.123456",
                "updated_at": "2023-12-21T09:00:00.123456"
            }]"#,
        )
        .unwrap();

        let p = store.get("legacy").unwrap().unwrap();
        assert_eq!(p.status, ProjectStatus::OnHold);
        assert_eq!(p.start_date, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert!(p.milestones[0].completion_date.is_some());
    }

    #[test]
    fn test_not_an_array_fails() {
        let (_env, store) = create_test_store();
        fs::write(store.path(), r#"{"id": "p-1"}"#).unwrap();
        assert!(matches!(
            store.read_all().unwrap_err(),
            StorageError::InvalidShape { expected: "array", .. }
        ));
    }

    #[test]
    fn test_unknown_status_fails() {
        let (_env, store) = create_test_store();
        let mut value = serde_json::to_value(vec![project("p-1")]).unwrap();
        value[0]["status"] = serde_json::json!("Abandoned");
        fs::write(store.path(), value.to_string()).unwrap();

        assert!(matches!(
            store.read_all().unwrap_err(),
            StorageError::Malformed { .. }
        ));
    }

    #[test]
    fn test_missing_field_fails() {
        let (_env, store) = create_test_store();
        let mut value = serde_json::to_value(vec![project("p-1")]).unwrap();
        value[0].as_object_mut().unwrap().remove("budget");
        fs::write(store.path(), value.to_string()).unwrap();

        assert!(matches!(
            store.get("p-1").unwrap_err(),
            StorageError::Malformed { .. }
        ));
    }

    /// Two writers interleave their read-modify-write cycles: both read the
    /// empty store, then each rewrites the file from its own snapshot. Only
    /// the later write survives.
    #[test]
    fn test_interleaved_writers_lose_an_update() {
        let env = TestEnv::new();
        let writer_a = env.project_store();
        let writer_b = env.project_store();

        let snapshot_a = writer_a.read_all().unwrap();
        assert!(snapshot_a.is_empty());

        assert!(writer_b.create(&project("from-b")).unwrap());

        let mut next_a = snapshot_a;
        next_a.push(project("from-a"));
        writer_a.replace_all(&next_a).unwrap();

        let ids: Vec<String> = env
            .project_store()
            .read_all()
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["from-a"]);
    }

    /// Sequential creates through separate handles both persist.
    #[test]
    fn test_sequential_writers_keep_both() {
        let env = TestEnv::new();
        env.project_store().create(&project("one")).unwrap();
        env.project_store().create(&project("two")).unwrap();
        assert_eq!(env.project_store().read_all().unwrap().len(), 2);
    }
}
