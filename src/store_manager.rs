use crate::error::{StoreError, StoreResult};
use crate::storage::{ContainerState, ContainerStatus, TutorialStep, UserProgress};
use anyhow::{Context, Result};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const TUTORIALS: &str = "tutorials.json";
const PROGRESS: &str = "user_progress.json";
const CONTAINERS: &str = "container_states.json";
const TABLES: [&str; 3] = [TUTORIALS, PROGRESS, CONTAINERS];

/// Row counts and footprint of the store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreInfo {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub tables: Vec<(String, usize)>,
}

/// Single-writer table store: one pretty-printed JSON array per table.
/// Every write replaces the whole file, so the last write wins.
pub struct StoreManager {
    base_dir: PathBuf,
}

impl StoreManager {
    pub fn new_with_config(config: &crate::config::Config, i18n: &crate::i18n::I18n) -> Result<Self> {
        let base_dir = config.data_dir();
        let store = Self::open(&base_dir).context(i18n.t_format(
            "error_open_store",
            &[&base_dir.display().to_string()],
        ))?;
        Ok(store)
    }

    /// Open (creating if needed) a store rooted at `base_dir`.
    pub fn open(base_dir: impl AsRef<Path>) -> StoreResult<Self> {
        let store = Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        };
        store.init()?;
        Ok(store)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Create the directory and any missing table files.
    pub fn init(&self) -> StoreResult<()> {
        fs::create_dir_all(&self.base_dir)?;
        for table in TABLES {
            let path = self.base_dir.join(table);
            if !path.exists() {
                fs::write(&path, "[]")?;
                debug!(table, "created empty table");
            }
        }
        Ok(())
    }

    /// Drop every table and start again empty.
    pub fn reset(&self) -> StoreResult<()> {
        for table in TABLES {
            let path = self.base_dir.join(table);
            if path.exists() {
                fs::remove_file(&path)?;
            }
        }
        info!(dir = %self.base_dir.display(), "store reset");
        self.init()
    }

    pub fn info(&self) -> StoreResult<StoreInfo> {
        let mut size_bytes = 0;
        let mut tables = Vec::new();

        for table in TABLES {
            let path = self.base_dir.join(table);
            if path.exists() {
                size_bytes += fs::metadata(&path)?.len();
            }
            let rows: Vec<serde_json::Value> = self.load(table)?;
            tables.push((table.trim_end_matches(".json").to_string(), rows.len()));
        }

        Ok(StoreInfo {
            path: self.base_dir.clone(),
            size_bytes,
            tables,
        })
    }

    fn load<T: DeserializeOwned>(&self, table: &str) -> StoreResult<Vec<T>> {
        let path = self.base_dir.join(table);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn save<T: Serialize>(&self, table: &str, rows: &[T]) -> StoreResult<()> {
        let path = self.base_dir.join(table);
        serde_json::to_writer_pretty(fs::File::create(&path)?, rows)?;
        Ok(())
    }

    // Tutorials

    /// Insert a step, assigning it the next id. Steps must validate and be
    /// unique per (section, step number).
    pub fn insert_tutorial(&self, mut step: TutorialStep) -> StoreResult<TutorialStep> {
        let errors = step.validate();
        if !errors.is_empty() {
            return Err(StoreError::InvalidTutorial(errors));
        }

        let mut rows: Vec<TutorialStep> = self.load(TUTORIALS)?;
        if rows
            .iter()
            .any(|t| t.section == step.section && t.step_number == step.step_number)
        {
            return Err(StoreError::DuplicateTutorial {
                section: step.section,
                step_number: step.step_number,
            });
        }

        step.id = rows.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        rows.push(step.clone());
        self.save(TUTORIALS, &rows)?;
        info!(id = step.id, section = %step.section, "tutorial added");
        Ok(step)
    }

    /// All steps, ordered by section name then step number.
    pub fn get_all_tutorials(&self) -> StoreResult<Vec<TutorialStep>> {
        let mut rows: Vec<TutorialStep> = self.load(TUTORIALS)?;
        rows.sort_by(|a, b| {
            a.section
                .cmp(&b.section)
                .then(a.step_number.cmp(&b.step_number))
        });
        Ok(rows)
    }

    pub fn get_tutorial_by_id(&self, id: u32) -> StoreResult<Option<TutorialStep>> {
        let rows: Vec<TutorialStep> = self.load(TUTORIALS)?;
        Ok(rows.into_iter().find(|t| t.id == id))
    }

    pub fn get_tutorials_by_section(&self, section: &str) -> StoreResult<Vec<TutorialStep>> {
        let mut rows: Vec<TutorialStep> = self.load(TUTORIALS)?;
        rows.retain(|t| t.section == section);
        rows.sort_by_key(|t| t.step_number);
        Ok(rows)
    }

    /// Section names with their step counts, in order of first appearance.
    pub fn get_section_stats(&self) -> StoreResult<Vec<(String, usize)>> {
        let mut rows: Vec<TutorialStep> = self.load(TUTORIALS)?;
        rows.sort_by_key(|t| t.id);

        let mut stats: Vec<(String, usize)> = Vec::new();
        for row in rows {
            match stats.iter_mut().find(|(name, _)| *name == row.section) {
                Some((_, count)) => *count += 1,
                None => stats.push((row.section, 1)),
            }
        }
        Ok(stats)
    }

    pub fn get_all_sections(&self) -> StoreResult<Vec<String>> {
        Ok(self
            .get_section_stats()?
            .into_iter()
            .map(|(name, _)| name)
            .collect())
    }

    /// The step with the smallest id above `current_id`.
    pub fn get_next_tutorial(&self, current_id: u32) -> StoreResult<Option<TutorialStep>> {
        let rows: Vec<TutorialStep> = self.load(TUTORIALS)?;
        Ok(rows
            .into_iter()
            .filter(|t| t.id > current_id)
            .min_by_key(|t| t.id))
    }

    /// The step with the largest id below `current_id`.
    pub fn get_previous_tutorial(&self, current_id: u32) -> StoreResult<Option<TutorialStep>> {
        let rows: Vec<TutorialStep> = self.load(TUTORIALS)?;
        Ok(rows
            .into_iter()
            .filter(|t| t.id < current_id)
            .max_by_key(|t| t.id))
    }

    // Progress

    /// Progress records keyed by tutorial id.
    pub fn get_user_progress(&self) -> StoreResult<BTreeMap<u32, UserProgress>> {
        let rows: Vec<UserProgress> = self.load(PROGRESS)?;
        Ok(rows.into_iter().map(|p| (p.tutorial_id, p)).collect())
    }

    pub fn mark_tutorial_complete(&self, tutorial_id: u32) -> StoreResult<UserProgress> {
        let record = self.upsert_progress(tutorial_id, |p| {
            p.completed = true;
            p.timestamp = Some(Utc::now());
            p.attempts += 1;
        })?;
        info!(tutorial_id, attempts = record.attempts, "tutorial completed");
        Ok(record)
    }

    pub fn increment_tutorial_attempts(&self, tutorial_id: u32) -> StoreResult<UserProgress> {
        let record = self.upsert_progress(tutorial_id, |p| p.attempts += 1)?;
        debug!(tutorial_id, attempts = record.attempts, "attempt recorded");
        Ok(record)
    }

    fn upsert_progress<F>(&self, tutorial_id: u32, update: F) -> StoreResult<UserProgress>
    where
        F: FnOnce(&mut UserProgress),
    {
        if self.get_tutorial_by_id(tutorial_id)?.is_none() {
            return Err(StoreError::TutorialNotFound(tutorial_id));
        }

        let mut rows: Vec<UserProgress> = self.load(PROGRESS)?;
        let index = match rows.iter().position(|p| p.tutorial_id == tutorial_id) {
            Some(i) => i,
            None => {
                let id = rows.iter().map(|p| p.id).max().unwrap_or(0) + 1;
                rows.push(UserProgress {
                    id,
                    tutorial_id,
                    completed: false,
                    timestamp: None,
                    attempts: 0,
                });
                rows.len() - 1
            }
        };

        update(&mut rows[index]);
        let record = rows[index].clone();
        self.save(PROGRESS, &rows)?;
        Ok(record)
    }

    /// Completed steps as a percentage of all steps; 0 when there are none.
    pub fn get_progress_percentage(&self) -> StoreResult<f64> {
        let tutorials: Vec<TutorialStep> = self.load(TUTORIALS)?;
        if tutorials.is_empty() {
            return Ok(0.0);
        }
        let completed = self
            .get_user_progress()?
            .values()
            .filter(|p| p.completed)
            .count();
        Ok(completed as f64 / tutorials.len() as f64 * 100.0)
    }

    // Containers

    /// Newest first.
    pub fn get_all_containers(&self) -> StoreResult<Vec<ContainerState>> {
        let mut rows: Vec<ContainerState> = self.load(CONTAINERS)?;
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    pub fn get_container_by_name(&self, name: &str) -> StoreResult<Option<ContainerState>> {
        let rows: Vec<ContainerState> = self.load(CONTAINERS)?;
        Ok(rows.into_iter().find(|c| c.container_name == name))
    }

    /// New container in the `created` state. Names are unique.
    pub fn create_container(
        &self,
        name: &str,
        image: &str,
        port_mapping: Option<&str>,
    ) -> StoreResult<ContainerState> {
        let mut rows: Vec<ContainerState> = self.load(CONTAINERS)?;
        if rows.iter().any(|c| c.container_name == name) {
            return Err(StoreError::DuplicateContainer(name.to_string()));
        }

        let container = ContainerState {
            id: rows.iter().map(|c| c.id).max().unwrap_or(0) + 1,
            container_name: name.to_string(),
            state: ContainerStatus::Created,
            image: image.to_string(),
            created_at: Utc::now(),
            port_mapping: port_mapping.map(str::to_string),
        };
        rows.push(container.clone());
        self.save(CONTAINERS, &rows)?;
        info!(name, image, "container created");
        Ok(container)
    }

    /// Returns false when no container has that name.
    pub fn update_container_state(&self, name: &str, state: ContainerStatus) -> StoreResult<bool> {
        let mut rows: Vec<ContainerState> = self.load(CONTAINERS)?;
        let Some(row) = rows.iter_mut().find(|c| c.container_name == name) else {
            return Ok(false);
        };
        row.state = state;
        self.save(CONTAINERS, &rows)?;
        info!(name, %state, "container state changed");
        Ok(true)
    }

    /// Returns false when no container has that name.
    pub fn remove_container(&self, name: &str) -> StoreResult<bool> {
        let mut rows: Vec<ContainerState> = self.load(CONTAINERS)?;
        let before = rows.len();
        rows.retain(|c| c.container_name != name);
        if rows.len() == before {
            return Ok(false);
        }
        self.save(CONTAINERS, &rows)?;
        info!(name, "container removed");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::VisualState;
    use tempfile::TempDir;

    fn store() -> (TempDir, StoreManager) {
        let dir = tempfile::tempdir().unwrap();
        let store = StoreManager::open(dir.path().join("data")).unwrap();
        (dir, store)
    }

    fn step(section: &str, number: u32, expected: Option<&str>) -> TutorialStep {
        TutorialStep {
            id: 0,
            section: section.to_string(),
            step_number: number,
            title: format!("{} step {}", section, number),
            description: "A step about ships and harbors.".to_string(),
            expected_command: expected.map(str::to_string),
            visual_state: VisualState::Neutral,
            help_text: None,
            docker_concept: None,
            metaphor_explanation: None,
        }
    }

    #[test]
    fn open_creates_empty_tables() {
        let (_dir, store) = store();
        let info = store.info().unwrap();
        assert_eq!(info.tables.len(), 3);
        assert!(info.tables.iter().all(|(_, rows)| *rows == 0));
        assert!(store.get_all_tutorials().unwrap().is_empty());
        assert_eq!(store.get_progress_percentage().unwrap(), 0.0);
    }

    #[test]
    fn tutorials_are_ordered_and_navigable() {
        let (_dir, store) = store();
        let a = store.insert_tutorial(step("Introduction", 2, None)).unwrap();
        let b = store.insert_tutorial(step("Introduction", 1, None)).unwrap();
        let c = store
            .insert_tutorial(step("Basic Commands", 1, Some("docker run nginx")))
            .unwrap();
        assert_eq!((a.id, b.id, c.id), (1, 2, 3));

        let all: Vec<u32> = store.get_all_tutorials().unwrap().iter().map(|t| t.id).collect();
        assert_eq!(all, vec![3, 2, 1]);

        let intro: Vec<u32> = store
            .get_tutorials_by_section("Introduction")
            .unwrap()
            .iter()
            .map(|t| t.step_number)
            .collect();
        assert_eq!(intro, vec![1, 2]);

        assert_eq!(
            store.get_section_stats().unwrap(),
            vec![("Introduction".to_string(), 2), ("Basic Commands".to_string(), 1)]
        );
        assert_eq!(store.get_all_sections().unwrap()[0], "Introduction");

        assert_eq!(store.get_next_tutorial(1).unwrap().map(|t| t.id), Some(2));
        assert_eq!(store.get_next_tutorial(3).unwrap(), None);
        assert_eq!(store.get_previous_tutorial(3).unwrap().map(|t| t.id), Some(2));
        assert_eq!(store.get_previous_tutorial(1).unwrap(), None);
        assert_eq!(store.get_tutorial_by_id(3).unwrap().unwrap().section, "Basic Commands");
        assert!(store.get_tutorial_by_id(99).unwrap().is_none());
    }

    #[test]
    fn duplicate_and_invalid_tutorials_rejected() {
        let (_dir, store) = store();
        store.insert_tutorial(step("Practice", 1, None)).unwrap();
        assert!(matches!(
            store.insert_tutorial(step("Practice", 1, None)),
            Err(StoreError::DuplicateTutorial { step_number: 1, .. })
        ));
        assert!(matches!(
            store.insert_tutorial(step("Practice", 2, Some("ps"))),
            Err(StoreError::InvalidTutorial(_))
        ));
    }

    #[test]
    fn progress_upserts() {
        let (_dir, store) = store();
        store.insert_tutorial(step("Basics", 1, None)).unwrap();
        store.insert_tutorial(step("Basics", 2, None)).unwrap();

        let first = store.increment_tutorial_attempts(1).unwrap();
        assert_eq!(first.attempts, 1);
        assert!(!first.completed);
        assert!(first.timestamp.is_none());

        let done = store.mark_tutorial_complete(1).unwrap();
        assert_eq!(done.id, first.id);
        assert_eq!(done.attempts, 2);
        assert!(done.completed);
        assert!(done.timestamp.is_some());

        let fresh = store.mark_tutorial_complete(2).unwrap();
        assert_eq!(fresh.attempts, 1);

        assert_eq!(store.get_user_progress().unwrap().len(), 2);
        assert_eq!(store.get_progress_percentage().unwrap(), 100.0);
    }

    #[test]
    fn progress_percentage_is_partial() {
        let (_dir, store) = store();
        for n in 1..=4 {
            store.insert_tutorial(step("Basics", n, None)).unwrap();
        }
        store.mark_tutorial_complete(2).unwrap();
        store.increment_tutorial_attempts(3).unwrap();
        assert_eq!(store.get_progress_percentage().unwrap(), 25.0);
    }

    #[test]
    fn progress_for_unknown_tutorial_fails() {
        let (_dir, store) = store();
        assert!(matches!(
            store.mark_tutorial_complete(7),
            Err(StoreError::TutorialNotFound(7))
        ));
    }

    #[test]
    fn container_lifecycle() {
        let (_dir, store) = store();
        let web = store.create_container("web", "nginx:latest", Some("8080:80")).unwrap();
        assert_eq!(web.state, ContainerStatus::Created);
        assert!(matches!(
            store.create_container("web", "nginx:latest", None),
            Err(StoreError::DuplicateContainer(_))
        ));

        assert!(store.update_container_state("web", ContainerStatus::Running).unwrap());
        assert!(store.get_container_by_name("web").unwrap().unwrap().is_running());
        assert!(!store.update_container_state("ghost", ContainerStatus::Stopped).unwrap());

        store.create_container("cache", "redis:latest", None).unwrap();
        let names: Vec<String> = store
            .get_all_containers()
            .unwrap()
            .into_iter()
            .map(|c| c.container_name)
            .collect();
        assert_eq!(names, vec!["cache", "web"]);

        assert!(store.remove_container("web").unwrap());
        assert!(!store.remove_container("web").unwrap());
        assert!(store.get_container_by_name("web").unwrap().is_none());
    }

    #[test]
    fn reset_empties_tables_and_state_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = StoreManager::open(dir.path()).unwrap();
            store.create_container("web", "nginx", None).unwrap();
        }
        let store = StoreManager::open(dir.path()).unwrap();
        assert!(store.get_container_by_name("web").unwrap().is_some());

        store.reset().unwrap();
        assert!(store.get_all_containers().unwrap().is_empty());
    }

    #[test]
    fn corrupt_table_is_reported() {
        let (_dir, store) = store();
        fs::write(store.base_dir().join(CONTAINERS), "{not json").unwrap();
        assert!(matches!(store.get_all_containers(), Err(StoreError::Corrupt(_))));
    }
}
