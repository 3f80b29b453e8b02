use crate::error::{StoreError, StoreResult};
use crate::storage::{ContainerStatus, TutorialStep, VisualState};
use crate::store_manager::StoreManager;
use serde::Deserialize;
use tracing::{info, warn};

const SEED_TOML: &str = include_str!("../assets/seed.toml");

#[derive(Debug, Deserialize)]
pub struct SeedData {
    pub tutorials: Vec<TutorialSeed>,
    #[serde(default)]
    pub containers: Vec<ContainerSeed>,
}

#[derive(Debug, Deserialize)]
pub struct TutorialSeed {
    pub section: String,
    pub step_number: u32,
    pub title: String,
    pub description: String,
    pub expected_command: Option<String>,
    #[serde(default)]
    pub visual_state: VisualState,
    pub help_text: Option<String>,
    pub docker_concept: Option<String>,
    pub metaphor_explanation: Option<String>,
}

impl From<TutorialSeed> for TutorialStep {
    fn from(seed: TutorialSeed) -> Self {
        TutorialStep {
            id: 0,
            section: seed.section,
            step_number: seed.step_number,
            title: seed.title,
            description: seed.description,
            expected_command: seed.expected_command,
            visual_state: seed.visual_state,
            help_text: seed.help_text,
            docker_concept: seed.docker_concept,
            metaphor_explanation: seed.metaphor_explanation,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ContainerSeed {
    pub container_name: String,
    pub state: ContainerStatus,
    pub image: String,
    pub port_mapping: Option<String>,
}

/// Counts from one seeding pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub tutorials_added: usize,
    pub tutorials_skipped: usize,
    pub containers_added: usize,
    pub containers_skipped: usize,
}

/// The bundled starter content.
pub fn bundled() -> StoreResult<SeedData> {
    parse(SEED_TOML)
}

pub fn parse(source: &str) -> StoreResult<SeedData> {
    Ok(toml::from_str(source)?)
}

/// Insert seed rows, skipping any that already exist. Safe to run repeatedly.
pub fn seed_store(store: &StoreManager, data: SeedData) -> StoreResult<SeedReport> {
    let mut report = SeedReport::default();

    for tutorial in data.tutorials {
        let label = format!("{} / step {}", tutorial.section, tutorial.step_number);
        match store.insert_tutorial(tutorial.into()) {
            Ok(_) => report.tutorials_added += 1,
            Err(StoreError::DuplicateTutorial { .. }) => {
                warn!(tutorial = %label, "skipped existing tutorial");
                report.tutorials_skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    for container in data.containers {
        match store.create_container(
            &container.container_name,
            &container.image,
            container.port_mapping.as_deref(),
        ) {
            Ok(_) => {
                if container.state != ContainerStatus::Created {
                    store.update_container_state(&container.container_name, container.state)?;
                }
                report.containers_added += 1;
            }
            Err(StoreError::DuplicateContainer(name)) => {
                warn!(%name, "skipped existing container");
                report.containers_skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    info!(?report, "seeding finished");
    Ok(report)
}
