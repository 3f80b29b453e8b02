use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scene shown next to a tutorial step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VisualState {
    #[default]
    Neutral,
    Running,
    Stopped,
    Creating,
    Removing,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TutorialStep {
    pub id: u32,
    pub section: String,
    pub step_number: u32,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub expected_command: Option<String>,
    #[serde(default)]
    pub visual_state: VisualState,
    #[serde(default)]
    pub help_text: Option<String>,
    #[serde(default)]
    pub docker_concept: Option<String>,
    #[serde(default)]
    pub metaphor_explanation: Option<String>,
}

impl TutorialStep {
    /// Content problems, empty when the step is fit to publish.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.step_number < 1 {
            errors.push("Step number must be positive".to_string());
        }
        if self.section.trim().is_empty() {
            errors.push("Section cannot be empty".to_string());
        }
        if self.title.trim().chars().count() < 3 {
            errors.push("Title must be at least 3 characters".to_string());
        }
        if self.description.chars().count() < 10 {
            errors.push("Description must be at least 10 characters".to_string());
        }
        if let Some(cmd) = &self.expected_command {
            if !cmd.starts_with("docker") {
                errors.push("Expected command should start with 'docker'".to_string());
            }
        }

        errors
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UserProgress {
    pub id: u32,
    pub tutorial_id: u32,
    pub completed: bool,
    pub timestamp: Option<DateTime<Utc>>, // Set when completed
    pub attempts: u32,
}

/// Lifecycle state of a simulated container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerStatus {
    Created,
    Running,
    Stopped,
    Removing,
}

impl ContainerStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ContainerStatus::Created => "created",
            ContainerStatus::Running => "running",
            ContainerStatus::Stopped => "stopped",
            ContainerStatus::Removing => "removing",
        }
    }
}

impl fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContainerStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(ContainerStatus::Created),
            "running" => Ok(ContainerStatus::Running),
            "stopped" => Ok(ContainerStatus::Stopped),
            "removing" => Ok(ContainerStatus::Removing),
            other => Err(format!(
                "unknown state '{}' (expected created, running, stopped or removing)",
                other
            )),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ContainerState {
    pub id: u32,
    pub container_name: String,
    pub state: ContainerStatus,
    pub image: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub port_mapping: Option<String>, // e.g. "8080:80"
}

impl ContainerState {
    pub fn is_running(&self) -> bool {
        self.state == ContainerStatus::Running
    }

    pub fn is_stopped(&self) -> bool {
        self.state == ContainerStatus::Stopped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step() -> TutorialStep {
        TutorialStep {
            id: 1,
            section: "Basic Commands".to_string(),
            step_number: 1,
            title: "Your First Command".to_string(),
            description: "Launch a ship from a blueprint.".to_string(),
            expected_command: Some("docker run nginx".to_string()),
            visual_state: VisualState::Creating,
            help_text: None,
            docker_concept: None,
            metaphor_explanation: None,
        }
    }

    #[test]
    fn valid_step_has_no_errors() {
        assert!(step().validate().is_empty());
    }

    #[test]
    fn step_validation_reports_each_problem() {
        let mut bad = step();
        bad.step_number = 0;
        bad.section = "  ".to_string();
        bad.title = "Hi".to_string();
        bad.description = "short".to_string();
        bad.expected_command = Some("run nginx".to_string());
        assert_eq!(bad.validate().len(), 5);
    }

    #[test]
    fn status_parses_and_serialises_lowercase() {
        assert_eq!("running".parse::<ContainerStatus>(), Ok(ContainerStatus::Running));
        assert!("sailing".parse::<ContainerStatus>().is_err());
        assert_eq!(
            serde_json::to_string(&ContainerStatus::Stopped).unwrap(),
            "\"stopped\""
        );
        assert_eq!(
            serde_json::from_str::<VisualState>("\"removing\"").unwrap(),
            VisualState::Removing
        );
    }
}
