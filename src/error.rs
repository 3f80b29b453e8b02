use thiserror::Error;

/// Failures of the tutorial/progress/container store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("tutorial {0} does not exist")]
    TutorialNotFound(u32),

    #[error("tutorial '{section}' step {step_number} already exists")]
    DuplicateTutorial { section: String, step_number: u32 },

    #[error("invalid tutorial: {}", .0.join("; "))]
    InvalidTutorial(Vec<String>),

    #[error("container '{0}' already exists")]
    DuplicateContainer(String),

    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt table file: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("invalid seed data: {0}")]
    Seed(#[from] toml::de::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
