use std::path::PathBuf;

use thiserror::Error;

use crate::reward::RewardCategory;

// Main Environment Error Type

#[derive(Error, Debug)]
pub enum EnvError {
    #[error("Configuration Error: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("Invalid action {index}, expected an index below {action_count}")]
    InvalidAction { index: usize, action_count: usize },
    #[error("Resource Error: {0}")]
    Resource(#[from] ResourceError),
    #[error("Lifecycle Error: {0}")]
    Lifecycle(#[from] LifecycleError),
    #[error("Rollout worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl From<EmulatorError> for EnvError {
    fn from(error: EmulatorError) -> Self {
        EnvError::Resource(ResourceError::Emulator(error))
    }
}

// Configuration Error Type
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("frame_skip must be at least 1")]
    ZeroFrameSkip,
    #[error("max_steps must be greater than 0")]
    ZeroMaxSteps,
    #[error("At least one start state is required")]
    NoStartStates,
    #[error("Reward weight for {category} must be a non-negative number, got {value}")]
    InvalidWeight { category: RewardCategory, value: f64 },
    #[error("Episode count must be a positive integer, got '{value}'")]
    InvalidEpisodeCount { value: String },
    #[error("Failed to load configuration: {0}")]
    Source(#[from] config::ConfigError),
}

#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("Emulator failure: {0}")]
    Emulator(#[from] EmulatorError),
    #[error("Frame buffer has {actual} bytes, expected {expected}")]
    FrameShape { expected: usize, actual: usize },
    #[error("Failed to write reward journal: {0}")]
    Journal(#[from] JournalError),
}

#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error("step called before reset")]
    NotStarted,
    #[error("episode finished after {steps} steps, call reset to start another")]
    EpisodeFinished { steps: u64 },
    #[error("the environment is closed")]
    Closed,
}

#[derive(Error, Debug)]
pub enum EmulatorError {
    #[error("Failed to read state '{path}': {source}")]
    StateUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("State '{path}' is malformed: {reason}")]
    StateMalformed { path: PathBuf, reason: String },
    #[error("Emulator has been stopped")]
    Stopped,
}

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("I/O failure on '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
}
