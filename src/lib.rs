pub mod action;
pub mod config;
pub mod emulator;
pub mod episode;
pub mod error;
pub mod memory;
pub mod reward;
pub mod rollout;

pub use config::{DeathAccounting, EpisodeConfig};
pub use emulator::{Button, Emulator, RamEmulator};
pub use episode::{EpisodeController, Observation, StepResult};
pub use error::{EnvError, ResourceError};
pub use reward::{RewardCategory, RewardWeights};
pub use rollout::{Rollout, RolloutBuilder, RolloutSummary};
