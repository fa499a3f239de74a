use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::action::ActionScheme;
use crate::error::ConfigurationError;
use crate::reward::{CheckpointMap, RewardWeights};

/// What a death reload does to reward already earned inside the same frame-skip window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathAccounting {
    /// Events before the death stay banked; the death penalty is added on top.
    #[default]
    Keep,
    /// Events of the window up to the death are dropped, then the death penalty is
    /// re-added. The step reward reflects only the death and what followed the reload.
    Forfeit,
}

const DEFAULT_STATES: [&str; 4] = [
    "states/bottom_of_pit.state",
    "states/inside_pit.state",
    "states/past_first_door.state",
    "states/post_start_screen.state",
];

/// Per-worker episode settings, read-only once the controller is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeConfig {
    /// Emulator ticks per agent step.
    #[serde(alias = "action_frequency")]
    pub frame_skip: u32,
    /// Candidate start states; one is picked at random and kept for the controller's life.
    #[serde(alias = "states")]
    pub start_states: Vec<PathBuf>,
    pub max_steps: u64,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub action_scheme: ActionScheme,
    #[serde(default)]
    pub reward_weights: RewardWeights,
    #[serde(default)]
    pub death_accounting: DeathAccounting,
    #[serde(default)]
    pub checkpoints: CheckpointMap,
    /// JSON-lines file receiving one record per finished episode.
    #[serde(default)]
    pub reward_log: Option<PathBuf>,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self::basic()
    }
}

impl EpisodeConfig {
    /// Long training episodes from every known start state.
    pub fn basic() -> Self {
        Self {
            frame_skip: 5,
            start_states: DEFAULT_STATES.into_iter().map(PathBuf::from).collect(),
            max_steps: 16384,
            seed: None,
            action_scheme: ActionScheme::default(),
            reward_weights: RewardWeights::default(),
            death_accounting: DeathAccounting::default(),
            checkpoints: CheckpointMap::default(),
            reward_log: None,
        }
    }

    /// Short episodes for quick iteration.
    pub fn short() -> Self {
        Self {
            max_steps: 500,
            ..Self::basic()
        }
    }

    /// Single start state, used to watch a trained agent.
    pub fn replay() -> Self {
        Self {
            start_states: vec![PathBuf::from("states/past_first_door.state")],
            max_steps: 1000,
            ..Self::basic()
        }
    }

    pub fn builder() -> EpisodeConfigBuilder {
        EpisodeConfigBuilder::new(Self::basic())
    }

    /// Loads a config file (format taken from its extension), then applies `METROID_*`
    /// environment overrides such as `METROID_MAX_STEPS=200`. Nested keys use `__`, e.g.
    /// `METROID_REWARD_WEIGHTS__DEATH=2.0`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("METROID")
                    .prefix_separator("_")
                    .try_parsing(true)
                    .separator("__"),
            )
            .build()?;
        let configuration: EpisodeConfig = settings.try_deserialize()?;
        configuration.validate()?;
        Ok(configuration)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.frame_skip == 0 {
            return Err(ConfigurationError::ZeroFrameSkip);
        }
        if self.start_states.is_empty() {
            return Err(ConfigurationError::NoStartStates);
        }
        if self.max_steps == 0 {
            return Err(ConfigurationError::ZeroMaxSteps);
        }
        self.reward_weights.validate()
    }
}

pub struct EpisodeConfigBuilder {
    configuration: EpisodeConfig,
}

impl EpisodeConfigBuilder {
    pub fn new(configuration: EpisodeConfig) -> Self {
        Self { configuration }
    }

    pub fn frame_skip(mut self, frame_skip: u32) -> Self {
        self.configuration.frame_skip = frame_skip;
        self
    }

    pub fn start_states<I, P>(mut self, start_states: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.configuration.start_states = start_states.into_iter().map(Into::into).collect();
        self
    }

    pub fn max_steps(mut self, max_steps: u64) -> Self {
        self.configuration.max_steps = max_steps;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.configuration.seed = Some(seed);
        self
    }

    pub fn action_scheme(mut self, action_scheme: ActionScheme) -> Self {
        self.configuration.action_scheme = action_scheme;
        self
    }

    pub fn reward_weights(mut self, reward_weights: RewardWeights) -> Self {
        self.configuration.reward_weights = reward_weights;
        self
    }

    pub fn death_accounting(mut self, death_accounting: DeathAccounting) -> Self {
        self.configuration.death_accounting = death_accounting;
        self
    }

    pub fn checkpoints(mut self, checkpoints: CheckpointMap) -> Self {
        self.configuration.checkpoints = checkpoints;
        self
    }

    pub fn reward_log(mut self, reward_log: impl Into<PathBuf>) -> Self {
        self.configuration.reward_log = Some(reward_log.into());
        self
    }

    pub fn build(self) -> Result<EpisodeConfig, ConfigurationError> {
        self.configuration.validate()?;
        Ok(self.configuration)
    }
}
