use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::EpisodeConfig;
use crate::emulator::Emulator;
use crate::episode::EpisodeController;
use crate::error::{ConfigurationError, EnvError};
use crate::reward::RewardJournal;

/// Totals over every episode a rollout played. `episodes` counts finished episodes only;
/// steps, deaths and reward also include an episode cut short by `stop`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RolloutSummary {
    pub episodes: u64,
    pub steps: u64,
    pub deaths: u32,
    pub total_reward: f64,
}

/// Plays uniformly random actions on a blocking worker until the requested number of
/// episodes finished or the rollout is stopped.
pub struct Rollout {
    task: Option<JoinHandle<Result<RolloutSummary, EnvError>>>,
    cancel_token: CancellationToken,
}

impl Rollout {
    fn new<E>(
        controller: EpisodeController<E>,
        episodes: u64,
        seed: Option<u64>,
    ) -> Self
    where
        E: Emulator + 'static,
    {
        let cancel_token = CancellationToken::new();
        let worker_token = cancel_token.clone();
        let task = tokio::task::spawn_blocking(move || {
            Self::run(controller, episodes, seed, worker_token)
        });

        Self {
            task: Some(task),
            cancel_token,
        }
    }

    fn run<E: Emulator>(
        mut controller: EpisodeController<E>,
        episodes: u64,
        seed: Option<u64>,
        cancel_token: CancellationToken,
    ) -> Result<RolloutSummary, EnvError> {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut summary = RolloutSummary::default();

        'episodes: while summary.episodes < episodes {
            let (_, reset_info) = controller.reset(seed)?;
            debug!(
                "Episode {} starting from '{}'",
                reset_info.generation,
                reset_info.start_state.display()
            );
            loop {
                if cancel_token.is_cancelled() {
                    info!("Rollout cancelled during episode {}", reset_info.generation);
                    summary.deaths += controller.state().death_counter;
                    summary.total_reward += controller.cumulative_reward();
                    break 'episodes;
                }
                let action = rng.random_range(0..controller.action_space_size());
                let result = controller.step(action)?;
                summary.steps += 1;
                if result.done {
                    summary.deaths += result.info.deaths;
                    summary.total_reward += result.info.cumulative_reward;
                    summary.episodes += 1;
                    break;
                }
            }
        }

        controller.close()?;
        Ok(summary)
    }

    pub fn stop(&self) {
        self.cancel_token.cancel();
    }

    /// Token that stops the worker when cancelled, e.g. from a signal handler task.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Waits for the worker. A stopped rollout still reports what it played.
    pub async fn join(mut self) -> Result<RolloutSummary, EnvError> {
        match self.task.take() {
            Some(task) => task.await?,
            None => Ok(RolloutSummary::default()),
        }
    }
}

impl Drop for Rollout {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Parses an episode count given on the command line.
pub fn parse_episode_count(value: &str) -> Result<u64, ConfigurationError> {
    match value.trim().parse::<u64>() {
        Ok(episodes) if episodes > 0 => Ok(episodes),
        _ => Err(ConfigurationError::InvalidEpisodeCount {
            value: value.to_string(),
        }),
    }
}

pub struct RolloutBuilder {
    configuration: EpisodeConfig,
    episodes: u64,
    seed: Option<u64>,
    journal: Option<Box<dyn RewardJournal>>,
}

impl RolloutBuilder {
    pub fn new(configuration: EpisodeConfig) -> Self {
        Self {
            seed: configuration.seed,
            configuration,
            episodes: 1,
            journal: None,
        }
    }

    // Number of full episodes to play before the worker stops on its own.
    pub fn episodes(mut self, episodes: u64) -> Self {
        self.episodes = episodes;
        self
    }

    // Seeds both the start state choice and the action sampler, overriding the configuration.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn journal(mut self, journal: Box<dyn RewardJournal>) -> Self {
        self.journal = Some(journal);
        self
    }

    /// Spawns the worker; must be called from within a tokio runtime.
    pub fn start<E>(self, emulator: E) -> Result<Rollout, EnvError>
    where
        E: Emulator + 'static,
    {
        let mut controller = EpisodeController::new(self.configuration, emulator)?;
        if let Some(journal) = self.journal {
            controller = controller.with_journal(journal);
        }
        info!(
            "Starting rollout of {} episode(s) on controller {}",
            self.episodes,
            controller.id()
        );
        Ok(Rollout::new(controller, self.episodes, self.seed))
    }
}
