use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::state::{EpisodeState, Phase};
use super::step::{
    OBSERVATION_SHAPE, Observation, ObservationShape, ResetInfo, StepInfo, StepResult,
};
use crate::action::ActionEncoder;
use crate::config::{DeathAccounting, EpisodeConfig};
use crate::emulator::Emulator;
use crate::error::{EnvError, LifecycleError, ResourceError};
use crate::memory::MemorySnapshot;
use crate::reward::events::DEATH_MAGNITUDE;
use crate::reward::{
    EpisodeRecord, EventDetector, JsonLinesJournal, RewardAggregator, RewardBreakdown,
    RewardCategory, RewardJournal,
};

/// Episodic step/reset loop around one exclusively owned emulator.
///
/// Each `step` holds the chosen input for `frame_skip` ticks, samples memory after every
/// tick, reloads the start state in place when Samus dies, and reports the change of the
/// weighted reward total. Episodes end only on the step limit.
pub struct EpisodeController<E: Emulator> {
    id: Uuid,
    config: EpisodeConfig,
    emulator: E,
    encoder: ActionEncoder,
    detector: EventDetector,
    aggregator: RewardAggregator,
    journal: Option<Box<dyn RewardJournal>>,
    state: EpisodeState,
}

impl<E: Emulator> EpisodeController<E> {
    pub fn new(config: EpisodeConfig, emulator: E) -> Result<Self, EnvError> {
        config.validate()?;
        let journal: Option<Box<dyn RewardJournal>> = match &config.reward_log {
            Some(path) => Some(Box::new(
                JsonLinesJournal::open(path).map_err(ResourceError::from)?,
            )),
            None => None,
        };
        let detector = EventDetector::new(config.checkpoints.clone());
        let state = EpisodeState::new(detector.checkpoints().origin());
        let id = Uuid::new_v4();
        debug!("Episode controller {} built with {:?}", id, config.action_scheme);

        Ok(Self {
            id,
            encoder: ActionEncoder::new(config.action_scheme),
            aggregator: RewardAggregator::new(config.reward_weights),
            detector,
            journal,
            state,
            emulator,
            config,
        })
    }

    /// Replaces the reward journal, e.g. with an in-memory one.
    pub fn with_journal(mut self, journal: Box<dyn RewardJournal>) -> Self {
        self.journal = Some(journal);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &EpisodeConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn state(&self) -> &EpisodeState {
        &self.state
    }

    pub fn emulator(&self) -> &E {
        &self.emulator
    }

    pub fn action_space_size(&self) -> usize {
        self.encoder.action_count()
    }

    pub fn observation_shape(&self) -> ObservationShape {
        OBSERVATION_SHAPE
    }

    pub fn cumulative_reward(&self) -> f64 {
        self.aggregator.cumulative()
    }

    pub fn reset(&mut self, seed: Option<u64>) -> Result<(Observation, ResetInfo), EnvError> {
        if self.state.phase == Phase::Closed {
            return Err(LifecycleError::Closed.into());
        }
        let start_state = match &self.state.start_state {
            Some(start_state) => {
                if seed.is_some() {
                    debug!("Start state already fixed, ignoring reset seed");
                }
                start_state.clone()
            }
            None => {
                let chosen = self.choose_start_state(seed.or(self.config.seed));
                info!("Controller {} fixed start state '{}'", self.id, chosen.display());
                self.state.start_state = Some(chosen.clone());
                chosen
            }
        };

        // Anything loaded before a failed reload cannot be trusted
        self.state.phase = Phase::Ready;
        self.emulator.load_state(&start_state)?;
        let snapshot = MemorySnapshot::sample(&self.emulator);
        self.state.begin_episode(snapshot);
        self.aggregator.reset();

        let observation = self.render()?;
        Ok((
            observation,
            ResetInfo {
                start_state,
                generation: self.state.generation,
            },
        ))
    }

    pub fn step(&mut self, action: usize) -> Result<StepResult, EnvError> {
        self.ensure_running()?;
        let gesture = self.encoder.encode(action)?;
        self.state.step_counter += 1;
        self.state.enemy_kills = 0;

        let mut window = RewardBreakdown::default();
        gesture.begin(&mut self.emulator);
        for tick in 0..self.config.frame_skip {
            self.emulator.tick()?;
            gesture.after_tick(tick, &mut self.emulator);

            let current = MemorySnapshot::sample(&self.emulator);
            let events = self.detector.detect(
                &self.state.previous_tick,
                &current,
                self.state.last_checkpoint,
            );
            events.accumulate_tick(&mut window);
            if events.enemy_killed {
                self.state.enemy_kills += 1;
            }
            self.state.previous_tick = current;

            if events.died {
                self.recover_from_death(&mut window)?;
            }
        }
        gesture.finish(&mut self.emulator);
        self.settle(&mut window);

        let reward = self.aggregator.commit(&window);
        let done = self.state.step_counter >= self.config.max_steps;
        if done {
            self.finish_episode()?;
        }

        Ok(StepResult {
            observation: self.render()?,
            reward,
            done,
            truncated: done,
            info: StepInfo {
                step: self.state.step_counter,
                deaths: self.state.death_counter,
                enemy_kills: self.state.enemy_kills,
                cumulative_reward: self.aggregator.cumulative(),
                reward_breakdown: window.weighted(self.aggregator.weights()),
            },
        })
    }

    /// Stops the emulator. Calling it again does nothing.
    pub fn close(&mut self) -> Result<(), EnvError> {
        if self.state.phase == Phase::Closed {
            return Ok(());
        }
        self.state.phase = Phase::Closed;
        self.emulator.stop();
        if let Some(journal) = self.journal.as_mut() {
            journal.flush().map_err(ResourceError::from)?;
        }
        debug!("Episode controller {} closed", self.id);
        Ok(())
    }

    pub fn render(&self) -> Result<Observation, EnvError> {
        let frame = self.emulator.render_frame();
        let actual = frame.len();
        Observation::from_raw(
            OBSERVATION_SHAPE.width as u32,
            OBSERVATION_SHAPE.height as u32,
            frame,
        )
        .ok_or_else(|| {
            ResourceError::FrameShape {
                expected: OBSERVATION_SHAPE.len(),
                actual,
            }
            .into()
        })
    }

    fn ensure_running(&self) -> Result<(), EnvError> {
        match self.state.phase {
            Phase::Running => Ok(()),
            Phase::Ready => Err(LifecycleError::NotStarted.into()),
            Phase::Done => Err(LifecycleError::EpisodeFinished {
                steps: self.state.step_counter,
            }
            .into()),
            Phase::Closed => Err(LifecycleError::Closed.into()),
        }
    }

    fn choose_start_state(&self, seed: Option<u64>) -> PathBuf {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let index = rng.random_range(0..self.config.start_states.len());
        self.config.start_states[index].clone()
    }

    fn fixed_start_state(&self) -> Result<PathBuf, EnvError> {
        self.state
            .start_state
            .clone()
            .ok_or_else(|| LifecycleError::NotStarted.into())
    }

    /// Folds pickups, upgrades, objective progress and checkpoints since the baseline into
    /// `window`, then moves the baseline up to the latest tick.
    fn settle(&mut self, window: &mut RewardBreakdown) {
        let events = self.detector.detect(
            &self.state.baseline,
            &self.state.previous_tick,
            self.state.last_checkpoint,
        );
        events.accumulate_settled(window);
        if let Some(checkpoint) = events.checkpoint_reached {
            info!(
                "Controller {} reached checkpoint ({:#04x}, {:#04x})",
                self.id, checkpoint.x, checkpoint.y
            );
            self.state.last_checkpoint = Some(checkpoint);
        }
        self.state.baseline = self.state.previous_tick;
    }

    fn recover_from_death(&mut self, window: &mut RewardBreakdown) -> Result<(), EnvError> {
        match self.config.death_accounting {
            DeathAccounting::Keep => self.settle(window),
            DeathAccounting::Forfeit => {
                // Deaths and kills already counted in this window stay, like their counters
                for category in RewardCategory::ALL {
                    if !matches!(category, RewardCategory::Death | RewardCategory::EnemyKill) {
                        window.clear(category);
                    }
                }
            }
        }
        window.add(RewardCategory::Death, DEATH_MAGNITUDE);
        self.state.death_counter += 1;

        let start_state = self.fixed_start_state()?;
        self.emulator.load_state(&start_state)?;
        self.state.rebaseline(MemorySnapshot::sample(&self.emulator));
        debug!(
            "Controller {} died at step {} (death {}), reloaded '{}'",
            self.id,
            self.state.step_counter,
            self.state.death_counter,
            start_state.display()
        );
        Ok(())
    }

    fn finish_episode(&mut self) -> Result<(), EnvError> {
        self.state.phase = Phase::Done;
        info!(
            "Controller {} finished episode {} after {} steps: total reward {:.3}, {} deaths",
            self.id,
            self.state.generation,
            self.state.step_counter,
            self.aggregator.cumulative(),
            self.state.death_counter
        );

        let record = EpisodeRecord::new(
            self.id,
            self.state.generation,
            self.fixed_start_state()?,
            self.state.step_counter,
            self.state.death_counter,
            &self.aggregator,
        );
        if let Some(journal) = self.journal.as_mut() {
            journal
                .write_record(&record)
                .map_err(ResourceError::from)?;
        }
        Ok(())
    }
}

impl<E: Emulator> Drop for EpisodeController<E> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("Failed to close episode controller {}: {}", self.id, e);
        }
    }
}
