use std::path::PathBuf;

use image::RgbImage;

use crate::emulator::{SCREEN_CHANNELS, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::reward::RewardBreakdown;

pub type Observation = RgbImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObservationShape {
    pub height: usize,
    pub width: usize,
    pub channels: usize,
}

impl ObservationShape {
    pub fn len(&self) -> usize {
        self.height * self.width * self.channels
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub const OBSERVATION_SHAPE: ObservationShape = ObservationShape {
    height: SCREEN_HEIGHT,
    width: SCREEN_WIDTH,
    channels: SCREEN_CHANNELS,
};

#[derive(Debug, Clone, PartialEq)]
pub struct ResetInfo {
    pub start_state: PathBuf,
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    pub step: u64,
    pub deaths: u32,
    pub enemy_kills: u32,
    pub cumulative_reward: f64,
    /// Weighted contribution of each category to this step's reward.
    pub reward_breakdown: RewardBreakdown,
}

pub struct StepResult {
    pub observation: Observation,
    pub reward: f64,
    pub done: bool,
    /// Set together with `done`; episodes only end on the step limit.
    pub truncated: bool,
    pub info: StepInfo,
}
