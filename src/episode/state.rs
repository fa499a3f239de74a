use std::path::PathBuf;

use crate::memory::{MemorySnapshot, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Built, waiting for the first reset.
    Ready,
    Running,
    /// Step limit reached; only `reset` or `close` are accepted.
    Done,
    Closed,
}

/// Mutable bookkeeping owned by one controller.
#[derive(Debug, Clone)]
pub struct EpisodeState {
    pub phase: Phase,
    /// Snapshot after the most recent tick; per-tick events are measured against it.
    pub previous_tick: MemorySnapshot,
    /// Snapshot the current window's pickups and progress are settled against.
    pub baseline: MemorySnapshot,
    pub step_counter: u64,
    pub death_counter: u32,
    /// Enemy kills within the current step.
    pub enemy_kills: u32,
    pub last_checkpoint: Option<Position>,
    /// Chosen on the first reset, then fixed.
    pub start_state: Option<PathBuf>,
    /// Number of resets so far; zero means freshly built.
    pub generation: u64,
}

impl EpisodeState {
    pub fn new(checkpoint_origin: Option<Position>) -> Self {
        Self {
            phase: Phase::Ready,
            previous_tick: MemorySnapshot::default(),
            baseline: MemorySnapshot::default(),
            step_counter: 0,
            death_counter: 0,
            enemy_kills: 0,
            last_checkpoint: checkpoint_origin,
            start_state: None,
            generation: 0,
        }
    }

    pub fn rebaseline(&mut self, snapshot: MemorySnapshot) {
        self.previous_tick = snapshot;
        self.baseline = snapshot;
    }

    /// Zeroes per-episode counters. The checkpoint pointer survives, it marks permanent
    /// progress from the fixed start state.
    pub fn begin_episode(&mut self, snapshot: MemorySnapshot) {
        self.rebaseline(snapshot);
        self.step_counter = 0;
        self.death_counter = 0;
        self.enemy_kills = 0;
        self.generation += 1;
        self.phase = Phase::Running;
    }
}
