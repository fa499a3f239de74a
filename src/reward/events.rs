use crate::emulator::memory_map::ENEMY_DESTROYED_SFX;
use crate::memory::{MemorySnapshot, Position};

use super::breakdown::{RewardBreakdown, RewardCategory};
use super::checkpoint::CheckpointMap;

/// Penalty magnitude per point of health lost.
pub const DAMAGE_MAGNITUDE_SCALE: f64 = 0.1;
pub const DEATH_MAGNITUDE: f64 = -1.0;

/// Game events derived from two consecutive snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Events {
    pub damage_taken: u16,
    pub health_restored: u16,
    pub missiles_gained: u16,
    pub armor_upgraded: bool,
    pub beam_upgraded: bool,
    /// Metroids removed since the previous snapshot.
    pub objective_progress: u16,
    pub enemy_killed: bool,
    pub checkpoint_reached: Option<Position>,
    pub died: bool,
}

impl Events {
    pub fn damaged(&self) -> bool {
        self.damage_taken > 0
    }

    pub fn healed(&self) -> bool {
        self.health_restored > 0
    }

    pub fn ammo_gained(&self) -> bool {
        self.missiles_gained > 0
    }

    /// Adds the events that count on every tick of the window: damage and kills.
    pub fn accumulate_tick(&self, window: &mut RewardBreakdown) {
        window.add(
            RewardCategory::Damage,
            -(f64::from(self.damage_taken) * DAMAGE_MAGNITUDE_SCALE),
        );
        if self.enemy_killed {
            window.add(RewardCategory::EnemyKill, 1.0);
        }
    }

    /// Adds the events judged from the last snapshot of the window against the step
    /// baseline: pickups, upgrades, objective progress and checkpoints.
    pub fn accumulate_settled(&self, window: &mut RewardBreakdown) {
        window.add(RewardCategory::HealthPickup, f64::from(self.health_restored));
        window.add(RewardCategory::MissilePickup, f64::from(self.missiles_gained));
        if self.armor_upgraded {
            window.add(RewardCategory::ArmorUpgrade, 1.0);
        }
        if self.beam_upgraded {
            window.add(RewardCategory::BeamUpgrade, 1.0);
        }
        window.add(
            RewardCategory::MetroidsRemaining,
            f64::from(self.objective_progress),
        );
        if self.checkpoint_reached.is_some() {
            window.add(RewardCategory::Checkpoint, 1.0);
        }
    }
}

pub struct EventDetector {
    checkpoints: CheckpointMap,
    enemy_destroyed_sfx: u8,
}

impl EventDetector {
    pub fn new(checkpoints: CheckpointMap) -> Self {
        Self {
            checkpoints,
            enemy_destroyed_sfx: ENEMY_DESTROYED_SFX,
        }
    }

    pub fn checkpoints(&self) -> &CheckpointMap {
        &self.checkpoints
    }

    pub fn detect(
        &self,
        previous: &MemorySnapshot,
        current: &MemorySnapshot,
        last_checkpoint: Option<Position>,
    ) -> Events {
        let next_checkpoint =
            last_checkpoint.and_then(|checkpoint| self.checkpoints.next_after(&checkpoint));

        Events {
            damage_taken: previous.health.saturating_sub(current.health),
            health_restored: current.health.saturating_sub(previous.health),
            // Spending missiles is never punished
            missiles_gained: current.missiles.saturating_sub(previous.missiles),
            armor_upgraded: current.armor_upgrade != previous.armor_upgrade,
            beam_upgraded: current.beam_upgrade != previous.beam_upgrade,
            objective_progress: previous
                .metroids_remaining
                .saturating_sub(current.metroids_remaining),
            enemy_killed: current.sound_effect == self.enemy_destroyed_sfx
                && current.sound_effect != previous.sound_effect,
            checkpoint_reached: next_checkpoint.filter(|next| *next == current.position),
            died: current.is_dead(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> MemorySnapshot {
        MemorySnapshot {
            health: 99,
            missiles: 30,
            armor_upgrade: 0,
            beam_upgrade: 0,
            metroids_remaining: 39,
            sound_effect: 0,
            position: Position::new(0x50, 0x70),
        }
    }

    fn detector() -> EventDetector {
        EventDetector::new(CheckpointMap::default())
    }

    #[test]
    fn test_identical_snapshots_produce_no_events() {
        let events = detector().detect(&snapshot(), &snapshot(), None);
        assert_eq!(events, Events::default());
    }

    #[test]
    fn test_health_changes() {
        let previous = snapshot();
        let hurt = MemorySnapshot {
            health: 91,
            ..previous
        };

        let events = detector().detect(&previous, &hurt, None);
        assert!(events.damaged());
        assert!(!events.healed());
        assert_eq!(events.damage_taken, 8);

        let events = detector().detect(&hurt, &previous, None);
        assert!(events.healed());
        assert_eq!(events.health_restored, 8);
    }

    #[test]
    fn test_spending_missiles_is_not_an_event() {
        let previous = snapshot();
        let fired = MemorySnapshot {
            missiles: 25,
            ..previous
        };
        let events = detector().detect(&previous, &fired, None);
        assert!(!events.ammo_gained());

        let events = detector().detect(&fired, &previous, None);
        assert_eq!(events.missiles_gained, 5);
    }

    #[test]
    fn test_lateral_beam_change_counts_as_upgrade() {
        let previous = MemorySnapshot {
            beam_upgrade: 3,
            ..snapshot()
        };
        let switched = MemorySnapshot {
            beam_upgrade: 1,
            ..previous
        };
        let events = detector().detect(&previous, &switched, None);
        assert!(events.beam_upgraded);
        assert!(!events.armor_upgraded);
    }

    #[test]
    fn test_objective_progress_only_counts_decreases() {
        let previous = snapshot();
        let killed = MemorySnapshot {
            metroids_remaining: 38,
            ..previous
        };
        assert_eq!(detector().detect(&previous, &killed, None).objective_progress, 1);
        assert_eq!(detector().detect(&killed, &previous, None).objective_progress, 0);
    }

    #[test]
    fn test_enemy_kill_is_rising_edge() {
        let quiet = snapshot();
        let boom = MemorySnapshot {
            sound_effect: ENEMY_DESTROYED_SFX,
            ..quiet
        };

        assert!(detector().detect(&quiet, &boom, None).enemy_killed);
        // The same sound held over the next tick is not a second kill
        assert!(!detector().detect(&boom, &boom, None).enemy_killed);
    }

    #[test]
    fn test_checkpoint_requires_exact_next_coordinate() {
        let map = CheckpointMap::default();
        let origin = map.origin();
        let previous = snapshot();
        let at_next = MemorySnapshot {
            position: Position::new(0x88, 0x60),
            ..previous
        };
        let near_next = MemorySnapshot {
            position: Position::new(0x88, 0x61),
            ..previous
        };

        assert_eq!(
            detector().detect(&previous, &at_next, origin).checkpoint_reached,
            Some(Position::new(0x88, 0x60))
        );
        assert_eq!(
            detector().detect(&previous, &near_next, origin).checkpoint_reached,
            None
        );
        // Skipping ahead in the chain does not count
        let skipped = MemorySnapshot {
            position: Position::new(0x30, 0x40),
            ..previous
        };
        assert_eq!(
            detector().detect(&previous, &skipped, origin).checkpoint_reached,
            None
        );
    }

    #[test]
    fn test_zero_health_is_death() {
        let dead = MemorySnapshot {
            health: 0,
            ..snapshot()
        };
        assert!(detector().detect(&snapshot(), &dead, None).died);
    }

    #[test]
    fn test_tick_accumulation_scales_damage() {
        let events = Events {
            damage_taken: 2,
            enemy_killed: true,
            health_restored: 50,
            ..Events::default()
        };
        let mut window = RewardBreakdown::default();
        events.accumulate_tick(&mut window);

        assert!((window.get(RewardCategory::Damage) + 0.2).abs() < 1e-9);
        assert_eq!(window.get(RewardCategory::EnemyKill), 1.0);
        // Pickups wait for the window to settle
        assert_eq!(window.get(RewardCategory::HealthPickup), 0.0);
    }
}
