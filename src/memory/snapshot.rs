use serde::{Deserialize, Serialize};

use crate::emulator::Emulator;
use crate::emulator::memory_map::{self as ram, bcd};

/// Screen-relative coordinate of Samus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: u8,
    pub y: u8,
}

impl Position {
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }
}

/// Named game values read from emulator memory at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MemorySnapshot {
    /// `energy_tanks * 100 + energy`
    pub health: u16,
    pub missiles: u16,
    pub armor_upgrade: u8,
    pub beam_upgrade: u8,
    pub metroids_remaining: u16,
    pub sound_effect: u8,
    pub position: Position,
}

impl MemorySnapshot {
    /// Reads the snapshot without touching emulator state.
    pub fn sample(emulator: &dyn Emulator) -> Self {
        let energy = bcd(emulator.read_byte(ram::CURRENT_HP));
        let tanks = u16::from(emulator.read_byte(ram::CURRENT_ENERGY_TANKS));
        let [missiles_low, missiles_high] = ram::CURRENT_MISSILES;
        let missiles =
            bcd(emulator.read_byte(missiles_high)) * 100 + bcd(emulator.read_byte(missiles_low));

        Self {
            health: tanks * 100 + energy,
            missiles,
            armor_upgrade: emulator.read_byte(ram::CURRENT_ARMOR_UPGRADE),
            beam_upgrade: emulator.read_byte(ram::CURRENT_BEAM_UPGRADE),
            metroids_remaining: bcd(emulator.read_byte(ram::GLOBAL_METROIDS_REMAINING)),
            sound_effect: emulator.read_byte(ram::CURRENT_SOUND_EFFECT),
            position: Position::new(
                emulator.read_byte(ram::SAMUS_SCREEN_X),
                emulator.read_byte(ram::SAMUS_SCREEN_Y),
            ),
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }
}
