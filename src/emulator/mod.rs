pub mod memory_map;
pub mod ram_emulator;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EmulatorError;

pub use ram_emulator::RamEmulator;

pub const SCREEN_WIDTH: usize = 160;
pub const SCREEN_HEIGHT: usize = 144;
pub const SCREEN_CHANNELS: usize = 3;

/// Game Boy joypad inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    A,
    B,
    Select,
    Start,
}

/// The narrow surface of an emulator the episode controller drives.
///
/// One implementation instance belongs to exactly one controller; nothing here is
/// expected to be shared between threads, only moved onto one.
pub trait Emulator: Send {
    /// Advance emulated time by one frame.
    fn tick(&mut self) -> Result<(), EmulatorError>;

    fn send_input(&mut self, button: Button);

    fn release_input(&mut self, button: Button);

    /// Side-effect free read of one memory location.
    fn read_byte(&self, address: u16) -> u8;

    /// Restore a full emulator snapshot from the resource at `handle`.
    fn load_state(&mut self, handle: &Path) -> Result<(), EmulatorError>;

    /// Current display as tightly packed RGB rows, `SCREEN_HEIGHT * SCREEN_WIDTH * 3` bytes.
    fn render_frame(&self) -> Vec<u8>;

    fn stop(&mut self);
}
