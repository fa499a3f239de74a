use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};

use super::{Button, Emulator, SCREEN_CHANNELS, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::error::EmulatorError;

const ADDRESS_SPACE: usize = 0x1_0000;
/// First work RAM byte; the three bytes from here are used as the screen colour.
const PALETTE_ADDRESS: usize = 0xC000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub tick: u64,
    pub button: Button,
    pub pressed: bool,
}

/// Headless emulator backed by a flat 64 KiB address space.
///
/// State files are raw memory images loaded from address zero. Game logic is replaced by a
/// script of memory patches, one entry consumed per tick, which makes it possible to replay
/// exact RAM sequences (damage, pickups, deaths) without a ROM.
pub struct RamEmulator {
    memory: Vec<u8>,
    states: HashMap<PathBuf, Vec<u8>>,
    script: VecDeque<Vec<(u16, u8)>>,
    inputs: Vec<InputEvent>,
    loaded: Vec<PathBuf>,
    ticks: u64,
    stop_count: usize,
}

impl Default for RamEmulator {
    fn default() -> Self {
        Self::new()
    }
}

impl RamEmulator {
    pub fn new() -> Self {
        Self {
            memory: vec![0; ADDRESS_SPACE],
            states: HashMap::new(),
            script: VecDeque::new(),
            inputs: Vec::new(),
            loaded: Vec::new(),
            ticks: 0,
            stop_count: 0,
        }
    }

    /// Registers an in-memory image served for `path` instead of reading the file.
    pub fn with_state(mut self, path: impl Into<PathBuf>, image: Vec<u8>) -> Self {
        self.states.insert(path.into(), image);
        self
    }

    /// Queues the patches applied on the next unscripted tick.
    pub fn push_tick(&mut self, patches: Vec<(u16, u8)>) {
        self.script.push_back(patches);
    }

    pub fn write_byte(&mut self, address: u16, value: u8) {
        self.memory[usize::from(address)] = value;
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn inputs(&self) -> &[InputEvent] {
        &self.inputs
    }

    pub fn loaded_states(&self) -> &[PathBuf] {
        &self.loaded
    }

    pub fn stop_count(&self) -> usize {
        self.stop_count
    }

    pub fn is_stopped(&self) -> bool {
        self.stop_count > 0
    }

    fn record_input(&mut self, button: Button, pressed: bool) {
        self.inputs.push(InputEvent {
            tick: self.ticks,
            button,
            pressed,
        });
    }

    fn read_image(&self, handle: &Path) -> Result<Vec<u8>, EmulatorError> {
        if let Some(image) = self.states.get(handle) {
            return Ok(image.clone());
        }
        std::fs::read(handle).map_err(|source| EmulatorError::StateUnreadable {
            path: handle.to_path_buf(),
            source,
        })
    }
}

impl Emulator for RamEmulator {
    fn tick(&mut self) -> Result<(), EmulatorError> {
        if self.is_stopped() {
            return Err(EmulatorError::Stopped);
        }
        if let Some(patches) = self.script.pop_front() {
            for (address, value) in patches {
                self.write_byte(address, value);
            }
        }
        self.ticks += 1;
        Ok(())
    }

    fn send_input(&mut self, button: Button) {
        self.record_input(button, true);
    }

    fn release_input(&mut self, button: Button) {
        self.record_input(button, false);
    }

    fn read_byte(&self, address: u16) -> u8 {
        self.memory[usize::from(address)]
    }

    fn load_state(&mut self, handle: &Path) -> Result<(), EmulatorError> {
        if self.is_stopped() {
            return Err(EmulatorError::Stopped);
        }
        let image = self.read_image(handle)?;
        if image.is_empty() || image.len() > ADDRESS_SPACE {
            return Err(EmulatorError::StateMalformed {
                path: handle.to_path_buf(),
                reason: format!(
                    "image is {} bytes, expected 1..={} bytes",
                    image.len(),
                    ADDRESS_SPACE
                ),
            });
        }
        self.memory.fill(0);
        self.memory[..image.len()].copy_from_slice(&image);
        self.loaded.push(handle.to_path_buf());
        tracing::debug!("Loaded state '{}' ({} bytes)", handle.display(), image.len());
        Ok(())
    }

    fn render_frame(&self) -> Vec<u8> {
        let colour = &self.memory[PALETTE_ADDRESS..PALETTE_ADDRESS + SCREEN_CHANNELS];
        colour.repeat(SCREEN_WIDTH * SCREEN_HEIGHT)
    }

    fn stop(&mut self) {
        self.stop_count += 1;
    }
}
