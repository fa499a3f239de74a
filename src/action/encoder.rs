use serde::{Deserialize, Serialize};

use crate::emulator::{Button, Emulator};
use crate::error::EnvError;

/// Which action table the agent acts through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionScheme {
    /// Inputs stay held until the agent picks the matching release index.
    #[default]
    PressRelease,
    /// Every index holds one input for the frame-skip window only.
    AutoRelease,
}

/// When the input pressed by a gesture is let go again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    /// Stays held across steps.
    Hold,
    /// Released right after the first tick of the window; the control is momentary.
    AfterFirstTick,
    EndOfWindow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gesture {
    pub button: Button,
    pub pressed: bool,
    pub release: Release,
}

impl Gesture {
    const fn press(button: Button, release: Release) -> Self {
        Self {
            button,
            pressed: true,
            release,
        }
    }

    const fn let_go(button: Button) -> Self {
        Self {
            button,
            pressed: false,
            release: Release::Hold,
        }
    }

    /// Sends the input at the start of the frame-skip window.
    pub fn begin(&self, emulator: &mut dyn Emulator) {
        if self.pressed {
            emulator.send_input(self.button);
        } else {
            emulator.release_input(self.button);
        }
    }

    /// Runs after tick `tick` (zero based) of the window.
    pub fn after_tick(&self, tick: u32, emulator: &mut dyn Emulator) {
        if tick == 0 && self.pressed && self.release == Release::AfterFirstTick {
            emulator.release_input(self.button);
        }
    }

    pub fn finish(&self, emulator: &mut dyn Emulator) {
        if self.pressed && self.release == Release::EndOfWindow {
            emulator.release_input(self.button);
        }
    }
}

const PRESS_RELEASE_ACTIONS: [Gesture; 13] = [
    // move samus
    Gesture::press(Button::Down, Release::Hold),
    Gesture::press(Button::Left, Release::Hold),
    Gesture::press(Button::Up, Release::Hold),
    Gesture::press(Button::Right, Release::Hold),
    Gesture::let_go(Button::Down),
    Gesture::let_go(Button::Left),
    Gesture::let_go(Button::Up),
    Gesture::let_go(Button::Right),
    // jump / shoot
    Gesture::press(Button::A, Release::Hold),
    Gesture::press(Button::B, Release::Hold),
    Gesture::let_go(Button::A),
    Gesture::let_go(Button::B),
    // toggle missiles
    Gesture::press(Button::Select, Release::AfterFirstTick),
];

const AUTO_RELEASE_ACTIONS: [Gesture; 7] = [
    Gesture::press(Button::Down, Release::EndOfWindow),
    Gesture::press(Button::Left, Release::EndOfWindow),
    Gesture::press(Button::Up, Release::EndOfWindow),
    Gesture::press(Button::Right, Release::EndOfWindow),
    Gesture::press(Button::A, Release::EndOfWindow),
    Gesture::press(Button::B, Release::EndOfWindow),
    Gesture::press(Button::Select, Release::EndOfWindow),
];

/// Maps discrete agent actions onto emulator gestures.
#[derive(Debug, Clone, Copy)]
pub struct ActionEncoder {
    scheme: ActionScheme,
    table: &'static [Gesture],
}

impl ActionEncoder {
    pub fn new(scheme: ActionScheme) -> Self {
        let table: &'static [Gesture] = match scheme {
            ActionScheme::PressRelease => &PRESS_RELEASE_ACTIONS,
            ActionScheme::AutoRelease => &AUTO_RELEASE_ACTIONS,
        };
        Self { scheme, table }
    }

    pub fn scheme(&self) -> ActionScheme {
        self.scheme
    }

    pub fn action_count(&self) -> usize {
        self.table.len()
    }

    pub fn encode(&self, index: usize) -> Result<Gesture, EnvError> {
        self.table
            .get(index)
            .copied()
            .ok_or(EnvError::InvalidAction {
                index,
                action_count: self.table.len(),
            })
    }
}
