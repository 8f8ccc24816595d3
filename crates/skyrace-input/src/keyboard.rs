//! Digital keyboard pilot input.
//!
//! [`KeyboardState`] tracks held physical keys from winit events (physical
//! codes, so the layout never remaps flight controls), and
//! [`KeyboardSource`] reduces the held set to full-deflection axes:
//! opposing keys cancel, a lone key deflects its axis to ±1. Control
//! inertia is the flight model's job, so the source itself is hard-edged.

use std::collections::HashSet;

use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::axes::{InputSource, PilotAxes};

/// Minimal description of a key event for processing.
#[derive(Debug, Clone, Copy)]
pub struct RawKeyEvent {
    /// The physical key involved.
    pub key: PhysicalKey,
    /// Whether the key was pressed or released.
    pub state: ElementState,
    /// Whether this is a repeat event.
    pub repeat: bool,
}

/// Held-key tracker fed by winit events.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    pressed: HashSet<PhysicalKey>,
}

impl KeyboardState {
    /// Creates a tracker with no keys pressed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward a winit [`KeyEvent`].
    pub fn process_event(&mut self, event: &KeyEvent) {
        self.process_raw(RawKeyEvent {
            key: event.physical_key,
            state: event.state,
            repeat: event.repeat,
        });
    }

    /// Process a [`RawKeyEvent`] (platform-independent, test-friendly).
    /// Repeat events are ignored.
    pub fn process_raw(&mut self, event: RawKeyEvent) {
        if event.repeat {
            return;
        }
        match event.state {
            ElementState::Pressed => {
                self.pressed.insert(event.key);
            }
            ElementState::Released => {
                self.pressed.remove(&event.key);
            }
        }
    }

    /// Returns `true` while the key is held down.
    #[must_use]
    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&PhysicalKey::Code(key))
    }
}

/// Which physical keys drive which flight axis.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    /// Nose down.
    pub pitch_down: KeyCode,
    /// Nose up.
    pub pitch_up: KeyCode,
    /// Bank left (either key works, for AZERTY and QWERTY).
    pub roll_left: [KeyCode; 2],
    /// Bank right.
    pub roll_right: KeyCode,
    /// Full throttle.
    pub throttle: KeyCode,
    /// Brake.
    pub brake: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            pitch_down: KeyCode::KeyW,
            pitch_up: KeyCode::KeyS,
            roll_left: [KeyCode::KeyQ, KeyCode::KeyA],
            roll_right: KeyCode::KeyD,
            throttle: KeyCode::Space,
            brake: KeyCode::ShiftLeft,
        }
    }
}

/// Edge-state keyboard input source.
#[derive(Debug, Clone, Default)]
pub struct KeyboardSource {
    state: KeyboardState,
    bindings: KeyBindings,
}

impl KeyboardSource {
    /// A source with the default bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A source with custom bindings.
    #[must_use]
    pub fn with_bindings(bindings: KeyBindings) -> Self {
        Self {
            state: KeyboardState::new(),
            bindings,
        }
    }

    /// Forward a winit [`KeyEvent`] to the underlying tracker.
    pub fn process_event(&mut self, event: &KeyEvent) {
        self.state.process_event(event);
    }

    /// Process a [`RawKeyEvent`] (test-friendly).
    pub fn process_raw(&mut self, event: RawKeyEvent) {
        self.state.process_raw(event);
    }
}

impl InputSource for KeyboardSource {
    fn poll(&mut self) -> PilotAxes {
        let b = &self.bindings;
        let held = |key| self.state.is_pressed(key);

        let mut pitch = 0.0;
        if held(b.pitch_down) {
            pitch += 1.0;
        }
        if held(b.pitch_up) {
            pitch -= 1.0;
        }

        let mut roll = 0.0;
        if b.roll_left.iter().any(|&k| held(k)) {
            roll -= 1.0;
        }
        if held(b.roll_right) {
            roll += 1.0;
        }

        let mut throttle = 0.0;
        if held(b.throttle) {
            throttle += 1.0;
        }
        if held(b.brake) {
            throttle -= 1.0;
        }

        PilotAxes::new(throttle, pitch, roll)
    }
}
