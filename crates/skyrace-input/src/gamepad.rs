//! Analog gamepad pilot input wrapping [`gilrs`].
//!
//! Right trigger accelerates, left trigger brakes, the left stick drives
//! pitch and roll. Stick values pass through a configurable deadzone with
//! rescaling. Hot-plug is tolerated: with no pad connected the source
//! reports neutral axes rather than erroring.

use gilrs::{Axis, EventType, Gilrs};
use glam::Vec2;

use crate::axes::{InputSource, PilotAxes};

/// Gamepad-backed input source.
pub struct GamepadSource {
    gilrs: Gilrs,
    stick: Vec2,
    left_trigger: f32,
    right_trigger: f32,
    deadzone: f32,
    invert_pitch: bool,
}

impl GamepadSource {
    /// Initialize gilrs and start listening for pad events.
    ///
    /// Fails only if the platform backend is unavailable; an absent pad is
    /// not an error.
    pub fn new(deadzone: f32, invert_pitch: bool) -> Result<Self, gilrs::Error> {
        let gilrs = Gilrs::new()?;
        for (_, pad) in gilrs.gamepads() {
            tracing::info!("Gamepad connected: {}", pad.name());
        }
        Ok(Self {
            gilrs,
            stick: Vec2::ZERO,
            left_trigger: 0.0,
            right_trigger: 0.0,
            deadzone: deadzone.clamp(0.0, 0.99),
            invert_pitch,
        })
    }

    /// Whether any pad is currently connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.gilrs.gamepads().any(|(_, pad)| pad.is_connected())
    }
}

impl InputSource for GamepadSource {
    fn poll(&mut self) -> PilotAxes {
        while let Some(event) = self.gilrs.next_event() {
            match event.event {
                EventType::Connected => {
                    tracing::info!("Gamepad connected: {}", self.gilrs.gamepad(event.id).name());
                }
                EventType::Disconnected => {
                    tracing::warn!("Gamepad disconnected");
                    self.stick = Vec2::ZERO;
                    self.left_trigger = 0.0;
                    self.right_trigger = 0.0;
                }
                EventType::AxisChanged(axis, raw, _) => match axis {
                    Axis::LeftStickX => self.stick.x = apply_deadzone(raw, self.deadzone),
                    Axis::LeftStickY => self.stick.y = apply_deadzone(raw, self.deadzone),
                    Axis::LeftZ => self.left_trigger = raw.max(0.0),
                    Axis::RightZ => self.right_trigger = raw.max(0.0),
                    _ => {}
                },
                _ => {}
            }
        }

        if !self.is_connected() {
            return PilotAxes::NEUTRAL;
        }

        reduce_axes(
            self.stick,
            self.left_trigger,
            self.right_trigger,
            self.invert_pitch,
        )
    }
}

/// Map raw pad state to the pilot contract: trigger difference for
/// throttle, stick Y for pitch (forward is nose down unless inverted),
/// stick X for roll (stick right banks right).
#[must_use]
pub(crate) fn reduce_axes(
    stick: Vec2,
    left_trigger: f32,
    right_trigger: f32,
    invert_pitch: bool,
) -> PilotAxes {
    let pitch = if invert_pitch { -stick.y } else { stick.y };
    PilotAxes::new(right_trigger - left_trigger, pitch, stick.x)
}

/// Apply deadzone filtering with rescaling.
///
/// If `|raw| < deadzone`, returns `0.0`. Otherwise rescales from
/// `[deadzone, 1.0]` to `[0.0, 1.0]`, preserving sign.
#[must_use]
pub fn apply_deadzone(raw: f32, deadzone: f32) -> f32 {
    let abs = raw.abs();
    if abs < deadzone {
        return 0.0;
    }
    let scale = 1.0 / (1.0 - deadzone);
    let rescaled = (abs - deadzone) * scale;
    rescaled.min(1.0).copysign(raw)
}
