//! Pilot input abstraction: keyboard, gamepad, and scripted sources all
//! reduced to the same normalized `{throttle, pitch, roll}` contract.

pub mod axes;
pub mod gamepad;
pub mod haptics;
pub mod keyboard;

pub use axes::{InputSource, PilotAxes, ScriptedSource};
pub use gamepad::{GamepadSource, apply_deadzone};
pub use haptics::{NullRumble, RumbleSink, TracingRumble};
pub use keyboard::{KeyBindings, KeyboardSource, KeyboardState, RawKeyEvent};
