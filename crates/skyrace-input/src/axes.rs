//! The normalized pilot-intent contract consumed by the flight model.

/// One tick of pilot intent, every axis normalized to `[-1, 1]`.
///
/// Positive throttle accelerates, negative brakes. Positive pitch pushes
/// the nose down, positive roll banks right (right wing down). Sources
/// clamp before handing axes over, so the flight model never sees
/// out-of-range values.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PilotAxes {
    /// Engine axis: `-1` full brake, `+1` full throttle.
    pub throttle: f32,
    /// Elevator axis.
    pub pitch: f32,
    /// Aileron axis.
    pub roll: f32,
}

impl PilotAxes {
    /// Build axes, clamping each component into `[-1, 1]`.
    /// Non-finite components collapse to zero.
    #[must_use]
    pub fn new(throttle: f32, pitch: f32, roll: f32) -> Self {
        fn norm(v: f32) -> f32 {
            if v.is_finite() { v.clamp(-1.0, 1.0) } else { 0.0 }
        }
        Self {
            throttle: norm(throttle),
            pitch: norm(pitch),
            roll: norm(roll),
        }
    }

    /// All-zero axes: hands off the controls.
    pub const NEUTRAL: Self = Self {
        throttle: 0.0,
        pitch: 0.0,
        roll: 0.0,
    };
}

/// A device that can be asked for pilot intent once per tick.
///
/// A missing or unplugged device yields [`PilotAxes::NEUTRAL`], never an
/// error; control smoothing lives in the flight model, not here.
pub trait InputSource {
    /// Poll the device and reduce its state to normalized axes.
    fn poll(&mut self) -> PilotAxes;
}

/// Deterministic input for tests and the headless demo: replays a fixed
/// sequence of axes, then holds the final entry.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    script: Vec<PilotAxes>,
    cursor: usize,
}

impl ScriptedSource {
    /// A script that replays `axes` one tick at a time.
    #[must_use]
    pub fn new(script: Vec<PilotAxes>) -> Self {
        Self { script, cursor: 0 }
    }

    /// A script that holds the same axes forever.
    #[must_use]
    pub fn hold(axes: PilotAxes) -> Self {
        Self::new(vec![axes])
    }
}

impl InputSource for ScriptedSource {
    fn poll(&mut self) -> PilotAxes {
        match self.script.get(self.cursor) {
            Some(&axes) => {
                if self.cursor + 1 < self.script.len() {
                    self.cursor += 1;
                }
                axes
            }
            None => PilotAxes::NEUTRAL,
        }
    }
}
