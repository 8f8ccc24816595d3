//! The arcade flight model: a fixed-timestep simulation that converts
//! normalized pilot axes into speed, attitude, and position changes.
//!
//! Deliberately simplified aerodynamics. Climb bleeds speed and dives
//! recover it, low speed stalls the nose down, altitude above a soft
//! limit is progressively punished, and banking both costs pitch
//! authority and turns the craft. All coupling terms that cross a
//! threshold are blended through first-order lerps so nothing snaps.

use glam::{Quat, Vec3};
use skyrace_config::FlightConfig;
use skyrace_input::PilotAxes;

use crate::angles::bank_angle;

/// Clamp ceiling headroom over `max_speed`, so gravity in a dive can
/// overshoot what the throttle alone reaches.
const CEILING_FACTOR: f32 = 1.5;

/// Continuous flight state. Owned by [`FlightModel`] and mutated only
/// inside [`FlightModel::tick`].
#[derive(Debug, Clone, PartialEq)]
pub struct FlightState {
    /// Signed scalar speed along the facing direction.
    pub speed: f32,
    /// World position.
    pub position: Vec3,
    /// World orientation. Forward is `-Z`, right `+X`.
    pub orientation: Quat,
    /// World velocity from the last tick (`forward * speed`).
    pub velocity: Vec3,
    /// Control-inertia memory for the pitch axis, in `[-1, 1]`.
    pub smoothed_pitch: f32,
    /// Control-inertia memory for the roll axis, in `[-1, 1]`.
    pub smoothed_roll: f32,
    /// Smoothed stall severity in `[0, 1]` driving the nose-down force.
    pub stall_blend: f32,
    /// Smoothed altitude-excess ratio in `[0, 1]` driving the nose-down force.
    pub altitude_blend: f32,
}

/// The flight model: tuning constants plus the state they advance.
///
/// The config must have passed `Config::validate` before it gets here;
/// the model divides by `max_speed` and `stall_speed`.
#[derive(Debug, Clone)]
pub struct FlightModel {
    config: FlightConfig,
    state: FlightState,
}

impl FlightModel {
    /// Spawn a craft at `position` with the given attitude, moving at the
    /// configured minimum speed.
    #[must_use]
    pub fn new(config: FlightConfig, position: Vec3, orientation: Quat) -> Self {
        let state = FlightState {
            speed: config.min_speed,
            position,
            orientation: orientation.normalize(),
            velocity: orientation * Vec3::NEG_Z * config.min_speed,
            smoothed_pitch: 0.0,
            smoothed_roll: 0.0,
            stall_blend: 0.0,
            altitude_blend: 0.0,
        };
        Self { config, state }
    }

    /// Read-only state access.
    #[must_use]
    pub fn state(&self) -> &FlightState {
        &self.state
    }

    /// Direct state access for arranging test scenarios.
    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut FlightState {
        &mut self.state
    }

    /// Current signed speed, for the HUD readout.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.state.speed
    }

    /// Current altitude (`position.y`), for the HUD readout.
    #[must_use]
    pub fn altitude(&self) -> f32 {
        self.state.position.y
    }

    /// World-space forward direction.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.state.orientation * Vec3::NEG_Z
    }

    /// Overwrite position, orientation, and velocity, e.g. when a
    /// rollback returns the craft to a recorded pose. Control memory is
    /// left alone; speed is re-derived from the restored velocity.
    pub fn restore_pose(&mut self, position: Vec3, orientation: Quat, velocity: Vec3) {
        self.state.position = position;
        self.state.orientation = orientation.normalize();
        self.state.velocity = velocity;
        self.state.speed = velocity.dot(self.forward());
        self.clamp_speed(self.config.max_speed * CEILING_FACTOR);
    }

    /// Advance the simulation by one fixed timestep.
    ///
    /// Order matters and is part of the contract: throttle, then
    /// gravity-by-incline, then altitude governance, then the speed
    /// clamp; control smoothing; pitch, roll, and yaw composition; local
    /// pitch+roll rotation before the world-space yaw; translation last.
    pub fn tick(&mut self, dt: f32, axes: PilotAxes) {
        let cfg = self.config.clone();
        let forward = self.forward();
        let incline = forward.dot(Vec3::Y);
        let altitude = self.state.position.y;
        let above_limit = altitude > cfg.soft_altitude_limit;
        let excess = (altitude - cfg.soft_altitude_limit).max(0.0);
        let excess_ratio = (excess / cfg.altitude_excess_saturation).min(1.0);

        // Throttle. The engine cuts out in thin air unless the nose is
        // pushed down past the block threshold, and braking is refused
        // below stall speed so the pilot cannot brake into deep reverse.
        let mut throttle = axes.throttle;
        if above_limit && incline > cfg.climb_block_incline && throttle > 0.0 {
            throttle = 0.0;
        }
        if self.state.speed < cfg.stall_speed && throttle < 0.0 {
            throttle = 0.0;
        }
        self.state.speed += throttle * cfg.acceleration * dt;
        self.clamp_speed(cfg.max_speed);

        // Gravity by incline, unconditionally every tick: climbing bleeds
        // speed, diving gains it.
        self.state.speed -= incline * cfg.gravity_influence * dt;

        // Altitude governance: while climbing above the soft limit, bleed
        // speed proportionally to the excess, floored at the altitude
        // minimum rather than the global floor.
        if above_limit && incline > 0.0 {
            let slowdown = excess * cfg.altitude_slowdown_rate * dt;
            self.state.speed = (self.state.speed - slowdown).max(cfg.altitude_min_speed);
        }
        self.clamp_speed(cfg.max_speed * CEILING_FACTOR);

        // Control inertia: first-order lag toward the raw axes. The factor
        // is capped at 1 so convergence can never overshoot.
        let t = (dt * cfg.control_inertia).min(1.0);
        self.state.smoothed_pitch += (axes.pitch - self.state.smoothed_pitch) * t;
        self.state.smoothed_roll += (axes.roll - self.state.smoothed_roll) * t;

        // Stall and altitude nose-down severities, each smoothed so
        // crossing the threshold never snaps the pitch.
        let stall_target = if self.state.speed < cfg.stall_speed {
            (1.0 - self.state.speed / cfg.stall_speed).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let altitude_target = if above_limit { excess_ratio } else { 0.0 };
        let blend = (dt * cfg.force_blend_rate).min(1.0);
        self.state.stall_blend += (stall_target - self.state.stall_blend) * blend;
        self.state.altitude_blend += (altitude_target - self.state.altitude_blend) * blend;

        // Bank readback, normalized to (-180, 180].
        let bank = bank_angle(self.state.orientation);
        let bank_ratio = (bank.abs() / 90.0).min(1.0);
        let bank_curve = bank_ratio * bank_ratio;

        // Pitch: pilot authority shrinks with bank steepness, then the
        // stall and altitude forces push the nose down (positive pitch).
        let mut pitch_delta = self.state.smoothed_pitch * cfg.pitch_speed * dt;
        pitch_delta *= 1.0 - bank_curve;
        pitch_delta += self.state.stall_blend * cfg.stall_pitch_down * dt;
        pitch_delta += self.state.altitude_blend * cfg.altitude_pitch_down * dt;

        // Roll: pilot input plus self-leveling once the stick is released.
        // The gate reads the smoothed axis, so on release the correction
        // waits for the control-inertia decay instead of fighting it.
        // Stabilization stiffens with altitude excess, making high flight
        // progressively harder to hold banked.
        let mut roll_delta = self.state.smoothed_roll * cfg.roll_speed * dt;
        if self.state.smoothed_roll.abs() < cfg.roll_input_deadband {
            let stabilization =
                cfg.roll_stabilization_force + excess_ratio * cfg.altitude_roll_stabilization;
            roll_delta -= bank * stabilization * dt;
        }

        // Banked turn: quadratic in the bank ratio, scaled up with speed,
        // signed opposite the bank so the craft turns into it.
        let speed_factor = 1.0 + 2.0 * (self.state.speed / cfg.max_speed).clamp(0.0, 1.0);
        let yaw_delta =
            -(bank / 90.0).clamp(-1.0, 1.0) * bank_ratio * cfg.yaw_influence * speed_factor * dt;

        // Local pitch+roll first, then yaw about the world up axis.
        // Reversing this order changes turn behavior.
        let right = self.state.orientation * Vec3::X;
        let pitch_quat = Quat::from_axis_angle(right, (-pitch_delta).to_radians());
        let roll_quat = Quat::from_axis_angle(forward, roll_delta.to_radians());
        self.state.orientation = (pitch_quat * roll_quat * self.state.orientation).normalize();
        let yaw_quat = Quat::from_rotation_y(yaw_delta.to_radians());
        self.state.orientation = (yaw_quat * self.state.orientation).normalize();

        // Translate along the new facing.
        self.state.velocity = self.forward() * self.state.speed;
        self.state.position += self.state.velocity * dt;
    }

    /// Clamp speed into `[floor, ceiling]`. The throttle step passes
    /// `max_speed` as the ceiling; the gravity step passes the `1.5x`
    /// headroom ceiling, so only a dive can overshoot the nominal cap.
    /// The floor opens to `-max_speed` only when reverse is allowed and
    /// the craft is below the altitude soft limit.
    fn clamp_speed(&mut self, ceiling: f32) {
        let cfg = &self.config;
        let floor = if cfg.allow_reverse && self.state.position.y <= cfg.soft_altitude_limit {
            -cfg.max_speed
        } else {
            cfg.min_speed
        };
        self.state.speed = self.state.speed.clamp(floor, ceiling);
    }
}
