//! Configuration structs with the shipped tuning values and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level simulation configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Flight model tuning.
    pub flight: FlightConfig,
    /// Input settings.
    pub input: InputConfig,
    /// Run/session settings.
    pub game: GameConfig,
}

/// Which pilot input device drives the plane.
///
/// Selected once when the plane is spawned; the simulation never consults
/// a global preference mid-flight.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum InputMethod {
    /// Digital edge-state keyboard axes.
    #[default]
    Keyboard,
    /// Analog stick/trigger axes.
    Gamepad,
}

/// Flight model tuning constants.
///
/// Angles are degrees, speeds are world units per second, altitudes are
/// world units. The model divides by `max_speed` and `stall_speed`, so
/// both must validate as strictly positive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlightConfig {
    /// Engine power: speed gained per second at full throttle.
    pub acceleration: f32,
    /// Nominal top speed. The clamp ceiling is `max_speed * 1.5` so a dive
    /// can overshoot what the throttle alone can reach.
    pub max_speed: f32,
    /// Minimum forward speed; also the spawn speed.
    pub min_speed: f32,
    /// How strongly climb/dive incline bleeds/gains speed.
    pub gravity_influence: f32,
    /// Whether the clamp floor opens to `-max_speed` below the altitude
    /// soft limit (reverse flight).
    pub allow_reverse: bool,
    /// Speed below which the nose is forced down.
    pub stall_speed: f32,
    /// Nose-down authority at a dead stall, in degrees per second.
    pub stall_pitch_down: f32,

    /// Pitch authority in degrees per second at full deflection.
    pub pitch_speed: f32,
    /// Roll authority in degrees per second at full deflection.
    pub roll_speed: f32,
    /// Control inertia: lerp rate of smoothed axes toward raw input
    /// (higher = more responsive).
    pub control_inertia: f32,
    /// Self-leveling strength when the roll axis is released.
    pub roll_stabilization_force: f32,
    /// Roll input magnitude below which self-leveling engages.
    pub roll_input_deadband: f32,
    /// Banked-turn strength: yaw degrees per second at a 90° bank.
    pub yaw_influence: f32,

    /// Altitude above which climb resistance sets in.
    pub soft_altitude_limit: f32,
    /// Speed bled per second per unit of altitude excess while climbing
    /// above the soft limit.
    pub altitude_slowdown_rate: f32,
    /// Floor for the altitude slowdown; distinct from the global clamp floor.
    pub altitude_min_speed: f32,
    /// Altitude excess (units) at which the bounded excess ratio saturates.
    pub altitude_excess_saturation: f32,
    /// Nose-down authority at saturated excess, in degrees per second.
    pub altitude_pitch_down: f32,
    /// Extra self-leveling per unit of altitude excess.
    pub altitude_roll_stabilization: f32,
    /// Incline above which throttle is cut when over the soft limit
    /// (negative: a shallow dive still re-enables the engine).
    pub climb_block_incline: f32,

    /// Lerp rate for the stall/altitude nose-down blends, so crossing a
    /// threshold never snaps the pitch.
    pub force_blend_rate: f32,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            acceleration: 5.0,
            max_speed: 30.0,
            min_speed: 5.0,
            gravity_influence: 10.0,
            allow_reverse: true,
            stall_speed: 15.0,
            stall_pitch_down: 15.0,
            pitch_speed: 80.0,
            roll_speed: 120.0,
            control_inertia: 5.0,
            roll_stabilization_force: 0.5,
            roll_input_deadband: 0.15,
            yaw_influence: 10.0,
            soft_altitude_limit: 175.0,
            altitude_slowdown_rate: 0.1,
            altitude_min_speed: 5.0,
            altitude_excess_saturation: 50.0,
            altitude_pitch_down: 25.0,
            altitude_roll_stabilization: 2.0,
            climb_block_incline: -0.1,
            force_blend_rate: 4.0,
        }
    }
}

/// Input device configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Active pilot input device.
    pub method: InputMethod,
    /// Analog stick deadzone; values below it are clamped to zero and the
    /// remaining range rescaled.
    pub deadzone: f32,
    /// Invert the pitch axis.
    pub invert_pitch: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            method: InputMethod::Keyboard,
            deadzone: 0.15,
            invert_pitch: false,
        }
    }
}

/// Run/session configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    /// Fixed simulation rate in ticks per second.
    pub tick_rate: u32,
    /// Seconds between a crash and the loss notification, leaving room for
    /// crash feedback to play out.
    pub crash_notify_delay: f32,
    /// Crash rumble intensity `[0, 1]`.
    pub rumble_intensity: f32,
    /// Crash rumble duration in seconds.
    pub rumble_duration: f32,
    /// Seconds between rollback recorder samples.
    pub record_interval: f32,
    /// Ring capacity of the rollback recorder.
    pub max_recorded_states: usize,
    /// Duration of the interpolated rollback return.
    pub rollback_duration: f32,
    /// Log level override (e.g. "debug", "info", "warn").
    pub log_level: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_rate: 50,
            crash_notify_delay: 3.0,
            rumble_intensity: 1.0,
            rumble_duration: 2.0,
            record_interval: 0.5,
            max_recorded_states: 100,
            rollback_duration: 2.0,
            log_level: String::new(),
        }
    }
}

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            tracing::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            tracing::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Default config directory under the platform config dir.
    pub fn default_dir() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|d| d.join("skyrace"))
    }

    /// Fail-fast validation of every value the simulation divides by or
    /// assumes a sign for. Called once at startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let f = &self.flight;
        if !(f.max_speed > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "flight.max_speed must be > 0 (got {})",
                f.max_speed
            )));
        }
        if !(f.stall_speed > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "flight.stall_speed must be > 0 (got {})",
                f.stall_speed
            )));
        }
        if f.min_speed < 0.0 || f.min_speed > f.max_speed {
            return Err(ConfigError::Invalid(format!(
                "flight.min_speed must be in [0, max_speed] (got {})",
                f.min_speed
            )));
        }
        if !(f.control_inertia > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "flight.control_inertia must be > 0 (got {})",
                f.control_inertia
            )));
        }
        if !(f.altitude_excess_saturation > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "flight.altitude_excess_saturation must be > 0 (got {})",
                f.altitude_excess_saturation
            )));
        }
        for (name, value) in [
            ("flight.acceleration", f.acceleration),
            ("flight.gravity_influence", f.gravity_influence),
            ("flight.pitch_speed", f.pitch_speed),
            ("flight.roll_speed", f.roll_speed),
            ("flight.stall_pitch_down", f.stall_pitch_down),
            ("flight.altitude_pitch_down", f.altitude_pitch_down),
            ("flight.roll_stabilization_force", f.roll_stabilization_force),
            ("flight.yaw_influence", f.yaw_influence),
            ("flight.force_blend_rate", f.force_blend_rate),
        ] {
            if value < 0.0 || !value.is_finite() {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be finite and >= 0 (got {value})"
                )));
            }
        }

        if !(0.0..1.0).contains(&self.input.deadzone) {
            return Err(ConfigError::Invalid(format!(
                "input.deadzone must be in [0, 1) (got {})",
                self.input.deadzone
            )));
        }

        let g = &self.game;
        if g.tick_rate == 0 {
            return Err(ConfigError::Invalid("game.tick_rate must be > 0".into()));
        }
        if g.crash_notify_delay < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "game.crash_notify_delay must be >= 0 (got {})",
                g.crash_notify_delay
            )));
        }
        if !(g.record_interval > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "game.record_interval must be > 0 (got {})",
                g.record_interval
            )));
        }
        if g.max_recorded_states == 0 {
            return Err(ConfigError::Invalid(
                "game.max_recorded_states must be > 0".into(),
            ));
        }
        if !(g.rollback_duration > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "game.rollback_duration must be > 0 (got {})",
                g.rollback_duration
            )));
        }
        Ok(())
    }

    /// Seconds per simulation tick.
    pub fn tick_dt(&self) -> f32 {
        1.0 / self.game.tick_rate as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_max_speed_rejected() {
        let mut config = Config::default();
        config.flight.max_speed = 0.0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("max_speed"));
    }

    #[test]
    fn test_nan_tuning_value_rejected() {
        let mut config = Config::default();
        config.flight.pitch_speed = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_stall_speed_rejected() {
        let mut config = Config::default();
        config.flight.stall_speed = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_min_speed_above_max_rejected() {
        let mut config = Config::default();
        config.flight.min_speed = config.flight.max_speed + 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_tick_rate_rejected() {
        let mut config = Config::default();
        config.game.tick_rate = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deadzone_out_of_range_rejected() {
        let mut config = Config::default();
        config.input.deadzone = 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_ron_round_trip() {
        let mut config = Config::default();
        config.flight.max_speed = 42.0;
        config.input.method = InputMethod::Gamepad;

        let text = ron::to_string(&config).unwrap();
        let back: Config = ron::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_input_method_serializes_as_plain_name() {
        let text = ron::to_string(&InputMethod::Gamepad).unwrap();
        assert_eq!(text, "Gamepad");
        let back: InputMethod = ron::from_str("Keyboard").unwrap();
        assert_eq!(back, InputMethod::Keyboard);
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let config: Config = ron::from_str("(flight: (max_speed: 60.0))").unwrap();
        assert_eq!(config.flight.max_speed, 60.0);
        assert_eq!(config.flight.min_speed, FlightConfig::default().min_speed);
        assert_eq!(config.game.tick_rate, 50);
    }

    #[test]
    fn test_load_or_create_writes_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join("config.ron").exists());

        // Second load reads the file that was just written.
        let reloaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_save_then_load_preserves_changes() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.game.crash_notify_delay = 5.0;
        config.save(dir.path()).unwrap();

        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(loaded.game.crash_notify_delay, 5.0);
    }

    #[test]
    fn test_tick_dt_matches_rate() {
        let config = Config::default();
        assert!((config.tick_dt() - 0.02).abs() < 1e-6);
    }
}
