//! Skyrace — checkpoint air racing, headless simulation core.
//!
//! Loads the RON config and a course description, builds the configured
//! input source, and drives the fixed-timestep run loop until the course
//! is won, the craft crashes, or the tick budget runs out. The last
//! run's outcome is persisted for the menu front-end to read once.
//!
//! Run the built-in demo course with: `cargo run -p skyrace-game -- --demo`

mod course_file;
mod hud;
mod outcome;
mod runner;

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use skyrace_config::{Config, ConfigError, InputMethod};
use skyrace_input::{
    GamepadSource, InputSource, KeyboardSource, PilotAxes, ScriptedSource, TracingRumble,
};
use tracing::{info, warn};

use course_file::CourseFile;
use outcome::FileOutcomeStore;
use runner::{GameRunner, RunEnd};

/// CLI arguments for the game binary.
#[derive(Parser, Debug)]
#[command(name = "skyrace", about = "Checkpoint air race — simulation core")]
struct GameArgs {
    /// Config directory; created with defaults when missing.
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// RON course file; the built-in demo course when omitted.
    #[arg(long)]
    course: Option<PathBuf>,

    /// Override the configured input method.
    #[arg(long, value_enum)]
    input: Option<InputArg>,

    /// Fly with a scripted pilot instead of hardware input.
    #[arg(long)]
    demo: bool,

    /// Simulation budget in seconds.
    #[arg(long, default_value_t = 600.0)]
    max_seconds: f32,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum InputArg {
    Keyboard,
    Gamepad,
}

impl From<InputArg> for InputMethod {
    fn from(arg: InputArg) -> Self {
        match arg {
            InputArg::Keyboard => InputMethod::Keyboard,
            InputArg::Gamepad => InputMethod::Gamepad,
        }
    }
}

fn main() {
    let args = GameArgs::parse();
    if let Err(error) = run(args) {
        eprintln!("skyrace: {error}");
        std::process::exit(1);
    }
}

fn run(args: GameArgs) -> Result<(), ConfigError> {
    let config_dir = args
        .config_dir
        .clone()
        .or_else(Config::default_dir)
        .ok_or_else(|| {
            ConfigError::Invalid("no config directory available; pass --config-dir".into())
        })?;
    let mut config = Config::load_or_create(&config_dir)?;
    if let Some(input) = args.input {
        config.input.method = input.into();
    }
    config.validate()?;

    skyrace_log::init_logging(None, Some(&config));
    info!(config_dir = %config_dir.display(), "Skyrace starting");

    let course = match &args.course {
        Some(path) => CourseFile::load(path)?,
        None => CourseFile::demo(),
    };
    info!(
        checkpoints = course.checkpoints.len(),
        has_finish = course.finish.is_some(),
        "Course ready"
    );

    let mut source = build_source(&config, args.demo);
    let mut outcomes = FileOutcomeStore::in_dir(&config_dir);
    let mut rumble = TracingRumble;

    let mut runner = GameRunner::new(&config, &course);
    let end = runner.run(
        source.as_mut(),
        Some(&mut outcomes),
        Some(&mut rumble),
        args.max_seconds,
    );
    match end {
        RunEnd::Won => info!("Run complete: win"),
        RunEnd::Lost => info!("Run complete: lose"),
        RunEnd::OutOfTime => warn!("Run ended without a result"),
    }
    Ok(())
}

/// Input source per the configured method.
///
/// The keyboard source only produces deflection once an embedding window
/// loop feeds it key events; headless it reads neutral axes. The demo
/// pilot trims the nose up through the low-speed spawn, then flies
/// straight at full throttle.
fn build_source(config: &Config, demo: bool) -> Box<dyn InputSource> {
    if demo {
        let trim = PilotAxes::new(1.0, -0.12, 0.0);
        let cruise = PilotAxes::new(1.0, 0.0, 0.0);
        let mut script = vec![trim; 150];
        script.push(cruise);
        return Box::new(ScriptedSource::new(script));
    }
    match config.input.method {
        InputMethod::Gamepad => {
            match GamepadSource::new(config.input.deadzone, config.input.invert_pitch) {
                Ok(source) => Box::new(source),
                Err(error) => {
                    warn!(%error, "Gamepad unavailable; axes stay neutral");
                    Box::new(ScriptedSource::hold(PilotAxes::NEUTRAL))
                }
            }
        }
        InputMethod::Keyboard => Box::new(KeyboardSource::new()),
    }
}
