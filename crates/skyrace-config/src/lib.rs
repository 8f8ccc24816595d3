//! Configuration for the skyrace simulation.
//!
//! Tuning constants persist to disk as RON files. Every value that the
//! flight model divides by is validated up front so a bad config file
//! fails at startup instead of feeding NaN into the physics state.

mod config;
mod error;

pub use config::{Config, FlightConfig, GameConfig, InputConfig, InputMethod};
pub use error::ConfigError;
