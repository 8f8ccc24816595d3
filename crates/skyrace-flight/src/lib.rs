//! Arcade flight simulation core: the per-tick flight model, the
//! flying/crashed lifecycle, and the deferred tick scheduler that carries
//! crash side effects across ticks.

pub mod angles;
pub mod defer;
pub mod lifecycle;
pub mod model;


pub use angles::{bank_angle, normalize_degrees};
pub use defer::{TaskId, TickScheduler};
pub use lifecycle::{FlightLifecycle, FlightPhase, GameEvents, LifecycleEvent, OutcomeSink, RunOutcome};
pub use model::{FlightModel, FlightState};
