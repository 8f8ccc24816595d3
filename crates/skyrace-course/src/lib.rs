//! Course progression: the ordered checkpoint gauntlet, the compass that
//! points at the next objective, and the pose recorder behind the
//! checkpoint-rollback mechanic.

pub mod compass;
pub mod course;
pub mod rollback;

pub use compass::Compass;
pub use course::{CourseTarget, CourseTracker, GateDescriptor, GateId, GateOutcome};
pub use rollback::{FlightRecorder, PoseSample};
