//! RON course descriptions.
//!
//! A course file lists the checkpoint gauntlet, the finish line, any
//! rollback gates, and the spawn pose. A built-in demo course backs the
//! binary when no file is given.

use std::fs;
use std::path::Path;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use skyrace_config::ConfigError;
use skyrace_course::GateDescriptor;

/// An authored course, as parsed from a RON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseFile {
    /// Checkpoints, ordered by the tracker's naming policy.
    #[serde(default)]
    pub checkpoints: Vec<GateDescriptor>,
    /// Finish line; a course without one can never be won.
    #[serde(default)]
    pub finish: Option<GateDescriptor>,
    /// Gates that send the craft back along its recorded path.
    #[serde(default)]
    pub rollback_gates: Vec<GateDescriptor>,
    /// Spawn position.
    #[serde(default = "default_spawn")]
    pub spawn: Vec3,
    /// Spawn heading in degrees; 0 faces `-Z`.
    #[serde(default)]
    pub spawn_heading: f32,
}

fn default_spawn() -> Vec3 {
    Vec3::new(0.0, 50.0, 0.0)
}

impl CourseFile {
    /// Parse a course from `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let course: Self = ron::from_str(&content).map_err(ConfigError::ParseError)?;
        tracing::info!(
            path = %path.display(),
            checkpoints = course.checkpoints.len(),
            "Course loaded"
        );
        Ok(course)
    }

    /// A short straight-line course for the demo mode.
    #[must_use]
    pub fn demo() -> Self {
        let gate = |name: &str, z: f32| GateDescriptor {
            name: name.to_owned(),
            position: Vec3::new(0.0, 50.0, z),
            radius: 20.0,
        };
        Self {
            checkpoints: vec![gate("1", -150.0), gate("2", -300.0), gate("3", -450.0)],
            finish: Some(gate("finish", -600.0)),
            rollback_gates: Vec::new(),
            spawn: default_spawn(),
            spawn_heading: 0.0,
        }
    }

    /// The spawn attitude: level, rotated by the heading about world up.
    #[must_use]
    pub fn spawn_orientation(&self) -> Quat {
        Quat::from_rotation_y(self.spawn_heading.to_radians())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_course_is_flyable() {
        let course = CourseFile::demo();
        assert!(!course.checkpoints.is_empty());
        assert!(course.finish.is_some());
        assert!(course.spawn.y > 0.0);
    }

    #[test]
    fn test_round_trips_through_ron() {
        let course = CourseFile::demo();
        let text = ron::ser::to_string_pretty(&course, ron::ser::PrettyConfig::default()).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("course.ron");
        std::fs::write(&path, text).unwrap();

        let back = CourseFile::load(&path).unwrap();
        assert_eq!(back, course);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let course: CourseFile = ron::from_str("(checkpoints: [])").unwrap();
        assert!(course.finish.is_none());
        assert!(course.rollback_gates.is_empty());
        assert_eq!(course.spawn, default_spawn());
        assert_eq!(course.spawn_heading, 0.0);
    }

    #[test]
    fn test_load_rejects_malformed_course() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ron");
        std::fs::write(&path, "(checkpoints: 7)").unwrap();
        assert!(matches!(
            CourseFile::load(&path),
            Err(ConfigError::ParseError(_))
        ));
    }
}
