//! The cockpit compass: an orientation that always faces the current
//! course objective.

use glam::{Quat, Vec3};

use crate::course::CourseTarget;

/// Points its forward axis (`-Z`) at the tracked objective.
#[derive(Debug, Clone, Copy, Default)]
pub struct Compass {
    target: Option<Vec3>,
}

impl Compass {
    /// A compass with nothing to point at.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Follow the tracker's current objective.
    pub fn set_target(&mut self, target: CourseTarget) {
        self.target = match target {
            CourseTarget::Checkpoint(_, position) | CourseTarget::Finish(position) => {
                Some(position)
            }
            CourseTarget::None => None,
        };
    }

    /// The orientation that looks from `observer` at the objective, or
    /// `None` when there is no objective or the observer sits on it.
    #[must_use]
    pub fn orientation(&self, observer: Vec3) -> Option<Quat> {
        let target = self.target?;
        let toward = target - observer;
        if toward.length_squared() < 1e-6 {
            return None;
        }
        Some(Quat::from_rotation_arc(Vec3::NEG_Z, toward.normalize()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::GateId;

    #[test]
    fn test_points_forward_axis_at_target() {
        let mut compass = Compass::new();
        compass.set_target(CourseTarget::Checkpoint(GateId(0), Vec3::new(100.0, 0.0, 0.0)));

        let orientation = compass.orientation(Vec3::ZERO).unwrap();
        let forward = orientation * Vec3::NEG_Z;
        assert!((forward - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_follows_finish_target() {
        let mut compass = Compass::new();
        compass.set_target(CourseTarget::Finish(Vec3::new(0.0, 0.0, -50.0)));

        let orientation = compass.orientation(Vec3::ZERO).unwrap();
        let forward = orientation * Vec3::NEG_Z;
        assert!((forward - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_no_target_yields_no_orientation() {
        let mut compass = Compass::new();
        assert!(compass.orientation(Vec3::ZERO).is_none());

        compass.set_target(CourseTarget::None);
        assert!(compass.orientation(Vec3::ZERO).is_none());
    }

    #[test]
    fn test_observer_on_target_is_degenerate() {
        let mut compass = Compass::new();
        let spot = Vec3::new(3.0, 4.0, 5.0);
        compass.set_target(CourseTarget::Finish(spot));
        assert!(compass.orientation(spot).is_none());
    }
}
