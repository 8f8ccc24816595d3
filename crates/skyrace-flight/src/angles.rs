//! Angle helpers for the control logic.
//!
//! The model keeps its orientation as a quaternion and only decomposes
//! when a correction formula needs a signed angle. Bank readback uses the
//! craft's forward axis convention from the rest of the workspace:
//! forward is `-Z`, right is `+X`, world up is `+Y`.

use glam::{Quat, Vec3};

/// Normalize an angle in degrees into `(-180, 180]`.
///
/// A value already in range comes back unchanged; `190°` becomes `-170°`.
#[must_use]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Signed bank angle of `orientation` in degrees, in `(-180, 180]`.
///
/// Positive means the right wing is down. Measured as the rotation of the
/// craft's right axis away from the level right direction, about the
/// forward axis, so it agrees exactly with roll deltas applied via
/// [`Quat::from_axis_angle`] on the forward axis.
///
/// Near-vertical flight has no well-defined bank; it reads as zero there,
/// which also disarms the self-leveling correction.
#[must_use]
pub fn bank_angle(orientation: Quat) -> f32 {
    let forward = orientation * Vec3::NEG_Z;
    let right = orientation * Vec3::X;

    let flat_right = forward.cross(Vec3::Y);
    if flat_right.length_squared() < 1e-6 {
        return 0.0;
    }
    let flat_right = flat_right.normalize();

    let sin = flat_right.cross(right).dot(forward);
    let cos = flat_right.dot(right);
    normalize_degrees(sin.atan2(cos).to_degrees())
}
