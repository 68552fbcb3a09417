//! Orientation quaternions on top of `nalgebra`.
//!
//! Orientations are unit quaternions (w, i, j, k) rotating body axes
//! (x forward, y left, z up) into the reference frame. The regulator keeps
//! them as plain `Quaternion<f32>` so non-unit input can be inspected
//! before it is accepted.

use nalgebra::{Unit, UnitQuaternion, Vector3};

pub type Quaternion = nalgebra::Quaternion<f32>;

pub const IDENTITY: Quaternion = Quaternion::new(1.0, 0.0, 0.0, 0.0);
pub const ZERO: Quaternion = Quaternion::new(0.0, 0.0, 0.0, 0.0);

/// Yaw-pitch-roll (z-y-x) Euler angles, radians.
pub fn from_euler(yaw: f32, pitch: f32, roll: f32) -> Quaternion {
    UnitQuaternion::from_euler_angles(roll, pitch, yaw).into_inner()
}

/// Rotation of `angle` radians about `axis`.
pub fn from_axis_angle(axis: [f32; 3], angle: f32) -> Quaternion {
    let axis = Unit::new_normalize(Vector3::from(axis));
    UnitQuaternion::from_axis_angle(&axis, angle).into_inner()
}

pub fn is_finite(q: &Quaternion) -> bool {
    q.coords.iter().all(|c| c.is_finite())
}

/// Unit-length copy, or `None` when `q` is zero-length or not finite.
pub fn normalized(q: &Quaternion) -> Option<Quaternion> {
    if !is_finite(q) {
        return None;
    }
    UnitQuaternion::try_new(*q, f32::EPSILON).map(UnitQuaternion::into_inner)
}
