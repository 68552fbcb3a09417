//! Orientation error extraction
//!
//! Turns the rotation between the pose estimate and the reference into
//! three independent per-axis error signals (a rotation vector in body
//! axes: x roll, y pitch, z yaw).
//!
//! Known limitation: the error quaternion is flipped onto the w >= 0
//! hemisphere, so errors describe the shortest rotation and the angle
//! stays within [0, pi]. For rotations at (or numerically next to) pi
//! the direction of the shortest rotation is ambiguous and the sign of
//! the axis errors may flip between consecutive cycles.
//!
//! Known limitation: the angle comes from `acos` of an `f32` scalar part.
//! Rotations below roughly 5e-4 rad round to `w == 1` and read as zero
//! error, and resolution stays coarse up to about 1e-3 rad.

use libm::{acosf, sinf};

use crate::quat::Quaternion;

/// Source of the current orientation estimate.
pub trait AttitudeSource {
    fn orientation(&self) -> Quaternion;
}

/// Packed orientation error: rotation magnitude plus per-axis errors, rad.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AttitudeError {
    pub angle: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
}

impl AttitudeError {
    pub const ZERO: AttitudeError = AttitudeError { angle: 0.0, yaw: 0.0, pitch: 0.0, roll: 0.0 };
}

/// Error between `reference` and `pose`.
///
/// qerr = reference * conj(pose) = [cos(a/2), sin(a/2) * axis], and the
/// per-axis errors are `axis * a`.
pub fn extract_error(reference: &Quaternion, pose: &Quaternion) -> AttitudeError {
    let mut qerr = *reference * pose.conjugate();

    if qerr.w == 1.0 {
        return AttitudeError::ZERO;
    }
    if qerr.w < 0.0 {
        qerr = -qerr;
    }
    // rounding can push |w| past 1
    let w = qerr.w.min(1.0);
    if w >= 1.0 {
        return AttitudeError::ZERO;
    }

    let half = acosf(w);
    let angle = 2.0 * half;
    let scale = angle / sinf(half);
    AttitudeError { angle,
                    yaw: qerr.k * scale,
                    pitch: qerr.j * scale,
                    roll: qerr.i * scale }
}
