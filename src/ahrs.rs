use dcmimu::DCMIMU;

use crate::attitude::AttitudeSource;
use crate::quat::{self, Quaternion};

/// Attitude estimator on top of the DCM filter.
///
/// The IMU task feeds raw samples through `update`; the regulator only
/// ever reads the latest orientation.
pub struct DcmAttitude {
    dcmimu: DCMIMU,
    pose: Quaternion,
    last: AhrsResult,
}

impl DcmAttitude {
    pub fn new() -> Self {
        DcmAttitude { dcmimu: DCMIMU::new(),
                      pose: quat::IDENTITY,
                      last: AhrsResult::new() }
    }

    /// Feed one gyro (rad/s) and accel sample taken `dt_s` after the
    /// previous one.
    pub fn update(&mut self, gyro: [f32; 3], accel: [f32; 3], dt_s: f32) -> AhrsResult {
        let (ypr, gyro_biases) = self.dcmimu.update((gyro[0], gyro[1], gyro[2]),
                                                    (accel[0], accel[1], accel[2]),
                                                    dt_s);
        let biased_gyro = [gyro[0] - gyro_biases.x,
                           gyro[1] - gyro_biases.y,
                           gyro[2] - gyro_biases.z];
        let result = AhrsResult { accel,
                                  gyro,
                                  biased_gyro,
                                  dt_s,
                                  yaw: ypr.yaw,
                                  pitch: ypr.pitch,
                                  roll: ypr.roll };
        let pose = quat::from_euler(result.yaw, result.pitch, result.roll);
        // keep the last good pose if the filter blew up
        if let Some(pose) = quat::normalized(&pose) {
            self.pose = pose;
        }
        self.last = result;
        result
    }

    pub fn last(&self) -> &AhrsResult {
        &self.last
    }
}

impl Default for DcmAttitude {
    fn default() -> Self {
        DcmAttitude::new()
    }
}

impl AttitudeSource for DcmAttitude {
    fn orientation(&self) -> Quaternion {
        self.pose
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AhrsResult {
    pub accel: [f32; 3],
    pub gyro: [f32; 3],
    pub biased_gyro: [f32; 3],
    pub dt_s: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
}

impl AhrsResult {
    pub const fn new() -> Self {
        AhrsResult { accel: [0.0; 3],
                     gyro: [0.0; 3],
                     biased_gyro: [0.0; 3],
                     dt_s: 0.0,
                     yaw: 0.0,
                     pitch: 0.0,
                     roll: 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_level() {
        let ahrs = DcmAttitude::new();
        assert_eq!(ahrs.orientation(), quat::IDENTITY);
    }

    #[test]
    fn pose_tracks_filter_output() {
        let mut ahrs = DcmAttitude::new();
        let mut result = AhrsResult::new();
        for _ in 0..50 {
            result = ahrs.update([0.0, 0.0, 0.1], [0.0, 0.0, 9.81], 0.01);
        }
        let q = ahrs.orientation();
        assert!((q.norm() - 1.0).abs() < 1e-4);
        let expected = quat::from_euler(result.yaw, result.pitch, result.roll);
        assert!((q.w - expected.w).abs() < 1e-4);
        assert!((q.k - expected.k).abs() < 1e-4);
        assert_eq!(ahrs.last().dt_s, 0.01);
    }
}
