//! Euler view angles and quaternion conversion
//!
//! The engine composes rotations as `R = Ry(yaw) * Rx(pitch) * Rz(roll)`:
//! roll is applied first, yaw last. Every conversion in this module follows
//! that order.

use glam::{EulerRot, Mat3, Quat};
use serde::{Deserialize, Serialize};

/// Pitch/yaw/roll triple in radians.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewAngles {
    /// Rotation about X
    pub pitch: f32,
    /// Rotation about Y
    pub yaw: f32,
    /// Rotation about Z
    pub roll: f32,
}

impl ViewAngles {
    /// Zero rotation
    pub const IDENTITY: ViewAngles = ViewAngles::new(0.0, 0.0, 0.0);

    /// Create view angles from radians
    pub const fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self { pitch, yaw, roll }
    }

    /// Create view angles from degrees
    pub fn from_degrees(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self::new(pitch.to_radians(), yaw.to_radians(), roll.to_radians())
    }

    /// Convert a glTF-ordered (xyzw) quaternion to view angles.
    pub fn from_quat_xyzw(qx: f32, qy: f32, qz: f32, qw: f32) -> Self {
        quat_to_view_angles(qx, qy, qz, qw)
    }

    /// Convert a glam quaternion to view angles.
    pub fn from_quat(q: Quat) -> Self {
        quat_to_view_angles(q.x, q.y, q.z, q.w)
    }

    /// Build the quaternion equivalent to these angles.
    pub fn to_quat(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, self.roll)
    }

    /// Build the rotation matrix `Ry(yaw) * Rx(pitch) * Rz(roll)`.
    pub fn rotation_matrix(&self) -> Mat3 {
        Mat3::from_rotation_y(self.yaw)
            * Mat3::from_rotation_x(self.pitch)
            * Mat3::from_rotation_z(self.roll)
    }

    /// Pitch, yaw and roll in degrees
    pub fn to_degrees(&self) -> [f32; 3] {
        [
            self.pitch.to_degrees(),
            self.yaw.to_degrees(),
            self.roll.to_degrees(),
        ]
    }
}

/// Convert a quaternion (xyzw) into the pitch/yaw/roll triple matching the
/// engine's `Ry * Rx * Rz` composition.
///
/// Total for any input; the result is only meaningful for unit quaternions.
/// With `R` the rotation matrix of the quaternion:
///
/// - `R[1][2] = -sin(pitch)`
/// - `R[0][2] / R[2][2] = tan(yaw)`
/// - `R[1][0] / R[1][1] = tan(roll)`
pub fn quat_to_view_angles(qx: f32, qy: f32, qz: f32, qw: f32) -> ViewAngles {
    let r02 = 2.0 * (qx * qz + qw * qy);
    let r12 = 2.0 * (qy * qz - qw * qx);
    let r22 = 1.0 - 2.0 * (qx * qx + qy * qy);
    let r10 = 2.0 * (qx * qy + qw * qz);
    let r11 = 1.0 - 2.0 * (qx * qx + qz * qz);

    // Round-off on a near-unit quaternion can leave |r12| slightly above 1.
    let pitch = (-r12).clamp(-1.0, 1.0).asin();
    let yaw = r02.atan2(r22);
    let roll = r10.atan2(r11);

    ViewAngles { pitch, yaw, roll }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use quickcheck_macros::quickcheck;
    use std::f32::consts::FRAC_PI_2;

    const EPSILON: f32 = 1e-4;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    /// Map a u16 onto the open interval (-limit, limit).
    fn spread(raw: u16, limit: f32) -> f32 {
        (raw as f32 / u16::MAX as f32 * 2.0 - 1.0) * limit
    }

    #[test]
    fn identity_quaternion_is_zero_angles() {
        let angles = quat_to_view_angles(0.0, 0.0, 0.0, 1.0);
        assert_eq!(angles, ViewAngles::IDENTITY);
    }

    #[test]
    fn pure_yaw() {
        let q = Quat::from_rotation_y(0.7);
        let angles = ViewAngles::from_quat(q);
        assert!(close(angles.yaw, 0.7));
        assert!(close(angles.pitch, 0.0));
        assert!(close(angles.roll, 0.0));
    }

    #[test]
    fn pure_pitch_and_roll() {
        let pitch = ViewAngles::from_quat(Quat::from_rotation_x(-0.4));
        assert!(close(pitch.pitch, -0.4));
        let roll = ViewAngles::from_quat(Quat::from_rotation_z(1.2));
        assert!(close(roll.roll, 1.2));
        assert!(close(roll.yaw, 0.0));
    }

    #[test]
    fn pitch_is_clamped_past_unit_length() {
        // Slightly over-long quaternion at +90 degrees pitch.
        let s = 0.5_f32.sqrt() * 1.001;
        let angles = quat_to_view_angles(s, 0.0, 0.0, s);
        assert!(angles.pitch.is_finite());
        assert!(close(angles.pitch, FRAC_PI_2));
    }

    #[test]
    fn rotation_matrix_matches_quaternion() {
        let angles = ViewAngles::new(0.3, -1.1, 0.5);
        let v = Vec3::new(0.2, 1.0, -3.0);
        let by_matrix = angles.rotation_matrix() * v;
        let by_quat = angles.to_quat() * v;
        assert!(by_matrix.abs_diff_eq(by_quat, EPSILON));
    }

    #[test]
    fn degrees_round_trip() {
        let angles = ViewAngles::from_degrees(10.0, 20.0, 30.0);
        let [p, y, r] = angles.to_degrees();
        assert!((p - 10.0).abs() < 1e-3);
        assert!((y - 20.0).abs() < 1e-3);
        assert!((r - 30.0).abs() < 1e-3);
    }

    #[quickcheck]
    fn euler_quaternion_round_trip(p: u16, y: u16, r: u16) -> bool {
        // Stay clear of gimbal lock at |pitch| = pi/2 and the yaw/roll seam at pi.
        let original = ViewAngles::new(spread(p, 1.4), spread(y, 3.1), spread(r, 3.1));
        let q = original.to_quat();
        let back = quat_to_view_angles(q.x, q.y, q.z, q.w);
        close(back.pitch, original.pitch)
            && close(back.yaw, original.yaw)
            && close(back.roll, original.roll)
    }
}
