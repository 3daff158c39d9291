//! Mesh-level transform state

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::angles::ViewAngles;

/// Local-to-world transform of a mesh: scale, then rotate, then move to origin.
///
/// Geometry is never baked with this transform; renderers and colliders apply
/// it on their side so the rotation can be replaced after import.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeshTransform {
    pub scale: Vec3,
    pub origin: Vec3,
    pub rotation: ViewAngles,
}

impl Default for MeshTransform {
    fn default() -> Self {
        Self {
            scale: Vec3::ONE,
            origin: Vec3::ZERO,
            rotation: ViewAngles::IDENTITY,
        }
    }
}

impl MeshTransform {
    /// Create a transform from its three parts
    pub fn new(scale: Vec3, origin: Vec3, rotation: ViewAngles) -> Self {
        Self {
            scale,
            origin,
            rotation,
        }
    }

    /// Create a transform at the given origin
    pub fn from_origin(origin: Vec3) -> Self {
        Self {
            origin,
            ..Default::default()
        }
    }

    /// Rotation as a quaternion
    pub fn rotation_quat(&self) -> Quat {
        self.rotation.to_quat()
    }

    /// Compute the model matrix `T * R * S`
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation_quat(), self.origin)
    }

    /// Transform a local-space point into world space
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.origin + self.rotation_quat() * (point * self.scale)
    }
}
