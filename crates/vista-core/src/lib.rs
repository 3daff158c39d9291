//! Vista Core - Core types shared by the Vista crates
//!
//! This crate provides the foundational types used throughout the viewer:
//! - Mathematical primitives (re-exported from glam)
//! - View angles and the engine's rotation-composition convention
//! - Mesh-level transform state (scale, origin, rotation)

pub mod angles;
pub mod transform;

pub use angles::{quat_to_view_angles, ViewAngles};
pub use glam::{Mat3, Mat4, Quat, Vec2, Vec3, Vec4};
pub use transform::MeshTransform;
