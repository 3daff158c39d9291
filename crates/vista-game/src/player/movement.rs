//! Movement configuration and direction helpers

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::input::PlayerInput;

/// Movement configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Horizontal speed in meters per second
    pub move_speed: f32,
    /// Upward velocity given by a jump
    pub jump_speed: f32,
    /// Vertical acceleration while airborne (negative is down)
    pub gravity: f32,
    /// Degrees of rotation per mouse count
    pub mouse_sensitivity: f32,
    /// Maximum look angle above or below the horizon, in degrees
    pub pitch_limit: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            jump_speed: 5.0,
            gravity: -20.0,
            mouse_sensitivity: 0.1,
            pitch_limit: 89.0,
        }
    }
}

impl MovementConfig {
    /// Mouse sensitivity in radians per count
    pub fn sensitivity_radians(&self) -> f32 {
        self.mouse_sensitivity.to_radians()
    }

    /// Pitch limit in radians
    pub fn pitch_limit_radians(&self) -> f32 {
        self.pitch_limit.to_radians()
    }
}

/// Horizontal forward direction for a yaw angle; yaw 0 looks down -Z.
pub fn forward_vector(yaw: f32) -> Vec3 {
    Vec3::new(-yaw.sin(), 0.0, -yaw.cos())
}

/// Horizontal right direction for a yaw angle.
pub fn right_vector(yaw: f32) -> Vec3 {
    Vec3::new(yaw.cos(), 0.0, -yaw.sin())
}

/// Normalized horizontal direction the input asks for, or zero.
pub fn wish_direction(input: &PlayerInput, yaw: f32) -> Vec3 {
    let (forward, right) = input.move_axes();
    (forward_vector(yaw) * forward + right_vector(yaw) * right).normalize_or_zero()
}
