//! Vista Game - First-person player control
//!
//! Turns per-frame input into mouse look and collision-aware movement of the
//! player's character body.

pub mod input;
pub mod player;

pub use input::PlayerInput;
pub use player::{forward_vector, right_vector, wish_direction, MovementConfig, PlayerController};
