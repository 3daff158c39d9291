//! Player controller module
//!
//! Provides first-person player movement with physics integration.

mod controller;
mod movement;

pub use controller::PlayerController;
pub use movement::{forward_vector, right_vector, wish_direction, MovementConfig};
