//! Per-frame player input
//!
//! The window layer fills one [`PlayerInput`] per frame from its key and
//! mouse events; the controller only ever sees this snapshot.

use serde::{Deserialize, Serialize};

/// Snapshot of the player's input for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    /// Horizontal mouse motion in counts since the last frame
    pub mouse_dx: f32,
    /// Vertical mouse motion in counts since the last frame
    pub mouse_dy: f32,
}

impl PlayerInput {
    /// No keys held and no mouse motion
    pub fn idle() -> Self {
        Self::default()
    }

    /// Movement axes as (forward, right), each in -1..=1.
    /// Opposing keys cancel out.
    pub fn move_axes(&self) -> (f32, f32) {
        let axis = |positive: bool, negative: bool| match (positive, negative) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        };
        (
            axis(self.forward, self.backward),
            axis(self.right, self.left),
        )
    }

    pub fn has_look(&self) -> bool {
        self.mouse_dx != 0.0 || self.mouse_dy != 0.0
    }
}
