//! First-person player controller with mouse look and collision

use glam::{Quat, Vec3};
use vista_core::ViewAngles;
use vista_physics::{CharacterBody, PhysicsWorld};

use crate::input::PlayerInput;

use super::movement::wish_direction;
use super::MovementConfig;

/// Player controller handling look, movement, and physics
pub struct PlayerController {
    /// Movement configuration
    pub config: MovementConfig,
    /// Physics character body
    pub body: CharacterBody,
    /// Look direction; roll stays zero
    view: ViewAngles,
    /// Vertical velocity (jumping/falling)
    vertical_velocity: f32,
}

impl PlayerController {
    /// Create a new player controller
    pub fn new() -> Self {
        Self::with_config(MovementConfig::default())
    }

    /// Create a player controller with custom config
    pub fn with_config(config: MovementConfig) -> Self {
        Self {
            config,
            body: CharacterBody::new(),
            view: ViewAngles::IDENTITY,
            vertical_velocity: 0.0,
        }
    }

    /// Spawn the player with its body centred at `position`
    pub fn spawn(&mut self, physics: &mut PhysicsWorld, position: Vec3) {
        self.body.spawn(physics, position);
        self.vertical_velocity = 0.0;
    }

    /// Centre of the player's body
    pub fn position(&self) -> Vec3 {
        self.body.position
    }

    /// Camera position
    pub fn eye_position(&self) -> Vec3 {
        self.body.eye_position()
    }

    pub fn is_grounded(&self) -> bool {
        self.body.is_grounded()
    }

    pub fn view_angles(&self) -> ViewAngles {
        self.view
    }

    /// Camera orientation
    pub fn view_rotation(&self) -> Quat {
        self.view.to_quat()
    }

    pub fn vertical_velocity(&self) -> f32 {
        self.vertical_velocity
    }

    /// Apply mouse motion: yaw turns left for positive dx, pitch looks down
    /// for positive dy, and pitch is held within the configured limit.
    pub fn apply_look(&mut self, input: &PlayerInput) {
        let sensitivity = self.config.sensitivity_radians();
        let limit = self.config.pitch_limit_radians();
        self.view.yaw -= input.mouse_dx * sensitivity;
        self.view.pitch = (self.view.pitch - input.mouse_dy * sensitivity).clamp(-limit, limit);
    }

    /// Advance the player by one step
    pub fn update(&mut self, physics: &mut PhysicsWorld, input: &PlayerInput, dt: f32) {
        self.apply_look(input);

        let grounded = self.body.is_grounded();
        if grounded {
            if self.vertical_velocity < 0.0 {
                self.vertical_velocity = 0.0;
            }
            if input.jump {
                self.vertical_velocity = self.config.jump_speed;
            }
        } else {
            self.vertical_velocity += self.config.gravity * dt;
        }

        let horizontal = wish_direction(input, self.view.yaw) * self.config.move_speed;
        let desired = Vec3::new(horizontal.x, self.vertical_velocity, horizontal.z) * dt;
        let applied = self.body.move_character(physics, desired, dt);

        // Landing, or bumping a ceiling, stops vertical motion.
        if self.body.is_grounded() && self.vertical_velocity < 0.0 {
            self.vertical_velocity = 0.0;
        } else if self.vertical_velocity > 0.0 && applied.y < desired.y * 0.5 {
            self.vertical_velocity = 0.0;
        }
    }

    /// Teleport the player to a position
    pub fn teleport(&mut self, physics: &mut PhysicsWorld, position: Vec3) {
        self.body.set_position(physics, position);
        self.vertical_velocity = 0.0;
    }
}

impl Default for PlayerController {
    fn default() -> Self {
        Self::new()
    }
}
