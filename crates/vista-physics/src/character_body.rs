//! Box-shaped player body moved by rapier3d's kinematic character controller

use glam::Vec3;
use rapier3d::control::{CharacterAutostep, CharacterLength, KinematicCharacterController};
use rapier3d::prelude::*;

use crate::PhysicsWorld;

/// Character body configuration
#[derive(Debug, Clone)]
pub struct CharacterBodyConfig {
    /// Box half extents (default: 0.25 x 0.9 x 0.25)
    pub half_extents: Vec3,
    /// Eye height above the body centre (default: 0.75)
    pub eye_offset: f32,
    /// Maximum slope angle in degrees (default: 45)
    pub max_slope_angle: f32,
    /// Step height for climbing stairs (default: 0.25m)
    pub step_height: f32,
    /// Skin width for collision detection (default: 0.02m)
    pub skin_width: f32,
    /// Maximum ground snap distance, `None` to disable snapping
    pub ground_snap_distance: Option<f32>,
}

impl Default for CharacterBodyConfig {
    fn default() -> Self {
        Self {
            half_extents: Vec3::new(0.25, 0.9, 0.25),
            eye_offset: 0.75,
            max_slope_angle: 45.0,
            step_height: 0.25,
            skin_width: 0.02,
            ground_snap_distance: Some(0.2),
        }
    }
}

/// The player's collision body. `position` is the centre of the box.
pub struct CharacterBody {
    pub config: CharacterBodyConfig,
    pub position: Vec3,
    grounded: bool,
    collider_handle: Option<ColliderHandle>,
    controller: KinematicCharacterController,
}

impl CharacterBody {
    pub fn new() -> Self {
        Self::with_config(CharacterBodyConfig::default())
    }

    pub fn with_config(config: CharacterBodyConfig) -> Self {
        let mut controller = KinematicCharacterController::default();
        controller.max_slope_climb_angle = config.max_slope_angle.to_radians();
        controller.min_slope_slide_angle = config.max_slope_angle.to_radians();
        controller.autostep = Some(CharacterAutostep {
            max_height: CharacterLength::Absolute(config.step_height),
            min_width: CharacterLength::Relative(0.5),
            include_dynamic_bodies: false,
        });
        controller.snap_to_ground = config.ground_snap_distance.map(CharacterLength::Absolute);
        controller.offset = CharacterLength::Absolute(config.skin_width);

        Self {
            config,
            position: Vec3::ZERO,
            grounded: false,
            collider_handle: None,
            controller,
        }
    }

    /// Insert the body's collider into the world, centred at `position`.
    pub fn spawn(&mut self, physics: &mut PhysicsWorld, position: Vec3) -> ColliderHandle {
        self.position = position;
        self.grounded = false;

        let half = self.config.half_extents;
        let collider = ColliderBuilder::cuboid(half.x, half.y, half.z)
            .translation(vector![position.x, position.y, position.z])
            .friction(0.0)
            .restitution(0.0)
            .build();

        let handle = physics.add_static_collider(collider);
        self.collider_handle = Some(handle);
        handle
    }

    /// Move by `desired_translation`, sliding along whatever it hits.
    ///
    /// Returns the translation actually applied. Does nothing before
    /// [`CharacterBody::spawn`].
    pub fn move_character(
        &mut self,
        physics: &mut PhysicsWorld,
        desired_translation: Vec3,
        dt: f32,
    ) -> Vec3 {
        let Some(collider_handle) = self.collider_handle else {
            return Vec3::ZERO;
        };
        let Some(collider) = physics.collider_set.get(collider_handle) else {
            return Vec3::ZERO;
        };

        let shape = collider.shape();
        let current_pos = Isometry::translation(self.position.x, self.position.y, self.position.z);

        let movement = self.controller.move_shape(
            dt,
            &physics.rigid_body_set,
            &physics.collider_set,
            physics.query_pipeline(),
            shape,
            &current_pos,
            vector![desired_translation.x, desired_translation.y, desired_translation.z],
            QueryFilter::default().exclude_collider(collider_handle),
            |_| {},
        );

        self.grounded = movement.grounded;
        let applied = Vec3::new(
            movement.translation.x,
            movement.translation.y,
            movement.translation.z,
        );
        self.position += applied;
        self.sync_collider(physics);
        applied
    }

    /// Teleport the body.
    pub fn set_position(&mut self, physics: &mut PhysicsWorld, position: Vec3) {
        self.position = position;
        self.grounded = false;
        self.sync_collider(physics);
    }

    fn sync_collider(&self, physics: &mut PhysicsWorld) {
        if let Some(handle) = self.collider_handle {
            if let Some(collider) = physics.collider_set.get_mut(handle) {
                collider.set_translation(vector![self.position.x, self.position.y, self.position.z]);
            }
        }
    }

    /// Camera position: `eye_offset` above the centre.
    pub fn eye_position(&self) -> Vec3 {
        self.position + Vec3::Y * self.config.eye_offset
    }

    /// Bottom of the box.
    pub fn feet_position(&self) -> Vec3 {
        self.position - Vec3::Y * self.config.half_extents.y
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn collider(&self) -> Option<ColliderHandle> {
        self.collider_handle
    }
}

impl Default for CharacterBody {
    fn default() -> Self {
        Self::new()
    }
}
