/// Errors raised while registering scene geometry with the collision world.
#[derive(Debug, thiserror::Error)]
pub enum PhysicsError {
    #[error("mesh '{mesh}' cannot be used as a collider: {reason}")]
    InvalidMesh { mesh: String, reason: String },
}
