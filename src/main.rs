//! Vista - glTF scene viewer
//!
//! Imports a scene, registers its meshes with the collision world, drops the
//! first-person player into it and reports where the player comes to rest.

mod cli;
mod settings;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use vista_assets::{import_scene, ImportedScene};
use vista_game::{PlayerController, PlayerInput};
use vista_physics::PhysicsWorld;
use vista_render::DrawList;

use cli::Cli;
use settings::ViewerSettings;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli::initialize_tracing(&cli.log_filter, cli.log_format);

    let mut settings = match &cli.settings {
        Some(path) => ViewerSettings::load_from(path),
        None => ViewerSettings::load(),
    };
    if let Some(spawn) = cli.spawn {
        settings.viewer.spawn = spawn;
    }
    if let Some(ticks) = cli.settle_ticks {
        settings.viewer.settle_ticks = ticks;
    }
    if cli.save_settings {
        match &cli.settings {
            Some(path) => settings.save_to(path)?,
            None => {
                settings.save()?;
            }
        }
    }

    let scene = import_scene(&cli.scene)
        .with_context(|| format!("Failed to load scene {}", cli.scene.display()))?;
    log_scene(&scene);

    let draw_list = DrawList::from_meshes(&scene.meshes);
    info!(
        draw_items = draw_list.len(),
        triangles = draw_list.triangle_count(),
        texture_uploads = draw_list.uploads().len(),
        "Prepared draw list"
    );

    let mut physics = PhysicsWorld::with_config(settings.physics.clone());
    let mut colliders = 0;
    for mesh in &scene.meshes {
        match physics.add_mesh_collider(mesh) {
            Ok(_) => colliders += 1,
            Err(error) => warn!(%error, "Skipping collider"),
        }
    }
    physics.update_queries();
    info!(colliders, "Built collision world");

    let mut player = PlayerController::with_config(settings.player.clone());
    player.spawn(&mut physics, settings.viewer.spawn);

    let dt = settings.physics.timestep;
    let idle = PlayerInput::idle();
    for _ in 0..settings.viewer.settle_ticks {
        physics.step();
        player.update(&mut physics, &idle, dt);
    }

    let eye = player.eye_position();
    info!(
        x = eye.x,
        y = eye.y,
        z = eye.z,
        grounded = player.is_grounded(),
        ticks = settings.viewer.settle_ticks,
        "Player settled"
    );
    if !player.is_grounded() {
        warn!("Player is not standing on any scene geometry");
    }

    Ok(())
}

fn log_scene(scene: &ImportedScene) {
    for mesh in &scene.meshes {
        let origin = mesh.origin();
        let rotation = mesh.rotation().to_degrees();
        info!(
            mesh = %mesh.label(),
            vertices = mesh.vertices().len(),
            triangles = mesh.triangles().len(),
            textured = mesh.base_color().is_some(),
            origin = ?origin.to_array(),
            rotation = ?rotation,
            "Mesh"
        );
    }
    let stats = scene.stats;
    info!(
        meshes = stats.assembled,
        primitives = stats.primitives,
        skipped_mode = stats.skipped_mode,
        skipped_invalid = stats.skipped_invalid,
        textures = stats.textures,
        "Scene ready"
    );
}
