//! ropedemo - headless run of a rope hung from a circling vehicle.
//!
//! Drives the host loop by hand: moves the vehicle, ticks the rope, deploys it,
//! lets it sway, pulls it back up and deletes it.

mod config;
mod flight;

use std::path::PathBuf;

use anyhow::{Context, Result};
use engine_core::{ModelCatalog, SandboxWorld, Time, WorldObjects};
use glam::Vec3;
use procgen::Heightfield;
use rand::{Rng, SeedableRng};
use rope::{DeploymentState, FrameOutcome, Rope};

use config::DemoConfig;
use flight::Orbit;

/// Built-in model table used when the config names none.
const DEFAULT_MODELS: &str = r#"(
    models: [
        (name: "prop_rope_seg", extent: (0.08, 0.08, 0.5)),
        (name: "prop_chain_link", extent: (0.25, 0.1, 1.0)),
        (name: "prop_cable_heavy", extent: (0.2, 0.2, 2.0)),
    ],
)"#;

fn load_catalog(config: &DemoConfig) -> Result<ModelCatalog> {
    match &config.models_path {
        Some(path) => ModelCatalog::load(path).with_context(|| format!("loading models from {:?}", path)),
        None => ModelCatalog::from_ron(DEFAULT_MODELS).context("parsing built-in model table"),
    }
}

fn run() -> Result<()> {
    let config_arg = std::env::args().nth(1).map(PathBuf::from);
    let config = DemoConfig::load(config_arg.as_deref());
    let catalog = load_catalog(&config)?;

    let terrain = Heightfield::new(config.terrain.clone());
    let mut world = SandboxWorld::new(catalog, terrain);

    let mut rng = rand::rngs::StdRng::seed_from_u64(config.seed);
    let mut orbit = Orbit {
        center: Vec3::ZERO,
        radius: config.orbit_radius,
        speed: config.orbit_speed,
        angle: rng.gen_range(0.0..std::f32::consts::TAU),
        hover: config.hover_height,
    };

    let start = orbit.position(&world);
    let vehicle = world.spawn_vehicle(start);
    log::info!("Vehicle spawned at ({:.1}, {:.1}, {:.1})", start.x, start.y, start.z);

    let mut rope = Rope::create_with_config(
        &mut world,
        start,
        DeploymentState::Undeployed,
        &config.segment_model,
        &config.rope,
    )
    .with_context(|| format!("building rope from `{}`", config.segment_model))?;
    rope.attach_to_vehicle(vehicle);
    rope.start_deploying();

    let mut time = Time::fixed(config.fixed_step);
    let undeploy_frame = config.undeploy_frame();
    let mut skipped = 0u32;
    let mut markers = 0usize;
    let mut last_state = rope.state();

    for frame in 0..config.frames {
        time.update();
        let dt = time.delta_seconds();

        orbit.step(dt);
        let position = orbit.position(&world);
        world.set_object_position(vehicle, position);

        if frame == undeploy_frame {
            log::info!("Frame {}: pulling rope up", frame);
            rope.start_undeploying();
        }

        if rope.update(&mut world, dt) == FrameOutcome::Skipped {
            skipped += 1;
        }
        markers += world.take_markers().len();

        if rope.state() != last_state {
            log::info!(
                "Frame {} ({:.2}s): {:?} -> {:?}",
                frame,
                time.elapsed_seconds(),
                last_state,
                rope.state()
            );
            last_state = rope.state();
        }

        if frame % 60 == 0 {
            let free_end = rope
                .segments()
                .last()
                .and_then(|&s| world.object_position(s))
                .unwrap_or(rope.anchor());
            log::debug!(
                "Frame {}: progress {:.2}, wind {:.3}, free end z={:.2}",
                frame,
                rope.progress(),
                rope.wind_phase(),
                free_end.z
            );
        }
    }

    let released = rope.delete(&mut world);
    world.despawn(vehicle);

    log::info!(
        "Done: {} frames, {} skipped, {} segments released, {} debug markers, {} objects left",
        time.frame_count(),
        skipped,
        released,
        markers,
        world.object_count()
    );
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(e) = run() {
        log::error!("ropedemo failed: {:#}", e);
        std::process::exit(1);
    }
}
