//! Driller Engine main entry point.
//!
//! A 2D side-scrolling engine fragment written in Rust using:
//! - **raylib** (rlgl) for windowing and fixed-function style drawing
//! - **rapier2d** for rigid-body physics
//! - **bevy_ecs** for resources and the per-frame schedule
//!
//! This executable drops a pile of textured boxes onto a static ground.
//!
//! # Main Loop
//!
//! 1. Load `config.ini` (defaults on failure), open the window
//! 2. Create physics world, ground and boxes; insert everything as resources
//! 3. Each frame: update time, tick the scene, step physics, render
//! 4. On exit, despawn entities so bodies and textures are released
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --boxes 40 --texture box.png
//! cargo run -- --headless 120
//! ```

use clap::Parser;
use drillerengine::entity::Entity;
use drillerengine::game;
use drillerengine::graphics::texture::RaylibImageDecoder;
use drillerengine::physics::world::PhysicsWorld;
use drillerengine::render::recorder::RecordingRenderer;
use drillerengine::render::rlgl::RlglRenderer;
use drillerengine::resources::gameconfig::GameConfig;
use drillerengine::resources::scene::Scene;
use drillerengine::systems::time::update_world_time;
use raylib::prelude::*;
use std::path::PathBuf;

/// Driller Engine 2D
#[derive(Parser)]
#[command(version, about = "Textured boxes under rigid-body physics.")]
struct Cli {
    /// Path to the INI configuration file.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Number of boxes to drop.
    #[arg(long, default_value_t = 20)]
    boxes: usize,

    /// Texture for the boxes, relative to the configured texture root.
    #[arg(long, default_value = "box.png")]
    texture: String,

    /// Run this many frames without a window and print a summary.
    #[arg(long, value_name = "FRAMES")]
    headless: Option<u32>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = GameConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        log::warn!("{}; using defaults", e);
    }

    if let Some(frames) = cli.headless {
        run_headless(config, &cli, frames);
        return;
    }

    log::info!("Hello, world! This is the Driller Engine!");
    let (mut rl, thread) = raylib::init()
        .size(config.window_width as i32, config.window_height as i32)
        .title("Driller Engine")
        .build();
    rl.set_target_fps(config.target_fps);

    let mut gl = RlglRenderer::new(&thread);
    let mut world = game::setup(
        config,
        Box::new(RaylibImageDecoder),
        &mut gl,
        cli.boxes,
        &cli.texture,
    );
    let mut update = game::update_schedule();

    while !rl.window_should_close() {
        let dt = rl.get_frame_time();
        update_world_time(&mut world, dt);
        update.run(&mut world);

        let mut d = rl.begin_drawing(&thread);
        d.clear_background(Color::SKYBLUE);
        game::render_world(&world, &mut gl);
        d.draw_fps(10, 10);
    }

    game::teardown(&mut world, &mut gl);
    log::info!("Bye!");
}

/// Fixed-step loop against the recording renderer; no GL context needed.
fn run_headless(config: GameConfig, cli: &Cli, frames: u32) {
    let dt = 1.0 / config.target_fps.max(1) as f32;
    let mut gl = RecordingRenderer::new();
    let mut world = game::setup(
        config,
        Box::new(RaylibImageDecoder),
        &mut gl,
        cli.boxes,
        &cli.texture,
    );
    let mut update = game::update_schedule();

    let mut last_frame_commands = 0;
    for _ in 0..frames {
        update_world_time(&mut world, dt);
        update.run(&mut world);
        game::render_world(&world, &mut gl);
        last_frame_commands = gl.take_commands().len();
    }

    let scene = world.non_send_resource::<Scene>();
    let physics = world.resource::<PhysicsWorld>();
    log::info!(
        "Simulated {} frames: {} entities, {} draw commands in the last frame",
        frames,
        scene.len(),
        last_frame_commands
    );
    for id in scene.ids() {
        if let Some(pos) = scene.get(id).and_then(|e| e.position(physics)) {
            log::info!("  {:?} at ({:.2}, {:.2})", id, pos.x, pos.y);
        }
    }

    game::teardown(&mut world, &mut gl);
}
