//! High-level game setup.
//!
//! Builds the ECS world (config, clock, physics, textures, scene), spawns the
//! demo content, wires the per-frame update schedule and draws the scene in
//! world space. Both the windowed loop and the headless mode in `main` go
//! through here.

use bevy_ecs::prelude::*;
use log::{error, info, warn};
use raylib::prelude::Vector2;

use crate::entity::boxentity::BoxEntity;
use crate::graphics::Graphic;
use crate::graphics::image::{ClipRect, ImageGraphic};
use crate::graphics::texture::{ImageDecoder, TextureError};
use crate::physics::world::{BodyDef, FixtureDef, PhysicsError, PhysicsWorld, Shape};
use crate::render::Renderer;
use crate::resources::gameconfig::GameConfig;
use crate::resources::scene::Scene;
use crate::resources::texturestore::TextureStore;
use crate::resources::worldtime::WorldTime;
use crate::systems::physics::physics_step_system;
use crate::systems::scene::scene_tick_system;

const GROUND_HALF_WIDTH: f32 = 20.0;
const GROUND_HALF_HEIGHT: f32 = 0.5;
const SPAWN_HALF_SPREAD: f32 = 5.0;
const SPAWN_BASE_HEIGHT: f32 = 4.0;
const SPAWN_ROW_GAP: f32 = 1.5;

#[derive(Debug, thiserror::Error)]
pub enum SpawnError {
    #[error(transparent)]
    Texture(#[from] TextureError),
    #[error(transparent)]
    Physics(#[from] PhysicsError),
}

/// Physics world configured from the game settings.
pub fn create_physics(config: &GameConfig) -> PhysicsWorld {
    PhysicsWorld::new(config.gravity, config.max_substep)
}

/// Static ground slab with its top surface at y = 0.
pub fn create_ground(physics: &mut PhysicsWorld) -> Result<(), PhysicsError> {
    let ground = physics.create_body(&BodyDef {
        position: Vector2 {
            x: 0.0,
            y: -GROUND_HALF_HEIGHT,
        },
        ..BodyDef::default()
    })?;
    physics.create_fixture(
        ground,
        &FixtureDef::new(Shape::cuboid(GROUND_HALF_WIDTH, GROUND_HALF_HEIGHT)),
    )?;
    Ok(())
}

/// Drop `count` unit boxes textured with `texture` above the ground.
///
/// Every box shares the same texture; roughly half of them are mirrored.
pub fn spawn_boxes(
    physics: &mut PhysicsWorld,
    scene: &mut Scene,
    textures: &mut TextureStore,
    gl: &mut dyn Renderer,
    count: usize,
    texture: &str,
) -> Result<usize, SpawnError> {
    if count == 0 {
        return Ok(0);
    }
    // world is y-up, so sample the image bottom-to-top
    let prototype = ImageGraphic::from_path(texture, textures, gl)?
        .with_clipping(ClipRect::new(0.0, 1.0, 1.0, 0.0))
        .with_offset(Vector2 { x: -0.5, y: -0.5 });

    let positions: Vec<Vector2> = (0..count)
        .map(|i| Vector2 {
            x: (fastrand::f32() * 2.0 - 1.0) * SPAWN_HALF_SPREAD,
            y: SPAWN_BASE_HEIGHT + i as f32 * SPAWN_ROW_GAP,
        })
        .collect();
    let spawned = spawn_from_prototype(physics, scene, gl, prototype, &positions)?;

    info!("Spawned {} boxes with texture {:?}", spawned, texture);
    Ok(spawned)
}

/// One unit box per position, each with a clone of `prototype`.
///
/// The prototype never enters the scene and is destroyed before returning,
/// on success and on failure alike. Boxes spawned before a failure stay.
pub fn spawn_from_prototype(
    physics: &mut PhysicsWorld,
    scene: &mut Scene,
    gl: &mut dyn Renderer,
    mut prototype: ImageGraphic,
    positions: &[Vector2],
) -> Result<usize, SpawnError> {
    let result = positions.iter().try_for_each(|&position| {
        let mut graphic = prototype.clone_graphic();
        if fastrand::bool() {
            graphic.flip_x();
        }
        let entity = BoxEntity::new(physics, position, Shape::cuboid(0.5, 0.5), graphic)?;
        scene.spawn(Box::new(entity));
        Ok::<(), PhysicsError>(())
    });

    if let Err(e) = prototype.destroy(gl) {
        warn!("Failed to release prototype graphic: {}", e);
    }
    result?;
    Ok(positions.len())
}

/// Assemble the ECS world. Scene and textures are non-send since they hold
/// `Rc` textures tied to the GL context.
pub fn create_world(
    config: GameConfig,
    physics: PhysicsWorld,
    scene: Scene,
    textures: TextureStore,
) -> World {
    let mut world = World::new();
    world.insert_resource(WorldTime::default().with_time_scale(1.0));
    world.insert_resource(config);
    world.insert_resource(physics);
    world.insert_non_send_resource(scene);
    world.insert_non_send_resource(textures);
    world
}

/// Build everything a run needs: physics with ground, boxes, and the world.
pub fn setup(
    config: GameConfig,
    decoder: Box<dyn ImageDecoder>,
    gl: &mut dyn Renderer,
    boxes: usize,
    texture: &str,
) -> World {
    let mut physics = create_physics(&config);
    if let Err(e) = create_ground(&mut physics) {
        error!("Failed to create ground: {}", e);
    }
    let mut scene = Scene::new();
    let mut textures = TextureStore::new(config.texture_root.clone(), decoder);

    if let Err(e) = spawn_boxes(&mut physics, &mut scene, &mut textures, gl, boxes, texture) {
        error!("Failed to spawn boxes: {}", e);
    }

    create_world(config, physics, scene, textures)
}

/// Tick the scene, then step physics.
pub fn update_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems((scene_tick_system, physics_step_system).chain());
    schedule
}

/// Draw the scene in world space: origin at the bottom-center of the window,
/// one meter = `pixels_per_meter` pixels, y up.
pub fn render_world(world: &World, gl: &mut dyn Renderer) {
    let config = world.resource::<GameConfig>();
    let physics = world.resource::<PhysicsWorld>();
    let scene = world.non_send_resource::<Scene>();
    let ppm = config.pixels_per_meter;

    gl.push_matrix();
    gl.translate(
        config.window_width as f32 / 2.0,
        config.window_height as f32 * 0.9,
        0.0,
    );
    gl.scale(ppm, -ppm, 1.0);
    scene.render(physics, gl);
    gl.pop_matrix();
}

/// Despawn every entity, releasing bodies and textures.
pub fn teardown(world: &mut World, gl: &mut dyn Renderer) {
    let Some(mut scene) = world.remove_non_send_resource::<Scene>() else {
        return;
    };
    {
        let mut physics = world.resource_mut::<PhysicsWorld>();
        scene.clear(&mut physics, gl);
    }
    if let Some(mut textures) = world.get_non_send_resource_mut::<TextureStore>() {
        textures.prune();
        if !textures.is_empty() {
            warn!("{} texture(s) still alive after teardown", textures.len());
        }
    }
}
