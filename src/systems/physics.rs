//! Physics step system.
//!
//! Advances the [`PhysicsWorld`] by the scaled frame delta. Runs after the
//! scene tick so entity logic sees the state the previous frame rendered.

use bevy_ecs::prelude::*;

use crate::physics::world::PhysicsWorld;
use crate::resources::worldtime::WorldTime;

pub fn physics_step_system(mut physics: ResMut<PhysicsWorld>, time: Res<WorldTime>) {
    physics.step(time.delta);
}
