//! Scene tick system.
//!
//! Ticks every entity in the [`Scene`] with the frame delta in milliseconds.

use bevy_ecs::prelude::*;

use crate::resources::scene::Scene;
use crate::resources::worldtime::WorldTime;

pub fn scene_tick_system(mut scene: NonSendMut<Scene>, time: Res<WorldTime>) {
    scene.tick(time.delta_millis());
}
