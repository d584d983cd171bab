//! Frame clock.
//!
//! Advances [`WorldTime`] once per frame before the update schedule runs.
//! Both the windowed loop and headless mode call it with the raw frame delta.
use bevy_ecs::prelude::*;

use crate::resources::worldtime::WorldTime;

/// Advance the clock by `dt` raw seconds.
///
/// Negative deltas count as zero. The stored `delta` is already scaled, so a
/// `time_scale` of 0 freezes physics and entity ticks while frames keep
/// counting.
pub fn update_world_time(world: &mut World, dt: f32) {
    let mut clock = world.resource_mut::<WorldTime>();
    let step = dt.max(0.0) * clock.time_scale;
    clock.delta = step;
    clock.elapsed += step;
    clock.frame_count += 1;
}
