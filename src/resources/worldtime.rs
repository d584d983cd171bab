//! Simulation clock.
//!
//! `delta` is the scaled frame time in seconds; `delta_millis` is the same
//! value as whole milliseconds, which is what entity and graphic ticks take.

use bevy_ecs::prelude::Resource;

#[derive(Resource, Clone, Copy, Debug)]
pub struct WorldTime {
    pub elapsed: f32,
    pub delta: f32,
    pub time_scale: f32,
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}

impl WorldTime {
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }

    pub fn delta_millis(&self) -> u32 {
        (self.delta * 1000.0).round().max(0.0) as u32
    }
}
