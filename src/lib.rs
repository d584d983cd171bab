//! Driller Engine library.
//!
//! This module exposes the entity/graphic coupling layer of the game (physics
//! bodies drawn with stateful, clonable graphics) together with the ECS
//! resources and systems that drive it, for use in integration tests and as a
//! reusable library.

pub mod entity;
pub mod game;
pub mod graphics;
pub mod physics;
pub mod render;
pub mod resources;
pub mod systems;
