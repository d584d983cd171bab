//! Engine systems.
//!
//! Submodules overview
//! - [`physics`] – step the physics world by the frame delta
//! - [`scene`] – tick every entity in the scene
//! - [`time`] – update simulation time and delta

pub mod physics;
pub mod scene;
pub mod time;
