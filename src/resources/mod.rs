//! ECS resources made available to systems.
//!
//! Long-lived data injected into the ECS world and accessed by systems
//! during execution.
//!
//! Overview
//! - `gameconfig` – window, world and asset settings loaded from INI
//! - `scene` – ordered live entities, ticked and drawn each frame
//! - `texturestore` – shared textures keyed by path
//! - `worldtime` – simulation time and delta
pub mod gameconfig;
pub mod scene;
pub mod texturestore;
pub mod worldtime;
