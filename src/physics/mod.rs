//! Rigid-body simulation.
//!
//! - [`world`] – [`world::PhysicsWorld`], a thin rapier2d wrapper with a
//!   body/fixture factory and a sub-stepped `step`

pub mod world;
