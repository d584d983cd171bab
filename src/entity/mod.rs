//! World participants.
//!
//! An [`Entity`] couples a physics body with a [`Graphic`]: it reports the
//! body's live position, advances its visual each tick, and renders the
//! graphic at the body's world transform. The physics world is passed in
//! explicitly; entities only hold handles into it.
//!
//! - [`boxentity`] – dynamic rigid body drawn with any graphic

pub mod boxentity;

use raylib::prelude::Vector2;
use thiserror::Error;

use crate::graphics::{Graphic, GraphicError};
use crate::physics::world::{BodyHandle, PhysicsError, PhysicsWorld};
use crate::render::Renderer;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EntityError {
    #[error(transparent)]
    Physics(#[from] PhysicsError),
    #[error(transparent)]
    Graphic(#[from] GraphicError),
}

pub trait Entity {
    /// Current world position of the body; `None` if the body is gone.
    fn position(&self, world: &PhysicsWorld) -> Option<Vector2>;

    fn body(&self) -> BodyHandle;

    fn graphic(&self) -> &dyn Graphic;

    fn graphic_mut(&mut self) -> &mut dyn Graphic;

    /// Per-frame update, `delta` in milliseconds.
    fn tick(&mut self, delta: u32);

    fn render(&self, world: &PhysicsWorld, gl: &mut dyn Renderer);

    /// Remove the body from `world` and destroy the graphic if it is
    /// disposable. Both steps always run; the first failure is returned.
    fn destroy(&mut self, world: &mut PhysicsWorld, gl: &mut dyn Renderer)
    -> Result<(), EntityError>;
}
