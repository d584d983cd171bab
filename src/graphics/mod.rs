//! Renderable visuals attached to entities.
//!
//! A [`Graphic`] owns per-instance presentation state (clipping, offset,
//! scale, flip) and draws a unit quad at the current top of the renderer's
//! matrix stack. The owning entity positions it in the world.
//!
//! Submodules overview:
//! - [`image`] – textured quad sampling a region of a texture
//! - [`texture`] – GPU texture handle, image decoding and RGBA8 packing

pub mod image;
pub mod texture;

use thiserror::Error;

use crate::render::Renderer;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GraphicError {
    #[error("graphic was already destroyed")]
    AlreadyDestroyed,
}

/// Common capability set of every graphic variant.
pub trait Graphic {
    /// Advance presentation state by `delta` milliseconds.
    fn tick(&mut self, delta: u32);

    /// Draw a unit quad at the current transform.
    fn render(&self, gl: &mut dyn Renderer);

    /// Mirror horizontally. No-op when already flipped.
    fn flip_x(&mut self);

    /// Restore horizontal orientation. No-op when not flipped.
    fn unflip_x(&mut self);

    fn is_flipped(&self) -> bool;

    /// Return transient state to its initial configuration.
    fn reset(&mut self);

    /// Whether the owner may destroy this graphic when its entity dies.
    /// Shared or pooled graphics return false.
    fn disposable(&self) -> bool;

    /// Independent copy with the same presentation, owned by the caller.
    fn clone_graphic(&self) -> Box<dyn Graphic>;

    /// Release owned resources. A second call fails with
    /// [`GraphicError::AlreadyDestroyed`].
    fn destroy(&mut self, gl: &mut dyn Renderer) -> Result<(), GraphicError>;
}

impl Clone for Box<dyn Graphic> {
    fn clone(&self) -> Self {
        self.clone_graphic()
    }
}
