//! Fixed-function 2D renderer abstraction.
//!
//! Graphics and entities draw through the [`Renderer`] trait, a small
//! immediate-mode state machine modelled on legacy OpenGL: a matrix stack,
//! a current color, a bound texture and quad emission. Two back ends exist:
//!
//! - [`rlgl`] – forwards every call to raylib's `rlgl` layer (needs an open window)
//! - [`recorder`] – records the call stream for tests and headless runs
//!
//! Texture upload and release also go through the renderer since both touch
//! GPU state.

pub mod recorder;
pub mod rlgl;

/// Sampler parameters a texture can be configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureParam {
    WrapS(TextureWrap),
    WrapT(TextureWrap),
    MinFilter(TextureFilter),
    MagFilter(TextureFilter),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureWrap {
    Clamp,
    Repeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFilter {
    Nearest,
    Linear,
}

/// Immediate-mode 2D state machine.
///
/// Rotation angles are in degrees. `pop_matrix` without a matching
/// `push_matrix` is a programmer error and trips a debug assertion.
pub trait Renderer {
    fn push_matrix(&mut self);
    fn pop_matrix(&mut self);
    fn translate(&mut self, x: f32, y: f32, z: f32);
    fn rotate(&mut self, degrees: f32, x: f32, y: f32, z: f32);
    fn scale(&mut self, x: f32, y: f32, z: f32);
    fn color4f(&mut self, r: f32, g: f32, b: f32, a: f32);

    fn enable_texture_2d(&mut self);
    fn disable_texture_2d(&mut self);
    fn bind_texture(&mut self, id: u32);

    fn begin_quads(&mut self);
    fn end(&mut self);
    fn tex_coord2f(&mut self, u: f32, v: f32);
    fn vertex2f(&mut self, x: f32, y: f32);

    /// Upload tightly packed RGBA8 texels. Returns the new texture id, or 0
    /// if the back end could not create the texture.
    fn load_texture_rgba8(&mut self, width: u32, height: u32, pixels: &[u8]) -> u32;
    fn texture_parameter(&mut self, id: u32, param: TextureParam);
    fn unload_texture(&mut self, id: u32);
}
