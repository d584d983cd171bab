//! raylib `rlgl` back end for [`Renderer`].
//!
//! rlgl is raylib's OpenGL abstraction; in immediate mode it batches
//! `rlBegin`/`rlEnd` geometry and keeps a matrix stack, which is exactly the
//! fixed-function surface graphics are written against. All calls require a
//! live OpenGL context, so a [`RlglRenderer`] can only be built from the
//! [`RaylibThread`] token returned by `raylib::init()`.

use raylib::RaylibThread;
use raylib::ffi;

use super::{Renderer, TextureFilter, TextureParam, TextureWrap};

// rlgl.h constants (GL enum values).
const RL_QUADS: i32 = 0x0007;
const RL_TEXTURE_WRAP_S: i32 = 0x2802;
const RL_TEXTURE_WRAP_T: i32 = 0x2803;
const RL_TEXTURE_MAG_FILTER: i32 = 0x2800;
const RL_TEXTURE_MIN_FILTER: i32 = 0x2801;
const RL_TEXTURE_FILTER_NEAREST: i32 = 0x2600;
const RL_TEXTURE_FILTER_LINEAR: i32 = 0x2601;
const RL_TEXTURE_WRAP_REPEAT: i32 = 0x2901;
const RL_TEXTURE_WRAP_CLAMP: i32 = 0x812F;
// PIXELFORMAT_UNCOMPRESSED_R8G8B8A8
const PIXELFORMAT_R8G8B8A8: i32 = 7;

/// Renderer backed by raylib's rlgl immediate mode.
pub struct RlglRenderer {
    matrix_depth: usize,
    bound_texture: u32,
}

impl RlglRenderer {
    /// The thread token proves raylib (and its GL context) is initialised.
    pub fn new(_thread: &RaylibThread) -> Self {
        Self {
            matrix_depth: 0,
            bound_texture: 0,
        }
    }

    pub fn matrix_depth(&self) -> usize {
        self.matrix_depth
    }
}

fn wrap_value(wrap: TextureWrap) -> i32 {
    match wrap {
        TextureWrap::Clamp => RL_TEXTURE_WRAP_CLAMP,
        TextureWrap::Repeat => RL_TEXTURE_WRAP_REPEAT,
    }
}

fn filter_value(filter: TextureFilter) -> i32 {
    match filter {
        TextureFilter::Nearest => RL_TEXTURE_FILTER_NEAREST,
        TextureFilter::Linear => RL_TEXTURE_FILTER_LINEAR,
    }
}

impl Renderer for RlglRenderer {
    fn push_matrix(&mut self) {
        self.matrix_depth += 1;
        unsafe { ffi::rlPushMatrix() };
    }

    fn pop_matrix(&mut self) {
        debug_assert!(self.matrix_depth > 0, "pop_matrix without matching push_matrix");
        if self.matrix_depth == 0 {
            return;
        }
        self.matrix_depth -= 1;
        unsafe { ffi::rlPopMatrix() };
    }

    fn translate(&mut self, x: f32, y: f32, z: f32) {
        unsafe { ffi::rlTranslatef(x, y, z) };
    }

    fn rotate(&mut self, degrees: f32, x: f32, y: f32, z: f32) {
        unsafe { ffi::rlRotatef(degrees, x, y, z) };
    }

    fn scale(&mut self, x: f32, y: f32, z: f32) {
        unsafe { ffi::rlScalef(x, y, z) };
    }

    fn color4f(&mut self, r: f32, g: f32, b: f32, a: f32) {
        unsafe { ffi::rlColor4f(r, g, b, a) };
    }

    fn enable_texture_2d(&mut self) {
        // rlgl has no global texture enable; binding a non-zero id does it.
        if self.bound_texture != 0 {
            unsafe { ffi::rlSetTexture(self.bound_texture) };
        }
    }

    fn disable_texture_2d(&mut self) {
        self.bound_texture = 0;
        unsafe { ffi::rlSetTexture(0) };
    }

    fn bind_texture(&mut self, id: u32) {
        self.bound_texture = id;
        unsafe { ffi::rlSetTexture(id) };
    }

    fn begin_quads(&mut self) {
        unsafe { ffi::rlBegin(RL_QUADS) };
    }

    fn end(&mut self) {
        unsafe { ffi::rlEnd() };
    }

    fn tex_coord2f(&mut self, u: f32, v: f32) {
        unsafe { ffi::rlTexCoord2f(u, v) };
    }

    fn vertex2f(&mut self, x: f32, y: f32) {
        unsafe { ffi::rlVertex2f(x, y) };
    }

    fn load_texture_rgba8(&mut self, width: u32, height: u32, pixels: &[u8]) -> u32 {
        debug_assert_eq!(pixels.len(), width as usize * height as usize * 4);
        unsafe {
            ffi::rlLoadTexture(
                pixels.as_ptr() as *const std::ffi::c_void,
                width as i32,
                height as i32,
                PIXELFORMAT_R8G8B8A8,
                1,
            )
        }
    }

    fn texture_parameter(&mut self, id: u32, param: TextureParam) {
        let (name, value) = match param {
            TextureParam::WrapS(w) => (RL_TEXTURE_WRAP_S, wrap_value(w)),
            TextureParam::WrapT(w) => (RL_TEXTURE_WRAP_T, wrap_value(w)),
            TextureParam::MinFilter(f) => (RL_TEXTURE_MIN_FILTER, filter_value(f)),
            TextureParam::MagFilter(f) => (RL_TEXTURE_MAG_FILTER, filter_value(f)),
        };
        unsafe { ffi::rlTextureParameters(id, name, value) };
    }

    fn unload_texture(&mut self, id: u32) {
        if self.bound_texture == id {
            self.bound_texture = 0;
        }
        unsafe { ffi::rlUnloadTexture(id) };
    }
}
