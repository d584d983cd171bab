//! Textured-quad graphic.
//!
//! [`ImageGraphic`] samples a [`ClipRect`] region of a shared [`Texture`]
//! onto the unit quad (0,0)-(1,1). Horizontal flipping swaps the clip's
//! `u0`/`u1`; the `flipped` flag always agrees with `u0 > u1`.
//!
//! Scale is a runtime-only knob: clones start at unit scale and owners that
//! care re-apply it.

use std::rc::Rc;

use log::debug;
use raylib::prelude::Vector2;

use crate::graphics::texture::{Texture, TextureError};
use crate::graphics::{Graphic, GraphicError};
use crate::render::Renderer;
use crate::resources::texturestore::TextureStore;

/// Texture-space sub-rectangle sampled onto the quad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipRect {
    pub u0: f32,
    pub v0: f32,
    pub u1: f32,
    pub v1: f32,
}

impl ClipRect {
    pub const FULL: ClipRect = ClipRect {
        u0: 0.0,
        v0: 0.0,
        u1: 1.0,
        v1: 1.0,
    };

    pub fn new(u0: f32, v0: f32, u1: f32, v1: f32) -> Self {
        Self { u0, v0, u1, v1 }
    }

    /// Same rectangle with `u0` and `u1` swapped.
    pub fn swapped_u(self) -> Self {
        Self {
            u0: self.u1,
            u1: self.u0,
            ..self
        }
    }

    pub fn is_mirrored(&self) -> bool {
        self.u0 > self.u1
    }
}

fn is_finite(v: Vector2) -> bool {
    v.x.is_finite() && v.y.is_finite()
}

impl Default for ClipRect {
    fn default() -> Self {
        Self::FULL
    }
}

#[derive(Debug)]
pub struct ImageGraphic {
    texture: Option<Rc<Texture>>,
    clipping: ClipRect,
    offset: Vector2,
    scale: Vector2,
    flipped: bool,
}

impl ImageGraphic {
    /// Full image, zero offset, unit scale, unflipped.
    pub fn new(texture: Rc<Texture>) -> Self {
        Self {
            texture: Some(texture),
            clipping: ClipRect::FULL,
            offset: Vector2 { x: 0.0, y: 0.0 },
            scale: Vector2 { x: 1.0, y: 1.0 },
            flipped: false,
        }
    }

    /// Load (or reuse) the texture at `path` through the store.
    pub fn from_path(
        path: &str,
        textures: &mut TextureStore,
        gl: &mut dyn Renderer,
    ) -> Result<Self, TextureError> {
        let texture = textures.load(path, gl)?;
        Ok(Self::new(texture))
    }

    /// Rebuild from a clipping and offset. Scale starts at (1, 1); the flip
    /// state is read off the clipping.
    pub fn from_parts(texture: Rc<Texture>, clipping: ClipRect, offset: Vector2) -> Self {
        Self::new(texture).with_clipping(clipping).with_offset(offset)
    }

    /// A clipping given with `u0 > u1` counts as already flipped.
    pub fn with_clipping(mut self, clipping: ClipRect) -> Self {
        self.flipped = clipping.is_mirrored();
        self.clipping = clipping;
        self
    }

    pub fn with_offset(mut self, offset: Vector2) -> Self {
        self.set_offset(offset);
        self
    }

    pub fn clipping(&self) -> ClipRect {
        self.clipping
    }

    pub fn offset(&self) -> Vector2 {
        self.offset
    }

    pub fn set_offset(&mut self, offset: Vector2) {
        debug_assert!(is_finite(offset), "non-finite offset {:?}", offset);
        self.offset = offset;
    }

    pub fn scale(&self) -> Vector2 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: Vector2) {
        debug_assert!(is_finite(scale), "non-finite scale {:?}", scale);
        self.scale = scale;
    }

    /// `None` once destroyed.
    pub fn texture(&self) -> Option<&Rc<Texture>> {
        self.texture.as_ref()
    }

    pub fn is_destroyed(&self) -> bool {
        self.texture.is_none()
    }
}

impl Graphic for ImageGraphic {
    fn tick(&mut self, _delta: u32) {}

    fn render(&self, gl: &mut dyn Renderer) {
        let Some(texture) = &self.texture else {
            return;
        };
        let c = self.clipping;

        gl.push_matrix();
        gl.color4f(1.0, 1.0, 1.0, 1.0);

        gl.enable_texture_2d();
        gl.bind_texture(texture.id());

        // scale first: the offset is in the scaled local frame
        gl.scale(self.scale.x, self.scale.y, 1.0);
        gl.translate(self.offset.x, self.offset.y, 0.0);

        gl.begin_quads();
        gl.tex_coord2f(c.u0, c.v0);
        gl.vertex2f(0.0, 0.0);

        gl.tex_coord2f(c.u1, c.v0);
        gl.vertex2f(1.0, 0.0);

        gl.tex_coord2f(c.u1, c.v1);
        gl.vertex2f(1.0, 1.0);

        gl.tex_coord2f(c.u0, c.v1);
        gl.vertex2f(0.0, 1.0);
        gl.end();

        gl.disable_texture_2d();
        gl.pop_matrix();
    }

    fn flip_x(&mut self) {
        if !self.flipped {
            self.flipped = true;
            self.clipping = self.clipping.swapped_u();
        }
    }

    fn unflip_x(&mut self) {
        if self.flipped {
            self.flipped = false;
            self.clipping = self.clipping.swapped_u();
        }
    }

    fn is_flipped(&self) -> bool {
        self.flipped
    }

    fn reset(&mut self) {}

    fn disposable(&self) -> bool {
        true
    }

    fn clone_graphic(&self) -> Box<dyn Graphic> {
        match &self.texture {
            Some(texture) => Box::new(ImageGraphic::from_parts(
                Rc::clone(texture),
                self.clipping,
                self.offset,
            )),
            None => Box::new(ImageGraphic {
                texture: None,
                clipping: self.clipping,
                offset: self.offset,
                scale: Vector2 { x: 1.0, y: 1.0 },
                flipped: self.flipped,
            }),
        }
    }

    fn destroy(&mut self, gl: &mut dyn Renderer) -> Result<(), GraphicError> {
        let texture = self.texture.take().ok_or(GraphicError::AlreadyDestroyed)?;
        // Last owner releases the GPU texture.
        match Rc::try_unwrap(texture) {
            Ok(texture) => texture.destroy(gl),
            Err(shared) => debug!(
                "Texture {} still shared by {} graphic(s)",
                shared.id(),
                Rc::strong_count(&shared) - 1
            ),
        }
        self.clipping = ClipRect::FULL;
        self.offset = Vector2 { x: 0.0, y: 0.0 };
        self.scale = Vector2 { x: 1.0, y: 1.0 };
        self.flipped = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::texture::DecodedImage;
    use crate::render::recorder::{DrawCommand, RecordingRenderer};
    use std::path::PathBuf;

    fn texture(gl: &mut RecordingRenderer) -> Rc<Texture> {
        let image = DecodedImage {
            path: PathBuf::from("test.png"),
            width: 2,
            height: 2,
            pixels: vec![0xFFFFFFFF; 4],
        };
        Rc::new(Texture::from_image(&image, gl).expect("upload"))
    }

    fn clip(u0: f32, v0: f32, u1: f32, v1: f32) -> ClipRect {
        ClipRect::new(u0, v0, u1, v1)
    }

    fn vec_approx_eq(a: Vector2, b: Vector2) -> bool {
        (a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6
    }

    // ==================== CONSTRUCTION TESTS ====================

    #[test]
    fn test_new_defaults() {
        let mut gl = RecordingRenderer::new();
        let g = ImageGraphic::new(texture(&mut gl));
        assert_eq!(g.clipping(), ClipRect::FULL);
        assert!(vec_approx_eq(g.offset(), Vector2 { x: 0.0, y: 0.0 }));
        assert!(vec_approx_eq(g.scale(), Vector2 { x: 1.0, y: 1.0 }));
        assert!(!g.is_flipped());
        assert!(g.disposable());
    }

    #[test]
    fn test_with_mirrored_clipping_counts_as_flipped() {
        let mut gl = RecordingRenderer::new();
        let mut g = ImageGraphic::new(texture(&mut gl)).with_clipping(clip(0.75, 0.0, 0.25, 1.0));
        assert!(g.is_flipped());
        g.unflip_x();
        assert_eq!(g.clipping(), clip(0.25, 0.0, 0.75, 1.0));
    }

    #[test]
    fn test_from_parts_reads_flip_from_clipping() {
        let mut gl = RecordingRenderer::new();
        let tex = texture(&mut gl);
        let offset = Vector2 { x: -0.5, y: -0.5 };

        let mut plain =
            ImageGraphic::from_parts(Rc::clone(&tex), clip(0.25, 0.0, 0.75, 1.0), offset);
        assert!(!plain.is_flipped());
        plain.unflip_x();
        assert_eq!(plain.clipping(), clip(0.25, 0.0, 0.75, 1.0));

        let mut mirrored = ImageGraphic::from_parts(tex, clip(0.75, 0.0, 0.25, 1.0), offset);
        assert!(mirrored.is_flipped());
        mirrored.unflip_x();
        assert_eq!(mirrored.clipping(), clip(0.25, 0.0, 0.75, 1.0));
        assert!(!mirrored.is_flipped());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "non-finite offset")]
    fn test_non_finite_offset_panics_in_debug() {
        let mut gl = RecordingRenderer::new();
        let _ = ImageGraphic::new(texture(&mut gl)).with_offset(Vector2 {
            x: f32::NAN,
            y: 0.0,
        });
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "non-finite scale")]
    fn test_non_finite_scale_panics_in_debug() {
        let mut gl = RecordingRenderer::new();
        let mut g = ImageGraphic::new(texture(&mut gl));
        g.set_scale(Vector2 {
            x: 1.0,
            y: f32::INFINITY,
        });
    }

    // ==================== FLIP TESTS ====================

    #[test]
    fn test_flip_swaps_only_u() {
        let mut gl = RecordingRenderer::new();
        let mut g = ImageGraphic::new(texture(&mut gl)).with_clipping(clip(0.25, 0.0, 0.75, 1.0));
        g.flip_x();
        assert_eq!(g.clipping(), clip(0.75, 0.0, 0.25, 1.0));
        assert!(g.is_flipped());

        g.flip_x();
        assert_eq!(g.clipping(), clip(0.75, 0.0, 0.25, 1.0));
        assert!(g.is_flipped());
    }

    #[test]
    fn test_flip_then_unflip_restores_clipping() {
        let mut gl = RecordingRenderer::new();
        let original = clip(0.1, 0.2, 0.3, 0.4);
        let mut g = ImageGraphic::new(texture(&mut gl)).with_clipping(original);
        g.flip_x();
        g.unflip_x();
        assert_eq!(g.clipping(), original);
        assert!(!g.is_flipped());
    }

    #[test]
    fn test_unflip_on_unflipped_is_noop() {
        let mut gl = RecordingRenderer::new();
        let mut g = ImageGraphic::new(texture(&mut gl));
        g.unflip_x();
        assert_eq!(g.clipping(), ClipRect::FULL);
        assert!(!g.is_flipped());
    }

    // ==================== CLONE TESTS ====================

    #[test]
    fn test_clone_is_independent() {
        let mut gl = RecordingRenderer::new();
        let a = ImageGraphic::new(texture(&mut gl)).with_clipping(clip(0.0, 0.0, 0.5, 0.5));
        let mut b = a.clone_graphic();
        b.flip_x();
        assert!(b.is_flipped());
        assert!(!a.is_flipped());
        assert_eq!(a.clipping(), clip(0.0, 0.0, 0.5, 0.5));
    }

    #[test]
    fn test_clone_shares_texture_and_resets_scale() {
        let mut gl = RecordingRenderer::new();
        let tex = texture(&mut gl);
        let mut a = ImageGraphic::new(Rc::clone(&tex)).with_offset(Vector2 { x: 0.5, y: 0.25 });
        a.set_scale(Vector2 { x: 3.0, y: 2.0 });
        let b = a.clone_graphic();
        assert_eq!(Rc::strong_count(&tex), 3);

        b.render(&mut gl);
        assert!(gl.commands().contains(&DrawCommand::Scale(1.0, 1.0, 1.0)));
        assert!(gl.commands().contains(&DrawCommand::Translate(0.5, 0.25, 0.0)));
    }

    // ==================== RENDER TESTS ====================

    #[test]
    fn test_render_command_stream() {
        let mut gl = RecordingRenderer::new();
        let tex = texture(&mut gl);
        let id = tex.id();
        let g = ImageGraphic::new(tex).with_clipping(clip(0.25, 0.0, 0.75, 1.0));
        g.render(&mut gl);

        assert_eq!(
            gl.commands(),
            &[
                DrawCommand::PushMatrix,
                DrawCommand::Color4f(1.0, 1.0, 1.0, 1.0),
                DrawCommand::EnableTexture2D,
                DrawCommand::BindTexture(id),
                DrawCommand::Scale(1.0, 1.0, 1.0),
                DrawCommand::Translate(0.0, 0.0, 0.0),
                DrawCommand::BeginQuads,
                DrawCommand::TexCoord2f(0.25, 0.0),
                DrawCommand::Vertex2f(0.0, 0.0),
                DrawCommand::TexCoord2f(0.75, 0.0),
                DrawCommand::Vertex2f(1.0, 0.0),
                DrawCommand::TexCoord2f(0.75, 1.0),
                DrawCommand::Vertex2f(1.0, 1.0),
                DrawCommand::TexCoord2f(0.25, 1.0),
                DrawCommand::Vertex2f(0.0, 1.0),
                DrawCommand::End,
                DrawCommand::DisableTexture2D,
                DrawCommand::PopMatrix,
            ]
        );
        assert_eq!(gl.matrix_depth(), 0);
    }

    #[test]
    fn test_render_flipped_tex_coords() {
        let mut gl = RecordingRenderer::new();
        let mut g = ImageGraphic::new(texture(&mut gl));
        g.flip_x();
        g.render(&mut gl);
        assert_eq!(
            gl.tex_coords(),
            vec![(1.0, 0.0), (0.0, 0.0), (0.0, 1.0), (1.0, 1.0)]
        );
    }

    #[test]
    fn test_scale_does_not_change_offset_translation() {
        let mut gl = RecordingRenderer::new();
        let mut g = ImageGraphic::new(texture(&mut gl)).with_offset(Vector2 { x: 0.5, y: -0.5 });

        g.set_scale(Vector2 { x: 2.0, y: 2.0 });
        g.render(&mut gl);
        let first = gl.take_commands();

        g.set_scale(Vector2 { x: 4.0, y: 4.0 });
        g.render(&mut gl);
        let second = gl.take_commands();

        let scale_at = |cmds: &[DrawCommand]| {
            cmds.iter()
                .position(|c| matches!(c, DrawCommand::Scale(..)))
                .expect("scale")
        };
        let translate_at = |cmds: &[DrawCommand]| {
            cmds.iter()
                .position(|c| matches!(c, DrawCommand::Translate(..)))
                .expect("translate")
        };
        assert!(scale_at(&first) < translate_at(&first));
        assert_eq!(first[scale_at(&first)], DrawCommand::Scale(2.0, 2.0, 1.0));
        assert_eq!(second[scale_at(&second)], DrawCommand::Scale(4.0, 4.0, 1.0));
        assert_eq!(
            first[translate_at(&first)],
            DrawCommand::Translate(0.5, -0.5, 0.0)
        );
        assert_eq!(
            second[translate_at(&second)],
            DrawCommand::Translate(0.5, -0.5, 0.0)
        );
    }

    // ==================== DESTROY TESTS ====================

    #[test]
    fn test_destroy_releases_last_texture_and_clears_state() {
        let mut gl = RecordingRenderer::new();
        let mut g = ImageGraphic::new(texture(&mut gl)).with_offset(Vector2 { x: 1.0, y: 1.0 });
        g.flip_x();
        g.destroy(&mut gl).expect("destroy");
        assert!(g.is_destroyed());
        assert_eq!(gl.live_texture_count(), 0);
        assert_eq!(g.clipping(), ClipRect::FULL);
        assert!(vec_approx_eq(g.offset(), Vector2 { x: 0.0, y: 0.0 }));
        assert!(!g.is_flipped());
    }

    #[test]
    fn test_destroy_keeps_texture_shared_with_clone() {
        let mut gl = RecordingRenderer::new();
        let mut a = ImageGraphic::new(texture(&mut gl));
        let mut b = a.clone_graphic();

        a.destroy(&mut gl).expect("destroy a");
        assert_eq!(gl.live_texture_count(), 1);
        b.destroy(&mut gl).expect("destroy b");
        assert_eq!(gl.live_texture_count(), 0);
    }

    #[test]
    fn test_double_destroy_is_detected() {
        let mut gl = RecordingRenderer::new();
        let mut g = ImageGraphic::new(texture(&mut gl));
        g.destroy(&mut gl).expect("first destroy");
        assert_eq!(g.destroy(&mut gl), Err(GraphicError::AlreadyDestroyed));
    }

    #[test]
    fn test_render_after_destroy_is_noop() {
        let mut gl = RecordingRenderer::new();
        let mut g = ImageGraphic::new(texture(&mut gl));
        g.destroy(&mut gl).expect("destroy");
        g.render(&mut gl);
        assert!(gl.commands().is_empty());
    }

    #[test]
    fn test_tick_and_reset_are_noops() {
        let mut gl = RecordingRenderer::new();
        let mut g = ImageGraphic::new(texture(&mut gl)).with_clipping(clip(0.0, 0.0, 0.5, 1.0));
        g.tick(16);
        g.reset();
        assert_eq!(g.clipping(), clip(0.0, 0.0, 0.5, 1.0));
    }
}
