//! Recording back end for [`Renderer`].
//!
//! Stores every call as a [`DrawCommand`] and keeps a fake texture table so
//! uploads and releases can be inspected. Used by tests and by the headless
//! mode of the game loop.

use rustc_hash::FxHashMap;

use super::{Renderer, TextureParam};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    PushMatrix,
    PopMatrix,
    Translate(f32, f32, f32),
    Rotate(f32, f32, f32, f32),
    Scale(f32, f32, f32),
    Color4f(f32, f32, f32, f32),
    EnableTexture2D,
    DisableTexture2D,
    BindTexture(u32),
    BeginQuads,
    End,
    TexCoord2f(f32, f32),
    Vertex2f(f32, f32),
}

/// A texture living in the recorder's fake GPU memory.
#[derive(Debug, Clone, Default)]
pub struct RecordedTexture {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
    pub params: Vec<TextureParam>,
}

#[derive(Debug, Default)]
pub struct RecordingRenderer {
    commands: Vec<DrawCommand>,
    textures: FxHashMap<u32, RecordedTexture>,
    next_texture_id: u32,
    matrix_depth: usize,
    /// When set, uploads fail and return id 0.
    pub fail_uploads: bool,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drain the recorded command stream, e.g. once per frame.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn texture(&self, id: u32) -> Option<&RecordedTexture> {
        self.textures.get(&id)
    }

    pub fn live_texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn matrix_depth(&self) -> usize {
        self.matrix_depth
    }

    /// Vertex positions emitted so far, in emission order.
    pub fn vertices(&self) -> Vec<(f32, f32)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Vertex2f(x, y) => Some((*x, *y)),
                _ => None,
            })
            .collect()
    }

    /// Texture coordinates emitted so far, in emission order.
    pub fn tex_coords(&self) -> Vec<(f32, f32)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::TexCoord2f(u, v) => Some((*u, *v)),
                _ => None,
            })
            .collect()
    }
}

impl Renderer for RecordingRenderer {
    fn push_matrix(&mut self) {
        self.matrix_depth += 1;
        self.commands.push(DrawCommand::PushMatrix);
    }

    fn pop_matrix(&mut self) {
        debug_assert!(self.matrix_depth > 0, "pop_matrix without matching push_matrix");
        self.matrix_depth = self.matrix_depth.saturating_sub(1);
        self.commands.push(DrawCommand::PopMatrix);
    }

    fn translate(&mut self, x: f32, y: f32, z: f32) {
        self.commands.push(DrawCommand::Translate(x, y, z));
    }

    fn rotate(&mut self, degrees: f32, x: f32, y: f32, z: f32) {
        self.commands.push(DrawCommand::Rotate(degrees, x, y, z));
    }

    fn scale(&mut self, x: f32, y: f32, z: f32) {
        self.commands.push(DrawCommand::Scale(x, y, z));
    }

    fn color4f(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.commands.push(DrawCommand::Color4f(r, g, b, a));
    }

    fn enable_texture_2d(&mut self) {
        self.commands.push(DrawCommand::EnableTexture2D);
    }

    fn disable_texture_2d(&mut self) {
        self.commands.push(DrawCommand::DisableTexture2D);
    }

    fn bind_texture(&mut self, id: u32) {
        self.commands.push(DrawCommand::BindTexture(id));
    }

    fn begin_quads(&mut self) {
        self.commands.push(DrawCommand::BeginQuads);
    }

    fn end(&mut self) {
        self.commands.push(DrawCommand::End);
    }

    fn tex_coord2f(&mut self, u: f32, v: f32) {
        self.commands.push(DrawCommand::TexCoord2f(u, v));
    }

    fn vertex2f(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::Vertex2f(x, y));
    }

    fn load_texture_rgba8(&mut self, width: u32, height: u32, pixels: &[u8]) -> u32 {
        if self.fail_uploads {
            return 0;
        }
        self.next_texture_id += 1;
        let id = self.next_texture_id;
        self.textures.insert(
            id,
            RecordedTexture {
                width,
                height,
                pixels: pixels.to_vec(),
                params: Vec::new(),
            },
        );
        id
    }

    fn texture_parameter(&mut self, id: u32, param: TextureParam) {
        if let Some(tex) = self.textures.get_mut(&id) {
            tex.params.push(param);
        }
    }

    fn unload_texture(&mut self, id: u32) {
        self.textures.remove(&id);
    }
}
