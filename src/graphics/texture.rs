//! GPU texture handle and image decoding.
//!
//! A [`Texture`] is created by decoding an image (ARGB words, one per pixel)
//! and uploading it as RGBA8 with nearest filtering and clamped wrap.
//! Textures are shared through `Rc` by every graphic drawing them; the last
//! owner calls [`Texture::destroy`] to release the GPU id.

use std::path::{Path, PathBuf};

use log::{debug, warn};
use raylib::prelude::Image;
use thiserror::Error;

use crate::render::{Renderer, TextureFilter, TextureParam, TextureWrap};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TextureError {
    #[error("failed to decode image {path:?}: {reason}")]
    Decode { path: PathBuf, reason: String },
    #[error("image {path:?} has no pixels")]
    EmptyImage { path: PathBuf },
    #[error("renderer refused texture upload for {path:?}")]
    Upload { path: PathBuf },
}

/// Decoded image, one ARGB word per pixel, row-major from the top-left.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u32>,
}

/// Turns an image resource into pixels.
pub trait ImageDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedImage, TextureError>;
}

/// Decodes images on the CPU with raylib's image loader. Works without a window.
#[derive(Debug, Default, Clone, Copy)]
pub struct RaylibImageDecoder;

impl ImageDecoder for RaylibImageDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedImage, TextureError> {
        let path_str = path.to_str().ok_or_else(|| TextureError::Decode {
            path: path.to_path_buf(),
            reason: "path is not valid UTF-8".to_string(),
        })?;
        if !path.is_file() {
            return Err(TextureError::Decode {
                path: path.to_path_buf(),
                reason: "file not found".to_string(),
            });
        }
        let image = Image::load_image(path_str).map_err(|e| TextureError::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let colors = image.get_image_data();
        let pixels = colors
            .iter()
            .map(|c| {
                ((c.a as u32) << 24) | ((c.r as u32) << 16) | ((c.g as u32) << 8) | c.b as u32
            })
            .collect();
        Ok(DecodedImage {
            path: path.to_path_buf(),
            width: image.width().max(0) as u32,
            height: image.height().max(0) as u32,
            pixels,
        })
    }
}

/// Pack ARGB words into the RGBA8 byte stream the GPU expects.
pub fn pack_rgba8(pixels: &[u32]) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(pixels.len() * 4);
    for &pixel in pixels {
        buffer.push(((pixel >> 16) & 0xFF) as u8); // red
        buffer.push(((pixel >> 8) & 0xFF) as u8); // green
        buffer.push((pixel & 0xFF) as u8); // blue
        buffer.push(((pixel >> 24) & 0xFF) as u8); // alpha
    }
    buffer
}

/// Uploaded texture. The id stays valid until [`Texture::destroy`].
#[derive(Debug)]
pub struct Texture {
    id: u32,
    width: u32,
    height: u32,
    path: PathBuf,
}

impl Texture {
    /// Decode `<root>/<path>` and upload it.
    pub fn load(
        path: &str,
        root: &Path,
        decoder: &dyn ImageDecoder,
        gl: &mut dyn Renderer,
    ) -> Result<Self, TextureError> {
        let full_path = root.join(path);
        let image = decoder.decode(&full_path)?;
        Self::from_image(&image, gl)
    }

    pub fn from_image(image: &DecodedImage, gl: &mut dyn Renderer) -> Result<Self, TextureError> {
        let texel_count = image.width as usize * image.height as usize;
        if texel_count == 0 || image.pixels.len() != texel_count {
            return Err(TextureError::EmptyImage {
                path: image.path.clone(),
            });
        }

        let buffer = pack_rgba8(&image.pixels);
        let id = gl.load_texture_rgba8(image.width, image.height, &buffer);
        if id == 0 {
            return Err(TextureError::Upload {
                path: image.path.clone(),
            });
        }
        gl.texture_parameter(id, TextureParam::WrapS(TextureWrap::Clamp));
        gl.texture_parameter(id, TextureParam::WrapT(TextureWrap::Clamp));
        gl.texture_parameter(id, TextureParam::MinFilter(TextureFilter::Nearest));
        gl.texture_parameter(id, TextureParam::MagFilter(TextureFilter::Nearest));

        debug!(
            "Uploaded texture {} ({}x{}) from {:?}",
            id, image.width, image.height, image.path
        );

        Ok(Self {
            id,
            width: image.width,
            height: image.height,
            path: image.path.clone(),
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the GPU id. Consumes the texture, so it cannot be released twice.
    pub fn destroy(mut self, gl: &mut dyn Renderer) {
        debug!("Releasing texture {} ({:?})", self.id, self.path);
        gl.unload_texture(self.id);
        self.id = 0;
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        if self.id != 0 {
            warn!(
                "Texture {} ({:?}) dropped without being destroyed; GPU memory leaked",
                self.id, self.path
            );
        }
    }
}
