//! Shared texture cache.
//!
//! Textures are keyed by their path relative to the texture root. The store
//! only keeps weak references: graphics own the textures (`Rc`), and the last
//! graphic to be destroyed releases the GPU id. Loading a path whose texture
//! is still alive returns the same `Rc`; otherwise the image is decoded and
//! uploaded again.

use std::path::{Path, PathBuf};
use std::rc::{Rc, Weak};

use log::info;
use rustc_hash::FxHashMap;

use crate::graphics::texture::{ImageDecoder, Texture, TextureError};
use crate::render::Renderer;

/// Non-Send resource: textures are tied to the GL context.
pub struct TextureStore {
    root: PathBuf,
    decoder: Box<dyn ImageDecoder>,
    map: FxHashMap<String, Weak<Texture>>,
}

impl TextureStore {
    pub fn new(root: impl Into<PathBuf>, decoder: Box<dyn ImageDecoder>) -> Self {
        Self {
            root: root.into(),
            decoder,
            map: FxHashMap::default(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Shared handle to the texture at `path`, decoding and uploading it on
    /// first use.
    pub fn load(&mut self, path: &str, gl: &mut dyn Renderer) -> Result<Rc<Texture>, TextureError> {
        if let Some(texture) = self.get(path) {
            return Ok(texture);
        }
        let texture = Rc::new(Texture::load(path, &self.root, self.decoder.as_ref(), gl)?);
        info!(
            "Loaded texture {:?} as id {} ({}x{})",
            path,
            texture.id(),
            texture.width(),
            texture.height()
        );
        self.map.insert(path.to_string(), Rc::downgrade(&texture));
        Ok(texture)
    }

    /// Live texture for `path`, if any graphic still holds it.
    pub fn get(&self, path: &str) -> Option<Rc<Texture>> {
        self.map.get(path).and_then(Weak::upgrade)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Forget entries whose texture has been released.
    pub fn prune(&mut self) {
        self.map.retain(|_, weak| weak.strong_count() > 0);
    }

    pub fn len(&self) -> usize {
        self.map.values().filter(|w| w.strong_count() > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::texture::DecodedImage;
    use crate::render::recorder::RecordingRenderer;
    use std::cell::Cell;

    struct CountingDecoder {
        calls: Rc<Cell<u32>>,
    }

    impl ImageDecoder for CountingDecoder {
        fn decode(&self, path: &Path) -> Result<DecodedImage, TextureError> {
            self.calls.set(self.calls.get() + 1);
            if path.ends_with("missing.png") {
                return Err(TextureError::Decode {
                    path: path.to_path_buf(),
                    reason: "file not found".to_string(),
                });
            }
            Ok(DecodedImage {
                path: path.to_path_buf(),
                width: 1,
                height: 1,
                pixels: vec![0xFF00FF00],
            })
        }
    }

    fn store() -> (TextureStore, Rc<Cell<u32>>) {
        let calls = Rc::new(Cell::new(0));
        let decoder = CountingDecoder {
            calls: Rc::clone(&calls),
        };
        (TextureStore::new("textures", Box::new(decoder)), calls)
    }

    #[test]
    fn test_same_path_shares_texture() {
        let (mut store, calls) = store();
        let mut gl = RecordingRenderer::new();
        let a = store.load("box.png", &mut gl).unwrap();
        let b = store.load("box.png", &mut gl).unwrap();
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(calls.get(), 1);
        assert_eq!(gl.live_texture_count(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_released_texture_is_reloaded() {
        let (mut store, calls) = store();
        let mut gl = RecordingRenderer::new();
        let a = store.load("box.png", &mut gl).unwrap();
        let first_id = a.id();
        Rc::try_unwrap(a).unwrap().destroy(&mut gl);
        assert!(!store.contains("box.png"));

        let b = store.load("box.png", &mut gl).unwrap();
        assert_ne!(b.id(), first_id);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_decode_error_is_surfaced() {
        let (mut store, _) = store();
        let mut gl = RecordingRenderer::new();
        let err = store.load("missing.png", &mut gl).unwrap_err();
        assert!(matches!(err, TextureError::Decode { .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn test_prune_drops_dead_entries() {
        let (mut store, _) = store();
        let mut gl = RecordingRenderer::new();
        let a = store.load("box.png", &mut gl).unwrap();
        Rc::try_unwrap(a).unwrap().destroy(&mut gl);
        store.prune();
        assert!(store.map.is_empty());
    }
}
