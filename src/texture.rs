//! Texture resolution
//!
//! The renderer never touches storage itself: sprites are resolved through a
//! [`TextureSource`]. Two implementations are provided, a directory-backed
//! source for the CLI and an in-memory one for tests and embedding.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use image::RgbaImage;
use log::trace;

use crate::{Error, Result};

/// Resolves a sprite reference to decoded RGBA pixels.
pub trait TextureSource: Send + Sync {
    fn load(&self, sprite: &str) -> Result<RgbaImage>;
}

/// Decode encoded image bytes (PNG) into RGBA.
pub fn decode_texture(sprite: &str, bytes: &[u8]) -> Result<RgbaImage> {
    image::load_from_memory(bytes)
        .map(|img| img.to_rgba8())
        .map_err(|e| Error::TextureDecode {
            sprite: sprite.to_string(),
            reason: e.to_string(),
        })
}

/// Loads sprites from files under a root directory.
///
/// Sprite references are relative paths; absolute paths and `..` components
/// never resolve.
#[derive(Debug, Clone)]
pub struct DirTextureSource {
    root: PathBuf,
}

impl DirTextureSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, sprite: &str) -> Option<PathBuf> {
        let rel = Path::new(sprite);
        let safe = !sprite.is_empty() && rel.components().all(|c| matches!(c, Component::Normal(_)));
        safe.then(|| self.root.join(rel))
    }
}

impl TextureSource for DirTextureSource {
    fn load(&self, sprite: &str) -> Result<RgbaImage> {
        let path = self
            .resolve(sprite)
            .filter(|p| p.is_file())
            .ok_or_else(|| Error::TextureNotFound(sprite.to_string()))?;
        trace!("loading texture {:?}", path);
        let bytes = std::fs::read(&path).map_err(|_| Error::TextureNotFound(sprite.to_string()))?;
        decode_texture(sprite, &bytes)
    }
}

/// In-memory sprite table.
#[derive(Debug, Clone, Default)]
pub struct MemoryTextureSource {
    textures: HashMap<String, RgbaImage>,
}

impl MemoryTextureSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, sprite: impl Into<String>, image: RgbaImage) {
        self.textures.insert(sprite.into(), image);
    }

    /// Insert encoded bytes, decoding them up front.
    pub fn insert_encoded(&mut self, sprite: impl Into<String>, bytes: &[u8]) -> Result<()> {
        let sprite = sprite.into();
        let image = decode_texture(&sprite, bytes)?;
        self.textures.insert(sprite, image);
        Ok(())
    }

    pub fn with(mut self, sprite: impl Into<String>, image: RgbaImage) -> Self {
        self.insert(sprite, image);
        self
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

impl TextureSource for MemoryTextureSource {
    fn load(&self, sprite: &str) -> Result<RgbaImage> {
        self.textures
            .get(sprite)
            .cloned()
            .ok_or_else(|| Error::TextureNotFound(sprite.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn memory_source_reports_missing_sprites() {
        let src = MemoryTextureSource::new().with("a.png", RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 255])));
        assert_eq!(src.len(), 1);
        assert_eq!(src.load("a.png").unwrap().dimensions(), (2, 2));
        assert_eq!(src.load("b.png"), Err(Error::TextureNotFound("b.png".into())));
    }

    #[test]
    fn dir_source_rejects_escaping_paths() {
        let src = DirTextureSource::new("/nonexistent-textures");
        assert_eq!(src.root(), Path::new("/nonexistent-textures"));
        assert!(src.resolve("../etc/passwd").is_none());
        assert!(src.resolve("/etc/passwd").is_none());
        assert!(src.resolve("").is_none());
        assert_eq!(
            src.resolve("items/apple.png"),
            Some(PathBuf::from("/nonexistent-textures/items/apple.png"))
        );
        assert_eq!(src.load("apple.png"), Err(Error::TextureNotFound("apple.png".into())));
    }

    #[test]
    fn undecodable_bytes_are_a_decode_error() {
        let mut src = MemoryTextureSource::new();
        match src.insert_encoded("junk.png", b"not a png") {
            Err(Error::TextureDecode { sprite, .. }) => assert_eq!(sprite, "junk.png"),
            other => panic!("unexpected: {:?}", other),
        }
        assert!(src.is_empty());
    }
}
