//! Image loading injected into the map loader.

use crate::error::MapError;
use crate::map::{Image, ImageHandle};
use std::path::{Path, PathBuf};

/// Capability the loader uses to turn an image path into a backend handle.
///
/// Passed into the loader explicitly; the loader never touches pixels itself.
pub trait ImageSource {
    /// Loads the image at `path` and returns its handle and size.
    fn load_image(&mut self, path: &Path) -> Result<Image, MapError>;
}

/// Image source that never reads pixel data. Every path gets a fresh handle
/// and a fixed size unless a size was registered for it. Useful for headless
/// tools and tests.
#[derive(Debug, Default)]
pub struct FixedSizeImages {
    default_size: (u32, u32),
    sizes: Vec<(PathBuf, u32, u32)>,
    loaded: Vec<PathBuf>,
}

impl FixedSizeImages {
    /// Every image reports `width` x `height`.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            default_size: (width, height),
            ..Self::default()
        }
    }

    /// Registers a size for paths ending in `file_name`.
    pub fn with_size(mut self, file_name: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        self.sizes.push((file_name.into(), width, height));
        self
    }

    /// Paths handed to `load_image`, in call order.
    pub fn loaded(&self) -> &[PathBuf] {
        &self.loaded
    }
}

impl ImageSource for FixedSizeImages {
    fn load_image(&mut self, path: &Path) -> Result<Image, MapError> {
        let (width, height) = self
            .sizes
            .iter()
            .find(|(name, _, _)| path.ends_with(name))
            .map(|(_, w, h)| (*w, *h))
            .unwrap_or(self.default_size);
        let handle = ImageHandle(self.loaded.len() as u32);
        self.loaded.push(path.to_path_buf());
        Ok(Image {
            handle,
            width,
            height,
        })
    }
}
