//! Loader errors.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Error type for the map loader
#[derive(Debug)]
pub enum MapError {
    /// A map, tileset or image file could not be read
    #[allow(missing_docs)]
    Io { path: PathBuf, source: io::Error },
    /// A map or tileset file is not valid JSON for the expected shape
    #[allow(missing_docs)]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// The map is structurally unusable (wrong extension, zero tile size, ...)
    InvalidMap(String),
    /// A tile layer's data length does not match width * height of the map
    #[allow(missing_docs)]
    InvalidLayerSize {
        layer: String,
        expected: usize,
        actual: usize,
    },
    /// Layer data uses an encoding other than a plain CSV array
    #[allow(missing_docs)]
    UnsupportedEncoding { layer: String, encoding: String },
    /// A tile layer references a GID past the last tileset
    #[allow(missing_docs)]
    InvalidTileGid { layer: String, gid: u32, max_gid: u32 },
    /// A color string is not `#RRGGBB` or `#AARRGGBB`
    InvalidColor(String),
    /// A custom property declares a type this loader does not know
    #[allow(missing_docs)]
    UnsupportedPropertyType { name: String, kind: String },
    /// The injected image source failed to provide an image
    #[allow(missing_docs)]
    Image { path: PathBuf, reason: String },
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::Io { path, source } => {
                write!(f, "I/O error reading {}: {}", path.display(), source)
            }
            MapError::Json { path, source } => {
                write!(f, "JSON parse error in {}: {}", path.display(), source)
            }
            MapError::InvalidMap(msg) => write!(f, "Invalid map: {}", msg),
            MapError::InvalidLayerSize {
                layer,
                expected,
                actual,
            } => write!(
                f,
                "Invalid layer size for layer '{}': expected {} cells, found {}",
                layer, expected, actual
            ),
            MapError::UnsupportedEncoding { layer, encoding } => write!(
                f,
                "Layer '{}' uses unsupported data encoding '{}'",
                layer, encoding
            ),
            MapError::InvalidTileGid {
                layer,
                gid,
                max_gid,
            } => write!(
                f,
                "Layer '{}' references gid {} but the last tileset gid is {}",
                layer, gid, max_gid
            ),
            MapError::InvalidColor(s) => write!(f, "Invalid color string: '{}'", s),
            MapError::UnsupportedPropertyType { name, kind } => {
                write!(f, "Property '{}' has unsupported type '{}'", name, kind)
            }
            MapError::Image { path, reason } => {
                write!(f, "Failed to load image {}: {}", path.display(), reason)
            }
        }
    }
}

impl std::error::Error for MapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MapError::Io { source, .. } => Some(source),
            MapError::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Returned by the shape rasterizer for object shapes that have no outline
/// (points, tile objects, text). The compositor skips such objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnsupportedShapeKind(pub &'static str);

impl fmt::Display for UnsupportedShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unsupported object shape: {}", self.0)
    }
}

impl std::error::Error for UnsupportedShapeKind {}
