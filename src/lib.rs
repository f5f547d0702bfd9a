#![warn(missing_docs)]

//! Tiled map compositor: turns a loaded map into backend-agnostic draw
//! intents once per frame, with a Macroquad backend and viewer loop.

pub mod config;
pub mod driver;
mod error;
pub mod gid;
/// Map loading.
pub mod loader {
    pub mod images;
    pub mod json_loader;
}
pub mod map;
mod properties;
pub mod render;

pub use driver::{DriverState, EventSource, FrameDriver, FrameEvent, Key, Ticker};
pub use error::{MapError, UnsupportedShapeKind};
pub use gid::{FlipFlags, TileId};
pub use loader::images::{FixedSizeImages, ImageSource};
pub use loader::json_loader::{load_map, load_map_from_str};
pub use map::{Image, ImageHandle, Layer, LayerKind, Map, Object, ObjectShape, Tile, Tileset};
pub use properties::{Properties, PropertyValue};
pub use render::backend::{Blit, CommandList, DrawCommand, RenderBackend};
pub use render::compositor::compose;
pub use render::resolver::{resolve, TilePlacement};
pub use render::shapes::{rasterize, Primitive};
