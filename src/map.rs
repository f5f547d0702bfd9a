//! In-memory map model: the layer tree, objects, tilesets and the GID table.

use crate::gid::TileId;
use crate::properties::Properties;
use macroquad::prelude::{Color, Rect, Vec2, BLANK};
use std::collections::HashMap;

/// Opaque handle to backend-resident pixel data, issued by an [`ImageSource`].
///
/// [`ImageSource`]: crate::ImageSource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageHandle(pub u32);

/// An image handle plus its pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Image {
    /// Backend handle.
    pub handle: ImageHandle,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// One tileset as referenced by the map.
#[derive(Debug)]
pub struct Tileset {
    /// Tileset name.
    pub name: String,
    /// GID of the tileset's first tile.
    pub first_gid: u32,
    /// Tile width in pixels.
    pub tile_w: u32,
    /// Tile height in pixels.
    pub tile_h: u32,
    /// Shared atlas image. `None` for image-collection tilesets.
    pub image: Option<Image>,
    /// Custom properties.
    pub properties: Properties,
}

/// Resolved metadata for one GID.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    /// Index into [`Map::tilesets`].
    pub tileset: usize,
    /// Source rectangle inside whichever image is sampled.
    pub src: Rect,
    /// Per-tile image overriding the tileset image.
    pub image: Option<Image>,
}

/// A node of the layer tree.
#[derive(Debug)]
pub struct Layer {
    /// Layer name.
    pub name: String,
    /// An invisible layer hides its whole subtree.
    pub visible: bool,
    /// Applied to this layer's own output only.
    pub opacity: f32,
    /// Custom properties.
    pub properties: Properties,
    /// What the layer draws.
    pub kind: LayerKind,
}

/// Layer payload.
#[derive(Debug)]
pub enum LayerKind {
    /// Raw cell values in row-major order, flip bits included.
    Tiles {
        /// One raw value per cell.
        data: Vec<u32>,
    },
    /// Vector objects drawn as outlines in `color`.
    Objects {
        /// Outline color before opacity.
        color: Color,
        /// Objects in document order.
        objects: Vec<Object>,
    },
    /// A single image drawn at the map origin.
    Image {
        /// The layer image.
        image: Image,
    },
    /// Child layers, drawn in order.
    Group {
        /// Children in draw order.
        layers: Vec<Layer>,
    },
}

impl Layer {
    fn with_kind(name: impl Into<String>, kind: LayerKind) -> Self {
        Layer {
            name: name.into(),
            visible: true,
            opacity: 1.0,
            properties: Properties::new(),
            kind,
        }
    }

    /// Visible, fully opaque tile layer.
    pub fn tiles(name: impl Into<String>, data: Vec<u32>) -> Self {
        Self::with_kind(name, LayerKind::Tiles { data })
    }

    /// Visible, fully opaque object group.
    pub fn objects(name: impl Into<String>, color: Color, objects: Vec<Object>) -> Self {
        Self::with_kind(name, LayerKind::Objects { color, objects })
    }

    /// Visible, fully opaque image layer.
    pub fn image(name: impl Into<String>, image: Image) -> Self {
        Self::with_kind(name, LayerKind::Image { image })
    }

    /// Visible group of `layers`.
    pub fn group(name: impl Into<String>, layers: Vec<Layer>) -> Self {
        Self::with_kind(name, LayerKind::Group { layers })
    }

    /// Marks the layer invisible.
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Sets the layer opacity.
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }
}

/// Geometry of a map object.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectShape {
    /// Axis-aligned box with its top-left corner at the object position.
    Rectangle {
        /// Box width.
        width: f32,
        /// Box height.
        height: f32,
    },
    /// Ellipse inscribed in the box at the object position.
    Ellipse {
        /// Bounding box width.
        width: f32,
        /// Bounding box height.
        height: f32,
    },
    /// Closed outline, points relative to the object position.
    Polygon(Vec<Vec2>),
    /// Open outline, points relative to the object position.
    Polyline(Vec<Vec2>),
    /// Marker with no extent.
    Point,
    /// Tile object.
    Tile {
        /// Raw GID, flip bits included.
        gid: u32,
    },
    /// Text object.
    Text {
        /// The text content.
        text: String,
    },
}

/// An object of an object group.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    /// Object id, unique within the map.
    pub id: u32,
    /// Object name.
    pub name: String,
    /// Tiled's `type`/`class` string.
    pub class_name: String,
    /// Position in pixels.
    pub position: Vec2,
    /// Hidden objects are not drawn.
    pub visible: bool,
    /// Object geometry.
    pub shape: ObjectShape,
    /// Custom properties.
    pub properties: Properties,
}

impl Object {
    /// Visible object with no name, class or properties.
    pub fn new(id: u32, position: Vec2, shape: ObjectShape) -> Self {
        Object {
            id,
            name: String::new(),
            class_name: String::new(),
            position,
            visible: true,
            shape,
            properties: Properties::new(),
        }
    }
}

/// A fully loaded map. Read-only once built.
#[derive(Debug)]
pub struct Map {
    /// Grid width in tiles.
    pub width: usize,
    /// Grid height in tiles.
    pub height: usize,
    /// Cell width in pixels.
    pub tile_w: u32,
    /// Cell height in pixels.
    pub tile_h: u32,
    /// Clear color of every frame.
    pub background: Color,
    /// Top-level layers in draw order.
    pub layers: Vec<Layer>,
    /// Tilesets in load order.
    pub tilesets: Vec<Tileset>,
    /// Custom map properties.
    pub properties: Properties,
    tiles: HashMap<u32, Tile>, // keyed by clean gid; GIDs can be sparse
}

impl Map {
    /// Empty map with a transparent background.
    pub fn new(width: usize, height: usize, tile_w: u32, tile_h: u32) -> Self {
        Map {
            width,
            height,
            tile_w,
            tile_h,
            background: BLANK,
            layers: Vec::new(),
            tilesets: Vec::new(),
            properties: Properties::new(),
            tiles: HashMap::new(),
        }
    }

    /// Appends a tileset and returns its index for [`Tile::tileset`].
    pub fn add_tileset(&mut self, tileset: Tileset) -> usize {
        self.tilesets.push(tileset);
        self.tilesets.len() - 1
    }

    /// Registers `tile` under `gid`. Flip bits are stripped; GID 0 is ignored.
    pub fn insert_tile(&mut self, gid: u32, tile: Tile) {
        let gid = TileId(gid).clean();
        if gid == 0 {
            return;
        }
        self.tiles.insert(gid, tile);
    }

    /// Looks up a tile by GID. Flip bits are ignored; GID 0 is never a tile.
    #[inline]
    pub fn tile(&self, gid: TileId) -> Option<&Tile> {
        self.tiles.get(&gid.clean())
    }

    /// Tileset at `index`, if any.
    pub fn tileset(&self, index: usize) -> Option<&Tileset> {
        self.tilesets.get(index)
    }

    /// All objects of all object groups, in document order, visible or not.
    pub fn objects(&self) -> impl Iterator<Item = &Object> {
        fn collect<'m>(layers: &'m [Layer], out: &mut Vec<&'m Object>) {
            for layer in layers {
                match &layer.kind {
                    LayerKind::Objects { objects, .. } => out.extend(objects.iter()),
                    LayerKind::Group { layers } => collect(layers, out),
                    _ => {}
                }
            }
        }
        let mut out = Vec::new();
        collect(&self.layers, &mut out);
        out.into_iter()
    }

    /// Total number of layers including nested ones.
    pub fn layer_count(&self) -> usize {
        fn count(layers: &[Layer]) -> usize {
            layers
                .iter()
                .map(|l| match &l.kind {
                    LayerKind::Group { layers } => 1 + count(layers),
                    _ => 1,
                })
                .sum()
        }
        count(&self.layers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gid::{FLIP_D, FLIP_H};
    use macroquad::prelude::WHITE;

    fn atlas() -> Image {
        Image {
            handle: ImageHandle(0),
            width: 64,
            height: 64,
        }
    }

    fn map_with_tile(gid: u32) -> Map {
        let mut map = Map::new(1, 1, 16, 16);
        let ts = map.add_tileset(Tileset {
            name: "t".into(),
            first_gid: 1,
            tile_w: 16,
            tile_h: 16,
            image: Some(atlas()),
            properties: Properties::new(),
        });
        map.insert_tile(
            gid,
            Tile {
                tileset: ts,
                src: Rect::new(16.0, 0.0, 16.0, 16.0),
                image: None,
            },
        );
        map
    }

    #[test]
    fn tile_table_holds_sparse_high_gids() {
        let map = map_with_tile(crate::gid::GID_MASK);
        assert!(map.tile(TileId(crate::gid::GID_MASK)).is_some());
        assert!(map.tile(TileId(crate::gid::GID_MASK - 1)).is_none());
        assert!(map.tile(TileId(3)).is_none());
    }

    #[test]
    fn tile_lookup_ignores_flip_bits() {
        let map = map_with_tile(3);
        assert!(map.tile(TileId(3)).is_some());
        assert_eq!(map.tile(TileId(3 | FLIP_H | FLIP_D)), map.tile(TileId(3)));
    }

    #[test]
    fn gid_zero_and_out_of_range_are_absent() {
        let map = map_with_tile(3);
        assert!(map.tile(TileId(0)).is_none());
        assert!(map.tile(TileId(2)).is_none());
        assert!(map.tile(TileId(4000)).is_none());
    }

    #[test]
    fn objects_and_layer_count_descend_into_groups() {
        let mut map = Map::new(1, 1, 16, 16);
        let rect = ObjectShape::Rectangle {
            width: 1.0,
            height: 1.0,
        };
        map.layers.push(Layer::objects(
            "top",
            WHITE,
            vec![Object::new(1, Vec2::ZERO, rect.clone())],
        ));
        map.layers.push(Layer::group(
            "g",
            vec![Layer::objects(
                "nested",
                WHITE,
                vec![Object::new(2, Vec2::ZERO, rect)],
            )
            .hidden()],
        ));

        let ids: Vec<u32> = map.objects().map(|o| o.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(map.layer_count(), 3);
    }
}
