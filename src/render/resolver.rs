//! Cell value to atlas sub-image resolution.

use crate::gid::{FlipFlags, TileId};
use crate::map::{ImageHandle, Map};
use macroquad::prelude::Rect;

/// Where a tile cell samples its pixels from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TilePlacement {
    /// Image to sample.
    pub image: ImageHandle,
    /// Source rectangle in image pixels.
    pub src: Rect,
    /// Flips decoded from the cell value.
    pub flip: FlipFlags,
}

/// Resolves a raw cell value to a placement.
///
/// Returns `None` for GID 0, for GIDs with no tile entry, and for tiles that
/// have neither their own image nor a tileset image. Those cells draw nothing.
pub fn resolve(map: &Map, raw: u32) -> Option<TilePlacement> {
    let id = TileId(raw);
    let tile = map.tile(id)?;
    let image = match tile.image {
        Some(own) => own,
        None => map.tileset(tile.tileset)?.image?,
    };
    Some(TilePlacement {
        image: image.handle,
        src: tile.src,
        flip: id.flips(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gid::{FLIP_D, FLIP_H, FLIP_V};
    use crate::map::{Image, Tile, Tileset};
    use crate::properties::Properties;

    fn image(handle: u32) -> Image {
        Image {
            handle: ImageHandle(handle),
            width: 128,
            height: 128,
        }
    }

    fn tileset(first_gid: u32, image: Option<Image>) -> Tileset {
        Tileset {
            name: String::new(),
            first_gid,
            tile_w: 32,
            tile_h: 32,
            image,
            properties: Properties::new(),
        }
    }

    fn test_map() -> Map {
        let mut map = Map::new(4, 4, 32, 32);
        let atlas = map.add_tileset(tileset(1, Some(image(1))));
        let collection = map.add_tileset(tileset(10, None));
        map.insert_tile(
            5,
            Tile {
                tileset: atlas,
                src: Rect::new(32.0, 64.0, 32.0, 32.0),
                image: None,
            },
        );
        map.insert_tile(
            10,
            Tile {
                tileset: collection,
                src: Rect::new(0.0, 0.0, 48.0, 16.0),
                image: Some(image(7)),
            },
        );
        map.insert_tile(
            11,
            Tile {
                tileset: collection,
                src: Rect::new(0.0, 0.0, 32.0, 32.0),
                image: None,
            },
        );
        map
    }

    #[test]
    fn flip_bits_change_only_the_flags() {
        let map = test_map();
        let plain = resolve(&map, 5).expect("gid 5 resolves");
        for raw in [5 | FLIP_H, 5 | FLIP_V, 5 | FLIP_D, 5 | FLIP_H | FLIP_V | FLIP_D] {
            let flipped = resolve(&map, raw).expect("flipped gid 5 resolves");
            assert_eq!(flipped.src, plain.src);
            assert_eq!(flipped.image, plain.image);
            assert_eq!(flipped.flip, TileId(raw).flips());
        }
        assert_eq!(plain.flip, FlipFlags::NONE);
    }

    #[test]
    fn empty_and_unknown_gids_resolve_to_nothing() {
        let map = test_map();
        assert_eq!(resolve(&map, 0), None);
        assert_eq!(resolve(&map, FLIP_H | FLIP_V), None);
        assert_eq!(resolve(&map, 4), None);
        assert_eq!(resolve(&map, 9999), None);
    }

    #[test]
    fn tile_image_overrides_tileset_image() {
        let map = test_map();
        let atlas_tile = resolve(&map, 5).expect("atlas tile");
        assert_eq!(atlas_tile.image, ImageHandle(1));

        let own = resolve(&map, 10).expect("collection tile");
        assert_eq!(own.image, ImageHandle(7));
        assert_eq!(own.src, Rect::new(0.0, 0.0, 48.0, 16.0));
    }

    #[test]
    fn tile_without_any_image_is_skipped() {
        let map = test_map();
        assert_eq!(resolve(&map, 11), None);
    }
}
