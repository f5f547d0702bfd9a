// tests/map_tests.rs

use macroquad::prelude::{vec2, Rect, Vec2, BLACK, GREEN};
use macroquad_tiled_compositor::{
    compose, CommandList, DrawCommand, Image, ImageHandle, Layer, Map, Object, ObjectShape,
    Properties, Tile, Tileset,
};

fn image(handle: u32, width: u32, height: u32) -> Image {
    Image {
        handle: ImageHandle(handle),
        width,
        height,
    }
}

/// Map whose tile table maps GID 5 to (0,0,32,32) of image 1.
fn map_with_gid5(width: usize, height: usize) -> Map {
    let mut map = Map::new(width, height, 32, 32);
    let ts = map.add_tileset(Tileset {
        name: "atlas".into(),
        first_gid: 1,
        tile_w: 32,
        tile_h: 32,
        image: Some(image(1, 256, 256)),
        properties: Properties::new(),
    });
    map.insert_tile(
        5,
        Tile {
            tileset: ts,
            src: Rect::new(0.0, 0.0, 32.0, 32.0),
            image: None,
        },
    );
    map
}

fn frame(map: &Map) -> CommandList {
    let mut list = CommandList::new();
    compose(&mut list, map);
    list
}

#[test]
fn two_cell_layer_emits_single_blit() {
    let mut map = map_with_gid5(2, 1);
    map.layers.push(Layer::tiles("ground", vec![0, 5]));

    let list = frame(&map);
    let blits: Vec<_> = list.blits().collect();
    assert_eq!(blits.len(), 1);
    assert_eq!(blits[0].image, ImageHandle(1));
    assert_eq!(blits[0].src, Rect::new(0.0, 0.0, 32.0, 32.0));
    assert_eq!(blits[0].dest, vec2(32.0, 0.0));
}

#[test]
fn rect_object_emits_one_outline() {
    let mut map = Map::new(1, 1, 32, 32);
    let rect = Object::new(
        1,
        vec2(10.0, 10.0),
        ObjectShape::Rectangle {
            width: 20.0,
            height: 10.0,
        },
    );
    map.layers.push(Layer::objects("objs", GREEN, vec![rect]));

    let list = frame(&map);
    let prims: Vec<_> = list.primitives().collect();
    assert_eq!(
        prims,
        vec![&DrawCommand::RectOutline {
            min: vec2(10.0, 10.0),
            max: vec2(30.0, 20.0),
            color: GREEN,
        }]
    );
}

#[test]
fn hidden_group_hides_visible_image_child() {
    let mut map = Map::new(1, 1, 32, 32);
    map.layers.push(
        Layer::group("g", vec![Layer::image("img", image(3, 64, 64))]).hidden(),
    );

    let list = frame(&map);
    assert_eq!(list.primitives().count(), 0);
}

#[test]
fn hidden_layers_of_every_kind_draw_nothing() {
    let mut map = map_with_gid5(1, 1);
    let poly = Object::new(
        1,
        Vec2::ZERO,
        ObjectShape::Polygon(vec![vec2(0.0, 0.0), vec2(4.0, 0.0), vec2(4.0, 4.0)]),
    );
    map.layers.push(Layer::tiles("t", vec![5]).hidden());
    map.layers.push(Layer::objects("o", GREEN, vec![poly]).hidden());
    map.layers.push(Layer::image("i", image(2, 8, 8)).hidden());
    map.layers.push(
        Layer::group(
            "outer",
            vec![Layer::group("inner", vec![Layer::tiles("deep", vec![5])])],
        )
        .hidden(),
    );

    assert_eq!(frame(&map).primitives().count(), 0);
}

#[test]
fn earlier_sibling_draws_entirely_before_later_tile_layer() {
    let mut map = map_with_gid5(2, 2);
    let outline = Object::new(
        1,
        Vec2::ZERO,
        ObjectShape::Polyline(vec![vec2(0.0, 0.0), vec2(64.0, 0.0), vec2(64.0, 64.0)]),
    );
    map.layers.push(Layer::objects("a", BLACK, vec![outline]));
    map.layers.push(Layer::tiles("b", vec![5, 5, 5, 5]));

    let prims: Vec<_> = frame(&map).primitives().cloned().collect();
    assert_eq!(prims.len(), 6);
    let last_line = prims
        .iter()
        .rposition(|c| matches!(c, DrawCommand::Line { .. }))
        .expect("lines present");
    let first_blit = prims
        .iter()
        .position(|c| matches!(c, DrawCommand::Blit(_)))
        .expect("blits present");
    assert!(last_line < first_blit);
}

#[test]
fn frame_starts_with_background_clear() {
    let mut map = map_with_gid5(1, 1);
    map.background = GREEN;
    map.layers.push(Layer::tiles("t", vec![5]));

    let list = frame(&map);
    assert_eq!(list.commands().first(), Some(&DrawCommand::Clear(GREEN)));
    assert_eq!(list.len(), 2);
}
