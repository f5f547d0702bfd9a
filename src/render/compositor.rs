//! Walks the layer tree and emits draw intents for one frame.

use crate::map::{Image, Layer, LayerKind, Map, Object};
use crate::render::backend::{Blit, RenderBackend};
use crate::render::resolver::resolve;
use crate::render::shapes::{rasterize, Primitive};
use log::trace;
use macroquad::prelude::{vec2, Color, Rect, Vec2};

/// Clears `target` to the map background and draws every visible layer.
///
/// Layers are drawn pre-order in document order. An invisible layer hides its
/// whole subtree. Each layer applies only its own opacity; group opacity is not
/// multiplied into children.
pub fn compose<B: RenderBackend + ?Sized>(target: &mut B, map: &Map) {
    target.clear(map.background);
    draw_layers(target, map, &map.layers);
}

fn draw_layers<B: RenderBackend + ?Sized>(target: &mut B, map: &Map, layers: &[Layer]) {
    for layer in layers {
        if !layer.visible {
            continue;
        }
        match &layer.kind {
            LayerKind::Group { layers } => draw_layers(target, map, layers),
            LayerKind::Objects { color, objects } => {
                draw_objects(target, objects, tint(*color, layer.opacity))
            }
            LayerKind::Image { image } => draw_image_layer(target, image, layer.opacity),
            LayerKind::Tiles { data } => draw_tile_layer(target, map, data, layer.opacity),
        }
    }
}

fn tint(color: Color, opacity: f32) -> Color {
    Color::new(color.r, color.g, color.b, color.a * opacity)
}

fn draw_objects<B: RenderBackend + ?Sized>(target: &mut B, objects: &[Object], color: Color) {
    for obj in objects.iter().filter(|o| o.visible) {
        let prims = match rasterize(&obj.shape, obj.position) {
            Ok(prims) => prims,
            Err(kind) => {
                trace!("skipping object {}: {}", obj.id, kind);
                continue;
            }
        };
        for prim in prims {
            match prim {
                Primitive::Line { from, to } => target.draw_line(from, to, color),
                Primitive::RectOutline { min, max } => target.draw_rect_outline(min, max, color),
                Primitive::EllipseOutline { center, radii } => {
                    target.draw_ellipse_outline(center, radii, color)
                }
            }
        }
    }
}

fn draw_image_layer<B: RenderBackend + ?Sized>(target: &mut B, image: &Image, opacity: f32) {
    target.blit(&Blit {
        image: image.handle,
        src: Rect::new(0.0, 0.0, image.width as f32, image.height as f32),
        dest: Vec2::ZERO,
        flip: Default::default(),
        opacity,
    });
}

fn draw_tile_layer<B: RenderBackend + ?Sized>(target: &mut B, map: &Map, data: &[u32], opacity: f32) {
    let tw = map.tile_w as f32;
    let th = map.tile_h as f32;

    for row in 0..map.height {
        for col in 0..map.width {
            let Some(&raw) = data.get(row * map.width + col) else {
                return;
            };
            if let Some(placement) = resolve(map, raw) {
                target.blit(&Blit {
                    image: placement.image,
                    src: placement.src,
                    dest: vec2(col as f32 * tw, row as f32 * th),
                    flip: placement.flip,
                    opacity,
                });
            }
        }
    }
}
