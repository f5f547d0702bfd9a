//! Macroquad textures and drawing.

use crate::error::MapError;
use crate::gid::FlipFlags;
use crate::loader::images::ImageSource;
use crate::map::{Image, ImageHandle};
use crate::render::backend::{Blit, CommandList, DrawCommand, RenderBackend};
use log::{debug, trace};
use macroquad::prelude::*;
use std::f32::consts::FRAC_PI_2;
use std::path::Path;

/// Macroquad implementation of both the image source and the render backend.
///
/// Composed frames are buffered and only swapped in on `present`. The last
/// presented frame is replayed by [`MacroquadBackend::flush`] on every
/// macroquad frame, so display frames without a redraw tick still show it.
pub struct MacroquadBackend {
    textures: Vec<Texture2D>,
    pending: CommandList,
    presented: Vec<DrawCommand>,
    line_thickness: f32,
}

impl MacroquadBackend {
    /// Backend with no textures that strokes outlines `line_thickness` wide.
    pub fn new(line_thickness: f32) -> Self {
        Self {
            textures: Vec::new(),
            pending: CommandList::new(),
            presented: Vec::new(),
            line_thickness,
        }
    }

    /// Texture loaded under `handle`.
    pub fn texture(&self, handle: ImageHandle) -> Option<&Texture2D> {
        self.textures.get(handle.0 as usize)
    }

    /// Executes the last presented frame with macroquad draw calls.
    pub fn flush(&self) {
        for cmd in &self.presented {
            self.execute(cmd);
        }
    }

    fn execute(&self, cmd: &DrawCommand) {
        let t = self.line_thickness;
        match cmd {
            DrawCommand::Clear(color) => clear_background(*color),
            DrawCommand::Line { from, to, color } => {
                draw_line(from.x, from.y, to.x, to.y, t, *color)
            }
            DrawCommand::RectOutline { min, max, color } => {
                draw_rectangle_lines(min.x, min.y, max.x - min.x, max.y - min.y, t, *color)
            }
            DrawCommand::EllipseOutline {
                center,
                radii,
                color,
            } => draw_ellipse_lines(center.x, center.y, radii.x, radii.y, 0.0, t, *color),
            DrawCommand::Blit(blit) => self.draw_blit(blit),
            DrawCommand::Present => {}
        }
    }

    fn draw_blit(&self, blit: &Blit) {
        let Some(tex) = self.texture(blit.image) else {
            trace!("blit of unknown image {:?}", blit.image);
            return;
        };
        let (rotation, flip_x, flip_y) = texture_transform(blit.flip);
        let size = vec2(blit.src.w, blit.src.h);
        let origin = quad_origin(blit.dest, size, blit.flip);
        draw_texture_ex(
            tex,
            origin.x,
            origin.y,
            Color::new(1.0, 1.0, 1.0, blit.opacity),
            DrawTextureParams {
                source: Some(blit.src),
                dest_size: Some(size),
                rotation,
                flip_x,
                flip_y,
                pivot: None,
            },
        );
    }
}

/// Maps tile flip bits to macroquad's (rotation, flip_x, flip_y).
///
/// Macroquad flips the source first and then rotates around the quad center.
/// The diagonal flip (transpose) becomes a quarter turn with the horizontal
/// and vertical bits swapped, and the new vertical flip inverted.
pub fn texture_transform(flip: FlipFlags) -> (f32, bool, bool) {
    if flip.diagonal {
        (FRAC_PI_2, flip.vertical, !flip.horizontal)
    } else {
        (0.0, flip.horizontal, flip.vertical)
    }
}

/// Where to place the unrotated `size` quad so that its drawn footprint
/// starts at `dest`.
///
/// The quarter turn of a diagonal flip spins the quad around its own center,
/// which moves a non-square footprint by half the size difference.
pub fn quad_origin(dest: Vec2, size: Vec2, flip: FlipFlags) -> Vec2 {
    if flip.diagonal {
        dest + vec2(size.y - size.x, size.x - size.y) / 2.0
    } else {
        dest
    }
}

impl ImageSource for MacroquadBackend {
    fn load_image(&mut self, path: &Path) -> Result<Image, MapError> {
        let bytes = std::fs::read(path).map_err(|source| MapError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let pixels = macroquad::texture::Image::from_file_with_format(&bytes, None).map_err(|e| {
            MapError::Image {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;
        let tex = Texture2D::from_image(&pixels);
        tex.set_filter(FilterMode::Nearest);

        let handle = ImageHandle(self.textures.len() as u32);
        let image = Image {
            handle,
            width: pixels.width as u32,
            height: pixels.height as u32,
        };
        debug!(
            "loaded image {} as {:?} ({}x{})",
            path.display(),
            handle,
            image.width,
            image.height
        );
        self.textures.push(tex);
        Ok(image)
    }
}

impl RenderBackend for MacroquadBackend {
    fn clear(&mut self, color: Color) {
        self.pending.clear(color);
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color) {
        self.pending.draw_line(from, to, color);
    }

    fn draw_rect_outline(&mut self, min: Vec2, max: Vec2, color: Color) {
        self.pending.draw_rect_outline(min, max, color);
    }

    fn draw_ellipse_outline(&mut self, center: Vec2, radii: Vec2, color: Color) {
        self.pending.draw_ellipse_outline(center, radii, color);
    }

    fn blit(&mut self, blit: &Blit) {
        self.pending.blit(blit);
    }

    fn present(&mut self) {
        self.presented = self.pending.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_flips_pass_straight_through() {
        let flip = FlipFlags {
            horizontal: true,
            vertical: false,
            diagonal: false,
        };
        assert_eq!(texture_transform(flip), (0.0, true, false));
        assert_eq!(texture_transform(FlipFlags::NONE), (0.0, false, false));
    }

    #[test]
    fn diagonal_flip_becomes_quarter_turn() {
        let diag = FlipFlags {
            diagonal: true,
            ..FlipFlags::NONE
        };
        assert_eq!(texture_transform(diag), (FRAC_PI_2, false, true));

        let all = FlipFlags {
            horizontal: true,
            vertical: true,
            diagonal: true,
        };
        assert_eq!(texture_transform(all), (FRAC_PI_2, true, false));
    }

    #[test]
    fn diagonal_flip_keeps_non_square_tile_in_its_cell() {
        let diag = FlipFlags {
            diagonal: true,
            ..FlipFlags::NONE
        };
        let dest = vec2(32.0, 64.0);
        let size = vec2(32.0, 16.0);
        let origin = quad_origin(dest, size, diag);
        assert_eq!(origin, vec2(24.0, 72.0));

        // footprint of the quarter-turned quad: center stays, extents swap
        let center = origin + size / 2.0;
        assert_eq!(center - vec2(size.y, size.x) / 2.0, dest);

        assert_eq!(quad_origin(dest, vec2(16.0, 16.0), diag), dest);
        assert_eq!(quad_origin(dest, size, FlipFlags::NONE), dest);
    }

    #[test]
    fn present_swaps_pending_frame_in() {
        let mut backend = MacroquadBackend::new(1.0);
        backend.clear(BLACK);
        backend.draw_line(Vec2::ZERO, vec2(1.0, 1.0), WHITE);
        assert!(backend.presented.is_empty());

        backend.present();
        assert_eq!(backend.presented.len(), 2);
        assert!(backend.pending.is_empty());
    }
}
