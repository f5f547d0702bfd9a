//! The drawing interface and a recording implementation of it.

use crate::gid::FlipFlags;
use crate::map::ImageHandle;
use macroquad::prelude::{Color, Rect, Vec2};

/// One sub-image copy: `src` of `image` drawn with its upper-left at `dest`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blit {
    /// Image to sample.
    pub image: ImageHandle,
    /// Source rectangle in image pixels.
    pub src: Rect,
    /// Upper-left corner of the destination cell.
    pub dest: Vec2,
    /// Flips to apply to the source.
    pub flip: FlipFlags,
    /// Alpha multiplier in `0.0..=1.0`.
    pub opacity: f32,
}

/// Drawing intents the compositor emits. Any graphics API able to draw lines,
/// outlined shapes and sub-images can implement this.
pub trait RenderBackend {
    /// Fills the whole target with `color`.
    fn clear(&mut self, color: Color);
    /// Straight line segment.
    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color);
    /// Axis-aligned rectangle outline between two corners.
    fn draw_rect_outline(&mut self, min: Vec2, max: Vec2, color: Color);
    /// Full 360 degree outline.
    fn draw_ellipse_outline(&mut self, center: Vec2, radii: Vec2, color: Color);
    /// Copies part of an image to the target.
    fn blit(&mut self, blit: &Blit);
    /// Makes everything drawn since the last present visible.
    fn present(&mut self);
}

/// A recorded [`RenderBackend`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// [`RenderBackend::clear`].
    Clear(Color),
    /// [`RenderBackend::draw_line`].
    Line {
        /// Start point.
        from: Vec2,
        /// End point.
        to: Vec2,
        /// Stroke color.
        color: Color,
    },
    /// [`RenderBackend::draw_rect_outline`].
    RectOutline {
        /// Top-left corner.
        min: Vec2,
        /// Bottom-right corner.
        max: Vec2,
        /// Stroke color.
        color: Color,
    },
    /// [`RenderBackend::draw_ellipse_outline`].
    EllipseOutline {
        /// Ellipse center.
        center: Vec2,
        /// Half extents along x and y.
        radii: Vec2,
        /// Stroke color.
        color: Color,
    },
    /// [`RenderBackend::blit`].
    Blit(Blit),
    /// [`RenderBackend::present`].
    Present,
}

impl DrawCommand {
    /// `true` for commands that put pixels on the target (not clear/present).
    pub fn is_primitive(&self) -> bool {
        !matches!(self, DrawCommand::Clear(_) | DrawCommand::Present)
    }
}

/// Backend that records every call in order instead of drawing.
#[derive(Debug, Clone, Default)]
pub struct CommandList {
    commands: Vec<DrawCommand>,
}

impl CommandList {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every recorded call, in order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Recorded calls that draw pixels.
    pub fn primitives(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(|c| c.is_primitive())
    }

    /// Recorded blits.
    pub fn blits(&self) -> impl Iterator<Item = &Blit> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Blit(b) => Some(b),
            _ => None,
        })
    }

    /// Number of recorded calls.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// `true` when nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Moves the recorded calls out, leaving the list empty.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl RenderBackend for CommandList {
    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Color) {
        self.commands.push(DrawCommand::Line { from, to, color });
    }

    fn draw_rect_outline(&mut self, min: Vec2, max: Vec2, color: Color) {
        self.commands.push(DrawCommand::RectOutline { min, max, color });
    }

    fn draw_ellipse_outline(&mut self, center: Vec2, radii: Vec2, color: Color) {
        self.commands
            .push(DrawCommand::EllipseOutline { center, radii, color });
    }

    fn blit(&mut self, blit: &Blit) {
        self.commands.push(DrawCommand::Blit(*blit));
    }

    fn present(&mut self) {
        self.commands.push(DrawCommand::Present);
    }
}
