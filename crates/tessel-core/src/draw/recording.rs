//! A surface that remembers what was drawn on it.

use crate::{
    color::Color,
    draw::{Outline, Surface},
    geometry::Point,
};

/// One operation performed on a [`RecordingSurface`].
///
/// Outlines and text positions are stored in absolute coordinates, with the
/// origin in effect at the time of the call already applied.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    Translate(Point),
    SetColor(Color),
    Fill { outline: Outline, color: Color },
    Draw { outline: Outline, color: Color },
    Text {
        text: String,
        position: Point,
        color: Color,
    },
}

/// A [`Surface`] that records every call instead of rendering.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    origin: Point,
    color: Color,
    ops: Vec<SurfaceOp>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded operations in call order.
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Filled outlines, in absolute coordinates, with the color used.
    pub fn fills(&self) -> impl Iterator<Item = (&Outline, Color)> {
        self.ops.iter().filter_map(|op| match op {
            SurfaceOp::Fill { outline, color } => Some((outline, *color)),
            _ => None,
        })
    }

    /// Stroked outlines, in absolute coordinates, with the color used.
    pub fn strokes(&self) -> impl Iterator<Item = (&Outline, Color)> {
        self.ops.iter().filter_map(|op| match op {
            SurfaceOp::Draw { outline, color } => Some((outline, *color)),
            _ => None,
        })
    }

    /// Text runs with their absolute baseline positions.
    pub fn texts(&self) -> impl Iterator<Item = (&str, Point)> {
        self.ops.iter().filter_map(|op| match op {
            SurfaceOp::Text { text, position, .. } => Some((text.as_str(), *position)),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }
}

impl Surface for RecordingSurface {
    fn translate(&mut self, offset: Point) {
        self.origin = self.origin.add_point(offset);
        self.ops.push(SurfaceOp::Translate(offset));
    }

    fn origin(&self) -> Point {
        self.origin
    }

    fn color(&self) -> Color {
        self.color
    }

    fn set_color(&mut self, color: Color) -> Color {
        self.ops.push(SurfaceOp::SetColor(color));
        std::mem::replace(&mut self.color, color)
    }

    fn fill(&mut self, outline: &Outline) {
        self.ops.push(SurfaceOp::Fill {
            outline: outline.translate(self.origin),
            color: self.color,
        });
    }

    fn draw(&mut self, outline: &Outline) {
        self.ops.push(SurfaceOp::Draw {
            outline: outline.translate(self.origin),
            color: self.color,
        });
    }

    fn draw_text(&mut self, text: &str, position: Point, _font_size: f32) {
        self.ops.push(SurfaceOp::Text {
            text: text.to_string(),
            position: position.add_point(self.origin),
            color: self.color,
        });
    }
}
