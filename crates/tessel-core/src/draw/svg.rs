//! SVG rendering backend.

use log::trace;
use svg::{Document, node::element as svg_element};

use crate::{
    color::Color,
    draw::{Outline, Surface},
    geometry::{Bounds, Point},
};

/// Font family written on text elements unless another one is set.
pub const DEFAULT_FONT_FAMILY: &str = "sans-serif";

/// Applies fill or stroke attributes to an SVG element builder.
macro_rules! apply_paint {
    ($element:expr, $paint:expr) => {
        match $paint {
            Paint::Fill(color) => $element
                .set("fill", &color)
                .set("fill-opacity", color.alpha())
                .set("stroke", "none"),
            Paint::Stroke(color, width) => $element
                .set("fill", "none")
                .set("stroke", &color)
                .set("stroke-opacity", color.alpha())
                .set("stroke-width", width),
        }
    };
}

#[derive(Debug, Clone, Copy)]
enum Paint {
    Fill(Color),
    Stroke(Color, f32),
}

/// A [`Surface`] that accumulates SVG elements.
///
/// Coordinates are resolved against the current origin when each element is
/// emitted, so the produced document contains absolute positions only.
#[derive(Debug)]
pub struct SvgSurface {
    origin: Point,
    color: Color,
    line_width: f32,
    font_family: String,
    nodes: Vec<Box<dyn svg::Node>>,
}

impl Default for SvgSurface {
    fn default() -> Self {
        Self {
            origin: Point::default(),
            color: Color::default(),
            line_width: 1.0,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            nodes: Vec::new(),
        }
    }
}

impl SvgSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the stroke width used by [`Surface::draw`] (builder style).
    pub fn with_line_width(mut self, line_width: f32) -> Self {
        self.line_width = line_width;
        self
    }

    /// Sets the font family of emitted text (builder style).
    ///
    /// Should match the family the labels were measured with.
    pub fn with_font_family(mut self, family: &str) -> Self {
        self.font_family = family.to_string();
        self
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    /// Number of SVG elements emitted so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Consumes the surface and wraps its elements in a document whose view
    /// box is `view`.
    pub fn into_document(self, view: Bounds) -> Document {
        trace!(elements = self.nodes.len(); "Building SVG document");
        let mut document = Document::new()
            .set(
                "viewBox",
                (view.min_x(), view.min_y(), view.width(), view.height()),
            )
            .set("width", view.width())
            .set("height", view.height());
        for node in self.nodes {
            document = document.add(node);
        }
        document
    }

    fn emit(&mut self, outline: &Outline, paint: Paint) {
        let outline = outline.translate(self.origin);
        let node: Box<dyn svg::Node> = match &outline {
            Outline::Rectangle(bounds) => {
                let rect = rectangle(*bounds);
                Box::new(apply_paint!(rect, paint))
            }
            Outline::RoundedRectangle { bounds, arc } => {
                let rect = rectangle(*bounds)
                    .set("rx", arc / 2.0)
                    .set("ry", arc / 2.0);
                Box::new(apply_paint!(rect, paint))
            }
            Outline::Ellipse(bounds) => {
                let center = bounds.center();
                let ellipse = svg_element::Ellipse::new()
                    .set("cx", center.x())
                    .set("cy", center.y())
                    .set("rx", bounds.width() / 2.0)
                    .set("ry", bounds.height() / 2.0);
                Box::new(apply_paint!(ellipse, paint))
            }
            Outline::Diamond(bounds) => {
                let center = bounds.center();
                let points = [
                    Point::new(center.x(), bounds.min_y()),
                    Point::new(bounds.max_x(), center.y()),
                    Point::new(center.x(), bounds.max_y()),
                    Point::new(bounds.min_x(), center.y()),
                ];
                let polygon = svg_element::Polygon::new().set("points", points_attr(&points));
                Box::new(apply_paint!(polygon, paint))
            }
            Outline::Polygon(points) => {
                let polygon = svg_element::Polygon::new().set("points", points_attr(points));
                Box::new(apply_paint!(polygon, paint))
            }
            Outline::Line(start, end) => {
                let line = svg_element::Line::new()
                    .set("x1", start.x())
                    .set("y1", start.y())
                    .set("x2", end.x())
                    .set("y2", end.y());
                Box::new(apply_paint!(line, paint))
            }
        };
        self.nodes.push(node);
    }
}

fn rectangle(bounds: Bounds) -> svg_element::Rectangle {
    svg_element::Rectangle::new()
        .set("x", bounds.min_x())
        .set("y", bounds.min_y())
        .set("width", bounds.width())
        .set("height", bounds.height())
}

fn points_attr(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.x(), p.y()))
        .collect::<Vec<_>>()
        .join(" ")
}

impl Surface for SvgSurface {
    fn translate(&mut self, offset: Point) {
        self.origin = self.origin.add_point(offset);
    }

    fn origin(&self) -> Point {
        self.origin
    }

    fn color(&self) -> Color {
        self.color
    }

    fn set_color(&mut self, color: Color) -> Color {
        std::mem::replace(&mut self.color, color)
    }

    fn fill(&mut self, outline: &Outline) {
        self.emit(outline, Paint::Fill(self.color));
    }

    fn draw(&mut self, outline: &Outline) {
        self.emit(outline, Paint::Stroke(self.color, self.line_width));
    }

    fn draw_text(&mut self, text: &str, position: Point, font_size: f32) {
        let position = position.add_point(self.origin);
        let node = svg_element::Text::new(text)
            .set("x", position.x())
            .set("y", position.y())
            .set("font-family", self.font_family.as_str())
            .set("font-size", font_size)
            .set("fill", &self.color)
            .set("fill-opacity", self.color.alpha());
        self.nodes.push(Box::new(node));
    }
}
