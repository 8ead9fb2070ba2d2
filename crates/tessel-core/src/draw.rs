//! Drawing surfaces for diagram rendering
//!
//! Nodes never talk to a concrete renderer. They draw [`Outline`]s and text
//! onto a [`Surface`], which keeps a current color and a movable coordinate
//! origin. Two surfaces are provided:
//!
//! - [`SvgSurface`] collects SVG elements and produces an `svg::Document`.
//! - [`RecordingSurface`] records every operation in absolute coordinates.
//!
//! Temporary changes to a surface (origin shifts, color changes) go through
//! [`SurfaceGuard`], which undoes them when dropped.

mod guard;
mod recording;
mod svg;

pub use guard::SurfaceGuard;
pub use recording::{RecordingSurface, SurfaceOp};
pub use self::svg::{DEFAULT_FONT_FAMILY, SvgSurface};

use crate::{
    color::Color,
    geometry::{Bounds, Point},
};

/// A geometric outline that can be filled or stroked on a [`Surface`].
#[derive(Debug, Clone, PartialEq)]
pub enum Outline {
    /// Axis aligned rectangle
    Rectangle(Bounds),
    /// Rectangle with rounded corners; `arc` is the corner diameter
    RoundedRectangle { bounds: Bounds, arc: f32 },
    /// Ellipse inscribed in the bounds
    Ellipse(Bounds),
    /// Diamond whose vertices touch the middle of each side of the bounds
    Diamond(Bounds),
    /// Closed polygon
    Polygon(Vec<Point>),
    /// Single straight segment
    Line(Point, Point),
}

impl Outline {
    /// Returns the smallest bounds enclosing the outline.
    pub fn bounds(&self) -> Bounds {
        match self {
            Self::Rectangle(bounds)
            | Self::RoundedRectangle { bounds, .. }
            | Self::Ellipse(bounds)
            | Self::Diamond(bounds) => *bounds,
            Self::Polygon(points) => enclosing_bounds(points),
            Self::Line(start, end) => enclosing_bounds(&[*start, *end]),
        }
    }

    /// Returns a copy of the outline moved by `offset`.
    pub fn translate(&self, offset: Point) -> Self {
        match self {
            Self::Rectangle(bounds) => Self::Rectangle(bounds.translate(offset)),
            Self::RoundedRectangle { bounds, arc } => Self::RoundedRectangle {
                bounds: bounds.translate(offset),
                arc: *arc,
            },
            Self::Ellipse(bounds) => Self::Ellipse(bounds.translate(offset)),
            Self::Diamond(bounds) => Self::Diamond(bounds.translate(offset)),
            Self::Polygon(points) => {
                Self::Polygon(points.iter().map(|p| p.add_point(offset)).collect())
            }
            Self::Line(start, end) => Self::Line(start.add_point(offset), end.add_point(offset)),
        }
    }
}

fn enclosing_bounds(points: &[Point]) -> Bounds {
    let Some((first, rest)) = points.split_first() else {
        return Bounds::default();
    };
    rest.iter().fold(
        Bounds::new_from_top_left(*first, Default::default()),
        |acc, point| acc.merge(&Bounds::new_from_top_left(*point, Default::default())),
    )
}

/// A 2D rendering target with a current color and a movable origin.
///
/// Coordinates passed to [`fill`](Surface::fill), [`draw`](Surface::draw)
/// and [`draw_text`](Surface::draw_text) are relative to the current origin.
pub trait Surface {
    /// Moves the coordinate origin by `offset`.
    fn translate(&mut self, offset: Point);

    /// Returns the current origin in absolute coordinates.
    fn origin(&self) -> Point;

    /// Returns the current color.
    fn color(&self) -> Color;

    /// Sets the current color and returns the previous one.
    fn set_color(&mut self, color: Color) -> Color;

    /// Fills the outline with the current color.
    fn fill(&mut self, outline: &Outline);

    /// Strokes the outline with the current color.
    fn draw(&mut self, outline: &Outline);

    /// Draws a single line of text with its left end of the baseline at `position`.
    fn draw_text(&mut self, text: &str, position: Point, font_size: f32);
}
