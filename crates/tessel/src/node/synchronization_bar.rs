//! Fork/join bars that stretch to span the nodes they connect.
//!
//! A bar has a principal axis (x for horizontal bars, y for vertical ones).
//! Whenever its bounds are asked for, the bar looks at every node at the
//! other end of its edges, and moves and stretches itself along the principal
//! axis so it reaches a little past all of them. Its thickness never changes.

use std::cell::Cell;

use log::trace;

use tessel_core::{
    draw::Surface,
    geometry::{Bounds, Point, Size},
};

use super::{
    Edge, EdgeKind, NodeBehavior, NodeKind, NodeRef, draw_shape, rectangular_connection_point,
};

const DEFAULT_SPAN: f32 = 100.0;
const DEFAULT_THICKNESS: f32 = 4.0;
/// How far the bar reaches past the outermost connected node.
const EXTRA_SPAN: f32 = 12.0;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone)]
pub struct SynchronizationBar {
    orientation: Orientation,
    supported_edge: EdgeKind,
    extent: Cell<Size>,
    /// Set while the connected span is being computed.
    measuring: Cell<bool>,
}

impl SynchronizationBar {
    pub fn new(orientation: Orientation, supported_edge: EdgeKind) -> Self {
        let horizontal = Size::new(DEFAULT_SPAN, DEFAULT_THICKNESS);
        let extent = match orientation {
            Orientation::Horizontal => horizontal,
            Orientation::Vertical => horizontal.transpose(),
        };
        Self {
            orientation,
            supported_edge,
            extent: Cell::new(extent),
            measuring: Cell::new(false),
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn supported_edge(&self) -> EdgeKind {
        self.supported_edge
    }

    /// Width and height as of the last bounds query.
    pub fn extent(&self) -> Size {
        self.extent.get()
    }

    /// Minimum and maximum principal-axis coordinate of all connected nodes,
    /// pushed outward by [`EXTRA_SPAN`]. An extreme that is exactly zero is
    /// kept at zero.
    fn connected_span(&self, node: NodeRef<'_>) -> Option<(f32, f32)> {
        let graph = node.graph();
        let span = node
            .edges()
            .filter_map(|edge| edge.other_end(node.id()))
            .map(|other| graph.bounds(other))
            .fold(None, |span: Option<(f32, f32)>, bounds| {
                let (min, max) = match self.orientation {
                    Orientation::Horizontal => (bounds.min_x(), bounds.max_x()),
                    Orientation::Vertical => (bounds.min_y(), bounds.max_y()),
                };
                Some(match span {
                    Some((lo, hi)) => (lo.min(min), hi.max(max)),
                    None => (min, max),
                })
            })?;

        let (min, max) = span;
        let min = if min == 0.0 { 0.0 } else { min - EXTRA_SPAN };
        let max = if max == 0.0 { 0.0 } else { max + EXTRA_SPAN };
        Some((min, max))
    }
}

impl NodeBehavior for SynchronizationBar {
    fn kind(&self) -> NodeKind {
        NodeKind::SynchronizationBar
    }

    fn bounds(&self, node: NodeRef<'_>) -> Bounds {
        let current = Bounds::new_from_top_left(node.location(), self.extent.get());
        // A connected node may itself depend on this bar (a container
        // holding it); answer such nested queries with the current bounds.
        if self.measuring.replace(true) {
            return current;
        }
        let span = self.connected_span(node);
        self.measuring.set(false);

        let Some((min, max)) = span else {
            return current;
        };

        let extent = self.extent.get();
        let (offset, extent) = match self.orientation {
            Orientation::Horizontal => (
                Point::new(min - current.min_x(), 0.0),
                Size::new(max - min, extent.height()),
            ),
            Orientation::Vertical => (
                Point::new(0.0, min - current.min_y()),
                Size::new(extent.width(), max - min),
            ),
        };
        node.move_by(offset);
        self.extent.set(extent);

        let bounds = Bounds::new_from_top_left(node.location(), extent);
        trace!(node:? = node.id(), bounds:?; "Fitted synchronization bar");
        bounds
    }

    /// Refuses bar-to-bar edges and edges ending at this bar.
    fn add_connection(&self, node: NodeRef<'_>, edge: &Edge) -> bool {
        let graph = node.graph();
        let is_bar = |id| graph.node(id).kind() == NodeKind::SynchronizationBar;
        if is_bar(edge.start()) && edge.end().is_some_and(is_bar) {
            return false;
        }
        edge.end().is_some_and(|end| end != node.id())
    }

    /// For the supported edge kind the principal-axis coordinate follows the
    /// opposite node, so the edge meets the bar straight on.
    fn connection_point(&self, node: NodeRef<'_>, edge: &Edge) -> Point {
        let default = rectangular_connection_point(node, edge);
        if edge.kind() != self.supported_edge {
            return default;
        }
        let Some(other) = edge.other_end(node.id()) else {
            return default;
        };

        let other_point = node.graph().connection_point(other, edge);
        match self.orientation {
            Orientation::Horizontal => default.with_x(other_point.x()),
            Orientation::Vertical => default.with_y(other_point.y()),
        }
    }

    fn draw(&self, node: NodeRef<'_>, surface: &mut dyn Surface) {
        let outline = self.outline(node);
        draw_shape(node, &outline, None, surface);

        let previous = surface.set_color(node.style().border_color());
        surface.fill(&outline);
        surface.set_color(previous);
    }

    fn clone_box(&self) -> Box<dyn NodeBehavior> {
        Box::new(self.clone())
    }
}
