//! Diagram nodes and the behaviors that give each kind its geometry.
//!
//! A [`Node`] stores what every node has in common (location, parent,
//! children, style) and delegates everything kind specific to a boxed
//! [`NodeBehavior`]. Behaviors receive a [`NodeRef`], a read-only view of the
//! node inside its [`Graph`], so they can look at connected edges, children
//! and the graph's grid and text metrics.
//!
//! All bounds and outlines are expressed in the frame of the node's parent
//! (graph coordinates for top-level nodes). Connection points are always in
//! graph coordinates.

mod circular;
mod compartment;
mod decision;
mod nested;
mod note;
mod rectangular;
mod subroutine;
mod synchronization_bar;

pub use circular::Circular;
pub use compartment::CompartmentLayout;
pub use decision::Decision;
pub use nested::FrameCorrected;
pub use note::Note;
pub use rectangular::Rectangular;
pub use subroutine::{Subroutine, fix_child_location};
pub use synchronization_bar::{Orientation, SynchronizationBar};

use std::{cell::Cell, fmt};

use petgraph::stable_graph::NodeIndex;

use tessel_core::{
    color::Color,
    draw::{Outline, Surface, SurfaceGuard},
    geometry::{Bounds, Point, Size},
    text::{Label, TextMetrics},
};

use crate::graph::{Graph, GridSticker};

/// The closed set of node kinds a diagram can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Activity,
    State,
    InitialState,
    FinalState,
    Decision,
    SynchronizationBar,
    Subroutine,
    Note,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Activity => "activity",
            Self::State => "state",
            Self::InitialState => "initial state",
            Self::FinalState => "final state",
            Self::Decision => "decision",
            Self::SynchronizationBar => "synchronization bar",
            Self::Subroutine => "subroutine",
            Self::Note => "note",
        };
        f.write_str(name)
    }
}

/// The closed set of edge kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// Control flow between activity diagram nodes
    ActivityTransition,
    /// Transition between states
    StateTransition,
    /// Dashed link from a note to the element it annotates
    NoteConnector,
}

/// A directed connection between two nodes.
///
/// Stored edges always have both endpoints. A candidate passed to
/// [`NodeBehavior::add_connection`] may still lack its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    kind: EdgeKind,
    start: NodeIndex,
    end: Option<NodeIndex>,
}

impl Edge {
    pub fn new(kind: EdgeKind, start: NodeIndex, end: Option<NodeIndex>) -> Self {
        Self { kind, start, end }
    }

    pub fn kind(&self) -> EdgeKind {
        self.kind
    }

    pub fn start(&self) -> NodeIndex {
        self.start
    }

    pub fn end(&self) -> Option<NodeIndex> {
        self.end
    }

    /// Returns the endpoint opposite to `id`, or `None` if `id` is not an
    /// endpoint or the opposite end is missing.
    pub fn other_end(&self, id: NodeIndex) -> Option<NodeIndex> {
        if self.start == id {
            self.end
        } else if self.end == Some(id) {
            Some(self.start)
        } else {
            None
        }
    }
}

/// Colors used to render a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeStyle {
    border_color: Color,
    background_color: Color,
    text_color: Color,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            border_color: Color::default(),
            background_color: Color::white(),
            text_color: Color::default(),
        }
    }
}

impl NodeStyle {
    pub fn new(border_color: Color, background_color: Color, text_color: Color) -> Self {
        Self {
            border_color,
            background_color,
            text_color,
        }
    }

    pub fn border_color(&self) -> Color {
        self.border_color
    }

    pub fn background_color(&self) -> Color {
        self.background_color
    }

    pub fn text_color(&self) -> Color {
        self.text_color
    }

    pub fn with_border_color(mut self, color: Color) -> Self {
        self.border_color = color;
        self
    }

    pub fn with_background_color(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    pub fn with_text_color(mut self, color: Color) -> Self {
        self.text_color = color;
        self
    }
}

/// Kind specific geometry, connection policy and rendering of a node.
///
/// Implementors hold only their own state (labels, cached extents). Shared
/// state such as the location lives in [`Node`] and is reached through the
/// [`NodeRef`] passed to every method.
pub trait NodeBehavior: fmt::Debug {
    fn kind(&self) -> NodeKind;

    /// Bounds in the parent's frame.
    fn bounds(&self, node: NodeRef<'_>) -> Bounds;

    /// Shape of the node in the parent's frame.
    fn outline(&self, node: NodeRef<'_>) -> Outline {
        Outline::Rectangle(self.bounds(node))
    }

    /// Point in graph coordinates where `edge` attaches to this node.
    fn connection_point(&self, node: NodeRef<'_>, edge: &Edge) -> Point {
        rectangular_connection_point(node, edge)
    }

    /// Decides whether `edge`, which starts at this node, may be created.
    fn add_connection(&self, _node: NodeRef<'_>, edge: &Edge) -> bool {
        edge.end().is_some()
    }

    /// Whether a node of `kind` may be nested inside this node.
    fn accepts_child(&self, _kind: NodeKind) -> bool {
        false
    }

    /// Draws the node in its parent's frame.
    fn draw(&self, node: NodeRef<'_>, surface: &mut dyn Surface) {
        draw_shape(node, &self.outline(node), self.label(), surface);
    }

    fn label(&self) -> Option<&Label> {
        None
    }

    fn label_mut(&mut self) -> Option<&mut Label> {
        None
    }

    fn clone_box(&self) -> Box<dyn NodeBehavior>;
}

impl Clone for Box<dyn NodeBehavior> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// A node stored in a [`Graph`].
#[derive(Debug)]
pub struct Node {
    location: Cell<Point>,
    parent: Option<NodeIndex>,
    children: Vec<NodeIndex>,
    style: Option<NodeStyle>,
    behavior: Box<dyn NodeBehavior>,
}

impl Node {
    /// Creates a detached node at the origin.
    pub fn new(behavior: impl NodeBehavior + 'static) -> Self {
        Self::from_box(Box::new(behavior))
    }

    fn from_box(behavior: Box<dyn NodeBehavior>) -> Self {
        Self {
            location: Cell::new(Point::default()),
            parent: None,
            children: Vec::new(),
            style: None,
            behavior,
        }
    }

    pub fn activity(name: &str) -> Self {
        Self::new(Rectangular::activity(name))
    }

    pub fn decision(condition: &str) -> Self {
        Self::new(Decision::new(condition))
    }

    /// Activity diagram synchronization bar (fork/join).
    pub fn synchronization_bar(orientation: Orientation) -> Self {
        Self::new(SynchronizationBar::new(
            orientation,
            EdgeKind::ActivityTransition,
        ))
    }

    /// Free text; drawn correctly when nested in a subroutine.
    pub fn note(text: &str) -> Self {
        Self::new(Note::new(text)).nested()
    }

    /// State diagram state; drawn correctly when nested in a subroutine.
    pub fn state(name: &str) -> Self {
        Self::new(Rectangular::state(name)).nested()
    }

    pub fn initial_state() -> Self {
        Self::new(Circular::initial()).nested()
    }

    pub fn final_state() -> Self {
        Self::new(Circular::final_state()).nested()
    }

    /// State diagram decision; drawn correctly when nested in a subroutine.
    pub fn state_decision(condition: &str) -> Self {
        Self::decision(condition).nested()
    }

    /// State diagram synchronization bar, fitted along state transitions.
    pub fn state_synchronization_bar(orientation: Orientation) -> Self {
        Self::new(SynchronizationBar::new(
            orientation,
            EdgeKind::StateTransition,
        ))
        .nested()
    }

    pub fn subroutine(name: &str) -> Self {
        Self::new(Subroutine::new(name))
    }

    /// Wraps the behavior so drawing happens in graph coordinates even when
    /// the node is nested in a container.
    pub fn nested(self) -> Self {
        Self {
            behavior: Box::new(FrameCorrected::new(self.behavior)),
            ..self
        }
    }

    pub fn with_style(mut self, style: NodeStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn kind(&self) -> NodeKind {
        self.behavior.kind()
    }

    /// Location of the top-left corner in the parent's frame.
    pub fn location(&self) -> Point {
        self.location.get()
    }

    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    pub fn children(&self) -> &[NodeIndex] {
        &self.children
    }

    /// The node's own style, if it overrides the graph default.
    pub fn style(&self) -> Option<&NodeStyle> {
        self.style.as_ref()
    }

    pub fn set_style(&mut self, style: Option<NodeStyle>) {
        self.style = style;
    }

    pub fn behavior(&self) -> &dyn NodeBehavior {
        self.behavior.as_ref()
    }

    pub fn label(&self) -> Option<&Label> {
        self.behavior.label()
    }

    pub fn label_mut(&mut self) -> Option<&mut Label> {
        self.behavior.label_mut()
    }

    /// Deep copy of the node state as a detached node without children.
    pub fn duplicate(&self) -> Self {
        Self {
            location: Cell::new(self.location()),
            parent: None,
            children: Vec::new(),
            style: self.style,
            behavior: self.behavior.clone_box(),
        }
    }

    pub(crate) fn set_location(&self, location: Point) {
        self.location.set(location);
    }

    pub(crate) fn set_parent(&mut self, parent: Option<NodeIndex>) {
        self.parent = parent;
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<NodeIndex> {
        &mut self.children
    }
}

/// A node seen through the graph that owns it.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'g> {
    graph: &'g Graph,
    id: NodeIndex,
}

impl<'g> NodeRef<'g> {
    pub(crate) fn new(graph: &'g Graph, id: NodeIndex) -> Self {
        Self { graph, id }
    }

    pub fn id(&self) -> NodeIndex {
        self.id
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    pub fn node(&self) -> &'g Node {
        self.graph.node(self.id)
    }

    pub fn location(&self) -> Point {
        self.node().location()
    }

    pub fn location_on_graph(&self) -> Point {
        self.graph.location_on_graph(self.id)
    }

    pub fn children(&self) -> &'g [NodeIndex] {
        self.node().children()
    }

    /// Every stored edge that has this node as an endpoint.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + 'g {
        let id = self.id;
        self.graph
            .all_edges()
            .map(|(_, edge)| edge)
            .filter(move |edge| edge.start() == id || edge.end() == Some(id))
    }

    /// The node's style, falling back to the graph default.
    pub fn style(&self) -> NodeStyle {
        self.node()
            .style()
            .copied()
            .unwrap_or_else(|| *self.graph.default_style())
    }

    pub fn metrics(&self) -> &'g dyn TextMetrics {
        self.graph.metrics()
    }

    pub fn grid(&self) -> &'g GridSticker {
        self.graph.grid()
    }

    /// Bounds in graph coordinates.
    pub fn graph_bounds(&self) -> Bounds {
        self.graph.graph_bounds(self.id)
    }

    /// Moves the node by `offset` within its parent's frame.
    ///
    /// Available from `&Graph` so that bounds queries and drawing can
    /// relocate nodes.
    pub fn move_by(&self, offset: Point) {
        let node = self.node();
        node.set_location(node.location().add_point(offset));
    }
}

/// Bounds of a node whose size only depends on its label.
///
/// The label plus `padding` on each axis is measured and the result never
/// shrinks below `default_size`.
pub(crate) fn label_fitted_bounds(
    node: NodeRef<'_>,
    label: &Label,
    default_size: Size,
    padding: Size,
) -> Bounds {
    let text = label.size(node.metrics());
    let size = if text.is_zero() {
        default_size
    } else {
        default_size.max(Size::new(
            text.width() + padding.width(),
            text.height() + padding.height(),
        ))
    };
    Bounds::new_from_top_left(node.location(), size)
}

/// Direction from the center of `node` to the center of the opposite
/// endpoint of `edge`, both in graph coordinates.
///
/// Returns the node's graph bounds together with the direction; the
/// direction is zero when there is no opposite endpoint.
pub(crate) fn direction_to_other_end(node: NodeRef<'_>, edge: &Edge) -> (Bounds, Point) {
    let bounds = node.graph_bounds();
    let direction = edge
        .other_end(node.id())
        .filter(|other| *other != node.id())
        .map(|other| {
            node.graph()
                .graph_bounds(other)
                .center()
                .sub_point(bounds.center())
        })
        .unwrap_or_default();
    (bounds, direction)
}

/// Point where the ray from the node's center toward the opposite endpoint
/// leaves its rectangular bounds.
pub fn rectangular_connection_point(node: NodeRef<'_>, edge: &Edge) -> Point {
    let (bounds, direction) = direction_to_other_end(node, edge);
    rectangle_exit_point(bounds, direction)
}

/// Point where a ray from the center of `bounds` along `direction` crosses
/// the border. A zero direction yields the center.
pub(crate) fn rectangle_exit_point(bounds: Bounds, direction: Point) -> Point {
    let center = bounds.center();
    let (ex, ey) = (direction.x(), direction.y());
    let slope = bounds.height() / bounds.width();

    if ex != 0.0 && (-slope..=slope).contains(&(ey / ex)) {
        // Left or right side.
        let offset = bounds.width() / 2.0 * ey / ex;
        if ex > 0.0 {
            Point::new(bounds.max_x(), center.y() + offset)
        } else {
            Point::new(bounds.min_x(), center.y() - offset)
        }
    } else if ey != 0.0 {
        // Top or bottom side.
        let offset = bounds.height() / 2.0 * ex / ey;
        if ey > 0.0 {
            Point::new(center.x() + offset, bounds.max_y())
        } else {
            Point::new(center.x() - offset, bounds.min_y())
        }
    } else {
        center
    }
}

/// Fills `outline` with the background color, strokes it with the border
/// color and centers `label` inside it.
pub(crate) fn draw_shape(
    node: NodeRef<'_>,
    outline: &Outline,
    label: Option<&Label>,
    surface: &mut dyn Surface,
) {
    let style = node.style();
    let mut surface = SurfaceGuard::new(surface);
    surface.set_color(style.background_color());
    surface.fill(outline);
    surface.set_color(style.border_color());
    surface.draw(outline);

    let Some(label) = label.filter(|label| !label.is_empty()) else {
        return;
    };
    let metrics = node.metrics();
    let bounds = outline.bounds();
    let text = label.size(metrics);
    let label_bounds = Bounds::new_from_top_left(
        Point::new(bounds.min_x(), bounds.center().y() - text.height() / 2.0),
        Size::new(bounds.width(), text.height()),
    );
    surface.set_color(style.text_color());
    label.draw(&mut *surface, label_bounds, metrics);
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use proptest::prelude::*;

    use super::*;

    fn box_at(x: f32, y: f32, w: f32, h: f32) -> Bounds {
        Bounds::new_from_top_left(Point::new(x, y), Size::new(w, h))
    }

    #[test]
    fn test_exit_point_zero_direction_is_center() {
        let bounds = box_at(0.0, 0.0, 80.0, 60.0);
        assert_eq!(
            rectangle_exit_point(bounds, Point::default()),
            Point::new(40.0, 30.0)
        );
    }

    #[test]
    fn test_exit_point_sides() {
        let bounds = box_at(0.0, 0.0, 80.0, 60.0);
        assert_eq!(
            rectangle_exit_point(bounds, Point::new(10.0, 0.0)),
            Point::new(80.0, 30.0)
        );
        assert_eq!(
            rectangle_exit_point(bounds, Point::new(-10.0, 0.0)),
            Point::new(0.0, 30.0)
        );
        assert_eq!(
            rectangle_exit_point(bounds, Point::new(0.0, 5.0)),
            Point::new(40.0, 60.0)
        );
        assert_eq!(
            rectangle_exit_point(bounds, Point::new(0.0, -5.0)),
            Point::new(40.0, 0.0)
        );
    }

    #[test]
    fn test_exit_point_slides_along_side() {
        let bounds = box_at(0.0, 0.0, 100.0, 100.0);
        let point = rectangle_exit_point(bounds, Point::new(100.0, 50.0));
        assert_approx_eq!(f32, point.x(), 100.0);
        assert_approx_eq!(f32, point.y(), 75.0);
    }

    #[test]
    fn test_edge_other_end() {
        let a = NodeIndex::new(0);
        let b = NodeIndex::new(1);
        let c = NodeIndex::new(2);
        let edge = Edge::new(EdgeKind::ActivityTransition, a, Some(b));
        assert_eq!(edge.other_end(a), Some(b));
        assert_eq!(edge.other_end(b), Some(a));
        assert_eq!(edge.other_end(c), None);

        let dangling = Edge::new(EdgeKind::ActivityTransition, a, None);
        assert_eq!(dangling.other_end(a), None);
    }

    #[test]
    fn test_node_style_builders() {
        let red = Color::new("red").unwrap();
        let style = NodeStyle::default().with_border_color(red);
        assert_eq!(style.border_color(), red);
        assert_eq!(style.background_color(), Color::white());
    }

    #[test]
    fn test_nested_keeps_kind() {
        let node = Node::state("Idle");
        assert_eq!(node.kind(), NodeKind::State);
        assert_eq!(node.label().map(Label::text), Some("Idle"));
    }

    #[test]
    fn test_duplicate_is_detached_and_independent() {
        let mut original = Node::activity("Ship");
        original.set_location(Point::new(5.0, 6.0));
        original.set_parent(Some(NodeIndex::new(3)));
        original.children_mut().push(NodeIndex::new(4));

        let mut copy = original.duplicate();
        assert_eq!(copy.location(), Point::new(5.0, 6.0));
        assert!(copy.parent().is_none());
        assert!(copy.children().is_empty());

        copy.label_mut().unwrap().set_text("Bill");
        assert_eq!(original.label().unwrap().text(), "Ship");
    }

    proptest! {
        #[test]
        fn exit_point_lies_on_border(
            dx in -500.0f32..500.0,
            dy in -500.0f32..500.0,
        ) {
            prop_assume!(dx.abs() > 0.01 || dy.abs() > 0.01);
            let bounds = box_at(10.0, 20.0, 80.0, 60.0);
            let point = rectangle_exit_point(bounds, Point::new(dx, dy));
            let eps = 1e-3;
            let on_vertical = (point.x() - bounds.min_x()).abs() < eps
                || (point.x() - bounds.max_x()).abs() < eps;
            let on_horizontal = (point.y() - bounds.min_y()).abs() < eps
                || (point.y() - bounds.max_y()).abs() < eps;
            prop_assert!(on_vertical || on_horizontal);
            prop_assert!(point.x() >= bounds.min_x() - eps && point.x() <= bounds.max_x() + eps);
            prop_assert!(point.y() >= bounds.min_y() - eps && point.y() <= bounds.max_y() + eps);
        }
    }
}
