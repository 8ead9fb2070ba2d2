//! The diagram graph: an arena owning every node and edge of one diagram.
//!
//! Nodes and edges live in a [`StableDiGraph`], so their indices stay valid
//! when other elements are removed. Edges of the petgraph graph are the
//! diagram edges; the containment tree (parent and children) is stored on
//! the nodes themselves.
//!
//! Nodes without a parent are top-level nodes. Some of them were placed
//! explicitly, others are detached because a container refused them; both
//! are drawn at their own location.

mod grid;

pub use grid::{DEFAULT_GRID_SIZE, GridSticker};
pub use petgraph::stable_graph::{EdgeIndex, NodeIndex};

use log::{debug, trace};
use petgraph::stable_graph::StableDiGraph;

use tessel_core::{
    draw::{DEFAULT_FONT_FAMILY, Outline, Surface, SurfaceGuard, SvgSurface},
    geometry::{Bounds, Point},
    text::{ApproximateMetrics, TextMetrics},
};

use crate::node::{Edge, EdgeKind, Node, NodeKind, NodeRef, NodeStyle};

/// Margin around the diagram in exported documents.
const EXPORT_MARGIN: f32 = 10.0;

#[derive(Debug)]
pub struct Graph {
    graph: StableDiGraph<Node, EdgeKind>,
    grid: GridSticker,
    style: NodeStyle,
    metrics: Box<dyn TextMetrics>,
    font_family: String,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    /// Creates an empty graph with the default grid, default style and
    /// font-free text metrics.
    pub fn new() -> Self {
        Self {
            graph: StableDiGraph::new(),
            grid: GridSticker::default(),
            style: NodeStyle::default(),
            metrics: Box::new(ApproximateMetrics::default()),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
        }
    }

    pub fn with_grid(mut self, grid: GridSticker) -> Self {
        self.grid = grid;
        self
    }

    pub fn with_style(mut self, style: NodeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_metrics(mut self, metrics: impl TextMetrics + 'static) -> Self {
        self.metrics = Box::new(metrics);
        self
    }

    /// Sets the font family written into rendered documents.
    pub fn with_font_family(mut self, family: &str) -> Self {
        self.font_family = family.to_string();
        self
    }

    pub fn grid(&self) -> &GridSticker {
        &self.grid
    }

    /// Style used by nodes that do not carry their own.
    pub fn default_style(&self) -> &NodeStyle {
        &self.style
    }

    pub fn metrics(&self) -> &dyn TextMetrics {
        self.metrics.as_ref()
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains_node(&self, id: NodeIndex) -> bool {
        self.graph.contains_node(id)
    }

    /// Returns the node stored at `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not refer to a node of this graph.
    pub fn node(&self, id: NodeIndex) -> &Node {
        self.graph
            .node_weight(id)
            .expect("Node index should exist")
    }

    /// Mutable access to a node, for editing its label or style.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not refer to a node of this graph.
    pub fn node_mut(&mut self, id: NodeIndex) -> &mut Node {
        self.graph
            .node_weight_mut(id)
            .expect("Node index should exist")
    }

    pub fn node_ref(&self, id: NodeIndex) -> NodeRef<'_> {
        NodeRef::new(self, id)
    }

    pub fn kind(&self, id: NodeIndex) -> NodeKind {
        self.node(id).kind()
    }

    /// Adds a detached node and returns its index.
    pub fn insert(&mut self, node: Node) -> NodeIndex {
        let id = self.graph.add_node(node);
        trace!(node:? = id, kind:% = self.kind(id); "Inserted node");
        id
    }

    /// Puts `id` at the graph point `point`.
    ///
    /// Notes always become top-level nodes. Otherwise, when a node's bounds
    /// contain `point`, the innermost such node is asked to adopt `id`; a
    /// refused node stays detached where it is and `false` is returned.
    /// When nothing contains `point` the node becomes top-level at `point`.
    pub fn place(&mut self, id: NodeIndex, point: Point) -> bool {
        if self.kind(id) == NodeKind::Note {
            self.make_top_level(id, point);
            return true;
        }
        match self.find_node_excluding(point, Some(id)) {
            Some(parent) => {
                let local = point.sub_point(self.location_on_graph(parent));
                self.add_child(parent, id, local)
            }
            None => {
                self.make_top_level(id, point);
                true
            }
        }
    }

    /// Inserts `node` and places it at `point`; see [`Graph::place`].
    pub fn add_node(&mut self, node: Node, point: Point) -> (NodeIndex, bool) {
        let id = self.insert(node);
        let placed = self.place(id, point);
        (id, placed)
    }

    /// Nests `child` inside `parent` at `point`, relative to the parent.
    ///
    /// Returns `false`, leaving everything untouched, when the parent does
    /// not accept the child's kind or the nesting would create a cycle.
    pub fn add_child(&mut self, parent: NodeIndex, child: NodeIndex, point: Point) -> bool {
        if parent == child || self.is_ancestor(child, parent) {
            return false;
        }
        let kind = self.kind(child);
        if !self.node(parent).behavior().accepts_child(kind) {
            debug!(parent:?, child:?, kind:%; "Child refused");
            return false;
        }

        self.detach(child);
        let node = self.node_mut(child);
        node.set_parent(Some(parent));
        node.set_location(point);
        self.node_mut(parent).children_mut().push(child);
        debug!(parent:?, child:?, kind:%; "Child added");
        true
    }

    /// Creates an edge of `kind` from `start` to `end`.
    ///
    /// The start node decides through its connection policy; the edge is
    /// stored only when the policy accepts it and `end` is set.
    pub fn connect(
        &mut self,
        kind: EdgeKind,
        start: NodeIndex,
        end: Option<NodeIndex>,
    ) -> Option<EdgeIndex> {
        let candidate = Edge::new(kind, start, end);
        if !self.node(start).behavior().add_connection(self.node_ref(start), &candidate) {
            debug!(start:?, end:?, kind:?; "Connection refused");
            return None;
        }
        let end = end?;
        let id = self.graph.add_edge(start, end, kind);
        debug!(edge:? = id, start:?, end:?, kind:?; "Connected");
        Some(id)
    }

    /// Removes `id`, every node nested in it and all their edges.
    pub fn remove_node(&mut self, id: NodeIndex) -> Option<Node> {
        if !self.contains_node(id) {
            return None;
        }
        self.detach(id);
        let mut pending = self.node(id).children().to_vec();
        while let Some(descendant) = pending.pop() {
            if let Some(node) = self.graph.remove_node(descendant) {
                pending.extend_from_slice(node.children());
            }
        }
        debug!(node:? = id; "Removed node");
        self.graph.remove_node(id)
    }

    pub fn remove_edge(&mut self, id: EdgeIndex) -> Option<Edge> {
        let edge = self.edge(id)?;
        self.graph.remove_edge(id);
        Some(edge)
    }

    /// Inserts an independent copy of `id` as a detached node.
    ///
    /// Children are not copied.
    pub fn duplicate(&mut self, id: NodeIndex) -> NodeIndex {
        let copy = self.node(id).duplicate();
        self.insert(copy)
    }

    pub fn edge(&self, id: EdgeIndex) -> Option<Edge> {
        let (start, end) = self.graph.edge_endpoints(id)?;
        let kind = *self.graph.edge_weight(id)?;
        Some(Edge::new(kind, start, Some(end)))
    }

    /// Every stored edge with its index.
    pub fn all_edges(&self) -> impl Iterator<Item = (EdgeIndex, Edge)> + '_ {
        self.graph
            .edge_indices()
            .filter_map(|id| self.edge(id).map(|edge| (id, edge)))
    }

    /// Nodes without a parent, in index order.
    ///
    /// Indices freed by [`Graph::remove_node`] are reused, so a node inserted
    /// after a removal may come before older nodes.
    pub fn roots(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph
            .node_indices()
            .filter(|id| self.node(*id).parent().is_none())
    }

    pub fn children(&self, id: NodeIndex) -> &[NodeIndex] {
        self.node(id).children()
    }

    pub fn parent(&self, id: NodeIndex) -> Option<NodeIndex> {
        self.node(id).parent()
    }

    /// Location in the parent's frame.
    pub fn location(&self, id: NodeIndex) -> Point {
        self.node(id).location()
    }

    pub fn set_location(&mut self, id: NodeIndex, location: Point) {
        self.node(id).set_location(location);
    }

    pub fn translate(&mut self, id: NodeIndex, offset: Point) {
        self.node_ref(id).move_by(offset);
    }

    /// Location in graph coordinates: the node's location plus the locations
    /// of all its ancestors.
    pub fn location_on_graph(&self, id: NodeIndex) -> Point {
        let mut location = self.location(id);
        let mut current = self.parent(id);
        while let Some(parent) = current {
            location = location.add_point(self.location(parent));
            current = self.parent(parent);
        }
        location
    }

    /// Bounds in the parent's frame.
    pub fn bounds(&self, id: NodeIndex) -> Bounds {
        self.node(id).behavior().bounds(self.node_ref(id))
    }

    /// Bounds in graph coordinates.
    pub fn graph_bounds(&self, id: NodeIndex) -> Bounds {
        let bounds = self.bounds(id);
        match self.parent(id) {
            Some(parent) => bounds.translate(self.location_on_graph(parent)),
            None => bounds,
        }
    }

    pub fn outline(&self, id: NodeIndex) -> Outline {
        self.node(id).behavior().outline(self.node_ref(id))
    }

    /// Where `edge` attaches to `id`, in graph coordinates.
    pub fn connection_point(&self, id: NodeIndex, edge: &Edge) -> Point {
        self.node(id)
            .behavior()
            .connection_point(self.node_ref(id), edge)
    }

    /// The innermost node whose bounds contain the graph point `point`.
    ///
    /// Later nodes are drawn on top of earlier ones and win ties.
    pub fn find_node(&self, point: Point) -> Option<NodeIndex> {
        self.find_node_excluding(point, None)
    }

    fn find_node_excluding(&self, point: Point, excluded: Option<NodeIndex>) -> Option<NodeIndex> {
        let roots: Vec<NodeIndex> = self.roots().collect();
        self.find_among(&roots, point, excluded)
    }

    fn find_among(
        &self,
        candidates: &[NodeIndex],
        point: Point,
        excluded: Option<NodeIndex>,
    ) -> Option<NodeIndex> {
        candidates
            .iter()
            .rev()
            .copied()
            .filter(|id| Some(*id) != excluded)
            .find(|id| self.graph_bounds(*id).contains(point))
            .map(|id| {
                self.find_among(self.children(id), point, excluded)
                    .unwrap_or(id)
            })
    }

    /// Whether `ancestor` is `id` itself or one of its ancestors.
    fn is_ancestor(&self, ancestor: NodeIndex, id: NodeIndex) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Removes `id` from its parent's children, leaving its location as is.
    fn detach(&mut self, id: NodeIndex) {
        if let Some(parent) = self.parent(id) {
            self.node_mut(parent).children_mut().retain(|child| *child != id);
            self.node_mut(id).set_parent(None);
        }
    }

    fn make_top_level(&mut self, id: NodeIndex, point: Point) {
        self.detach(id);
        self.node(id).set_location(point);
        debug!(node:? = id, point:?; "Placed top-level node");
    }

    /// Draws one node; containers draw their children as well.
    pub fn draw_node(&self, id: NodeIndex, surface: &mut dyn Surface) {
        self.node(id).behavior().draw(self.node_ref(id), surface);
    }

    /// Draws every top-level node, then every edge as a straight line
    /// between its connection points.
    pub fn draw(&self, surface: &mut dyn Surface) {
        let roots: Vec<NodeIndex> = self.roots().collect();
        for id in roots {
            self.draw_node(id, surface);
        }

        let mut surface = SurfaceGuard::new(surface);
        surface.set_color(self.style.border_color());
        for (_, edge) in self.all_edges() {
            let Some(end) = edge.end() else {
                continue;
            };
            let from = self.connection_point(edge.start(), &edge);
            let to = self.connection_point(end, &edge);
            surface.draw(&Outline::Line(from, to));
        }
    }

    /// Graph bounds enclosing every node, or `None` for an empty graph.
    pub fn diagram_bounds(&self) -> Option<Bounds> {
        self.graph
            .node_indices()
            .map(|id| self.graph_bounds(id))
            .reduce(|acc, bounds| acc.merge(&bounds))
    }

    /// Renders the whole diagram into an SVG document.
    ///
    /// The document's view box covers every node plus a small margin.
    pub fn render_svg(&self) -> svg::Document {
        let mut surface = SvgSurface::new().with_font_family(&self.font_family);
        self.draw(&mut surface);
        let view = self
            .diagram_bounds()
            .map(|bounds| {
                Bounds::new_from_top_left(
                    bounds.min_point().sub_point(Point::new(EXPORT_MARGIN, EXPORT_MARGIN)),
                    bounds.to_size(),
                )
                .grow(2.0 * EXPORT_MARGIN, 2.0 * EXPORT_MARGIN)
            })
            .unwrap_or_default();
        surface.into_document(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Orientation;

    #[test]
    fn test_place_into_empty_graph_is_top_level() {
        let mut graph = Graph::new();
        let (id, placed) = graph.add_node(Node::activity("Load"), Point::new(43.0, 43.0));
        assert!(placed);
        assert_eq!(graph.location(id), Point::new(43.0, 43.0));
        assert_eq!(graph.roots().collect::<Vec<_>>(), vec![id]);
    }

    #[test]
    fn test_place_inside_container_nests_with_local_location() {
        let mut graph = Graph::new();
        let (container, _) = graph.add_node(Node::subroutine("Sub"), Point::new(100.0, 100.0));
        let (state, placed) = graph.add_node(Node::state("Idle"), Point::new(130.0, 150.0));
        assert!(placed);
        assert_eq!(graph.parent(state), Some(container));
        assert_eq!(graph.location(state), Point::new(30.0, 50.0));
        assert_eq!(graph.location_on_graph(state), Point::new(130.0, 150.0));
    }

    #[test]
    fn test_refused_child_stays_detached() {
        let mut graph = Graph::new();
        graph.add_node(Node::activity("Load"), Point::new(43.0, 43.0));
        let (bar, placed) = graph.add_node(
            Node::synchronization_bar(Orientation::Horizontal),
            Point::new(100.0, 100.0),
        );
        assert!(!placed);
        assert_eq!(graph.parent(bar), None);
        assert_eq!(graph.location(bar), Point::default());
    }

    #[test]
    fn test_notes_are_always_top_level() {
        let mut graph = Graph::new();
        graph.add_node(Node::subroutine("Sub"), Point::new(0.0, 0.0));
        let (note, placed) = graph.add_node(Node::note("remember"), Point::new(10.0, 10.0));
        assert!(placed);
        assert_eq!(graph.parent(note), None);
        assert_eq!(graph.location(note), Point::new(10.0, 10.0));
    }

    #[test]
    fn test_add_child_rejects_cycles() {
        let mut graph = Graph::new();
        let outer = graph.insert(Node::subroutine("Outer"));
        let state = graph.insert(Node::state("Idle"));
        assert!(graph.add_child(outer, state, Point::new(20.0, 40.0)));
        assert!(!graph.add_child(state, outer, Point::default()));
        assert!(!graph.add_child(outer, outer, Point::default()));
    }

    #[test]
    fn test_add_child_moves_between_parents() {
        let mut graph = Graph::new();
        let first = graph.insert(Node::subroutine("First"));
        let second = graph.insert(Node::subroutine("Second"));
        let state = graph.insert(Node::state("Idle"));

        assert!(graph.add_child(first, state, Point::new(20.0, 40.0)));
        assert!(graph.add_child(second, state, Point::new(25.0, 45.0)));
        assert!(graph.children(first).is_empty());
        assert_eq!(graph.children(second), &[state]);
        assert_eq!(graph.location(state), Point::new(25.0, 45.0));
    }

    #[test]
    fn test_connect_requires_end() {
        let mut graph = Graph::new();
        let start = graph.insert(Node::activity("A"));
        assert!(graph.connect(EdgeKind::ActivityTransition, start, None).is_none());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_remove_node_removes_subtree_and_edges() {
        let mut graph = Graph::new();
        let container = graph.insert(Node::subroutine("Sub"));
        let inner = graph.insert(Node::state("Inner"));
        let outside = graph.insert(Node::state("Outside"));
        assert!(graph.add_child(container, inner, Point::new(20.0, 40.0)));
        graph
            .connect(EdgeKind::StateTransition, outside, Some(inner))
            .unwrap();

        assert!(graph.remove_node(container).is_some());
        assert!(!graph.contains_node(inner));
        assert!(graph.contains_node(outside));
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.remove_node(container).is_none());
    }

    #[test]
    fn test_remove_edge() {
        let mut graph = Graph::new();
        let a = graph.insert(Node::activity("A"));
        let b = graph.insert(Node::activity("B"));
        let id = graph
            .connect(EdgeKind::ActivityTransition, a, Some(b))
            .unwrap();
        let removed = graph.remove_edge(id).unwrap();
        assert_eq!(removed.start(), a);
        assert_eq!(removed.end(), Some(b));
        assert!(graph.remove_edge(id).is_none());
    }

    #[test]
    fn test_find_node_prefers_innermost() {
        let mut graph = Graph::new();
        let (container, _) = graph.add_node(Node::subroutine("Sub"), Point::new(0.0, 0.0));
        let (state, _) = graph.add_node(Node::state("Idle"), Point::new(30.0, 40.0));
        assert_eq!(graph.parent(state), Some(container));
        assert_eq!(graph.find_node(Point::new(50.0, 60.0)), Some(state));
        assert_eq!(graph.find_node(Point::new(5.0, 5.0)), Some(container));
        assert_eq!(graph.find_node(Point::new(-5.0, -5.0)), None);
    }

    #[test]
    fn test_translate_and_set_location() {
        let mut graph = Graph::new();
        let id = graph.insert(Node::activity("A"));
        graph.set_location(id, Point::new(10.0, 10.0));
        graph.translate(id, Point::new(5.0, -2.0));
        assert_eq!(graph.location(id), Point::new(15.0, 8.0));
    }

    #[test]
    fn test_render_svg_uses_font_family() {
        let mut graph = Graph::new().with_font_family("Noto Sans");
        graph.add_node(Node::activity("Pack"), Point::new(0.0, 0.0));
        assert_eq!(graph.font_family(), "Noto Sans");

        let svg = graph.render_svg().to_string();
        assert!(svg.contains("font-family=\"Noto Sans\""));
    }

    #[test]
    fn test_roots_reuse_freed_indices() {
        let mut graph = Graph::new();
        let first = graph.insert(Node::activity("A"));
        let second = graph.insert(Node::activity("B"));
        graph.remove_node(first);
        let third = graph.insert(Node::activity("C"));

        let roots: Vec<NodeIndex> = graph.roots().collect();
        assert_eq!(roots.len(), 2);
        assert!(roots.contains(&second) && roots.contains(&third));
    }

    #[test]
    fn test_diagram_bounds_of_empty_graph() {
        assert!(Graph::new().diagram_bounds().is_none());
    }
}
