//! Span fitting and connection points of synchronization bars.

use float_cmp::assert_approx_eq;
use proptest::prelude::*;

use tessel::{
    EdgeKind, Graph, Node, Orientation,
    geometry::{Bounds, Point, Size},
    graph::NodeIndex,
    node::rectangular_connection_point,
};

/// An 80x60 activity at (43, 43) and a horizontal bar dropped at (100, 100).
///
/// The drop point lies inside the activity, which does not host children, so
/// the bar stays detached at the origin.
fn activity_and_bar() -> (Graph, NodeIndex, NodeIndex) {
    let mut graph = Graph::new();
    let (activity, placed) = graph.add_node(Node::activity(""), Point::new(43.0, 43.0));
    assert!(placed);
    let (bar, placed) = graph.add_node(
        Node::synchronization_bar(Orientation::Horizontal),
        Point::new(100.0, 100.0),
    );
    assert!(!placed);
    (graph, activity, bar)
}

#[test]
fn test_get_bounds_for_horizontal_bar() {
    let (mut graph, activity, bar) = activity_and_bar();
    graph
        .connect(EdgeKind::ActivityTransition, activity, Some(bar))
        .expect("edge should be accepted");

    let bounds = graph.bounds(bar);
    assert_eq!(
        bounds,
        Bounds::new_from_top_left(Point::new(31.0, 0.0), Size::new(104.0, 4.0))
    );
    assert_eq!(graph.location(bar), Point::new(31.0, 0.0));

    // Asking again does not move the bar any further.
    assert_eq!(graph.bounds(bar), bounds);
}

#[test]
fn test_get_connection_point_for_horizontal_bar() {
    let (mut graph, activity, bar) = activity_and_bar();
    let edge_id = graph
        .connect(EdgeKind::ActivityTransition, activity, Some(bar))
        .expect("edge should be accepted");
    let edge = graph.edge(edge_id).unwrap();

    let point = graph.connection_point(bar, &edge);
    assert_eq!(point, Point::new(83.0, 4.0));
}

#[test]
fn test_vertical_bar_spans_on_y() {
    let mut graph = Graph::new();
    let (activity, _) = graph.add_node(Node::activity(""), Point::new(43.0, 43.0));
    let bar = graph.insert(Node::synchronization_bar(Orientation::Vertical));
    let edge_id = graph
        .connect(EdgeKind::ActivityTransition, activity, Some(bar))
        .unwrap();

    let bounds = graph.bounds(bar);
    assert_eq!(
        bounds,
        Bounds::new_from_top_left(Point::new(0.0, 31.0), Size::new(4.0, 84.0))
    );

    let edge = graph.edge(edge_id).unwrap();
    assert_eq!(graph.connection_point(bar, &edge), Point::new(4.0, 73.0));
}

#[test]
fn test_bar_spans_incoming_and_outgoing_edges() {
    let mut graph = Graph::new();
    let (left, _) = graph.add_node(Node::activity(""), Point::new(43.0, 43.0));
    let (right, _) = graph.add_node(Node::activity(""), Point::new(200.0, 43.0));
    let bar = graph.insert(Node::synchronization_bar(Orientation::Horizontal));
    graph
        .connect(EdgeKind::ActivityTransition, left, Some(bar))
        .unwrap();
    graph
        .connect(EdgeKind::ActivityTransition, bar, Some(right))
        .unwrap();

    let bounds = graph.bounds(bar);
    assert_approx_eq!(f32, bounds.min_x(), 31.0);
    assert_approx_eq!(f32, bounds.max_x(), 292.0);
    assert_approx_eq!(f32, bounds.height(), 4.0);
}

#[test]
fn test_extreme_at_zero_is_not_extended() {
    let mut graph = Graph::new();
    let (activity, _) = graph.add_node(Node::activity(""), Point::new(0.0, 0.0));
    let bar = graph.insert(Node::synchronization_bar(Orientation::Horizontal));
    graph
        .connect(EdgeKind::ActivityTransition, activity, Some(bar))
        .unwrap();

    let bounds = graph.bounds(bar);
    assert_approx_eq!(f32, bounds.min_x(), 0.0);
    assert_approx_eq!(f32, bounds.width(), 92.0);
}

#[test]
fn test_unconnected_bar_keeps_default_bounds() {
    let mut graph = Graph::new();
    let (bar, _) = graph.add_node(
        Node::synchronization_bar(Orientation::Horizontal),
        Point::new(10.0, 20.0),
    );
    assert_eq!(
        graph.bounds(bar),
        Bounds::new_from_top_left(Point::new(10.0, 20.0), Size::new(100.0, 4.0))
    );
}

#[test]
fn test_bar_to_bar_connection_is_refused() {
    let mut graph = Graph::new();
    let first = graph.insert(Node::synchronization_bar(Orientation::Horizontal));
    let second = graph.insert(Node::synchronization_bar(Orientation::Vertical));

    assert!(
        graph
            .connect(EdgeKind::ActivityTransition, first, Some(second))
            .is_none()
    );
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn test_bar_refuses_missing_end_and_itself() {
    let mut graph = Graph::new();
    let bar = graph.insert(Node::synchronization_bar(Orientation::Horizontal));
    assert!(graph.connect(EdgeKind::ActivityTransition, bar, None).is_none());
    assert!(
        graph
            .connect(EdgeKind::ActivityTransition, bar, Some(bar))
            .is_none()
    );
}

#[test]
fn test_other_edge_kinds_use_default_connection_point() {
    let mut graph = Graph::new();
    let (note, _) = graph.add_node(Node::note("fork here"), Point::new(300.0, 300.0));
    let bar = graph.insert(Node::synchronization_bar(Orientation::Horizontal));
    let edge_id = graph
        .connect(EdgeKind::NoteConnector, note, Some(bar))
        .unwrap();
    let edge = graph.edge(edge_id).unwrap();

    // Fit the bar first; both calls below then see the same geometry.
    graph.bounds(bar);
    let expected = rectangular_connection_point(graph.node_ref(bar), &edge);
    assert_eq!(graph.connection_point(bar, &edge), expected);
}

#[test]
fn test_state_bar_fits_along_state_transitions() {
    let mut graph = Graph::new();
    let (state, _) = graph.add_node(Node::state(""), Point::new(43.0, 43.0));
    let bar = graph.insert(Node::state_synchronization_bar(Orientation::Horizontal));
    let edge_id = graph
        .connect(EdgeKind::StateTransition, bar, Some(state))
        .unwrap();
    let edge = graph.edge(edge_id).unwrap();

    assert_eq!(graph.connection_point(bar, &edge), Point::new(83.0, 4.0));
}

proptest! {
    #[test]
    fn bar_reaches_past_connected_activity(x in 1.0f32..500.0, y in 1.0f32..500.0) {
        let mut graph = Graph::new();
        let activity = graph.insert(Node::activity(""));
        graph.set_location(activity, Point::new(x, y));
        let bar = graph.insert(Node::synchronization_bar(Orientation::Horizontal));
        graph.connect(EdgeKind::ActivityTransition, activity, Some(bar)).unwrap();

        let bounds = graph.bounds(bar);
        prop_assert!((bounds.min_x() - (x - 12.0)).abs() < 1e-3);
        prop_assert!((bounds.width() - 104.0).abs() < 1e-3);
        prop_assert!((bounds.height() - 4.0).abs() < 1e-6);
    }
}
