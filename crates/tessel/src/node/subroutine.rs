//! Composite state container.
//!
//! A subroutine is a rounded box with a name compartment that hosts other
//! state diagram nodes. It grows to cover its children plus a fixed gap, and
//! before drawing a child it pushes that child out of the strip reserved for
//! the name at the top and away from the left border.

use log::trace;

use tessel_core::{
    draw::{Outline, Surface, SurfaceGuard},
    geometry::{Bounds, Point, Size},
    text::Label,
};

use super::{CompartmentLayout, Edge, NodeBehavior, NodeKind, NodeRef};

const ANCHOR_SIZE: Size = Size::new(30.0, 10.0);
/// Space kept between the children and the container border.
const CHILD_GAP: f32 = 20.0;
const COMPARTMENT_HEIGHT: f32 = 20.0;
const ARC: f32 = 20.0;
const DEFAULT_WIDTH: f32 = 80.0;
const DEFAULT_HEIGHT: f32 = 60.0;

const ALLOWED_CHILDREN: &[NodeKind] = &[
    NodeKind::FinalState,
    NodeKind::InitialState,
    NodeKind::State,
    NodeKind::SynchronizationBar,
    NodeKind::Decision,
    NodeKind::Note,
];

#[derive(Debug, Clone)]
pub struct Subroutine {
    name: Label,
    layout: CompartmentLayout,
}

impl Subroutine {
    pub fn new(name: &str) -> Self {
        Self {
            name: Label::new(name),
            layout: CompartmentLayout::new(DEFAULT_HEIGHT, COMPARTMENT_HEIGHT, DEFAULT_WIDTH),
        }
    }

    pub fn name(&self) -> &Label {
        &self.name
    }

    /// Union of the children bounds and the local origin, grown by the gap.
    fn children_bounds(&self, node: NodeRef<'_>) -> Bounds {
        let graph = node.graph();
        node.children()
            .iter()
            .fold(Bounds::default(), |acc, child| acc.merge(&graph.bounds(*child)))
            .grow(CHILD_GAP, CHILD_GAP)
    }

    /// The name's own extent, centered horizontally at the top of `bounds`.
    fn name_bounds(&self, node: NodeRef<'_>, bounds: Bounds) -> Bounds {
        let size = self.name.size(node.metrics());
        let x = bounds.min_x() + (bounds.width() - size.width()) / 2.0;
        Bounds::new_from_top_left(Point::new(x, bounds.min_y()), size)
    }
}

impl NodeBehavior for Subroutine {
    fn kind(&self) -> NodeKind {
        NodeKind::Subroutine
    }

    fn bounds(&self, node: NodeRef<'_>) -> Bounds {
        let location = node.location();
        let compartment = self
            .layout
            .first_bounds(location, &[&self.name], node.metrics());
        let children = self.children_bounds(node).with_origin(location);
        let bounds = node.grid().snap(compartment.merge(&children));
        trace!(node:? = node.id(), bounds:?; "Subroutine bounds");
        bounds
    }

    fn outline(&self, node: NodeRef<'_>) -> Outline {
        Outline::RoundedRectangle {
            bounds: self.bounds(node),
            arc: ARC,
        }
    }

    fn add_connection(&self, node: NodeRef<'_>, edge: &Edge) -> bool {
        match edge.end() {
            None => false,
            Some(end) if end == node.id() => false,
            Some(_) => true,
        }
    }

    fn accepts_child(&self, kind: NodeKind) -> bool {
        ALLOWED_CHILDREN.contains(&kind)
    }

    fn draw(&self, node: NodeRef<'_>, surface: &mut dyn Surface) {
        let delta = node.location_on_graph().sub_point(node.location());
        {
            let mut frame = SurfaceGuard::translated(surface, delta);
            let bounds = self.bounds(node);
            let outline = Outline::RoundedRectangle { bounds, arc: ARC };
            let style = node.style();

            frame.set_color(style.background_color());
            frame.fill(&outline);
            frame.set_color(style.border_color());
            frame.draw(&outline);
            frame.set_color(style.text_color());
            self.name
                .draw(&mut *frame, self.name_bounds(node, bounds), node.metrics());
        }

        let anchor = Bounds::new_from_top_left(delta.negate(), ANCHOR_SIZE);
        let graph = node.graph();
        for child in node.children() {
            fix_child_location(anchor, graph.node_ref(*child));
            graph.draw_node(*child, surface);
        }
    }

    fn label(&self) -> Option<&Label> {
        Some(&self.name)
    }

    fn label_mut(&mut self) -> Option<&mut Label> {
        Some(&mut self.name)
    }

    fn clone_box(&self) -> Box<dyn NodeBehavior> {
        Box::new(self.clone())
    }
}

/// Moves `child` below the anchor strip and away from the left border.
///
/// A child whose `y` is at or above `anchor.height() + CHILD_GAP` is moved
/// down to exactly that line; a child whose `x` is left of `CHILD_GAP` is
/// moved right to it. The two checks are independent.
pub fn fix_child_location(anchor: Bounds, child: NodeRef<'_>) {
    let location = child.location();
    let top = anchor.height() + CHILD_GAP;
    if location.y() <= top {
        child.move_by(Point::new(0.0, top - location.y()));
    }
    if location.x() < CHILD_GAP {
        child.move_by(Point::new(CHILD_GAP - location.x(), 0.0));
    }
}
