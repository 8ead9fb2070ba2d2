use tessel_core::{
    draw::{Outline, Surface, SurfaceGuard},
    geometry::{Bounds, Point, Size},
};

use super::{Edge, NodeBehavior, NodeKind, NodeRef, direction_to_other_end};

const DIAMETER: f32 = 20.0;
const FINAL_STATE_GAP: f32 = 3.0;

/// Small circle marking where a state machine starts or ends.
#[derive(Debug, Clone)]
pub struct Circular {
    kind: NodeKind,
}

impl Circular {
    pub fn initial() -> Self {
        Self {
            kind: NodeKind::InitialState,
        }
    }

    pub fn final_state() -> Self {
        Self {
            kind: NodeKind::FinalState,
        }
    }
}

impl NodeBehavior for Circular {
    fn kind(&self) -> NodeKind {
        self.kind
    }

    fn bounds(&self, node: NodeRef<'_>) -> Bounds {
        Bounds::new_from_top_left(node.location(), Size::new(DIAMETER, DIAMETER))
    }

    fn outline(&self, node: NodeRef<'_>) -> Outline {
        Outline::Ellipse(self.bounds(node))
    }

    /// Point on the circle facing the opposite endpoint.
    fn connection_point(&self, node: NodeRef<'_>, edge: &Edge) -> Point {
        let (bounds, direction) = direction_to_other_end(node, edge);
        let center = bounds.center();
        let length = direction.hypot();
        if length == 0.0 {
            return center;
        }
        center.add_point(direction.scale(bounds.width() / 2.0 / length))
    }

    fn draw(&self, node: NodeRef<'_>, surface: &mut dyn Surface) {
        let style = node.style();
        let bounds = self.bounds(node);
        let mut surface = SurfaceGuard::new(surface);
        surface.set_color(style.border_color());
        match self.kind {
            NodeKind::FinalState => {
                let inner_size = Size::new(
                    bounds.width() - 2.0 * FINAL_STATE_GAP,
                    bounds.height() - 2.0 * FINAL_STATE_GAP,
                );
                surface.draw(&Outline::Ellipse(bounds));
                surface.fill(&Outline::Ellipse(Bounds::new_from_center(
                    bounds.center(),
                    inner_size,
                )));
            }
            _ => surface.fill(&Outline::Ellipse(bounds)),
        }
    }

    fn clone_box(&self) -> Box<dyn NodeBehavior> {
        Box::new(self.clone())
    }
}
