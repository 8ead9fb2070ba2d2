use tessel_core::{
    draw::Outline,
    geometry::{Bounds, Point, Size},
    text::Label,
};

use super::{Edge, NodeBehavior, NodeKind, NodeRef, direction_to_other_end};

const DEFAULT_SIZE: Size = Size::new(30.0, 20.0);

/// Diamond with an optional guard condition.
///
/// The diamond is twice as wide and tall as its text, which is the smallest
/// diamond the text rectangle fits into.
#[derive(Debug, Clone)]
pub struct Decision {
    condition: Label,
}

impl Decision {
    pub fn new(condition: &str) -> Self {
        Self {
            condition: Label::new(condition),
        }
    }
}

impl NodeBehavior for Decision {
    fn kind(&self) -> NodeKind {
        NodeKind::Decision
    }

    fn bounds(&self, node: NodeRef<'_>) -> Bounds {
        let text = self.condition.size(node.metrics());
        let size = DEFAULT_SIZE.max(Size::new(text.width() * 2.0, text.height() * 2.0));
        Bounds::new_from_top_left(node.location(), size)
    }

    fn outline(&self, node: NodeRef<'_>) -> Outline {
        Outline::Diamond(self.bounds(node))
    }

    /// The vertex on the dominant axis of the direction to the opposite
    /// endpoint.
    fn connection_point(&self, node: NodeRef<'_>, edge: &Edge) -> Point {
        let (bounds, direction) = direction_to_other_end(node, edge);
        let center = bounds.center();
        let (dx, dy) = (direction.x(), direction.y());
        if dx == 0.0 && dy == 0.0 {
            center
        } else if dx.abs() >= dy.abs() {
            let x = if dx > 0.0 { bounds.max_x() } else { bounds.min_x() };
            center.with_x(x)
        } else {
            let y = if dy > 0.0 { bounds.max_y() } else { bounds.min_y() };
            center.with_y(y)
        }
    }

    fn label(&self) -> Option<&Label> {
        Some(&self.condition)
    }

    fn label_mut(&mut self) -> Option<&mut Label> {
        Some(&mut self.condition)
    }

    fn clone_box(&self) -> Box<dyn NodeBehavior> {
        Box::new(self.clone())
    }
}
