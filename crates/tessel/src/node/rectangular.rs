use tessel_core::{
    draw::Outline,
    geometry::{Bounds, Size},
    text::Label,
};

use super::{NodeBehavior, NodeKind, NodeRef, label_fitted_bounds};

const DEFAULT_SIZE: Size = Size::new(80.0, 60.0);
const PADDING: Size = Size::new(20.0, 20.0);
const ACTIVITY_ARC: f32 = 20.0;
const STATE_ARC: f32 = 20.0;

/// Rounded box with a centered label: activities and states.
#[derive(Debug, Clone)]
pub struct Rectangular {
    kind: NodeKind,
    name: Label,
    arc: f32,
}

impl Rectangular {
    pub fn activity(name: &str) -> Self {
        Self {
            kind: NodeKind::Activity,
            name: Label::new(name),
            arc: ACTIVITY_ARC,
        }
    }

    pub fn state(name: &str) -> Self {
        Self {
            kind: NodeKind::State,
            name: Label::new(name),
            arc: STATE_ARC,
        }
    }
}

impl NodeBehavior for Rectangular {
    fn kind(&self) -> NodeKind {
        self.kind
    }

    fn bounds(&self, node: NodeRef<'_>) -> Bounds {
        label_fitted_bounds(node, &self.name, DEFAULT_SIZE, PADDING)
    }

    fn outline(&self, node: NodeRef<'_>) -> Outline {
        Outline::RoundedRectangle {
            bounds: self.bounds(node),
            arc: self.arc,
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
