use tessel_core::{
    draw::{Outline, Surface, SurfaceGuard},
    geometry::{Bounds, Point},
    text::Label,
};

use super::{Edge, NodeBehavior, NodeKind, NodeRef};

/// Draws the wrapped behavior in graph coordinates.
///
/// Geometry is kept in the parent's frame, so a node nested in a container
/// would otherwise be drawn relative to the graph origin. The wrapper shifts
/// the surface by the parent's offset (`location_on_graph - location`) for
/// the duration of the wrapped draw and shifts it back afterwards, also when
/// the wrapped draw unwinds. Every other call is forwarded unchanged.
#[derive(Debug)]
pub struct FrameCorrected {
    inner: Box<dyn NodeBehavior>,
}

impl FrameCorrected {
    pub fn new(inner: Box<dyn NodeBehavior>) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &dyn NodeBehavior {
        self.inner.as_ref()
    }
}

impl NodeBehavior for FrameCorrected {
    fn kind(&self) -> NodeKind {
        self.inner.kind()
    }

    fn bounds(&self, node: NodeRef<'_>) -> Bounds {
        self.inner.bounds(node)
    }

    fn outline(&self, node: NodeRef<'_>) -> Outline {
        self.inner.outline(node)
    }

    fn connection_point(&self, node: NodeRef<'_>, edge: &Edge) -> Point {
        self.inner.connection_point(node, edge)
    }

    fn add_connection(&self, node: NodeRef<'_>, edge: &Edge) -> bool {
        self.inner.add_connection(node, edge)
    }

    fn accepts_child(&self, kind: NodeKind) -> bool {
        self.inner.accepts_child(kind)
    }

    fn draw(&self, node: NodeRef<'_>, surface: &mut dyn Surface) {
        let delta = node.location_on_graph().sub_point(node.location());
        let mut surface = SurfaceGuard::translated(surface, delta);
        self.inner.draw(node, &mut *surface);
    }

    fn label(&self) -> Option<&Label> {
        self.inner.label()
    }

    fn label_mut(&mut self) -> Option<&mut Label> {
        self.inner.label_mut()
    }

    fn clone_box(&self) -> Box<dyn NodeBehavior> {
        Box::new(Self {
            inner: self.inner.clone_box(),
        })
    }
}
