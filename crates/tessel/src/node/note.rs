use tessel_core::{
    draw::{Outline, Surface},
    geometry::{Bounds, Point, Size},
    text::{Justification, Label},
};

use super::{NodeBehavior, NodeKind, NodeRef, draw_shape, label_fitted_bounds};

const DEFAULT_SIZE: Size = Size::new(60.0, 40.0);
const PADDING: Size = Size::new(20.0, 16.0);
const FOLD: f32 = 8.0;

/// Free text in a box with a folded top-right corner.
#[derive(Debug, Clone)]
pub struct Note {
    text: Label,
}

impl Note {
    pub fn new(text: &str) -> Self {
        let mut text = Label::new(text);
        text.set_justification(Justification::Left);
        Self { text }
    }
}

impl NodeBehavior for Note {
    fn kind(&self) -> NodeKind {
        NodeKind::Note
    }

    fn bounds(&self, node: NodeRef<'_>) -> Bounds {
        label_fitted_bounds(node, &self.text, DEFAULT_SIZE, PADDING)
    }

    fn outline(&self, node: NodeRef<'_>) -> Outline {
        let b = self.bounds(node);
        Outline::Polygon(vec![
            Point::new(b.min_x(), b.min_y()),
            Point::new(b.max_x() - FOLD, b.min_y()),
            Point::new(b.max_x(), b.min_y() + FOLD),
            Point::new(b.max_x(), b.max_y()),
            Point::new(b.min_x(), b.max_y()),
        ])
    }

    fn draw(&self, node: NodeRef<'_>, surface: &mut dyn Surface) {
        let outline = self.outline(node);
        draw_shape(node, &outline, None, surface);

        let bounds = self.bounds(node);
        let fold = Outline::Polygon(vec![
            Point::new(bounds.max_x() - FOLD, bounds.min_y()),
            Point::new(bounds.max_x() - FOLD, bounds.min_y() + FOLD),
            Point::new(bounds.max_x(), bounds.min_y() + FOLD),
        ]);
        let style = node.style();
        let previous = surface.set_color(style.border_color());
        surface.draw(&fold);
        surface.set_color(style.text_color());
        let text_bounds = Bounds::new_from_top_left(
            Point::new(
                bounds.min_x() + PADDING.width() / 2.0,
                bounds.min_y() + PADDING.height() / 2.0,
            ),
            Size::new(bounds.width() - PADDING.width(), bounds.height()),
        );
        self.text.draw(surface, text_bounds, node.metrics());
        surface.set_color(previous);
    }

    fn label(&self) -> Option<&Label> {
        Some(&self.text)
    }

    fn label_mut(&mut self) -> Option<&mut Label> {
        Some(&mut self.text)
    }

    fn clone_box(&self) -> Box<dyn NodeBehavior> {
        Box::new(self.clone())
    }
}
