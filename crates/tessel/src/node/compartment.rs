use tessel_core::{
    geometry::{Bounds, Point, Size},
    text::{Label, TextMetrics},
};

/// Stacks labelled compartments vertically inside a node.
///
/// Every compartment is at least `compartment_height` tall and as tall as its
/// label. The stack is at least `default_height` tall; any extra height goes
/// to the last compartment. All compartments share the width of the widest
/// label, but never less than `default_width`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompartmentLayout {
    default_height: f32,
    compartment_height: f32,
    default_width: f32,
}

impl CompartmentLayout {
    pub fn new(default_height: f32, compartment_height: f32, default_width: f32) -> Self {
        Self {
            default_height,
            compartment_height,
            default_width,
        }
    }

    /// Bounds of every compartment, top to bottom, starting at `location`.
    pub fn compartments(
        &self,
        location: Point,
        labels: &[&Label],
        metrics: &dyn TextMetrics,
    ) -> Vec<Bounds> {
        let sizes: Vec<Size> = labels.iter().map(|label| label.size(metrics)).collect();
        let width = sizes
            .iter()
            .map(|size| size.width())
            .fold(self.default_width, f32::max);
        let mut heights: Vec<f32> = sizes
            .iter()
            .map(|size| size.height().max(self.compartment_height))
            .collect();

        let total: f32 = heights.iter().sum();
        if total < self.default_height {
            if let Some(last) = heights.last_mut() {
                *last += self.default_height - total;
            }
        }

        let mut top = location.y();
        heights
            .into_iter()
            .map(|height| {
                let bounds =
                    Bounds::new_from_top_left(location.with_y(top), Size::new(width, height));
                top += height;
                bounds
            })
            .collect()
    }

    /// Bounds of the first compartment, or of an empty default-sized box when
    /// there are no labels.
    pub fn first_bounds(
        &self,
        location: Point,
        labels: &[&Label],
        metrics: &dyn TextMetrics,
    ) -> Bounds {
        self.compartments(location, labels, metrics)
            .into_iter()
            .next()
            .unwrap_or_else(|| {
                Bounds::new_from_top_left(
                    location,
                    Size::new(self.default_width, self.default_height),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;
    use tessel_core::text::ApproximateMetrics;

    fn layout() -> CompartmentLayout {
        CompartmentLayout::new(60.0, 20.0, 80.0)
    }

    #[test]
    fn test_single_empty_label_fills_default_box() {
        let metrics = ApproximateMetrics::default();
        let name = Label::default();
        let first = layout().first_bounds(Point::new(10.0, 20.0), &[&name], &metrics);
        assert_eq!(first.min_point(), Point::new(10.0, 20.0));
        assert_eq!(first.to_size(), Size::new(80.0, 60.0));
    }

    #[test]
    fn test_extra_height_goes_to_last_compartment() {
        let metrics = ApproximateMetrics::default();
        let name = Label::new("a");
        let body = Label::new("b");
        let compartments = layout().compartments(Point::default(), &[&name, &body], &metrics);
        assert_eq!(compartments.len(), 2);
        assert_approx_eq!(f32, compartments[0].height(), 20.0);
        assert_approx_eq!(f32, compartments[1].min_y(), 20.0);
        assert_approx_eq!(f32, compartments[1].height(), 40.0);
    }

    #[test]
    fn test_wide_label_widens_every_compartment() {
        let metrics = ApproximateMetrics::new(1.0, 1.0);
        let name = Label::new("a very long subroutine name here");
        let compartments = layout().compartments(Point::default(), &[&name], &metrics);
        let expected = name.size(&metrics).width();
        assert!(expected > 80.0);
        assert_approx_eq!(f32, compartments[0].width(), expected);
    }

    #[test]
    fn test_tall_label_is_not_clipped() {
        let metrics = ApproximateMetrics::new(0.5, 1.0);
        let mut name = Label::new("1\n2\n3\n4\n5\n6\n7\n8");
        name.set_font_size(10.0);
        let first = layout().first_bounds(Point::default(), &[&name], &metrics);
        assert_approx_eq!(f32, first.height(), 80.0);
    }

    #[test]
    fn test_no_labels() {
        let metrics = ApproximateMetrics::default();
        let first = layout().first_bounds(Point::new(5.0, 5.0), &[], &metrics);
        assert_eq!(first.to_size(), Size::new(80.0, 60.0));
        assert!(layout().compartments(Point::default(), &[], &metrics).is_empty());
    }
}
