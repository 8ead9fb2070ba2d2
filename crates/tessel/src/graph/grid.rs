use tessel_core::geometry::{Bounds, Point, Size};

/// Default distance between grid lines.
pub const DEFAULT_GRID_SIZE: f32 = 10.0;

/// Aligns bounds to a square grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSticker {
    size: f32,
}

impl Default for GridSticker {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_SIZE)
    }
}

impl GridSticker {
    /// Creates a sticker for a grid of `size`; a size of zero (or less)
    /// disables snapping.
    pub fn new(size: f32) -> Self {
        Self { size }
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn is_enabled(&self) -> bool {
        self.size > 0.0
    }

    /// Expands `bounds` outward to the grid: the minimum corner is floored
    /// and the maximum corner is ceiled.
    pub fn snap(&self, bounds: Bounds) -> Bounds {
        if !self.is_enabled() {
            return bounds;
        }
        let floor = |value: f32| (value / self.size).floor() * self.size;
        let ceil = |value: f32| (value / self.size).ceil() * self.size;
        let min = Point::new(floor(bounds.min_x()), floor(bounds.min_y()));
        let max = Point::new(ceil(bounds.max_x()), ceil(bounds.max_y()));
        Bounds::new_from_top_left(min, Size::new(max.x() - min.x(), max.y() - min.y()))
    }
}
