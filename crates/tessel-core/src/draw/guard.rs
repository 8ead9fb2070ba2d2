//! Scoped surface state.

use std::ops::{Deref, DerefMut};

use crate::{color::Color, draw::Surface, geometry::Point};

/// Borrows a [`Surface`] and restores its origin and color when dropped.
///
/// The guard dereferences to the surface, so drawing code uses it exactly
/// like the surface itself. Restoration happens in `Drop`, which also runs
/// on early returns and while unwinding.
///
/// # Example
///
/// ```
/// # use tessel_core::draw::{RecordingSurface, Surface, SurfaceGuard};
/// # use tessel_core::geometry::Point;
/// let mut surface = RecordingSurface::new();
/// {
///     let mut scoped = SurfaceGuard::translated(&mut surface, Point::new(10.0, 5.0));
///     assert_eq!(scoped.origin(), Point::new(10.0, 5.0));
/// }
/// assert_eq!(surface.origin(), Point::default());
/// ```
pub struct SurfaceGuard<'a> {
    surface: &'a mut dyn Surface,
    offset: Point,
    color: Color,
}

impl<'a> SurfaceGuard<'a> {
    /// Remembers the current color; the origin is left untouched.
    pub fn new(surface: &'a mut dyn Surface) -> Self {
        let color = surface.color();
        Self {
            surface,
            offset: Point::default(),
            color,
        }
    }

    /// Moves the origin by `offset` until the guard is dropped.
    pub fn translated(surface: &'a mut dyn Surface, offset: Point) -> Self {
        let color = surface.color();
        if !offset.is_zero() {
            surface.translate(offset);
        }
        Self {
            surface,
            offset,
            color,
        }
    }

    /// Returns the origin shift applied by this guard.
    pub fn offset(&self) -> Point {
        self.offset
    }
}

impl<'a> Deref for SurfaceGuard<'a> {
    type Target = dyn Surface + 'a;

    fn deref(&self) -> &Self::Target {
        &*self.surface
    }
}

impl<'a> DerefMut for SurfaceGuard<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.surface
    }
}

impl Drop for SurfaceGuard<'_> {
    fn drop(&mut self) {
        self.surface.set_color(self.color);
        if !self.offset.is_zero() {
            self.surface.translate(self.offset.negate());
        }
    }
}
