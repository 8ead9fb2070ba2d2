//! Multi-line labels and text measurement.
//!
//! # Overview
//!
//! - [`Label`] - editable multi-line text attached to a node (a name, a
//!   condition, a note body).
//! - [`TextMetrics`] - measures text. Layout code never assumes a concrete
//!   font; it asks whichever metrics the diagram was created with.
//! - [`FontMetrics`] - measurement with real fonts through `cosmic-text`.
//! - [`ApproximateMetrics`] - a fixed per-character estimate that needs no
//!   fonts, used for headless layout and in tests.

use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use log::info;

use crate::{
    draw::{Outline, Surface},
    geometry::{Bounds, Point, Size},
};

/// Default font size for labels, in pixels.
pub const DEFAULT_FONT_SIZE: f32 = 12.0;

/// Measures rendered text.
pub trait TextMetrics: fmt::Debug {
    /// Returns the size of `text` (which may contain newlines) at `font_size`.
    ///
    /// Empty text measures as [`Size::default`].
    fn measure(&self, text: &str, font_size: f32) -> Size;

    /// Height of one line of text at `font_size`.
    fn line_height(&self, font_size: f32) -> f32;
}

/// Font-free text metrics based on a fixed advance per character.
#[derive(Debug, Clone, Copy)]
pub struct ApproximateMetrics {
    char_width: f32,
    line_height: f32,
}

impl ApproximateMetrics {
    /// Creates metrics where every character advances `char_width` times the
    /// font size and every line takes `line_height` times the font size.
    pub fn new(char_width: f32, line_height: f32) -> Self {
        Self {
            char_width,
            line_height,
        }
    }
}

impl Default for ApproximateMetrics {
    fn default() -> Self {
        Self::new(0.5, 1.25)
    }
}

impl TextMetrics for ApproximateMetrics {
    fn measure(&self, text: &str, font_size: f32) -> Size {
        if text.is_empty() {
            return Size::default();
        }
        let widest = text
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or_default();
        let lines = text.lines().count().max(1);
        Size::new(
            widest as f32 * self.char_width * font_size,
            lines as f32 * self.line_height(font_size),
        )
    }

    fn line_height(&self, font_size: f32) -> f32 {
        self.line_height * font_size
    }
}

/// Text metrics backed by `cosmic-text` shaping and the system fonts.
///
/// The `FontSystem` is loaded on the first non-empty measurement and then
/// reused.
pub struct FontMetrics {
    family: String,
    font_system: OnceLock<Mutex<FontSystem>>,
}

impl fmt::Debug for FontMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontMetrics")
            .field("family", &self.family)
            .field("loaded", &self.font_system.get().is_some())
            .finish()
    }
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self::new("sans-serif")
    }
}

impl FontMetrics {
    pub fn new(family: &str) -> Self {
        Self {
            family: family.to_string(),
            font_system: OnceLock::new(),
        }
    }

    fn font_system(&self) -> &Mutex<FontSystem> {
        self.font_system.get_or_init(|| {
            info!("Initializing FontSystem");
            Mutex::new(FontSystem::new())
        })
    }
}

impl TextMetrics for FontMetrics {
    fn measure(&self, text: &str, font_size: f32) -> Size {
        if text.is_empty() {
            return Size::default();
        }

        let mut font_system = self
            .font_system()
            .lock()
            .expect("failed to lock FontSystem");

        let metrics = Metrics::new(font_size, self.line_height(font_size));
        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);

        let attrs = Attrs::new().family(Family::Name(&self.family));
        buffer.set_size(None, None);
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        let mut max_width: f32 = 0.0;
        let mut total_height: f32 = 0.0;
        let layout_runs: Vec<_> = buffer.layout_runs().collect();
        if layout_runs.is_empty() {
            // No usable font: fall back to a rough estimate.
            return ApproximateMetrics::default().measure(text, font_size);
        }
        for run in &layout_runs {
            if let Some(last) = run.glyphs.last() {
                max_width = max_width.max(last.x + last.w);
            }
            total_height += metrics.line_height;
        }

        Size::new(max_width, total_height)
    }

    fn line_height(&self, font_size: f32) -> f32 {
        font_size * 1.15
    }
}

/// Horizontal alignment of the lines of a [`Label`] inside its bounds.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Justification {
    Left,
    #[default]
    Center,
    Right,
}

/// An editable multi-line text value.
///
/// # Examples
///
/// ```
/// # use tessel_core::text::{ApproximateMetrics, Label};
/// let mut label = Label::new("Validate\norder");
/// assert_eq!(label.lines().count(), 2);
///
/// let metrics = ApproximateMetrics::default();
/// assert!(label.size(&metrics).height() > 0.0);
///
/// label.set_text("");
/// assert!(label.size(&metrics).is_zero());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    text: String,
    justification: Justification,
    underlined: bool,
    font_size: f32,
}

impl Default for Label {
    fn default() -> Self {
        Self {
            text: String::new(),
            justification: Justification::default(),
            underlined: false,
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

impl Label {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Self::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }

    pub fn justification(&self) -> Justification {
        self.justification
    }

    pub fn set_justification(&mut self, justification: Justification) {
        self.justification = justification;
    }

    pub fn is_underlined(&self) -> bool {
        self.underlined
    }

    pub fn set_underlined(&mut self, underlined: bool) {
        self.underlined = underlined;
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn set_font_size(&mut self, font_size: f32) {
        self.font_size = font_size;
    }

    /// Size of the rendered label; zero when the label is empty.
    pub fn size(&self, metrics: &dyn TextMetrics) -> Size {
        metrics.measure(&self.text, self.font_size)
    }

    /// Draws the label inside `bounds` with the surface's current color.
    ///
    /// Lines are stacked from the top of `bounds` and aligned horizontally
    /// according to the label's [`Justification`].
    pub fn draw(&self, surface: &mut dyn Surface, bounds: Bounds, metrics: &dyn TextMetrics) {
        let line_height = metrics.line_height(self.font_size);
        for (index, line) in self.lines().enumerate() {
            let line_width = metrics.measure(line, self.font_size).width();
            let x = match self.justification {
                Justification::Left => bounds.min_x(),
                Justification::Center => bounds.min_x() + (bounds.width() - line_width) / 2.0,
                Justification::Right => bounds.max_x() - line_width,
            };
            // Baseline sits one font size below the top of the line box.
            let baseline = bounds.min_y() + index as f32 * line_height + self.font_size;
            surface.draw_text(line, Point::new(x, baseline), self.font_size);

            if self.underlined {
                let underline_y = baseline + 2.0;
                surface.draw(&Outline::Line(
                    Point::new(x, underline_y),
                    Point::new(x + line_width, underline_y),
                ));
            }
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::draw::RecordingSurface;

    #[test]
    fn test_approximate_metrics_empty() {
        let metrics = ApproximateMetrics::default();
        assert!(metrics.measure("", 12.0).is_zero());
    }

    #[test]
    fn test_approximate_metrics_uses_widest_line() {
        let metrics = ApproximateMetrics::new(0.5, 1.0);
        let size = metrics.measure("ab\nabcd\nabc", 10.0);
        assert_approx_eq!(f32, size.width(), 20.0);
        assert_approx_eq!(f32, size.height(), 30.0);
    }

    #[test]
    fn test_label_defaults() {
        let label = Label::default();
        assert!(label.is_empty());
        assert_eq!(label.justification(), Justification::Center);
        assert!(!label.is_underlined());
        assert_approx_eq!(f32, label.font_size(), DEFAULT_FONT_SIZE);
    }

    #[test]
    fn test_label_clone_is_independent() {
        let original = Label::new("Idle");
        let mut copy = original.clone();
        copy.set_text("Busy");
        copy.set_underlined(true);

        assert_eq!(original.text(), "Idle");
        assert!(!original.is_underlined());
        assert_eq!(copy.to_string(), "Busy");
    }

    #[test]
    fn test_label_draw_centers_lines() {
        let metrics = ApproximateMetrics::new(0.5, 1.0);
        let mut label = Label::new("ab\nabcd");
        label.set_font_size(10.0);
        let bounds = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(100.0, 40.0));

        let mut surface = RecordingSurface::new();
        label.draw(&mut surface, bounds, &metrics);

        let texts: Vec<_> = surface.texts().collect();
        assert_eq!(texts.len(), 2);
        // "ab" is 10 wide, "abcd" is 20 wide.
        assert_eq!(texts[0], ("ab", Point::new(45.0, 10.0)));
        assert_eq!(texts[1], ("abcd", Point::new(40.0, 20.0)));
    }

    #[test]
    fn test_label_draw_left_and_right() {
        let metrics = ApproximateMetrics::new(0.5, 1.0);
        let bounds = Bounds::new_from_top_left(Point::new(10.0, 0.0), Size::new(100.0, 20.0));
        let mut label = Label::new("abcd");
        label.set_font_size(10.0);

        label.set_justification(Justification::Left);
        let mut surface = RecordingSurface::new();
        label.draw(&mut surface, bounds, &metrics);
        assert_eq!(surface.texts().next().unwrap().1.x(), 10.0);

        label.set_justification(Justification::Right);
        let mut surface = RecordingSurface::new();
        label.draw(&mut surface, bounds, &metrics);
        assert_eq!(surface.texts().next().unwrap().1.x(), 90.0);
    }

    #[test]
    fn test_label_underline_draws_line() {
        let metrics = ApproximateMetrics::default();
        let mut label = Label::new("Start");
        label.set_underlined(true);
        let bounds = Bounds::new_from_top_left(Point::default(), Size::new(80.0, 20.0));

        let mut surface = RecordingSurface::new();
        label.draw(&mut surface, bounds, &metrics);
        assert_eq!(surface.strokes().count(), 1);
    }
}
