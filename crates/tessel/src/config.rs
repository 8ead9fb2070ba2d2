//! Configuration types for Tessel diagrams.
//!
//! This module provides configuration structures that control how diagrams
//! are laid out and styled. All types implement [`serde::Deserialize`] and
//! are usually loaded from a TOML file.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and style settings.
//! - [`LayoutConfig`] - Grid size and how text is measured.
//! - [`StyleConfig`] - Default colors and font for nodes.
//!
//! # Example
//!
//! ```
//! # use tessel::config::AppConfig;
//! let config = AppConfig::from_toml_str(
//!     r#"
//!     [layout]
//!     grid_size = 5
//!
//!     [style]
//!     border_color = "navy"
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(config.layout().grid_size(), 5.0);
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::debug;
use serde::Deserialize;

use tessel_core::{color::Color, draw::DEFAULT_FONT_FAMILY, text::FontMetrics};

use crate::{
    error::{ConfigError, TesselError},
    graph::{DEFAULT_GRID_SIZE, Graph, GridSticker},
    node::NodeStyle,
};

/// Top-level configuration combining layout and style settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,

    #[serde(skip)]
    config_file_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn new(layout: LayoutConfig, style: StyleConfig) -> Self {
        Self {
            layout,
            style,
            config_file_path: None,
        }
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingFile`] if `path` does not exist, an I/O
    /// error if it cannot be read, and [`ConfigError::Toml`] if its content
    /// is not a valid configuration (including invalid color strings).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TesselError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::MissingFile(path.to_path_buf()).into());
        }

        let content = fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;
        config.config_file_path = Some(path.to_path_buf());
        debug!(path:?; "Loaded configuration");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// The file this configuration was loaded from, if any.
    pub fn config_file_path(&self) -> Option<&Path> {
        self.config_file_path.as_deref()
    }

    /// Creates an empty graph set up according to this configuration.
    pub fn build_graph(&self) -> Graph {
        let graph = Graph::new()
            .with_grid(GridSticker::new(self.layout.grid_size))
            .with_style(self.style.node_style())
            .with_font_family(&self.style.font_family);
        match self.layout.text_metrics {
            TextMetricsKind::Approximate => graph,
            TextMetricsKind::Font => {
                graph.with_metrics(FontMetrics::new(&self.style.font_family))
            }
        }
    }
}

/// How labels are measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextMetricsKind {
    /// Fixed per-character estimate, identical on every machine.
    #[default]
    Approximate,
    /// Shaping with the installed fonts.
    Font,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Distance between grid lines; zero disables snapping.
    grid_size: f32,
    text_metrics: TextMetricsKind,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            text_metrics: TextMetricsKind::default(),
        }
    }
}

impl LayoutConfig {
    pub fn new(grid_size: f32, text_metrics: TextMetricsKind) -> Self {
        Self {
            grid_size,
            text_metrics,
        }
    }

    pub fn grid_size(&self) -> f32 {
        self.grid_size
    }

    pub fn text_metrics(&self) -> TextMetricsKind {
        self.text_metrics
    }
}

/// Default colors for nodes, as CSS color strings, and the font family used
/// when text is measured with real fonts.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    border_color: Color,
    background_color: Color,
    text_color: Color,
    font_family: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        let style = NodeStyle::default();
        Self {
            border_color: style.border_color(),
            background_color: style.background_color(),
            text_color: style.text_color(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
        }
    }
}

impl StyleConfig {
    pub fn border_color(&self) -> Color {
        self.border_color
    }

    pub fn background_color(&self) -> Color {
        self.background_color
    }

    pub fn text_color(&self) -> Color {
        self.text_color
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn node_style(&self) -> NodeStyle {
        NodeStyle::new(self.border_color, self.background_color, self.text_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.layout().grid_size(), DEFAULT_GRID_SIZE);
        assert_eq!(config.layout().text_metrics(), TextMetricsKind::Approximate);
        assert_eq!(config.style().border_color(), Color::default());
        assert_eq!(config.style().background_color(), Color::white());
        assert!(config.config_file_path().is_none());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.layout().grid_size(), DEFAULT_GRID_SIZE);
        assert_eq!(config.style().font_family(), "sans-serif");
    }

    #[test]
    fn test_partial_sections() {
        let config = AppConfig::from_toml_str(
            r##"
            [layout]
            text_metrics = "font"

            [style]
            text_color = "#333333"
            font_family = "DejaVu Sans"
            "##,
        )
        .unwrap();
        assert_eq!(config.layout().text_metrics(), TextMetricsKind::Font);
        assert_eq!(config.layout().grid_size(), DEFAULT_GRID_SIZE);
        assert_eq!(config.style().text_color(), Color::new("#333333").unwrap());
        assert_eq!(config.style().font_family(), "DejaVu Sans");
    }

    #[test]
    fn test_invalid_color_is_rejected() {
        let err = AppConfig::from_toml_str(
            r#"
            [style]
            border_color = "not-a-color"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
        assert!(err.to_string().contains("not-a-color"));
    }

    #[test]
    fn test_build_graph_applies_grid_and_style() {
        let config = AppConfig::from_toml_str(
            r#"
            [layout]
            grid_size = 0

            [style]
            background_color = "lightyellow"
            "#,
        )
        .unwrap();
        let graph = config.build_graph();
        assert!(!graph.grid().is_enabled());
        assert_eq!(
            graph.default_style().background_color(),
            Color::new("lightyellow").unwrap()
        );
    }
}
