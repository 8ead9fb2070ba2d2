//! Error types for Tessel operations.
//!
//! Node and graph operations never fail: they answer `false` or `None` for
//! input they refuse. Errors only come from the edges of the library, loading
//! configuration and exporting diagrams.

use std::{io, path::PathBuf};

use thiserror::Error;

/// The main error type for Tessel operations.
#[derive(Debug, Error)]
pub enum TesselError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Export error: {0}")]
    Export(#[from] crate::export::Error),
}

/// Problems found while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
}
