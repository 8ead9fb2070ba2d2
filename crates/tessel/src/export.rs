//! Exporting diagrams to files.

pub mod svg;

use thiserror::Error;

use crate::graph::Graph;

/// Writes a whole diagram somewhere.
pub trait Exporter {
    fn export_graph(&self, graph: &Graph) -> Result<(), Error>;
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Render error: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
