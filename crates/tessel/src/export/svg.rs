use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};

use log::{debug, error, info};
use svg::Document;

use crate::{export, graph::Graph};

/// SVG file exporter.
#[derive(Debug, Clone)]
pub struct Svg {
    path: PathBuf,
}

impl Svg {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Writes an SVG document to the exporter's file.
    pub fn write_document(&self, doc: &Document) -> Result<(), export::Error> {
        info!(path:? = self.path; "Creating SVG file");
        let mut file = File::create(&self.path).inspect_err(|err| {
            error!(path:? = self.path, err:%; "Failed to create SVG file");
        })?;

        write!(file, "{doc}").inspect_err(|err| {
            error!(path:? = self.path, err:%; "Failed to write SVG content");
        })?;

        Ok(())
    }
}

impl export::Exporter for Svg {
    fn export_graph(&self, graph: &Graph) -> Result<(), export::Error> {
        if graph.node_count() == 0 {
            return Err(export::Error::Render("diagram has no nodes".to_string()));
        }
        let doc = graph.render_svg();
        debug!("SVG document rendered");
        self.write_document(&doc)
    }
}

/// Renders `graph` and writes it to `path` as SVG.
pub fn write(graph: &Graph, path: impl AsRef<Path>) -> Result<(), export::Error> {
    use export::Exporter;

    Svg::new(path).export_graph(graph)
}
