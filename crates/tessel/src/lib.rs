//! Tessel - node geometry for activity and state diagrams.
//!
//! Diagram nodes live in a [`Graph`] and compute their own bounds,
//! connection points and child layout, then draw themselves onto a
//! [`Surface`](draw::Surface). Three behaviors do most of the work:
//!
//! - synchronization bars that stretch to span the nodes they connect,
//! - subroutines that host child nodes and grow around them,
//! - a wrapper that draws nested nodes in graph coordinates.
//!
//! # Examples
//!
//! ```
//! use tessel::{EdgeKind, Graph, Node, Orientation, geometry::Point};
//!
//! let mut graph = Graph::new();
//! let (activity, _) = graph.add_node(Node::activity("Pack"), Point::new(43.0, 43.0));
//! let bar = graph.insert(Node::synchronization_bar(Orientation::Horizontal));
//! graph
//!     .connect(EdgeKind::ActivityTransition, activity, Some(bar))
//!     .expect("activities accept any connection with an end");
//!
//! // The bar spans the activity plus 12 on each side.
//! let bounds = graph.bounds(bar);
//! assert_eq!(bounds.min_x(), 31.0);
//! assert_eq!(bounds.width(), 104.0);
//!
//! let document = graph.render_svg();
//! assert!(document.to_string().contains("Pack"));
//! ```

pub mod config;
pub mod export;
pub mod graph;
pub mod node;

mod error;

pub use tessel_core::{color, draw, geometry, text};

pub use error::{ConfigError, TesselError};
pub use graph::{Graph, GridSticker};
pub use node::{Edge, EdgeKind, Node, NodeBehavior, NodeKind, NodeRef, NodeStyle, Orientation};
