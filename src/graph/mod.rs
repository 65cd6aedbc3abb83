//! Graph data structures and operations.
//!
//! This module provides the graph structure using petgraph, an interleaved
//! point buffer tagged with its scalar type, and the `LayoutGraph` capability
//! trait through which layouts read topology and move vertices.

mod edge;
mod engine;
mod layout_graph;
mod node;
mod points;

pub use edge::{EdgeId, EdgeRecord};
pub use engine::GraphEngine;
pub use layout_graph::LayoutGraph;
pub use node::NodeId;
pub use points::{Bounds, COMPONENTS, PointData, PointType};
