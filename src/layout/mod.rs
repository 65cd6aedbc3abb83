//! Layout algorithms for graph visualization.
//!
//! Layouts move vertex positions in place through the
//! [`LayoutGraph`](crate::graph::LayoutGraph) capability and are driven
//! incrementally, so a host can redraw between batches.

pub mod clustering;

pub use clustering::{ClusteringConfig, ClusteringLayout, CollisionReport, LayoutEdge, LayoutState};
