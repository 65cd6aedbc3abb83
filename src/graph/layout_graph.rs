//! The capability interface a layout needs from a graph.
//!
//! Layouts borrow the graph for the length of a call and never own it. They
//! read topology and named edge arrays, and they move vertices by writing the
//! point buffer in place.

use super::edge::EdgeRecord;
use super::points::{Bounds, PointData};

pub trait LayoutGraph {
    /// Number of vertices. Vertex `i` is point `i` in the point buffer.
    fn vertex_count(&self) -> usize;

    fn edge_count(&self) -> usize;

    /// Total degree (in + out) of `vertex`. Self-loops count twice.
    fn degree(&self, vertex: usize) -> usize;

    /// All edges, in edge id order.
    fn edges(&self) -> Box<dyn Iterator<Item = EdgeRecord> + '_>;

    fn points(&self) -> &PointData;

    fn points_mut(&mut self) -> &mut PointData;

    /// Named per-edge scalar array, indexed by edge id.
    fn edge_array(&self, name: &str) -> Option<&[f64]>;

    /// Bounding box of the current vertex positions.
    fn bounds(&self) -> Option<Bounds> {
        self.points().bounds()
    }
}
