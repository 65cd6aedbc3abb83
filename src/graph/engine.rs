//! GraphEngine - Core graph data structure.
//!
//! The GraphEngine stores the graph topology using petgraph's directed graph
//! and keeps vertex positions in a tagged, interleaved point buffer that
//! layouts mutate in place. Named per-edge scalar arrays (for example edge
//! weights) live beside the topology and are indexed by edge id.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

use super::edge::{EdgeId, EdgeRecord};
use super::layout_graph::LayoutGraph;
use super::node::NodeId;
use super::points::{PointData, PointType};

/// The core graph engine.
///
/// This struct manages:
/// - Graph topology via petgraph
/// - Point buffer with three components per vertex (z stays 0 for 2D use)
/// - Named edge arrays
pub struct GraphEngine {
    /// The underlying graph structure.
    /// Nodes store their NodeId, edges store their EdgeId.
    graph: DiGraph<NodeId, EdgeId>,

    /// Vertex positions, interleaved xyz.
    points: PointData,

    /// Per-edge scalar arrays keyed by name.
    edge_arrays: HashMap<String, Vec<f64>>,
}

impl GraphEngine {
    /// Create a new empty graph engine with single-precision points.
    pub fn new() -> Self {
        Self::with_point_type(PointType::Float32)
    }

    /// Create an empty graph engine storing points as `point_type`.
    pub fn with_point_type(point_type: PointType) -> Self {
        Self {
            graph: DiGraph::new(),
            points: PointData::new(point_type),
            edge_arrays: HashMap::new(),
        }
    }

    /// Create a graph engine with pre-allocated capacity.
    pub fn with_capacity(node_capacity: usize, edge_capacity: usize) -> Self {
        Self {
            graph: DiGraph::with_capacity(node_capacity, edge_capacity),
            points: PointData::with_capacity(PointType::Float32, node_capacity),
            edge_arrays: HashMap::new(),
        }
    }

    // =========================================================================
    // Node Operations
    // =========================================================================

    /// Add a node at the specified position (z = 0).
    pub fn add_node(&mut self, x: f32, y: f32) -> NodeId {
        let id = NodeId(self.graph.node_count() as u32);
        self.graph.add_node(id);
        self.points.push([x as f64, y as f64, 0.0]);
        id
    }

    /// Add multiple nodes from a positions array [x0, y0, x1, y1, ...].
    pub fn add_nodes_from_positions(&mut self, positions: &[f32]) -> u32 {
        let count = positions.len() / 2;
        self.graph.reserve_nodes(count);

        for pair in positions.chunks_exact(2) {
            self.add_node(pair[0], pair[1]);
        }

        count as u32
    }

    /// Get the number of nodes.
    pub fn node_count(&self) -> u32 {
        self.graph.node_count() as u32
    }

    /// Get a node's (x, y) position.
    pub fn get_node_position(&self, id: NodeId) -> Option<(f32, f32)> {
        self.points
            .get(id.index())
            .map(|p| (p[0] as f32, p[1] as f32))
    }

    // =========================================================================
    // Edge Operations
    // =========================================================================

    /// Add a directed edge between two nodes.
    ///
    /// Returns `None` if either endpoint does not exist. Edge arrays attached
    /// before the edge no longer cover every edge and are dropped.
    pub fn add_edge(&mut self, source: NodeId, target: NodeId) -> Option<EdgeId> {
        let count = self.graph.node_count();
        if source.index() >= count || target.index() >= count {
            return None;
        }

        if !self.edge_arrays.is_empty() {
            tracing::debug!(
                arrays = self.edge_arrays.len(),
                "dropping edge arrays after edge insertion"
            );
            self.edge_arrays.clear();
        }

        let id = EdgeId(self.graph.edge_count() as u32);
        self.graph.add_edge(
            NodeIndex::new(source.index()),
            NodeIndex::new(target.index()),
            id,
        );
        Some(id)
    }

    /// Add edges from pairs [src0, tgt0, src1, tgt1, ...].
    pub fn add_edges_from_pairs(&mut self, edges: &[u32]) -> u32 {
        let mut added = 0;

        for pair in edges.chunks_exact(2) {
            if self.add_edge(NodeId(pair[0]), NodeId(pair[1])).is_some() {
                added += 1;
            }
        }

        added
    }

    /// Get the number of edges.
    pub fn edge_count(&self) -> u32 {
        self.graph.edge_count() as u32
    }

    /// Attach a named per-edge scalar array.
    ///
    /// The array must hold exactly one value per edge; returns false and
    /// stores nothing otherwise.
    pub fn set_edge_array(&mut self, name: impl Into<String>, values: Vec<f64>) -> bool {
        if values.len() != self.graph.edge_count() {
            return false;
        }
        self.edge_arrays.insert(name.into(), values);
        true
    }

    // =========================================================================
    // Buffer Access
    // =========================================================================

    /// The interleaved xyz point buffer.
    pub fn positions(&self) -> &PointData {
        &self.points
    }

    /// Positions as interleaved [x0, y0, x1, y1, ...] pairs.
    pub fn positions_xy(&self) -> Vec<f32> {
        (0..self.points.len())
            .filter_map(|i| self.points.get(i))
            .flat_map(|p| [p[0] as f32, p[1] as f32])
            .collect()
    }

    // =========================================================================
    // Utilities
    // =========================================================================

    /// Clear all nodes, edges and edge arrays.
    pub fn clear(&mut self) {
        self.graph.clear();
        self.points.clear();
        self.edge_arrays.clear();
    }
}

impl Default for GraphEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutGraph for GraphEngine {
    fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    fn degree(&self, vertex: usize) -> usize {
        if vertex >= self.graph.node_count() {
            return 0;
        }
        let index = NodeIndex::new(vertex);
        self.graph.edges_directed(index, Direction::Outgoing).count()
            + self.graph.edges_directed(index, Direction::Incoming).count()
    }

    fn edges(&self) -> Box<dyn Iterator<Item = EdgeRecord> + '_> {
        Box::new(self.graph.edge_references().map(|e| EdgeRecord {
            id: e.weight().0 as usize,
            source: e.source().index(),
            target: e.target().index(),
        }))
    }

    fn points(&self) -> &PointData {
        &self.points
    }

    fn points_mut(&mut self) -> &mut PointData {
        &mut self.points
    }

    fn edge_array(&self, name: &str) -> Option<&[f64]> {
        self.edge_arrays.get(name).map(Vec::as_slice)
    }
}
