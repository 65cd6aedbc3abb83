//! Error type shared by the layout engine and its collaborators.

use crate::graph::PointType;
use crate::raster::ScalarType;

/// Failures reported by [`ClusteringLayout`](crate::layout::ClusteringLayout).
///
/// `UnsupportedPointType` and `MissingGraph` are terminal for the run: the
/// layout is marked complete before they are returned. `RasterScalarType`
/// only aborts the current batch.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("layout strategy expects points of type float32, found {found}")]
    UnsupportedPointType { found: PointType },

    #[error("layout called without a graph")]
    MissingGraph,

    #[error("density grid expected to be of type float32, found {found}")]
    RasterScalarType { found: ScalarType },

    #[error("layout called before initialize")]
    NotInitialized,

    #[error("graph changed since initialize: now {vertices} vertices and {edges} edges")]
    GraphChanged { vertices: usize, edges: usize },

    #[error("layout batch made no progress (iterations_per_layout is 0)")]
    Stalled,
}

pub type Result<T> = std::result::Result<T, LayoutError>;
