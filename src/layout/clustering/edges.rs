//! Compact edge table rebuilt at every initialization.

use crate::graph::LayoutGraph;

/// Exponent applied to normalized weights to amplify heavy edges.
const WEIGHT_EXPONENT: i32 = 4;

/// One edge as the force loop sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutEdge {
    pub source: usize,
    pub target: usize,
    /// `(w / max_w)^4`, or 1.0 when weights are not used.
    pub weight: f32,
    /// Set once the edge is cut; never cleared within a run.
    pub dead: bool,
}

impl LayoutEdge {
    /// Loops carry no spring and are never cut.
    #[inline]
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// Build the edge table, indexed by edge id.
///
/// `weight_field` is `Some` only when weighting is enabled. A missing array
/// falls back to unit weights. The normalizing maximum starts at 1, so arrays
/// whose values never exceed 1 are used as-is before the exponent.
pub fn build_edge_table(graph: &dyn LayoutGraph, weight_field: Option<&str>) -> Vec<LayoutEdge> {
    let weights = weight_field.and_then(|name| graph.edge_array(name));
    let max_weight = weights
        .map(|w| w.iter().copied().fold(1.0_f64, f64::max))
        .unwrap_or(1.0);

    let mut table = vec![
        LayoutEdge {
            source: 0,
            target: 0,
            weight: 1.0,
            dead: false,
        };
        graph.edge_count()
    ];

    for edge in graph.edges() {
        let Some(slot) = table.get_mut(edge.id) else {
            continue;
        };
        let weight = match weights.and_then(|w| w.get(edge.id)) {
            Some(&w) => ((w / max_weight) as f32).powi(WEIGHT_EXPONENT),
            None => 1.0,
        };
        *slot = LayoutEdge {
            source: edge.source,
            target: edge.target,
            weight,
            dead: false,
        };
    }

    table
}
