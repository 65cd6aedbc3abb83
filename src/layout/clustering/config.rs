//! Configuration for the clustering layout.

use serde::{Deserialize, Serialize};

use crate::raster::SplatKernel;

/// Configuration for the clustering layout.
///
/// Deserializes from camelCase with every field optional, so a JavaScript
/// host can pass `{ maxNumberOfIterations: 500 }` and keep the rest at their
/// defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClusteringConfig {
    /// Seed of the jitter and collision generator (default: 123).
    pub random_seed: u64,
    /// Total iterations before the layout completes (default: 200).
    pub max_number_of_iterations: u32,
    /// Iterations performed by one `layout` call (default: 200).
    pub iterations_per_layout: u32,
    /// Starting step scale (default: 5.0).
    pub initial_temperature: f32,
    /// Cooling divisor: `t -= t / rate` each iteration (default: 50.0).
    pub cool_down_rate: f32,
    /// Target spacing between connected vertices; 0 derives
    /// `sqrt(1 / vertex_count)` at initialization (default: 0.0).
    pub rest_distance: f32,
    /// Name of the edge array holding weights (default: "weight").
    pub edge_weight_field: Option<String>,
    /// Whether edge weights are honored at all (default: false).
    pub weight_edges: bool,
    /// Density kernel shape (default: Gaussian).
    pub splat_kernel: SplatKernel,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            random_seed: 123,
            max_number_of_iterations: 200,
            iterations_per_layout: 200,
            initial_temperature: 5.0,
            cool_down_rate: 50.0,
            rest_distance: 0.0,
            edge_weight_field: Some("weight".to_string()),
            weight_edges: false,
            splat_kernel: SplatKernel::Gaussian,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClusteringConfig::default();
        assert_eq!(config.random_seed, 123);
        assert_eq!(config.max_number_of_iterations, 200);
        assert_eq!(config.iterations_per_layout, 200);
        assert_eq!(config.initial_temperature, 5.0);
        assert_eq!(config.cool_down_rate, 50.0);
        assert_eq!(config.rest_distance, 0.0);
        assert_eq!(config.edge_weight_field.as_deref(), Some("weight"));
        assert!(!config.weight_edges);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: ClusteringConfig = serde_json::from_str(
            r#"{ "maxNumberOfIterations": 50, "weightEdges": true, "splatKernel": "circular" }"#,
        )
        .unwrap();

        assert_eq!(config.max_number_of_iterations, 50);
        assert!(config.weight_edges);
        assert_eq!(config.splat_kernel, SplatKernel::Circular);
        assert_eq!(config.iterations_per_layout, 200);
        assert_eq!(config.random_seed, 123);
    }

    #[test]
    fn test_serializes_camel_case() {
        let value = serde_json::to_value(ClusteringConfig::default()).unwrap();
        assert_eq!(value["coolDownRate"], 50.0);
        assert_eq!(value["edgeWeightField"], "weight");
        assert_eq!(value["splatKernel"], "gaussian");
    }
}
