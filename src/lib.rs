//! Clustering Layout - WASM Module
//!
//! A density-grid, force-directed 2D graph layout that emphasizes clusters.
//! It is compiled to WebAssembly and exposes a JavaScript-friendly API via
//! wasm-bindgen, but every piece is usable as a plain Rust library.
//!
//! # Architecture
//!
//! - `graph`: Graph data structure using petgraph, plus the `LayoutGraph`
//!   capability layouts operate on
//! - `raster`: Splat kernels and the point splatter producing density grids
//! - `layout`: The clustering layout engine and its annealing schedule
//! - `error`: The `LayoutError` type

use js_sys::{Float32Array, Function};
use wasm_bindgen::prelude::*;

pub mod error;
pub mod graph;
pub mod layout;
pub mod raster;

pub use error::LayoutError;

use graph::{GraphEngine, LayoutGraph};
use layout::{ClusteringConfig, ClusteringLayout};

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Main entry point for the clustering layout.
///
/// Owns the graph being laid out and the layout engine, and exposes the
/// batch-by-batch driving API to JavaScript.
#[wasm_bindgen]
pub struct ClusteringLayoutWasm {
    graph: Option<GraphEngine>,
    strategy: ClusteringLayout,
}

#[wasm_bindgen]
impl ClusteringLayoutWasm {
    /// Create a layout with default parameters and no graph.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            graph: None,
            strategy: ClusteringLayout::with_defaults(),
        }
    }

    /// Create a layout from a (possibly partial) camelCase config object.
    ///
    /// ```js
    /// const layout = ClusteringLayoutWasm.withConfig({ maxNumberOfIterations: 500 });
    /// ```
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config: JsValue) -> std::result::Result<ClusteringLayoutWasm, JsError> {
        let config: ClusteringConfig = serde_wasm_bindgen::from_value(config)?;
        Ok(Self {
            graph: None,
            strategy: ClusteringLayout::new(config),
        })
    }

    /// Current configuration as a plain object.
    #[wasm_bindgen(js_name = getConfig)]
    pub fn get_config(&self) -> std::result::Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(self.strategy.config())?)
    }

    // =========================================================================
    // Graph Loading
    // =========================================================================

    /// Replace the graph.
    ///
    /// # Arguments
    ///
    /// * `positions` - Flat [x0, y0, x1, y1, ...] vertex positions
    /// * `edges` - Flat [src0, tgt0, src1, tgt1, ...] directed edge pairs
    ///
    /// Returns the number of edges added; pairs naming unknown vertices are
    /// skipped. Call `initialize` before the next `layout`.
    #[wasm_bindgen(js_name = loadGraph)]
    pub fn load_graph(&mut self, positions: &[f32], edges: &[u32]) -> u32 {
        let mut graph = GraphEngine::with_capacity(positions.len() / 2, edges.len() / 2);
        graph.add_nodes_from_positions(positions);
        let added = graph.add_edges_from_pairs(edges);
        self.graph = Some(graph);
        added
    }

    /// Attach a named per-edge array, one value per edge in load order.
    ///
    /// Returns false if no graph is loaded or the length does not match.
    #[wasm_bindgen(js_name = setEdgeArray)]
    pub fn set_edge_array(&mut self, name: &str, values: Vec<f64>) -> bool {
        self.graph
            .as_mut()
            .is_some_and(|graph| graph.set_edge_array(name, values))
    }

    #[wasm_bindgen(js_name = nodeCount)]
    pub fn node_count(&self) -> u32 {
        self.graph.as_ref().map_or(0, GraphEngine::node_count)
    }

    #[wasm_bindgen(js_name = edgeCount)]
    pub fn edge_count(&self) -> u32 {
        self.graph.as_ref().map_or(0, GraphEngine::edge_count)
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Call `callback(progress)` after every iteration, progress in [0, 1).
    #[wasm_bindgen(js_name = setProgressCallback)]
    pub fn set_progress_callback(&mut self, callback: Function) {
        self.strategy.set_progress_callback(move |progress| {
            if let Err(err) = callback.call1(&JsValue::NULL, &JsValue::from_f64(progress)) {
                tracing::warn!(?err, "progress callback threw");
            }
        });
    }

    /// Prepare a run over the loaded graph.
    pub fn initialize(&mut self) -> std::result::Result<(), JsError> {
        let graph = self.graph.as_mut().ok_or(LayoutError::MissingGraph)?;
        self.strategy.initialize(graph)?;
        Ok(())
    }

    /// Run one batch of iterations.
    pub fn layout(&mut self) -> std::result::Result<(), JsError> {
        let graph = self.graph.as_mut().map(|g| g as &mut dyn LayoutGraph);
        self.strategy.layout(graph)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = isComplete)]
    pub fn is_complete(&self) -> bool {
        self.strategy.is_complete()
    }

    /// Current positions as [x0, y0, x1, y1, ...].
    pub fn positions(&self) -> Float32Array {
        let xy = self
            .graph
            .as_ref()
            .map(GraphEngine::positions_xy)
            .unwrap_or_default();
        Float32Array::from(&xy[..])
    }

    #[wasm_bindgen(js_name = restDistance)]
    pub fn rest_distance(&self) -> f32 {
        self.strategy.rest_distance()
    }

    #[wasm_bindgen(js_name = cuttingThreshold)]
    pub fn cutting_threshold(&self) -> f32 {
        self.strategy.cutting_threshold()
    }

    pub fn temperature(&self) -> f32 {
        self.strategy.temperature()
    }

    #[wasm_bindgen(js_name = totalIterations)]
    pub fn total_iterations(&self) -> u32 {
        self.strategy.total_iterations()
    }

    /// Human-readable parameter listing.
    pub fn describe(&self) -> String {
        self.strategy.to_string()
    }
}

impl Default for ClusteringLayoutWasm {
    fn default() -> Self {
        Self::new()
    }
}
