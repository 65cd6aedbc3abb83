//! Density-grid clustering layout.
//!
//! A force-directed layout for 2D graphs that favors tight clusters:
//!
//! 1. **Repulsion:** every iteration the vertices are splatted onto a 100×100
//!    density grid over their padded bounds, and each vertex is pushed down
//!    the local density gradient.
//! 2. **Attraction:** edges act as springs (`weight · d² − rest_distance`).
//!    Vertices with few live edges are additionally dragged 45% of the way
//!    toward their neighbor.
//! 3. **Cutting:** long edges between vertices that stay connected elsewhere
//!    are cut for the rest of the run. The cutoff shrinks quadratically as the
//!    run progresses, so clusters separate over time.
//! 4. **Annealing:** the step size cools geometrically.
//!
//! Once the iteration budget is spent, coincident vertices are jittered apart
//! and the layout completes.
//!
//! The layout runs in batches: the host calls [`ClusteringLayout::layout`]
//! repeatedly (redrawing in between, say) until [`ClusteringLayout::is_complete`].

mod annealing;
mod collision;
mod config;
mod edges;
mod forces;

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{LayoutError, Result};
use crate::graph::{Bounds, COMPONENTS, LayoutGraph};
use crate::raster::{DEFAULT_OUTPUT_DIMENSION, FastSplatter, ScalarImage};

pub use annealing::{AnnealingSchedule, cool_down, cutting_threshold};
pub use collision::{BucketGrid, CollisionReport, MAX_JUMPS, resolve_coincident_vertices};
pub use config::ClusteringConfig;
pub use edges::LayoutEdge;
pub use forces::{LOW_DEGREE_LIMIT, PULL_FRACTION};

use edges::build_edge_table;
use forces::{DensityField, accumulate_attraction, accumulate_repulsion, apply_forces};

/// Fraction of the bounding box added on each side before rasterizing.
pub const BOUNDS_PADDING: f64 = 0.1;
/// Splat kernel size per axis.
pub const SPLAT_DIMENSION: usize = 41;

/// Lifecycle of a layout run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutState {
    Uninitialized,
    Running,
    Complete,
}

type ProgressCallback = Box<dyn FnMut(f64)>;

/// The clustering layout engine.
///
/// The engine owns its scratch buffers, edge table and random generator; the
/// graph is borrowed per call.
pub struct ClusteringLayout {
    config: ClusteringConfig,
    state: LayoutState,
    rng: StdRng,
    rest_distance: f32,
    schedule: AnnealingSchedule,
    edges: Vec<LayoutEdge>,
    live_degree: Vec<usize>,
    repulsion: Vec<f32>,
    attraction: Vec<f32>,
    density: FastSplatter,
    custom_splat: Option<ScalarImage>,
    progress: Option<ProgressCallback>,
    last_collisions: Option<CollisionReport>,
}

impl ClusteringLayout {
    /// Create a new clustering layout with the given configuration.
    pub fn new(config: ClusteringConfig) -> Self {
        let schedule = AnnealingSchedule::new(
            config.initial_temperature,
            config.cool_down_rate,
            config.rest_distance,
            config.max_number_of_iterations,
        );
        Self {
            rng: StdRng::seed_from_u64(config.random_seed),
            rest_distance: config.rest_distance,
            config,
            state: LayoutState::Uninitialized,
            schedule,
            edges: Vec::new(),
            live_degree: Vec::new(),
            repulsion: Vec::new(),
            attraction: Vec::new(),
            density: FastSplatter::new(),
            custom_splat: None,
            progress: None,
            last_collisions: None,
        }
    }

    /// Create a clustering layout with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ClusteringConfig::default())
    }

    /// Create a layout that reports fractional progress after every iteration.
    pub fn with_progress(config: ClusteringConfig, progress: impl FnMut(f64) + 'static) -> Self {
        let mut layout = Self::new(config);
        layout.set_progress_callback(progress);
        layout
    }

    pub fn set_progress_callback(&mut self, progress: impl FnMut(f64) + 'static) {
        self.progress = Some(Box::new(progress));
    }

    pub fn config(&self) -> &ClusteringConfig {
        &self.config
    }

    /// Replace the configuration. Takes effect at the next `initialize`.
    pub fn set_config(&mut self, config: ClusteringConfig) {
        self.config = config;
    }

    /// Stamp `splat` instead of the configured kernel from the next
    /// `initialize` on. `None` restores the configured kernel.
    pub fn set_splat_image(&mut self, splat: Option<ScalarImage>) {
        self.custom_splat = splat;
    }

    // =========================================================================
    // State
    // =========================================================================

    pub fn state(&self) -> LayoutState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state == LayoutState::Complete
    }

    /// Rest distance in effect for the current run.
    pub fn rest_distance(&self) -> f32 {
        self.rest_distance
    }

    pub fn temperature(&self) -> f32 {
        self.schedule.temperature()
    }

    pub fn cutting_threshold(&self) -> f32 {
        self.schedule.cutting_threshold()
    }

    pub fn total_iterations(&self) -> u32 {
        self.schedule.total_iterations()
    }

    /// Edge table of the current run, indexed by edge id.
    pub fn layout_edges(&self) -> &[LayoutEdge] {
        &self.edges
    }

    /// Live (uncut) edge count per vertex.
    pub fn live_degrees(&self) -> &[usize] {
        &self.live_degree
    }

    /// Statistics of the collision pass, once the run has completed.
    pub fn collision_report(&self) -> Option<CollisionReport> {
        self.last_collisions
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Prepare a run over `graph`.
    ///
    /// Jitters vertex positions slightly and rebuilds every per-run structure.
    /// Fails, and marks the layout complete, when the points are not stored
    /// as `f32`.
    pub fn initialize(&mut self, graph: &mut dyn LayoutGraph) -> Result<()> {
        self.rng = StdRng::seed_from_u64(self.config.random_seed);
        self.last_collisions = None;

        let found = graph.points().point_type();
        if graph.points().as_f32().is_none() {
            return Err(fail(&mut self.state, LayoutError::UnsupportedPointType { found }));
        }

        let vertex_count = graph.vertex_count();
        let div = if vertex_count > 0 { vertex_count as f32 } else { 1.0 };
        self.rest_distance = if self.config.rest_distance == 0.0 {
            (1.0 / div).sqrt()
        } else {
            self.config.rest_distance
        };

        self.repulsion = vec![0.0; vertex_count * COMPONENTS];
        self.attraction = vec![0.0; vertex_count * COMPONENTS];
        self.live_degree = (0..vertex_count).map(|v| graph.degree(v)).collect();

        if let Some(points) = graph.points_mut().as_f32_mut() {
            jitter(points, self.rest_distance, &mut self.rng);
        }

        let weight_field = if self.config.weight_edges {
            self.config.edge_weight_field.as_deref()
        } else {
            None
        };
        self.edges = build_edge_table(&*graph, weight_field);

        self.schedule = AnnealingSchedule::new(
            self.config.initial_temperature,
            self.config.cool_down_rate,
            self.rest_distance,
            self.config.max_number_of_iterations,
        );

        let splat = match &self.custom_splat {
            Some(splat) => splat.clone(),
            None => self
                .config
                .splat_kernel
                .generate(SPLAT_DIMENSION, SPLAT_DIMENSION),
        };
        self.density.set_splat_image(splat);
        self.density
            .set_output_dimensions(DEFAULT_OUTPUT_DIMENSION, DEFAULT_OUTPUT_DIMENSION);

        self.state = LayoutState::Running;
        tracing::debug!(
            vertices = vertex_count,
            edges = self.edges.len(),
            rest_distance = self.rest_distance,
            weighted = weight_field.is_some(),
            "clustering layout initialized"
        );
        Ok(())
    }

    /// Run one batch of `iterations_per_layout` iterations.
    ///
    /// A no-op once the layout is complete. A missing graph ends the run.
    /// When the batch exhausts the iteration budget, coincident vertices are
    /// resolved and the layout completes.
    pub fn layout(&mut self, graph: Option<&mut dyn LayoutGraph>) -> Result<()> {
        match self.state {
            LayoutState::Complete => return Ok(()),
            LayoutState::Uninitialized => return Err(LayoutError::NotInitialized),
            LayoutState::Running => {}
        }
        let Some(graph) = graph else {
            return Err(fail(&mut self.state, LayoutError::MissingGraph));
        };

        let found = graph.points().point_type();
        if graph.points().as_f32().is_none() {
            return Err(fail(&mut self.state, LayoutError::UnsupportedPointType { found }));
        }
        let vertex_count = graph.points().len();
        if vertex_count != self.live_degree.len() || graph.edge_count() != self.edges.len() {
            return Err(LayoutError::GraphChanged {
                vertices: vertex_count,
                edges: graph.edge_count(),
            });
        }

        let iterations = self.config.iterations_per_layout;
        for i in 0..iterations {
            self.iterate(graph, i)?;
        }

        if self.schedule.finish_batch(iterations) {
            self.resolve_collisions(graph);
            self.state = LayoutState::Complete;
        }
        Ok(())
    }

    /// [`layout`](Self::layout) with a graph that is known to be present.
    pub fn step(&mut self, graph: &mut dyn LayoutGraph) -> Result<()> {
        self.layout(Some(graph))
    }

    /// Initialize and run batches until the layout completes.
    pub fn run(&mut self, graph: &mut dyn LayoutGraph) -> Result<()> {
        self.initialize(graph)?;
        while !self.is_complete() {
            let before = self.schedule.total_iterations();
            self.step(graph)?;
            if !self.is_complete() && self.schedule.total_iterations() == before {
                return Err(LayoutError::Stalled);
            }
        }
        Ok(())
    }

    fn iterate(&mut self, graph: &mut dyn LayoutGraph, iteration: u32) -> Result<()> {
        self.repulsion.fill(0.0);
        self.attraction.fill(0.0);

        let bounds = graph
            .bounds()
            .unwrap_or(Bounds::ZERO)
            .padded_2d(BOUNDS_PADDING);
        self.density.set_model_bounds(bounds);
        self.density.update(graph.points());

        let output = self.density.output();
        let Some(values) = output.as_f32() else {
            let err = LayoutError::RasterScalarType {
                found: output.scalar_type(),
            };
            tracing::error!(error = %err, "density grid rasterization failed");
            return Err(err);
        };
        let field = DensityField {
            values,
            width: output.width(),
            height: output.height(),
            bounds,
        };

        let found = graph.points().point_type();
        let Some(points) = graph.points_mut().as_f32_mut() else {
            return Err(fail(&mut self.state, LayoutError::UnsupportedPointType { found }));
        };

        accumulate_repulsion(points, &field, &mut self.repulsion);
        let cut = accumulate_attraction(
            points,
            &mut self.edges,
            &mut self.live_degree,
            self.rest_distance,
            self.schedule.cutting_threshold(),
            &mut self.attraction,
        );
        apply_forces(
            points,
            &self.repulsion,
            &self.attraction,
            self.schedule.temperature(),
        );
        if cut > 0 {
            tracing::trace!(iteration, cut, "cut edges");
        }

        let progress = self.schedule.advance(iteration);
        if let Some(report) = self.progress.as_mut() {
            report(progress);
        }
        Ok(())
    }

    fn resolve_collisions(&mut self, graph: &mut dyn LayoutGraph) {
        let bounds = graph.bounds();
        let Some(points) = graph.points_mut().as_f32_mut() else {
            return;
        };
        let report = resolve_coincident_vertices(points, bounds, &mut self.rng);
        tracing::trace!(
            collisions = report.collisions,
            jumps = report.jumps,
            unresolved = report.unresolved,
            "resolved coincident vertices"
        );
        self.last_collisions = Some(report);
    }
}

impl Default for ClusteringLayout {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Display for ClusteringLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "RandomSeed: {}", self.config.random_seed)?;
        writeln!(f, "MaxNumberOfIterations: {}", self.config.max_number_of_iterations)?;
        writeln!(f, "IterationsPerLayout: {}", self.config.iterations_per_layout)?;
        writeln!(f, "InitialTemperature: {}", self.config.initial_temperature)?;
        writeln!(f, "CoolDownRate: {}", self.config.cool_down_rate)?;
        writeln!(f, "RestDistance: {}", self.rest_distance)?;
        writeln!(f, "CuttingThreshold: {}", self.schedule.cutting_threshold())?;
        writeln!(
            f,
            "EdgeWeightField: {}",
            self.config.edge_weight_field.as_deref().unwrap_or("(none)")
        )
    }
}

/// Log a terminal failure and end the run.
fn fail(state: &mut LayoutState, err: LayoutError) -> LayoutError {
    tracing::error!(error = %err, "clustering layout stopped");
    *state = LayoutState::Complete;
    err
}

/// Nudge x and y of every point by up to ±`scale / 2`.
fn jitter<R: Rng + ?Sized>(points: &mut [f32], scale: f32, rng: &mut R) {
    for p in points.chunks_exact_mut(COMPONENTS) {
        p[0] += scale * (rng.r#gen::<f32>() - 0.5);
        p[1] += scale * (rng.r#gen::<f32>() - 0.5);
    }
}
