//! Per-iteration force accumulation.
//!
//! All buffers are interleaved xyz (`COMPONENTS` scalars per vertex); z is
//! never read or written.

use crate::graph::{Bounds, COMPONENTS};

use super::edges::LayoutEdge;

/// Vertices with fewer live edges than this are pulled toward their neighbor.
pub const LOW_DEGREE_LIMIT: usize = 10;
/// Fraction of an edge a low-degree endpoint is pulled along per iteration.
pub const PULL_FRACTION: f32 = 0.45;

const FORCE_EPSILON: f32 = 1e-5;

/// Density grid the repulsion pass samples.
pub struct DensityField<'a> {
    pub values: &'a [f32],
    pub width: usize,
    pub height: usize,
    pub bounds: Bounds,
}

impl DensityField<'_> {
    /// Grid cell of a position, `trunc((p - min) / extent · cells + 0.5)`.
    /// Degenerate extents land on cell 0.
    fn cell(&self, x: f32, y: f32) -> (i64, i64) {
        let b = &self.bounds;
        let ix = ((x as f64 - b.min_x) / b.width() * self.width as f64 + 0.5) as i64;
        let iy = ((y as f64 - b.min_y) / b.height() * self.height as f64 + 0.5) as i64;
        (ix, iy)
    }

    /// Cells outside the grid read as empty.
    fn sample(&self, x: i64, y: i64) -> f32 {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return 0.0;
        }
        self.values
            .get(y as usize * self.width + x as usize)
            .copied()
            .unwrap_or(0.0)
    }
}

/// Push every vertex down the density gradient.
///
/// Uses the four axis neighbors of the vertex's cell:
/// `(d[x-1] - d[x+1], d[y-1] - d[y+1])`.
pub fn accumulate_repulsion(points: &[f32], field: &DensityField<'_>, repulsion: &mut [f32]) {
    for (p, r) in points
        .chunks_exact(COMPONENTS)
        .zip(repulsion.chunks_exact_mut(COMPONENTS))
    {
        let (ix, iy) = field.cell(p[0], p[1]);
        let x1 = field.sample(ix - 1, iy);
        let x2 = field.sample(ix + 1, iy);
        let y1 = field.sample(ix, iy - 1);
        let y2 = field.sample(ix, iy + 1);

        r[0] = x1 - x2;
        r[1] = y1 - y2;
    }
}

/// Spring attraction along live edges, plus the clustering rules.
///
/// For each live, non-loop edge with `delta = p_s - p_t`:
/// - attraction `a = weight · |delta|² - rest_distance` is applied to both
///   endpoints in opposite directions;
/// - a source with fewer than [`LOW_DEGREE_LIMIT`] live edges is moved
///   [`PULL_FRACTION`] of the way to the target, otherwise a low-degree target
///   is moved toward the source;
/// - the edge is cut when `|delta|² > cutting_threshold` and both endpoints
///   have more than one live edge.
///
/// Positions are moved as edges are visited, so later edges see earlier
/// pulls. Returns the number of edges cut.
pub fn accumulate_attraction(
    points: &mut [f32],
    edges: &mut [LayoutEdge],
    live_degree: &mut [usize],
    rest_distance: f32,
    cutting_threshold: f32,
    attraction: &mut [f32],
) -> usize {
    let mut cut = 0;

    for edge in edges.iter_mut() {
        if edge.dead || edge.is_self_loop() {
            continue;
        }

        let s = edge.source * COMPONENTS;
        let t = edge.target * COMPONENTS;
        let dx = points[s] - points[t];
        let dy = points[s + 1] - points[t + 1];
        let dist_sq = dx * dx + dy * dy;

        let source_degree = live_degree[edge.source];
        let target_degree = live_degree[edge.target];

        let attract = edge.weight * dist_sq - rest_distance;
        attraction[s] -= dx * attract;
        attraction[s + 1] -= dy * attract;
        attraction[t] += dx * attract;
        attraction[t + 1] += dy * attract;

        if source_degree < LOW_DEGREE_LIMIT {
            points[s] -= dx * PULL_FRACTION;
            points[s + 1] -= dy * PULL_FRACTION;
        } else if target_degree < LOW_DEGREE_LIMIT {
            points[t] += dx * PULL_FRACTION;
            points[t + 1] += dy * PULL_FRACTION;
        }

        if dist_sq > cutting_threshold && source_degree > 1 && target_degree > 1 {
            edge.dead = true;
            live_degree[edge.source] = source_degree - 1;
            live_degree[edge.target] = target_degree - 1;
            cut += 1;
        }
    }

    cut
}

/// Move every vertex by its summed force.
///
/// The force is clamped so `|fx| + |fy|` does not exceed 1, then scaled by
/// `temperature`.
pub fn apply_forces(points: &mut [f32], repulsion: &[f32], attraction: &[f32], temperature: f32) {
    for ((p, r), a) in points
        .chunks_exact_mut(COMPONENTS)
        .zip(repulsion.chunks_exact(COMPONENTS))
        .zip(attraction.chunks_exact(COMPONENTS))
    {
        let force_x = a[0] + r[0];
        let force_y = a[1] + r[1];

        let force_div = force_x.abs() + force_y.abs() + FORCE_EPSILON;
        let scale = (1.0 / force_div).min(1.0) * temperature;

        p[0] += force_x * scale;
        p[1] += force_y * scale;
    }
}
