//! Best-effort separation of coincident vertices.
//!
//! Vertices are dropped into a square bucket grid over the padded bounds in
//! index order. A vertex landing in an occupied bucket jumps randomly until
//! it finds a free one or runs out of tries; the first vertex in a bucket
//! keeps it.

use rand::Rng;

use crate::graph::{Bounds, COMPONENTS};

use super::BOUNDS_PADDING;

/// Buckets per axis per square root of the vertex count.
const GRID_SCALE: f64 = 10.0;
/// Jump attempts per colliding vertex.
pub const MAX_JUMPS: u32 = 10;
/// Jump span in buckets (±2.5 buckets per axis).
const JUMP_BUCKETS: f32 = 5.0;

/// Outcome of one resolution pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// Vertices that landed in an occupied bucket.
    pub collisions: usize,
    /// Jumps performed across all colliding vertices.
    pub jumps: usize,
    /// Vertices still colliding after their last jump.
    pub unresolved: usize,
}

/// Square bucket grid over padded bounds.
#[derive(Debug, Clone)]
pub struct BucketGrid {
    cells: usize,
    bounds: Bounds,
}

impl BucketGrid {
    /// Grid sized `floor(10 · sqrt(vertex_count))` per axis.
    pub fn for_vertices(vertex_count: usize, bounds: Bounds) -> Self {
        let cells = ((vertex_count as f64).sqrt() * GRID_SCALE) as usize;
        Self {
            cells,
            bounds: bounds.padded_2d(BOUNDS_PADDING),
        }
    }

    pub fn cells_per_axis(&self) -> usize {
        self.cells
    }

    /// Flat bucket index of a position. Positions off the grid are clamped to
    /// its border and degenerate extents map to the first row or column.
    pub fn bucket(&self, x: f32, y: f32) -> usize {
        let ix = axis_bucket(x as f64, self.bounds.min_x, self.bounds.width(), self.cells);
        let iy = axis_bucket(y as f64, self.bounds.min_y, self.bounds.height(), self.cells);
        iy * self.cells + ix
    }

    fn jump_distance(&self) -> f32 {
        JUMP_BUCKETS * self.bounds.width() as f32 / self.cells as f32
    }
}

fn axis_bucket(value: f64, min: f64, extent: f64, cells: usize) -> usize {
    let last = cells.saturating_sub(1);
    let f = (value - min) / extent * last as f64 + 0.5;
    if !f.is_finite() || f < 0.0 {
        return 0;
    }
    (f as usize).min(last)
}

/// Jitter vertices that share a bucket with an earlier vertex.
pub fn resolve_coincident_vertices<R: Rng + ?Sized>(
    points: &mut [f32],
    bounds: Option<Bounds>,
    rng: &mut R,
) -> CollisionReport {
    let vertex_count = points.len() / COMPONENTS;
    let mut report = CollisionReport::default();
    let Some(bounds) = bounds else {
        return report;
    };

    let grid = BucketGrid::for_vertices(vertex_count, bounds);
    if grid.cells_per_axis() == 0 {
        return report;
    }

    let mut occupied = vec![false; grid.cells * grid.cells];
    let jump = grid.jump_distance();

    for p in points.chunks_exact_mut(COMPONENTS) {
        let mut bucket = grid.bucket(p[0], p[1]);

        if occupied[bucket] {
            report.collisions += 1;
            let mut attempts = 0;
            while occupied[bucket] && attempts < MAX_JUMPS {
                attempts += 1;
                p[0] += jump * (rng.r#gen::<f32>() - 0.5);
                p[1] += jump * (rng.r#gen::<f32>() - 0.5);
                bucket = grid.bucket(p[0], p[1]);
            }
            report.jumps += attempts as usize;
            if occupied[bucket] {
                report.unresolved += 1;
            }
        }

        occupied[bucket] = true;
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn bounds_of(points: &[f32]) -> Option<Bounds> {
        let mut data = crate::graph::PointData::new(crate::graph::PointType::Float32);
        for p in points.chunks_exact(COMPONENTS) {
            data.push([p[0] as f64, p[1] as f64, p[2] as f64]);
        }
        data.bounds()
    }

    #[test]
    fn test_grid_size() {
        let grid = BucketGrid::for_vertices(4, Bounds::ZERO);
        assert_eq!(grid.cells_per_axis(), 20);
        assert_eq!(BucketGrid::for_vertices(0, Bounds::ZERO).cells_per_axis(), 0);
    }

    #[test]
    fn test_bucket_clamps_and_handles_degenerate() {
        let bounds = Bounds {
            min_x: 0.0,
            max_x: 10.0,
            min_y: 0.0,
            max_y: 10.0,
            min_z: 0.0,
            max_z: 0.0,
        };
        let grid = BucketGrid::for_vertices(1, bounds);
        assert_eq!(grid.bucket(-100.0, -100.0), 0);
        assert_eq!(grid.bucket(100.0, 100.0), 99);

        let flat = BucketGrid::for_vertices(1, Bounds::ZERO);
        assert_eq!(flat.bucket(0.0, 0.0), 0);
    }

    #[test]
    fn test_off_grid_positions_clamp_to_border() {
        let bounds = Bounds {
            min_x: 0.0,
            max_x: 10.0,
            min_y: 0.0,
            max_y: 10.0,
            min_z: 0.0,
            max_z: 0.0,
        };
        let grid = BucketGrid::for_vertices(1, bounds);

        // Padded bounds are [-1, 11]; y = 5 lands in row 5.
        assert_eq!(grid.bucket(1.0e6, 5.0), 5 * 10 + 9);
        assert_eq!(grid.bucket(-1.0e6, 5.0), 5 * 10);
        assert_eq!(grid.bucket(5.0, f32::NAN), 5);
    }

    #[test]
    fn test_distinct_vertices_untouched() {
        let mut points = vec![0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0];
        let before = points.clone();
        let bounds = bounds_of(&points);
        let mut rng = StdRng::seed_from_u64(123);

        let report = resolve_coincident_vertices(&mut points, bounds, &mut rng);

        assert_eq!(report, CollisionReport::default());
        assert_eq!(points, before);
    }

    #[test]
    fn test_coincident_vertices_are_separated() {
        let mut points = vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0];
        let bounds = bounds_of(&points);
        let mut rng = StdRng::seed_from_u64(123);

        let report = resolve_coincident_vertices(&mut points, bounds, &mut rng);

        assert_eq!(report.collisions, 1);
        assert!(report.jumps >= 1 && report.jumps <= MAX_JUMPS as usize);
        assert_eq!(&points[..3], &[0.0, 0.0, 0.0], "first vertex keeps its bucket");

        let grid = BucketGrid::for_vertices(3, bounds.unwrap());
        let first = grid.bucket(points[0], points[1]);
        let second = grid.bucket(points[3], points[4]);
        if report.unresolved == 0 {
            assert_ne!(first, second);
        } else {
            assert_eq!(report.jumps, MAX_JUMPS as usize);
        }
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let start = vec![0.5, 0.5, 0.0, 0.5, 0.5, 0.0, 0.5, 0.5, 0.0, 2.0, 2.0, 0.0];
        let bounds = bounds_of(&start);

        let mut a = start.clone();
        let mut b = start.clone();
        let report_a = resolve_coincident_vertices(&mut a, bounds, &mut StdRng::seed_from_u64(7));
        let report_b = resolve_coincident_vertices(&mut b, bounds, &mut StdRng::seed_from_u64(7));

        assert_eq!(report_a, report_b);
        assert_eq!(a, b);
        assert_eq!(report_a.collisions, 2);
    }

    #[test]
    fn test_empty_input() {
        let mut points: Vec<f32> = Vec::new();
        let mut rng = StdRng::seed_from_u64(1);
        let report = resolve_coincident_vertices(&mut points, None, &mut rng);
        assert_eq!(report, CollisionReport::default());
    }
}
