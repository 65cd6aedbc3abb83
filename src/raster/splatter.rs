//! Fast point splatter.
//!
//! Points are first binned into the cells of the output grid, then the splat
//! kernel is stamped once per occupied cell, scaled by the number of points
//! in it. Kernel cells that fall outside the grid are clipped.
//!
//! The output grid spans the model bounds: cell `0` sits on the minimum and
//! cell `dims - 1` on the maximum, so a point maps to
//! `floor((p - min) / spacing + 0.5)` with `spacing = extent / (dims - 1)`.

use std::ops::{AddAssign, Mul};

use crate::graph::{Bounds, PointData};

use super::image::{ScalarData, ScalarImage, ScalarType};

/// Default output grid size per axis.
pub const DEFAULT_OUTPUT_DIMENSION: usize = 100;

/// Sample types a kernel can be stamped in.
trait Sample: Copy + Default + AddAssign + Mul<Output = Self> {
    fn from_count(count: u32) -> Self;
}

impl Sample for f32 {
    fn from_count(count: u32) -> Self {
        count as f32
    }
}

impl Sample for f64 {
    fn from_count(count: u32) -> Self {
        count as f64
    }
}

/// Rasterizes points onto a regular 2D grid by stamping a kernel image.
#[derive(Debug, Clone)]
pub struct FastSplatter {
    splat: ScalarImage,
    output_width: usize,
    output_height: usize,
    bounds: Bounds,
    output: ScalarImage,
}

impl FastSplatter {
    /// A splatter with a 1×1 unit kernel and a 100×100 output.
    pub fn new() -> Self {
        Self {
            splat: ScalarImage::from_fn(1, 1, ScalarType::Float32, |_, _| 1.0),
            output_width: DEFAULT_OUTPUT_DIMENSION,
            output_height: DEFAULT_OUTPUT_DIMENSION,
            bounds: Bounds::ZERO,
            output: ScalarImage::zeros(0, 0, ScalarType::Float32),
        }
    }

    /// Kernel stamped at every point. Its scalar type becomes the output's.
    pub fn set_splat_image(&mut self, splat: ScalarImage) {
        self.splat = splat;
    }

    pub fn splat_image(&self) -> &ScalarImage {
        &self.splat
    }

    pub fn set_output_dimensions(&mut self, width: usize, height: usize) {
        self.output_width = width;
        self.output_height = height;
    }

    pub fn output_dimensions(&self) -> (usize, usize) {
        (self.output_width, self.output_height)
    }

    /// Spatial extent covered by the output grid (x and y are used).
    pub fn set_model_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    pub fn model_bounds(&self) -> Bounds {
        self.bounds
    }

    /// Recompute the output from `points`.
    pub fn update(&mut self, points: &PointData) {
        let counts = self.bin_points(points);
        let (width, height) = (self.output_width, self.output_height);

        let data = match self.splat.data() {
            ScalarData::Float32(kernel) => ScalarData::Float32(self.stamp(kernel, &counts)),
            ScalarData::Float64(kernel) => ScalarData::Float64(self.stamp(kernel, &counts)),
        };
        self.output = ScalarImage::from_data(width, height, data);
    }

    /// The grid produced by the last `update`.
    pub fn output(&self) -> &ScalarImage {
        &self.output
    }

    fn bin_points(&self, points: &PointData) -> Vec<u32> {
        let (width, height) = (self.output_width, self.output_height);
        let mut counts = vec![0u32; width * height];
        if width == 0 || height == 0 {
            return counts;
        }

        let spacing_x = axis_spacing(self.bounds.width(), width);
        let spacing_y = axis_spacing(self.bounds.height(), height);

        for i in 0..points.len() {
            let Some(p) = points.get(i) else { continue };
            let fx = ((p[0] - self.bounds.min_x) / spacing_x + 0.5).floor();
            let fy = ((p[1] - self.bounds.min_y) / spacing_y + 0.5).floor();
            if !fx.is_finite() || !fy.is_finite() {
                continue;
            }
            if fx < 0.0 || fy < 0.0 || fx >= width as f64 || fy >= height as f64 {
                continue;
            }
            counts[fy as usize * width + fx as usize] += 1;
        }

        counts
    }

    fn stamp<T: Sample>(&self, kernel: &[T], counts: &[u32]) -> Vec<T> {
        let (width, height) = (self.output_width, self.output_height);
        let (kernel_w, kernel_h) = (self.splat.width(), self.splat.height());
        let (center_x, center_y) = ((kernel_w / 2) as i64, (kernel_h / 2) as i64);
        let mut out = vec![T::default(); width * height];

        for (cell, &count) in counts.iter().enumerate() {
            if count == 0 {
                continue;
            }
            let scale = T::from_count(count);
            let (bx, by) = ((cell % width) as i64, (cell / width) as i64);

            for ky in 0..kernel_h {
                let oy = by + ky as i64 - center_y;
                if oy < 0 || oy >= height as i64 {
                    continue;
                }
                for kx in 0..kernel_w {
                    let ox = bx + kx as i64 - center_x;
                    if ox < 0 || ox >= width as i64 {
                        continue;
                    }
                    out[oy as usize * width + ox as usize] += kernel[ky * kernel_w + kx] * scale;
                }
            }
        }

        out
    }
}

impl Default for FastSplatter {
    fn default() -> Self {
        Self::new()
    }
}

fn axis_spacing(extent: f64, cells: usize) -> f64 {
    if cells > 1 {
        extent / (cells - 1) as f64
    } else {
        extent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::PointType;
    use crate::raster::gaussian_splat;

    fn unit_bounds() -> Bounds {
        Bounds {
            min_x: 0.0,
            max_x: 1.0,
            min_y: 0.0,
            max_y: 1.0,
            min_z: 0.0,
            max_z: 0.0,
        }
    }

    fn points(coords: &[(f64, f64)]) -> PointData {
        let mut data = PointData::new(PointType::Float32);
        for &(x, y) in coords {
            data.push([x, y, 0.0]);
        }
        data
    }

    #[test]
    fn test_unit_kernel_counts_points() {
        let mut splatter = FastSplatter::new();
        splatter.set_output_dimensions(11, 11);
        splatter.set_model_bounds(unit_bounds());
        splatter.update(&points(&[(0.5, 0.5), (0.5, 0.5), (0.0, 1.0)]));

        let out = splatter.output();
        assert_eq!(out.scalar_type(), ScalarType::Float32);
        assert_eq!(out.value(5, 5), Some(2.0));
        assert_eq!(out.value(0, 10), Some(1.0));
        assert_eq!(out.value(4, 5), Some(0.0));
    }

    #[test]
    fn test_kernel_is_clipped_at_edges() {
        let mut splatter = FastSplatter::new();
        splatter.set_splat_image(ScalarImage::from_fn(3, 3, ScalarType::Float32, |_, _| 1.0));
        splatter.set_output_dimensions(5, 5);
        splatter.set_model_bounds(unit_bounds());
        splatter.update(&points(&[(0.0, 0.0)]));

        let out = splatter.output();
        let total: f32 = out.as_f32().unwrap().iter().sum();
        assert_eq!(total, 4.0);
        assert_eq!(out.value(1, 1), Some(1.0));
        assert_eq!(out.value(2, 2), Some(0.0));
    }

    #[test]
    fn test_points_outside_bounds_are_skipped() {
        let mut splatter = FastSplatter::new();
        splatter.set_output_dimensions(4, 4);
        splatter.set_model_bounds(unit_bounds());
        splatter.update(&points(&[(5.0, 0.5), (-2.0, 0.5)]));

        let total: f32 = splatter.output().as_f32().unwrap().iter().sum();
        assert_eq!(total, 0.0);
    }

    #[test]
    fn test_degenerate_bounds_produce_empty_grid() {
        let mut splatter = FastSplatter::new();
        splatter.set_model_bounds(Bounds::ZERO);
        splatter.update(&points(&[(0.0, 0.0)]));

        let out = splatter.output();
        assert_eq!((out.width(), out.height()), (100, 100));
        assert!(out.as_f32().unwrap().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_output_follows_kernel_type() {
        let mut splatter = FastSplatter::new();
        splatter.set_splat_image(ScalarImage::zeros(3, 3, ScalarType::Float64));
        splatter.set_model_bounds(unit_bounds());
        splatter.update(&points(&[(0.5, 0.5)]));

        assert_eq!(splatter.output().scalar_type(), ScalarType::Float64);
    }

    #[test]
    fn test_gaussian_density_peaks_at_point() {
        let mut splatter = FastSplatter::new();
        splatter.set_splat_image(gaussian_splat(41, 41));
        splatter.set_model_bounds(unit_bounds());
        splatter.update(&points(&[(0.5, 0.5)]));

        // The point lands in the cell around (50, 50).
        let out = splatter.output();
        let peak = out.value(50, 50).unwrap();
        assert!(peak > out.value(45, 50).unwrap());
        assert!(peak > out.value(50, 55).unwrap());
        assert_eq!(out.value(80, 50), Some(0.0));
    }
}
