//! Splat kernels.
//!
//! Kernel cells are mapped to `[-1, 1]` on both axes with the center cell at
//! `(width / 2, height / 2)`.

use serde::{Deserialize, Serialize};

use super::image::{ScalarImage, ScalarType};

/// Falloff rate of the Gaussian kernel.
const GAUSSIAN_FALLOFF: f64 = 10.0;

/// Shape of the density splat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SplatKernel {
    /// `exp(-10 r²)`: sharp peak, fast falloff.
    #[default]
    Gaussian,
    /// `max(1 - r, 0)`: a cone reaching zero at the kernel edge.
    Circular,
}

impl SplatKernel {
    /// Rasterize this kernel into a single-precision image.
    pub fn generate(self, width: usize, height: usize) -> ScalarImage {
        match self {
            SplatKernel::Gaussian => gaussian_splat(width, height),
            SplatKernel::Circular => circular_splat(width, height),
        }
    }
}

fn normalized(col: usize, row: usize, width: usize, height: usize) -> (f64, f64) {
    let half_w = width as f64 / 2.0;
    let half_h = height as f64 / 2.0;
    ((col as f64 - half_w) / half_w, (row as f64 - half_h) / half_h)
}

/// Gaussian falloff kernel.
pub fn gaussian_splat(width: usize, height: usize) -> ScalarImage {
    ScalarImage::from_fn(width, height, ScalarType::Float32, |col, row| {
        let (x, y) = normalized(col, row, width, height);
        (-(x * x + y * y) * GAUSSIAN_FALLOFF).exp()
    })
}

/// Linear cone kernel: 1 in the middle, 0 at the sides and corners.
pub fn circular_splat(width: usize, height: usize) -> ScalarImage {
    ScalarImage::from_fn(width, height, ScalarType::Float32, |col, row| {
        let (x, y) = normalized(col, row, width, height);
        let radius = (x * x + y * y).sqrt();
        (1.0 - radius).max(0.0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gaussian_peak_at_center() {
        let kernel = gaussian_splat(41, 41);
        assert_eq!(kernel.scalar_type(), ScalarType::Float32);
        let center = kernel.value(20, 20).unwrap();
        assert!(center > 0.98 && center <= 1.0);

        let edge = kernel.value(0, 20).unwrap();
        assert!(edge < 1e-3, "edge value {edge} should be near zero");
    }

    #[test]
    fn test_gaussian_is_symmetric() {
        // Cells are sampled around `width / 2.0`, so column 20 mirrors column 21.
        let kernel = gaussian_splat(41, 41);
        for d in 0..20 {
            let left = kernel.value(20 - d, 20).unwrap();
            let right = kernel.value(21 + d, 20).unwrap();
            let up = kernel.value(20, 20 - d).unwrap();
            assert!((left - right).abs() < 1e-6);
            assert!((left - up).abs() < 1e-6);
        }
    }

    #[test]
    fn test_circular_cone() {
        let kernel = circular_splat(41, 41);
        assert!(kernel.value(20, 20).unwrap() > 0.96);
        assert_eq!(kernel.value(0, 0), Some(0.0));

        let expected = 1.0 - ((9.5f64 / 20.5).powi(2) + (0.5f64 / 20.5).powi(2)).sqrt();
        let mid = kernel.value(30, 20).unwrap();
        assert!((mid - expected).abs() < 1e-6);
    }

    #[test]
    fn test_kernel_dispatch() {
        assert_eq!(SplatKernel::default(), SplatKernel::Gaussian);
        assert_eq!(SplatKernel::Circular.generate(5, 5), circular_splat(5, 5));
    }
}
