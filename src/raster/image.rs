//! 2D scalar images with a runtime scalar type tag.

use std::fmt;

/// Scalar type tag of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    Float32,
    Float64,
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarType::Float32 => write!(f, "float32"),
            ScalarType::Float64 => write!(f, "float64"),
        }
    }
}

/// Row-major scalar storage.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarData {
    Float32(Vec<f32>),
    Float64(Vec<f64>),
}

/// A `width × height` single-component image, stored row-major
/// (`index = y * width + x`).
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarImage {
    width: usize,
    height: usize,
    data: ScalarData,
}

impl ScalarImage {
    /// Zero-filled image of the given type.
    pub fn zeros(width: usize, height: usize, scalar_type: ScalarType) -> Self {
        let len = width * height;
        let data = match scalar_type {
            ScalarType::Float32 => ScalarData::Float32(vec![0.0; len]),
            ScalarType::Float64 => ScalarData::Float64(vec![0.0; len]),
        };
        Self { width, height, data }
    }

    /// Build an image by evaluating `f(x, y)` for every cell.
    pub fn from_fn(
        width: usize,
        height: usize,
        scalar_type: ScalarType,
        mut f: impl FnMut(usize, usize) -> f64,
    ) -> Self {
        let mut image = Self::zeros(width, height, scalar_type);
        for y in 0..height {
            for x in 0..width {
                image.set_value(x, y, f(x, y));
            }
        }
        image
    }

    pub(crate) fn from_data(width: usize, height: usize, data: ScalarData) -> Self {
        Self { width, height, data }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn scalar_type(&self) -> ScalarType {
        match self.data {
            ScalarData::Float32(_) => ScalarType::Float32,
            ScalarData::Float64(_) => ScalarType::Float64,
        }
    }

    pub fn data(&self) -> &ScalarData {
        &self.data
    }

    /// Raw single-precision scalars, if that is the storage type.
    pub fn as_f32(&self) -> Option<&[f32]> {
        match &self.data {
            ScalarData::Float32(v) => Some(v),
            ScalarData::Float64(_) => None,
        }
    }

    /// Value at `(x, y)` widened to f64, or `None` outside the image.
    pub fn value(&self, x: usize, y: usize) -> Option<f64> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = y * self.width + x;
        match &self.data {
            ScalarData::Float32(v) => Some(v[i] as f64),
            ScalarData::Float64(v) => Some(v[i]),
        }
    }

    /// Write `(x, y)`; writes outside the image are ignored.
    pub fn set_value(&mut self, x: usize, y: usize, value: f64) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = y * self.width + x;
        match &mut self.data {
            ScalarData::Float32(v) => v[i] = value as f32,
            ScalarData::Float64(v) => v[i] = value,
        }
    }
}
