//! Tagged point storage and bounding boxes.
//!
//! Points are stored interleaved as `[x0, y0, z0, x1, y1, z1, ...]`, the same
//! layout a host hands over for zero-copy upload. The scalar type is a tag on
//! the buffer rather than a type parameter so that a layout can validate it
//! once at initialization.

use std::fmt;

/// Components stored per point.
pub const COMPONENTS: usize = 3;

/// Scalar type tag of a point buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointType {
    Float32,
    Float64,
}

impl fmt::Display for PointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointType::Float32 => write!(f, "float32"),
            PointType::Float64 => write!(f, "float64"),
        }
    }
}

/// Axis-aligned bounding box in graph space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub min_z: f64,
    pub max_z: f64,
}

impl Bounds {
    /// Degenerate box at the origin, used when there is nothing to bound.
    pub const ZERO: Bounds = Bounds {
        min_x: 0.0,
        max_x: 0.0,
        min_y: 0.0,
        max_y: 0.0,
        min_z: 0.0,
        max_z: 0.0,
    };

    /// Extent along x.
    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Extent along y.
    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Grow x and y by `factor` of their extent on each side and collapse z
    /// to `[0, 0]`.
    pub fn padded_2d(&self, factor: f64) -> Bounds {
        let pad_x = self.width() * factor;
        let pad_y = self.height() * factor;
        Bounds {
            min_x: self.min_x - pad_x,
            max_x: self.max_x + pad_x,
            min_y: self.min_y - pad_y,
            max_y: self.max_y + pad_y,
            min_z: 0.0,
            max_z: 0.0,
        }
    }

    fn include(&mut self, p: [f64; 3]) {
        self.min_x = self.min_x.min(p[0]);
        self.max_x = self.max_x.max(p[0]);
        self.min_y = self.min_y.min(p[1]);
        self.max_y = self.max_y.max(p[1]);
        self.min_z = self.min_z.min(p[2]);
        self.max_z = self.max_z.max(p[2]);
    }
}

/// Interleaved 3-component point buffer tagged with its scalar type.
#[derive(Debug, Clone, PartialEq)]
pub enum PointData {
    Float32(Vec<f32>),
    Float64(Vec<f64>),
}

impl PointData {
    /// Create an empty buffer of the given scalar type.
    pub fn new(point_type: PointType) -> Self {
        match point_type {
            PointType::Float32 => PointData::Float32(Vec::new()),
            PointType::Float64 => PointData::Float64(Vec::new()),
        }
    }

    /// Create an empty buffer with room for `capacity` points.
    pub fn with_capacity(point_type: PointType, capacity: usize) -> Self {
        match point_type {
            PointType::Float32 => PointData::Float32(Vec::with_capacity(capacity * COMPONENTS)),
            PointType::Float64 => PointData::Float64(Vec::with_capacity(capacity * COMPONENTS)),
        }
    }

    pub fn point_type(&self) -> PointType {
        match self {
            PointData::Float32(_) => PointType::Float32,
            PointData::Float64(_) => PointType::Float64,
        }
    }

    /// Number of points (not scalars).
    pub fn len(&self) -> usize {
        match self {
            PointData::Float32(v) => v.len() / COMPONENTS,
            PointData::Float64(v) => v.len() / COMPONENTS,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a point, converting to the buffer's scalar type.
    pub fn push(&mut self, p: [f64; 3]) {
        match self {
            PointData::Float32(v) => v.extend(p.iter().map(|&c| c as f32)),
            PointData::Float64(v) => v.extend_from_slice(&p),
        }
    }

    /// Read point `index` widened to f64.
    pub fn get(&self, index: usize) -> Option<[f64; 3]> {
        let base = index * COMPONENTS;
        match self {
            PointData::Float32(v) => v
                .get(base..base + COMPONENTS)
                .map(|p| [p[0] as f64, p[1] as f64, p[2] as f64]),
            PointData::Float64(v) => v.get(base..base + COMPONENTS).map(|p| [p[0], p[1], p[2]]),
        }
    }

    /// Raw single-precision scalars, if that is the storage type.
    pub fn as_f32(&self) -> Option<&[f32]> {
        match self {
            PointData::Float32(v) => Some(v),
            PointData::Float64(_) => None,
        }
    }

    /// Mutable raw single-precision scalars, if that is the storage type.
    pub fn as_f32_mut(&mut self) -> Option<&mut [f32]> {
        match self {
            PointData::Float32(v) => Some(v),
            PointData::Float64(_) => None,
        }
    }

    /// Bounding box of all points, or `None` for an empty buffer.
    pub fn bounds(&self) -> Option<Bounds> {
        let first = self.get(0)?;
        let mut bounds = Bounds {
            min_x: first[0],
            max_x: first[0],
            min_y: first[1],
            max_y: first[1],
            min_z: first[2],
            max_z: first[2],
        };
        for i in 1..self.len() {
            if let Some(p) = self.get(i) {
                bounds.include(p);
            }
        }
        Some(bounds)
    }

    pub fn clear(&mut self) {
        match self {
            PointData::Float32(v) => v.clear(),
            PointData::Float64(v) => v.clear(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_get() {
        let mut points = PointData::new(PointType::Float32);
        points.push([1.0, 2.0, 0.0]);
        points.push([-3.0, 4.5, 0.0]);

        assert_eq!(points.len(), 2);
        assert_eq!(points.get(1), Some([-3.0, 4.5, 0.0]));
        assert_eq!(points.get(2), None);
        assert_eq!(points.as_f32().map(|v| v.len()), Some(6));
    }

    #[test]
    fn test_float64_has_no_f32_view() {
        let mut points = PointData::new(PointType::Float64);
        points.push([1.0, 1.0, 1.0]);

        assert_eq!(points.point_type(), PointType::Float64);
        assert!(points.as_f32().is_none());
        assert!(points.as_f32_mut().is_none());
    }

    #[test]
    fn test_bounds() {
        let mut points = PointData::new(PointType::Float64);
        assert_eq!(points.bounds(), None);

        points.push([-10.0, -5.0, 0.0]);
        points.push([10.0, 5.0, 2.0]);

        let bounds = points.bounds().unwrap();
        assert_eq!(bounds.min_x, -10.0);
        assert_eq!(bounds.max_x, 10.0);
        assert_eq!(bounds.min_y, -5.0);
        assert_eq!(bounds.max_y, 5.0);
        assert_eq!(bounds.max_z, 2.0);
    }

    #[test]
    fn test_padded_bounds_collapse_z() {
        let bounds = Bounds {
            min_x: 0.0,
            max_x: 10.0,
            min_y: -1.0,
            max_y: 1.0,
            min_z: -3.0,
            max_z: 3.0,
        };
        let padded = bounds.padded_2d(0.1);

        assert_eq!(padded.min_x, -1.0);
        assert_eq!(padded.max_x, 11.0);
        assert!((padded.min_y + 1.2).abs() < 1e-12);
        assert!((padded.max_y - 1.2).abs() < 1e-12);
        assert_eq!((padded.min_z, padded.max_z), (0.0, 0.0));
    }
}
