//! Density rasterization.
//!
//! Vertex positions are splatted onto a regular 2D grid whose values
//! approximate local vertex density. Layouts read the gradient of that field
//! to push vertices apart.

mod image;
mod kernel;
mod splatter;

pub use image::{ScalarData, ScalarImage, ScalarType};
pub use kernel::{SplatKernel, circular_splat, gaussian_splat};
pub use splatter::{DEFAULT_OUTPUT_DIMENSION, FastSplatter};
