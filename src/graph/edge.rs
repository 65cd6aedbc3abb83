//! Edge identifiers and the edge view handed to layouts.

use std::fmt;

/// Dense edge identifier.
///
/// Edge ids index into named edge arrays (such as a weight array), so they
/// run `0..edge_count` in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeId(pub u32);

impl EdgeId {
    /// Create a new EdgeId from a raw u32.
    #[inline]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw u32 value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Edge({})", self.0)
    }
}

impl From<u32> for EdgeId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// One directed edge as seen by a layout: `(id, source, target)` with vertex
/// indices into the point buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeRecord {
    pub id: usize,
    pub source: usize,
    pub target: usize,
}
