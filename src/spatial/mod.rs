//! Spatial indexing for O(log n) hit testing.

mod rtree;

pub use rtree::SpatialIndex;
