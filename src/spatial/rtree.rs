//! R-tree over node positions using the rstar crate.
//!
//! Answers "which node is under the pointer" for clicks and drags. The
//! index is bulk-loaded from the committed positions of the active view
//! and rebuilt whenever they move.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use crate::graph::NodeId;

/// A node position in the index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodePoint {
    pub id: NodeId,
    pub x: f32,
    pub y: f32,
}

impl NodePoint {
    pub fn new(id: NodeId, x: f32, y: f32) -> Self {
        Self { id, x, y }
    }
}

impl RTreeObject for NodePoint {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.x, self.y])
    }
}

impl PointDistance for NodePoint {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.x - point[0];
        let dy = self.y - point[1];
        dx * dx + dy * dy
    }

    fn contains_point(&self, point: &[f32; 2]) -> bool {
        self.distance_2(point) < f32::EPSILON
    }
}

/// Spatial index for the nodes of the active view.
pub struct SpatialIndex {
    tree: RTree<NodePoint>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Replace the contents with `(x, y)` positions; ids are list indices.
    pub fn rebuild<I>(&mut self, positions: I)
    where
        I: IntoIterator<Item = (f32, f32)>,
    {
        let points: Vec<NodePoint> = positions
            .into_iter()
            .enumerate()
            .map(|(i, (x, y))| NodePoint::new(NodeId::from_index(i), x, y))
            .collect();
        self.tree = RTree::bulk_load(points);
    }

    /// Nearest node within `max_distance` of a point.
    pub fn nearest_within(&self, x: f32, y: f32, max_distance: f32) -> Option<NodeId> {
        let max_distance_sq = max_distance * max_distance;
        self.tree
            .nearest_neighbor(&[x, y])
            .filter(|point| point.distance_2(&[x, y]) <= max_distance_sq)
            .map(|point| point.id)
    }

    pub fn clear(&mut self) {
        self.tree = RTree::new();
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nearest_within() {
        let mut index = SpatialIndex::new();
        index.rebuild([(0.0, 0.0), (10.0, 10.0)]);

        assert_eq!(index.nearest_within(1.0, 1.0, 5.0), Some(NodeId(0)));
        assert_eq!(index.nearest_within(9.0, 9.0, 5.0), Some(NodeId(1)));
        // Node 0 is ~7.07 from (5, 5)
        assert_eq!(index.nearest_within(5.0, 5.0, 1.0), None);
        assert!(index.nearest_within(5.0, 5.0, 8.0).is_some());
    }

    #[test]
    fn test_rebuild_replaces() {
        let mut index = SpatialIndex::new();
        index.rebuild([(0.0, 0.0)]);
        index.rebuild([(1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]);

        assert_eq!(index.len(), 3);
        assert_eq!(index.nearest_within(0.0, 0.0, 10.0), Some(NodeId(0)));
    }

    #[test]
    fn test_clear() {
        let mut index = SpatialIndex::new();
        index.rebuild([(0.0, 0.0), (1.0, 1.0)]);

        index.clear();
        assert!(index.is_empty());
        assert_eq!(index.nearest_within(0.0, 0.0, 100.0), None);
    }
}
