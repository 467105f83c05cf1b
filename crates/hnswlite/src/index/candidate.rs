//! Heap entry for graph traversal.

use super::node::NodeId;
use std::cmp::Ordering;

/// A node paired with its distance to the current query.
///
/// Ordered by distance under IEEE 754 total ordering, then by slot, so heap
/// order is deterministic even on ties and NaN cannot corrupt a heap.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Candidate {
    pub(crate) distance: f32,
    pub(crate) node: NodeId,
}

impl Candidate {
    #[inline]
    pub(crate) fn new(node: NodeId, distance: f32) -> Self {
        Self { distance, node }
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.node.cmp(&other.node))
    }
}
