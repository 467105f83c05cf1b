//! Index statistics for operational visibility.

use super::graph::HnswIndex;
use crate::distance::DistanceMetric;
use serde::{Deserialize, Serialize};

/// Point-in-time snapshot of index shape.
///
/// `size` is what consistency checks compare against an authoritative
/// record count before deciding to rebuild.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Number of stored vectors.
    pub size: usize,
    /// Vector dimension.
    pub dimensions: usize,
    /// Level of the entry point (0 when empty).
    pub max_level: usize,
    /// M parameter.
    pub max_connections: usize,
    /// Distance metric.
    pub metric: DistanceMetric,
    /// Id of the entry point, if any.
    pub entry_point: Option<String>,
    /// Number of nodes present at each layer, index = layer.
    pub nodes_per_layer: Vec<usize>,
    /// Mean number of layer-0 links per node.
    pub avg_degree_layer0: f32,
    /// Slots left vacant by deletions (reclaimed by a serialization round trip).
    pub vacant_slots: usize,
}

impl HnswIndex {
    /// Returns a statistics snapshot.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stats(&self) -> IndexStats {
        let layers = if self.is_empty() { 0 } else { self.max_level + 1 };
        let mut nodes_per_layer = vec![0usize; layers];
        let mut links_layer0 = 0usize;

        for (_, node) in self.live_nodes() {
            for count in nodes_per_layer.iter_mut().take(node.level() + 1) {
                *count += 1;
            }
            links_layer0 += node.degree(0);
        }

        let avg_degree_layer0 = if self.is_empty() {
            0.0
        } else {
            links_layer0 as f32 / self.len() as f32
        };

        IndexStats {
            size: self.len(),
            dimensions: self.params.dimensions,
            max_level: self.max_level,
            max_connections: self.params.max_connections,
            metric: self.params.metric,
            entry_point: self.entry_point.map(|slot| self.node(slot).id.clone()),
            nodes_per_layer,
            avg_degree_layer0,
            vacant_slots: self.nodes.len() - self.len(),
        }
    }
}
