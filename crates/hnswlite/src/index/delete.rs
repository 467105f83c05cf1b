//! Node removal and neighborhood repair.
//!
//! Removing a node strips every link to it (adjacency is symmetric, so the
//! node's own lists name every referrer), then re-links its former
//! neighbors among themselves so the hole does not split the graph.

use super::candidate::Candidate;
use super::graph::HnswIndex;
use super::node::NodeId;

impl HnswIndex {
    /// Removes `id` from the index.
    ///
    /// Returns `false` and changes nothing if `id` is absent.
    pub fn delete(&mut self, id: &str) -> bool {
        let Some(slot) = self.ids.remove(id) else {
            return false;
        };
        let Some(removed) = self.nodes.get_mut(slot).and_then(Option::take) else {
            return false;
        };

        for (layer, neighbors) in removed.links.iter().enumerate() {
            for &neighbor in neighbors {
                self.node_mut(neighbor).remove_neighbor(layer, slot);
            }
        }

        if self.entry_point == Some(slot) {
            self.elect_entry_point();
        }

        for (layer, orphans) in removed.links.iter().enumerate() {
            self.repair_layer(orphans, layer);
        }

        tracing::debug!(
            id,
            slot,
            level = removed.level(),
            remaining = self.len(),
            "node deleted"
        );
        true
    }

    /// Picks the live node with the highest level (lowest slot on ties).
    fn elect_entry_point(&mut self) {
        let elected = self
            .live_nodes()
            .map(|(slot, node)| (slot, node.level()))
            .fold(None, |best: Option<(NodeId, usize)>, (slot, level)| match best {
                Some((_, best_level)) if best_level >= level => best,
                _ => Some((slot, level)),
            });

        match elected {
            Some((slot, level)) => {
                tracing::debug!(slot, level, "entry point re-elected");
                self.entry_point = Some(slot);
                self.max_level = level;
            }
            None => {
                self.entry_point = None;
                self.max_level = 0;
            }
        }
    }

    /// Re-links the former neighbors of a deleted node at `layer`.
    ///
    /// Each orphan that has room gets one link to the closest other orphan
    /// that also has room and is not already linked. An orphan left with
    /// no links at all is reattached to its nearest live node at `layer`.
    fn repair_layer(&mut self, orphans: &[NodeId], layer: usize) {
        let bound = self.params.max_links(layer);

        for &orphan in orphans {
            let node = self.node(orphan);
            if node.degree(layer) >= bound {
                continue;
            }

            let closest = orphans
                .iter()
                .filter(|&&other| {
                    other != orphan
                        && !node.neighbors(layer).contains(&other)
                        && self.node(other).degree(layer) < bound
                })
                .map(|&other| Candidate::new(other, self.distance_to(&node.vector, other)))
                .min();

            if let Some(c) = closest {
                self.link(orphan, c.node, layer);
            }
        }

        for &orphan in orphans {
            if self.node(orphan).degree(layer) == 0 {
                self.reattach(orphan, layer);
            }
        }
    }

    /// Links an isolated node to its nearest live node at `layer`.
    ///
    /// Linear scan; only reached when a node's whole neighborhood at this
    /// layer was the deleted node.
    fn reattach(&mut self, orphan: NodeId, layer: usize) {
        let vector = &self.node(orphan).vector;
        let nearest = self
            .live_nodes()
            .filter(|&(slot, node)| slot != orphan && node.level() >= layer)
            .map(|(slot, node)| {
                Candidate::new(slot, self.params.metric.distance(vector, &node.vector))
            })
            .min();

        let Some(nearest) = nearest else {
            return;
        };
        tracing::trace!(
            orphan,
            target = nearest.node,
            layer,
            "reattaching isolated node"
        );

        self.link(orphan, nearest.node, layer);
        let bound = self.params.max_links(layer);
        if self.node(nearest.node).degree(layer) > bound {
            self.prune(nearest.node, layer, bound);
        }
    }
}
