//! Graph node storage.
//!
//! A node owns its vector and one adjacency list per layer it participates
//! in (`0..=level`). Links are internal [`NodeId`] slots, never references,
//! so back-edge maintenance and repair are plain index bookkeeping.

/// Internal slot of a node in the graph arena.
pub type NodeId = usize;

/// One inserted vector.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    /// External identifier.
    pub(crate) id: String,
    /// Owned copy of the inserted vector.
    pub(crate) vector: Vec<f32>,
    /// Adjacency lists, `links[layer]` for `layer in 0..=level`, each
    /// sorted ascending by distance from this node (slot breaks ties).
    pub(crate) links: Vec<Vec<NodeId>>,
}

impl Node {
    pub(crate) fn new(id: String, vector: Vec<f32>, level: usize) -> Self {
        Self {
            id,
            vector,
            links: vec![Vec::new(); level + 1],
        }
    }

    /// Highest layer this node participates in.
    #[inline]
    pub(crate) fn level(&self) -> usize {
        self.links.len() - 1
    }

    /// Gets the neighbors of this node at `layer` (empty above its level).
    #[inline]
    pub(crate) fn neighbors(&self, layer: usize) -> &[NodeId] {
        self.links.get(layer).map_or(&[], Vec::as_slice)
    }

    /// Sets the neighbors at `layer`.
    pub(crate) fn set_neighbors(&mut self, layer: usize, neighbors: Vec<NodeId>) {
        if let Some(list) = self.links.get_mut(layer) {
            *list = neighbors;
        }
    }

    /// Inserts `neighbor` at position `pos` of the list at `layer`, unless
    /// already linked. `pos` past the end appends.
    pub(crate) fn insert_neighbor(&mut self, layer: usize, pos: usize, neighbor: NodeId) {
        if let Some(list) = self.links.get_mut(layer) {
            if !list.contains(&neighbor) {
                list.insert(pos.min(list.len()), neighbor);
            }
        }
    }

    /// Removes `neighbor` at `layer`, keeping the order of the rest.
    /// Returns whether a link was removed.
    pub(crate) fn remove_neighbor(&mut self, layer: usize, neighbor: NodeId) -> bool {
        match self.links.get_mut(layer) {
            Some(list) => match list.iter().position(|&n| n == neighbor) {
                Some(pos) => {
                    list.remove(pos);
                    true
                }
                None => false,
            },
            None => false,
        }
    }

    /// Number of links at `layer`.
    #[inline]
    pub(crate) fn degree(&self, layer: usize) -> usize {
        self.neighbors(layer).len()
    }
}
