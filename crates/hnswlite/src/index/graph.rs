//! HNSW Graph Structure
//!
//! Implements the hierarchical navigable small world graph structure
//! as described in the Malkov & Yashunin paper.
//!
//! Nodes live in a slot arena (`Vec<Option<Node>>`) addressed by
//! [`NodeId`]; external string ids map to slots through an `FxHashMap`.
//! Deleting a node vacates its slot; slots are never reused, and
//! serialization compacts them away in slot order.

use super::candidate::Candidate;
use super::node::{Node, NodeId};
use super::params::HnswParams;
use super::rng::LevelGenerator;
use crate::distance::DistanceMetric;
use crate::error::{Error, Result};
use rustc_hash::FxHashMap;

/// Approximate nearest-neighbor index over string-keyed vectors.
///
/// Single writer: mutation takes `&mut self`. Wrap in a lock (or clone for
/// copy-on-write) to share across threads.
///
/// # Example
///
/// ```rust
/// use hnswlite::{DistanceMetric, HnswIndex, HnswParams};
///
/// let params = HnswParams::new(2, DistanceMetric::Euclidean).with_seed(7);
/// let mut index = HnswIndex::new(params)?;
/// index.insert("a", &[1.0, 0.0])?;
/// index.insert("b", &[3.0, 0.0])?;
///
/// let results = index.search(&[0.0, 0.0], 1)?;
/// assert_eq!(results[0].id, "a");
/// # Ok::<(), hnswlite::Error>(())
/// ```
#[derive(Clone)]
pub struct HnswIndex {
    /// Construction parameters (seed always resolved)
    pub(super) params: HnswParams,
    /// Slot arena; `None` marks a deleted node
    pub(super) nodes: Vec<Option<Node>>,
    /// External id -> slot
    pub(super) ids: FxHashMap<String, NodeId>,
    /// Start of every descent; `None` iff empty
    pub(super) entry_point: Option<NodeId>,
    /// Level of the entry point
    pub(super) max_level: usize,
    /// Seeded level assignment
    pub(super) levels: LevelGenerator,
}

impl HnswIndex {
    /// Creates an empty index.
    ///
    /// When `params.seed` is `None` a seed is drawn from OS entropy; the
    /// index works the same but its graph is not reproducible.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParams`] if the parameters fail validation.
    pub fn new(params: HnswParams) -> Result<Self> {
        params.validate()?;
        let seed = params.seed.unwrap_or_else(rand::random);
        let params = HnswParams {
            seed: Some(seed),
            ..params
        };

        tracing::debug!(
            dimensions = params.dimensions,
            max_connections = params.max_connections,
            ef_construction = params.ef_construction,
            ef_search = params.ef_search,
            metric = %params.metric,
            seed,
            "HNSW index created"
        );

        Ok(Self::from_parts(params, Vec::new(), None, 0, 0))
    }

    /// Creates an empty index with default tuning.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParams`] if `dimensions` is zero or too large.
    pub fn with_dimension(dimensions: usize, metric: DistanceMetric) -> Result<Self> {
        Self::new(HnswParams::new(dimensions, metric))
    }

    /// Assembles an index from already validated parts.
    pub(super) fn from_parts(
        params: HnswParams,
        nodes: Vec<Node>,
        entry_point: Option<NodeId>,
        max_level: usize,
        draws: u64,
    ) -> Self {
        let level_mult = params.level_multiplier();
        let seed = params.seed.unwrap_or_default();
        let ids = nodes
            .iter()
            .enumerate()
            .map(|(slot, node)| (node.id.clone(), slot))
            .collect();

        Self {
            params,
            nodes: nodes.into_iter().map(Some).collect(),
            ids,
            entry_point,
            max_level,
            levels: LevelGenerator::resume(seed, draws, level_mult),
        }
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// Returns the number of vectors in the index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns true if `id` is in the index.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains_key(id)
    }

    /// Returns the stored copy of the vector for `id`, or `None` if absent.
    #[must_use]
    pub fn get_vector(&self, id: &str) -> Option<&[f32]> {
        self.ids
            .get(id)
            .map(|&slot| self.node(slot).vector.as_slice())
    }

    /// Iterates over every stored id, in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.ids.keys().map(String::as_str)
    }

    /// Vector dimension fixed at construction.
    #[must_use]
    pub fn dimensions(&self) -> usize {
        self.params.dimensions
    }

    /// Distance metric fixed at construction.
    #[must_use]
    pub fn metric(&self) -> DistanceMetric {
        self.params.metric
    }

    /// Construction parameters, with the resolved seed.
    #[must_use]
    pub fn params(&self) -> &HnswParams {
        &self.params
    }

    /// Seed used for level assignment.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.levels.seed()
    }

    // =========================================================================
    // Insertion
    // =========================================================================

    /// Inserts a vector under `id`.
    ///
    /// The vector is copied; later changes to the caller's buffer do not
    /// affect the index.
    ///
    /// # Errors
    ///
    /// - [`Error::DimensionMismatch`] if `vector.len() != dimensions`
    /// - [`Error::DuplicateId`] if `id` is already present
    ///
    /// Both are checked before anything is modified.
    pub fn insert(&mut self, id: impl Into<String>, vector: &[f32]) -> Result<()> {
        let id = id.into();
        self.check_dimension(vector)?;
        if self.ids.contains_key(&id) {
            return Err(Error::DuplicateId(id));
        }

        let level = self.levels.next_level();
        let slot = self.nodes.len();
        tracing::trace!(id = %id, slot, level, "inserting node");

        self.nodes
            .push(Some(Node::new(id.clone(), vector.to_vec(), level)));
        self.ids.insert(id, slot);

        let Some(entry) = self.entry_point else {
            // First node - becomes entry point
            self.entry_point = Some(slot);
            self.max_level = level;
            return Ok(());
        };

        // Greedy descent through the layers above the new node's level
        let mut current = Candidate::new(entry, self.distance_to(vector, entry));
        for layer in (level + 1..=self.max_level).rev() {
            current = self.greedy_closest(vector, current, layer);
        }

        let mut entry_points = vec![current];
        for layer in (0..=level.min(self.max_level)).rev() {
            let mut candidates =
                self.search_layer(vector, &entry_points, self.params.ef_construction, layer);
            candidates.retain(|c| c.node != slot);

            self.connect(slot, &candidates, layer);

            if !candidates.is_empty() {
                entry_points = candidates;
            }
        }

        if level > self.max_level {
            tracing::debug!(
                slot,
                level,
                previous = self.max_level,
                "entry point promoted"
            );
            self.max_level = level;
            self.entry_point = Some(slot);
        }

        Ok(())
    }

    /// Links `slot` at `layer` to the selected candidates, both directions.
    ///
    /// Up to `max_links(layer)` candidates are kept: `2 * M` at layer 0.
    fn connect(&mut self, slot: NodeId, candidates: &[Candidate], layer: usize) {
        let pool: Vec<(NodeId, f32)> = candidates.iter().map(|c| (c.node, c.distance)).collect();
        let bound = self.params.max_links(layer);
        let metric = self.params.metric;
        let selected = self.params.neighbor_selection.select(&pool, bound, |a, b| {
            metric.distance(&self.node(a).vector, &self.node(b).vector)
        });

        for neighbor in selected {
            self.link(slot, neighbor, layer);
            if self.node(neighbor).degree(layer) > bound {
                self.prune(neighbor, layer, bound);
            }
        }
    }

    /// Adds the edge `a - b` at `layer`. Each end keeps its list sorted.
    pub(super) fn link(&mut self, a: NodeId, b: NodeId, layer: usize) {
        self.insert_sorted(a, b, layer);
        self.insert_sorted(b, a, layer);
    }

    fn insert_sorted(&mut self, slot: NodeId, neighbor: NodeId, layer: usize) {
        let node = self.node(slot);
        let key = Candidate::new(neighbor, self.distance_to(&node.vector, neighbor));
        let pos = node
            .neighbors(layer)
            .partition_point(|&n| Candidate::new(n, self.distance_to(&node.vector, n)) < key);
        self.node_mut(slot).insert_neighbor(layer, pos, neighbor);
    }

    /// Shrinks the links of `slot` at `layer` back to `bound`.
    ///
    /// The most distant links go first, except that a link which is the
    /// other node's last one at this layer is kept while any alternative
    /// exists. Every dropped link is removed from both ends.
    pub(super) fn prune(&mut self, slot: NodeId, layer: usize, bound: usize) {
        let node = self.node(slot);
        let mut scored: Vec<Candidate> = node
            .neighbors(layer)
            .iter()
            .map(|&n| Candidate::new(n, self.distance_to(&node.vector, n)))
            .collect();
        if scored.len() <= bound {
            return;
        }
        scored.sort_unstable();

        let mut excess = scored.len() - bound;
        let mut dropped: Vec<NodeId> = Vec::with_capacity(excess);
        for c in scored.iter().rev() {
            if excess == 0 {
                break;
            }
            if self.node(c.node).degree(layer) > 1 {
                dropped.push(c.node);
                excess -= 1;
            }
        }
        // Everyone left hangs on this node alone: drop the farthest anyway
        for c in scored.iter().rev() {
            if excess == 0 {
                break;
            }
            if !dropped.contains(&c.node) {
                dropped.push(c.node);
                excess -= 1;
            }
        }

        let kept: Vec<NodeId> = scored
            .iter()
            .map(|c| c.node)
            .filter(|n| !dropped.contains(n))
            .collect();
        self.node_mut(slot).set_neighbors(layer, kept);
        for other in dropped {
            self.node_mut(other).remove_neighbor(layer, slot);
        }
    }

    // =========================================================================
    // Private helper methods
    // =========================================================================

    pub(super) fn check_dimension(&self, vector: &[f32]) -> Result<()> {
        if vector.len() == self.params.dimensions {
            Ok(())
        } else {
            Err(Error::DimensionMismatch {
                expected: self.params.dimensions,
                actual: vector.len(),
            })
        }
    }

    /// Live node at `slot`. Links only ever point at live slots.
    #[inline]
    pub(super) fn node(&self, slot: NodeId) -> &Node {
        match self.nodes.get(slot) {
            Some(Some(node)) => node,
            _ => unreachable!("graph link to vacant slot {slot}"),
        }
    }

    #[inline]
    pub(super) fn node_mut(&mut self, slot: NodeId) -> &mut Node {
        match self.nodes.get_mut(slot) {
            Some(Some(node)) => node,
            _ => unreachable!("graph link to vacant slot {slot}"),
        }
    }

    /// Live nodes with their slots, in slot order.
    pub(super) fn live_nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(slot, node)| node.as_ref().map(|n| (slot, n)))
    }

    #[inline]
    pub(super) fn distance_to(&self, query: &[f32], slot: NodeId) -> f32 {
        self.params.metric.distance(query, &self.node(slot).vector)
    }
}

impl std::fmt::Debug for HnswIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HnswIndex")
            .field("len", &self.len())
            .field("dimensions", &self.params.dimensions)
            .field("metric", &self.params.metric)
            .field("max_connections", &self.params.max_connections)
            .field("max_level", &self.max_level)
            .finish_non_exhaustive()
    }
}
