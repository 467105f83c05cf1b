//! HNSW construction parameters.
//!
//! Every field is fixed for the lifetime of an index and persisted by
//! [`HnswIndex::to_bytes`](super::HnswIndex::to_bytes), so a deserialized
//! index behaves exactly like the one that produced the bytes.

use super::select::NeighborSelection;
use crate::distance::DistanceMetric;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default number of links per node per layer (M).
pub const DEFAULT_MAX_CONNECTIONS: usize = 16;
/// Default candidate breadth while building.
pub const DEFAULT_EF_CONSTRUCTION: usize = 200;
/// Default candidate breadth for queries.
pub const DEFAULT_EF_SEARCH: usize = 50;

/// Largest accepted vector dimension.
pub const MAX_DIMENSIONS: usize = 65_536;
/// Smallest accepted M. Below it, pruning splits layer 0 apart and
/// stored vectors stop finding themselves.
pub const MIN_CONNECTIONS: usize = 4;
/// Largest accepted M.
pub const MAX_CONNECTIONS_LIMIT: usize = 512;
/// Largest accepted `ef_construction` / `ef_search`.
pub const MAX_EF: usize = 100_000;

/// HNSW index parameters.
///
/// Use [`HnswParams::new`] for defaults and the `with_*` methods to tune.
///
/// ```rust
/// use hnswlite::{DistanceMetric, HnswParams};
///
/// let params = HnswParams::new(384, DistanceMetric::Cosine)
///     .with_max_connections(24)
///     .with_ef_construction(300)
///     .with_seed(42);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HnswParams {
    /// Length of every vector in the index.
    pub dimensions: usize,
    /// Number of links per node (M). Layer 0 allows `2 * M`.
    pub max_connections: usize,
    /// Candidate list size while building. Must be `>= max_connections`.
    pub ef_construction: usize,
    /// Default candidate list size for queries.
    pub ef_search: usize,
    /// Distance metric.
    pub metric: DistanceMetric,
    /// Seed for level assignment. `None` draws one from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Neighbor selection strategy used at construction time.
    #[serde(default)]
    pub neighbor_selection: NeighborSelection,
}

impl HnswParams {
    /// Creates parameters with default tuning for the given dimension and metric.
    #[must_use]
    pub fn new(dimensions: usize, metric: DistanceMetric) -> Self {
        Self {
            dimensions,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            ef_construction: DEFAULT_EF_CONSTRUCTION,
            ef_search: DEFAULT_EF_SEARCH,
            metric,
            seed: None,
            neighbor_selection: NeighborSelection::default(),
        }
    }

    /// Sets M.
    #[must_use]
    pub fn with_max_connections(mut self, max_connections: usize) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Sets the construction candidate breadth.
    #[must_use]
    pub fn with_ef_construction(mut self, ef_construction: usize) -> Self {
        self.ef_construction = ef_construction;
        self
    }

    /// Sets the default query candidate breadth.
    #[must_use]
    pub fn with_ef_search(mut self, ef_search: usize) -> Self {
        self.ef_search = ef_search;
        self
    }

    /// Fixes the level-assignment seed, making construction reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the neighbor selection strategy.
    #[must_use]
    pub fn with_neighbor_selection(mut self, selection: NeighborSelection) -> Self {
        self.neighbor_selection = selection;
        self
    }

    /// Neighbor bound at `layer`: `2 * M` at layer 0, `M` above.
    #[must_use]
    #[inline]
    pub fn max_links(&self, layer: usize) -> usize {
        if layer == 0 {
            self.max_connections * 2
        } else {
            self.max_connections
        }
    }

    /// Level multiplier `1 / ln(M)`.
    #[must_use]
    pub fn level_multiplier(&self) -> f64 {
        1.0 / (self.max_connections as f64).ln()
    }

    /// Validates the parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParams`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_DIMENSIONS).contains(&self.dimensions) {
            return Err(Error::InvalidParams(format!(
                "dimensions {} is out of range [1, {MAX_DIMENSIONS}]",
                self.dimensions
            )));
        }
        if !(MIN_CONNECTIONS..=MAX_CONNECTIONS_LIMIT).contains(&self.max_connections) {
            return Err(Error::InvalidParams(format!(
                "max_connections {} is out of range [{MIN_CONNECTIONS}, {MAX_CONNECTIONS_LIMIT}]",
                self.max_connections
            )));
        }
        if self.ef_construction < self.max_connections || self.ef_construction > MAX_EF {
            return Err(Error::InvalidParams(format!(
                "ef_construction {} is out of range [{}, {MAX_EF}]",
                self.ef_construction, self.max_connections
            )));
        }
        if !(1..=MAX_EF).contains(&self.ef_search) {
            return Err(Error::InvalidParams(format!(
                "ef_search {} is out of range [1, {MAX_EF}]",
                self.ef_search
            )));
        }
        self.neighbor_selection.validate()
    }
}
