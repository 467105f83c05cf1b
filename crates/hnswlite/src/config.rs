//! `hnswlite` Configuration Module
//!
//! Provides index defaults via `hnswlite.toml`, environment variables,
//! and runtime overrides.
//!
//! # Priority (highest to lowest)
//!
//! 1. Runtime overrides (`HnswParams::with_*`)
//! 2. Environment variables (`HNSWLITE_*`, nested keys split on `__`)
//! 3. Configuration file (`hnswlite.toml`)
//! 4. Default values
//!
//! # Example file
//!
//! ```toml
//! [index]
//! max_connections = 24
//! ef_construction = 300
//! ef_search = 80
//! metric = "euclidean"
//! seed = 42
//!
//! [index.neighbor_selection]
//! kind = "diverse"
//! alpha = 1.2
//! ```
//!
//! The same `ef_search` from the environment: `HNSWLITE_INDEX__EF_SEARCH=80`.

use crate::distance::DistanceMetric;
use crate::error::{Error, Result};
use crate::index::{
    HnswParams, NeighborSelection, DEFAULT_EF_CONSTRUCTION, DEFAULT_EF_SEARCH,
    DEFAULT_MAX_CONNECTIONS,
};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "hnswlite.toml";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "HNSWLITE_";

/// Index configuration section (`[index]`).
///
/// Everything in [`HnswParams`] except the dimension, which belongs to the
/// data rather than the deployment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexSection {
    /// Number of links per node (M).
    pub max_connections: usize,
    /// Candidate list size while building.
    pub ef_construction: usize,
    /// Default candidate list size for queries.
    pub ef_search: usize,
    /// Distance metric.
    pub metric: DistanceMetric,
    /// Level assignment seed; unset draws one per index.
    pub seed: Option<u64>,
    /// Neighbor selection strategy.
    pub neighbor_selection: NeighborSelection,
}

impl Default for IndexSection {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            ef_construction: DEFAULT_EF_CONSTRUCTION,
            ef_search: DEFAULT_EF_SEARCH,
            metric: DistanceMetric::default(),
            seed: None,
            neighbor_selection: NeighborSelection::default(),
        }
    }
}

/// Main `hnswlite` configuration structure.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// HNSW index defaults.
    pub index: IndexSection,
}

impl IndexConfig {
    /// Loads configuration from default sources.
    ///
    /// Priority: defaults < `hnswlite.toml` < environment variables. A
    /// missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a source cannot be parsed.
    pub fn load() -> Result<Self> {
        Self::load_from_path(DEFAULT_CONFIG_FILE)
    }

    /// Loads configuration from a specific file path, then the environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a source cannot be parsed.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading index configuration");

        Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| Error::Config(e.to_string()))
    }

    /// Creates a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if parsing fails.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::string(toml_str))
            .extract()
            .map_err(|e| Error::Config(e.to_string()))
    }

    /// Builds validated parameters for an index of `dimensions`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParams`] if the configured values (or the
    /// dimension) fail [`HnswParams::validate`].
    pub fn params(&self, dimensions: usize) -> Result<HnswParams> {
        let section = &self.index;
        let mut params = HnswParams::new(dimensions, section.metric)
            .with_max_connections(section.max_connections)
            .with_ef_construction(section.ef_construction)
            .with_ef_search(section.ef_search)
            .with_neighbor_selection(section.neighbor_selection);
        params.seed = section.seed;
        params.validate()?;
        Ok(params)
    }

    /// Serializes the configuration to TOML.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if serialization fails (e.g. a seed above
    /// `i64::MAX`, which TOML integers cannot hold).
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }
}
