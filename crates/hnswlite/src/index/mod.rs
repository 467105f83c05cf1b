//! HNSW (Hierarchical Navigable Small World) index implementation.
//!
//! Approximate nearest-neighbor search over string-keyed `f32` vectors,
//! following Malkov & Yashunin: a stack of proximity graphs where each
//! node appears on layers `0..=level`, searched top-down.
//!
//! # Module Organization
//!
//! - `params`: construction and search parameters
//! - `graph`: `HnswIndex` storage and insertion
//! - `search`: greedy descent, beam search, brute force
//! - `delete`: removal with neighborhood repair
//! - `persistence`: binary `to_bytes` / `from_bytes`
//! - `verify`: structural invariant checks
//! - `stats`: shape snapshot

// ============================================================================
// Core modules
// ============================================================================
mod candidate;
mod delete;
mod graph;
mod node;
mod params;
mod persistence;
mod rng;
mod search;
mod select;
mod stats;
mod verify;

// ============================================================================
// Tests
// ============================================================================
#[cfg(test)]
mod candidate_tests;

// ============================================================================
// Public API
// ============================================================================
pub use graph::HnswIndex;
pub use node::NodeId;
pub use params::{
    HnswParams, DEFAULT_EF_CONSTRUCTION, DEFAULT_EF_SEARCH, DEFAULT_MAX_CONNECTIONS,
    MAX_CONNECTIONS_LIMIT, MAX_DIMENSIONS, MAX_EF, MIN_CONNECTIONS,
};
pub use persistence::{FORMAT_VERSION, MAGIC};
pub use rng::MAX_LEVEL;
pub use search::SearchResult;
pub use select::NeighborSelection;
pub use stats::IndexStats;
