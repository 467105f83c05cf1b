//! # hnswlite
//!
//! In-memory approximate nearest-neighbor index based on HNSW
//! (Hierarchical Navigable Small World graphs).
//!
//! `hnswlite` stores string-keyed `f32` vectors and answers k-nearest
//! neighbor queries in sub-linear time. It is meant to sit next to an
//! authoritative record store: the index can be serialized to bytes,
//! reloaded, and rebuilt from source data when a consistency check fails.
//!
//! ## Features
//!
//! - **2 Distance Metrics**: Cosine (default) and Euclidean
//! - **Deletion with repair**: removing a vector re-links its neighborhood
//! - **Deterministic builds**: seeded level assignment, reproducible graphs
//! - **Binary persistence**: self-validating `to_bytes` / `from_bytes`
//! - **Configuration**: `hnswlite.toml` and `HNSWLITE_*` environment variables
//!
//! ## Quick Start
//!
//! ```rust
//! use hnswlite::{DistanceMetric, HnswIndex, HnswParams};
//!
//! let params = HnswParams::new(3, DistanceMetric::Cosine).with_seed(42);
//! let mut index = HnswIndex::new(params)?;
//!
//! index.insert("doc-1", &[1.0, 0.0, 0.0])?;
//! index.insert("doc-2", &[0.0, 1.0, 0.0])?;
//! index.insert("doc-3", &[0.9, 0.1, 0.0])?;
//!
//! let results = index.search(&[1.0, 0.05, 0.0], 2)?;
//! assert_eq!(results[0].id, "doc-1");
//!
//! // Persist and reload
//! let bytes = index.to_bytes();
//! let restored = HnswIndex::from_bytes(&bytes)?;
//! assert_eq!(restored.len(), 3);
//! # Ok::<(), hnswlite::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::derive_partial_eq_without_eq)]
#![allow(clippy::redundant_pub_crate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
#[cfg(test)]
mod config_tests;
pub mod distance;
pub mod error;
pub mod index;

pub use config::{IndexConfig, IndexSection};
pub use distance::DistanceMetric;
pub use error::{Error, Result};
pub use index::{HnswIndex, HnswParams, IndexStats, NeighborSelection, SearchResult};
