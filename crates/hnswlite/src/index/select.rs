//! Neighbor selection strategies.
//!
//! Selection is a pure function over `(candidates, M)`: the candidates come
//! sorted by distance to the node being linked, and the strategy picks at
//! most `M` of them. Strategies that need distances *between* candidates get
//! them through the `pairwise` callback, so they never touch graph storage.

use super::node::NodeId;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Strategy used to pick a new node's links from its search candidates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NeighborSelection {
    /// Keep the `M` closest candidates.
    #[default]
    Closest,
    /// HNSW heuristic with VAMANA-style `alpha`.
    ///
    /// A candidate is kept only if `alpha * d(q, c) <= d(c, s)` for every
    /// already-selected `s`; remaining slots are backfilled with the
    /// closest rejected candidates. `alpha = 1.0` is the paper heuristic,
    /// larger values favor more spread-out links.
    Diverse {
        /// Diversification factor, `>= 1.0`.
        alpha: f32,
    },
}

impl NeighborSelection {
    /// Selects up to `max_neighbors` ids from `candidates`.
    ///
    /// `candidates` must be sorted ascending by distance to the query.
    pub fn select<F>(
        &self,
        candidates: &[(NodeId, f32)],
        max_neighbors: usize,
        pairwise: F,
    ) -> Vec<NodeId>
    where
        F: Fn(NodeId, NodeId) -> f32,
    {
        if candidates.len() <= max_neighbors {
            return candidates.iter().map(|&(id, _)| id).collect();
        }

        match *self {
            Self::Closest => candidates
                .iter()
                .take(max_neighbors)
                .map(|&(id, _)| id)
                .collect(),
            Self::Diverse { alpha } => select_diverse(candidates, max_neighbors, alpha, pairwise),
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        match *self {
            Self::Closest => Ok(()),
            Self::Diverse { alpha } if alpha.is_finite() && alpha >= 1.0 => Ok(()),
            Self::Diverse { alpha } => Err(Error::InvalidParams(format!(
                "neighbor_selection.alpha {alpha} must be finite and >= 1.0"
            ))),
        }
    }

    /// Tag and alpha for the binary format.
    pub(crate) fn to_parts(self) -> (u8, f32) {
        match self {
            Self::Closest => (0, 1.0),
            Self::Diverse { alpha } => (1, alpha),
        }
    }

    pub(crate) fn from_parts(tag: u8, alpha: f32) -> Option<Self> {
        match tag {
            0 => Some(Self::Closest),
            1 => Some(Self::Diverse { alpha }),
            _ => None,
        }
    }
}

fn select_diverse<F>(
    candidates: &[(NodeId, f32)],
    max_neighbors: usize,
    alpha: f32,
    pairwise: F,
) -> Vec<NodeId>
where
    F: Fn(NodeId, NodeId) -> f32,
{
    let mut selected: Vec<NodeId> = Vec::with_capacity(max_neighbors);
    let mut rejected: Vec<NodeId> = Vec::new();

    for &(candidate, dist_to_query) in candidates {
        if selected.len() >= max_neighbors {
            break;
        }
        let is_diverse = selected
            .iter()
            .all(|&s| alpha * dist_to_query <= pairwise(candidate, s));
        if is_diverse {
            selected.push(candidate);
        } else {
            rejected.push(candidate);
        }
    }

    // Backfill in distance order so sparse regions still get M links
    for candidate in rejected {
        if selected.len() >= max_neighbors {
            break;
        }
        selected.push(candidate);
    }

    selected
}
