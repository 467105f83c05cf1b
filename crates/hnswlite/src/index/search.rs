//! Graph traversal: greedy descent, bounded beam search, and the public
//! query entry points.

use super::candidate::Candidate;
use super::graph::HnswIndex;
use crate::error::Result;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// One search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// External id of the stored vector.
    pub id: String,
    /// Distance to the query under the index metric (lower is closer).
    pub distance: f32,
}

impl HnswIndex {
    /// Searches for the `k` nearest neighbors using the configured `ef_search`.
    ///
    /// Results are sorted ascending by distance, at most `min(k, len)` of
    /// them. When `max(ef_search, k) >= len` every node is scanned and the
    /// answer is exact. Otherwise the graph walk is approximate and can
    /// come back short of `k` if deletes cut nodes off from the entry
    /// point at layer 0.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`](crate::Error::DimensionMismatch)
    /// if `query.len() != dimensions`.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchResult>> {
        self.search_with_ef(query, k, self.params.ef_search)
    }

    /// Searches with an explicit candidate breadth.
    ///
    /// The beam keeps `max(ef, k)` candidates; a wider `ef` trades latency
    /// for recall on this call only.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`](crate::Error::DimensionMismatch)
    /// if `query.len() != dimensions`.
    pub fn search_with_ef(
        &self,
        query: &[f32],
        k: usize,
        ef: usize,
    ) -> Result<Vec<SearchResult>> {
        self.check_dimension(query)?;
        let Some(entry) = self.entry_point else {
            return Ok(Vec::new());
        };
        if k == 0 {
            return Ok(Vec::new());
        }

        // A beam this wide keeps every reachable node: the scan is exact and cheaper
        let ef = ef.max(k);
        if ef >= self.len() {
            return self.brute_force_search(query, k);
        }

        // Greedy search from top layer to layer 1
        let mut current = Candidate::new(entry, self.distance_to(query, entry));
        for layer in (1..=self.max_level).rev() {
            current = self.greedy_closest(query, current, layer);
        }

        let mut found = self.search_layer(query, &[current], ef, 0);
        found.truncate(k);
        Ok(self.to_results(found))
    }

    /// Exact k-NN by linear scan.
    ///
    /// Same contract and result ordering as [`HnswIndex::search`]; used as
    /// ground truth for recall checks.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`](crate::Error::DimensionMismatch)
    /// if `query.len() != dimensions`.
    pub fn brute_force_search(&self, query: &[f32], k: usize) -> Result<Vec<SearchResult>> {
        self.check_dimension(query)?;
        let mut all: Vec<Candidate> = self
            .live_nodes()
            .map(|(slot, node)| {
                Candidate::new(slot, self.params.metric.distance(query, &node.vector))
            })
            .collect();
        all.sort_unstable();
        all.truncate(k);
        Ok(self.to_results(all))
    }

    /// Moves to the closest neighbor at `layer` until nothing improves.
    pub(super) fn greedy_closest(
        &self,
        query: &[f32],
        start: Candidate,
        layer: usize,
    ) -> Candidate {
        let mut best = start;

        loop {
            let current = best.node;
            for &neighbor in self.node(current).neighbors(layer) {
                let dist = self.distance_to(query, neighbor);
                if dist < best.distance {
                    best = Candidate::new(neighbor, dist);
                }
            }
            if best.node == current {
                return best;
            }
        }
    }

    /// Beam search over one layer, keeping at most `ef` results.
    ///
    /// Returns the kept results sorted ascending. Expansion stops once the
    /// closest unexplored candidate is farther than the worst kept result
    /// of a full result set.
    pub(super) fn search_layer(
        &self,
        query: &[f32],
        entry_points: &[Candidate],
        ef: usize,
        layer: usize,
    ) -> Vec<Candidate> {
        let mut visited: FxHashSet<usize> = FxHashSet::default();
        let mut candidates: BinaryHeap<Reverse<Candidate>> = BinaryHeap::new();
        let mut results: BinaryHeap<Candidate> = BinaryHeap::new();

        for &ep in entry_points {
            if visited.insert(ep.node) {
                candidates.push(Reverse(ep));
                results.push(ep);
            }
        }
        while results.len() > ef {
            results.pop();
        }

        while let Some(Reverse(closest)) = candidates.pop() {
            if results.len() >= ef && results.peek().is_some_and(|worst| closest > *worst) {
                break;
            }

            for &neighbor in self.node(closest.node).neighbors(layer) {
                if !visited.insert(neighbor) {
                    continue;
                }
                let found = Candidate::new(neighbor, self.distance_to(query, neighbor));
                let improves =
                    results.len() < ef || results.peek().is_some_and(|worst| found < *worst);
                if improves {
                    candidates.push(Reverse(found));
                    results.push(found);
                    if results.len() > ef {
                        results.pop();
                    }
                }
            }
        }

        let mut sorted = results.into_vec();
        sorted.sort_unstable();
        sorted
    }

    fn to_results(&self, found: Vec<Candidate>) -> Vec<SearchResult> {
        found
            .into_iter()
            .map(|c| SearchResult {
                id: self.node(c.node).id.clone(),
                distance: c.distance,
            })
            .collect()
    }
}
