//! Structural integrity checks.
//!
//! Shared by [`HnswIndex::from_bytes`] (over decoded ordinals) and
//! [`HnswIndex::verify`] (over live slots).

use super::graph::HnswIndex;
use super::node::{Node, NodeId};
use super::params::HnswParams;
use crate::error::{Error, Result};
use rustc_hash::FxHashSet;

impl HnswIndex {
    /// Checks every graph invariant: symmetric links, no self-links or
    /// duplicates, links within bounds and levels, id map consistent, and
    /// the entry point at the maximum level.
    ///
    /// Intended for consistency checks and tests; a healthy index always
    /// passes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Corrupted`] describing the first violation found.
    pub fn verify(&self) -> Result<()> {
        for (slot, node) in self.live_nodes() {
            if self.ids.get(&node.id) != Some(&slot) {
                return Err(Error::Corrupted(format!(
                    "id '{}' does not map to slot {slot}",
                    node.id
                )));
            }
        }
        if self.ids.len() != self.live_nodes().count() {
            return Err(Error::Corrupted(
                "id map and node arena disagree on size".to_string(),
            ));
        }

        check_graph(
            self.live_nodes(),
            |slot| self.nodes.get(slot).and_then(Option::as_ref),
            &self.params,
            self.entry_point,
            self.max_level,
        )
    }
}

/// Validates topology given the live nodes and a slot lookup.
pub(super) fn check_graph<'a, I, F>(
    nodes: I,
    lookup: F,
    params: &HnswParams,
    entry_point: Option<NodeId>,
    max_level: usize,
) -> Result<()>
where
    I: Iterator<Item = (NodeId, &'a Node)>,
    F: Fn(NodeId) -> Option<&'a Node>,
{
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    for (slot, node) in nodes {
        if !seen.insert(node.id.as_str()) {
            return Err(corrupted(format!("duplicate id '{}'", node.id)));
        }
        if node.vector.len() != params.dimensions {
            return Err(corrupted(format!(
                "node {slot}: vector length {} differs from {}",
                node.vector.len(),
                params.dimensions
            )));
        }
        if node.level() > max_level {
            return Err(corrupted(format!(
                "node {slot}: level {} above max level {max_level}",
                node.level()
            )));
        }

        for (layer, links) in node.links.iter().enumerate() {
            if links.len() > params.max_links(layer) {
                return Err(corrupted(format!(
                    "node {slot}: {} links at layer {layer} exceeds bound {}",
                    links.len(),
                    params.max_links(layer)
                )));
            }
            let mut unique: FxHashSet<NodeId> = FxHashSet::default();
            for &neighbor in links {
                let Some(other) = lookup(neighbor) else {
                    return Err(corrupted(format!(
                        "node {slot}: link {neighbor} points at no node"
                    )));
                };
                if neighbor == slot {
                    return Err(corrupted(format!("node {slot}: self-link")));
                }
                if !unique.insert(neighbor) {
                    return Err(corrupted(format!(
                        "node {slot}: duplicate link {neighbor} at layer {layer}"
                    )));
                }
                if other.level() < layer {
                    return Err(corrupted(format!(
                        "node {slot}: link {neighbor} at layer {layer} above its level"
                    )));
                }
                if !other.neighbors(layer).contains(&slot) {
                    return Err(corrupted(format!(
                        "node {slot}: link {neighbor} at layer {layer} is not symmetric"
                    )));
                }
            }
        }
    }

    match entry_point {
        Some(entry) => match lookup(entry) {
            Some(node) if node.level() == max_level => Ok(()),
            Some(node) => Err(corrupted(format!(
                "entry point level {} differs from max level {max_level}",
                node.level()
            ))),
            None => Err(corrupted(format!("entry point {entry} points at no node"))),
        },
        None if seen.is_empty() && max_level == 0 => Ok(()),
        None if seen.is_empty() => Err(corrupted("empty index with non-zero max level")),
        None => Err(corrupted("non-empty index without entry point")),
    }
}

pub(super) fn corrupted(message: impl Into<String>) -> Error {
    Error::Corrupted(message.into())
}
