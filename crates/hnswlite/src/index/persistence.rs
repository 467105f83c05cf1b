//! Binary index format (`to_bytes` / `from_bytes`).
//!
//! # Layout
//!
//! All integers little-endian.
//!
//! ```text
//! magic            [u8; 4]  b"HNSW"
//! version          u32      FORMAT_VERSION
//! dimensions       u32
//! max_connections  u32
//! ef_construction  u32
//! ef_search        u32
//! metric           u8       0 = cosine, 1 = euclidean
//! selection        u8       0 = closest, 1 = diverse
//! alpha            f32
//! seed             u64
//! draws            u64      levels drawn so far
//! max_level        u32
//! has_entry        u8       0 | 1
//! entry            u32      node ordinal (0 when has_entry = 0)
//! node_count       u64
//! node_count × {
//!     id_len  u32
//!     id      [u8; id_len]  UTF-8
//!     level   u32
//!     vector  [f32; dimensions]
//!     (level + 1) × { count u32, [u32; count] neighbor ordinals }
//! }
//! ```
//!
//! Nodes are written in slot order with vacant slots skipped, and links
//! are rewritten as ordinals into that order. The remap is monotonic, so
//! tie-breaking by slot (and with it every search result) survives the
//! round trip.
//!
//! Decoding validates the whole graph and rejects anything that would break
//! an index invariant; it never returns a partially valid index.

use super::graph::HnswIndex;
use super::node::{Node, NodeId};
use super::params::HnswParams;
use super::rng::MAX_LEVEL;
use super::select::NeighborSelection;
use super::verify::{check_graph, corrupted};
use crate::distance::DistanceMetric;
use crate::error::Result;
use std::io::{Cursor, Read};

/// File magic.
pub const MAGIC: [u8; 4] = *b"HNSW";
/// Current format version.
pub const FORMAT_VERSION: u32 = 1;

/// Bytes before the first node record.
const HEADER_LEN: usize = 4 + 4 + 4 * 4 + 1 + 1 + 4 + 8 + 8 + 4 + 1 + 4 + 8;

impl HnswIndex {
    /// Serializes the index, configuration and graph topology included.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut ordinals: Vec<u32> = vec![u32::MAX; self.nodes.len()];
        for (ordinal, (slot, _)) in self.live_nodes().enumerate() {
            ordinals[slot] = ordinal as u32;
        }

        let dims = self.params.dimensions;
        let estimate = HEADER_LEN + self.len() * (16 + dims * 4 + self.params.max_links(0) * 4);
        let mut out = Vec::with_capacity(estimate);

        // Header
        let (selection, alpha) = self.params.neighbor_selection.to_parts();
        out.extend_from_slice(&MAGIC);
        out.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
        out.extend_from_slice(&(dims as u32).to_le_bytes());
        out.extend_from_slice(&(self.params.max_connections as u32).to_le_bytes());
        out.extend_from_slice(&(self.params.ef_construction as u32).to_le_bytes());
        out.extend_from_slice(&(self.params.ef_search as u32).to_le_bytes());
        out.push(self.params.metric.tag());
        out.push(selection);
        out.extend_from_slice(&alpha.to_le_bytes());
        out.extend_from_slice(&self.levels.seed().to_le_bytes());
        out.extend_from_slice(&self.levels.draws().to_le_bytes());
        out.extend_from_slice(&(self.max_level as u32).to_le_bytes());
        match self.entry_point {
            Some(slot) => {
                out.push(1);
                out.extend_from_slice(&ordinals[slot].to_le_bytes());
            }
            None => {
                out.push(0);
                out.extend_from_slice(&0u32.to_le_bytes());
            }
        }
        out.extend_from_slice(&(self.len() as u64).to_le_bytes());

        // Nodes
        for (_, node) in self.live_nodes() {
            out.extend_from_slice(&(node.id.len() as u32).to_le_bytes());
            out.extend_from_slice(node.id.as_bytes());
            out.extend_from_slice(&(node.level() as u32).to_le_bytes());
            for &value in &node.vector {
                out.extend_from_slice(&value.to_le_bytes());
            }
            for links in &node.links {
                out.extend_from_slice(&(links.len() as u32).to_le_bytes());
                for &neighbor in links {
                    out.extend_from_slice(&ordinals[neighbor].to_le_bytes());
                }
            }
        }

        tracing::debug!(nodes = self.len(), bytes = out.len(), "index serialized");
        out
    }

    /// Rebuilds an index from [`HnswIndex::to_bytes`] output.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Corrupted`] if the buffer is truncated, has trailing
    /// bytes, an unknown magic/version/tag, or describes a graph that breaks
    /// an index invariant.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = ByteReader::new(bytes);

        if reader.array::<4>("magic")? != MAGIC {
            return Err(corrupted("bad magic"));
        }
        let version = reader.u32("version")?;
        if version != FORMAT_VERSION {
            return Err(corrupted(format!("unsupported format version {version}")));
        }

        let dimensions = reader.u32("dimensions")? as usize;
        let max_connections = reader.u32("max_connections")? as usize;
        let ef_construction = reader.u32("ef_construction")? as usize;
        let ef_search = reader.u32("ef_search")? as usize;
        let metric_tag = reader.u8("metric")?;
        let metric = DistanceMetric::from_tag(metric_tag)
            .ok_or_else(|| corrupted(format!("unknown metric tag {metric_tag}")))?;
        let selection_tag = reader.u8("neighbor selection")?;
        let alpha = reader.f32("alpha")?;
        let neighbor_selection = NeighborSelection::from_parts(selection_tag, alpha)
            .ok_or_else(|| corrupted(format!("unknown selection tag {selection_tag}")))?;
        let seed = reader.u64("seed")?;
        let draws = reader.u64("draws")?;

        let params = HnswParams {
            dimensions,
            max_connections,
            ef_construction,
            ef_search,
            metric,
            seed: Some(seed),
            neighbor_selection,
        };
        params
            .validate()
            .map_err(|e| corrupted(format!("invalid parameters: {e}")))?;

        let max_level = reader.u32("max_level")? as usize;
        let has_entry = reader.u8("entry flag")?;
        let entry = reader.u32("entry point")? as usize;
        let node_count = usize::try_from(reader.u64("node count")?)
            .map_err(|_| corrupted("node count overflows usize"))?;

        // Every record carries at least id_len, level, vector and one list count
        let min_record = 12 + dimensions * 4;
        if node_count > reader.remaining() / min_record {
            return Err(corrupted(format!(
                "node count {node_count} exceeds remaining data"
            )));
        }

        let mut nodes: Vec<Node> = Vec::with_capacity(node_count);
        for ordinal in 0..node_count {
            nodes.push(read_node(&mut reader, &params, ordinal)?);
        }
        if reader.remaining() != 0 {
            return Err(corrupted(format!(
                "{} trailing bytes after last node",
                reader.remaining()
            )));
        }

        let entry_point = match has_entry {
            0 if node_count == 0 => None,
            1 if node_count > 0 => Some(entry),
            0 => return Err(corrupted("non-empty index without entry point")),
            1 => return Err(corrupted("empty index with an entry point")),
            flag => return Err(corrupted(format!("invalid entry flag {flag}"))),
        };
        check_graph(
            nodes.iter().enumerate(),
            |ordinal| nodes.get(ordinal),
            &params,
            entry_point,
            max_level,
        )?;

        tracing::debug!(
            nodes = node_count,
            dimensions,
            max_level,
            "index deserialized"
        );
        Ok(Self::from_parts(params, nodes, entry_point, max_level, draws))
    }
}

fn read_node(reader: &mut ByteReader<'_>, params: &HnswParams, ordinal: usize) -> Result<Node> {
    let id_len = reader.u32("id length")? as usize;
    let id = String::from_utf8(reader.bytes(id_len, "id")?.to_vec())
        .map_err(|_| corrupted(format!("node {ordinal}: id is not valid UTF-8")))?;

    let level = reader.u32("level")? as usize;
    if level > MAX_LEVEL {
        return Err(corrupted(format!(
            "node {ordinal}: level {level} exceeds {MAX_LEVEL}"
        )));
    }

    let mut vector = Vec::with_capacity(params.dimensions);
    for _ in 0..params.dimensions {
        vector.push(reader.f32("vector")?);
    }

    let mut node = Node::new(id, vector, level);
    for layer in 0..=level {
        let count = reader.u32("link count")? as usize;
        if count > params.max_links(layer) {
            return Err(corrupted(format!(
                "node {ordinal}: {count} links at layer {layer} exceeds bound {}",
                params.max_links(layer)
            )));
        }
        let mut links = Vec::with_capacity(count);
        for _ in 0..count {
            links.push(reader.u32("link")? as NodeId);
        }
        node.set_neighbors(layer, links);
    }
    Ok(node)
}

/// Bounds-checked little-endian reader over the input buffer.
struct ByteReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> ByteReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(bytes),
        }
    }

    fn remaining(&self) -> usize {
        let len = self.cursor.get_ref().len();
        len.saturating_sub(usize::try_from(self.cursor.position()).unwrap_or(len))
    }

    fn array<const N: usize>(&mut self, what: &str) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.cursor.read_exact(&mut buf).map_err(|_| {
            corrupted(format!(
                "unexpected end of data reading {what} at offset {}",
                self.cursor.position()
            ))
        })?;
        Ok(buf)
    }

    fn bytes(&mut self, len: usize, what: &str) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(corrupted(format!(
                "unexpected end of data reading {what} ({len} bytes) at offset {}",
                self.cursor.position()
            )));
        }
        let data: &'a [u8] = *self.cursor.get_ref();
        let start = data.len() - self.remaining();
        let slice = &data[start..start + len];
        self.cursor.set_position((start + len) as u64);
        Ok(slice)
    }

    fn u8(&mut self, what: &str) -> Result<u8> {
        Ok(self.array::<1>(what)?[0])
    }

    fn u32(&mut self, what: &str) -> Result<u32> {
        Ok(u32::from_le_bytes(self.array(what)?))
    }

    fn u64(&mut self, what: &str) -> Result<u64> {
        Ok(u64::from_le_bytes(self.array(what)?))
    }

    fn f32(&mut self, what: &str) -> Result<f32> {
        Ok(f32::from_le_bytes(self.array(what)?))
    }
}
