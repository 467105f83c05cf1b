//! Distance metrics for vector similarity calculations.
//!
//! Both metrics return a *distance*: lower is more similar, and search
//! results are always sorted ascending.
//!
//! - **Cosine**: `1 - cos θ`, on `[0, 2]`. Same direction is 0, opposite is 2.
//! - **Euclidean**: L2 norm of the difference.

use serde::{Deserialize, Serialize};

/// Distance metric for vector similarity calculations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Cosine distance (`1 - cosine_similarity`).
    /// Magnitude is ignored, commonly used with text embeddings.
    #[default]
    Cosine,

    /// Euclidean distance (L2 norm).
    /// Best for spatial data and when magnitude matters.
    Euclidean,
}

impl DistanceMetric {
    /// Calculates the distance between two vectors.
    ///
    /// Callers guarantee `a.len() == b.len()`; the index validates dimensions
    /// before any distance is computed.
    #[must_use]
    #[inline]
    pub fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        debug_assert_eq!(a.len(), b.len(), "distance on vectors of unequal length");
        match self {
            Self::Cosine => cosine_distance(a, b),
            Self::Euclidean => euclidean_distance(a, b),
        }
    }

    /// Stable tag used by the binary index format.
    #[must_use]
    pub(crate) const fn tag(self) -> u8 {
        match self {
            Self::Cosine => 0,
            Self::Euclidean => 1,
        }
    }

    /// Inverse of [`DistanceMetric::tag`].
    #[must_use]
    pub(crate) const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Cosine),
            1 => Some(Self::Euclidean),
            _ => None,
        }
    }
}

impl std::fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cosine => f.write_str("cosine"),
            Self::Euclidean => f.write_str("euclidean"),
        }
    }
}

/// Cosine distance on `[0, 2]`.
///
/// Two zero vectors are identical (distance 0). A zero vector against
/// any other vector has no direction to compare, so it is orthogonal
/// (distance 1).
#[inline]
fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 && norm_b == 0.0 {
        return 0.0;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }

    let similarity = dot / (norm_a.sqrt() * norm_b.sqrt());
    (1.0 - similarity).clamp(0.0, 2.0)
}

#[inline]
fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum::<f32>()
        .sqrt()
}
