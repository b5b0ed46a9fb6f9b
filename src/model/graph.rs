use std::collections::HashMap;

/// One entry of a compound's neighbor list.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    pub id: String,
    pub similarity: f64,
}

impl Neighbor {
    pub fn new(id: impl Into<String>, similarity: f64) -> Self {
        Self {
            id: id.into(),
            similarity,
        }
    }
}

/// Precomputed neighbor lists keyed by compound identifier.
pub type NeighborMap = HashMap<String, Vec<Neighbor>>;

/// Unordered pair of compounds with their similarity score.
///
/// The constructor stores the lexicographically smaller identifier as
/// `source`, so two edges over the same pair always compare equal.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityEdge {
    pub source: String,
    pub target: String,
    pub similarity: f64,
}

impl SimilarityEdge {
    pub fn new(a: impl Into<String>, b: impl Into<String>, similarity: f64) -> Self {
        let (a, b) = (a.into(), b.into());
        if a <= b {
            Self {
                source: a,
                target: b,
                similarity,
            }
        } else {
            Self {
                source: b,
                target: a,
                similarity,
            }
        }
    }
}

/// Square similarity matrix aligned to a fixed compound ordering.
///
/// Values are stored row-major. The diagonal is exactly `1.0`; every
/// off-diagonal value lies in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    order: Vec<String>,
    values: Vec<f64>,
}

impl SimilarityMatrix {
    pub(crate) fn from_parts(order: Vec<String>, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), order.len() * order.len());
        Self { order, values }
    }

    /// Number of rows (and columns).
    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[inline]
    pub fn order(&self) -> &[String] {
        &self.order
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.len() + j]
    }

    pub fn row(&self, i: usize) -> &[f64] {
        let n = self.len();
        &self.values[i * n..(i + 1) * n]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks(self.len().max(1))
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.order.iter().position(|o| o == id)
    }
}
