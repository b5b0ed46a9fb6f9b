use super::graph::{SimilarityEdge, SimilarityMatrix};
use super::layout::{Clustering, Hull, LayoutNode};

/// Everything one analysis pass produces for the rendering layer.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub matrix: SimilarityMatrix,
    pub edges: Vec<SimilarityEdge>,
    pub clustering: Option<Clustering>,
    pub nodes: Vec<LayoutNode>,
    pub hulls: Vec<Hull>,
    /// Compounds left out of fingerprint similarity.
    pub unfingerprinted: Vec<String>,
    pub ticks: usize,
    pub settled: bool,
}

impl Analysis {
    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}
