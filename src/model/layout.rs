use std::collections::HashMap;

use super::types::Feature;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    pub id: usize,
    pub members: Vec<String>,
}

/// Partition of the compounds that carry a value for the clustering feature.
///
/// Compounds without that value appear in [`excluded`](Self::excluded) and
/// have no entry in [`assignments`](Self::assignments).
#[derive(Debug, Clone, PartialEq)]
pub struct Clustering {
    pub feature: Feature,
    pub k: usize,
    pub clusters: Vec<Cluster>,
    pub assignments: HashMap<String, usize>,
    pub excluded: Vec<String>,
    pub iterations: usize,
    /// Whether a round left every assignment unchanged before the cap.
    pub converged: bool,
}

impl Clustering {
    #[inline]
    pub fn cluster_of(&self, id: &str) -> Option<usize> {
        self.assignments.get(id).copied()
    }

    /// Member counts per cluster id.
    pub fn sizes(&self) -> Vec<usize> {
        self.clusters.iter().map(|c| c.members.len()).collect()
    }
}

/// Layout-time state of one compound.
///
/// `compound` indexes the caller's compound slice; nodes never hold the
/// compound itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub compound: usize,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub radius: f64,
    pub pinned: Option<[f64; 2]>,
}

impl Node {
    pub fn new(compound: usize, position: [f64; 2], radius: f64) -> Self {
        Self {
            compound,
            x: position[0],
            y: position[1],
            vx: 0.0,
            vy: 0.0,
            radius,
            pinned: None,
        }
    }

    #[inline]
    pub fn position(&self) -> [f64; 2] {
        [self.x, self.y]
    }

    #[inline]
    pub fn is_pinned(&self) -> bool {
        self.pinned.is_some()
    }
}

/// A layout edge between two nodes of the arena, addressed by index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub source: usize,
    pub target: usize,
    pub similarity: f64,
}

/// Boundary polygon of one cluster, counter-clockwise in a y-up frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Hull {
    pub cluster: usize,
    pub points: Vec<[f64; 2]>,
}

/// Final per-node output of a layout run.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub cluster: Option<usize>,
}
