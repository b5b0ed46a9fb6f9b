use std::collections::HashMap;

use log::{debug, info};

use super::config::{AnalysisConfig, ClusterConfig, Reconcile, SimilarityConfig};
use super::error::Error;
use super::hull::hulls;
use super::index::{FingerprintSource, SimilarityIndex};
use super::layout::build_nodes;
use super::{assemble, build_index, cluster, derive_graph, prepare};
use crate::model::analysis::Analysis;
use crate::model::compound::Compound;
use crate::model::graph::{NeighborMap, SimilarityEdge, SimilarityMatrix};
use crate::model::layout::{Clustering, Hull, Node};
use crate::model::types::Feature;

type GraphKey = (u64, FingerprintSource, Reconcile, u64);
type ClusterKey = (u64, Feature, usize, usize);
type HullKey = (u64, Feature, usize);

/// Long-lived analysis state over one compound set.
///
/// The session tags every derived result with the version of the compound
/// set it came from. Replacing the compounds or the neighbor map bumps the
/// version and drops all caches, including node positions; any other call
/// reuses what is still valid.
///
/// Cached per version: the similarity index per source, the matrix and
/// edge list per source, reconcile policy and threshold, and clusterings per
/// feature, k and iteration cap. Layout positions carry over between
/// [`analyze`](Self::analyze) calls as the starting point of the next run.
#[derive(Debug, Default)]
pub struct Session {
    compounds: Vec<Compound>,
    neighbors: Option<NeighborMap>,
    version: u64,
    indices: HashMap<(u64, FingerprintSource), SimilarityIndex>,
    graphs: HashMap<GraphKey, (SimilarityMatrix, Vec<SimilarityEdge>)>,
    clusterings: HashMap<ClusterKey, Clustering>,
    hulls: HashMap<HullKey, Vec<Hull>>,
    layout: Option<(u64, Vec<Node>)>,
}

impl Session {
    pub fn new(compounds: Vec<Compound>) -> Self {
        Self {
            compounds,
            ..Default::default()
        }
    }

    pub fn with_neighbor_map(mut self, neighbors: NeighborMap) -> Self {
        self.neighbors = Some(neighbors);
        self
    }

    pub fn compounds(&self) -> &[Compound] {
        &self.compounds
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Replaces the compound set and invalidates everything derived from it.
    pub fn set_compounds(&mut self, compounds: Vec<Compound>) {
        self.compounds = compounds;
        self.invalidate();
    }

    /// Replaces (or clears) the precomputed neighbor map.
    pub fn set_neighbor_map(&mut self, neighbors: Option<NeighborMap>) {
        self.neighbors = neighbors;
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.version += 1;
        self.indices.clear();
        self.graphs.clear();
        self.clusterings.clear();
        self.hulls.clear();
        self.layout = None;
        info!("Compound set changed, now at version {}", self.version);
    }

    fn source(&self) -> FingerprintSource {
        if self.neighbors.is_some() {
            FingerprintSource::Precomputed
        } else {
            FingerprintSource::Computed
        }
    }

    /// The similarity index for the current compound set, built on first use.
    pub fn index(&mut self) -> Result<&SimilarityIndex, Error> {
        let key = (self.version, self.source());
        if !self.indices.contains_key(&key) {
            debug!("Building {:?} similarity index for version {}", key.1, key.0);
            let index = build_index(&self.compounds, self.neighbors.as_ref())?;
            self.indices.insert(key, index);
        }
        Ok(&self.indices[&key])
    }

    /// Matrix in input order and edge list for `config`, derived from the
    /// cached index on first use.
    pub fn graph(
        &mut self,
        config: &SimilarityConfig,
    ) -> Result<(&SimilarityMatrix, &[SimilarityEdge]), Error> {
        let source = self.source();
        let key = (self.version, source, config.reconcile, config.threshold.to_bits());
        if !self.graphs.contains_key(&key) {
            self.index()?;
            let index = &self.indices[&(self.version, source)];
            let graph = derive_graph(&self.compounds, index, config)?;
            debug!(
                "Derived {} edges at threshold {} for version {}",
                graph.1.len(),
                config.threshold,
                self.version
            );
            self.graphs.insert(key, graph);
        }
        let (matrix, edges) = &self.graphs[&key];
        Ok((matrix, edges.as_slice()))
    }

    /// The clustering for `config`, computed on first use per feature, k and
    /// iteration cap.
    pub fn clustering(&mut self, config: &ClusterConfig) -> Result<&Clustering, Error> {
        let key = (self.version, config.feature, config.k, config.max_iterations);
        if !self.clusterings.contains_key(&key) {
            debug!("Clustering version {} on {} with k={}", key.0, key.1, key.2);
            let clustering = cluster(&self.compounds, config)?;
            self.clusterings.insert(key, clustering);
        }
        Ok(&self.clusterings[&key])
    }

    /// Hulls from the last analysis for this feature and k, if any.
    pub fn hulls(&self, feature: Feature, k: usize) -> Option<&[Hull]> {
        self.hulls
            .get(&(self.version, feature, k))
            .map(Vec::as_slice)
    }

    /// Node arena of the last layout run on the current compound set.
    pub fn positions(&self) -> Option<&[Node]> {
        match &self.layout {
            Some((version, nodes)) if *version == self.version => Some(nodes),
            _ => None,
        }
    }

    /// Runs the analysis pipeline, reusing cached results where possible.
    ///
    /// The layout starts from the positions of the previous run on the same
    /// compound set, with velocities cleared.
    ///
    /// # Errors
    ///
    /// Same as [`analyze`](super::analyze).
    pub fn analyze(&mut self, config: &AnalysisConfig) -> Result<Analysis, Error> {
        let params = prepare(config)?;

        let clustering = match &config.clustering {
            Some(c) => Some(self.clustering(c)?.clone()),
            None => None,
        };
        let (matrix, edges) = self.graph(&config.similarity)?;
        let graph = (matrix.clone(), edges.to_vec());
        let index = &self.indices[&(self.version, self.source())];

        let mut nodes = build_nodes(&self.compounds, &config.layout);
        if let Some(previous) = self.positions() {
            for (node, old) in nodes.iter_mut().zip(previous) {
                node.x = old.x;
                node.y = old.y;
            }
            debug!("Warm-starting layout from {} cached positions", previous.len());
        }

        let (analysis, nodes) =
            assemble(&self.compounds, index, graph, clustering, nodes, params, config)?;
        self.layout = Some((self.version, nodes));

        // hulls follow the layout, so any earlier set is stale now
        self.hulls.clear();
        if let (Some(c), Some(clustering)) = (&config.clustering, &analysis.clustering) {
            let positions: HashMap<String, [f64; 2]> = analysis
                .nodes
                .iter()
                .map(|n| (n.id.clone(), [n.x, n.y]))
                .collect();
            self.hulls
                .insert((self.version, c.feature, c.k), hulls(clustering, &positions));
        }

        Ok(analysis)
    }
}
