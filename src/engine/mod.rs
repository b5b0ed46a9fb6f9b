//! Analysis engine: similarity, clustering, layout and hulls.
//!
//! [`analyze`] runs the whole pipeline once over a compound set. A
//! [`Session`] runs the same pipeline but keeps its intermediate results
//! between calls.
//!
//! # Pipeline
//!
//! 1. **Similarity index** — from fingerprints or a precomputed neighbor map
//! 2. **Matrix** — aligned to the input compound order
//! 3. **Edges** — unique pairs at or above the threshold
//! 4. **Clustering** — optional 1-D k-means over one descriptor
//! 5. **Layout** — force-directed placement until the layout settles
//! 6. **Hulls** — convex outline of every cluster with three or more nodes

pub mod compare;
mod cluster;
mod config;
mod error;
mod hull;
mod index;
mod layout;
mod params;
mod session;
mod similarity;

use std::collections::HashMap;

use log::{debug, info};

use crate::model::analysis::Analysis;
use crate::model::compound::Compound;
use crate::model::graph::{NeighborMap, SimilarityEdge, SimilarityMatrix};
use crate::model::layout::{Clustering, Node};

pub use cluster::cluster;
pub use config::{AnalysisConfig, ClusterConfig, LayoutConfig, Reconcile, SimilarityConfig};
pub use error::Error;
pub use hull::{convex_hull, hulls};
pub use index::{FingerprintSource, SimilarityIndex};
pub use layout::{
    DRAG_ALPHA_TARGET, RadiusScale, RunOutcome, Simulation, build_links, build_nodes,
    layout_nodes, phyllotaxis, step,
};
pub use params::{
    CenterParams, ChargeParams, CollisionParams, CoolingParams, ForceParams, LinkParams,
    get_default_parameters, load_parameters,
};
pub use session::Session;
pub use similarity::similarity;

/// Runs the full analysis pipeline over a compound set.
///
/// When `neighbors` is given its lists are used as the similarity source
/// and fingerprints are ignored; otherwise similarities are computed from
/// the compounds' fingerprints.
///
/// # Errors
///
/// Returns an error if the configuration or force parameters are invalid,
/// identifiers repeat, fingerprints differ in length, or the neighbor map
/// holds an out-of-range similarity.
pub fn analyze(
    compounds: &[Compound],
    neighbors: Option<&NeighborMap>,
    config: &AnalysisConfig,
) -> Result<Analysis, Error> {
    let params = prepare(config)?;
    info!("Analysing {} compounds", compounds.len());

    let index = build_index(compounds, neighbors)?;
    let clustering = config
        .clustering
        .as_ref()
        .map(|c| cluster(compounds, c))
        .transpose()?;
    let nodes = build_nodes(compounds, &config.layout);

    let graph = derive_graph(compounds, &index, &config.similarity)?;
    let (analysis, _) = assemble(compounds, &index, graph, clustering, nodes, params, config)?;
    Ok(analysis)
}

fn prepare(config: &AnalysisConfig) -> Result<ForceParams, Error> {
    config.similarity.validate()?;
    if let Some(c) = &config.clustering {
        c.validate()?;
    }
    config.layout.validate()?;
    load_parameters(config.layout.params.as_deref())
}

fn build_index(
    compounds: &[Compound],
    neighbors: Option<&NeighborMap>,
) -> Result<SimilarityIndex, Error> {
    match neighbors {
        Some(map) => SimilarityIndex::from_neighbor_map(compounds, map),
        None => SimilarityIndex::from_fingerprints(compounds),
    }
}

/// Similarity matrix in input order and the thresholded edge list.
fn derive_graph(
    compounds: &[Compound],
    index: &SimilarityIndex,
    config: &SimilarityConfig,
) -> Result<(SimilarityMatrix, Vec<SimilarityEdge>), Error> {
    let order: Vec<&str> = compounds.iter().map(|c| c.id.as_str()).collect();
    let matrix = index.matrix(&order, config.reconcile)?;
    let edges = index.edges(config.threshold, config.reconcile)?;
    Ok((matrix, edges))
}

/// Layout and hulls over an existing index, graph and clustering.
///
/// Returns the final node arena alongside the analysis so callers can keep
/// positions for the next run.
fn assemble(
    compounds: &[Compound],
    index: &SimilarityIndex,
    (matrix, edges): (SimilarityMatrix, Vec<SimilarityEdge>),
    clustering: Option<Clustering>,
    nodes: Vec<Node>,
    params: ForceParams,
    config: &AnalysisConfig,
) -> Result<(Analysis, Vec<Node>), Error> {
    let links = build_links(compounds, &edges, config.similarity.threshold)?;
    debug!("Layout with {} nodes and {} links", nodes.len(), links.len());

    let mut simulation = Simulation::new(nodes, links, params, &config.layout);
    let outcome = simulation.run();
    let ticks = simulation.ticks();
    let nodes = simulation.into_nodes();

    let layout = layout_nodes(compounds, &nodes, clustering.as_ref());
    let hulls = match &clustering {
        Some(c) => {
            let positions: HashMap<String, [f64; 2]> =
                layout.iter().map(|n| (n.id.clone(), [n.x, n.y])).collect();
            hulls(c, &positions)
        }
        None => Vec::new(),
    };

    let analysis = Analysis {
        matrix,
        edges,
        clustering,
        nodes: layout,
        hulls,
        unfingerprinted: index.excluded().to_vec(),
        ticks,
        settled: outcome == RunOutcome::Settled,
    };
    Ok((analysis, nodes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::compound::Descriptors;
    use crate::model::graph::Neighbor;

    fn compound(id: &str, bits: &str, potency: f64) -> Compound {
        Compound::new(id)
            .with_fingerprint(bits.parse().unwrap())
            .with_descriptors(Descriptors {
                potency: Some(potency),
                weight: Some(250.0 + potency * 10.0),
                ..Default::default()
            })
    }

    #[test]
    fn analysis_covers_every_compound() {
        let compounds = vec![
            compound("A", "11110000", 5.0),
            compound("B", "11100000", 5.2),
            compound("C", "00001111", 8.0),
            Compound::new("D"),
        ];
        let config = AnalysisConfig {
            clustering: Some(ClusterConfig {
                k: 2,
                ..Default::default()
            }),
            ..Default::default()
        };
        let analysis = analyze(&compounds, None, &config).unwrap();

        assert_eq!(analysis.matrix.order(), &["A", "B", "C", "D"]);
        assert_eq!(analysis.nodes.len(), 4);
        assert_eq!(analysis.unfingerprinted, vec!["D".to_string()]);
        assert_eq!(analysis.edges.len(), 1);
        assert!((analysis.edges[0].similarity - 0.75).abs() < 1e-12);

        let clustering = analysis.clustering.as_ref().unwrap();
        assert_eq!(clustering.excluded, vec!["D".to_string()]);
        assert_eq!(analysis.node("C").unwrap().cluster, Some(1));
        assert_eq!(analysis.node("D").unwrap().cluster, None);
        assert!(analysis.hulls.is_empty());
        assert!(analysis.ticks <= 300);
    }

    #[test]
    fn precomputed_neighbors_replace_fingerprints() {
        let compounds = vec![Compound::new("A"), Compound::new("B")];
        let map = NeighborMap::from([
            ("A".to_string(), vec![Neighbor::new("B", 0.9)]),
            ("B".to_string(), vec![Neighbor::new("A", 0.7)]),
        ]);
        let analysis = analyze(&compounds, Some(&map), &AnalysisConfig::default()).unwrap();
        assert!((analysis.matrix.get(0, 1) - 0.8).abs() < 1e-12);
        assert!((analysis.matrix.get(1, 0) - 0.8).abs() < 1e-12);
        assert_eq!(analysis.edges.len(), 1);
        assert!(analysis.unfingerprinted.is_empty());
    }

    #[test]
    fn invalid_threshold_is_rejected() {
        let config = AnalysisConfig {
            similarity: SimilarityConfig {
                threshold: 1.5,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            analyze(&[], None, &config),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn fingerprint_length_mismatch_fails() {
        let compounds = vec![compound("A", "1100", 5.0), compound("B", "110000", 5.0)];
        let err = analyze(&compounds, None, &AnalysisConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::LengthMismatch { left: 4, right: 6 } | Error::LengthMismatch { left: 6, right: 4 }
        ));
    }
}
