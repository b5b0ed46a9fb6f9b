//! Force-directed placement of compounds on a 2-D canvas.
//!
//! Nodes live in an arena indexed by position in the caller's compound
//! slice; links refer to nodes by index. [`force::step`] is a pure tick
//! function and [`Simulation`] owns the cooling schedule around it.

mod force;
mod grid;
mod seed;
mod simulation;

use std::collections::{HashMap, HashSet};

use log::warn;

use super::config::LayoutConfig;
use super::error::Error;
use crate::model::compound::Compound;
use crate::model::graph::SimilarityEdge;
use crate::model::layout::{Clustering, LayoutNode, Link, Node};
use crate::model::types::Feature;

pub use force::step;
pub use seed::{RadiusScale, phyllotaxis};
pub use simulation::{DRAG_ALPHA_TARGET, RunOutcome, Simulation};

/// Creates one node per compound, seeded on a phyllotaxis spiral around the
/// canvas center and sized by molecular weight.
pub fn build_nodes(compounds: &[Compound], config: &LayoutConfig) -> Vec<Node> {
    let scale = RadiusScale::fit(compounds, config.radius_range);
    let center = config.center();
    compounds
        .iter()
        .enumerate()
        .map(|(i, compound)| {
            let radius = scale.radius(compound.descriptor(Feature::Weight));
            Node::new(i, phyllotaxis(i, center), radius)
        })
        .collect()
}

/// Converts similarity edges at or above `threshold` into index links.
///
/// Self-pairs are ignored and each unordered pair yields at most one link.
pub fn build_links(
    compounds: &[Compound],
    edges: &[SimilarityEdge],
    threshold: f64,
) -> Result<Vec<Link>, Error> {
    let index: HashMap<&str, usize> = compounds
        .iter()
        .enumerate()
        .map(|(i, c)| (c.id.as_str(), i))
        .collect();
    let lookup = |id: &str| {
        index
            .get(id)
            .copied()
            .ok_or_else(|| Error::UnknownCompound(id.to_string()))
    };

    let mut seen = HashSet::new();
    let mut links = Vec::new();
    for edge in edges.iter().filter(|e| e.similarity >= threshold) {
        let (s, t) = (lookup(&edge.source)?, lookup(&edge.target)?);
        if s == t {
            warn!("Ignoring self-edge on '{}'", edge.source);
            continue;
        }
        if seen.insert((s.min(t), s.max(t))) {
            links.push(Link {
                source: s.min(t),
                target: s.max(t),
                similarity: edge.similarity,
            });
        }
    }
    Ok(links)
}

/// Pairs final node positions with compound ids and cluster assignments.
pub fn layout_nodes(
    compounds: &[Compound],
    nodes: &[Node],
    clustering: Option<&Clustering>,
) -> Vec<LayoutNode> {
    nodes
        .iter()
        .filter_map(|node| {
            let compound = compounds.get(node.compound)?;
            Some(LayoutNode {
                id: compound.id.clone(),
                x: node.x,
                y: node.y,
                radius: node.radius,
                cluster: clustering.and_then(|c| c.cluster_of(&compound.id)),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::compound::Descriptors;

    fn compounds() -> Vec<Compound> {
        ["A", "B", "C"]
            .iter()
            .enumerate()
            .map(|(i, id)| {
                Compound::new(*id).with_descriptors(Descriptors {
                    weight: Some(100.0 * (i + 1) as f64),
                    ..Default::default()
                })
            })
            .collect()
    }

    #[test]
    fn nodes_follow_compound_order() {
        let compounds = compounds();
        let nodes = build_nodes(&compounds, &LayoutConfig::default());
        assert_eq!(nodes.len(), 3);
        for (i, node) in nodes.iter().enumerate() {
            assert_eq!(node.compound, i);
            assert!(node.radius >= 8.0 && node.radius <= 25.0);
        }
        assert_eq!(nodes[0].radius, 8.0);
        assert_eq!(nodes[2].radius, 25.0);
    }

    #[test]
    fn links_are_thresholded_and_deduplicated() {
        let compounds = compounds();
        let edges = vec![
            SimilarityEdge::new("A", "B", 0.8),
            SimilarityEdge::new("B", "A", 0.8),
            SimilarityEdge::new("A", "C", 0.5),
            SimilarityEdge::new("C", "C", 1.0),
        ];
        let links = build_links(&compounds, &edges, 0.65).unwrap();
        assert_eq!(
            links,
            vec![Link {
                source: 0,
                target: 1,
                similarity: 0.8
            }]
        );
    }

    #[test]
    fn unknown_edge_endpoint_is_an_error() {
        let edges = vec![SimilarityEdge::new("A", "Z", 0.9)];
        let err = build_links(&compounds(), &edges, 0.65).unwrap_err();
        assert!(matches!(err, Error::UnknownCompound(id) if id == "Z"));
    }

    #[test]
    fn layout_nodes_carry_cluster() {
        let compounds = compounds();
        let nodes = build_nodes(&compounds, &LayoutConfig::default());
        let clustering = Clustering {
            feature: Feature::Weight,
            k: 1,
            clusters: Vec::new(),
            assignments: HashMap::from([("B".to_string(), 0)]),
            excluded: Vec::new(),
            iterations: 1,
            converged: true,
        };
        let out = layout_nodes(&compounds, &nodes, Some(&clustering));
        assert_eq!(out[0].cluster, None);
        assert_eq!(out[1].cluster, Some(0));
        assert_eq!(out[1].id, "B");
    }
}
