use std::io::Write;

use serde::Serialize;

use super::{Document, Error};
use crate::model::analysis::Analysis;
use crate::model::graph::SimilarityMatrix;

#[derive(Serialize)]
struct AnalysisOutput<'a> {
    nodes: Vec<NodeOutput<'a>>,
    edges: Vec<EdgeOutput<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    feature: Option<&'static str>,
    clusters: Vec<ClusterOutput<'a>>,
    hulls: Vec<HullOutput<'a>>,
    matrix: MatrixOutput<'a>,
    excluded: ExclusionCounts,
    ticks: usize,
    settled: bool,
}

#[derive(Serialize)]
struct NodeOutput<'a> {
    id: &'a str,
    x: f64,
    y: f64,
    radius: f64,
    cluster: Option<usize>,
}

#[derive(Serialize)]
struct EdgeOutput<'a> {
    source: &'a str,
    target: &'a str,
    similarity: f64,
}

#[derive(Serialize)]
struct ClusterOutput<'a> {
    id: usize,
    members: &'a [String],
}

#[derive(Serialize)]
struct HullOutput<'a> {
    cluster: usize,
    points: &'a [[f64; 2]],
}

#[derive(Serialize)]
struct MatrixOutput<'a> {
    order: &'a [String],
    values: Vec<&'a [f64]>,
}

#[derive(Serialize)]
struct ExclusionCounts {
    similarity: usize,
    clustering: usize,
}

impl<'a> From<&'a SimilarityMatrix> for MatrixOutput<'a> {
    fn from(matrix: &'a SimilarityMatrix) -> Self {
        Self {
            order: matrix.order(),
            values: matrix.rows().collect(),
        }
    }
}

impl<'a> From<&'a Analysis> for AnalysisOutput<'a> {
    fn from(analysis: &'a Analysis) -> Self {
        let clustering = analysis.clustering.as_ref();
        Self {
            nodes: analysis
                .nodes
                .iter()
                .map(|n| NodeOutput {
                    id: &n.id,
                    x: n.x,
                    y: n.y,
                    radius: n.radius,
                    cluster: n.cluster,
                })
                .collect(),
            edges: analysis
                .edges
                .iter()
                .map(|e| EdgeOutput {
                    source: &e.source,
                    target: &e.target,
                    similarity: e.similarity,
                })
                .collect(),
            feature: clustering.map(|c| c.feature.key()),
            clusters: clustering
                .map(|c| {
                    c.clusters
                        .iter()
                        .map(|cl| ClusterOutput {
                            id: cl.id,
                            members: &cl.members,
                        })
                        .collect()
                })
                .unwrap_or_default(),
            hulls: analysis
                .hulls
                .iter()
                .map(|h| HullOutput {
                    cluster: h.cluster,
                    points: &h.points,
                })
                .collect(),
            matrix: MatrixOutput::from(&analysis.matrix),
            excluded: ExclusionCounts {
                similarity: analysis.unfingerprinted.len(),
                clustering: clustering.map_or(0, |c| c.excluded.len()),
            },
            ticks: analysis.ticks,
            settled: analysis.settled,
        }
    }
}

/// Writes the full analysis result as pretty-printed JSON.
pub fn write_analysis<W: Write>(writer: W, analysis: &Analysis) -> Result<(), Error> {
    serde_json::to_writer_pretty(writer, &AnalysisOutput::from(analysis))
        .map_err(|e| Error::json(Document::Analysis, e))
}

/// Writes a similarity matrix as `{order, values}` with one row per array.
pub fn write_matrix<W: Write>(writer: W, matrix: &SimilarityMatrix) -> Result<(), Error> {
    serde_json::to_writer_pretty(writer, &MatrixOutput::from(matrix))
        .map_err(|e| Error::json(Document::Matrix, e))
}
