//! A pure Rust engine for exploring sets of small-molecule compounds through
//! structural similarity. It scores fingerprint pairs, groups compounds by a
//! physico-chemical descriptor, and lays the set out as a force-directed
//! similarity network with a convex outline around every group.
//!
//! # Features
//!
//! - **Similarity** — Tanimoto scores over packed binary fingerprints,
//!   computed in parallel, or taken from a precomputed neighbor map
//! - **Similarity matrix** — Aligned to any caller ordering, with a policy
//!   for stored directions that disagree
//! - **Clustering** — One-dimensional k-means over a normalized descriptor
//!   (weight, log P, log D, pKa, TPSA or potency)
//! - **Layout** — Deterministic force simulation with link, many-body,
//!   centering and collision forces, pinning, dragging and cancellation
//! - **Hulls** — Counter-clockwise convex boundary per cluster
//! - **JSON I/O** — Compound records, neighbor maps and analysis output
//!
//! # Quick Start
//!
//! The main entry point is the [`analyze`] function, which takes a compound
//! slice and an [`AnalysisConfig`] and produces an [`Analysis`]:
//!
//! ```
//! use compound_atlas::{AtlasError, Compound, Descriptors};
//! use compound_atlas::{AnalysisConfig, ClusterConfig, analyze};
//!
//! let compound = |id: &str, bits: &str, potency: f64| -> Result<Compound, AtlasError> {
//!     Ok(Compound::new(id)
//!         .with_fingerprint(bits.parse()?)
//!         .with_descriptors(Descriptors { potency: Some(potency), ..Default::default() }))
//! };
//!
//! let compounds = vec![
//!     compound("A", "11110000", 5.1)?,
//!     compound("B", "11100000", 5.3)?,
//!     compound("C", "00001111", 7.9)?,
//!     compound("D", "00011111", 8.2)?,
//! ];
//!
//! let config = AnalysisConfig {
//!     clustering: Some(ClusterConfig::new("potency", 2)?),
//!     ..Default::default()
//! };
//! let analysis = analyze(&compounds, None, &config)?;
//!
//! // A–B (0.75) and C–D (0.8) clear the default threshold of 0.65
//! assert_eq!(analysis.edges.len(), 2);
//!
//! // The matrix follows input order with a unit diagonal
//! assert_eq!(analysis.matrix.order(), &["A", "B", "C", "D"]);
//! assert_eq!(analysis.matrix.get(2, 2), 1.0);
//!
//! // Low- and high-potency compounds land in different clusters
//! let clustering = analysis.clustering.as_ref().unwrap();
//! assert_eq!(clustering.cluster_of("A"), clustering.cluster_of("B"));
//! assert_ne!(clustering.cluster_of("A"), clustering.cluster_of("C"));
//!
//! // Every compound gets a finite position
//! assert!(analysis.nodes.iter().all(|n| n.x.is_finite() && n.y.is_finite()));
//! # Ok::<(), AtlasError>(())
//! ```
//!
//! # Module Organization
//!
//! - [`io`] — JSON readers and writers for compounds, neighbor maps and results
//! - [`compare`] — Lookup and descriptor comparison helpers
//! - [`analyze`] — One-shot analysis pipeline
//! - [`Session`] — Analysis pipeline with versioned caches
//!
//! # Data Types
//!
//! ## Input
//!
//! - [`Compound`] — Identifier, descriptors, optional fingerprint
//! - [`Descriptors`] — Optional numeric descriptors of a compound
//! - [`Fingerprint`] — Fixed-length packed bit vector
//! - [`Feature`] — Descriptor key used for clustering
//! - [`NeighborMap`] — Precomputed per-compound neighbor lists
//!
//! ## Output
//!
//! - [`Analysis`] — Everything one analysis pass produces
//! - [`SimilarityMatrix`] — Square matrix aligned to an ordering
//! - [`SimilarityEdge`] — Unordered compound pair with its score
//! - [`Clustering`] / [`Cluster`] — Descriptor clusters and exclusions
//! - [`LayoutNode`] — Final position, radius and cluster of a compound
//! - [`Hull`] — Boundary polygon of one cluster
//!
//! ## Lower-level building blocks
//!
//! - [`SimilarityIndex`] — Sorted neighbor lists with matrix and edge export
//! - [`Simulation`] — Explicit layout context: tick, run, pin, drag, cancel
//! - [`Node`] / [`Link`] — Layout arena entries
//! - [`similarity`], [`cluster`], [`convex_hull`], [`hulls`], [`step`]
//!
//! ## Configuration
//!
//! - [`AnalysisConfig`] — Main configuration
//! - [`SimilarityConfig`] / [`Reconcile`] — Threshold and direction policy
//! - [`ClusterConfig`] — Feature, cluster count and iteration cap
//! - [`LayoutConfig`] — Canvas, radius range, tick cap, force parameters
//! - [`ForceParams`] — Force strengths and cooling schedule, loadable from TOML

mod engine;
mod model;

pub mod io;

pub use model::analysis::Analysis;
pub use model::compound::{Compound, Descriptors};
pub use model::fingerprint::{Fingerprint, ParseFingerprintError};
pub use model::graph::{Neighbor, NeighborMap, SimilarityEdge, SimilarityMatrix};
pub use model::layout::{Cluster, Clustering, Hull, LayoutNode, Link, Node};
pub use model::types::{Feature, ParseFeatureError};

pub use engine::{
    AnalysisConfig, CenterParams, ChargeParams, ClusterConfig, CollisionParams, CoolingParams,
    DRAG_ALPHA_TARGET, FingerprintSource, ForceParams, LayoutConfig, LinkParams, RadiusScale,
    Reconcile, RunOutcome, Session, SimilarityConfig, SimilarityIndex, Simulation, analyze,
    build_links, build_nodes, cluster, compare, convex_hull, get_default_parameters, hulls,
    layout_nodes, load_parameters, phyllotaxis, similarity, step,
};

pub use engine::Error as AtlasError;
