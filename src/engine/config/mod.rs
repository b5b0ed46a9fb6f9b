//! Configuration types for a compound-set analysis.
//!
//! This module defines the structures controlling the behavior of the
//! [`analyze`](super::analyze) function and of a [`Session`](super::Session).
//!
//! # Overview
//!
//! - [`AnalysisConfig`] — Main configuration struct
//! - [`SimilarityConfig`] — Edge threshold and direction reconciliation
//! - [`Reconcile`] — Policy for opposite-direction stored similarities
//! - [`ClusterConfig`] — Clustering feature, cluster count and iteration cap
//! - [`LayoutConfig`] — Canvas size, node radius range and force parameters

mod cluster;
mod layout;
mod similarity;

pub use cluster::ClusterConfig;
pub use layout::LayoutConfig;
pub use similarity::{Reconcile, SimilarityConfig};

/// Main configuration for a full analysis pass.
///
/// # Examples
///
/// ```
/// use compound_atlas::{AnalysisConfig, ClusterConfig, SimilarityConfig};
///
/// // Similarity graph and layout only, no clustering
/// let default = AnalysisConfig::default();
/// assert!(default.clustering.is_none());
///
/// // Cluster on log P into four groups with a stricter edge threshold
/// let custom = AnalysisConfig {
///     similarity: SimilarityConfig { threshold: 0.8, ..Default::default() },
///     clustering: Some(ClusterConfig::new("log_p", 4)?),
///     ..Default::default()
/// };
/// # Ok::<(), compound_atlas::AtlasError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct AnalysisConfig {
    /// Similarity graph construction settings.
    pub similarity: SimilarityConfig,

    /// Descriptor clustering; `None` disables clustering and hulls.
    pub clustering: Option<ClusterConfig>,

    /// Force-directed layout settings.
    pub layout: LayoutConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::Feature;

    #[test]
    fn default_config_values() {
        let config = AnalysisConfig::default();
        assert_eq!(config.similarity.threshold, 0.65);
        assert_eq!(config.similarity.reconcile, Reconcile::Average);
        assert!(config.clustering.is_none());
        assert_eq!(config.layout.width, 800.0);
        assert_eq!(config.layout.height, 600.0);
    }

    #[test]
    fn cluster_config_default_feature() {
        let c = ClusterConfig::default();
        assert_eq!(c.feature, Feature::Potency);
        assert_eq!(c.k, 5);
        assert_eq!(c.max_iterations, 50);
    }
}
