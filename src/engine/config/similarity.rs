//! Similarity graph configuration.

use crate::engine::error::Error;

/// How two stored values for the same pair, one per direction, combine
/// into a single matrix cell or edge weight.
///
/// Similarities computed from fingerprints are symmetric by construction;
/// this only matters for precomputed neighbor maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Reconcile {
    /// Mean of both directions.
    #[default]
    Average,

    /// Row compound's own list wins; the opposite direction is a fallback.
    PreferForward,

    /// Directions must agree within `1e-9`, otherwise the pair is rejected.
    Strict,
}

/// Similarity graph settings.
#[derive(Debug, Clone)]
pub struct SimilarityConfig {
    /// Minimum similarity for a pair to become a layout edge.
    ///
    /// Default is `0.65`.
    pub threshold: f64,

    /// Direction reconciliation policy.
    pub reconcile: Reconcile,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            threshold: 0.65,
            reconcile: Reconcile::default(),
        }
    }
}

impl SimilarityConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(Error::invalid_config(format!(
                "similarity threshold must lie in [0, 1] (got {})",
                self.threshold
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_range_is_checked() {
        assert!(SimilarityConfig::default().validate().is_ok());
        let bad = SimilarityConfig {
            threshold: 1.2,
            ..Default::default()
        };
        assert!(matches!(bad.validate(), Err(Error::InvalidConfig(_))));
    }
}
