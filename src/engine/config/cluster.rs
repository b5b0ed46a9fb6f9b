//! Descriptor clustering configuration.

use crate::engine::error::Error;
use crate::model::types::Feature;

/// Settings for one-dimensional k-means over a descriptor.
///
/// # Examples
///
/// ```
/// use compound_atlas::{ClusterConfig, Feature};
///
/// let config = ClusterConfig::new("tpsa", 3)?;
/// assert_eq!(config.feature, Feature::Tpsa);
///
/// // Unknown keys and empty partitions are refused up front
/// assert!(ClusterConfig::new("colour", 3).is_err());
/// assert!(ClusterConfig::new("tpsa", 0).is_err());
/// # Ok::<(), compound_atlas::AtlasError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterConfig {
    /// Descriptor the compounds are partitioned along.
    pub feature: Feature,

    /// Number of clusters. Must be at least 1.
    pub k: usize,

    /// Upper bound on assignment/update rounds. Default is `50`.
    pub max_iterations: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            feature: Feature::Potency,
            k: 5,
            max_iterations: 50,
        }
    }
}

impl ClusterConfig {
    /// Builds a configuration from a feature name, validating both inputs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownFeature`] for a name outside the supported
    /// descriptor set and [`Error::InvalidClusterCount`] when `k == 0`.
    pub fn new(feature: &str, k: usize) -> Result<Self, Error> {
        let config = Self {
            feature: feature.parse()?,
            k,
            ..Default::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.k == 0 {
            return Err(Error::InvalidClusterCount(self.k));
        }
        if self.max_iterations == 0 {
            return Err(Error::invalid_config(
                "clustering needs at least one iteration",
            ));
        }
        Ok(())
    }
}
