//! Error types for the similarity, clustering and layout engine.
//!
//! Errors are categorized by source: malformed fingerprints or similarity
//! data, invalid configuration, and references to compounds that are not in
//! the analysed set. Missing fingerprints and missing descriptor values are
//! not errors; those compounds are excluded and reported alongside results.

use thiserror::Error;

use crate::model::fingerprint::ParseFingerprintError;
use crate::model::types::ParseFeatureError;

/// Errors that can occur while analysing a compound set.
#[derive(Debug, Error)]
pub enum Error {
    /// Two fingerprints of different bit lengths were compared.
    ///
    /// Indicates malformed input data; fingerprints are never padded or
    /// truncated to make them comparable.
    #[error("fingerprint length mismatch: {left} bits vs {right} bits")]
    LengthMismatch {
        /// Bit length of the first fingerprint.
        left: usize,
        /// Bit length of the second fingerprint.
        right: usize,
    },

    /// A fingerprint string could not be parsed.
    #[error("invalid fingerprint: {0}")]
    InvalidFingerprint(#[from] ParseFingerprintError),

    /// Clustering was requested with zero clusters.
    #[error("cluster count must be at least 1 (got {0})")]
    InvalidClusterCount(usize),

    /// A descriptor name outside the supported set was used.
    #[error(transparent)]
    UnknownFeature(#[from] ParseFeatureError),

    /// A stored similarity is non-finite, outside `[0, 1]`, or disagrees
    /// with the opposite direction under strict reconciliation.
    #[error("invalid similarity {value} between '{source_id}' and '{target_id}'")]
    InvalidSimilarity {
        /// Compound owning the neighbor list.
        source_id: String,
        /// Neighbor compound.
        target_id: String,
        /// Offending value.
        value: f64,
    },

    /// The same identifier appears twice in a compound set or ordering.
    #[error("duplicate compound identifier '{0}'")]
    DuplicateCompound(String),

    /// An identifier does not name a compound in the analysed set.
    #[error("unknown compound '{0}'")]
    UnknownCompound(String),

    /// A layout node index is outside the simulation arena.
    #[error("node index {index} out of range for {len} nodes")]
    NodeOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of nodes in the arena.
        len: usize,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to parse layout force parameters TOML.
    #[error("failed to parse layout parameters: {0}")]
    ParameterParse(#[from] toml::de::Error),
}

impl Error {
    /// Creates a [`LengthMismatch`](Error::LengthMismatch) error.
    pub fn length_mismatch(left: usize, right: usize) -> Self {
        Self::LengthMismatch { left, right }
    }

    /// Creates an [`InvalidSimilarity`](Error::InvalidSimilarity) error.
    ///
    /// # Arguments
    ///
    /// * `source_id` — Compound owning the neighbor list
    /// * `target_id` — Neighbor compound
    /// * `value` — The rejected similarity value
    pub fn invalid_similarity(
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        value: f64,
    ) -> Self {
        Self::InvalidSimilarity {
            source_id: source_id.into(),
            target_id: target_id.into(),
            value,
        }
    }

    /// Creates an [`InvalidConfig`](Error::InvalidConfig) error.
    pub fn invalid_config(details: impl Into<String>) -> Self {
        Self::InvalidConfig(details.into())
    }
}
