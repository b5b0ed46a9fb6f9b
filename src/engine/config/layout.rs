//! Force-directed layout configuration.

use crate::engine::error::Error;

/// Canvas and simulation settings for the similarity layout.
///
/// Force strengths live in a TOML document (see
/// `resources/default.layout.toml`); `params` replaces the embedded defaults
/// with a custom document.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Canvas width in pixels. Default is `800`.
    pub width: f64,

    /// Canvas height in pixels. Default is `600`.
    pub height: f64,

    /// Node radius range `[min, max]` in pixels, mapped from the square root
    /// of molecular weight. Default is `[8, 25]`.
    pub radius_range: [f64; 2],

    /// Hard cap on simulation ticks. Default is `300`.
    pub max_ticks: usize,

    /// Custom force parameters in TOML format.
    ///
    /// If `None`, uses the embedded `default.layout.toml`.
    pub params: Option<String>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            radius_range: [8.0, 25.0],
            max_ticks: 300,
            params: None,
        }
    }
}

impl LayoutConfig {
    #[inline]
    pub fn center(&self) -> [f64; 2] {
        [self.width / 2.0, self.height / 2.0]
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(Error::invalid_config("canvas size must be positive"));
        }
        let [min, max] = self.radius_range;
        if !(min > 0.0 && min <= max && max.is_finite()) {
            return Err(Error::invalid_config(format!(
                "radius range must satisfy 0 < min <= max (got [{min}, {max}])"
            )));
        }
        Ok(())
    }
}
