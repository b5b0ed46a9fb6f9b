use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::compound::Descriptors;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown descriptor feature: '{0}'")]
pub struct ParseFeatureError(String);

/// Numeric descriptor keys that can drive clustering or node sizing.
///
/// Each variant maps to exactly one typed field of [`Descriptors`], so an
/// unknown key is rejected when it is parsed instead of silently yielding
/// missing values later on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Feature {
    Weight,
    LogP,
    LogD,
    Pka,
    Tpsa,
    Potency,
}

impl Feature {
    pub const ALL: [Feature; 6] = [
        Feature::Weight,
        Feature::LogP,
        Feature::LogD,
        Feature::Pka,
        Feature::Tpsa,
        Feature::Potency,
    ];

    /// Canonical snake_case key, as used in compound data files.
    pub fn key(self) -> &'static str {
        match self {
            Feature::Weight => "weight",
            Feature::LogP => "log_p",
            Feature::LogD => "log_d",
            Feature::Pka => "pka",
            Feature::Tpsa => "tpsa",
            Feature::Potency => "potency",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Feature::Weight => "Weight",
            Feature::LogP => "Log P",
            Feature::LogD => "Log D",
            Feature::Pka => "pKa",
            Feature::Tpsa => "TPSA",
            Feature::Potency => "Potency",
        }
    }

    /// Typed accessor for this feature's field.
    pub fn accessor(self) -> fn(&Descriptors) -> Option<f64> {
        match self {
            Feature::Weight => |d: &Descriptors| d.weight,
            Feature::LogP => |d: &Descriptors| d.log_p,
            Feature::LogD => |d: &Descriptors| d.log_d,
            Feature::Pka => |d: &Descriptors| d.pka,
            Feature::Tpsa => |d: &Descriptors| d.tpsa,
            Feature::Potency => |d: &Descriptors| d.potency,
        }
    }

    /// Reads this feature from `descriptors`, treating non-finite values as missing.
    #[inline]
    pub fn value_of(self, descriptors: &Descriptors) -> Option<f64> {
        (self.accessor())(descriptors).filter(|v| v.is_finite())
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Feature {
    type Err = ParseFeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weight" | "mw" => Ok(Feature::Weight),
            "log_p" | "logp" | "log p" => Ok(Feature::LogP),
            "log_d" | "logd" | "log d" => Ok(Feature::LogD),
            "pka" => Ok(Feature::Pka),
            "tpsa" => Ok(Feature::Tpsa),
            "potency" | "pec50" => Ok(Feature::Potency),
            _ => Err(ParseFeatureError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_canonical_keys() {
        for feature in Feature::ALL {
            assert_eq!(Feature::from_str(feature.key()).unwrap(), feature);
        }
    }

    #[test]
    fn parse_aliases_case_insensitive() {
        assert_eq!(Feature::from_str("LogP").unwrap(), Feature::LogP);
        assert_eq!(Feature::from_str(" MW ").unwrap(), Feature::Weight);
        assert_eq!(Feature::from_str("pEC50").unwrap(), Feature::Potency);
    }

    #[test]
    fn parse_unknown_is_rejected() {
        let err = Feature::from_str("boiling_point").unwrap_err();
        assert_eq!(err.to_string(), "unknown descriptor feature: 'boiling_point'");
    }

    #[test]
    fn accessor_reads_matching_field() {
        let d = Descriptors {
            weight: Some(310.4),
            tpsa: Some(f64::NAN),
            pka: Some(7.2),
            ..Default::default()
        };
        assert_eq!(Feature::Weight.value_of(&d), Some(310.4));
        assert_eq!(Feature::Pka.value_of(&d), Some(7.2));
        assert_eq!(Feature::Tpsa.value_of(&d), None);
        assert_eq!(Feature::LogD.value_of(&d), None);
    }

    #[test]
    fn display_uses_key() {
        assert_eq!(Feature::LogD.to_string(), "log_d");
        assert_eq!(Feature::Tpsa.label(), "TPSA");
    }
}
