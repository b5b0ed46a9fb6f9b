use super::fingerprint::Fingerprint;
use super::types::Feature;

/// Named numeric descriptors of a compound.
///
/// Any descriptor may be missing; consumers read them through
/// [`Feature::value_of`], which also discards non-finite values.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Descriptors {
    pub weight: Option<f64>,
    pub log_p: Option<f64>,
    pub log_d: Option<f64>,
    pub pka: Option<f64>,
    pub tpsa: Option<f64>,
    pub potency: Option<f64>,
}

impl Descriptors {
    #[inline]
    pub fn get(&self, feature: Feature) -> Option<f64> {
        feature.value_of(self)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Compound {
    pub id: String,
    pub name: String,
    pub row: Option<u64>,
    pub descriptors: Descriptors,
    pub fingerprint: Option<Fingerprint>,
    pub smiles: Option<String>,
}

impl Compound {
    /// Creates a compound whose display name equals its identifier.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            ..Default::default()
        }
    }

    pub fn with_descriptors(mut self, descriptors: Descriptors) -> Self {
        self.descriptors = descriptors;
        self
    }

    pub fn with_fingerprint(mut self, fingerprint: Fingerprint) -> Self {
        self.fingerprint = Some(fingerprint);
        self
    }

    #[inline]
    pub fn has_fingerprint(&self) -> bool {
        self.fingerprint.is_some()
    }

    #[inline]
    pub fn descriptor(&self, feature: Feature) -> Option<f64> {
        self.descriptors.get(feature)
    }
}
