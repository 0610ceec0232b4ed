// Acoustic feature map types
// Scalar features keyed by name, shared between the extractor and the scorers

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Recognized acoustic feature keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureKey {
    /// Mean frame RMS energy (>= 0)
    RmsEnergy,

    /// Mean frame spectral centroid in Hz (>= 0)
    SpectralCentroid,

    /// Mean frame zero-crossing rate, fraction in [0, 1]
    Zcr,

    /// Recording length in seconds (>= 0)
    /// Only present when the extractor is configured to measure it
    Duration,
}

impl FeatureKey {
    pub const ALL: [FeatureKey; 4] = [
        FeatureKey::RmsEnergy,
        FeatureKey::SpectralCentroid,
        FeatureKey::Zcr,
        FeatureKey::Duration,
    ];

    /// Stable string name used in the feature map and its JSON form
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureKey::RmsEnergy => "rms_energy",
            FeatureKey::SpectralCentroid => "spectral_centroid",
            FeatureKey::Zcr => "zcr",
            FeatureKey::Duration => "duration",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == name)
    }
}

/// Map from feature name to a scalar measurement
///
/// An absent key means "not measured", which is distinct from a measured
/// zero. Use [`AudioFeatures::get`] where that distinction matters and
/// [`AudioFeatures::get_or`] where a consumer deliberately substitutes a
/// default for a missing value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AudioFeatures(BTreeMap<String, f64>);

impl AudioFeatures {
    /// Create an empty feature map
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: FeatureKey, value: f64) {
        self.0.insert(key.as_str().to_string(), value);
    }

    /// Builder-style insert
    pub fn with(mut self, key: FeatureKey, value: f64) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: FeatureKey) -> Option<f64> {
        self.0.get(key.as_str()).copied()
    }

    pub fn get_or(&self, key: FeatureKey, default: f64) -> f64 {
        self.get(key).unwrap_or(default)
    }

    pub fn contains(&self, key: FeatureKey) -> bool {
        self.0.contains_key(key.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<(FeatureKey, f64)> for AudioFeatures {
    fn from_iter<I: IntoIterator<Item = (FeatureKey, f64)>>(iter: I) -> Self {
        let mut features = AudioFeatures::new();
        for (key, value) in iter {
            features.insert(key, value);
        }
        features
    }
}
