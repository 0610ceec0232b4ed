// Prosody analyzer
// Threshold rules on rate, volume and articulation that produce coaching hints

use serde::{Deserialize, Serialize};

use crate::audio::{AudioFeatures, FeatureKey};
use crate::scoring::text::char_len;

/// A single coaching hint triggered by one acoustic signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProsodyHint {
    /// Utterance took much longer than the expected duration
    SpeakFaster,

    /// Utterance was much shorter than the expected duration
    SlowDown,

    /// Mean RMS energy below the quiet threshold
    MoreVolume,

    /// Mean RMS energy above the loud threshold
    ModerateVolume,

    /// High zero-crossing rate, noisy or hissing consonants
    Articulation,
}

impl ProsodyHint {
    /// Human-readable hint for display
    pub fn message(&self) -> &'static str {
        match self {
            ProsodyHint::SpeakFaster => "Try speaking a bit faster for more natural rhythm",
            ProsodyHint::SlowDown => "Slow down slightly to improve clarity and enunciation",
            ProsodyHint::MoreVolume => "Speak with more volume and confidence",
            ProsodyHint::ModerateVolume => "Try to moderate your volume slightly",
            ProsodyHint::Articulation => "Focus on clear articulation of consonants",
        }
    }
}

/// Thresholds for prosody hints
/// Independent of the scorer's pacing bands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProsodyConfig {
    /// Empirical speaking rate used to estimate expected duration
    pub chars_per_second: f64,

    /// Actual above expected * this suggests speaking faster
    pub slow_factor: f64,

    /// Actual below expected * this suggests slowing down
    pub fast_factor: f64,

    /// RMS energy below this suggests more volume
    pub min_rms: f64,

    /// RMS energy above this suggests moderating volume
    pub max_rms: f64,

    /// Zero-crossing rate above this suggests clearer consonants
    pub max_zcr: f64,
}

impl Default for ProsodyConfig {
    fn default() -> Self {
        ProsodyConfig {
            chars_per_second: 12.0,
            slow_factor: 1.5,
            fast_factor: 0.6,
            min_rms: 0.01,
            max_rms: 0.2,
            max_zcr: 0.15,
        }
    }
}

/// Rule-based prosody analyzer
#[derive(Debug, Clone, Default)]
pub struct ProsodyAnalyzer {
    config: ProsodyConfig,
}

impl ProsodyAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ProsodyConfig) -> Self {
        ProsodyAnalyzer { config }
    }

    pub fn config(&self) -> &ProsodyConfig {
        &self.config
    }

    /// Hints in display order: rate, volume, articulation
    ///
    /// Missing features are read as 0.0. A missing `rms_energy` therefore
    /// always asks for more volume, and a missing `duration` asks to slow
    /// down whenever the target is non-empty.
    pub fn hints(&self, features: &AudioFeatures, target: &str) -> Vec<ProsodyHint> {
        let cfg = &self.config;
        let mut hints = Vec::with_capacity(3);

        let expected = char_len(target) as f64 / cfg.chars_per_second;
        let actual = features.get_or(FeatureKey::Duration, 0.0);
        if actual > expected * cfg.slow_factor {
            hints.push(ProsodyHint::SpeakFaster);
        } else if actual < expected * cfg.fast_factor {
            hints.push(ProsodyHint::SlowDown);
        }

        let rms = features.get_or(FeatureKey::RmsEnergy, 0.0);
        if rms < cfg.min_rms {
            hints.push(ProsodyHint::MoreVolume);
        } else if rms > cfg.max_rms {
            hints.push(ProsodyHint::ModerateVolume);
        }

        if features.get_or(FeatureKey::Zcr, 0.0) > cfg.max_zcr {
            hints.push(ProsodyHint::Articulation);
        }

        hints
    }

    /// Hint messages in display order
    pub fn analyze(&self, features: &AudioFeatures, target: &str) -> Vec<String> {
        self.hints(features, target)
            .iter()
            .map(|hint| hint.message().to_string())
            .collect()
    }
}

/// Analyze prosody with default thresholds
pub fn analyze_prosody(features: &AudioFeatures, target: &str) -> Vec<String> {
    ProsodyAnalyzer::new().analyze(features, target)
}
