// Pronunciation scorer
// Fuses word overlap, Jaro-Winkler, normalized edit distance and pacing into a 0-100 score

use serde::{Deserialize, Serialize};

use crate::audio::{AudioFeatures, FeatureKey};
use crate::scoring::text::{char_len, normalize, tokenize, word_set};

/// Pacing bands applied to actual / expected speaking duration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingBands {
    /// Ratio above which the outer penalty applies (too slow)
    pub outer_slow: f64,

    /// Ratio below which the outer penalty applies (too fast)
    pub outer_fast: f64,

    /// Ratio above which the inner penalty applies
    pub inner_slow: f64,

    /// Ratio below which the inner penalty applies
    pub inner_fast: f64,

    /// Pacing score outside the outer band
    pub outer_score: f64,

    /// Pacing score outside the inner band
    pub inner_score: f64,
}

impl Default for PacingBands {
    fn default() -> Self {
        PacingBands {
            outer_slow: 1.5,
            outer_fast: 0.6,
            inner_slow: 1.3,
            inner_fast: 0.7,
            outer_score: 85.0,
            inner_score: 90.0,
        }
    }
}

/// Weights and constants for the fused score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Weight for distinct target words found in the transcription
    pub word_weight: f64,

    /// Weight for Jaro-Winkler similarity of the whole phrases
    pub jaro_weight: f64,

    /// Weight for normalized Levenshtein similarity
    pub lev_weight: f64,

    /// Weight for the pacing score
    pub prosody_weight: f64,

    /// Empirical speaking rate used to estimate expected duration
    pub chars_per_second: f64,

    pub pacing: PacingBands,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            word_weight: 0.40,
            jaro_weight: 0.25,
            lev_weight: 0.20,
            prosody_weight: 0.15,
            chars_per_second: 12.0,
            pacing: PacingBands::default(),
        }
    }
}

/// Per-signal sub-scores behind a final score (for debugging/display)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub word_score: f64,
    pub jaro_score: f64,
    pub lev_score: f64,
    pub prosody_score: f64,

    /// Final score in [0, 100]
    pub total: u8,

    /// Target and transcription matched after normalization
    /// Sub-scores are reported as 100 without being computed
    pub exact_match: bool,
}

impl ScoreBreakdown {
    fn exact() -> Self {
        ScoreBreakdown {
            word_score: 100.0,
            jaro_score: 100.0,
            lev_score: 100.0,
            prosody_score: 100.0,
            total: 100,
            exact_match: true,
        }
    }

    fn zero() -> Self {
        ScoreBreakdown {
            word_score: 0.0,
            jaro_score: 0.0,
            lev_score: 0.0,
            prosody_score: 0.0,
            total: 0,
            exact_match: false,
        }
    }
}

/// Deterministic, stateless phrase scorer
#[derive(Debug, Clone, Default)]
pub struct PronunciationScorer {
    config: ScoringConfig,
}

impl PronunciationScorer {
    /// Create a scorer with default weights
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ScoringConfig) -> Self {
        PronunciationScorer { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score a transcription against its target phrase
    pub fn score(&self, target: &str, transcription: &str, features: &AudioFeatures) -> u8 {
        self.score_detailed(target, transcription, features).total
    }

    /// Score and keep every sub-score
    pub fn score_detailed(
        &self,
        target: &str,
        transcription: &str,
        features: &AudioFeatures,
    ) -> ScoreBreakdown {
        let target_norm = normalize(target);
        let transcription_norm = normalize(transcription);

        if target_norm == transcription_norm {
            return ScoreBreakdown::exact();
        }

        if tokenize(&target_norm).is_empty() {
            return ScoreBreakdown::zero();
        }

        let word_score = word_overlap(&target_norm, &transcription_norm);
        let jaro_score = strsim::jaro_winkler(&target_norm, &transcription_norm) * 100.0;
        let lev_score = edit_similarity(&target_norm, &transcription_norm);
        let prosody_score = self.pacing_score(target, features);

        let weighted = word_score * self.config.word_weight
            + jaro_score * self.config.jaro_weight
            + lev_score * self.config.lev_weight
            + prosody_score * self.config.prosody_weight;

        ScoreBreakdown {
            word_score,
            jaro_score,
            lev_score,
            prosody_score,
            total: to_score(weighted),
            exact_match: false,
        }
    }

    /// Pacing sub-score from the `duration` feature
    /// A missing duration is scored as exactly on pace
    pub fn pacing_score(&self, target: &str, features: &AudioFeatures) -> f64 {
        let bands = &self.config.pacing;
        let expected = char_len(target) as f64 / self.config.chars_per_second;
        let actual = features.get(FeatureKey::Duration).unwrap_or(expected);
        let ratio = if expected > 0.0 { actual / expected } else { 1.0 };

        if ratio > bands.outer_slow || ratio < bands.outer_fast {
            bands.outer_score
        } else if ratio > bands.inner_slow || ratio < bands.inner_fast {
            bands.inner_score
        } else {
            100.0
        }
    }
}

/// Share of distinct target words present in the transcription, 0-100
fn word_overlap(target_norm: &str, transcription_norm: &str) -> f64 {
    let target_words = word_set(target_norm);
    if target_words.is_empty() {
        return 0.0;
    }

    let transcribed_words = word_set(transcription_norm);
    let matching = target_words.intersection(&transcribed_words).count();

    matching as f64 / target_words.len() as f64 * 100.0
}

/// 1 - edit distance / longer length, 0-100
fn edit_similarity(a: &str, b: &str) -> f64 {
    let max_len = char_len(a).max(char_len(b));
    if max_len == 0 {
        return 0.0;
    }

    let distance = strsim::levenshtein(a, b);
    (1.0 - distance as f64 / max_len as f64) * 100.0
}

/// Truncate a weighted sum into a score
/// Only an exact match reaches 100, so fused scores stop at 99
fn to_score(weighted: f64) -> u8 {
    if !weighted.is_finite() {
        return 0;
    }
    weighted.clamp(0.0, 99.0) as u8
}

/// Score with default weights
pub fn compute_score(target: &str, transcription: &str, features: &AudioFeatures) -> u8 {
    PronunciationScorer::new().score(target, transcription, features)
}
