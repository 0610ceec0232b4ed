// Elocute - Pronunciation scoring and prosody feedback
// Module declarations and the top-level call contracts

pub mod audio;
pub mod coaching;
pub mod config;
pub mod pipeline;
pub mod scoring;

pub use audio::{extract_features, AudioError, AudioFeatures, FeatureConfig, FeatureKey};
pub use config::{AnalyzerConfig, ConfigError};
pub use pipeline::{analyze, AnalysisResult, Analyzer};
pub use scoring::{
    analyze_prosody, compute_score, PronunciationScorer, ProsodyAnalyzer, ProsodyHint,
    ScoreBreakdown,
};
