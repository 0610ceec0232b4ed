// Scoring module
// Phrase similarity scoring and prosody hints

pub mod prosody;
pub mod scorer;
pub mod text;

pub use prosody::{analyze_prosody, ProsodyAnalyzer, ProsodyConfig, ProsodyHint};
pub use scorer::{compute_score, PacingBands, PronunciationScorer, ScoreBreakdown, ScoringConfig};
