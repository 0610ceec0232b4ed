// Pipeline module
// Composes extraction, scoring and prosody analysis for one recording

pub mod analysis;

pub use analysis::{analyze, write_temp_upload, AnalysisResult, Analyzer};
