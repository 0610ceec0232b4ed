// Coaching module
// Boundary to external speech-to-text and language model services

pub mod prompts;
pub mod response;
pub mod service;
pub mod types;

use thiserror::Error;

pub use prompts::{
    clean_phrase, fallback_phrase, feedback_request, phrase_request, CompletionRequest,
};
pub use response::parse_feedback_response;
pub use service::{Coach, SpeechServices};
pub use types::{CoachingFeedback, CoachingReport, Difficulty, Language};

/// Errors crossing the coaching boundary
#[derive(Debug, Error)]
pub enum CoachingError {
    #[error("Speech service error: {0}")]
    Service(String),

    #[error("No JSON object found in model response")]
    NoJsonFound,

    #[error("Malformed feedback JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
