// Coaching types
// Languages, difficulty levels and the feedback payload returned to callers

use serde::{Deserialize, Serialize};

use crate::audio::AudioFeatures;

/// Practice language
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    English,
    Spanish,
}

impl Language {
    /// Parse a language code; unknown codes fall back to English
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_lowercase().as_str() {
            "es" | "spanish" => Language::Spanish,
            _ => Language::English,
        }
    }

    /// ISO 639-1 code passed to the transcription service
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Spanish => "es",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Spanish => "Spanish",
        }
    }

    /// Text-to-speech voice for reference audio
    pub fn tts_voice(&self) -> &'static str {
        match self {
            Language::English => "alloy",
            Language::Spanish => "nova",
        }
    }
}

/// Practice phrase difficulty
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Easy,
    Intermediate,
    Difficult,
}

impl Difficulty {
    /// Parse a difficulty name; unknown names fall back to Easy
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "intermediate" => Difficulty::Intermediate,
            "difficult" | "hard" => Difficulty::Difficult,
            _ => Difficulty::Easy,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Difficult => "difficult",
        }
    }
}

/// Free-text coaching produced by the language model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachingFeedback {
    #[serde(default)]
    pub feedback: String,

    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl CoachingFeedback {
    /// Canned feedback used when generation fails
    pub fn fallback() -> Self {
        CoachingFeedback {
            feedback: "Good effort! Keep practicing to improve your pronunciation.".to_string(),
            suggestions: vec![
                "Try speaking more slowly to enunciate clearly".to_string(),
                "Record yourself and compare to native speakers".to_string(),
                "Focus on problem sounds one at a time".to_string(),
            ],
        }
    }
}

/// Full response for one coached attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachingReport {
    pub transcription: String,
    pub score: u8,
    pub feedback: String,
    pub suggestions: Vec<String>,
    pub prosody_feedback: Vec<String>,
    pub audio_features: AudioFeatures,
}
