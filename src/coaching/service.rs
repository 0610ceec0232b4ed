// Coaching service
// Wraps the analysis pipeline with injected speech-to-text and language model calls

use std::path::Path;

use crate::coaching::prompts::{
    clean_phrase, fallback_phrase, feedback_request, phrase_request, CompletionRequest,
};
use crate::coaching::response::parse_feedback_response;
use crate::coaching::types::{CoachingFeedback, CoachingReport, Difficulty, Language};
use crate::coaching::CoachingError;
use crate::pipeline::{write_temp_upload, Analyzer};

/// External speech and language model calls
///
/// Implementations own their client and credentials; the coach holds one
/// instance and never reaches for global state.
pub trait SpeechServices {
    /// Transcribe a recording to text
    ///
    /// `language_code` is the ISO 639-1 code of the practice language
    /// (`"en"`, `"es"`), as speech-to-text APIs expect it.
    fn transcribe(&self, audio_path: &Path, language_code: &str) -> Result<String, CoachingError>;

    /// Run a chat completion and return the raw message content
    fn complete(&self, request: &CompletionRequest) -> Result<String, CoachingError>;

    /// Synthesize `text` with the named voice and return the encoded audio
    fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, CoachingError>;
}

/// Pronunciation coach combining local analysis with external services
pub struct Coach<S: SpeechServices> {
    services: S,
    analyzer: Analyzer,
}

impl<S: SpeechServices> Coach<S> {
    pub fn new(services: S) -> Self {
        Coach {
            services,
            analyzer: Analyzer::new(),
        }
    }

    pub fn with_analyzer(services: S, analyzer: Analyzer) -> Self {
        Coach { services, analyzer }
    }

    pub fn services(&self) -> &S {
        &self.services
    }

    /// Transcribe, score and coach one recording on disk
    /// Transcription failures propagate; feedback failures fall back
    pub fn coach_path(
        &self,
        audio_path: &Path,
        target: &str,
        language: Language,
    ) -> Result<CoachingReport, CoachingError> {
        let transcription = self.services.transcribe(audio_path, language.code())?;
        let analysis = self.analyzer.analyze_path(target, &transcription, audio_path);
        let feedback = self.feedback(target, &transcription, language);

        Ok(CoachingReport {
            transcription,
            score: analysis.score,
            feedback: feedback.feedback,
            suggestions: feedback.suggestions,
            prosody_feedback: analysis.prosody_feedback,
            audio_features: analysis.audio_features,
        })
    }

    /// Coach an uploaded recording
    /// The temporary copy is removed on every exit path
    pub fn coach_upload(
        &self,
        upload: &[u8],
        target: &str,
        language: Language,
    ) -> Result<CoachingReport, CoachingError> {
        let temp = write_temp_upload(upload)?;
        self.coach_path(temp.path(), target, language)
    }

    /// Spoken reference rendition of a phrase in the language's voice
    /// Synthesis failures propagate; there is no canned audio to fall back to
    pub fn reference_audio(
        &self,
        text: &str,
        language: Language,
    ) -> Result<Vec<u8>, CoachingError> {
        let voice = language.tts_voice();
        log::debug!("Synthesizing reference audio with voice {}", voice);
        self.services.synthesize(text, voice)
    }

    /// Generate coaching feedback, falling back to canned advice on any failure
    pub fn feedback(
        &self,
        target: &str,
        transcription: &str,
        language: Language,
    ) -> CoachingFeedback {
        let request = feedback_request(target, transcription, language);
        match self
            .services
            .complete(&request)
            .and_then(|content| parse_feedback_response(&content))
        {
            Ok(feedback) => feedback,
            Err(e) => {
                log::warn!("Feedback generation failed, using fallback: {}", e);
                CoachingFeedback::fallback()
            }
        }
    }

    /// Generate a practice phrase, falling back to a built-in phrase
    pub fn practice_phrase(&self, language: Language, difficulty: Difficulty) -> String {
        log::debug!(
            "Requesting {} {} practice phrase",
            difficulty.name(),
            language.name()
        );
        let request = phrase_request(language, difficulty);
        match self
            .services
            .complete(&request)
            .map(|raw| clean_phrase(&raw))
        {
            Ok(phrase) if !phrase.is_empty() => phrase,
            Ok(_) => {
                log::warn!("Phrase generation returned nothing, using fallback");
                fallback_phrase(language, difficulty).to_string()
            }
            Err(e) => {
                log::warn!("Phrase generation failed, using fallback: {}", e);
                fallback_phrase(language, difficulty).to_string()
            }
        }
    }
}
