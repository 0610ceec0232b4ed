// Combined pronunciation analysis
// Feature extraction -> scoring -> prosody hints for one recording

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

use crate::audio::{self, AudioFeatures};
use crate::config::AnalyzerConfig;
use crate::scoring::{PronunciationScorer, ProsodyAnalyzer, ScoreBreakdown};

/// Result of analyzing one utterance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Pronunciation score [0, 100]
    pub score: u8,

    /// Features measured from the recording (empty if decoding failed)
    pub audio_features: AudioFeatures,

    /// Rate, volume and articulation hints in display order
    pub prosody_feedback: Vec<String>,
}

/// Stateless analyzer holding its configuration
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalyzerConfig,
    scorer: PronunciationScorer,
    prosody: ProsodyAnalyzer,
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AnalyzerConfig) -> Self {
        Analyzer {
            scorer: PronunciationScorer::with_config(config.scoring.clone()),
            prosody: ProsodyAnalyzer::with_config(config.prosody.clone()),
            config,
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Score and analyze an already extracted feature map
    pub fn analyze_features(
        &self,
        target: &str,
        transcription: &str,
        audio_features: AudioFeatures,
    ) -> AnalysisResult {
        let breakdown = self.breakdown(target, transcription, &audio_features);
        let prosody_feedback = self.prosody.analyze(&audio_features, target);

        log::info!(
            "Scored {} ({} prosody hints, {} features)",
            breakdown.total,
            prosody_feedback.len(),
            audio_features.len()
        );

        AnalysisResult {
            score: breakdown.total,
            audio_features,
            prosody_feedback,
        }
    }

    /// Sub-scores for a transcription, logged at debug level
    pub fn breakdown(
        &self,
        target: &str,
        transcription: &str,
        audio_features: &AudioFeatures,
    ) -> ScoreBreakdown {
        let breakdown = self.scorer.score_detailed(target, transcription, audio_features);
        log::debug!(
            "Score breakdown: words {:.1}, jaro {:.1}, lev {:.1}, prosody {:.1}, exact {}",
            breakdown.word_score,
            breakdown.jaro_score,
            breakdown.lev_score,
            breakdown.prosody_score,
            breakdown.exact_match
        );
        breakdown
    }

    /// Analyze a recording on disk
    pub fn analyze_path(
        &self,
        target: &str,
        transcription: &str,
        audio_path: &Path,
    ) -> AnalysisResult {
        let features = audio::extract_features(audio_path, &self.config.features);
        self.analyze_features(target, transcription, features)
    }

    /// Analyze an in-memory recording
    pub fn analyze_bytes(&self, target: &str, transcription: &str, audio: &[u8]) -> AnalysisResult {
        let features = audio::extract_features_from_bytes(audio, &self.config.features);
        self.analyze_features(target, transcription, features)
    }

    /// Analyze an uploaded recording through a temporary file
    ///
    /// The file is deleted when this returns, on success or failure. Only
    /// failing to create or write the temporary file is reported as an error.
    pub fn analyze_upload(
        &self,
        target: &str,
        transcription: &str,
        upload: &[u8],
    ) -> std::io::Result<AnalysisResult> {
        let temp = write_temp_upload(upload)?;
        Ok(self.analyze_path(target, transcription, temp.path()))
    }
}

/// Persist uploaded audio to a temporary file removed on drop
/// The container is detected from content, so the name carries no format
pub fn write_temp_upload(data: &[u8]) -> std::io::Result<tempfile::NamedTempFile> {
    let mut temp = tempfile::Builder::new().suffix(".upload").tempfile()?;
    temp.write_all(data)?;
    temp.flush()?;
    Ok(temp)
}

/// Analyze a recording with default configuration
pub fn analyze(target: &str, transcription: &str, audio_path: &Path) -> AnalysisResult {
    Analyzer::new().analyze_path(target, transcription, audio_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::FeatureKey;
    use hound::{SampleFormat, WavSpec, WavWriter};
    use std::io::Cursor;

    fn tone_wav(amplitude: f32, seconds: f32) -> Vec<u8> {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 16000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut cursor, spec).unwrap();
            let n = (16000.0 * seconds) as usize;
            for i in 0..n {
                let t = i as f32 / 16000.0;
                let s = amplitude * (2.0 * std::f32::consts::PI * 220.0 * t).sin();
                writer.write_sample((s * 32767.0) as i16).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn test_unreadable_audio_still_scores() {
        let result = analyze("hello world", "hello world", Path::new("/nonexistent.wav"));

        assert_eq!(result.score, 100);
        assert!(result.audio_features.is_empty());
        // Empty map: 0 duration and 0 energy
        assert_eq!(
            result.prosody_feedback,
            vec![
                "Slow down slightly to improve clarity and enunciation".to_string(),
                "Speak with more volume and confidence".to_string(),
            ]
        );
    }

    #[test]
    fn test_analyze_bytes_with_measured_duration() {
        let mut config = AnalyzerConfig::default();
        config.features.measure_duration = true;
        let analyzer = Analyzer::with_config(config);

        // "good morning" = 12 chars -> 1 s expected; recording is 1 s
        let audio = tone_wav(0.1, 1.0);
        let result = analyzer.analyze_bytes("good morning", "good mourning", &audio);

        assert_eq!(result.audio_features.get(FeatureKey::Duration), Some(1.0));
        assert!(result.score > 50 && result.score < 100);
        assert!(result.prosody_feedback.is_empty(), "{:?}", result.prosody_feedback);
    }

    #[test]
    fn test_analyze_upload_removes_temp_file() {
        let analyzer = Analyzer::new();
        let temp = write_temp_upload(&tone_wav(0.1, 0.25)).unwrap();
        let path = temp.path().to_path_buf();
        assert!(path.exists());
        drop(temp);
        assert!(!path.exists());

        let result = analyzer
            .analyze_upload("hola", "ola", &tone_wav(0.1, 0.25))
            .unwrap();
        assert_eq!(result.audio_features.len(), 3);
    }

    #[test]
    fn test_result_serializes_like_the_api_payload() {
        let result = Analyzer::new().analyze_features(
            "hello",
            "hello",
            AudioFeatures::new().with(FeatureKey::RmsEnergy, 0.05),
        );
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["score"], 100);
        assert_eq!(json["audio_features"]["rms_energy"], 0.05);
        assert!(json["prosody_feedback"].is_array());
    }
}
