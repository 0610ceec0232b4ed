// Frame-wise acoustic feature extraction
// Computes RMS energy, spectral centroid and zero-crossing rate over centered
// STFT-style frames and averages them into a feature map

use realfft::{RealFftPlanner, RealToComplex};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::audio::ingest::{ingest_audio, load_audio_file, AudioData, AudioError};
use crate::audio::resample::resample_mono;
use crate::audio::types::{AudioFeatures, FeatureKey};

/// Samples with magnitude at or below this are treated as zero when counting crossings
const ZERO_CROSSING_THRESHOLD: f32 = 1e-10;

/// Configuration for feature extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Analysis sample rate in Hz; recordings are resampled to this rate
    pub target_sample_rate: u32,

    /// Frame length in samples (also the FFT size)
    pub frame_length: usize,

    /// Hop size in samples (advance between frames)
    pub hop_length: usize,

    /// Populate the `duration` key from the waveform length
    /// Off by default: scoring treats a missing duration as "on pace"
    pub measure_duration: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        FeatureConfig {
            target_sample_rate: 16000,
            frame_length: 2048,
            hop_length: 512,
            measure_duration: false,
        }
    }
}

impl FeatureConfig {
    fn validate(&self) -> Result<(), AudioError> {
        if self.target_sample_rate == 0 || self.frame_length < 2 || self.hop_length == 0 {
            return Err(AudioError::InvalidData);
        }
        Ok(())
    }
}

/// How the signal is extended before framing
#[derive(Debug, Clone, Copy)]
enum PadMode {
    Zeros,
    Edge,
}

/// Pad by half a frame on both sides so frame `i` is centered on sample `i * hop`
fn center_pad(samples: &[f32], frame_length: usize, mode: PadMode) -> Vec<f32> {
    let pad = frame_length / 2;
    let (head, tail) = match mode {
        PadMode::Zeros => (0.0, 0.0),
        PadMode::Edge => (
            samples.first().copied().unwrap_or(0.0),
            samples.last().copied().unwrap_or(0.0),
        ),
    };

    let mut padded = Vec::with_capacity(samples.len() + 2 * pad);
    padded.resize(pad, head);
    padded.extend_from_slice(samples);
    padded.resize(padded.len() + pad, tail);
    padded
}

/// Split a padded signal into overlapping frames
fn frames<'a>(padded: &'a [f32], config: &FeatureConfig) -> impl Iterator<Item = &'a [f32]> + 'a {
    let frame_length = config.frame_length;
    let count = if padded.len() < frame_length || config.hop_length == 0 {
        0
    } else {
        1 + (padded.len() - frame_length) / config.hop_length
    };
    let hop = config.hop_length;

    (0..count).map(move |i| &padded[i * hop..i * hop + frame_length])
}

/// Root-mean-square energy of each frame
pub fn frame_rms(samples: &[f32], config: &FeatureConfig) -> Vec<f32> {
    if samples.is_empty() {
        return Vec::new();
    }

    let padded = center_pad(samples, config.frame_length, PadMode::Zeros);
    frames(&padded, config)
        .map(|frame| {
            let power = frame.iter().map(|x| x * x).sum::<f32>() / frame.len() as f32;
            power.sqrt()
        })
        .collect()
}

/// Zero-crossing rate of each frame (crossings / frame length)
pub fn frame_zcr(samples: &[f32], config: &FeatureConfig) -> Vec<f32> {
    if samples.is_empty() {
        return Vec::new();
    }

    let padded = center_pad(samples, config.frame_length, PadMode::Edge);
    frames(&padded, config)
        .map(|frame| count_crossings(frame) as f32 / frame.len() as f32)
        .collect()
}

/// Number of adjacent sample pairs that change sign
/// Near-zero samples count as positive
fn count_crossings(samples: &[f32]) -> usize {
    let is_negative = |x: f32| x < 0.0 && x.abs() > ZERO_CROSSING_THRESHOLD;
    samples
        .windows(2)
        .filter(|pair| is_negative(pair[0]) != is_negative(pair[1]))
        .count()
}

/// Spectral centroid (Hz) of each frame
pub fn frame_spectral_centroid(
    samples: &[f32],
    sample_rate: u32,
    config: &FeatureConfig,
) -> Result<Vec<f32>, AudioError> {
    if samples.is_empty() {
        return Ok(Vec::new());
    }

    let n_fft = config.frame_length;
    let mut planner = RealFftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(n_fft);
    let window = hann_window(n_fft);

    let padded = center_pad(samples, n_fft, PadMode::Zeros);
    frames(&padded, config)
        .map(|frame| {
            let spectrum = magnitude_spectrum(&fft, frame, &window)?;
            Ok(calculate_spectral_centroid(&spectrum, sample_rate, n_fft))
        })
        .collect()
}

/// Periodic Hann window of length `n`
fn hann_window(n: usize) -> Vec<f32> {
    (0..n)
        .map(|i| 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / n as f32).cos()))
        .collect()
}

/// Window a frame and return its FFT magnitudes
fn magnitude_spectrum(
    fft: &Arc<dyn RealToComplex<f32>>,
    frame: &[f32],
    window: &[f32],
) -> Result<Vec<f32>, AudioError> {
    let mut input: Vec<f32> = frame.iter().zip(window).map(|(x, w)| x * w).collect();
    let mut spectrum = fft.make_output_vec();

    fft.process(&mut input, &mut spectrum)
        .map_err(|e| AudioError::Fft(e.to_string()))?;

    Ok(spectrum.iter().map(|c| c.norm()).collect())
}

/// Center of mass of a magnitude spectrum in Hz
/// Silent frames have a centroid of 0
fn calculate_spectral_centroid(spectrum: &[f32], sample_rate: u32, n_fft: usize) -> f32 {
    if n_fft == 0 {
        return 0.0;
    }

    let bin_width = sample_rate as f32 / n_fft as f32;
    let mut weighted_sum = 0.0;
    let mut total_magnitude = 0.0;

    for (i, &magnitude) in spectrum.iter().enumerate() {
        weighted_sum += i as f32 * bin_width * magnitude;
        total_magnitude += magnitude;
    }

    if total_magnitude > 0.0 {
        weighted_sum / total_magnitude
    } else {
        0.0
    }
}

fn mean(values: &[f32]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64)
}

/// Compute the feature map for a mono waveform
/// An empty waveform yields an empty map
pub fn compute_features(
    samples: &[f32],
    sample_rate: u32,
    config: &FeatureConfig,
) -> Result<AudioFeatures, AudioError> {
    config.validate()?;
    if sample_rate == 0 {
        return Err(AudioError::InvalidData);
    }

    let mut features = AudioFeatures::new();
    if samples.is_empty() {
        return Ok(features);
    }

    let measured = [
        (FeatureKey::RmsEnergy, mean(&frame_rms(samples, config))),
        (
            FeatureKey::SpectralCentroid,
            mean(&frame_spectral_centroid(samples, sample_rate, config)?),
        ),
        (FeatureKey::Zcr, mean(&frame_zcr(samples, config))),
    ];

    for (key, value) in measured {
        match value {
            Some(v) if v.is_finite() => features.insert(key, v),
            Some(_) => return Err(AudioError::InvalidData),
            None => {}
        }
    }

    if config.measure_duration {
        features.insert(
            FeatureKey::Duration,
            samples.len() as f64 / sample_rate as f64,
        );
    }

    Ok(features)
}

/// Decode, downmix and resample a recording, then compute its features
pub fn features_for_audio(
    audio: &AudioData,
    config: &FeatureConfig,
) -> Result<AudioFeatures, AudioError> {
    config.validate()?;
    log::debug!(
        "Analyzing {:.2}s recording at {} Hz",
        audio.duration_secs(),
        audio.sample_rate
    );
    let mono = audio.to_mono();
    let resampled = resample_mono(&mono, audio.sample_rate, config.target_sample_rate)?;
    compute_features(&resampled, config.target_sample_rate, config)
}

/// Extract features from a recording on disk
/// Never fails: decode or analysis errors degrade to an empty map
pub fn extract_features(path: &Path, config: &FeatureConfig) -> AudioFeatures {
    let result = load_audio_file(path).and_then(|audio| features_for_audio(&audio, config));
    degrade(result, &path.display().to_string())
}

/// Extract features from an in-memory recording in any supported container
/// Never fails: decode or analysis errors degrade to an empty map
pub fn extract_features_from_bytes(data: &[u8], config: &FeatureConfig) -> AudioFeatures {
    let result = ingest_audio(data, None).and_then(|audio| features_for_audio(&audio, config));
    degrade(result, &format!("{} byte buffer", data.len()))
}

fn degrade(result: Result<AudioFeatures, AudioError>, source: &str) -> AudioFeatures {
    match result {
        Ok(features) => features,
        Err(e) => {
            log::warn!("Feature extraction failed for {}: {}", source, e);
            AudioFeatures::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{SampleFormat, WavSpec, WavWriter};
    use tempfile::TempDir;

    fn sine(freq: f32, amplitude: f32, sample_rate: u32, seconds: f32) -> Vec<f32> {
        let n = (sample_rate as f32 * seconds) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                amplitude * (2.0 * std::f32::consts::PI * freq * t + 0.3).sin()
            })
            .collect()
    }

    fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) {
        let spec = WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(path, spec).unwrap();
        for &s in samples {
            writer.write_sample((s * 32767.0) as i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_count_crossings() {
        let alternating = vec![1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
        assert_eq!(count_crossings(&alternating), 5);

        let constant = vec![1.0, 1.0, 1.0, 1.0];
        assert_eq!(count_crossings(&constant), 0);

        // Exact and near zeros count as positive
        assert_eq!(count_crossings(&[0.0, 1.0, 0.0, 1.0]), 0);
        assert_eq!(count_crossings(&[1.0, -1e-12, 1.0]), 0);
    }

    #[test]
    fn test_hann_window() {
        let window = hann_window(100);

        // Window should taper at edges
        assert!(window[0] < 0.1);
        assert!(window[99] < 0.1);
        assert!(window[50] > 0.9);
    }

    #[test]
    fn test_frame_count_is_centered() {
        let config = FeatureConfig::default();
        let samples = vec![0.1; 16000];

        // 1 + len / hop frames for centered framing
        assert_eq!(frame_rms(&samples, &config).len(), 1 + 16000 / 512);
        assert_eq!(frame_zcr(&samples, &config).len(), 1 + 16000 / 512);
    }

    #[test]
    fn test_silence_features() {
        let config = FeatureConfig::default();
        let features = compute_features(&vec![0.0; 8000], 16000, &config).unwrap();

        assert_eq!(features.get(FeatureKey::RmsEnergy), Some(0.0));
        assert_eq!(features.get(FeatureKey::SpectralCentroid), Some(0.0));
        assert_eq!(features.get(FeatureKey::Zcr), Some(0.0));
        assert_eq!(features.get(FeatureKey::Duration), None);
    }

    #[test]
    fn test_sine_features() {
        let config = FeatureConfig::default();
        let samples = sine(1000.0, 0.5, 16000, 1.0);
        let features = compute_features(&samples, 16000, &config).unwrap();

        // RMS of a sine is amplitude / sqrt(2); edge frames are partly padding
        let rms = features.get(FeatureKey::RmsEnergy).unwrap();
        assert!(rms > 0.30 && rms < 0.36, "rms = {}", rms);

        let centroid = features.get(FeatureKey::SpectralCentroid).unwrap();
        assert!(centroid > 850.0 && centroid < 1250.0, "centroid = {}", centroid);

        // Two crossings per 16-sample period
        let zcr = features.get(FeatureKey::Zcr).unwrap();
        assert!(zcr > 0.10 && zcr < 0.14, "zcr = {}", zcr);
    }

    #[test]
    fn test_noise_like_signal_has_high_zcr() {
        let config = FeatureConfig::default();
        let samples: Vec<f32> = (0..32768).map(|i| if i % 2 == 0 { 0.1 } else { -0.1 }).collect();
        let zcr = mean(&frame_zcr(&samples, &config)).unwrap();
        assert!(zcr > 0.9, "zcr = {}", zcr);
    }

    #[test]
    fn test_duration_only_when_measured() {
        let samples = vec![0.01; 16000];

        let default = compute_features(&samples, 16000, &FeatureConfig::default()).unwrap();
        assert!(!default.contains(FeatureKey::Duration));

        let config = FeatureConfig {
            measure_duration: true,
            ..FeatureConfig::default()
        };
        let measured = compute_features(&samples, 16000, &config).unwrap();
        assert_eq!(measured.get(FeatureKey::Duration), Some(1.0));
    }

    #[test]
    fn test_empty_waveform_yields_empty_map() {
        let features = compute_features(&[], 16000, &FeatureConfig::default()).unwrap();
        assert!(features.is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = FeatureConfig {
            hop_length: 0,
            ..FeatureConfig::default()
        };
        assert!(compute_features(&[0.1; 100], 16000, &config).is_err());
    }

    #[test]
    fn test_extract_unreadable_path_is_empty() {
        let features = extract_features(
            Path::new("/nonexistent/recording.wav"),
            &FeatureConfig::default(),
        );
        assert!(features.is_empty());
    }

    #[test]
    fn test_extract_garbage_bytes_is_empty() {
        let features = extract_features_from_bytes(b"RIFF nonsense", &FeatureConfig::default());
        assert!(features.is_empty());
    }

    #[test]
    fn test_extract_from_file_resamples() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("utterance.wav");
        write_wav(&path, &sine(440.0, 0.3, 44100, 0.5), 44100);

        let features = extract_features(&path, &FeatureConfig::default());

        assert_eq!(features.len(), 3);
        assert!(features.get(FeatureKey::RmsEnergy).unwrap() > 0.1);
        assert!(features.get(FeatureKey::SpectralCentroid).unwrap() > 0.0);
        assert!(!features.contains(FeatureKey::Duration));
    }
}
