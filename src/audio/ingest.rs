// Audio ingestion
// Detects the container, decodes the first audio track and interleaves it as f32 in [-1, 1]

use std::fs::File;
use std::io::{Cursor, ErrorKind};
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSource, MediaSourceStream};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("Failed to decode audio: {0}")]
    Decode(#[from] SymphoniaError),

    #[error("Failed to read recording: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported audio: {0}")]
    UnsupportedFormat(String),

    #[error("Recording has no channels or no sample rate")]
    InvalidData,

    #[error("Resampling failed: {0}")]
    Resample(String),

    #[error("FFT failed: {0}")]
    Fft(String),
}

/// A decoded recording
#[derive(Debug, Clone)]
pub struct AudioData {
    /// Interleaved, normalized samples
    pub samples: Vec<f32>,

    pub sample_rate: u32,
    pub channels: u16,

    /// Samples per channel
    pub frame_count: usize,
}

impl AudioData {
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frame_count as f64 / self.sample_rate as f64
    }

    /// Average all channels of each frame into one sample
    pub fn to_mono(&self) -> Vec<f32> {
        match self.channels {
            0 | 1 => self.samples.clone(),
            n => {
                let width = n as usize;
                self.samples
                    .chunks_exact(width)
                    .map(|frame| frame.iter().sum::<f32>() / width as f32)
                    .collect()
            }
        }
    }
}

/// Decode an in-memory recording
///
/// The container is detected from its content; `extension` is only a hint.
pub fn ingest_audio(data: &[u8], extension: Option<&str>) -> Result<AudioData, AudioError> {
    decode(Box::new(Cursor::new(data.to_vec())), extension)
}

/// Open a recording on disk and decode it
pub fn load_audio_file(path: &Path) -> Result<AudioData, AudioError> {
    let file = File::open(path)?;
    let extension = path.extension().and_then(|ext| ext.to_str());
    decode(Box::new(file), extension)
}

fn decode(source: Box<dyn MediaSource>, extension: Option<&str>) -> Result<AudioData, AudioError> {
    let mut hint = Hint::new();
    if let Some(ext) = extension {
        hint.with_extension(ext);
    }

    let stream = MediaSourceStream::new(source, Default::default());
    let mut format = symphonia::default::get_probe()
        .format(
            &hint,
            stream,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )?
        .format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| AudioError::UnsupportedFormat("no audio track".to_string()))?;
    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);
    let mut channels = track
        .codec_params
        .channels
        .map(|c| c.count() as u16)
        .unwrap_or(0);
    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())?;

    let mut samples = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == ErrorKind::UnexpectedEof => break,
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(e.into()),
        };
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(msg)) => {
                log::warn!("Skipping undecodable packet: {}", msg);
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        // Decoded spec wins over container metadata, which may be incomplete
        let spec = *decoded.spec();
        sample_rate = spec.rate;
        channels = spec.channels.count() as u16;

        let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        buffer.copy_interleaved_ref(decoded);
        samples.extend_from_slice(buffer.samples());
    }

    if channels == 0 || sample_rate == 0 {
        return Err(AudioError::InvalidData);
    }

    let frame_count = samples.len() / channels as usize;
    log::debug!(
        "Decoded {} frames ({} ch, {} Hz)",
        frame_count,
        channels,
        sample_rate
    );

    Ok(AudioData {
        samples,
        sample_rate,
        channels,
        frame_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{SampleFormat, WavSpec, WavWriter};

    fn encode_wav(channels: u16, sample_rate: u32, samples: &[i16]) -> Vec<u8> {
        let spec = WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut cursor, spec).unwrap();
            for &s in samples {
                writer.write_sample(s).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    /// Mono 16-bit AIFF: FORM/AIFF with COMM and SSND chunks, big-endian
    fn encode_aiff(sample_rate: u32, samples: &[i16]) -> Vec<u8> {
        let data_len = (samples.len() * 2) as u32;
        let mut out = Vec::new();
        out.extend_from_slice(b"FORM");
        out.extend_from_slice(&(4 + 26 + 16 + data_len).to_be_bytes());
        out.extend_from_slice(b"AIFF");

        out.extend_from_slice(b"COMM");
        out.extend_from_slice(&18u32.to_be_bytes());
        out.extend_from_slice(&1i16.to_be_bytes());
        out.extend_from_slice(&(samples.len() as u32).to_be_bytes());
        out.extend_from_slice(&16i16.to_be_bytes());
        // 80-bit extended float: biased exponent, then mantissa with explicit integer bit
        let rate = sample_rate as u64;
        let bits = 64 - rate.leading_zeros();
        out.extend_from_slice(&((16383 + bits - 1) as u16).to_be_bytes());
        out.extend_from_slice(&(rate << (64 - bits)).to_be_bytes());

        out.extend_from_slice(b"SSND");
        out.extend_from_slice(&(8 + data_len).to_be_bytes());
        out.extend_from_slice(&0u32.to_be_bytes());
        out.extend_from_slice(&0u32.to_be_bytes());
        for s in samples {
            out.extend_from_slice(&s.to_be_bytes());
        }
        out
    }

    #[test]
    fn test_to_mono_averages_frames() {
        let audio = AudioData {
            samples: vec![1.0, 0.0, -0.5, -0.5, 0.25, 0.75],
            sample_rate: 8000,
            channels: 2,
            frame_count: 3,
        };

        assert_eq!(audio.to_mono(), vec![0.5, -0.5, 0.5]);
    }

    #[test]
    fn test_wav_mono_passthrough_and_duration() {
        let bytes = encode_wav(1, 8000, &vec![0; 4000]);
        let audio = ingest_audio(&bytes, Some("wav")).unwrap();

        assert_eq!(audio.sample_rate, 8000);
        assert_eq!(audio.frame_count, 4000);
        assert_eq!(audio.duration_secs(), 0.5);
        assert_eq!(audio.to_mono().len(), 4000);
    }

    #[test]
    fn test_wav_16bit_stereo_is_normalized() {
        let bytes = encode_wav(2, 16000, &[16384, -16384, 0, 32767]);

        let audio = ingest_audio(&bytes, None).unwrap();
        assert_eq!(audio.channels, 2);
        assert_eq!(audio.frame_count, 2);
        assert!((audio.samples[0] - 0.5).abs() < 1e-3);
        assert!((audio.samples[1] + 0.5).abs() < 1e-3);

        let mono = audio.to_mono();
        assert!(mono[0].abs() < 1e-3);
        assert!((mono[1] - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_aiff_container_decodes() {
        let bytes = encode_aiff(16000, &[16384, -16384, 0, 8192]);

        let audio = ingest_audio(&bytes, None).unwrap();
        assert_eq!(audio.sample_rate, 16000);
        assert_eq!(audio.channels, 1);
        assert_eq!(audio.frame_count, 4);
        assert!((audio.samples[0] - 0.5).abs() < 1e-3);
        assert!((audio.samples[1] + 0.5).abs() < 1e-3);
        assert!((audio.samples[3] - 0.25).abs() < 1e-3);
    }

    #[test]
    fn test_ingest_garbage_fails() {
        let result = ingest_audio(b"definitely not an audio file", None);
        assert!(matches!(result, Err(AudioError::Decode(_))));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = load_audio_file(Path::new("/nonexistent/recording.wav"));
        assert!(matches!(result, Err(AudioError::Io(_))));
    }
}
