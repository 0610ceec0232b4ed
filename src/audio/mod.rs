// Audio processing module
// Handles decoding, resampling and acoustic feature extraction

pub mod features;
pub mod ingest;
pub mod resample;
pub mod types;

pub use features::{
    compute_features, extract_features, extract_features_from_bytes, features_for_audio,
    FeatureConfig,
};
pub use ingest::{ingest_audio, load_audio_file, AudioData, AudioError};
pub use resample::resample_mono;
pub use types::{AudioFeatures, FeatureKey};
