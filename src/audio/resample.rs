// Sample rate conversion
// Brings decoded recordings to the fixed analysis rate before feature extraction

use rubato::{FastFixedIn, PolynomialDegree, Resampler};

use crate::audio::AudioError;

/// Resample a mono signal from `from_rate` to `to_rate`
/// Returns a copy when the rates already match
pub fn resample_mono(
    samples: &[f32],
    from_rate: u32,
    to_rate: u32,
) -> Result<Vec<f32>, AudioError> {
    if from_rate == 0 || to_rate == 0 {
        return Err(AudioError::InvalidData);
    }

    if from_rate == to_rate {
        return Ok(samples.to_vec());
    }

    if samples.is_empty() {
        return Ok(Vec::new());
    }

    log::debug!(
        "Resampling {} frames from {} Hz to {} Hz",
        samples.len(),
        from_rate,
        to_rate
    );

    // Whole recording in a single chunk; utterances are short
    let mut resampler = FastFixedIn::<f32>::new(
        to_rate as f64 / from_rate as f64,
        1.0,
        PolynomialDegree::Septic,
        samples.len(),
        1,
    )
    .map_err(|e| AudioError::Resample(e.to_string()))?;

    let planar_input = vec![samples.to_vec()];
    let mut output = resampler
        .process(&planar_input, None)
        .map_err(|e| AudioError::Resample(e.to_string()))?;

    Ok(output.pop().unwrap_or_default())
}
