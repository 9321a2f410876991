//! Sample-rate and channel conversion for PCM buffers that didn't arrive
//! as 16 kHz mono. The receive pipeline itself only accepts 16 kHz mono
//! (see `ModemError::UnsupportedSampleRate`); these helpers exist for
//! callers (the CLI, the HTTP server) that want to accept arbitrary WAV
//! input and convert it before handing it to `pipeline::decode_message`.

/// Mixes interleaved stereo audio down to mono by averaging channels.
pub fn stereo_to_mono(samples: &[f32]) -> Vec<f32> {
    assert!(
        samples.len() % 2 == 0,
        "stereo audio must have an even number of samples"
    );
    samples
        .chunks(2)
        .map(|pair| (pair[0] + pair[1]) / 2.0)
        .collect()
}

/// Resamples `samples` from `from_rate` to `to_rate` by linear
/// interpolation. A no-op (returns a clone) when the rates already match.
pub fn resample_audio(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = to_rate as f64 / from_rate as f64;
    let new_length = (samples.len() as f64 * ratio).ceil() as usize;
    let mut resampled = Vec::with_capacity(new_length);

    for i in 0..new_length {
        let src_idx = i as f64 / ratio;
        let src_floor = src_idx.floor() as usize;
        let src_ceil = src_floor + 1;
        let fraction = (src_idx - src_floor as f64) as f32;

        let interpolated = if src_ceil < samples.len() {
            samples[src_floor] * (1.0 - fraction) + samples[src_ceil] * fraction
        } else {
            samples[src_floor]
        };
        resampled.push(interpolated);
    }
    resampled
}
