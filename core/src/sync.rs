//! Frame synchronization: locates chirp preambles in a received signal so
//! the demodulator knows where each packet's symbols start.
//!
//! The signal is first run through a simple AGC (so correlation
//! thresholds are independent of recording level), then cross-correlated
//! against the canonical chirp template. A peak only counts as a chirp if
//! the correlation's global maximum clears an absolute floor (so pure
//! noise never produces a "detection") and the peak itself clears half
//! that maximum; candidate peaks are then refined to the local maximum
//! within a tolerance window around the expected inter-packet spacing, so
//! near-threshold ripple doesn't produce duplicate detections a few
//! samples apart.

use crate::chirp::generate_chirp;
use crate::error::Result;
use crate::fft_correlation::{fft_correlate_1d, Mode};
use crate::modes::ModemConfig;
use crate::{CHIRP_SAMPLES, RS_TOTAL_SIZE, SILENCE_SAMPLES};

/// Absolute floor on the correlation's global maximum; below this the
/// signal is treated as containing no chirp at all.
pub const MIN_CORRELATION_THRESHOLD: f32 = 10.0;

/// Fraction of the global correlation maximum a local peak must clear to
/// be accepted as a packet start.
pub const SYNC_CORRELATION_THRESHOLD_FACTOR: f32 = 0.5;

/// Target RMS for the automatic gain control pass.
const AGC_TARGET_RMS: f32 = 0.1;

/// Scales `signal` so its RMS amplitude is `target_rms`; returns it
/// unchanged if it is at or near silence.
fn apply_agc(signal: &[f32], target_rms: f32) -> Vec<f32> {
    if signal.is_empty() {
        return Vec::new();
    }
    let mean_square = signal.iter().map(|&s| s * s).sum::<f32>() / signal.len() as f32;
    let rms = mean_square.sqrt();
    if rms < 1e-9 {
        return signal.to_vec();
    }
    let gain = target_rms / rms;
    signal.iter().map(|&s| s * gain).collect()
}

/// Number of samples occupied by one full packet (symbols only, no
/// chirp or trailing silence) at `config`'s symbol rate.
fn samples_per_packet(config: &ModemConfig) -> usize {
    let num_symbols = (RS_TOTAL_SIZE * 8).div_ceil(config.bits_per_symbol as usize);
    num_symbols * config.samples_per_symbol
}

/// Expected distance in samples between one packet's chirp start and the
/// next: chirp length plus one packet's worth of symbols. The trailing
/// silence between packets is not counted here, matching the reference
/// formula; the 10%-of-stride search window below absorbs the gap.
fn frame_stride(config: &ModemConfig) -> usize {
    CHIRP_SAMPLES + samples_per_packet(config)
}

/// Finds the sample offsets at which chirp preambles begin in `signal`,
/// assuming packets were transmitted at `config`'s symbol rate. Returns
/// an empty vector if no chirp is present at all.
pub fn find_packet_starts(signal: &[f32], config: &ModemConfig) -> Result<Vec<usize>> {
    let agc_signal = apply_agc(signal, AGC_TARGET_RMS);
    let template = generate_chirp();
    let correlation = fft_correlate_1d(&agc_signal, &template, Mode::Valid)?;
    if correlation.is_empty() {
        return Ok(Vec::new());
    }

    let global_max = correlation.iter().cloned().fold(f32::MIN, f32::max);
    if global_max <= MIN_CORRELATION_THRESHOLD {
        log::debug!(
            "mode {} rejected: peak correlation {global_max:.3} below floor {MIN_CORRELATION_THRESHOLD}",
            config.name
        );
        return Ok(Vec::new());
    }
    let peak_threshold = global_max * SYNC_CORRELATION_THRESHOLD_FACTOR;

    let stride = frame_stride(config);
    let window_half = ((stride as f64 * 0.1).round() as usize).max(1);

    let mut peaks = Vec::new();
    let mut search_start = 0usize;
    while search_start < correlation.len() {
        let seed_idx = match correlation[search_start..]
            .iter()
            .position(|&v| v > peak_threshold)
        {
            Some(offset) => search_start + offset,
            None => break,
        };

        let window_start = seed_idx.saturating_sub(window_half);
        let window_end = (seed_idx + window_half + 1).min(correlation.len());
        let (peak_idx, _) = correlation[window_start..window_end]
            .iter()
            .enumerate()
            .fold((window_start, f32::MIN), |(best_idx, best_val), (i, &v)| {
                if v > best_val {
                    (window_start + i, v)
                } else {
                    (best_idx, best_val)
                }
            });

        peaks.push(peak_idx);
        search_start = peak_idx + stride.saturating_sub(window_half).max(1);
    }

    if peaks.is_empty() {
        log::debug!(
            "mode {} rejected: no correlation sample above threshold {peak_threshold:.3}",
            config.name
        );
    }

    Ok(peaks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::mode_by_name;

    #[test]
    fn finds_single_chirp_near_expected_offset() {
        let config = mode_by_name("DEFAULT").unwrap();
        let offset = 800;
        let mut signal = vec![0.0f32; offset];
        signal.extend(generate_chirp());
        signal.extend(vec![0.0f32; samples_per_packet(&config)]);

        let peaks = find_packet_starts(&signal, &config).unwrap();
        assert_eq!(peaks.len(), 1);
        assert!((peaks[0] as i64 - offset as i64).abs() <= 2);
    }

    #[test]
    fn finds_two_chirps_at_expected_spacing() {
        let config = mode_by_name("DEFAULT").unwrap();
        // The true gap between chirp starts includes the trailing silence,
        // which `frame_stride` itself does not count; the window-search
        // tolerance is what makes this still resolve to two distinct peaks.
        let true_spacing = CHIRP_SAMPLES + samples_per_packet(&config) + SILENCE_SAMPLES;
        let mut signal = Vec::new();
        for _ in 0..2 {
            signal.extend(generate_chirp());
            signal.extend(vec![0.0f32; samples_per_packet(&config) + SILENCE_SAMPLES]);
        }

        let peaks = find_packet_starts(&signal, &config).unwrap();
        assert_eq!(peaks.len(), 2);
        assert!((peaks[1] as i64 - peaks[0] as i64 - true_spacing as i64).abs() <= 4);
    }

    #[test]
    fn pure_noise_yields_no_peaks() {
        let config = mode_by_name("DEFAULT").unwrap();
        // Deterministic pseudo-noise: no PRNG dependency needed, just a
        // signal with no chirp-shaped structure in it.
        let signal: Vec<f32> = (0..16000)
            .map(|i| ((i as f32 * 12.9898).sin() * 43758.5453).fract())
            .collect();
        let peaks = find_packet_starts(&signal, &config).unwrap();
        assert!(peaks.is_empty());
    }

    #[test]
    fn empty_signal_yields_no_peaks() {
        let config = mode_by_name("DEFAULT").unwrap();
        assert!(find_packet_starts(&[], &config).unwrap().is_empty());
    }
}
