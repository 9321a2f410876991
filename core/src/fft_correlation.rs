//! FFT-based cross-correlation for 1D real-valued signals.
//!
//! The synchronizer needs `numpy.correlate(signal, template, mode="valid")`
//! at chirp-template lengths against multi-second signals; a direct
//! O(N*M) time-domain correlation would be too slow, so this computes it
//! via FFT with O(N log N) complexity, using a thread-local planner cache
//! to avoid replanning on every call.

use crate::error::{ModemError, Result};
use realfft::RealFftPlanner;
use std::cell::RefCell;

thread_local! {
    static FFT_PLANNER: RefCell<RealFftPlanner<f32>> = RefCell::new(RealFftPlanner::new());
}

/// Output-length convention, matching `numpy.correlate`'s `mode` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// `signal.len() + template.len() - 1` samples.
    Full,
    /// `signal.len()` samples, centered.
    Same,
    /// `signal.len() - template.len() + 1` samples (only fully-overlapping
    /// positions). This is what the synchronizer uses.
    Valid,
}

fn next_power_of_two(n: usize) -> usize {
    if n == 0 {
        return 1;
    }
    let mut power = 1;
    while power < n {
        power <<= 1;
    }
    power
}

/// Cross-correlates `signal` against `template`, returning an empty
/// vector if either input is empty or (in `Valid` mode) if `signal` is
/// shorter than `template`.
pub fn fft_correlate_1d(signal: &[f32], template: &[f32], mode: Mode) -> Result<Vec<f32>> {
    if signal.is_empty() || template.is_empty() {
        return Ok(Vec::new());
    }
    if mode == Mode::Valid && signal.len() < template.len() {
        return Ok(Vec::new());
    }

    let output_len = signal.len() + template.len() - 1;
    let fft_size = next_power_of_two(output_len);

    let mut padded_signal = vec![0.0f32; fft_size];
    let mut padded_template = vec![0.0f32; fft_size];
    padded_signal[..signal.len()].copy_from_slice(signal);
    // Reverse the template; correlation is convolution with a
    // time-reversed kernel.
    for (i, &val) in template.iter().enumerate() {
        padded_template[template.len() - 1 - i] = val;
    }

    let (r2c, c2r) = FFT_PLANNER.with(|planner| {
        let mut planner_ref = planner.borrow_mut();
        (
            planner_ref.plan_fft_forward(fft_size),
            planner_ref.plan_fft_inverse(fft_size),
        )
    });

    let mut signal_spectrum = r2c.make_output_vec();
    let mut template_spectrum = r2c.make_output_vec();

    r2c.process(&mut padded_signal, &mut signal_spectrum)
        .map_err(|e| ModemError::FftError(format!("forward FFT on signal failed: {e:?}")))?;
    r2c.process(&mut padded_template, &mut template_spectrum)
        .map_err(|e| ModemError::FftError(format!("forward FFT on template failed: {e:?}")))?;

    for (s, t) in signal_spectrum.iter_mut().zip(template_spectrum.iter()) {
        *s *= t;
    }

    let mut result = vec![0.0f32; fft_size];
    c2r.process(&mut signal_spectrum, &mut result)
        .map_err(|e| ModemError::FftError(format!("inverse FFT failed: {e:?}")))?;

    let normalization = fft_size as f32;
    for v in result.iter_mut() {
        *v /= normalization;
    }

    match mode {
        Mode::Full => {
            result.truncate(output_len);
            Ok(result)
        }
        Mode::Same => {
            let start = (output_len - signal.len()) / 2;
            Ok(result[start..start + signal.len()].to_vec())
        }
        Mode::Valid => {
            let valid_len = signal.len() - template.len() + 1;
            let start = template.len() - 1;
            Ok(result[start..start + valid_len].to_vec())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_mode_length() {
        let signal = vec![1.0; 100];
        let template = vec![1.0; 10];
        let result = fft_correlate_1d(&signal, &template, Mode::Valid).unwrap();
        assert_eq!(result.len(), 91);
    }

    #[test]
    fn valid_mode_empty_when_template_longer_than_signal() {
        let signal = vec![1.0, 2.0];
        let template = vec![1.0; 10];
        let result = fft_correlate_1d(&signal, &template, Mode::Valid).unwrap();
        assert_eq!(result.len(), 0);
    }

    #[test]
    fn impulse_template_reproduces_signal() {
        let signal = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let template = vec![1.0, 0.0, 0.0];
        let result = fft_correlate_1d(&signal, &template, Mode::Full).unwrap();
        assert_eq!(result.len(), 7);
        assert!((result[2] - 1.0).abs() < 1e-4);
        assert!((result[6] - 5.0).abs() < 1e-4);
    }

    #[test]
    fn finds_known_offset() {
        let mut signal = vec![0.0f32; 50];
        let template: Vec<f32> = (0..10).map(|i| (i as f32 * 0.3).sin()).collect();
        signal[20..30].copy_from_slice(&template);
        let result = fft_correlate_1d(&signal, &template, Mode::Valid).unwrap();
        let (peak_idx, _) = result
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .unwrap();
        assert_eq!(peak_idx, 20);
    }
}
