//! Deterministic linear up-chirp used as the frame synchronization
//! preamble. The exact same function is called by the modulator (to emit
//! the preamble) and the synchronizer (to build the correlation
//! template), so the two are always sample-identical.

use crate::{CHIRP_DURATION_S, CHIRP_F0, CHIRP_F1, CHIRP_SAMPLES, SAMPLE_RATE};
use std::f64::consts::PI;

/// Generates `CHIRP_SAMPLES` samples of a linear chirp sweeping from
/// `CHIRP_F0` to `CHIRP_F1` over `CHIRP_DURATION_S` seconds:
/// `sin(2*pi*(f0*t + (f1-f0)/(2*T) * t^2))`, `t = i / SAMPLE_RATE`.
pub fn generate_chirp() -> Vec<f32> {
    let k = (CHIRP_F1 - CHIRP_F0) / (2.0 * CHIRP_DURATION_S);
    (0..CHIRP_SAMPLES)
        .map(|i| {
            let t = i as f64 / SAMPLE_RATE as f64;
            let phase = 2.0 * PI * (CHIRP_F0 * t + k * t * t);
            phase.sin() as f32
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_expected_length() {
        assert_eq!(generate_chirp().len(), CHIRP_SAMPLES);
        assert_eq!(CHIRP_SAMPLES, 1600);
    }

    #[test]
    fn is_deterministic() {
        assert_eq!(generate_chirp(), generate_chirp());
    }

    #[test]
    fn starts_near_zero_phase() {
        let chirp = generate_chirp();
        assert!(chirp[0].abs() < 1e-6);
    }

    #[test]
    fn stays_within_unit_amplitude() {
        for sample in generate_chirp() {
            assert!(sample >= -1.0 && sample <= 1.0);
        }
    }
}
