//! Symbol and packet recovery from a located chirp preamble.
//!
//! Each symbol is demodulated by correlating its samples against every
//! candidate Walsh row on both a sine and a cosine basis and taking the
//! row whose combined envelope `sqrt(corr_sin^2 + corr_cos^2)` is
//! largest. The envelope is insensitive to the random per-symbol phase
//! offset the modulator applies (`sin(x+phase)` projects onto a fixed
//! linear combination of the sine and cosine bases), so no carrier
//! recovery is needed; ties fall to the lowest-valued candidate.

use crate::hadamard::hadamard_matrix;
use crate::modes::ModemConfig;
use crate::{BASE_FREQ, CHIRP_SAMPLES, RS_TOTAL_SIZE};
use std::f64::consts::PI;

/// Precomputed sine/cosine basis vectors for each tone, one chip long.
struct ToneBasis {
    sin: Vec<Vec<f32>>,
    cos: Vec<Vec<f32>>,
}

fn build_tone_basis(config: &ModemConfig) -> ToneBasis {
    let samples_per_chip = config.samples_per_chip();
    let chip_duration_s = config.symbol_duration_ms / 1000.0 / config.num_tones as f64;

    let mut sin = Vec::with_capacity(config.num_tones);
    let mut cos = Vec::with_capacity(config.num_tones);
    for tone_idx in 0..config.num_tones {
        let freq = BASE_FREQ + tone_idx as f64 * config.tone_spacing_hz;
        let mut sin_row = Vec::with_capacity(samples_per_chip);
        let mut cos_row = Vec::with_capacity(samples_per_chip);
        for n in 0..samples_per_chip {
            let t = n as f64 / samples_per_chip as f64 * chip_duration_s;
            let phase = 2.0 * PI * freq * t;
            sin_row.push(phase.sin() as f32);
            cos_row.push(phase.cos() as f32);
        }
        sin.push(sin_row);
        cos.push(cos_row);
    }
    ToneBasis { sin, cos }
}

/// Decides which Walsh row (symbol value) best matches one symbol's
/// worth of samples.
fn demodulate_symbol(segment: &[f32], hadamard: &[Vec<i8>], basis: &ToneBasis, samples_per_chip: usize) -> usize {
    let mut best_value = 0usize;
    let mut best_energy = f32::MIN;

    for (value, row) in hadamard.iter().enumerate() {
        let mut corr_sin = 0.0f32;
        let mut corr_cos = 0.0f32;
        for (chip_idx, &chip_sign) in row.iter().enumerate() {
            let chip_start = chip_idx * samples_per_chip;
            let chip = &segment[chip_start..chip_start + samples_per_chip];
            let sin_basis = &basis.sin[chip_idx];
            let cos_basis = &basis.cos[chip_idx];

            let mut s = 0.0f32;
            let mut c = 0.0f32;
            for n in 0..samples_per_chip {
                s += chip[n] * sin_basis[n];
                c += chip[n] * cos_basis[n];
            }
            corr_sin += chip_sign as f32 * s;
            corr_cos += chip_sign as f32 * c;
        }

        let energy = (corr_sin * corr_sin + corr_cos * corr_cos).sqrt();
        if energy > best_energy {
            best_energy = energy;
            best_value = value;
        }
    }
    best_value
}

fn push_bits(bits: &mut Vec<u8>, value: usize, width: usize) {
    for i in (0..width).rev() {
        bits.push(((value >> i) & 1) as u8);
    }
}

/// Demodulates the packet whose chirp preamble starts at `packet_start`
/// in `signal`, returning the raw 56-byte codeword. Returns `None` if
/// `signal` is too short to contain a full packet from that offset.
pub fn demodulate_packet(
    signal: &[f32],
    packet_start: usize,
    config: &ModemConfig,
) -> Option<[u8; RS_TOTAL_SIZE]> {
    let symbols_start = packet_start + CHIRP_SAMPLES;
    let num_symbols = (RS_TOTAL_SIZE * 8).div_ceil(config.bits_per_symbol as usize);
    let needed = num_symbols * config.samples_per_symbol;
    if symbols_start + needed > signal.len() {
        return None;
    }

    let hadamard = hadamard_matrix(config.num_tones).ok()?;
    let basis = build_tone_basis(config);
    let samples_per_chip = config.samples_per_chip();

    let mut bits = Vec::with_capacity(num_symbols * config.bits_per_symbol as usize);
    for symbol_idx in 0..num_symbols {
        let start = symbols_start + symbol_idx * config.samples_per_symbol;
        let segment = &signal[start..start + config.samples_per_symbol];
        let value = demodulate_symbol(segment, &hadamard, &basis, samples_per_chip);
        push_bits(&mut bits, value, config.bits_per_symbol as usize);
    }

    bits.truncate(RS_TOTAL_SIZE * 8);
    bits.resize(RS_TOTAL_SIZE * 8, 0);

    let mut codeword = [0u8; RS_TOTAL_SIZE];
    for (i, byte) in codeword.iter_mut().enumerate() {
        let mut value = 0u8;
        for bit in &bits[i * 8..i * 8 + 8] {
            value = (value << 1) | bit;
        }
        *byte = value;
    }
    Some(codeword)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framing::frame;
    use crate::modes::mode_by_name;
    use crate::modulator::assemble_packet_signal;

    #[test]
    fn recovers_codeword_without_noise() {
        let config = mode_by_name("DEFAULT").unwrap();
        let codeword = frame(b"walsh fsk demod test", 4, 9);
        let signal = assemble_packet_signal(&codeword, &config);

        let recovered = demodulate_packet(&signal, 0, &config).unwrap();
        assert_eq!(recovered, codeword);
    }

    #[test]
    fn recovers_codeword_in_robust_mode() {
        let config = mode_by_name("ROBUST").unwrap();
        let codeword = frame(b"x", 1, 1);
        let signal = assemble_packet_signal(&codeword, &config);

        let recovered = demodulate_packet(&signal, 0, &config).unwrap();
        assert_eq!(recovered, codeword);
    }

    #[test]
    fn returns_none_when_signal_too_short() {
        let config = mode_by_name("DEFAULT").unwrap();
        let short_signal = vec![0.0f32; CHIRP_SAMPLES + 10];
        assert!(demodulate_packet(&short_signal, 0, &config).is_none());
    }

    #[test]
    fn survives_mild_additive_noise() {
        let config = mode_by_name("DEFAULT").unwrap();
        let codeword = frame(b"noisy channel test message", 1, 1);
        let mut signal = assemble_packet_signal(&codeword, &config);
        for (i, s) in signal.iter_mut().enumerate() {
            let noise = ((i as f32 * 0.7).sin()) * 0.02;
            *s += noise;
        }
        let recovered = demodulate_packet(&signal, 0, &config).unwrap();
        assert_eq!(recovered, codeword);
    }
}
