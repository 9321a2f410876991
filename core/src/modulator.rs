//! Walsh-coded multi-tone FSK modulator: turns a framed packet's bytes
//! into PCM samples, and a full message into a WAV buffer.

use crate::chirp::generate_chirp;
use crate::error::Result;
use crate::framing::frame;
use crate::hadamard::hadamard_matrix;
use crate::modes::ModemConfig;
use crate::wav::write_wav;
use crate::{BASE_FREQ, PAYLOAD_SIZE, RS_TOTAL_SIZE, SAMPLE_RATE, SILENCE_SAMPLES};
use rand::seq::SliceRandom;
use std::f64::consts::PI;

const PHASE_CHOICES: [f64; 4] = [0.0, PI / 2.0, PI, -PI / 2.0];

/// Splits a 56-byte framed packet into `bits_per_symbol`-wide groups
/// (MSB-first within each byte, zero-padded on the final group) and
/// synthesizes the Walsh-coded multi-tone waveform for the whole packet.
pub(crate) fn bytes_to_signal(framed: &[u8; RS_TOTAL_SIZE], config: &ModemConfig) -> Vec<f32> {
    let bits_per_symbol = config.bits_per_symbol as usize;
    let total_bits = framed.len() * 8;
    let num_symbols = total_bits.div_ceil(bits_per_symbol);

    let hadamard = hadamard_matrix(config.num_tones).expect("mode config has power-of-two tones");
    let samples_per_chip = config.samples_per_chip();
    let chip_duration_s = config.symbol_duration_ms / 1000.0 / config.num_tones as f64;
    let frequencies: Vec<f64> = (0..config.num_tones)
        .map(|i| BASE_FREQ + i as f64 * config.tone_spacing_hz)
        .collect();

    let mut signal = vec![0.0f32; num_symbols * config.samples_per_symbol];
    let mut rng = rand::thread_rng();

    for symbol_idx in 0..num_symbols {
        let symbol_value = read_bit_group(framed, symbol_idx * bits_per_symbol, bits_per_symbol);
        let walsh_row = &hadamard[symbol_value];
        let phase = *PHASE_CHOICES.choose(&mut rng).unwrap();

        let symbol_start = symbol_idx * config.samples_per_symbol;
        for (chip_idx, &chip_val) in walsh_row.iter().enumerate() {
            let freq = frequencies[chip_idx];
            let chip_start = symbol_start + chip_idx * samples_per_chip;
            for n in 0..samples_per_chip {
                let t = n as f64 / samples_per_chip as f64 * chip_duration_s;
                let tone = (2.0 * PI * freq * t + phase).sin() * chip_val as f64;
                signal[chip_start + n] = tone as f32;
            }
        }
    }
    signal
}

/// Reads `width` bits starting at bit offset `start` from a byte slice,
/// MSB-first, returning them as an integer. Bits past the end of `bytes`
/// are treated as zero (tail padding).
fn read_bit_group(bytes: &[u8], start: usize, width: usize) -> usize {
    let mut value = 0usize;
    for i in 0..width {
        let bit_index = start + i;
        let byte_index = bit_index / 8;
        let bit = if byte_index < bytes.len() {
            let shift = 7 - (bit_index % 8);
            (bytes[byte_index] >> shift) & 1
        } else {
            0
        };
        value = (value << 1) | bit as usize;
    }
    value
}

/// Builds one packet's full waveform: chirp preamble, Walsh-FSK symbols,
/// trailing silence.
pub(crate) fn assemble_packet_signal(framed: &[u8; RS_TOTAL_SIZE], config: &ModemConfig) -> Vec<f32> {
    let mut signal = generate_chirp();
    signal.extend(bytes_to_signal(framed, config));
    signal.extend(std::iter::repeat(0.0f32).take(SILENCE_SAMPLES));
    signal
}

/// Encodes `text` as a complete WAV buffer at the given mode: chunks the
/// UTF-8 bytes into 32-byte payloads, frames and modulates each, then
/// peak-normalizes the concatenated waveform.
pub fn encode_message(text: &str, config: &ModemConfig) -> Result<Vec<u8>> {
    let bytes = text.as_bytes();
    let chunks: Vec<&[u8]> = if bytes.is_empty() {
        vec![&[][..]]
    } else {
        bytes.chunks(PAYLOAD_SIZE).collect()
    };
    let total_packets = chunks.len() as u16;

    let mut waveform = Vec::new();
    for (i, chunk) in chunks.into_iter().enumerate() {
        let packet_num = (i + 1) as u16;
        log::debug!(
            "modulating packet {packet_num}/{total_packets} ({} bytes) in mode {}",
            chunk.len(),
            config.name
        );
        let framed = frame(chunk, packet_num, total_packets);
        waveform.extend(assemble_packet_signal(&framed, config));
    }

    normalize_peak(&mut waveform);
    write_wav(&waveform, SAMPLE_RATE)
}

/// Scales `signal` so its peak absolute amplitude is 1.0, leaving it
/// untouched if the peak is below `1e-9` (effectively silent).
fn normalize_peak(signal: &mut [f32]) {
    let peak = signal.iter().fold(0.0f32, |m, &s| m.max(s.abs()));
    if peak >= 1e-9 {
        for s in signal.iter_mut() {
            *s /= peak;
        }
    }
}
