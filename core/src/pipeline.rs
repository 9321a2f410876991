//! Receive pipeline: ties synchronization, demodulation and framing
//! together into the two operations external callers actually want — a
//! best-effort text recovery, and a diagnostic trace of every packet
//! candidate found.

use crate::demodulator::demodulate_packet;
use crate::error::{ModemError, Result};
use crate::framing::unframe;
use crate::modes::{registered_modes, trial_order};
use crate::sync::find_packet_starts;
use crate::{PAYLOAD_SIZE, SAMPLE_RATE};
use std::collections::BTreeMap;

/// Sentinel text returned when no registered mode recovers a single
/// CRC-valid packet.
const NO_DECODE_MESSAGE: &str = "[Could not detect modem mode or decode message]";

/// Result of a best-effort message recovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOutcome {
    pub text: String,
    /// Name of the mode that produced the decode, or empty on failure.
    pub detected_mode: String,
}

/// Per-packet diagnostic record produced by [`analyze`].
#[derive(Debug, Clone, PartialEq)]
pub struct PacketAnalysis {
    pub packet_index: usize,
    pub found_at_s: f64,
    pub rs_decode_success: bool,
    pub rs_errors_corrected: i32,
    pub crc_valid: bool,
    pub packet_num: Option<u16>,
    pub total_packets: Option<u16>,
}

/// Result of an [`analyze`] pass: the mode the analysis settled on (if
/// any) and per-peak findings at that mode.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzeOutcome {
    pub mode: Option<String>,
    pub analyses: Vec<PacketAnalysis>,
}

/// Recovers a text message from a 16 kHz mono PCM buffer.
///
/// Tries `hinted_mode` first, then every other registered mode, stopping
/// at the first mode that yields at least one CRC-valid packet. Packets
/// are deduplicated by packet number (first decode wins); missing
/// packets leave a gap in the reassembled byte stream. Trailing zero
/// bytes (payload padding on the final packet) are stripped before UTF-8
/// decoding, which is lossy.
pub fn decode_message(pcm: &[f32], sample_rate: u32, hinted_mode: &str) -> Result<DecodeOutcome> {
    if sample_rate != SAMPLE_RATE {
        return Err(ModemError::UnsupportedSampleRate(sample_rate));
    }

    for config in trial_order(hinted_mode) {
        let peaks = find_packet_starts(pcm, &config)?;

        let mut packets: BTreeMap<u16, [u8; PAYLOAD_SIZE]> = BTreeMap::new();
        let mut max_total: Option<u16> = None;
        let mut any_crc_valid = false;

        for &peak in &peaks {
            let Some(codeword) = demodulate_packet(pcm, peak, &config) else {
                continue;
            };
            let result = unframe(&codeword);
            if !result.crc_ok {
                continue;
            }
            any_crc_valid = true;
            if let (Some(payload), Some(num)) = (result.payload, result.packet_num) {
                packets.entry(num).or_insert(payload);
            }
            if let Some(total) = result.total_packets {
                max_total = Some(max_total.map_or(total, |m| m.max(total)));
            }
        }

        if !any_crc_valid {
            continue;
        }

        let total_packets = max_total.unwrap_or(packets.len() as u16).max(1);
        let mut message = Vec::new();
        for packet_num in 1..=total_packets {
            if let Some(payload) = packets.get(&packet_num) {
                message.extend_from_slice(payload);
            }
        }
        while message.last() == Some(&0) {
            message.pop();
        }

        return Ok(DecodeOutcome {
            text: String::from_utf8_lossy(&message).into_owned(),
            detected_mode: config.name.to_string(),
        });
    }

    Ok(DecodeOutcome {
        text: NO_DECODE_MESSAGE.to_string(),
        detected_mode: String::new(),
    })
}

/// Produces a diagnostic trace of every chirp-located packet candidate.
///
/// Unlike [`decode_message`], modes are tried in plain registry order
/// (no hint), and the scan stops at the first mode with at least one
/// CRC-valid packet, returning that mode's full per-peak trace. If no
/// mode finds a single valid packet, `mode` is `None` and `analyses` is
/// empty.
pub fn analyze(pcm: &[f32], sample_rate: u32) -> Result<AnalyzeOutcome> {
    if sample_rate != SAMPLE_RATE {
        return Err(ModemError::UnsupportedSampleRate(sample_rate));
    }

    for config in registered_modes() {
        let peaks = find_packet_starts(pcm, &config)?;
        let mut analyses = Vec::with_capacity(peaks.len());
        let mut any_crc_valid = false;

        for (packet_index, &peak) in peaks.iter().enumerate() {
            let found_at_s = peak as f64 / SAMPLE_RATE as f64;
            match demodulate_packet(pcm, peak, &config) {
                Some(codeword) => {
                    let result = unframe(&codeword);
                    any_crc_valid |= result.crc_ok;
                    analyses.push(PacketAnalysis {
                        packet_index,
                        found_at_s,
                        rs_decode_success: result.errors_corrected >= 0,
                        rs_errors_corrected: result.errors_corrected,
                        crc_valid: result.crc_ok,
                        packet_num: result.packet_num,
                        total_packets: result.total_packets,
                    });
                }
                None => analyses.push(PacketAnalysis {
                    packet_index,
                    found_at_s,
                    rs_decode_success: false,
                    rs_errors_corrected: -1,
                    crc_valid: false,
                    packet_num: None,
                    total_packets: None,
                }),
            }
        }

        if any_crc_valid {
            return Ok(AnalyzeOutcome {
                mode: Some(config.name.to_string()),
                analyses,
            });
        }
    }

    Ok(AnalyzeOutcome {
        mode: None,
        analyses: Vec::new(),
    })
}
