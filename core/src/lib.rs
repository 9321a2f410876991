//! Core modulation, framing and decoding library for a chirp-synchronized
//! Walsh-coded multi-tone FSK acoustic modem.
//!
//! The crate is split along the signal chain: [`chirp`] and [`hadamard`]
//! build the waveform primitives, [`framing`], [`fec`] and [`crc`] handle
//! packet integrity, [`modulator`] and [`wav`] produce transmit-side PCM,
//! and [`sync`], [`demodulator`] and [`pipeline`] recover packets and
//! messages from a received signal. [`modes`] ties modulation parameters
//! together as named profiles.

pub mod chirp;
pub mod crc;
pub mod demodulator;
pub mod error;
pub mod fec;
pub mod fft_correlation;
pub mod framing;
pub mod hadamard;
pub mod modes;
pub mod modulator;
pub mod pipeline;
pub mod resample;
pub mod sync;
pub mod wav;

pub use error::{ModemError, Result};
pub use modes::{mode_by_name, registered_modes, ModemConfig};
pub use modulator::encode_message;
pub use pipeline::{analyze, decode_message, AnalyzeOutcome, DecodeOutcome, PacketAnalysis};
pub use wav::read_wav;

/// PCM sample rate the entire signal chain operates at. The receive
/// pipeline rejects any other rate outright; callers resample first with
/// [`resample::resample_audio`].
pub const SAMPLE_RATE: u32 = 16000;

/// Base frequency of the lowest FSK tone, in Hz. Higher tones sit at
/// `BASE_FREQ + i * tone_spacing_hz`.
pub const BASE_FREQ: f64 = 1000.0;

/// Duration of the chirp preamble, in seconds.
pub const CHIRP_DURATION_S: f64 = 0.1;

/// Chirp preamble start frequency, in Hz.
pub const CHIRP_F0: f64 = 2500.0;

/// Chirp preamble end frequency, in Hz.
pub const CHIRP_F1: f64 = 3500.0;

/// `CHIRP_DURATION_S * SAMPLE_RATE`.
pub const CHIRP_SAMPLES: usize = 1600;

/// Silence inserted after each packet's symbols, in samples.
pub const SILENCE_SAMPLES: usize = 1600;

/// Maximum payload bytes carried by a single packet.
pub const PAYLOAD_SIZE: usize = 32;

/// Packet header size in bytes: packet number (u16) + total packets (u16).
pub const HEADER_SIZE: usize = 4;

/// CRC-32 trailer size in bytes.
pub const CRC_SIZE: usize = 4;

/// Reed-Solomon parity bytes appended per codeword.
pub const RS_PARITY: usize = 16;

/// Reed-Solomon message size: `HEADER_SIZE + PAYLOAD_SIZE + CRC_SIZE`.
pub const RS_DATA_SIZE: usize = HEADER_SIZE + PAYLOAD_SIZE + CRC_SIZE;

/// Reed-Solomon codeword size: `RS_DATA_SIZE + RS_PARITY`.
pub const RS_TOTAL_SIZE: usize = RS_DATA_SIZE + RS_PARITY;
