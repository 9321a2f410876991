use thiserror::Error;

/// Errors produced by the modem core.
///
/// Data conditions that are expected in normal operation (no chirp peaks,
/// a CRC mismatch on one packet, an uncorrectable FEC block) are *not*
/// represented here — they are folded into the receive pipeline's normal
/// return values (see `pipeline::decode_message`). This enum covers calls
/// that cannot be completed at all.
#[derive(Debug, Error)]
pub enum ModemError {
    #[error("reed-solomon decode failure: more than 8 byte errors")]
    FecDecodeFailure,

    #[error("invalid modem configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown modem mode: {0}")]
    UnknownMode(String),

    #[error("unsupported sample rate {0} Hz, expected 16000 Hz")]
    UnsupportedSampleRate(u32),

    #[error("wav container error: {0}")]
    WavError(#[from] hound::Error),

    #[error("fft error: {0}")]
    FftError(String),

    #[error("invalid input size")]
    InvalidInputSize,

    #[error("insufficient data")]
    InsufficientData,

    #[error("payload exceeds maximum message size")]
    PayloadTooLarge,
}

pub type Result<T> = std::result::Result<T, ModemError>;
