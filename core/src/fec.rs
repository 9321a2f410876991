//! Reed-Solomon forward error correction over GF(2^8).
//!
//! Encodes 40-byte messages into 56-byte codewords (16 parity bytes,
//! systematic — data bytes first, parity appended) and corrects up to 8
//! byte errors at unknown positions on decode. Error positions are not
//! known a priori (this is error *correction*, not erasure decoding), so
//! the classical syndrome / Berlekamp-Massey / Chien-search decoder in
//! the `reed-solomon` crate is used rather than an erasure-only codec.

use crate::error::{ModemError, Result};
use crate::{RS_DATA_SIZE, RS_PARITY, RS_TOTAL_SIZE};
use reed_solomon::{Decoder, Encoder};

pub struct FecEncoder {
    encoder: Encoder,
}

pub struct FecDecoder {
    decoder: Decoder,
    encoder: Encoder,
}

impl FecEncoder {
    pub fn new() -> Self {
        Self {
            encoder: Encoder::new(RS_PARITY),
        }
    }

    /// Encodes a 40-byte message into a 56-byte systematic codeword.
    pub fn encode(&self, data: &[u8; RS_DATA_SIZE]) -> [u8; RS_TOTAL_SIZE] {
        let buffer = self.encoder.encode(data);
        let mut out = [0u8; RS_TOTAL_SIZE];
        out.copy_from_slice(&buffer[..RS_TOTAL_SIZE]);
        out
    }
}

impl FecDecoder {
    pub fn new() -> Self {
        Self {
            decoder: Decoder::new(RS_PARITY),
            encoder: Encoder::new(RS_PARITY),
        }
    }

    /// Corrects up to 8 byte errors in a 56-byte codeword and returns the
    /// recovered 40-byte message together with the number of byte
    /// positions that were corrected.
    ///
    /// The underlying decoder does not itself report an errata count, so
    /// it is derived here: the corrected message is re-encoded into its
    /// canonical codeword and compared byte-for-byte against the input,
    /// which is exact regardless of which positions were in error.
    pub fn decode(&self, codeword: &[u8; RS_TOTAL_SIZE]) -> Result<([u8; RS_DATA_SIZE], usize)> {
        let mut buf = *codeword;
        let corrected = self.decoder.correct(&mut buf, None).map_err(|_| {
            log::warn!("FEC decode failed: more than 8 byte errors in a {RS_TOTAL_SIZE}-byte codeword");
            ModemError::FecDecodeFailure
        })?;

        let mut data = [0u8; RS_DATA_SIZE];
        data.copy_from_slice(&corrected.data()[..RS_DATA_SIZE]);

        let canonical = self.encoder.encode(&data);
        let errata_count = canonical
            .iter()
            .zip(codeword.iter())
            .filter(|(a, b)| a != b)
            .count();

        if errata_count > 0 {
            log::debug!("FEC corrected {errata_count} byte error(s)");
        }

        Ok((data, errata_count))
    }
}

impl Default for FecEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for FecDecoder {
    fn default() -> Self {
        Self::new()
    }
}
