//! Packet assembly and parsing: header + payload + CRC, wrapped in
//! Reed-Solomon FEC.

use crate::crc::crc32;
use crate::fec::{FecDecoder, FecEncoder};
use crate::{CRC_SIZE, HEADER_SIZE, PAYLOAD_SIZE, RS_DATA_SIZE, RS_TOTAL_SIZE};

/// Result of parsing a 56-byte codeword back into a logical packet.
///
/// Header fields are populated whenever FEC decode succeeds, even if the
/// CRC does not match, so the analyzer can report on partially-decoded
/// packets. `payload` is only `Some` when the CRC check passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnframeResult {
    pub payload: Option<[u8; PAYLOAD_SIZE]>,
    pub packet_num: Option<u16>,
    pub total_packets: Option<u16>,
    /// Number of byte errors corrected by FEC, or `-1` if FEC decode
    /// failed outright.
    pub errors_corrected: i32,
    pub crc_ok: bool,
}

impl UnframeResult {
    fn fec_failure() -> Self {
        Self {
            payload: None,
            packet_num: None,
            total_packets: None,
            errors_corrected: -1,
            crc_ok: false,
        }
    }
}

/// Builds a 56-byte framed, FEC-protected packet from a payload chunk of
/// at most 32 bytes (right-padded with zeros).
pub fn frame(chunk: &[u8], packet_num: u16, total_packets: u16) -> [u8; RS_TOTAL_SIZE] {
    debug_assert!(chunk.len() <= PAYLOAD_SIZE);

    let mut message = [0u8; RS_DATA_SIZE];
    message[0..2].copy_from_slice(&packet_num.to_be_bytes());
    message[2..4].copy_from_slice(&total_packets.to_be_bytes());
    let copy_len = chunk.len().min(PAYLOAD_SIZE);
    message[HEADER_SIZE..HEADER_SIZE + copy_len].copy_from_slice(&chunk[..copy_len]);

    let crc = crc32(&message[..HEADER_SIZE + PAYLOAD_SIZE]);
    message[HEADER_SIZE + PAYLOAD_SIZE..].copy_from_slice(&crc.to_be_bytes());
    debug_assert_eq!(HEADER_SIZE + PAYLOAD_SIZE + CRC_SIZE, RS_DATA_SIZE);

    FecEncoder::new().encode(&message)
}

/// Parses a 56-byte codeword back into header fields and (if the CRC
/// checks out) a payload.
pub fn unframe(codeword: &[u8; RS_TOTAL_SIZE]) -> UnframeResult {
    let (message, errata) = match FecDecoder::new().decode(codeword) {
        Ok(pair) => pair,
        Err(_) => return UnframeResult::fec_failure(),
    };

    let packet_content = &message[..HEADER_SIZE + PAYLOAD_SIZE];
    let received_crc = u32::from_be_bytes(
        message[HEADER_SIZE + PAYLOAD_SIZE..]
            .try_into()
            .expect("slice is CRC_SIZE bytes"),
    );
    let computed_crc = crc32(packet_content);
    let crc_ok = computed_crc == received_crc;

    let packet_num = u16::from_be_bytes(message[0..2].try_into().unwrap());
    let total_packets = u16::from_be_bytes(message[2..4].try_into().unwrap());

    if !crc_ok {
        log::warn!(
            "CRC mismatch on packet {packet_num}/{total_packets}: embedded {received_crc:#010x}, computed {computed_crc:#010x}"
        );
        return UnframeResult {
            payload: None,
            packet_num: Some(packet_num),
            total_packets: Some(total_packets),
            errors_corrected: errata as i32,
            crc_ok: false,
        };
    }

    let mut payload = [0u8; PAYLOAD_SIZE];
    payload.copy_from_slice(&packet_content[HEADER_SIZE..]);

    UnframeResult {
        payload: Some(payload),
        packet_num: Some(packet_num),
        total_packets: Some(total_packets),
        errors_corrected: errata as i32,
        crc_ok: true,
    }
}
