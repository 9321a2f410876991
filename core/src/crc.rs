//! CRC-32 checksum over a packet's header+payload, for post-FEC integrity
//! verification. Uses the standard IEEE 802.3 / zlib polynomial
//! (`CRC-32/ISO-HDLC`), matching `zlib.crc32` byte-for-byte.

use crc::{Crc, CRC_32_ISO_HDLC};

const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// Computes the CRC-32/ISO-HDLC checksum of `data`.
pub fn crc32(data: &[u8]) -> u32 {
    CRC32.checksum(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vector() {
        // zlib.crc32(b"123456789") == 0xCBF43926
        assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn empty_input() {
        assert_eq!(crc32(b""), 0);
    }

    #[test]
    fn single_bit_flip_changes_checksum() {
        let a = crc32(b"Hello World!");
        let b = crc32(b"Hello World\"");
        assert_ne!(a, b);
    }
}
