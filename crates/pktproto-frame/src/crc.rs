//! CRC16-CCITT (poly 0x1021, seed 0xFFFF, MSB first).
//!
//! The continuation form lets a checksum span the frame header and the
//! payload without copying them into one buffer.

/// Initial value of the running checksum.
pub const CRC16_SEED: u16 = 0xFFFF;

/// Generator polynomial.
pub const CRC16_POLY: u16 = 0x1021;

/// Checksum of `data` from the standard seed.
#[inline]
pub fn crc16(data: &[u8]) -> u16 {
    crc16_continue(CRC16_SEED, data)
}

/// Continue a running checksum over `data`.
pub fn crc16_continue(mut crc: u16, data: &[u8]) -> u16 {
    for &byte in data {
        crc ^= u16::from(byte) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ CRC16_POLY;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn empty_input_returns_seed() {
        assert_eq!(crc16(&[]), CRC16_SEED);
        assert_eq!(crc16_continue(0x1234, &[]), 0x1234);
    }

    #[test]
    fn ccitt_false_check_value() {
        // Standard check value for CRC-16/CCITT-FALSE.
        assert_eq!(crc16(b"123456789"), 0x29B1);
    }

    #[test]
    fn fixture_frame_checksum() {
        let covered = [
            0x55, 0xAA, 0x01, 0x0A, 0x00, 0x68, 0x65, 0x6C, 0x6C, 0x6F, 0x77, 0x6F, 0x72, 0x6C,
            0x64,
        ];
        assert_eq!(crc16(&covered), 0xDA84);
    }

    #[test]
    fn seeded_continue_matches_plain() {
        let data = b"hello, serial link";
        assert_eq!(crc16(data), crc16_continue(CRC16_SEED, data));
    }

    proptest! {
        #[test]
        fn continuation_equals_concatenation(
            a in prop::collection::vec(any::<u8>(), 0..128),
            b in prop::collection::vec(any::<u8>(), 0..128),
        ) {
            let mut joined = a.clone();
            joined.extend_from_slice(&b);
            let split = crc16_continue(crc16_continue(CRC16_SEED, &a), &b);
            prop_assert_eq!(split, crc16(&joined));
        }
    }
}
