//! Variable-length integer encoding and decoding.
//!
//! This is the big-endian, 7-bits-per-byte encoding used by MIDI-style file
//! formats. Each byte carries:
//! - 7 bits of data
//! - 1 "continuation" bit (the high bit) indicating more bytes follow
//!
//! At most 4 bytes are used, so the largest representable value is the
//! 28-bit `0x0FFF_FFFF`. Leading all-zero groups are suppressed on encode,
//! except that the value zero still produces a single zero byte.

use crate::error::Error;

const DATA_BITS_PER_BYTE: usize = 7;
const DATA_BITS_MASK: u8 = 0x7F;
const CONTINUATION_BIT_MASK: u8 = 0x80;

/// Maximum number of bytes in an encoded value.
pub const MAX_LEN: usize = 4;

/// Largest value representable in four 7-bit groups.
pub const MAX_VALUE: u32 = 0x0FFF_FFFF;

/// Decodes a varint from the start of `bytes`.
///
/// Consumes up to [`MAX_LEN`] bytes, stopping at (and including) the first
/// byte without a continuation bit. Returns the decoded value and the number
/// of bytes consumed. An empty slice decodes as `(0, 0)`.
pub fn read(bytes: &[u8]) -> (u32, usize) {
    let mut value = 0u32;
    let mut consumed = 0;
    for &byte in bytes.iter().take(MAX_LEN) {
        consumed += 1;
        value = (value << DATA_BITS_PER_BYTE) | u32::from(byte & DATA_BITS_MASK);
        if byte & CONTINUATION_BIT_MASK == 0 {
            break;
        }
    }
    (value, consumed)
}

/// Encodes `value` as a varint into a fixed scratch array.
///
/// Returns the encoded bytes ([1, [`MAX_LEN`]] of them) as a slice of the
/// scratch array, or [`Error::ValueTooLarge`] if `value` exceeds
/// [`MAX_VALUE`].
pub fn write(value: u32, scratch: &mut [u8; MAX_LEN]) -> Result<&[u8], Error> {
    if value > MAX_VALUE {
        return Err(Error::ValueTooLarge(i64::from(value)));
    }
    let len = size(value);
    let mut shift = (len - 1) * DATA_BITS_PER_BYTE;
    for (i, slot) in scratch[..len].iter_mut().enumerate() {
        let mut byte = ((value >> shift) as u8) & DATA_BITS_MASK;
        if i + 1 < len {
            byte |= CONTINUATION_BIT_MASK;
        }
        *slot = byte;
        shift = shift.saturating_sub(DATA_BITS_PER_BYTE);
    }
    Ok(&scratch[..len])
}

/// Calculates the number of bytes needed to encode `value`.
pub fn size(value: u32) -> usize {
    let data_bits = (32 - value.leading_zeros()) as usize;
    usize::max(1, data_bits.div_ceil(DATA_BITS_PER_BYTE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_one_byte() {
        let mut scratch = [0u8; MAX_LEN];
        let encoded = write(0, &mut scratch).unwrap();
        assert_eq!(encoded, &[0x00]);
        assert_eq!(read(encoded), (0, 1));
    }

    #[test]
    fn test_group_boundaries() {
        // (value, expected encoded length)
        let cases = [
            (0u32, 1),
            (1, 1),
            (0x7F, 1),
            (0x80, 2),
            (0x3FFF, 2),
            (0x4000, 3),
            (0x1F_FFFF, 3),
            (0x20_0000, 4),
            (0x0FFF_FFFF, 4),
        ];
        for (value, len) in cases {
            assert_eq!(size(value), len, "size of {value:#x}");
            let mut scratch = [0u8; MAX_LEN];
            let encoded = write(value, &mut scratch).unwrap();
            assert_eq!(encoded.len(), len, "encoding of {value:#x}");

            // Continuation bit set on all but the last byte.
            for &b in &encoded[..len - 1] {
                assert_ne!(b & 0x80, 0);
            }
            assert_eq!(encoded[len - 1] & 0x80, 0);

            assert_eq!(read(encoded), (value, len));
        }
    }

    #[test]
    fn test_known_encodings() {
        let mut scratch = [0u8; MAX_LEN];
        assert_eq!(write(0x40, &mut scratch).unwrap(), &[0x40]);
        assert_eq!(write(0x80, &mut scratch).unwrap(), &[0x81, 0x00]);
        assert_eq!(write(0x2000, &mut scratch).unwrap(), &[0xC0, 0x00]);
        assert_eq!(
            write(0x0FFF_FFFF, &mut scratch).unwrap(),
            &[0xFF, 0xFF, 0xFF, 0x7F]
        );
    }

    #[test]
    fn test_round_trip() {
        let values = [
            0u32, 1, 2, 0x7F, 0x80, 0x81, 0xFF, 0x100, 0x3FFF, 0x4000, 0xFFFF, 0x1F_FFFF,
            0x20_0000, 0xFF_FFFF, 0x100_0000, 0x0FFF_FFFF,
        ];
        for value in values {
            let mut scratch = [0u8; MAX_LEN];
            let encoded = write(value, &mut scratch).unwrap();
            let (decoded, consumed) = read(encoded);
            assert_eq!(decoded, value);
            assert_eq!(consumed, encoded.len());
        }
    }

    #[test]
    fn test_too_large() {
        let mut scratch = [0u8; MAX_LEN];
        // One past the largest 28-bit value: rejected, never encoded lossily.
        assert!(matches!(
            write(0x1000_0000, &mut scratch),
            Err(Error::ValueTooLarge(0x1000_0000))
        ));
        assert!(matches!(
            write(u32::MAX, &mut scratch),
            Err(Error::ValueTooLarge(v)) if v == i64::from(u32::MAX)
        ));
    }

    #[test]
    fn test_read_stops_at_four_bytes() {
        // A fifth byte is never consumed, continuation bit or not.
        let bytes = [0xFF, 0xFF, 0xFF, 0xFF, 0x7F];
        let (value, consumed) = read(&bytes);
        assert_eq!(consumed, 4);
        assert_eq!(value, 0x0FFF_FFFF);
    }

    #[test]
    fn test_read_empty() {
        assert_eq!(read(&[]), (0, 0));
    }
}
