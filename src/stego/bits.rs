//! Byte <-> bit conversion.
//!
//! Bits are ordered least-significant first within each byte, which is the order the
//! LSB codecs write them into carrier samples.

/// Expands bytes into single-bit values (`0` or `1`), LSB first.
pub fn bytes_to_bits(data: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(data.len() * 8);
    for byte in data {
        for offset in 0..8 {
            bits.push((byte >> offset) & 1);
        }
    }
    bits
}

/// Packs single-bit values back into bytes, LSB first.
///
/// A trailing group shorter than 8 bits is zero-padded. Only the lowest bit of each
/// input value is used.
pub fn bits_to_bytes(bits: &[u8]) -> Vec<u8> {
    bits.chunks(8)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .fold(0u8, |byte, (offset, bit)| byte | ((bit & 1) << offset))
        })
        .collect()
}

/// Returns bit `index` of `data` (LSB-first order) without materializing the bit vector.
#[inline]
pub(crate) fn bit_at(data: &[u8], index: usize) -> u8 {
    (data[index / 8] >> (index % 8)) & 1
}

/// Incrementally assembles bytes from a stream of bits.
///
/// Used by the LSB codecs while walking a carrier, so the extracted stream can be
/// handed to the frame scanner one byte at a time.
#[derive(Debug, Default)]
pub(crate) struct BitCollector {
    current: u8,
    filled: u8,
}

impl BitCollector {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Adds one bit; returns the completed byte once 8 bits have been pushed.
    #[inline]
    pub(crate) fn push(&mut self, bit: u8) -> Option<u8> {
        self.current |= (bit & 1) << self.filled;
        self.filled += 1;
        if self.filled == 8 {
            let byte = self.current;
            self.current = 0;
            self.filled = 0;
            Some(byte)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_lsb_first_order() {
        assert_eq!(bytes_to_bits(&[0b0000_0001]), vec![1, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(bytes_to_bits(&[0b1000_0000]), vec![0, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(bits_to_bytes(&[0, 1, 0, 1, 0, 0, 0, 0]), vec![0b0000_1010]);
    }

    #[test]
    fn test_empty() {
        assert!(bytes_to_bits(&[]).is_empty());
        assert!(bits_to_bytes(&[]).is_empty());
    }

    #[test]
    fn test_partial_byte_is_zero_padded() {
        // 1,1,1 -> 0b111, remaining five bits padded with zero
        assert_eq!(bits_to_bytes(&[1, 1, 1]), vec![0b0000_0111]);
        assert_eq!(bits_to_bytes(&[0; 9]), vec![0, 0]);
    }

    #[test]
    fn test_bit_at_matches_expansion() {
        let data = [0xDE, 0xAD, 0xBE, 0xEF];
        let bits = bytes_to_bits(&data);
        for (i, bit) in bits.iter().enumerate() {
            assert_eq!(bit_at(&data, i), *bit);
        }
    }

    #[test]
    fn test_collector_emits_every_eighth_bit() {
        let mut collector = BitCollector::new();
        let mut out = Vec::new();
        for bit in bytes_to_bits(b"ok") {
            if let Some(byte) = collector.push(bit) {
                out.push(byte);
            }
        }
        assert_eq!(out, b"ok");
    }

    proptest! {
        #[test]
        fn prop_bits_roundtrip(data in proptest::collection::vec(any::<u8>(), 0..512)) {
            let bits = bytes_to_bits(&data);
            prop_assert_eq!(bits.len(), data.len() * 8);
            prop_assert_eq!(bits_to_bytes(&bits), data);
        }

        #[test]
        fn prop_unaligned_length_rounds_up(bits in proptest::collection::vec(0u8..=1, 0..100)) {
            prop_assert_eq!(bits_to_bytes(&bits).len(), bits.len().div_ceil(8));
        }
    }
}
