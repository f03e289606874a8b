//! Payload framing and the streaming header detection used by every codec.
//!
//! Frame layout (little-endian):
//!
//! ```text
//! offset 0  magic   4 bytes  0xDEADBEEF
//! offset 4  length  4 bytes  payload length, 0 < length <= max payload size
//! offset 8  payload length bytes
//! ```

use tracing::trace;

use super::StegoError;
use crate::{HEADER_SIZE, MAGIC};

/// Decoded frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub magic: u32,
    pub length: u32,
}

impl FrameHeader {
    /// Builds the header for a payload of `length` bytes.
    pub fn new(length: u32) -> Self {
        Self {
            magic: MAGIC,
            length,
        }
    }

    /// Reads a header from the first 8 bytes of `bytes`, if there are that many.
    pub fn read(bytes: &[u8]) -> Option<Self> {
        let header: &[u8; HEADER_SIZE] = bytes.get(..HEADER_SIZE)?.try_into().ok()?;
        Some(Self {
            magic: u32::from_le_bytes([header[0], header[1], header[2], header[3]]),
            length: u32::from_le_bytes([header[4], header[5], header[6], header[7]]),
        })
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[..4].copy_from_slice(&self.magic.to_le_bytes());
        out[4..].copy_from_slice(&self.length.to_le_bytes());
        out
    }

    /// True when the magic matches and the length is in `(0, max_payload]`.
    pub fn is_valid(&self, max_payload: usize) -> bool {
        self.magic == MAGIC && self.length > 0 && (self.length as usize) <= max_payload
    }
}

/// Prefixes `payload` with a frame header.
///
/// Empty payloads are rejected with [`StegoError::EmptyPayload`], since a zero length header
/// is never accepted on extraction. Payloads longer than `max_payload` are rejected with
/// [`StegoError::PayloadTooLarge`]; nothing is ever truncated.
pub fn frame(payload: &[u8], max_payload: usize) -> Result<Vec<u8>, StegoError> {
    if payload.is_empty() {
        return Err(StegoError::EmptyPayload);
    }
    if payload.len() > max_payload || payload.len() > u32::MAX as usize {
        return Err(StegoError::PayloadTooLarge {
            size: payload.len(),
            max: max_payload,
        });
    }

    let header = FrameHeader::new(payload.len() as u32);
    let mut framed = Vec::with_capacity(HEADER_SIZE + payload.len());
    framed.extend_from_slice(&header.to_bytes());
    framed.extend_from_slice(payload);
    Ok(framed)
}

/// Recovers the payload from a contiguous framed byte stream.
///
/// Trailing bytes after the payload are ignored.
pub fn unframe(data: &[u8], max_payload: usize) -> Result<Vec<u8>, StegoError> {
    let mut scanner = FrameScanner::new(data.len(), max_payload);
    for &byte in data {
        match scanner.push(byte) {
            ScanStatus::NeedMore => continue,
            ScanStatus::Complete(payload) => return Ok(payload),
            ScanStatus::Rejected => break,
        }
    }
    Err(StegoError::NoEmbeddedData)
}

/// Result of feeding one byte to a [`FrameScanner`].
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ScanStatus {
    /// Header or payload still incomplete.
    NeedMore,
    /// Header matched and `length` payload bytes were collected.
    Complete(Vec<u8>),
    /// Header is not ours, or declares more bytes than the carrier can hold.
    Rejected,
}

/// Streaming frame detector.
///
/// Bytes are pushed as a codec extracts them from a carrier. Once 8 bytes are present they
/// are checked as a header; a header that does not match, or whose length would run past
/// `available` bytes, ends the scan. Otherwise the scanner collects exactly `length`
/// payload bytes and stops.
#[derive(Debug)]
pub(crate) struct FrameScanner {
    buf: Vec<u8>,
    available: usize,
    max_payload: usize,
    expected: Option<usize>,
}

impl FrameScanner {
    /// `available` is the total number of bytes the carrier region can yield.
    pub(crate) fn new(available: usize, max_payload: usize) -> Self {
        Self {
            buf: Vec::with_capacity(HEADER_SIZE),
            available,
            max_payload,
            expected: None,
        }
    }

    pub(crate) fn push(&mut self, byte: u8) -> ScanStatus {
        self.buf.push(byte);

        match self.expected {
            None if self.buf.len() == HEADER_SIZE => {
                let Some(header) = FrameHeader::read(&self.buf) else {
                    return ScanStatus::Rejected;
                };
                if !header.is_valid(self.max_payload) {
                    trace!(magic = header.magic, length = header.length, "frame header rejected");
                    return ScanStatus::Rejected;
                }
                let total = HEADER_SIZE + header.length as usize;
                if total > self.available {
                    trace!(total, available = self.available, "declared length exceeds carrier");
                    return ScanStatus::Rejected;
                }
                self.buf.reserve_exact(header.length as usize);
                self.expected = Some(total);
                ScanStatus::NeedMore
            }
            Some(total) if self.buf.len() == total => {
                ScanStatus::Complete(self.buf.split_off(HEADER_SIZE))
            }
            _ => ScanStatus::NeedMore,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MAX_PAYLOAD_SIZE;
    use proptest::prelude::*;

    #[test]
    fn test_header_layout() {
        let framed = frame(b"abc", MAX_PAYLOAD_SIZE).unwrap();
        assert_eq!(&framed[..4], &[0xEF, 0xBE, 0xAD, 0xDE]);
        assert_eq!(&framed[4..8], &[3, 0, 0, 0]);
        assert_eq!(&framed[8..], b"abc");
    }

    #[test]
    fn test_oversize_payload_rejected() {
        let result = frame(&[0u8; 17], 16);
        assert!(matches!(
            result,
            Err(StegoError::PayloadTooLarge { size: 17, max: 16 })
        ));
        assert_eq!(frame(&[0u8; 16], 16).unwrap().len(), 24);
    }

    #[test]
    fn test_empty_payload_rejected() {
        assert!(matches!(
            frame(&[], MAX_PAYLOAD_SIZE),
            Err(StegoError::EmptyPayload)
        ));
        assert_eq!(frame(&[0u8], MAX_PAYLOAD_SIZE).unwrap().len(), HEADER_SIZE + 1);
    }

    #[test]
    fn test_unframe_ignores_trailing_bytes() {
        let mut framed = frame(b"payload", MAX_PAYLOAD_SIZE).unwrap();
        framed.extend_from_slice(&[0xFF; 32]);
        assert_eq!(unframe(&framed, MAX_PAYLOAD_SIZE).unwrap(), b"payload");
    }

    #[test]
    fn test_wrong_magic() {
        let mut framed = frame(b"payload", MAX_PAYLOAD_SIZE).unwrap();
        framed[0] ^= 1;
        assert!(matches!(
            unframe(&framed, MAX_PAYLOAD_SIZE),
            Err(StegoError::NoEmbeddedData)
        ));
    }

    #[test]
    fn test_zero_length_rejected() {
        let header = FrameHeader::new(0).to_bytes();
        assert!(matches!(
            unframe(&header, MAX_PAYLOAD_SIZE),
            Err(StegoError::NoEmbeddedData)
        ));
    }

    #[test]
    fn test_length_beyond_available_rejected() {
        let framed = frame(b"payload", MAX_PAYLOAD_SIZE).unwrap();
        let mut scanner = FrameScanner::new(framed.len() - 1, MAX_PAYLOAD_SIZE);
        let statuses: Vec<_> = framed[..HEADER_SIZE]
            .iter()
            .map(|b| scanner.push(*b))
            .collect();
        assert_eq!(statuses.last(), Some(&ScanStatus::Rejected));
    }

    #[test]
    fn test_truncated_frame() {
        let framed = frame(b"payload", MAX_PAYLOAD_SIZE).unwrap();
        assert!(unframe(&framed[..framed.len() - 1], MAX_PAYLOAD_SIZE).is_err());
    }

    #[test]
    fn test_header_read_too_short() {
        assert_eq!(FrameHeader::read(&[0xEF, 0xBE, 0xAD]), None);
    }

    proptest! {
        #[test]
        fn prop_frame_unframe(payload in proptest::collection::vec(any::<u8>(), 1..1024)) {
            let framed = frame(&payload, MAX_PAYLOAD_SIZE).unwrap();
            prop_assert_eq!(framed.len(), payload.len() + HEADER_SIZE);
            prop_assert_eq!(unframe(&framed, MAX_PAYLOAD_SIZE).unwrap(), payload);
        }

        #[test]
        fn prop_noise_without_magic_is_rejected(mut noise in proptest::collection::vec(any::<u8>(), 8..256)) {
            noise[0] = 0x00;
            prop_assert!(unframe(&noise, MAX_PAYLOAD_SIZE).is_err());
        }
    }
}
