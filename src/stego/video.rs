//! Append-based hiding for video files.
//!
//! The container is treated as opaque bytes: the frame is written after the last byte of
//! the file, and extraction scans backwards for the magic number. Players ignore the
//! trailing bytes, but the data is not perceptually hidden.

use tracing::debug;

use super::frame::{frame, FrameHeader};
use super::{CarrierCodec, CarrierKind, StegoError};
use crate::{HEADER_SIZE, MAX_PAYLOAD_SIZE};

/// Default limit on how much the frame may grow the carrier, in percent of its size.
pub const DEFAULT_MAX_OVERHEAD_PERCENT: u8 = 1;

/// Video steganography codec over raw container bytes.
pub struct VideoCodec<'a> {
    data: &'a [u8],
    max_payload: usize,
    max_overhead_percent: u8,
}

impl<'a> VideoCodec<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            max_payload: MAX_PAYLOAD_SIZE,
            max_overhead_percent: DEFAULT_MAX_OVERHEAD_PERCENT,
        }
    }

    pub fn with_max_payload(mut self, max_payload: usize) -> Self {
        self.max_payload = max_payload;
        self
    }

    pub fn with_max_overhead_percent(mut self, percent: u8) -> Self {
        self.max_overhead_percent = percent;
        self
    }
}

impl CarrierCodec for VideoCodec<'_> {
    fn kind(&self) -> CarrierKind {
        CarrierKind::Video
    }

    /// Largest frame that keeps the output within the overhead limit.
    fn capacity(&self) -> usize {
        self.data
            .len()
            .saturating_mul(self.max_overhead_percent as usize)
            / 100
    }

    fn embed(&self, payload: &[u8]) -> Result<Vec<u8>, StegoError> {
        if self.data.is_empty() {
            return Err(StegoError::InvalidCarrier("video data is empty".to_string()));
        }

        let framed = frame(payload, self.max_payload)?;
        let capacity = self.capacity();
        if framed.len() > capacity {
            return Err(StegoError::InsufficientCapacity {
                needed: framed.len(),
                capacity,
            });
        }

        let mut output = Vec::with_capacity(self.data.len() + framed.len());
        output.extend_from_slice(self.data);
        output.extend_from_slice(&framed);

        debug!(
            carrier = self.data.len(),
            framed = framed.len(),
            "payload appended to video"
        );
        Ok(output)
    }

    fn extract(&self) -> Result<Vec<u8>, StegoError> {
        let len = self.data.len();
        if len < HEADER_SIZE {
            return Err(StegoError::NoEmbeddedData);
        }

        let window = self.max_payload.saturating_add(HEADER_SIZE);
        let lowest = len.saturating_sub(window);

        for start in (lowest..=len - HEADER_SIZE).rev() {
            let Some(header) = FrameHeader::read(&self.data[start..]) else {
                continue;
            };
            if !header.is_valid(self.max_payload) {
                continue;
            }
            let end = start + HEADER_SIZE + header.length as usize;
            if end <= len {
                debug!(offset = start, length = header.length, "frame found in video");
                return Ok(self.data[start + HEADER_SIZE..end].to_vec());
            }
        }

        Err(StegoError::NoEmbeddedData)
    }
}
