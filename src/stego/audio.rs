//! LSB steganography for audio files.
//!
//! Hides data in the least significant bit of every byte of a WAV file's `data` chunk.
//! The RIFF structure is walked directly, so any PCM layout works and every byte outside
//! the sample region is copied through unchanged.

use std::io::Cursor;
use std::ops::Range;

use hound::{WavReader, WavSpec};
use tracing::{debug, warn};

use super::bits::{bit_at, BitCollector};
use super::frame::{frame, FrameScanner, ScanStatus};
use super::{CarrierCodec, CarrierKind, StegoError};
use crate::{HEADER_SIZE, MAX_PAYLOAD_SIZE};

/// Sample offset assumed when no `data` chunk can be located (canonical 44-byte header).
pub const DEFAULT_FALLBACK_OFFSET: usize = 44;

/// Size of the RIFF preamble: "RIFF", file size, "WAVE".
const RIFF_HEADER_SIZE: usize = 12;

/// Size of a chunk header: 4-byte ID + 4-byte little-endian size.
const CHUNK_HEADER_SIZE: usize = 8;

/// Mask that clears the least significant bit.
const LSB_MASK: u8 = 0xFE;

/// Locates the sample bytes of a WAV file's `data` chunk.
///
/// Chunks are scanned from offset 12, skipping each body plus a pad byte when its size
/// is odd. The returned range starts at the first sample byte and is clamped to the end
/// of the buffer; a declared size of zero is treated as "runs to end of file".
pub fn locate_data_chunk(bytes: &[u8]) -> Result<Range<usize>, StegoError> {
    if bytes.len() < RIFF_HEADER_SIZE || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
        return Err(StegoError::InvalidContainer(
            "missing RIFF/WAVE markers, only WAV audio is supported".to_string(),
        ));
    }

    let mut offset = RIFF_HEADER_SIZE;
    while offset + CHUNK_HEADER_SIZE <= bytes.len() {
        let id = &bytes[offset..offset + 4];
        let size = u32::from_le_bytes([
            bytes[offset + 4],
            bytes[offset + 5],
            bytes[offset + 6],
            bytes[offset + 7],
        ]) as usize;
        let body = offset + CHUNK_HEADER_SIZE;

        if id == b"data" {
            let end = match size {
                0 => bytes.len(),
                size => body.saturating_add(size).min(bytes.len()),
            };
            return Ok(body..end);
        }

        offset = body.saturating_add(size).saturating_add(size % 2);
    }

    Err(StegoError::InvalidContainer(
        "no data chunk found in WAV file".to_string(),
    ))
}

/// Basic facts about a WAV carrier, as reported by `hound`.
#[derive(Debug, Clone, Copy)]
pub struct WavSummary {
    pub spec: WavSpec,
    pub duration_secs: f64,
}

/// Audio steganography codec over raw WAV bytes.
pub struct AudioCodec<'a> {
    data: &'a [u8],
    max_payload: usize,
    fallback_offset: usize,
}

impl<'a> AudioCodec<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            max_payload: MAX_PAYLOAD_SIZE,
            fallback_offset: DEFAULT_FALLBACK_OFFSET,
        }
    }

    pub fn with_max_payload(mut self, max_payload: usize) -> Self {
        self.max_payload = max_payload;
        self
    }

    pub fn with_fallback_offset(mut self, offset: usize) -> Self {
        self.fallback_offset = offset;
        self
    }

    /// Capacity in bytes for a sample region of `region_len` bytes (one bit per byte).
    pub fn capacity_for(region_len: usize) -> usize {
        region_len / 8
    }

    /// Sample format and duration, when the carrier is a WAV `hound` can parse.
    pub fn summary(&self) -> Option<WavSummary> {
        let reader = WavReader::new(Cursor::new(self.data)).ok()?;
        let spec = reader.spec();
        let duration_secs = if spec.sample_rate == 0 {
            0.0
        } else {
            reader.duration() as f64 / spec.sample_rate as f64
        };
        Some(WavSummary {
            spec,
            duration_secs,
        })
    }

    /// Sample region used for extraction: the `data` chunk, or everything after the
    /// fallback offset when the container cannot be parsed.
    fn extraction_region(&self) -> Result<Range<usize>, StegoError> {
        match locate_data_chunk(self.data) {
            Ok(region) => Ok(region),
            Err(e) => {
                warn!(
                    error = %e,
                    offset = self.fallback_offset,
                    "data chunk not found, falling back to default offset"
                );
                if self.data.len() <= self.fallback_offset {
                    return Err(StegoError::NoEmbeddedData);
                }
                Ok(self.fallback_offset..self.data.len())
            }
        }
    }
}

impl CarrierCodec for AudioCodec<'_> {
    fn kind(&self) -> CarrierKind {
        CarrierKind::Audio
    }

    fn capacity(&self) -> usize {
        locate_data_chunk(self.data)
            .map(|region| Self::capacity_for(region.len()))
            .unwrap_or(0)
    }

    fn embed(&self, payload: &[u8]) -> Result<Vec<u8>, StegoError> {
        let region = locate_data_chunk(self.data)?;
        let framed = frame(payload, self.max_payload)?;
        let capacity = Self::capacity_for(region.len());
        if framed.len() > capacity {
            return Err(StegoError::InsufficientCapacity {
                needed: framed.len(),
                capacity,
            });
        }

        let mut output = self.data.to_vec();
        let samples = &mut output[region.start..region.start + framed.len() * 8];
        for (bit_index, sample) in samples.iter_mut().enumerate() {
            *sample = (*sample & LSB_MASK) | bit_at(&framed, bit_index);
        }

        debug!(
            offset = region.start,
            framed = framed.len(),
            capacity,
            "payload hidden in audio"
        );
        Ok(output)
    }

    fn extract(&self) -> Result<Vec<u8>, StegoError> {
        let region = self.extraction_region()?;
        let samples = &self.data[region];
        if samples.len() < HEADER_SIZE * 8 {
            return Err(StegoError::NoEmbeddedData);
        }

        // Never look at more sample bytes than the largest legal frame needs.
        let ceiling = self
            .max_payload
            .saturating_add(HEADER_SIZE)
            .saturating_mul(8);
        let samples = &samples[..samples.len().min(ceiling)];

        let mut scanner = FrameScanner::new(Self::capacity_for(samples.len()), self.max_payload);
        let mut collector = BitCollector::new();
        for sample in samples {
            let Some(byte) = collector.push(sample & 1) else {
                continue;
            };
            match scanner.push(byte) {
                ScanStatus::NeedMore => {}
                ScanStatus::Complete(payload) => {
                    debug!(length = payload.len(), "frame found in audio");
                    return Ok(payload);
                }
                ScanStatus::Rejected => break,
            }
        }

        Err(StegoError::NoEmbeddedData)
    }
}

/// Builds a canonical PCM WAV: 44-byte header, optional extra chunks before `data`.
#[cfg(test)]
pub(crate) fn build_test_wav(extra_chunks: &[(&[u8; 4], &[u8])], samples: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(b"WAVE");

    body.extend_from_slice(b"fmt ");
    body.extend_from_slice(&16u32.to_le_bytes());
    body.extend_from_slice(&1u16.to_le_bytes()); // PCM
    body.extend_from_slice(&1u16.to_le_bytes()); // mono
    body.extend_from_slice(&8000u32.to_le_bytes()); // sample rate
    body.extend_from_slice(&16000u32.to_le_bytes()); // byte rate
    body.extend_from_slice(&2u16.to_le_bytes()); // block align
    body.extend_from_slice(&16u16.to_le_bytes()); // bits per sample

    for (id, data) in extra_chunks {
        body.extend_from_slice(*id);
        body.extend_from_slice(&(data.len() as u32).to_le_bytes());
        body.extend_from_slice(data);
        if data.len() % 2 == 1 {
            body.push(0);
        }
    }

    body.extend_from_slice(b"data");
    body.extend_from_slice(&(samples.len() as u32).to_le_bytes());
    body.extend_from_slice(samples);

    let mut wav = Vec::with_capacity(body.len() + 8);
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(body.len() as u32).to_le_bytes());
    wav.extend_from_slice(&body);
    wav
}
