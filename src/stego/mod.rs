//! Steganography module for hiding framed blobs in carriers.
//!
//! Supports:
//! - Image LSB steganography (any decodable image in, PNG out)
//! - Audio LSB steganography (WAV `data` chunk)
//! - Video append-based hiding (any container)

pub mod audio;
pub mod bits;
pub mod frame;
pub mod image;
pub mod video;

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::StegoConfig;
use crate::HEADER_SIZE;

pub use self::audio::AudioCodec;
pub use self::bits::{bits_to_bytes, bytes_to_bits};
pub use self::frame::{frame, unframe, FrameHeader};
pub use self::image::ImageCodec;
pub use self::video::VideoCodec;

/// Errors that can occur while embedding into or extracting from a carrier.
#[derive(Error, Debug)]
pub enum StegoError {
    #[error("Invalid carrier: {0}")]
    InvalidCarrier(String),

    #[error("Invalid container: {0}")]
    InvalidContainer(String),

    #[error("Carrier too small to hide data: need {needed} bytes, have capacity for {capacity}")]
    InsufficientCapacity { needed: usize, capacity: usize },

    #[error("No embedded data found in carrier")]
    NoEmbeddedData,

    #[error("Payload is empty; nothing to hide")]
    EmptyPayload,

    #[error("Payload too large: {size} bytes, max allowed {max} bytes")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("Image encode error: {0}")]
    ImageEncode(String),
}

/// The three carrier families, each with its own codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CarrierKind {
    Image,
    Audio,
    Video,
}

impl CarrierKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Video => "video",
        }
    }

    /// Infers the carrier kind from a file extension.
    ///
    /// Compressed audio formats are accepted so extraction can try them best-effort,
    /// but only WAV can be embedded into.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" | "jpg" | "jpeg" | "gif" | "bmp" | "tiff" | "tif" | "webp" => Some(Self::Image),
            "wav" | "mp3" | "flac" | "aac" | "ogg" => Some(Self::Audio),
            "mp4" | "avi" | "mkv" | "mov" | "wmv" | "flv" => Some(Self::Video),
            _ => None,
        }
    }

    /// Infers the carrier kind from a path's extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Content type of the carrier produced by embedding.
    pub fn output_content_type(&self) -> &'static str {
        match self {
            Self::Image => "image/png",
            Self::Audio => "audio/wav",
            Self::Video => "application/octet-stream",
        }
    }

    /// Suggested filename for the carrier produced by embedding.
    ///
    /// Images are always re-encoded as PNG and audio stays WAV. Video keeps the
    /// original container extension when one is known.
    pub fn output_filename(&self, original_ext: Option<&str>) -> String {
        match self {
            Self::Image => "embedded_image.png".to_string(),
            Self::Audio => "embedded_audio.wav".to_string(),
            Self::Video => {
                let ext = original_ext
                    .filter(|ext| !ext.is_empty())
                    .map(|ext| ext.to_ascii_lowercase())
                    .unwrap_or_else(|| "bin".to_string());
                format!("embedded_video.{}", ext)
            }
        }
    }
}

impl std::fmt::Display for CarrierKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CarrierKind {
    type Err = StegoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "image" => Ok(Self::Image),
            "audio" => Ok(Self::Audio),
            "video" => Ok(Self::Video),
            other => Err(StegoError::InvalidCarrier(format!(
                "unknown media type '{}', expected image, audio, or video",
                other
            ))),
        }
    }
}

/// A carrier that can hide and recover one framed blob.
pub trait CarrierCodec {
    /// The carrier family this codec handles.
    fn kind(&self) -> CarrierKind;

    /// Bytes this carrier can hold, frame header included.
    fn capacity(&self) -> usize;

    /// Bytes left for the payload once the frame header is accounted for.
    fn usable_capacity(&self) -> usize {
        self.capacity().saturating_sub(HEADER_SIZE)
    }

    /// Frames `payload`, hides it, and returns the encoded output carrier.
    fn embed(&self, payload: &[u8]) -> Result<Vec<u8>, StegoError>;

    /// Finds and returns the hidden payload.
    fn extract(&self) -> Result<Vec<u8>, StegoError>;
}

/// Builds the codec for `kind` over `carrier`.
///
/// Image carriers are decoded here; undecodable bytes fail with
/// [`StegoError::InvalidCarrier`]. Audio and video carriers are borrowed as-is.
pub fn open_codec<'a>(
    kind: CarrierKind,
    carrier: &'a [u8],
    config: &StegoConfig,
) -> Result<Box<dyn CarrierCodec + 'a>, StegoError> {
    if carrier.is_empty() {
        return Err(StegoError::InvalidCarrier("carrier is empty".to_string()));
    }

    let codec: Box<dyn CarrierCodec + 'a> = match kind {
        CarrierKind::Image => Box::new(
            ImageCodec::from_bytes(carrier)?.with_max_payload(config.max_payload_size),
        ),
        CarrierKind::Audio => Box::new(
            AudioCodec::new(carrier)
                .with_max_payload(config.max_payload_size)
                .with_fallback_offset(config.audio_fallback_offset),
        ),
        CarrierKind::Video => Box::new(
            VideoCodec::new(carrier)
                .with_max_payload(config.max_payload_size)
                .with_max_overhead_percent(config.video_max_overhead_percent),
        ),
    };
    Ok(codec)
}
