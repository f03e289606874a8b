//! The secret being hidden, and its serialized record form.
//!
//! On the wire a secret is a small JSON object:
//!
//! ```text
//! {"type": "text", "content": "hello", "size": 5, "timestamp": 1760000000}
//! ```
//!
//! `content` is the UTF-8 text for text secrets and standard base64 for everything else.
//! `size` and `timestamp` are optional.

use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while (de)serializing a secret.
#[derive(Error, Debug)]
pub enum SecretError {
    #[error("Malformed secret: {0}")]
    MalformedSecret(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// What kind of content a secret holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretKind {
    Text,
    Audio,
    Image,
    Video,
}

impl SecretKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Audio => "audio",
            Self::Image => "image",
            Self::Video => "video",
        }
    }

    /// Filename suggested when writing extracted content to disk.
    pub fn suggested_filename(&self) -> &'static str {
        match self {
            Self::Text => "extracted_text.txt",
            Self::Audio => "extracted_audio.wav",
            Self::Image => "extracted_image.png",
            Self::Video => "extracted_video.mp4",
        }
    }
}

impl std::fmt::Display for SecretKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SecretKind {
    type Err = SecretError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "audio" => Ok(Self::Audio),
            "image" => Ok(Self::Image),
            "video" => Ok(Self::Video),
            other => Err(SecretError::MalformedSecret(format!(
                "unknown secret type '{}'",
                other
            ))),
        }
    }
}

/// Secret content, one variant per kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretPayload {
    Text(String),
    Audio(Vec<u8>),
    Image(Vec<u8>),
    Video(Vec<u8>),
}

impl SecretPayload {
    pub fn kind(&self) -> SecretKind {
        match self {
            Self::Text(_) => SecretKind::Text,
            Self::Audio(_) => SecretKind::Audio,
            Self::Image(_) => SecretKind::Image,
            Self::Video(_) => SecretKind::Video,
        }
    }

    /// Raw content bytes (UTF-8 for text).
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(text) => text.as_bytes(),
            Self::Audio(data) | Self::Image(data) | Self::Video(data) => data,
        }
    }
}

/// A secret plus its optional metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Secret {
    pub payload: SecretPayload,
    /// Size of the original content in bytes, when the sender recorded it.
    pub size: Option<u64>,
    /// Unix timestamp (seconds) of when the secret was created.
    pub timestamp: Option<i64>,
}

/// JSON record form of a [`Secret`].
#[derive(Debug, Serialize, Deserialize)]
struct SecretRecord {
    #[serde(rename = "type")]
    kind: SecretKind,
    content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamp: Option<i64>,
}

impl Secret {
    pub fn new(payload: SecretPayload) -> Self {
        Self {
            payload,
            size: None,
            timestamp: None,
        }
    }

    pub fn text<S: Into<String>>(text: S) -> Self {
        Self::new(SecretPayload::Text(text.into()))
    }

    pub fn audio(data: Vec<u8>) -> Self {
        Self::new(SecretPayload::Audio(data))
    }

    pub fn image(data: Vec<u8>) -> Self {
        Self::new(SecretPayload::Image(data))
    }

    pub fn video(data: Vec<u8>) -> Self {
        Self::new(SecretPayload::Video(data))
    }

    /// Builds a secret of `kind` from raw bytes. Text must be valid UTF-8.
    pub fn from_content(kind: SecretKind, content: Vec<u8>) -> Result<Self, SecretError> {
        let payload = match kind {
            SecretKind::Text => SecretPayload::Text(String::from_utf8(content).map_err(|_| {
                SecretError::MalformedSecret("text content is not valid UTF-8".to_string())
            })?),
            SecretKind::Audio => SecretPayload::Audio(content),
            SecretKind::Image => SecretPayload::Image(content),
            SecretKind::Video => SecretPayload::Video(content),
        };
        Ok(Self::new(payload))
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn kind(&self) -> SecretKind {
        self.payload.kind()
    }

    pub fn content(&self) -> &[u8] {
        self.payload.as_bytes()
    }

    /// Serializes the secret into its JSON record.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SecretError> {
        let content = match &self.payload {
            SecretPayload::Text(text) => text.clone(),
            SecretPayload::Audio(data) | SecretPayload::Image(data) | SecretPayload::Video(data) => {
                BASE64.encode(data)
            }
        };
        let record = SecretRecord {
            kind: self.kind(),
            content,
            size: self.size,
            timestamp: self.timestamp,
        };
        serde_json::to_vec(&record).map_err(|e| SecretError::Serialization(e.to_string()))
    }

    /// Parses a JSON record back into a secret.
    ///
    /// Missing `type`/`content`, unknown types, and invalid base64 are all
    /// [`SecretError::MalformedSecret`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SecretError> {
        let record: SecretRecord = serde_json::from_slice(bytes)
            .map_err(|e| SecretError::MalformedSecret(e.to_string()))?;

        let payload = match record.kind {
            SecretKind::Text => SecretPayload::Text(record.content),
            SecretKind::Audio => SecretPayload::Audio(decode_content(&record)?),
            SecretKind::Image => SecretPayload::Image(decode_content(&record)?),
            SecretKind::Video => SecretPayload::Video(decode_content(&record)?),
        };

        Ok(Self {
            payload,
            size: record.size,
            timestamp: record.timestamp,
        })
    }
}

fn decode_content(record: &SecretRecord) -> Result<Vec<u8>, SecretError> {
    BASE64.decode(record.content.as_bytes()).map_err(|e| {
        SecretError::MalformedSecret(format!("invalid base64 {} content: {}", record.kind, e))
    })
}
