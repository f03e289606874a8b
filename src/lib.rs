//! # Stegvault - hide encrypted secrets in ordinary media
//!
//! Stegvault conceals a secret (text, image, audio, or video bytes) inside a carrier file
//! (image, WAV audio, or video) so that the carrier still looks and plays normally. Only a
//! holder of the shared passphrase can recover the secret.
//!
//! ## Pipeline
//!
//! Embedding runs these steps, extraction runs them backwards:
//! 1. Serialize the [`Secret`] into a compact JSON record
//! 2. Draw a random 16-byte salt and derive a key with PBKDF2-HMAC-SHA256
//! 3. Encrypt the record with ChaCha20-Poly1305 (random 96-bit nonce)
//! 4. Concatenate `salt || nonce || ciphertext || tag`
//! 5. Frame the blob with an 8-byte header (`0xDEADBEEF` magic + little-endian length)
//! 6. Hide the frame in the carrier:
//!    - images: LSB of the R, G and B channels of every pixel (output is always PNG)
//!    - WAV audio: LSB of every byte of the `data` chunk
//!    - video: appended after the container bytes
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use stegvault::{embed, extract, CarrierKind, Secret};
//!
//! let carrier = std::fs::read("holiday.png").unwrap();
//! let secret = Secret::text("meet at noon");
//!
//! let embedded = embed(&secret, "correct horse", &carrier, CarrierKind::Image).unwrap();
//! std::fs::write(&embedded.filename, &embedded.bytes).unwrap();
//!
//! let recovered = extract(&embedded.bytes, CarrierKind::Image, "correct horse").unwrap();
//! assert_eq!(recovered, secret);
//! ```
//!
//! ## Modules
//!
//! - [`stego`]: bit packing, framing, and the image/audio/video carrier codecs
//! - [`crypto`]: passphrase key derivation and authenticated encryption
//! - [`secret`]: the secret data model and its serialized record
//! - [`envelope`]: the embed/extract orchestration
//! - [`config`]: tunable limits and KDF cost

/// Magic number written at the start of every embedded frame.
pub const MAGIC: u32 = 0xDEAD_BEEF;

/// Size of the frame header (magic + length), in bytes.
pub const HEADER_SIZE: usize = 8;

/// Default upper bound for a framed payload (10 MiB).
pub const MAX_PAYLOAD_SIZE: usize = 10 * 1024 * 1024;

/// Size of the random KDF salt stored in front of the ciphertext.
pub const SALT_SIZE: usize = 16;

/// Size of the derived symmetric key.
pub const KEY_SIZE: usize = 32;

/// Size of the AEAD nonce.
pub const NONCE_SIZE: usize = 12;

/// Size of the AEAD authentication tag.
pub const TAG_SIZE: usize = 16;

pub mod config;
pub mod crypto;
pub mod envelope;
pub mod secret;
pub mod stego;

// Re-export commonly used types at the crate root
pub use config::{ConfigError, StegoConfig};
pub use crypto::CryptoError;
pub use envelope::{
    embed, embed_with_config, embed_with_rng, extract, extract_with_config, plaintext_budget,
    EmbeddedCarrier, EnvelopeError,
};
pub use secret::{Secret, SecretError, SecretKind, SecretPayload};
pub use stego::{CarrierCodec, CarrierKind, StegoError};
