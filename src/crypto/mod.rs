//! Cryptographic operations for stegvault.
//!
//! This module provides:
//! - PBKDF2-HMAC-SHA256 key derivation from a passphrase and random salt
//! - ChaCha20-Poly1305 authenticated encryption
//!
//! Randomness is always passed in by the caller, so tests can use seeded generators and
//! production code uses the OS generator.

pub mod kdf;
pub mod symmetric;

use thiserror::Error;

pub use kdf::{derive_key, generate_salt, DerivedKey, DEFAULT_ITERATIONS, MIN_ITERATIONS};
pub use symmetric::{decrypt, encrypt};

/// Errors that can occur during key derivation or encryption.
#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("Invalid salt length: expected 16 bytes, got {0}")]
    InvalidSaltLength(usize),

    #[error("KDF iteration count {0} is below the minimum of 10000")]
    InvalidIterations(u32),

    #[error("Cipher initialization failed: key must be 32 bytes")]
    CipherInit,

    #[error("Malformed ciphertext: shorter than the nonce")]
    MalformedCiphertext,

    /// Deliberately says nothing about which of the two it was.
    #[error("Wrong passphrase or corrupted data")]
    AuthenticationFailed,

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),
}
