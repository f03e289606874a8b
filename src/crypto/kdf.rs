//! Passphrase-based key derivation.
//!
//! PBKDF2-HMAC-SHA256 with a per-embed random salt. The salt travels in clear next to the
//! ciphertext; only the passphrase is secret.

use pbkdf2::pbkdf2_hmac;
use rand::{CryptoRng, RngCore};
use sha2::Sha256;
use zeroize::Zeroizing;

use super::CryptoError;
use crate::{KEY_SIZE, SALT_SIZE};

/// PBKDF2 iteration count used unless configured otherwise.
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// Lowest iteration count accepted.
pub const MIN_ITERATIONS: u32 = 10_000;

/// A derived symmetric key, wiped from memory on drop.
pub type DerivedKey = Zeroizing<[u8; KEY_SIZE]>;

/// Draws a fresh random salt.
pub fn generate_salt<R: RngCore + CryptoRng>(rng: &mut R) -> [u8; SALT_SIZE] {
    let mut salt = [0u8; SALT_SIZE];
    rng.fill_bytes(&mut salt);
    salt
}

/// Derives a 32-byte key from `passphrase` and `salt`.
///
/// The salt must be exactly 16 bytes; other lengths are rejected rather than padded.
pub fn derive_key(
    passphrase: &str,
    salt: &[u8],
    iterations: u32,
) -> Result<DerivedKey, CryptoError> {
    if salt.len() != SALT_SIZE {
        return Err(CryptoError::InvalidSaltLength(salt.len()));
    }
    if iterations < MIN_ITERATIONS {
        return Err(CryptoError::InvalidIterations(iterations));
    }

    let mut key = Zeroizing::new([0u8; KEY_SIZE]);
    pbkdf2_hmac::<Sha256>(passphrase.as_bytes(), salt, iterations, &mut key[..]);
    Ok(key)
}
