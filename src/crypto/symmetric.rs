//! Authenticated encryption with a derived key.
//!
//! ChaCha20-Poly1305, fresh random 96-bit nonce per call, no associated data.
//! Output format: nonce (12 bytes) || ciphertext || tag (16 bytes)

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};
use rand::{CryptoRng, RngCore};

use super::CryptoError;
use crate::NONCE_SIZE;

/// Encrypts `plaintext` under `key`, prefixing the random nonce.
pub fn encrypt<R: RngCore + CryptoRng>(
    plaintext: &[u8],
    key: &[u8],
    rng: &mut R,
) -> Result<Vec<u8>, CryptoError> {
    let cipher = ChaCha20Poly1305::new_from_slice(key).map_err(|_| CryptoError::CipherInit)?;

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    let mut result = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    result.extend_from_slice(&nonce_bytes);
    result.extend_from_slice(&ciphertext);
    Ok(result)
}

/// Decrypts `nonce || ciphertext || tag` under `key`.
pub fn decrypt(data: &[u8], key: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let cipher = ChaCha20Poly1305::new_from_slice(key).map_err(|_| CryptoError::CipherInit)?;

    if data.len() < NONCE_SIZE {
        return Err(CryptoError::MalformedCiphertext);
    }
    let (nonce_bytes, ciphertext) = data.split_at(NONCE_SIZE);

    cipher
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| CryptoError::AuthenticationFailed)
}
