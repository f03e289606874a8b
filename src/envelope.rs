//! Embed/extract orchestration.
//!
//! This module drives the whole pipeline:
//! 1. Serialize the secret into its JSON record
//! 2. Draw a fresh salt and derive the key from the passphrase
//! 3. Encrypt the record (fresh nonce)
//! 4. Build `salt || nonce || ciphertext || tag`
//! 5. Hand the blob to the codec for the carrier kind, which frames and hides it
//!
//! Extraction runs the same steps in reverse.

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use thiserror::Error;
use tracing::debug;
use zeroize::Zeroizing;

use crate::config::{ConfigError, StegoConfig};
use crate::crypto::{decrypt, derive_key, encrypt, generate_salt, CryptoError};
use crate::secret::{Secret, SecretError};
use crate::stego::{open_codec, CarrierCodec, CarrierKind, StegoError};
use crate::{NONCE_SIZE, SALT_SIZE, TAG_SIZE};

/// Smallest blob that can hold a salt, a nonce, and an authentication tag.
pub const MIN_BLOB_SIZE: usize = SALT_SIZE + NONCE_SIZE + TAG_SIZE;

/// Errors that can occur while embedding or extracting a secret.
#[derive(Error, Debug)]
pub enum EnvelopeError {
    #[error(transparent)]
    Stego(#[from] StegoError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Secret(#[from] SecretError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A carrier with a secret hidden inside it.
#[derive(Debug, Clone)]
pub struct EmbeddedCarrier {
    /// The encoded output carrier (PNG for images).
    pub bytes: Vec<u8>,
    pub kind: CarrierKind,
    /// Suggested content type for serving the carrier.
    pub content_type: &'static str,
    /// Suggested filename for saving the carrier.
    pub filename: String,
}

impl EmbeddedCarrier {
    /// Renames the suggested output after the input carrier's extension.
    ///
    /// Only video keeps its container extension; images stay PNG and audio stays WAV.
    pub fn with_original_extension(mut self, ext: &str) -> Self {
        self.filename = self.kind.output_filename(Some(ext));
        self
    }
}

/// Hides `secret` in `carrier` with the default configuration.
pub fn embed(
    secret: &Secret,
    passphrase: &str,
    carrier: &[u8],
    kind: CarrierKind,
) -> Result<EmbeddedCarrier, EnvelopeError> {
    embed_with_config(secret, passphrase, carrier, kind, &StegoConfig::default())
}

/// Hides `secret` in `carrier` using the OS random generator.
pub fn embed_with_config(
    secret: &Secret,
    passphrase: &str,
    carrier: &[u8],
    kind: CarrierKind,
    config: &StegoConfig,
) -> Result<EmbeddedCarrier, EnvelopeError> {
    embed_with_rng(secret, passphrase, carrier, kind, config, &mut OsRng)
}

/// Hides `secret` in `carrier`, drawing salt and nonce from `rng`.
pub fn embed_with_rng<R: RngCore + CryptoRng>(
    secret: &Secret,
    passphrase: &str,
    carrier: &[u8],
    kind: CarrierKind,
    config: &StegoConfig,
    rng: &mut R,
) -> Result<EmbeddedCarrier, EnvelopeError> {
    config.validate()?;
    let codec = open_codec(kind, carrier, config)?;

    let record = Zeroizing::new(secret.to_bytes()?);
    let salt = generate_salt(rng);
    let key = derive_key(passphrase, &salt, config.kdf_iterations)?;
    let ciphertext = encrypt(&record, &key[..], rng)?;

    let mut blob = Vec::with_capacity(SALT_SIZE + ciphertext.len());
    blob.extend_from_slice(&salt);
    blob.extend_from_slice(&ciphertext);

    debug!(
        carrier = %kind,
        secret = %secret.kind(),
        blob = blob.len(),
        capacity = codec.usable_capacity(),
        "embedding secret"
    );

    let bytes = codec.embed(&blob)?;
    Ok(EmbeddedCarrier {
        bytes,
        kind,
        content_type: kind.output_content_type(),
        filename: kind.output_filename(None),
    })
}

/// Recovers the secret hidden in `carrier` with the default configuration.
pub fn extract(
    carrier: &[u8],
    kind: CarrierKind,
    passphrase: &str,
) -> Result<Secret, EnvelopeError> {
    extract_with_config(carrier, kind, passphrase, &StegoConfig::default())
}

/// Recovers the secret hidden in `carrier`.
///
/// A wrong passphrase and a damaged blob both surface as
/// [`CryptoError::AuthenticationFailed`].
pub fn extract_with_config(
    carrier: &[u8],
    kind: CarrierKind,
    passphrase: &str,
    config: &StegoConfig,
) -> Result<Secret, EnvelopeError> {
    config.validate()?;
    let codec = open_codec(kind, carrier, config)?;

    let blob = codec.extract()?;
    if blob.len() < MIN_BLOB_SIZE {
        return Err(StegoError::NoEmbeddedData.into());
    }
    debug!(carrier = %kind, blob = blob.len(), "embedded blob found");

    let (salt, ciphertext) = blob.split_at(SALT_SIZE);
    let key = derive_key(passphrase, salt, config.kdf_iterations)?;
    let record = Zeroizing::new(decrypt(ciphertext, &key[..])?);

    Ok(Secret::from_bytes(&record)?)
}

/// Largest serialized secret record `codec` can carry once salt, nonce, tag, and the
/// frame header are accounted for.
pub fn plaintext_budget(codec: &dyn CarrierCodec) -> usize {
    codec.usable_capacity().saturating_sub(MIN_BLOB_SIZE)
}
