//! Integration tests for stegvault
//!
//! Every test goes through the public embed/extract API with a real carrier:
//! PNG images built with `image`, WAV files written with `hound` or by hand, and
//! opaque byte blobs standing in for video containers.

use std::io::Cursor;

use hound::{SampleFormat, WavSpec, WavWriter};
use image::{ImageBuffer, Rgba};
use stegvault::crypto::{CryptoError, MIN_ITERATIONS};
use stegvault::stego::{open_codec, ImageCodec};
use stegvault::{
    embed_with_config, extract_with_config, plaintext_budget, CarrierKind, EnvelopeError, Secret,
    SecretKind, StegoConfig, StegoError,
};

fn fast_config() -> StegoConfig {
    StegoConfig {
        kdf_iterations: MIN_ITERATIONS,
        ..Default::default()
    }
}

fn png_carrier(width: u32, height: u32) -> Vec<u8> {
    let img = ImageBuffer::from_fn(width, height, |x, y| {
        Rgba([(x * 7 + y) as u8, (y * 3) as u8, (x ^ y) as u8, 200])
    });
    ImageCodec::encode_png(&img).unwrap()
}

fn hound_wav(sample_count: u32) -> Vec<u8> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: 8000,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec).unwrap();
        for i in 0..sample_count {
            let sample = ((i as f32 * 0.05).sin() * 12_000.0) as i16;
            writer.write_sample(sample).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

/// Canonical 44-byte-header PCM WAV, so the sample offset is known exactly.
fn canonical_wav(samples: &[u8]) -> Vec<u8> {
    let mut wav = Vec::with_capacity(44 + samples.len());
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + samples.len() as u32).to_le_bytes());
    wav.extend_from_slice(b"WAVE");
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes());
    wav.extend_from_slice(&8000u32.to_le_bytes());
    wav.extend_from_slice(&16000u32.to_le_bytes());
    wav.extend_from_slice(&2u16.to_le_bytes());
    wav.extend_from_slice(&16u16.to_le_bytes());
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&(samples.len() as u32).to_le_bytes());
    wav.extend_from_slice(samples);
    wav
}

/// Renames the `data` chunk so the container can no longer be parsed.
fn corrupt_data_tag(wav: &mut [u8]) {
    let pos = wav
        .windows(4)
        .position(|w| w == b"data")
        .expect("wav has a data chunk");
    wav[pos..pos + 4].copy_from_slice(b"dat4");
}

fn pseudo_video(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 31 % 251) as u8).collect()
}

#[test]
fn test_image_roundtrip_text() {
    let config = fast_config();
    let carrier = png_carrier(100, 100);
    let secret = Secret::text("hello");

    let embedded =
        embed_with_config(&secret, "correct horse", &carrier, CarrierKind::Image, &config).unwrap();
    assert_eq!(embedded.kind, CarrierKind::Image);
    assert_eq!(embedded.content_type, "image/png");

    let recovered =
        extract_with_config(&embedded.bytes, CarrierKind::Image, "correct horse", &config).unwrap();
    assert_eq!(recovered.payload, secret.payload);
}

#[test]
fn test_image_wrong_passphrase() {
    let config = fast_config();
    let carrier = png_carrier(100, 100);
    let embedded = embed_with_config(
        &Secret::text("hello"),
        "correct horse",
        &carrier,
        CarrierKind::Image,
        &config,
    )
    .unwrap();

    let result = extract_with_config(&embedded.bytes, CarrierKind::Image, "wrong horse", &config);
    assert!(matches!(
        result,
        Err(EnvelopeError::Crypto(CryptoError::AuthenticationFailed))
    ));
}

#[test]
fn test_image_secret_with_metadata() {
    let config = fast_config();
    let carrier = png_carrier(120, 80);
    let inner = png_carrier(4, 4);
    let secret = Secret::image(inner.clone())
        .with_size(inner.len() as u64)
        .with_timestamp(1_760_000_000);

    let embedded = embed_with_config(&secret, "pw", &carrier, CarrierKind::Image, &config).unwrap();
    let recovered = extract_with_config(&embedded.bytes, CarrierKind::Image, "pw", &config).unwrap();

    assert_eq!(recovered, secret);
    assert_eq!(recovered.kind(), SecretKind::Image);
    assert_eq!(recovered.content(), inner.as_slice());
}

#[test]
fn test_image_exact_capacity_boundary() {
    let config = fast_config();
    let carrier = png_carrier(100, 100);

    // Text record is 28 bytes of JSON around the content; 44 bytes of salt, nonce,
    // and tag plus the 8-byte header leave 3750 - 80 = 3670 bytes of text.
    let fits = Secret::text("a".repeat(3670));
    let embedded = embed_with_config(&fits, "pw", &carrier, CarrierKind::Image, &config).unwrap();
    let recovered = extract_with_config(&embedded.bytes, CarrierKind::Image, "pw", &config).unwrap();
    assert_eq!(recovered.payload, fits.payload);

    let too_big = Secret::text("a".repeat(3671));
    let result = embed_with_config(&too_big, "pw", &carrier, CarrierKind::Image, &config);
    assert!(matches!(
        result,
        Err(EnvelopeError::Stego(StegoError::InsufficientCapacity {
            needed: 3751,
            capacity: 3750
        }))
    ));
}

#[test]
fn test_image_without_secret() {
    let carrier = png_carrier(50, 50);
    let result = extract_with_config(&carrier, CarrierKind::Image, "pw", &fast_config());
    assert!(matches!(
        result,
        Err(EnvelopeError::Stego(StegoError::NoEmbeddedData))
    ));
}

#[test]
fn test_undecodable_image_carrier() {
    let result = embed_with_config(
        &Secret::text("hello"),
        "pw",
        b"definitely not an image",
        CarrierKind::Image,
        &fast_config(),
    );
    assert!(matches!(
        result,
        Err(EnvelopeError::Stego(StegoError::InvalidCarrier(_)))
    ));
}

#[test]
fn test_audio_roundtrip() {
    let config = fast_config();
    let carrier = hound_wav(20_000);
    let secret = Secret::text("meet at dawn").with_timestamp(1_700_000_000);

    let embedded = embed_with_config(&secret, "pw", &carrier, CarrierKind::Audio, &config).unwrap();
    assert_eq!(embedded.bytes.len(), carrier.len());
    assert_eq!(embedded.content_type, "audio/wav");

    // Still a valid WAV after embedding.
    let reader = hound::WavReader::new(Cursor::new(&embedded.bytes)).unwrap();
    assert_eq!(reader.spec().sample_rate, 8000);
    assert_eq!(reader.duration(), 20_000);

    let recovered = extract_with_config(&embedded.bytes, CarrierKind::Audio, "pw", &config).unwrap();
    assert_eq!(recovered, secret);
}

#[test]
fn test_audio_wrong_passphrase() {
    let config = fast_config();
    let carrier = hound_wav(20_000);
    let embedded = embed_with_config(
        &Secret::text("meet at dawn"),
        "pw",
        &carrier,
        CarrierKind::Audio,
        &config,
    )
    .unwrap();

    let result = extract_with_config(&embedded.bytes, CarrierKind::Audio, "other", &config);
    assert!(matches!(
        result,
        Err(EnvelopeError::Crypto(CryptoError::AuthenticationFailed))
    ));
}

#[test]
fn test_audio_too_small() {
    let carrier = canonical_wav(&[0u8; 400]);
    let result = embed_with_config(
        &Secret::text("hello"),
        "pw",
        &carrier,
        CarrierKind::Audio,
        &fast_config(),
    );
    assert!(matches!(
        result,
        Err(EnvelopeError::Stego(StegoError::InsufficientCapacity {
            capacity: 50,
            ..
        }))
    ));
}

#[test]
fn test_audio_corrupted_header_rejected_on_embed() {
    let mut carrier = canonical_wav(&[0x55u8; 8000]);
    corrupt_data_tag(&mut carrier);

    let result = embed_with_config(
        &Secret::text("hello"),
        "pw",
        &carrier,
        CarrierKind::Audio,
        &fast_config(),
    );
    assert!(matches!(
        result,
        Err(EnvelopeError::Stego(StegoError::InvalidContainer(_)))
    ));
}

#[test]
fn test_audio_corrupted_header_falls_back_on_extract() {
    let config = fast_config();
    let carrier = canonical_wav(&[0x55u8; 8000]);
    let secret = Secret::text("hello");
    let mut embedded = embed_with_config(&secret, "pw", &carrier, CarrierKind::Audio, &config)
        .unwrap()
        .bytes;

    // Samples start at byte 44, which is exactly where the fallback looks.
    corrupt_data_tag(&mut embedded);
    let recovered = extract_with_config(&embedded, CarrierKind::Audio, "pw", &config).unwrap();
    assert_eq!(recovered, secret);
}

#[test]
fn test_audio_corrupted_header_without_secret() {
    let mut carrier = canonical_wav(&[0u8; 8000]);
    corrupt_data_tag(&mut carrier);

    let result = extract_with_config(&carrier, CarrierKind::Audio, "pw", &fast_config());
    assert!(matches!(
        result,
        Err(EnvelopeError::Stego(StegoError::NoEmbeddedData))
    ));
}

#[test]
fn test_video_roundtrip() {
    let config = fast_config();
    let carrier = pseudo_video(1_000_000);
    let content: Vec<u8> = (0..100u8).collect();
    let secret = Secret::video(content.clone()).with_size(100);

    let embedded = embed_with_config(&secret, "pw", &carrier, CarrierKind::Video, &config).unwrap();
    assert_eq!(&embedded.bytes[..carrier.len()], carrier.as_slice());
    assert!(embedded.bytes.len() - carrier.len() <= carrier.len() / 100);

    let recovered = extract_with_config(&embedded.bytes, CarrierKind::Video, "pw", &config).unwrap();
    assert_eq!(recovered.content(), content.as_slice());
    assert_eq!(recovered.size, Some(100));
}

#[test]
fn test_video_overhead_limit() {
    let carrier = pseudo_video(5_000);
    let secret = Secret::video(vec![7u8; 100]);

    let result = embed_with_config(&secret, "pw", &carrier, CarrierKind::Video, &fast_config());
    assert!(matches!(
        result,
        Err(EnvelopeError::Stego(StegoError::InsufficientCapacity {
            capacity: 50,
            ..
        }))
    ));
}

#[test]
fn test_video_wrong_passphrase() {
    let config = fast_config();
    let carrier = pseudo_video(100_000);
    let embedded = embed_with_config(
        &Secret::text("x"),
        "pw",
        &carrier,
        CarrierKind::Video,
        &config,
    )
    .unwrap();

    let result = extract_with_config(&embedded.bytes, CarrierKind::Video, "PW", &config);
    assert!(matches!(
        result,
        Err(EnvelopeError::Crypto(CryptoError::AuthenticationFailed))
    ));
}

#[test]
fn test_video_tampered_blob() {
    let config = fast_config();
    let carrier = pseudo_video(100_000);
    let mut bytes = embed_with_config(
        &Secret::text("do not touch"),
        "pw",
        &carrier,
        CarrierKind::Video,
        &config,
    )
    .unwrap()
    .bytes;

    let last = bytes.len() - 1;
    bytes[last] ^= 0x80;
    let result = extract_with_config(&bytes, CarrierKind::Video, "pw", &config);
    assert!(matches!(
        result,
        Err(EnvelopeError::Crypto(CryptoError::AuthenticationFailed))
    ));
}

#[test]
fn test_kdf_iterations_must_match() {
    let carrier = pseudo_video(100_000);
    let embedded = embed_with_config(
        &Secret::text("x"),
        "pw",
        &carrier,
        CarrierKind::Video,
        &fast_config(),
    )
    .unwrap();

    let other = StegoConfig {
        kdf_iterations: MIN_ITERATIONS + 1,
        ..Default::default()
    };
    let result = extract_with_config(&embedded.bytes, CarrierKind::Video, "pw", &other);
    assert!(matches!(
        result,
        Err(EnvelopeError::Crypto(CryptoError::AuthenticationFailed))
    ));
}

#[test]
fn test_payload_limit_from_config() {
    let config = StegoConfig {
        max_payload_size: 64,
        ..fast_config()
    };
    let carrier = pseudo_video(1_000_000);
    let result = embed_with_config(
        &Secret::text("a".repeat(100)),
        "pw",
        &carrier,
        CarrierKind::Video,
        &config,
    );
    assert!(matches!(
        result,
        Err(EnvelopeError::Stego(StegoError::PayloadTooLarge { max: 64, .. }))
    ));
}

#[test]
fn test_plaintext_budget_per_kind() {
    let config = fast_config();

    let png = png_carrier(100, 100);
    let image = open_codec(CarrierKind::Image, &png, &config).unwrap();
    assert_eq!(image.capacity(), 3750);
    assert_eq!(plaintext_budget(image.as_ref()), 3698);

    let wav = canonical_wav(&[0u8; 8000]);
    let audio = open_codec(CarrierKind::Audio, &wav, &config).unwrap();
    assert_eq!(audio.capacity(), 1000);

    let video_bytes = pseudo_video(1_000_000);
    let video = open_codec(CarrierKind::Video, &video_bytes, &config).unwrap();
    assert_eq!(video.capacity(), 10_000);
}
