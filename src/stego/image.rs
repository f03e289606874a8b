//! LSB (Least Significant Bit) steganography for images.
//!
//! Hides data in the least significant bits of pixel color values.
//! Any format the `image` crate can decode is accepted as input; output is always PNG,
//! since lossy formats destroy the hidden bits.
//!
//! One bit per R, G and B channel, pixels walked in row-major order. Alpha is carried
//! over untouched.

use image::{DynamicImage, ImageFormat, RgbaImage};
use std::io::Cursor;
use tracing::debug;

use super::bits::{bit_at, BitCollector};
use super::frame::{frame, FrameScanner, ScanStatus};
use super::{CarrierCodec, CarrierKind, StegoError};
use crate::MAX_PAYLOAD_SIZE;

/// Color channels per pixel that carry data (R, G, B).
const DATA_CHANNELS: usize = 3;

/// Mask that clears the least significant bit.
const LSB_MASK: u8 = 0xFE;

/// Image steganography codec.
pub struct ImageCodec {
    image: RgbaImage,
    max_payload: usize,
}

impl ImageCodec {
    /// Decodes an encoded image (PNG, BMP, JPEG, ...) into a codec.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StegoError> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| StegoError::InvalidCarrier(format!("image decode failed: {}", e)))?;
        Ok(Self::from_image(&image))
    }

    /// Wraps an already decoded image, normalized to 4-channel RGBA.
    pub fn from_image(image: &DynamicImage) -> Self {
        Self::from_rgba(image.to_rgba8())
    }

    pub fn from_rgba(image: RgbaImage) -> Self {
        Self {
            image,
            max_payload: MAX_PAYLOAD_SIZE,
        }
    }

    pub fn with_max_payload(mut self, max_payload: usize) -> Self {
        self.max_payload = max_payload;
        self
    }

    /// Capacity in bytes for an image of the given dimensions.
    pub fn capacity_for(width: u32, height: u32) -> usize {
        (width as usize) * (height as usize) * DATA_CHANNELS / 8
    }

    /// Returns the decoded pixel grid.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Hides `payload` and returns a new pixel grid.
    ///
    /// The payload is framed first; the frame must fit within [`ImageCodec::capacity_for`]
    /// of this image's dimensions.
    pub fn hide(&self, payload: &[u8]) -> Result<RgbaImage, StegoError> {
        let framed = frame(payload, self.max_payload)?;
        let capacity = self.capacity();
        if framed.len() > capacity {
            return Err(StegoError::InsufficientCapacity {
                needed: framed.len(),
                capacity,
            });
        }

        let total_bits = framed.len() * 8;
        let mut output = self.image.clone();
        let mut bit_index = 0;

        // Pixels past the last data bit keep their original values from the clone.
        for pixel in output.pixels_mut() {
            if bit_index >= total_bits {
                break;
            }
            for channel in pixel.0.iter_mut().take(DATA_CHANNELS) {
                if bit_index >= total_bits {
                    break;
                }
                *channel = (*channel & LSB_MASK) | bit_at(&framed, bit_index);
                bit_index += 1;
            }
        }

        debug!(
            width = output.width(),
            height = output.height(),
            framed = framed.len(),
            capacity,
            "payload hidden in image"
        );
        Ok(output)
    }

    /// Encodes a pixel grid as PNG.
    pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, StegoError> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| StegoError::ImageEncode(e.to_string()))?;
        Ok(bytes)
    }
}

impl CarrierCodec for ImageCodec {
    fn kind(&self) -> CarrierKind {
        CarrierKind::Image
    }

    fn capacity(&self) -> usize {
        let (width, height) = self.image.dimensions();
        Self::capacity_for(width, height)
    }

    fn embed(&self, payload: &[u8]) -> Result<Vec<u8>, StegoError> {
        let hidden = self.hide(payload)?;
        Self::encode_png(&hidden)
    }

    fn extract(&self) -> Result<Vec<u8>, StegoError> {
        let mut scanner = FrameScanner::new(self.capacity(), self.max_payload);
        let mut collector = BitCollector::new();

        for pixel in self.image.pixels() {
            for channel in pixel.0.iter().take(DATA_CHANNELS) {
                let Some(byte) = collector.push(channel & 1) else {
                    continue;
                };
                match scanner.push(byte) {
                    ScanStatus::NeedMore => {}
                    ScanStatus::Complete(payload) => {
                        debug!(length = payload.len(), "frame found in image");
                        return Ok(payload);
                    }
                    ScanStatus::Rejected => return Err(StegoError::NoEmbeddedData),
                }
            }
        }

        Err(StegoError::NoEmbeddedData)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HEADER_SIZE;
    use image::{ImageBuffer, Rgb, Rgba};

    fn create_test_image(width: u32, height: u32) -> DynamicImage {
        let img = ImageBuffer::from_fn(width, height, |x, y| {
            Rgb([
                ((x * 17) % 256) as u8,
                ((y * 23) % 256) as u8,
                (((x + y) * 31) % 256) as u8,
            ])
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn test_capacity() {
        let codec = ImageCodec::from_image(&create_test_image(100, 100));

        // 100x100 = 10000 pixels, 3 channels, 1 bit each = 30000 bits = 3750 bytes
        assert_eq!(codec.capacity(), 3750);
        assert_eq!(codec.usable_capacity(), 3742);
        assert_eq!(ImageCodec::capacity_for(3, 3), 3);
    }

    #[test]
    fn test_hide_and_extract_small() {
        let codec = ImageCodec::from_image(&create_test_image(100, 100));
        let data = b"Hello, steganography!";

        let hidden = codec.hide(data).unwrap();
        let extracted = ImageCodec::from_rgba(hidden).extract().unwrap();

        assert_eq!(extracted, data);
    }

    #[test]
    fn test_hide_and_extract_larger() {
        let codec = ImageCodec::from_image(&create_test_image(200, 200));
        let data: Vec<u8> = (0..1000).map(|i| (i % 256) as u8).collect();

        let hidden = codec.hide(&data).unwrap();
        let extracted = ImageCodec::from_rgba(hidden).extract().unwrap();

        assert_eq!(extracted, data);
    }

    #[test]
    fn test_exact_capacity_boundary() {
        let codec = ImageCodec::from_image(&create_test_image(100, 100));
        let fits = vec![0xA5u8; codec.capacity() - HEADER_SIZE];
        let hidden = codec.hide(&fits).unwrap();
        assert_eq!(ImageCodec::from_rgba(hidden).extract().unwrap(), fits);

        let too_big = vec![0xA5u8; codec.capacity() - HEADER_SIZE + 1];
        assert!(matches!(
            codec.hide(&too_big),
            Err(StegoError::InsufficientCapacity {
                needed: 3751,
                capacity: 3750
            })
        ));
    }

    #[test]
    fn test_only_lsbs_change_and_alpha_kept() {
        let img = ImageBuffer::from_fn(20, 20, |x, y| Rgba([x as u8, y as u8, 200, 77]));
        let codec = ImageCodec::from_rgba(img.clone());

        let hidden = codec.hide(b"lsb").unwrap();
        for (before, after) in img.pixels().zip(hidden.pixels()) {
            for channel in 0..3 {
                assert_eq!(before.0[channel] & LSB_MASK, after.0[channel] & LSB_MASK);
            }
            assert_eq!(before.0[3], after.0[3]);
        }
    }

    #[test]
    fn test_pixels_after_payload_untouched() {
        let original = create_test_image(50, 50).to_rgba8();
        let codec = ImageCodec::from_rgba(original.clone());

        let hidden = codec.hide(b"x").unwrap();
        // 9 framed bytes = 72 bits = 24 pixels
        for (index, (before, after)) in original.pixels().zip(hidden.pixels()).enumerate() {
            if index >= 24 {
                assert_eq!(before, after);
            }
        }
    }

    #[test]
    fn test_image_too_small() {
        let codec = ImageCodec::from_image(&create_test_image(10, 10));
        let result = codec.hide(&[0u8; 1000]);
        assert!(matches!(result, Err(StegoError::InsufficientCapacity { .. })));
    }

    #[test]
    fn test_clean_image_has_no_data() {
        let img = ImageBuffer::from_pixel(64, 64, Rgba([10u8, 20, 30, 255]));
        let codec = ImageCodec::from_rgba(img);
        assert!(matches!(codec.extract(), Err(StegoError::NoEmbeddedData)));
    }

    #[test]
    fn test_png_roundtrip() {
        let codec = ImageCodec::from_image(&create_test_image(100, 100));
        let data = b"Test PNG roundtrip";

        let png_bytes = codec.embed(data).unwrap();
        let reloaded = ImageCodec::from_bytes(&png_bytes).unwrap();

        assert_eq!(reloaded.extract().unwrap(), data);
    }

    #[test]
    fn test_invalid_image_bytes() {
        assert!(matches!(
            ImageCodec::from_bytes(b"\x89PNG garbage"),
            Err(StegoError::InvalidCarrier(_))
        ));
    }
}
