//! Photo compression before upload
//!
//! Photos are downscaled so the longest edge fits `max_dimension`, then
//! re-encoded as JPEG, stepping the quality down until the encoded size fits
//! `target_bytes` or `min_quality` is reached.

use crate::config::PhotoConfig;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

const QUALITY_STEP: u8 = 10;

#[derive(Debug, thiserror::Error)]
pub enum PhotoError {
    #[error("photo is empty")]
    Empty,
    #[error("unsupported or corrupt image: {0}")]
    Decode(String),
    #[error("jpeg encoding failed: {0}")]
    Encode(String),
}

/// A compressed photo ready for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedPhoto {
    pub jpeg: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub quality: u8,
}

impl CompressedPhoto {
    pub fn len(&self) -> usize {
        self.jpeg.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jpeg.is_empty()
    }
}

pub fn compress_photo(bytes: &[u8], limits: &PhotoConfig) -> Result<CompressedPhoto, PhotoError> {
    if bytes.is_empty() {
        return Err(PhotoError::Empty);
    }
    let decoded = image::load_from_memory(bytes).map_err(|e| PhotoError::Decode(e.to_string()))?;
    let scaled = downscale(decoded, limits.max_dimension);
    let (width, height) = scaled.dimensions();
    let rgb = scaled.to_rgb8();

    let floor = limits.min_quality.clamp(1, 100);
    let mut quality = limits.initial_quality.clamp(floor, 100);
    loop {
        let jpeg = encode_jpeg(rgb.as_raw(), width, height, quality)?;
        if jpeg.len() <= limits.target_bytes || quality <= floor {
            tracing::debug!(
                width,
                height,
                quality,
                bytes = jpeg.len(),
                "Photo compressed"
            );
            return Ok(CompressedPhoto {
                jpeg,
                width,
                height,
                quality,
            });
        }
        quality = quality.saturating_sub(QUALITY_STEP).max(floor);
    }
}

fn downscale(image: DynamicImage, max_dimension: u32) -> DynamicImage {
    let (w, h) = image.dimensions();
    if max_dimension == 0 || (w <= max_dimension && h <= max_dimension) {
        return image;
    }
    // resize keeps the aspect ratio and fits inside the bounds
    image.resize(max_dimension, max_dimension, FilterType::Lanczos3)
}

fn encode_jpeg(rgb: &[u8], width: u32, height: u32, quality: u8) -> Result<Vec<u8>, PhotoError> {
    let mut out = Vec::new();
    let mut enc = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, quality);
    enc.encode(rgb, width, height, image::ExtendedColorType::Rgb8)
        .map_err(|e| PhotoError::Encode(e.to_string()))?;
    Ok(out)
}
