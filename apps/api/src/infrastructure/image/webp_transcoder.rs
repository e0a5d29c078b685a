use crate::{config::Config, domain::upload::entity::OptimizedImage};
use image::{
    DynamicImage, ImageDecoder, ImageError, ImageReader, imageops::FilterType,
    metadata::Orientation,
};
use std::io::Cursor;
use thiserror::Error;
use tracing::debug;
use webp::{Encoder, WebPConfig};

#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("Invalid or unsupported image data: {0}")]
    Decode(#[from] ImageError),
    #[error("Image has no pixels")]
    Empty,
    #[error("WebP encoding failed: {0}")]
    Encode(String),
}

/// Knobs of the resize + encode step.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscodeOptions {
    /// Upright images wider than this are scaled down, aspect preserved.
    pub max_width: u32,
    /// Lossy quality factor, 0-100.
    pub quality: f32,
    /// libwebp `method`, 0 (fast) to 6 (small).
    pub effort: i32,
}

impl Default for TranscodeOptions {
    fn default() -> Self {
        Self {
            max_width: 2000,
            quality: 85.0,
            effort: 4,
        }
    }
}

impl From<&Config> for TranscodeOptions {
    fn from(config: &Config) -> Self {
        Self {
            max_width: config.image_max_width,
            quality: config.webp_quality,
            effort: config.webp_effort,
        }
    }
}

/// Turns arbitrary uploaded images into bounded, upright, lossy WebP.
///
/// CPU bound; callers on the async runtime should run it via `spawn_blocking`.
#[derive(Debug, Clone, Default)]
pub struct WebpTranscoder {
    options: TranscodeOptions,
}

impl WebpTranscoder {
    pub fn new(options: TranscodeOptions) -> Self {
        Self { options }
    }

    /// Decodes `data`, applies its EXIF orientation, caps the width and
    /// re-encodes as lossy WebP.
    pub fn transcode(&self, data: &[u8]) -> Result<OptimizedImage, TranscodeError> {
        let img = decode_upright(data)?;
        if img.width() == 0 || img.height() == 0 {
            return Err(TranscodeError::Empty);
        }
        let img = self.fit_width(img);
        let encoded = self.encode(&img)?;

        debug!(
            "WebP conversion complete: {}x{}, {} -> {} bytes",
            img.width(),
            img.height(),
            data.len(),
            encoded.len()
        );

        Ok(OptimizedImage {
            data: encoded,
            width: img.width(),
            height: img.height(),
        })
    }

    fn fit_width(&self, img: DynamicImage) -> DynamicImage {
        let max_width = self.options.max_width;
        if max_width > 0 && img.width() > max_width {
            debug!(
                "Resizing image from {}x{} to max width {}",
                img.width(),
                img.height(),
                max_width
            );
            img.resize(max_width, u32::MAX, FilterType::Lanczos3)
        } else {
            img
        }
    }

    fn encode(&self, img: &DynamicImage) -> Result<Vec<u8>, TranscodeError> {
        let mut config = WebPConfig::new()
            .map_err(|_| TranscodeError::Encode("libwebp rejected the default config".into()))?;
        config.lossless = 0;
        config.quality = self.options.quality;
        config.method = self.options.effort;

        let (width, height) = (img.width(), img.height());
        let memory = if img.color().has_alpha() {
            let rgba = img.to_rgba8();
            Encoder::from_rgba(rgba.as_raw(), width, height).encode_advanced(&config)
        } else {
            let rgb = img.to_rgb8();
            Encoder::from_rgb(rgb.as_raw(), width, height).encode_advanced(&config)
        }
        .map_err(|e| TranscodeError::Encode(format!("{:?}", e)))?;

        Ok(memory.to_vec())
    }
}

/// Decodes an image and rotates/flips its pixels according to the embedded
/// orientation tag, so the result needs no metadata to display correctly.
fn decode_upright(data: &[u8]) -> Result<DynamicImage, TranscodeError> {
    let mut decoder = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(ImageError::IoError)?
        .into_decoder()?;
    let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);
    let mut img = DynamicImage::from_decoder(decoder)?;
    img.apply_orientation(orientation);
    Ok(img)
}
