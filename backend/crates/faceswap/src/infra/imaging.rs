//! Image codec operations
//!
//! Thin, synchronous wrappers over the `image` crate. Callers run these on
//! the blocking pool.

use std::io::{Cursor, Write};
use std::path::Path;

use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader, Rgb, RgbImage};

/// 3x3 smoothing kernel of the classic sharpness enhancement (sum 13)
const SMOOTH_KERNEL: [[f32; 3]; 3] = [[1.0, 1.0, 1.0], [1.0, 5.0, 1.0], [1.0, 1.0, 1.0]];
const SMOOTH_KERNEL_SUM: f32 = 13.0;

#[derive(Debug, thiserror::Error)]
pub enum ImagingError {
    #[error("failed to read image: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("failed to write image: {0}")]
    Write(#[source] std::io::Error),
}

/// PNG bytes produced by [`normalize_image`]
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub resized: bool,
}

/// Decode an in-memory image, guessing the format from its magic bytes
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, ImagingError> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .decode()
        .map_err(ImagingError::Decode)
}

/// Decode an image file, guessing the format from its content
pub fn load(path: &Path) -> Result<DynamicImage, ImagingError> {
    ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(ImagingError::Decode)
}

/// Shrink so neither side exceeds `max_dimension`, keeping the aspect ratio.
/// Images already inside the bound are returned untouched.
pub fn fit_within(img: DynamicImage, max_dimension: u32) -> (DynamicImage, bool) {
    let bound = max_dimension.max(1);
    let (width, height) = img.dimensions();
    if width <= bound && height <= bound {
        return (img, false);
    }
    (img.resize(bound, bound, FilterType::Lanczos3), true)
}

/// Encode as PNG with maximum compression
pub fn encode_png_optimized(img: &DynamicImage) -> Result<Vec<u8>, ImagingError> {
    let mut buffer = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut buffer, CompressionType::Best, PngFilter::Adaptive);
    img.write_with_encoder(encoder)
        .map_err(ImagingError::Encode)?;
    Ok(buffer)
}

/// Decode, bound and re-encode an upload as PNG
pub fn normalize_image(bytes: &[u8], max_dimension: u32) -> Result<EncodedImage, ImagingError> {
    let img = decode(bytes)?;
    let (img, resized) = fit_within(img, max_dimension);
    let (width, height) = img.dimensions();
    let bytes = encode_png_optimized(&img)?;
    Ok(EncodedImage {
        bytes,
        width,
        height,
        resized,
    })
}

/// Convert to 8-bit RGB (dropping alpha and palette) and write a PNG
pub fn save_rgb_png(img: &DynamicImage, path: &Path) -> Result<(), ImagingError> {
    img.to_rgb8()
        .save_with_format(path, ImageFormat::Png)
        .map_err(ImagingError::Encode)
}

/// Sharpness enhancement: `smooth + factor * (original - smooth)`.
///
/// Border pixels are copied unchanged. A factor of 1.0 is the identity.
pub fn enhance_sharpness(img: &RgbImage, factor: f32) -> RgbImage {
    let (width, height) = img.dimensions();
    let mut out = img.clone();
    if width < 3 || height < 3 {
        return out;
    }

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let mut acc = [0.0f32; 3];
            for (ky, row) in SMOOTH_KERNEL.iter().enumerate() {
                for (kx, weight) in row.iter().enumerate() {
                    let pixel = img.get_pixel(x + kx as u32 - 1, y + ky as u32 - 1);
                    for (channel, sum) in acc.iter_mut().enumerate() {
                        *sum += weight * f32::from(pixel[channel]);
                    }
                }
            }

            let original = img.get_pixel(x, y);
            let mut sharpened = [0u8; 3];
            for channel in 0..3 {
                let smooth = acc[channel] / SMOOTH_KERNEL_SUM;
                let value = smooth + factor * (f32::from(original[channel]) - smooth);
                sharpened[channel] = value.round().clamp(0.0, 255.0) as u8;
            }
            out.put_pixel(x, y, Rgb(sharpened));
        }
    }
    out
}

/// Sharpen a PNG on disk and replace it.
///
/// The new file is written in `staging_dir` and renamed over `path`, so on
/// any failure `path` still holds the previous image. `staging_dir` must be
/// on the same filesystem as `path`.
pub fn sharpen_file(path: &Path, staging_dir: &Path, factor: f32) -> Result<(), ImagingError> {
    let img = load(path)?.to_rgb8();
    let mut encoded = Cursor::new(Vec::new());
    enhance_sharpness(&img, factor)
        .write_to(&mut encoded, ImageFormat::Png)
        .map_err(ImagingError::Encode)?;

    let mut staged = tempfile::NamedTempFile::new_in(staging_dir).map_err(ImagingError::Write)?;
    staged
        .write_all(encoded.get_ref())
        .and_then(|()| staged.as_file().sync_all())
        .map_err(ImagingError::Write)?;
    staged
        .persist(path)
        .map_err(|e| ImagingError::Write(e.error))?;
    Ok(())
}
