//! Image decoding into straight-alpha RGBA8.
//!
//! Accepts raw image bytes (PNG, JPEG, BMP, WebP) and produces the
//! `RgbaImage` the mask builder and compositor work on. Formats without
//! an alpha channel decode as fully opaque.

use image::RgbaImage;

use crate::types::BorderError;

/// Decode raw image bytes and convert to RGBA8.
///
/// # Errors
///
/// Returns [`BorderError::EmptyInput`] if `bytes` is empty.
/// Returns [`BorderError::ImageDecode`] if the image format is
/// unrecognized or the data is corrupt.
pub fn decode_rgba(bytes: &[u8]) -> Result<RgbaImage, BorderError> {
    if bytes.is_empty() {
        return Err(BorderError::EmptyInput);
    }

    let img = image::load_from_memory(bytes)?;
    Ok(img.to_rgba8())
}

/// Encode an RGBA image as PNG bytes.
///
/// # Errors
///
/// Returns [`BorderError::ImageEncode`] if the encoder rejects the buffer.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, BorderError> {
    let mut buf = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut buf);
    image::ImageEncoder::write_image(
        encoder,
        image.as_raw(),
        image.width(),
        image.height(),
        image::ExtendedColorType::Rgba8,
    )
    .map_err(|e| BorderError::ImageEncode(e.to_string()))?;
    Ok(buf)
}
