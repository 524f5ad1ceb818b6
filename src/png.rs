//! Lossless output encoding.

use image::codecs::png::{CompressionType, FilterType, PngDecoder, PngEncoder};
use image::{DynamicImage, ExtendedColorType, ImageEncoder, RgbaImage};
use std::io::Cursor;

use crate::error::{Error, Result};

/// Encodes `image` as a PNG with the strongest compression available.
pub fn encode(image: &RgbaImage) -> Result<Vec<u8>> {
    encode_rgba(image).map_err(Error::Encode)
}

/// Brings any decoded image into plain 8-bit RGBA by a PNG round trip.
///
/// Used by [`ImageSource::load`](crate::ImageSource::load) for images
/// handed over already decoded.
///
/// Failures in either direction are reported as [`Error::Reencode`].
pub fn normalize(image: &DynamicImage) -> Result<RgbaImage> {
    let bytes = encode_rgba(&image.to_rgba8()).map_err(Error::Reencode)?;
    let decoder = PngDecoder::new(Cursor::new(bytes)).map_err(Error::Reencode)?;
    let decoded = DynamicImage::from_decoder(decoder).map_err(Error::Reencode)?;
    Ok(decoded.into_rgba8())
}

fn encode_rgba(image: &RgbaImage) -> image::ImageResult<Vec<u8>> {
    let mut buf = Vec::new();
    PngEncoder::new_with_quality(&mut buf, CompressionType::Best, FilterType::Adaptive)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgba8,
        )?;
    Ok(buf)
}
