//! Fills the dark modules of a symbol with the content of another image.
//!
//! Only ink pixels are touched. Paper pixels (quiet zone and light modules)
//! keep their original color, which is what keeps the result scannable.

use std::borrow::Cow;

use image::{Rgba, RgbaImage};

use crate::error::Result;
use crate::resample;
use crate::source::{ImageSource, Overlay};
use crate::stage::Transform;
use crate::symbol::Palette;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Image whose pixels replace the ink pixels of the symbol.
///
/// The image is stretched to the symbol's size when they differ.
#[derive(Debug, Clone)]
pub struct ForegroundSpec {
    pub source: ImageSource,
}

impl ForegroundSpec {
    pub fn new(source: impl Into<ImageSource>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

/// Default foreground stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct Recolor;

impl Transform<ForegroundSpec> for Recolor {
    fn apply(
        &self,
        image: RgbaImage,
        spec: &ForegroundSpec,
        palette: Palette,
    ) -> Result<RgbaImage> {
        let fill = spec.source.load(Overlay::Foreground)?.into_rgba8();
        Ok(recolor(image, &fill, palette.background))
    }
}

/// A pixel is paper when it is opaque white or exactly the symbol background.
pub fn is_paper(pixel: Rgba<u8>, background: Rgba<u8>) -> bool {
    pixel == WHITE || pixel == background
}

/// Replaces every ink pixel of `bitmap` with the pixel at the same position
/// in `fill`, alpha included.
pub fn recolor(mut bitmap: RgbaImage, fill: &RgbaImage, background: Rgba<u8>) -> RgbaImage {
    let (width, height) = bitmap.dimensions();
    let fill = if fill.dimensions() == (width, height) {
        Cow::Borrowed(fill)
    } else {
        Cow::Owned(resample::resize(fill, width, height))
    };

    let mut replaced = 0usize;
    for (x, y, pixel) in bitmap.enumerate_pixels_mut() {
        if is_paper(*pixel, background) {
            continue;
        }
        *pixel = *fill.get_pixel(x, y);
        replaced += 1;
    }

    tracing::debug!(width, height, replaced, "recolored foreground");
    bitmap
}
