//! Lanczos rescaling shared by every overlay stage.

use image::RgbaImage;
use image::imageops::{self, FilterType};

/// Filter used at every resize call site.
pub const FILTER: FilterType = FilterType::Lanczos3;

/// Resizes `image` to exactly `width`×`height`, stretching if needed.
///
/// A zero dimension is derived from the other one so that the source
/// aspect ratio is kept; both zero keeps the source size.
pub fn resize(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let (width, height) = target_dimensions(image.dimensions(), (width, height));
    if (width, height) == image.dimensions() {
        return image.clone();
    }
    imageops::resize(image, width, height, FILTER)
}

pub(crate) fn target_dimensions(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    match target {
        (0, 0) => source,
        (0, h) if src_h > 0 => (scale(src_w, h, src_h), h),
        (w, 0) if src_w > 0 => (w, scale(src_h, w, src_w)),
        other => other,
    }
}

fn scale(value: u32, num: u32, den: u32) -> u32 {
    let scaled = (f64::from(value) * f64::from(num) / f64::from(den)).round();
    (scaled as u32).max(1)
}
