use image::{RgbaImage, imageops};

use crate::error::Result;
use crate::resample;
use crate::source::{ImageSource, Overlay};
use crate::stage::Transform;
use crate::symbol::Palette;

/// Image pasted over the middle of the symbol.
#[derive(Debug, Clone)]
pub struct AvatarSpec {
    pub source: ImageSource,
    pub width: u32,
    pub height: u32,
}

impl AvatarSpec {
    pub fn new(source: impl Into<ImageSource>, width: u32, height: u32) -> Self {
        Self {
            source: source.into(),
            width,
            height,
        }
    }
}

/// Default avatar stage: resize, then alpha-blend over the center.
#[derive(Debug, Clone, Copy, Default)]
pub struct CenterAvatar;

impl Transform<AvatarSpec> for CenterAvatar {
    fn apply(&self, image: RgbaImage, spec: &AvatarSpec, _: Palette) -> Result<RgbaImage> {
        let avatar = spec.source.load(Overlay::Avatar)?.into_rgba8();
        let avatar = resample::resize(&avatar, spec.width, spec.height);
        Ok(overlay_centered(image, &avatar))
    }
}

/// Top-left corner that centers an `overlay` sized box on a `base` sized
/// one, truncated toward zero. Negative when the overlay is larger.
pub fn center_offset(base: (u32, u32), overlay: (u32, u32)) -> (i64, i64) {
    let axis = |b: u32, o: u32| (i64::from(b) - i64::from(o)) / 2;
    (axis(base.0, overlay.0), axis(base.1, overlay.1))
}

/// Draws `avatar` source-over onto the center of `base`.
pub fn overlay_centered(mut base: RgbaImage, avatar: &RgbaImage) -> RgbaImage {
    let (x, y) = center_offset(base.dimensions(), avatar.dimensions());
    tracing::debug!(
        width = avatar.width(),
        height = avatar.height(),
        x,
        y,
        "placing avatar"
    );
    imageops::overlay(&mut base, avatar, x, y);
    base
}
