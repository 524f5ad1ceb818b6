use image::RgbaImage;

use crate::error::Result;
use crate::symbol::Palette;

/// One replaceable overlay step of the render pipeline.
///
/// `S` is the overlay specification the step is driven by. A stage only
/// runs when its specification is attached to the [`QrCode`](crate::QrCode),
/// and receives a snapshot of the symbol colors taken when the render
/// started.
///
/// Any `Fn(RgbaImage, &S, Palette) -> Result<RgbaImage>` closure is a
/// stage, which is the easy way to swap one in:
///
/// ```
/// use image::RgbaImage;
/// use qr_overlay::{AvatarSpec, Level, Palette, QrCode};
///
/// let mut qr = QrCode::new("https://example.com", Level::Medium)?;
/// qr.set_create_avatar(
///     |image: RgbaImage, _: &AvatarSpec, _: Palette| -> qr_overlay::Result<RgbaImage> {
///         Ok(image)
///     },
/// );
/// # Ok::<(), qr_overlay::Error>(())
/// ```
pub trait Transform<S>: Send + Sync {
    fn apply(&self, image: RgbaImage, spec: &S, palette: Palette) -> Result<RgbaImage>;
}

impl<S, F> Transform<S> for F
where
    F: Fn(RgbaImage, &S, Palette) -> Result<RgbaImage> + Send + Sync,
{
    fn apply(&self, image: RgbaImage, spec: &S, palette: Palette) -> Result<RgbaImage> {
        self(image, spec, palette)
    }
}
