use image::{RgbaImage, imageops};

use crate::error::Result;
use crate::resample;
use crate::source::{ImageSource, Overlay};
use crate::stage::Transform;
use crate::symbol::Palette;

/// Image the symbol is pasted onto.
///
/// The symbol is resized to `width`×`height` and its top-left corner placed
/// at (`x`, `y`) on the background. The background keeps its native size
/// and becomes the output canvas.
#[derive(Debug, Clone)]
pub struct BackgroundSpec {
    pub source: ImageSource,
    pub width: u32,
    pub height: u32,
    pub x: i64,
    pub y: i64,
}

impl BackgroundSpec {
    pub fn new(source: impl Into<ImageSource>, width: u32, height: u32) -> Self {
        Self {
            source: source.into(),
            width,
            height,
            x: 0,
            y: 0,
        }
    }

    pub fn at(mut self, x: i64, y: i64) -> Self {
        self.x = x;
        self.y = y;
        self
    }
}

/// Default background stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnchorBackground;

impl Transform<BackgroundSpec> for AnchorBackground {
    fn apply(&self, image: RgbaImage, spec: &BackgroundSpec, _: Palette) -> Result<RgbaImage> {
        let canvas = spec.source.load(Overlay::Background)?.into_rgba8();
        let symbol = resample::resize(&image, spec.width, spec.height);
        Ok(paste(canvas, &symbol, spec.x, spec.y))
    }
}

/// Draws `symbol` source-over onto `canvas` at (`x`, `y`), clipping
/// anything that falls outside.
pub fn paste(mut canvas: RgbaImage, symbol: &RgbaImage, x: i64, y: i64) -> RgbaImage {
    let (width, height) = canvas.dimensions();
    if x.saturating_add(i64::from(symbol.width())) > i64::from(width)
        || y.saturating_add(i64::from(symbol.height())) > i64::from(height)
        || x < 0
        || y < 0
    {
        tracing::warn!(
            x,
            y,
            width,
            height,
            "symbol extends past the background and will be clipped"
        );
    }
    imageops::overlay(&mut canvas, symbol, x, y);
    canvas
}
