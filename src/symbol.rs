use std::str::FromStr;

use image::{Rgba, RgbaImage};
use qrcode::{Color, EcLevel};

use crate::error::{Error, Result};

/// Modules of quiet zone drawn on each side unless the border is disabled.
pub const QUIET_ZONE: usize = 4;

/// Error-correction level, trading density for damage tolerance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Recovers 7% of damaged data.
    Low,
    /// Recovers 15% of damaged data.
    #[default]
    Medium,
    /// Recovers 25% of damaged data.
    High,
    /// Recovers 30% of damaged data.
    Highest,
}

impl From<Level> for EcLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::Low => EcLevel::L,
            Level::Medium => EcLevel::M,
            Level::High => EcLevel::Q,
            Level::Highest => EcLevel::H,
        }
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" | "l" => Ok(Self::Low),
            "medium" | "m" => Ok(Self::Medium),
            "high" | "q" => Ok(Self::High),
            "highest" | "h" => Ok(Self::Highest),
            other => Err(Error::config(format!(
                "unknown error-correction level {other:?} (expected low, medium, high or highest)"
            ))),
        }
    }
}

/// Ink and paper colors of the symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub foreground: Rgba<u8>,
    pub background: Rgba<u8>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            foreground: Rgba([0, 0, 0, 255]),
            background: Rgba([255, 255, 255, 255]),
        }
    }
}

/// An encoded QR symbol that can be rasterised at any size.
#[derive(Debug, Clone)]
pub struct Symbol {
    width: usize,
    modules: Vec<Color>,
    palette: Palette,
    border: bool,
}

impl Symbol {
    pub fn new(content: impl AsRef<[u8]>, level: Level) -> Result<Self> {
        let code = qrcode::QrCode::with_error_correction_level(content, level.into())?;
        Ok(Self {
            width: code.width(),
            modules: code.to_colors(),
            palette: Palette::default(),
            border: true,
        })
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    pub fn set_foreground_color(&mut self, color: Rgba<u8>) {
        self.palette.foreground = color;
    }

    pub fn set_background_color(&mut self, color: Rgba<u8>) {
        self.palette.background = color;
    }

    pub fn disable_border(&mut self, disable: bool) {
        self.border = !disable;
    }

    /// Side length in modules, quiet zone included.
    pub fn modules(&self) -> usize {
        if self.border {
            self.width + 2 * QUIET_ZONE
        } else {
            self.width
        }
    }

    /// Renders a `size`×`size` bitmap.
    ///
    /// Every pixel takes the color of the module it falls in, so the
    /// requested size is honoured exactly. Sizes below the module count are
    /// raised to it.
    pub fn image(&self, size: u32) -> RgbaImage {
        let modules = self.modules();
        let size = size.max(modules as u32);
        let margin = if self.border { QUIET_ZONE } else { 0 };

        // Module index along one axis, or None inside the quiet zone.
        let module_at = |pixel: u32| -> Option<usize> {
            let m = pixel as usize * modules / size as usize;
            m.checked_sub(margin).filter(|&m| m < self.width)
        };

        RgbaImage::from_fn(size, size, |x, y| {
            let dark = match (module_at(x), module_at(y)) {
                (Some(mx), Some(my)) => self.modules[my * self.width + mx] == Color::Dark,
                _ => false,
            };
            if dark {
                self.palette.foreground
            } else {
                self.palette.background
            }
        })
    }
}
