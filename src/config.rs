//! JSON render configuration.
//!
//! ```json
//! {
//!   "content": "https://example.com",
//!   "level": "high",
//!   "size": 512,
//!   "foreground_color": "#1a237e",
//!   "avatar": { "path": "logo.png", "width": 96, "height": 96 },
//!   "background": { "path": "poster.jpg", "width": 400, "height": 400, "x": 120, "y": 300 }
//! }
//! ```

use std::path::{Path, PathBuf};

use image::Rgba;
use serde::Deserialize;

use crate::avatar::AvatarSpec;
use crate::background::BackgroundSpec;
use crate::error::{Error, Result};
use crate::qr::QrCode;
use crate::symbol::Level;

pub const DEFAULT_SIZE: u32 = 256;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub content: String,
    pub level: Level,
    /// Side of the symbol in pixels.
    pub size: u32,
    /// CSS color of the dark modules.
    pub foreground_color: Option<String>,
    /// CSS color of the light modules and quiet zone.
    pub background_color: Option<String>,
    pub disable_border: bool,
    pub avatar: Option<AvatarConfig>,
    pub background: Option<BackgroundConfig>,
    /// Image filling the dark modules.
    pub foreground: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            content: String::new(),
            level: Level::default(),
            size: DEFAULT_SIZE,
            foreground_color: None,
            background_color: None,
            disable_border: false,
            avatar: None,
            background: None,
            foreground: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AvatarConfig {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackgroundConfig {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub x: i64,
    #[serde(default)]
    pub y: i64,
}

impl RenderConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json(&json)
    }

    /// Encodes the content and attaches every configured overlay.
    pub fn build(&self) -> Result<QrCode> {
        if self.content.is_empty() {
            return Err(Error::config("content must not be empty"));
        }

        let mut qr = QrCode::new(&self.content, self.level)?;
        if let Some(color) = &self.foreground_color {
            qr.set_foreground_color(parse_color(color)?);
        }
        if let Some(color) = &self.background_color {
            qr.set_background_color(parse_color(color)?);
        }
        qr.disable_border(self.disable_border);

        if let Some(path) = &self.foreground {
            qr.set_foreground_image(path.clone());
        }
        qr.set_avatar(
            self.avatar
                .as_ref()
                .map(|a| AvatarSpec::new(a.path.clone(), a.width, a.height)),
        );
        qr.set_background_image(self.background.as_ref().map(|b| {
            BackgroundSpec::new(b.path.clone(), b.width, b.height).at(b.x, b.y)
        }));

        Ok(qr)
    }
}

/// Parses any CSS color (`#fff`, `#00000080`, `rgb(...)`, `navy`, ...).
pub fn parse_color(s: &str) -> Result<Rgba<u8>> {
    csscolorparser::parse(s)
        .map(|c| Rgba(c.to_rgba8()))
        .map_err(|e| Error::config(format!("invalid color {s:?}: {e}")))
}
