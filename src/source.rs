use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageError, ImageReader};

use crate::error::{Error, Result};
use crate::png;

/// The overlay a stage, source or error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Foreground,
    Avatar,
    Background,
}

impl fmt::Display for Overlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Foreground => "foreground",
            Self::Avatar => "avatar",
            Self::Background => "background",
        })
    }
}

/// Where an overlay image comes from.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// An image file; the format is guessed from its content.
    File(PathBuf),
    /// An encoded image held in memory.
    Bytes(Vec<u8>),
    /// An image that is already decoded. It is brought into 8-bit RGBA on
    /// load, whatever its pixel type.
    Image(DynamicImage),
}

impl ImageSource {
    /// Reads and decodes the source.
    ///
    /// Files are opened and closed within this call, whichever way it exits.
    pub fn load(&self, overlay: Overlay) -> Result<DynamicImage> {
        match self {
            Self::File(path) => {
                let open_err = |source| Error::Open {
                    overlay,
                    path: path.clone(),
                    source,
                };
                let reader = ImageReader::open(path)
                    .map_err(open_err)?
                    .with_guessed_format()
                    .map_err(open_err)?;
                let image = reader
                    .decode()
                    .map_err(|source| Error::Decode { overlay, source })?;
                tracing::debug!(
                    %overlay,
                    path = %path.display(),
                    width = image.width(),
                    height = image.height(),
                    "loaded overlay image"
                );
                Ok(image)
            }
            Self::Bytes(bytes) => ImageReader::new(Cursor::new(bytes))
                .with_guessed_format()
                .map_err(ImageError::IoError)
                .and_then(|reader| reader.decode())
                .map_err(|source| Error::Decode { overlay, source }),
            Self::Image(image) => png::normalize(image).map(DynamicImage::ImageRgba8),
        }
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

impl From<&Path> for ImageSource {
    fn from(path: &Path) -> Self {
        Self::File(path.to_path_buf())
    }
}

impl From<&str> for ImageSource {
    fn from(path: &str) -> Self {
        Self::File(PathBuf::from(path))
    }
}

impl From<DynamicImage> for ImageSource {
    fn from(image: DynamicImage) -> Self {
        Self::Image(image)
    }
}
