use std::path::PathBuf;

use crate::source::Overlay;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can stop a render.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to encode QR symbol: {0}")]
    Symbol(#[from] qrcode::types::QrError),

    #[error("failed to open {overlay} image {}: {source}", .path.display())]
    Open {
        overlay: Overlay,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {overlay} image: {source}")]
    Decode {
        overlay: Overlay,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to encode PNG: {0}")]
    Encode(#[source] image::ImageError),

    #[error("PNG re-encode failed: {0}")]
    Reencode(#[source] image::ImageError),

    #[error("failed to write output: {0}")]
    Sink(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("{overlay} stage failed: {source}")]
    Stage {
        overlay: Overlay,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Wraps an arbitrary failure raised by a caller-supplied stage.
    pub fn stage(
        overlay: Overlay,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Stage {
            overlay,
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_error_names_overlay_and_path() {
        let err = Error::Open {
            overlay: Overlay::Avatar,
            path: PathBuf::from("missing/logo.png"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        let msg = err.to_string();
        assert!(msg.contains("avatar"));
        assert!(msg.contains("missing/logo.png"));
    }

    #[test]
    fn stage_error_keeps_source_message() {
        let err = Error::stage(Overlay::Background, "canvas too small");
        assert_eq!(err.to_string(), "background stage failed: canvas too small");
    }
}
