//! The render pipeline: symbol, then foreground, avatar and background.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use image::{Rgba, RgbaImage};

use crate::avatar::{AvatarSpec, CenterAvatar};
use crate::background::{AnchorBackground, BackgroundSpec};
use crate::error::Result;
use crate::foreground::{ForegroundSpec, Recolor};
use crate::png;
use crate::source::{ImageSource, Overlay};
use crate::stage::Transform;
use crate::symbol::{Level, Symbol};

/// Anything that can produce a finished QR image and hand it to a sink.
pub trait Render {
    /// Renders the final image. `size` is the symbol's side in pixels.
    fn image(&self, size: u32) -> Result<RgbaImage>;

    /// Renders and encodes as PNG.
    fn png(&self, size: u32) -> Result<Vec<u8>>;

    /// Renders and writes the PNG to `out`.
    fn write<W: Write>(&self, size: u32, out: W) -> Result<()>;

    /// Renders and writes the PNG to `path`.
    ///
    /// Nothing is created when rendering fails.
    fn write_file(&self, size: u32, path: impl AsRef<Path>) -> Result<()>;
}

/// A QR code with optional branding overlays.
///
/// Overlays are applied in a fixed order: the foreground fill first, while
/// the bitmap still only holds ink and paper pixels, then the avatar, then
/// the background, which takes the decorated symbol as a single overlay.
pub struct QrCode {
    symbol: Symbol,
    avatar: Option<AvatarSpec>,
    foreground: Option<ForegroundSpec>,
    background: Option<BackgroundSpec>,
    create_avatar: Box<dyn Transform<AvatarSpec>>,
    create_foreground: Box<dyn Transform<ForegroundSpec>>,
    create_background: Box<dyn Transform<BackgroundSpec>>,
}

impl QrCode {
    pub fn new(content: impl AsRef<[u8]>, level: Level) -> Result<Self> {
        Ok(Self::from_symbol(Symbol::new(content, level)?))
    }

    pub fn from_symbol(symbol: Symbol) -> Self {
        Self {
            symbol,
            avatar: None,
            foreground: None,
            background: None,
            create_avatar: Box::new(CenterAvatar),
            create_foreground: Box::new(Recolor),
            create_background: Box::new(AnchorBackground),
        }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn set_avatar(&mut self, avatar: Option<AvatarSpec>) {
        self.avatar = avatar;
    }

    pub fn set_background_image(&mut self, background: Option<BackgroundSpec>) {
        self.background = background;
    }

    pub fn set_foreground_image(&mut self, source: impl Into<ImageSource>) {
        self.foreground = Some(ForegroundSpec::new(source));
    }

    pub fn clear_foreground_image(&mut self) {
        self.foreground = None;
    }

    pub fn set_foreground_color(&mut self, color: Rgba<u8>) {
        self.symbol.set_foreground_color(color);
    }

    pub fn set_background_color(&mut self, color: Rgba<u8>) {
        self.symbol.set_background_color(color);
    }

    pub fn disable_border(&mut self, disable: bool) {
        self.symbol.disable_border(disable);
    }

    pub fn set_create_avatar(&mut self, stage: impl Transform<AvatarSpec> + 'static) {
        self.create_avatar = Box::new(stage);
    }

    pub fn set_create_foreground(&mut self, stage: impl Transform<ForegroundSpec> + 'static) {
        self.create_foreground = Box::new(stage);
    }

    pub fn set_create_background(&mut self, stage: impl Transform<BackgroundSpec> + 'static) {
        self.create_background = Box::new(stage);
    }
}

impl Render for QrCode {
    fn image(&self, size: u32) -> Result<RgbaImage> {
        let palette = self.symbol.palette();
        let mut image = self.symbol.image(size);
        tracing::debug!(
            width = image.width(),
            height = image.height(),
            "rendered symbol"
        );

        if let Some(spec) = &self.foreground {
            image = self.create_foreground.apply(image, spec, palette)?;
            trace_stage(Overlay::Foreground, &image);
        }

        if let Some(spec) = &self.avatar {
            image = self.create_avatar.apply(image, spec, palette)?;
            trace_stage(Overlay::Avatar, &image);
        }

        if let Some(spec) = &self.background {
            image = self.create_background.apply(image, spec, palette)?;
            trace_stage(Overlay::Background, &image);
        }

        Ok(image)
    }

    fn png(&self, size: u32) -> Result<Vec<u8>> {
        png::encode(&self.image(size)?)
    }

    fn write<W: Write>(&self, size: u32, mut out: W) -> Result<()> {
        let bytes = self.png(size)?;
        out.write_all(&bytes)?;
        out.flush()?;
        Ok(())
    }

    fn write_file(&self, size: u32, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.png(size)?;

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o644);
        }
        options.open(path)?.write_all(&bytes)?;

        tracing::info!(path = %path.display(), bytes = bytes.len(), "wrote QR code");
        Ok(())
    }
}

impl fmt::Debug for QrCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QrCode")
            .field("symbol", &self.symbol)
            .field("avatar", &self.avatar)
            .field("foreground", &self.foreground)
            .field("background", &self.background)
            .finish_non_exhaustive()
    }
}

fn trace_stage(overlay: Overlay, image: &RgbaImage) {
    tracing::debug!(
        %overlay,
        width = image.width(),
        height = image.height(),
        "applied overlay"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::symbol::Palette;
    use image::DynamicImage;
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    fn solid(width: u32, height: u32, color: Rgba<u8>) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, color))
    }

    type Calls = Arc<Mutex<Vec<Overlay>>>;

    fn record<S: 'static>(calls: Calls, overlay: Overlay) -> impl Transform<S> {
        move |image: RgbaImage, _: &S, _: Palette| -> Result<RgbaImage> {
            calls.lock().unwrap().push(overlay);
            Ok(image)
        }
    }

    fn instrumented(qr: &mut QrCode) -> Calls {
        let calls = Calls::default();
        qr.set_create_foreground(record(Arc::clone(&calls), Overlay::Foreground));
        qr.set_create_avatar(record(Arc::clone(&calls), Overlay::Avatar));
        qr.set_create_background(record(Arc::clone(&calls), Overlay::Background));
        calls
    }

    #[test]
    fn stages_run_in_fixed_order_once_each() {
        let mut qr = QrCode::new("https://example.com", Level::Medium).unwrap();
        let calls = instrumented(&mut qr);
        qr.set_background_image(Some(BackgroundSpec::new(solid(1, 1, RED), 1, 1)));
        qr.set_avatar(Some(AvatarSpec::new(solid(1, 1, RED), 1, 1)));
        qr.set_foreground_image(solid(1, 1, RED));

        qr.image(64).unwrap();
        assert_eq!(
            *calls.lock().unwrap(),
            vec![Overlay::Foreground, Overlay::Avatar, Overlay::Background]
        );
    }

    #[test]
    fn stages_without_spec_are_skipped() {
        let mut qr = QrCode::new("https://example.com", Level::Medium).unwrap();
        let calls = instrumented(&mut qr);
        qr.set_avatar(Some(AvatarSpec::new(solid(1, 1, RED), 1, 1)));

        qr.image(64).unwrap();
        assert_eq!(*calls.lock().unwrap(), vec![Overlay::Avatar]);

        calls.lock().unwrap().clear();
        qr.set_avatar(None);
        qr.set_foreground_image(solid(1, 1, RED));
        qr.clear_foreground_image();
        qr.image(64).unwrap();
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn first_failure_aborts_the_rest() {
        let mut qr = QrCode::new("abort", Level::Low).unwrap();
        let calls = instrumented(&mut qr);
        qr.set_create_avatar(|_: RgbaImage, _: &AvatarSpec, _: Palette| -> Result<RgbaImage> {
            Err(Error::stage(Overlay::Avatar, "boom"))
        });
        qr.set_foreground_image(solid(1, 1, RED));
        qr.set_avatar(Some(AvatarSpec::new(solid(1, 1, RED), 1, 1)));
        qr.set_background_image(Some(BackgroundSpec::new(solid(1, 1, RED), 1, 1)));

        let err = qr.image(64).unwrap_err();
        assert_eq!(err.to_string(), "avatar stage failed: boom");
        assert_eq!(*calls.lock().unwrap(), vec![Overlay::Foreground]);
    }

    #[test]
    fn stages_see_colors_set_before_render() {
        let mut qr = QrCode::new("palette", Level::Low).unwrap();
        let seen = Arc::new(Mutex::new(None));
        let log = Arc::clone(&seen);
        qr.set_create_foreground(
            move |image: RgbaImage, _: &ForegroundSpec, palette: Palette| -> Result<RgbaImage> {
                *log.lock().unwrap() = Some(palette);
                Ok(image)
            },
        );
        qr.set_foreground_image(solid(1, 1, RED));
        qr.set_background_color(Rgba([1, 2, 3, 255]));

        qr.image(40).unwrap();
        let palette = seen.lock().unwrap().unwrap();
        assert_eq!(palette.background, Rgba([1, 2, 3, 255]));
        assert_eq!(palette.foreground, Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn write_streams_png_bytes() {
        let qr = QrCode::new("stream", Level::Medium).unwrap();
        let mut out = Vec::new();
        qr.write(100, &mut out).unwrap();

        assert_eq!(out, qr.png(100).unwrap());
        let decoded = image::load_from_memory(&out).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (100, 100));
    }

    #[test]
    fn failed_render_writes_no_file() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("qr.png");
        let mut qr = QrCode::new("https://example.com", Level::Medium).unwrap();
        qr.set_avatar(Some(AvatarSpec::new(dir.path().join("missing.png"), 10, 10)));

        let err = qr.write_file(256, &out).unwrap_err();
        assert!(matches!(err, Error::Open { overlay: Overlay::Avatar, .. }));
        assert!(!out.exists());
    }

    #[cfg(unix)]
    #[test]
    fn written_file_is_not_executable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let out = dir.path().join("qr.png");
        QrCode::new("perm", Level::Low)
            .unwrap()
            .write_file(64, &out)
            .unwrap();

        let mode = std::fs::metadata(&out).unwrap().permissions().mode();
        assert_eq!(mode & 0o600, 0o600);
        assert_eq!(mode & 0o111, 0);
    }

    #[test]
    fn encode_failure_surfaces_and_writes_no_file() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("qr.png");
        let mut qr = QrCode::new("empty", Level::Low).unwrap();
        qr.set_create_avatar(|_: RgbaImage, _: &AvatarSpec, _: Palette| -> Result<RgbaImage> {
            Ok(RgbaImage::new(0, 0))
        });
        qr.set_avatar(Some(AvatarSpec::new(solid(1, 1, RED), 1, 1)));

        assert!(matches!(qr.png(64), Err(Error::Encode(_))));
        assert!(matches!(qr.write_file(64, &out), Err(Error::Encode(_))));
        assert!(!out.exists());
    }

    #[test]
    fn sink_errors_surface() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("disk full"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let qr = QrCode::new("sink", Level::Low).unwrap();
        let err = qr.write(32, Broken).unwrap_err();
        assert!(matches!(err, Error::Sink(_)));
    }
}
