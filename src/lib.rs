//! Branded QR codes.
//!
//! A [`QrCode`] renders a plain symbol and then runs up to three overlay
//! stages on it, always in this order:
//!
//! 1. **foreground**: dark modules are filled with the pixels of an image,
//!    light modules are left alone so the code stays scannable;
//! 2. **avatar**: an image is resized and blended over the center;
//! 3. **background**: the decorated symbol is resized and pasted onto a
//!    background image, which becomes the output canvas.
//!
//! Every stage can be replaced with a custom [`Transform`].
//!
//! ```no_run
//! use qr_overlay::{AvatarSpec, Level, QrCode, Render};
//!
//! let mut qr = QrCode::new("https://example.com", Level::High)?;
//! qr.set_avatar(Some(AvatarSpec::new("logo.png", 64, 64)));
//! qr.write_file(512, "qr.png")?;
//! # Ok::<(), qr_overlay::Error>(())
//! ```

pub mod avatar;
pub mod background;
pub mod config;
mod error;
pub mod foreground;
pub mod png;
mod qr;
pub mod resample;
mod source;
mod stage;
mod symbol;

pub use avatar::AvatarSpec;
pub use background::BackgroundSpec;
pub use config::RenderConfig;
pub use error::{Error, Result};
pub use foreground::ForegroundSpec;
pub use qr::{QrCode, Render};
pub use source::{ImageSource, Overlay};
pub use stage::Transform;
pub use symbol::{Level, Palette, QUIET_ZONE, Symbol};
