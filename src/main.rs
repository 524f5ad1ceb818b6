use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, bail};
use clap::Parser;
use qr_overlay::config::{AvatarConfig, BackgroundConfig, RenderConfig};
use qr_overlay::{Level, Render};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "qr-overlay")]
#[command(
    about = "Generate a QR code with an avatar, a background or image-filled modules",
    long_about = None
)]
struct Cli {
    /// Text or URL to encode
    content: Option<String>,

    /// Where to write the PNG
    #[arg(short, long)]
    output: PathBuf,

    /// JSON render configuration; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Side of the symbol in pixels
    #[arg(short, long)]
    size: Option<u32>,

    /// Error-correction level: low, medium, high or highest
    #[arg(short, long)]
    level: Option<Level>,

    /// CSS color of the dark modules
    #[arg(long)]
    fg_color: Option<String>,

    /// CSS color of the light modules
    #[arg(long)]
    bg_color: Option<String>,

    /// Drop the quiet zone around the symbol
    #[arg(long)]
    no_border: bool,

    /// Image centered over the symbol
    #[arg(long, requires = "avatar_size")]
    avatar: Option<PathBuf>,

    /// Avatar size as WIDTHxHEIGHT
    #[arg(long)]
    avatar_size: Option<Dimensions>,

    /// Image the symbol is pasted onto
    #[arg(long, requires = "background_size")]
    background: Option<PathBuf>,

    /// Size of the symbol on the background as WIDTHxHEIGHT
    #[arg(long)]
    background_size: Option<Dimensions>,

    /// Position of the symbol on the background as X,Y
    #[arg(long, allow_hyphen_values = true)]
    background_offset: Option<Offset>,

    /// Image whose pixels fill the dark modules
    #[arg(long)]
    foreground: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy)]
struct Dimensions(u32, u32);

impl FromStr for Dimensions {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
        let parse = |v: &str| v.trim().parse::<u32>().map_err(|e| format!("{v:?}: {e}"));
        Ok(Self(parse(w)?, parse(h)?))
    }
}

#[derive(Debug, Clone, Copy)]
struct Offset(i64, i64);

impl FromStr for Offset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| format!("expected X,Y, got {s:?}"))?;
        let parse = |v: &str| v.trim().parse::<i64>().map_err(|e| format!("{v:?}: {e}"));
        Ok(Self(parse(x)?, parse(y)?))
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("qr_overlay=info".parse()?))
        .init();

    let cli = Cli::parse();
    let output = cli.output.clone();
    let config = merge(cli)?;

    let qr = config.build().context("failed to set up the QR code")?;
    qr.write_file(config.size, &output)
        .with_context(|| format!("failed to render {}", output.display()))?;

    println!("QR code generated successfully: {}", output.display());
    Ok(())
}

fn merge(cli: Cli) -> anyhow::Result<RenderConfig> {
    let mut config = match &cli.config {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::default(),
    };

    if let Some(content) = cli.content {
        config.content = content;
    }
    if config.content.is_empty() {
        bail!("nothing to encode: pass CONTENT or set \"content\" in the config file");
    }
    if let Some(size) = cli.size {
        config.size = size;
    }
    if let Some(level) = cli.level {
        config.level = level;
    }
    if cli.fg_color.is_some() {
        config.foreground_color = cli.fg_color;
    }
    if cli.bg_color.is_some() {
        config.background_color = cli.bg_color;
    }
    config.disable_border |= cli.no_border;

    if let (Some(path), Some(Dimensions(width, height))) = (cli.avatar, cli.avatar_size) {
        config.avatar = Some(AvatarConfig {
            path,
            width,
            height,
        });
    }
    if let (Some(path), Some(Dimensions(width, height))) = (cli.background, cli.background_size) {
        let Offset(x, y) = cli.background_offset.unwrap_or(Offset(0, 0));
        config.background = Some(BackgroundConfig {
            path,
            width,
            height,
            x,
            y,
        });
    }
    if cli.foreground.is_some() {
        config.foreground = cli.foreground;
    }

    Ok(config)
}
