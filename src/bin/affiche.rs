use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "affiche", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a poster spec to a PNG file.
    Render(RenderArgs),
    /// Serve the companion proxy/render API.
    Serve(ServeArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input poster JSON (inputs plus optional image source).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Output resolution tier.
    #[arg(long, value_enum, default_value = "high")]
    quality: Quality,

    /// Font directory (defaults to `fonts` next to the spec).
    #[arg(long)]
    fonts_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ServeArgs {
    /// Listen address.
    #[arg(long, default_value = "127.0.0.1:8080")]
    listen: SocketAddr,

    /// Root directory for relative image/logo sources.
    #[arg(long, default_value = ".")]
    assets_root: PathBuf,

    /// Font directory.
    #[arg(long, default_value = "fonts")]
    fonts_dir: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Quality {
    Preview,
    Low,
    High,
}

impl From<Quality> for affiche::QualityTier {
    fn from(q: Quality) -> Self {
        match q {
            Quality::Preview => affiche::QualityTier::Preview,
            Quality::Low => affiche::QualityTier::Low,
            Quality::High => affiche::QualityTier::High,
        }
    }
}

/// On-disk render request: the poster fields plus an optional image source
/// resolved relative to the spec file.
#[derive(Debug, serde::Deserialize)]
struct PosterSpec {
    inputs: affiche::PosterInputs,
    #[serde(default)]
    image: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args).await,
        Command::Serve(args) => cmd_serve(args).await,
    }
}

async fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let spec_bytes = std::fs::read(&args.in_path)
        .with_context(|| format!("read spec '{}'", args.in_path.display()))?;
    let spec: PosterSpec = serde_json::from_slice(&spec_bytes)
        .with_context(|| format!("parse spec '{}'", args.in_path.display()))?;

    let assets_root = args
        .in_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    let fonts_dir = args
        .fonts_dir
        .clone()
        .unwrap_or_else(|| assets_root.join("fonts"));
    let fonts = affiche::FontLibrary::load_dir(&fonts_dir);

    let fetcher = affiche::AssetFetcher::new(&assets_root);
    let image = match &spec.image {
        Some(source) => {
            let bytes = fetcher.fetch(source).await?;
            Some(affiche::decode_image(&bytes)?)
        }
        None => None,
    };

    let palette = match &image {
        Some(img) => affiche::extract_palette(img, affiche::DEFAULT_PALETTE_SIZE)?,
        None => affiche::Palette::default(),
    };

    let logos = affiche::LogoSet::prepare(&spec.inputs.logos, &fetcher).await;

    let rendered = affiche::render(
        &spec.inputs,
        &palette,
        affiche::RenderOptions {
            quality: args.quality.into(),
        },
        image.as_ref(),
        &logos,
        &fonts,
    )?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, rendered.to_png()?)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

async fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = affiche::ServiceConfig::from_env()
        .with_assets_root(args.assets_root)
        .with_fonts_dir(args.fonts_dir);
    affiche::service::routes::serve(args.listen, config).await?;
    Ok(())
}
