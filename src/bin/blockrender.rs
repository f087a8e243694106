use std::path::{Path, PathBuf};

use anyhow::{Context as _, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::filter::LevelFilter;

use blockrender::assets::source::{AssetSource, DirAssetSource, JarAssetSource};
use blockrender::foundation::color::parse_hex_rgba;
use blockrender::model::catalog::ItemCatalog;
use blockrender::model::document::ModelKind;
use blockrender::model::tint::TintPalette;
use blockrender::pipeline::{ExportThreading, RenderOptions, ThumbnailPipeline, export_all};
use blockrender::render::scene::CameraMode;

#[derive(Parser, Debug)]
#[command(name = "blockrender", version)]
struct Cli {
    /// Log at debug level.
    #[arg(long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one item id as a PNG.
    Render(RenderArgs),
    /// Render every listed item into a directory.
    Export(ExportArgs),
    /// List the item ids an asset bundle provides.
    List(ListArgs),
}

#[derive(Parser, Debug)]
struct SourceArgs {
    /// Asset bundle as an unpacked directory.
    #[arg(long, conflicts_with = "jar")]
    dir: Option<PathBuf>,

    /// Asset bundle as a jar or zip archive.
    #[arg(long)]
    jar: Option<PathBuf>,

    /// Game version the bundle targets; switches the item model layout.
    #[arg(long = "game-version")]
    version: String,
}

#[derive(Parser, Debug)]
struct ImageArgs {
    /// Output width in pixels.
    #[arg(long, default_value_t = 256)]
    width: u32,

    /// Output height in pixels.
    #[arg(long, default_value_t = 256)]
    height: u32,

    /// Camera projection.
    #[arg(long, value_enum, default_value_t = CameraArg::Perspective)]
    camera: CameraArg,

    /// Background color, RRGGBB or RRGGBBAA hex.
    #[arg(long, default_value = "00000000")]
    background: String,

    /// Tint palette JSON file.
    #[arg(long)]
    palette: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CameraArg {
    Perspective,
    Orthographic,
}

impl From<CameraArg> for CameraMode {
    fn from(arg: CameraArg) -> Self {
        match arg {
            CameraArg::Perspective => CameraMode::Perspective,
            CameraArg::Orthographic => CameraMode::Orthographic,
        }
    }
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    source: SourceArgs,

    #[command(flatten)]
    image: ImageArgs,

    /// Item to render: `minecraft:stone`, a bare local name, or an exact
    /// display name like `Stone`.
    #[arg(long)]
    id: String,

    /// Output PNG path; defaults to the deterministic name in the current
    /// directory.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    #[command(flatten)]
    source: SourceArgs,

    #[command(flatten)]
    image: ImageArgs,

    /// Output directory.
    #[arg(long)]
    out: PathBuf,

    /// Worker threads for parallel export (0 = rayon default).
    #[arg(long, default_value_t = 0)]
    jobs: usize,

    /// Render entries one at a time instead of in parallel.
    #[arg(long, default_value_t = false)]
    sequential: bool,
}

#[derive(Parser, Debug)]
struct ListArgs {
    #[command(flatten)]
    source: SourceArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Export(args) => cmd_export(args),
        Command::List(args) => cmd_list(args),
    }
}

fn init_tracing(verbose: bool) {
    // RUST_LOG carries a plain level name; -v forces debug.
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        std::env::var("RUST_LOG")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(LevelFilter::INFO)
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn open_source(args: &SourceArgs) -> anyhow::Result<Box<dyn AssetSource>> {
    match (&args.dir, &args.jar) {
        (Some(dir), None) => Ok(Box::new(DirAssetSource::open(dir)?)),
        (None, Some(jar)) => Ok(Box::new(JarAssetSource::open(jar)?)),
        _ => bail!("exactly one of --dir or --jar is required"),
    }
}

fn load_palette(path: Option<&Path>) -> anyhow::Result<TintPalette> {
    let Some(path) = path else {
        return Ok(TintPalette::empty());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read tint palette '{}'", path.display()))?;
    let value = serde_json::from_str(&text)
        .with_context(|| format!("parse tint palette '{}'", path.display()))?;
    Ok(TintPalette::from_value(value)?)
}

fn render_options(image: &ImageArgs) -> anyhow::Result<RenderOptions> {
    if image.width == 0 || image.height == 0 {
        bail!("--width and --height must be >= 1");
    }
    let background = parse_hex_rgba(&image.background)
        .with_context(|| format!("invalid --background '{}'", image.background))?;
    Ok(RenderOptions {
        width: image.width,
        height: image.height,
        camera: image.camera.into(),
        background,
    })
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let source = open_source(&args.source)?;
    let palette = load_palette(args.image.palette.as_deref())?;
    let options = render_options(&args.image)?;
    let pipeline = ThumbnailPipeline::new(source.as_ref(), &args.source.version, &palette, options);

    let catalog = ItemCatalog::scan(source.as_ref(), &args.source.version);
    let qualified = format!("{}:{}", source.namespace(), args.id);
    let entry = catalog
        .find(&args.id)
        .or_else(|| catalog.find(&qualified))
        .or_else(|| catalog.find_by_name(&args.id))
        .with_context(|| format!("item '{}' is not in the bundle's listing", args.id))?;

    let thumb = pipeline
        .render_entry(entry)
        .with_context(|| format!("item '{}' has no renderable output", args.id))?;
    let out = args
        .out
        .unwrap_or_else(|| PathBuf::from(&thumb.file_name));
    thumb.image.write_png(&out)?;

    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let source = open_source(&args.source)?;
    let palette = load_palette(args.image.palette.as_deref())?;
    let options = render_options(&args.image)?;
    let pipeline = ThumbnailPipeline::new(source.as_ref(), &args.source.version, &palette, options);

    let catalog = ItemCatalog::scan(source.as_ref(), &args.source.version);
    if catalog.is_empty() {
        bail!("the bundle lists no items; is this a resource bundle for the given version?");
    }

    let threading = ExportThreading {
        parallel: !args.sequential,
        threads: (args.jobs > 0).then_some(args.jobs),
    };
    let stats = export_all(&pipeline, &catalog, &args.out, &threading)?;

    eprintln!(
        "wrote {} of {} items to {} ({} skipped)",
        stats.written,
        stats.requested,
        args.out.display(),
        stats.skipped
    );
    Ok(())
}

fn cmd_list(args: ListArgs) -> anyhow::Result<()> {
    let source = open_source(&args.source)?;
    let catalog = ItemCatalog::scan(source.as_ref(), &args.source.version);

    for entry in catalog.entries() {
        let kind = match entry.kind {
            ModelKind::Block => "block",
            ModelKind::Item => "item",
        };
        println!("{}\t{}\t{}", entry.id, kind, entry.display_name);
    }
    eprintln!("{} items", catalog.len());
    Ok(())
}
