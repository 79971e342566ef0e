use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "prings", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crop a photo to the square selected by a pan/zoom region.
    Crop(CropArgs),
    /// Write the ring overlay as a standalone SVG.
    Ring(RingArgs),
    /// Sample the color under a display-space point.
    Sample(SampleArgs),
    /// Compose photo + ring overlay into the exported PNG.
    Compose(ComposeArgs),
}

#[derive(Parser, Debug)]
struct CropArgs {
    /// Input photo.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Zoom factor (1.0 selects the full short side).
    #[arg(long, default_value_t = 1.0)]
    zoom: f64,

    /// Horizontal pan, as a fraction of the source width.
    #[arg(long, default_value_t = 0.0)]
    offset_x: f64,

    /// Vertical pan, as a fraction of the source height.
    #[arg(long, default_value_t = 0.0)]
    offset_y: f64,
}

#[derive(Parser, Debug)]
struct RingArgs {
    /// Ring parameters JSON (defaults apply when omitted).
    #[arg(long)]
    params: Option<PathBuf>,

    /// Output SVG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    overrides: RingOverrides,
}

#[derive(Parser, Debug)]
struct SampleArgs {
    /// Input photo.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Display box size the photo is shown at, in display pixels.
    #[arg(long, default_value_t = 320)]
    display: u32,

    /// Pointer x in display coordinates.
    #[arg(long)]
    x: f64,

    /// Pointer y in display coordinates.
    #[arg(long)]
    y: f64,
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Input photo.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output path; the artifact itself is always named prings.png.
    #[arg(long, default_value = "prings.png")]
    out: PathBuf,

    /// Ring parameters JSON (defaults apply when omitted).
    #[arg(long)]
    params: Option<PathBuf>,

    /// Apply the centered square crop before composing.
    #[arg(long)]
    crop: bool,

    /// Crop zoom factor, used with --crop.
    #[arg(long, default_value_t = 1.0)]
    zoom: f64,

    /// Device pixel ratio of the target display.
    #[arg(long, default_value_t = 1.0)]
    dpr: f64,

    #[command(flatten)]
    overrides: RingOverrides,
}

/// Per-field overrides applied on top of the params file (or defaults).
#[derive(Parser, Debug)]
struct RingOverrides {
    /// Ring text.
    #[arg(long)]
    text: Option<String>,

    /// Text color, #RRGGBB.
    #[arg(long)]
    text_color: Option<String>,

    /// Ring color, #RRGGBB.
    #[arg(long)]
    ring_color: Option<String>,

    /// Fade color, #RRGGBB.
    #[arg(long)]
    fade_color: Option<String>,

    /// Font family for the ring text.
    #[arg(long)]
    font_family: Option<String>,

    /// Font size in rem (1.0..=3.0).
    #[arg(long)]
    font_size: Option<f64>,

    /// Text start offset along the ring, percent (0..=100).
    #[arg(long)]
    text_offset: Option<f64>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Crop(args) => cmd_crop(args),
        Command::Ring(args) => cmd_ring(args),
        Command::Sample(args) => cmd_sample(args),
        Command::Compose(args) => cmd_compose(args),
    }
}

fn read_photo(path: &Path) -> anyhow::Result<image::RgbaImage> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read photo '{}'", path.display()))?;
    Ok(prings::decode_photo(&bytes)?)
}

fn read_params(path: Option<&Path>, overrides: &RingOverrides) -> anyhow::Result<prings::RingParams> {
    let mut params = match path {
        Some(path) => {
            let f = File::open(path)
                .with_context(|| format!("open ring params '{}'", path.display()))?;
            let r = BufReader::new(f);
            serde_json::from_reader(r).with_context(|| "parse ring params JSON")?
        }
        None => prings::RingParams::default(),
    };

    use prings::{RingAction, update_ring};
    if let Some(text) = &overrides.text {
        params = update_ring(params, RingAction::SetText(text.clone()));
    }
    if let Some(hex) = &overrides.text_color {
        params = update_ring(params, RingAction::SetTextColor(prings::Rgb::from_hex(hex)?));
    }
    if let Some(hex) = &overrides.ring_color {
        params = update_ring(params, RingAction::SetRingColor(prings::Rgb::from_hex(hex)?));
    }
    if let Some(hex) = &overrides.fade_color {
        params = update_ring(params, RingAction::SetFadeColor(prings::Rgb::from_hex(hex)?));
    }
    if let Some(family) = &overrides.font_family {
        params = update_ring(params, RingAction::SetFontFamily(family.clone()));
    }
    if let Some(size) = overrides.font_size {
        params = update_ring(params, RingAction::SetTextFontSize(size));
    }
    if let Some(offset) = overrides.text_offset {
        params = update_ring(params, RingAction::SetTextStartOffset(offset));
    }

    params.validate()?;
    Ok(params)
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn cmd_crop(args: CropArgs) -> anyhow::Result<()> {
    let photo = read_photo(&args.in_path)?;
    let region = prings::CropRegion {
        offset_x: args.offset_x,
        offset_y: args.offset_y,
        zoom: args.zoom,
    };
    let rect = prings::crop_window(photo.width(), photo.height(), &region)?;
    let square = prings::crop_to_rect(&photo, rect, prings::Squareness::Required)?;

    ensure_parent_dir(&args.out)?;
    square
        .save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_ring(args: RingArgs) -> anyhow::Result<()> {
    let params = read_params(args.params.as_deref(), &args.overrides)?;
    let svg = prings::overlay_svg(&params, prings::RING_DIAMETER)?;

    ensure_parent_dir(&args.out)?;
    std::fs::write(&args.out, svg)
        .with_context(|| format!("write svg '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_sample(args: SampleArgs) -> anyhow::Result<()> {
    let photo = read_photo(&args.in_path)?;
    let surface = prings::SamplerSurface::new(&photo, args.display, args.display)?;

    match surface.sample(kurbo::Point::new(args.x, args.y)) {
        Some(color) => println!("{color}"),
        None => println!("no sample"),
    }
    Ok(())
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let mut photo = read_photo(&args.in_path)?;
    if args.crop {
        let region = prings::CropRegion {
            zoom: args.zoom,
            ..Default::default()
        };
        let rect = prings::crop_window(photo.width(), photo.height(), &region)?;
        photo = prings::crop_to_rect(&photo, rect, prings::Squareness::Required)?;
    }

    let params = read_params(args.params.as_deref(), &args.overrides)?;

    let mut exporter = prings::Exporter::new();
    let artifact = exporter.export(&photo, &params, args.dpr)?;

    ensure_parent_dir(&args.out)?;
    std::fs::write(&args.out, &artifact.png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({}x{}, artifact '{}')",
        args.out.display(),
        artifact.width,
        artifact.height,
        artifact.filename
    );
    Ok(())
}
