use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "chaosgame", version)]
struct Cli {
    /// Log filter used when `RUST_LOG` is unset (e.g. `info`, `chaosgame=debug`).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render only the still image `{vertices}_{iterations}.png`.
    Still(CommonArgs),
    /// Capture only the numbered frame sequence, optionally encoding it with `ffmpeg`.
    Frames(FramesArgs),
    /// Render the still image and the frame sequence.
    Render(RenderArgs),
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// JSON render config; flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Chaos-game iterations.
    #[arg(long)]
    iterations: Option<u64>,

    /// Canvas width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height in pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Number of polygon vertices.
    #[arg(long)]
    vertices: Option<usize>,

    /// Vertex colors as hex `RRGGBB`, comma separated.
    #[arg(long, value_delimiter = ',', value_parser = parse_hex_color)]
    palette: Option<Vec<chaosgame::Rgb8>>,

    /// Gap between the polygon and the top/bottom edges.
    #[arg(long)]
    margin: Option<u32>,

    /// Seed for a reproducible render.
    #[arg(long)]
    seed: Option<u64>,

    /// Output directory for the still image.
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Midpoint rounding.
    #[arg(long, value_enum)]
    rounding: Option<RoundingChoice>,
}

#[derive(Args, Debug)]
struct FrameArgs {
    /// Frame directory (defaults to `{out_dir}/frames`).
    #[arg(long)]
    frames_dir: Option<PathBuf>,

    /// Video frame rate.
    #[arg(long)]
    fps: Option<u32>,

    /// Video length in seconds.
    #[arg(long)]
    duration: Option<u32>,

    /// Encode the frames into this video file (requires `ffmpeg` on PATH).
    #[arg(long)]
    video: Option<PathBuf>,

    /// x264 constant rate factor for `--video` (0 is lossless).
    #[arg(long, default_value_t = 0)]
    crf: u8,

    /// Stop at exactly `duration * fps` frames instead of sampling every cadence hit.
    #[arg(long, default_value_t = false)]
    cap_frames: bool,
}

#[derive(Args, Debug)]
struct FramesArgs {
    #[command(flatten)]
    common: CommonArgs,

    #[command(flatten)]
    frames: FrameArgs,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    common: CommonArgs,

    #[command(flatten)]
    frames: FrameArgs,

    /// Derive the still image and the frames from one walk instead of two.
    #[arg(long, default_value_t = false)]
    shared: bool,

    /// Run the independent still and frame walks on separate threads.
    #[arg(long, default_value_t = false)]
    parallel: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RoundingChoice {
    Floor,
    Nearest,
}

impl From<RoundingChoice> for chaosgame::Rounding {
    fn from(r: RoundingChoice) -> Self {
        match r {
            RoundingChoice::Floor => Self::Floor,
            RoundingChoice::Nearest => Self::Nearest,
        }
    }
}

fn parse_hex_color(s: &str) -> Result<chaosgame::Rgb8, String> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return Err(format!("expected RRGGBB, got '{s}'"));
    }
    u32::from_str_radix(hex, 16)
        .map(chaosgame::Rgb8::from_packed)
        .map_err(|e| format!("invalid color '{s}': {e}"))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;
    match cli.cmd {
        Command::Still(args) => cmd_still(args),
        Command::Frames(args) => cmd_frames(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn init_tracing(default_level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .with_context(|| format!("parse log filter '{default_level}'"))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn load_config(args: &CommonArgs) -> anyhow::Result<chaosgame::RenderConfig> {
    let mut cfg = match &args.config {
        Some(path) => chaosgame::RenderConfig::from_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => chaosgame::RenderConfig::default(),
    };

    if let Some(v) = args.iterations {
        cfg.iterations = v;
    }
    if let Some(v) = args.width {
        cfg.width = v;
    }
    if let Some(v) = args.height {
        cfg.height = v;
    }
    if let Some(v) = args.vertices {
        cfg.vertex_count = v;
    }
    if let Some(v) = &args.palette {
        cfg.palette = v.clone();
    }
    if let Some(v) = args.margin {
        cfg.margin = v;
    }
    if let Some(v) = args.seed {
        cfg.seed = Some(v);
    }
    if let Some(v) = &args.out_dir {
        cfg.output_dir = v.clone();
    }
    if let Some(v) = args.rounding {
        cfg.rounding = v.into();
    }
    Ok(cfg)
}

fn apply_frame_args(cfg: &mut chaosgame::RenderConfig, args: &FrameArgs) {
    cfg.frames = true;
    if let Some(v) = &args.frames_dir {
        cfg.frames_dir = Some(v.clone());
    }
    if let Some(v) = args.fps {
        cfg.fps = v;
    }
    if let Some(v) = args.duration {
        cfg.duration_secs = v;
    }
    if args.cap_frames {
        cfg.cap_frames = true;
    }
    if let Some(v) = &args.video {
        cfg.video = Some(chaosgame::VideoConfig {
            out_path: v.clone(),
            crf: args.crf,
        });
    }
}

fn cmd_still(args: CommonArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(&args)?;
    cfg.frames = false;
    cfg.video = None;
    cfg.validate()?;

    let mut rng = chaosgame::seeded_rng(cfg.seed);
    let path = chaosgame::render_still(&cfg, &mut rng)?;

    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(&args.common)?;
    apply_frame_args(&mut cfg, &args.frames);
    cfg.validate()?;

    let report = chaosgame::render_sequence(&cfg)?;
    print_report(&report);
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(&args.common)?;
    apply_frame_args(&mut cfg, &args.frames);
    if args.shared {
        cfg.run_mode = chaosgame::RunMode::Shared;
    }
    cfg.parallel = args.parallel;
    cfg.validate()?;

    let report = chaosgame::render(&cfg)?;
    print_report(&report);
    Ok(())
}

fn print_report(report: &chaosgame::RenderReport) {
    if let Some(still) = &report.still {
        eprintln!("wrote {}", still.display());
    }
    if let Some((dir, n)) = &report.frames {
        eprintln!("wrote {n} frames to {}", dir.display());
    }
    if let Some(video) = &report.video {
        eprintln!("wrote {}", video.display());
    }
}
