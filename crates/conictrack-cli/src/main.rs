//! conictrack CLI — track an elliptical contour through an image sequence.

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use conictrack::overlay::{draw_overlay, gray_to_rgb};
use conictrack::synth::{blur, render_ellipse};
use conictrack::{Ellipse, EllipseTracker, FrameResult, TrackerConfig};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "conictrack")]
#[command(about = "Track ellipses and circles through image sequences with moving edges")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Track a contour through a sequence of frames.
    Track(CliTrackArgs),

    /// Render a synthetic sequence of a drifting ellipse.
    Synth(CliSynthArgs),

    /// Print the default tracker configuration as JSON.
    DefaultConfig,
}

#[derive(Debug, Clone, Args)]
struct CliTrackArgs {
    /// Frames in tracking order; the first one is used for initialization.
    #[arg(long, num_args = 1.., required = true)]
    frames: Vec<PathBuf>,

    /// JSON array of initial boundary points `[[i, j], ...]` in the first frame.
    #[arg(long)]
    init: PathBuf,

    /// Tracker configuration (JSON). Missing fields take default values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Track a circle instead of a general ellipse.
    #[arg(long)]
    circle: bool,

    /// Path to write per-frame results (JSON). Printed to stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Directory for overlay PNGs of every tracked frame.
    #[arg(long)]
    overlay_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
struct CliSynthArgs {
    /// Output directory for frames and `init.json`.
    #[arg(long)]
    out_dir: PathBuf,

    /// Number of frames.
    #[arg(long, default_value = "20")]
    frames: usize,

    #[arg(long, default_value = "320")]
    width: u32,

    #[arg(long, default_value = "240")]
    height: u32,

    /// Initial center row.
    #[arg(long, default_value = "110.0")]
    center_i: f64,

    /// Initial center column.
    #[arg(long, default_value = "140.0")]
    center_j: f64,

    /// Semi-axis along the rotated column direction (pixels).
    #[arg(long, default_value = "40.0")]
    a: f64,

    /// Semi-axis along the rotated row direction (pixels).
    #[arg(long, default_value = "65.0")]
    b: f64,

    /// Initial rotation (degrees).
    #[arg(long, default_value = "20.0")]
    rotation_deg: f64,

    /// Center motion per frame, rows.
    #[arg(long, default_value = "1.0")]
    step_i: f64,

    /// Center motion per frame, columns.
    #[arg(long, default_value = "1.5")]
    step_j: f64,

    /// Rotation per frame (degrees).
    #[arg(long, default_value = "1.0")]
    step_rotation_deg: f64,

    /// Gaussian blur sigma (pixels); 0 disables blurring.
    #[arg(long, default_value = "1.0")]
    blur_sigma: f32,

    /// Ellipse gray level.
    #[arg(long, default_value = "40")]
    fg: u8,

    /// Background gray level.
    #[arg(long, default_value = "210")]
    bg: u8,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Track(args) => run_track(&args),
        Commands::Synth(args) => run_synth(&args),
        Commands::DefaultConfig => run_default_config(),
    }
}

fn run_default_config() -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(&TrackerConfig::default())?);
    Ok(())
}

fn load_config(path: Option<&Path>, circle: bool) -> CliResult<TrackerConfig> {
    let mut config = match path {
        Some(p) => {
            let text = std::fs::read_to_string(p).map_err(|e| -> CliError {
                format!("Failed to read config {}: {}", p.display(), e).into()
            })?;
            serde_json::from_str::<TrackerConfig>(&text)?
        }
        None => TrackerConfig::default(),
    };
    config.circle |= circle;
    Ok(config)
}

fn parse_points(text: &str) -> CliResult<Vec<[f64; 2]>> {
    let points: Vec<[f64; 2]> = serde_json::from_str(text)?;
    Ok(points)
}

fn load_gray(path: &Path) -> CliResult<image::GrayImage> {
    let img = image::open(path).map_err(|e| -> CliError {
        format!("Failed to open image {}: {}", path.display(), e).into()
    })?;
    Ok(img.to_luma8())
}

fn run_track(args: &CliTrackArgs) -> CliResult<()> {
    let config = load_config(args.config.as_deref(), args.circle)?;
    let init_text = std::fs::read_to_string(&args.init)?;
    let init = parse_points(&init_text)?;
    tracing::info!(
        "Tracking {} frames from {} initial points (circle: {})",
        args.frames.len(),
        init.len(),
        config.circle
    );

    if let Some(dir) = &args.overlay_dir {
        std::fs::create_dir_all(dir)?;
    }

    let mut tracker = EllipseTracker::new(config)?;
    let mut results: Vec<FrameResult> = Vec::with_capacity(args.frames.len());
    let mut failure: Option<CliError> = None;

    for (idx, path) in args.frames.iter().enumerate() {
        let gray = load_gray(path)?;
        let outcome = if idx == 0 {
            tracker.init_tracking(&gray, &init)
        } else {
            tracker.track(&gray)
        };
        if let Err(e) = outcome {
            tracing::error!("Frame {} ({}): {}", idx, path.display(), e);
            failure = Some(format!("tracking stopped at frame {}: {}", idx, e).into());
            break;
        }

        if let Some(r) = tracker.frame_result() {
            tracing::info!(
                "Frame {}: center ({:.2}, {:.2}), axes ({:.2}, {:.2}), {} sites",
                idx,
                r.geometry.center[0],
                r.geometry.center[1],
                r.geometry.semi_axes[0],
                r.geometry.semi_axes[1],
                r.sites
            );
            results.push(r);
        }

        if let Some(dir) = &args.overlay_dir {
            let mut canvas = gray_to_rgb(&gray);
            draw_overlay(&mut canvas, &tracker, image::Rgb([255, 40, 40]));
            let out = dir.join(format!("overlay_{:04}.png", idx));
            canvas.save(&out)?;
        }
    }

    let json = serde_json::to_string_pretty(&results)?;
    match &args.out {
        Some(path) => {
            std::fs::write(path, &json)?;
            tracing::info!("Results for {} frames written to {}", results.len(), path.display());
        }
        None => println!("{}", json),
    }

    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn synth_ellipse(args: &CliSynthArgs, frame: usize) -> Ellipse {
    let t = frame as f64;
    Ellipse::new(
        [args.center_i + t * args.step_i, args.center_j + t * args.step_j],
        args.a,
        args.b,
        (args.rotation_deg + t * args.step_rotation_deg).to_radians(),
    )
}

fn run_synth(args: &CliSynthArgs) -> CliResult<()> {
    if args.a <= 0.0 || args.b <= 0.0 {
        return Err("semi-axes must be positive".into());
    }
    std::fs::create_dir_all(&args.out_dir)?;

    for frame in 0..args.frames {
        let ellipse = synth_ellipse(args, frame);
        let mut img = render_ellipse(args.width, args.height, &ellipse, args.fg, args.bg);
        if args.blur_sigma > 0.0 {
            img = blur(&img, args.blur_sigma);
        }
        img.save(args.out_dir.join(format!("frame_{:04}.png", frame)))?;
    }

    // Five points spread over the first frame's contour, in increasing angle.
    let first = synth_ellipse(args, 0);
    let init: Vec<[f64; 2]> = [-170.0f64, -90.0, 0.0, 90.0, 170.0]
        .iter()
        .map(|d| first.point_at(d.to_radians()))
        .collect();
    let init_path = args.out_dir.join("init.json");
    std::fs::write(&init_path, serde_json::to_string_pretty(&init)?)?;

    tracing::info!(
        "Wrote {} frames and {} to {}",
        args.frames,
        init_path.display(),
        args.out_dir.display()
    );
    Ok(())
}
