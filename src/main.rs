use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, Level};

use reel_compositor::{
    config::Config,
    tile::{Interpolation, Tiler},
    video::{video_from_directory, Frame, FrameSize, VideoAssembler},
};

#[derive(Parser)]
#[command(
    name = "reel-compositor",
    version,
    about = "Turn still images into videos and tile mismatched images",
    long_about = "Reel-Compositor assembles ordered still images into a video through ffmpeg, and joins images of different sizes into a single composite frame."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Configuration file (optional)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Write the given images, in order, to a video file
    Video {
        /// Output video file path
        #[arg(short, long)]
        output: PathBuf,

        /// Frame rate
        #[arg(long)]
        fps: Option<f64>,

        /// Frame size as WIDTHxHEIGHT (default: size of the first image)
        #[arg(long)]
        size: Option<FrameSize>,

        /// Write grayscale frames
        #[arg(long)]
        gray: bool,

        /// Four-character codec identifier (FMP4, MJPG, H264, ...)
        #[arg(long)]
        codec: Option<String>,

        /// Image files, in frame order
        #[arg(required = true)]
        images: Vec<PathBuf>,
    },

    /// Build a video from the numbered *.jpg stills in a directory
    Dir {
        /// Directory containing stills named like 12_frame.jpg
        #[arg(short, long)]
        images: PathBuf,

        /// Directory the video is written to
        #[arg(long)]
        output_dir: PathBuf,

        /// Video file name
        #[arg(short, long)]
        name: String,

        /// Frame rate (directory videos are always written at 30 fps)
        #[arg(long, default_value_t = 30.0)]
        fps: f64,
    },

    /// Tile images into one composite, one --row per row
    Tile {
        /// Output image path (PNG or JPEG)
        #[arg(short, long)]
        output: PathBuf,

        /// Comma-separated images forming one row
        #[arg(long = "row", required = true)]
        rows: Vec<String>,

        /// Resampling kernel (nearest, linear, cubic, gaussian, lanczos)
        #[arg(long)]
        interpolation: Option<Interpolation>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .init();

    info!("Starting Reel-Compositor v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = match &cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(config_path)?
        }
        None => Config::default(),
    };

    match cli.command {
        Command::Video { output, fps, size, gray, codec, images } => {
            let mut video = config.video;
            if let Some(fps) = fps {
                video.fps = fps;
            }
            if size.is_some() {
                video.size = size;
            }
            if gray {
                video.is_color = false;
            }
            if let Some(codec) = codec {
                video.codec = codec;
            }

            let assembler = VideoAssembler::new(video.params()?);
            let result = assembler
                .assemble(&output, &images)
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;

            info!("Video complete: {} frames written to {:?}", result.frame_count, result.path);
        }
        Command::Dir { images, output_dir, name, fps } => {
            let path = video_from_directory(&images, &output_dir, &name, fps)
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            info!("Video complete: {:?}", path);
        }
        Command::Tile { output, rows, interpolation } => {
            let interpolation = interpolation.unwrap_or(config.tile.interpolation);
            let grid = load_grid(&rows)?;

            let composite = Tiler::new(interpolation).join_grid(&grid)?;
            composite
                .save(&output)
                .with_context(|| format!("Failed to save composite to {:?}", output))?;

            info!(
                "Tiled {} rows into {} using {} interpolation: {:?}",
                grid.len(),
                composite.size(),
                interpolation,
                output
            );
        }
    }

    Ok(())
}

/// Load each `--row` value as one row of the grid
fn load_grid(rows: &[String]) -> Result<Vec<Vec<Frame>>> {
    rows.iter()
        .map(|row| {
            row.split(',')
                .filter(|p| !p.trim().is_empty())
                .map(|p| {
                    Frame::open(p.trim()).with_context(|| format!("Failed to load image {:?}", p))
                })
                .collect()
        })
        .collect()
}
