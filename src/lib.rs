//! # Reel-Compositor
//!
//! Assemble still images into videos and tile mismatched images into a single frame.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use reel_compositor::video::{assemble_video, video_from_directory, VideoParams};
//!
//! # fn main() -> reel_compositor::Result<()> {
//! let stills = ["shots/1_intro.jpg", "shots/2_pan.jpg", "shots/3_end.jpg"];
//! let video = assemble_video("reel.avi", &stills, &VideoParams::default())?;
//! println!("{} frames at {:?}", video.frame_count, video.size);
//!
//! // Every *.jpg in the directory, ordered by its numeric prefix
//! let path = video_from_directory("shots/", "out/", "reel.avi", 30.0)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`video`] - Image-to-video assembly through a pluggable writer backend (ffmpeg by default)
//! - [`tile`] - Horizontal, vertical and grid joins of mismatched images
//! - [`config`] - Configuration management

pub mod config;
pub mod error;
pub mod tile;
pub mod video;

// Re-export commonly used types for convenience
pub use crate::{
    config::Config,
    error::{CompositorError, Result},
    tile::{Interpolation, Tiler},
    video::{Frame, FrameSize, VideoAssembler, VideoParams},
};
