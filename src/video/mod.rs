//! # Video Assembly
//!
//! Turns ordered still images into a video stream and builds videos from
//! directories of numbered JPEG stills.

pub mod types;
pub mod writer;

mod assembler;
mod directory;

pub use types::{AssembledVideo, Fourcc, Frame, FrameSize, StreamParams, VideoParams};
pub use writer::{FfmpegBackend, FfmpegWriter, FrameWriter, WriterBackend};
pub use assembler::{assemble_video, VideoAssembler};
pub use directory::{sort_key, sorted_stills, video_from_directory, DIRECTORY_FPS};
