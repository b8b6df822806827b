use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

use tracing::{debug, info, warn};

use crate::error::{Result, VideoError};
use crate::video::types::{Frame, FrameSize, StreamParams};

/// An open video stream accepting frames in order
pub trait FrameWriter {
    /// Append one frame to the stream
    fn write_frame(&mut self, frame: &Frame) -> Result<()>;

    /// Number of frames accepted so far
    fn frames_written(&self) -> usize;

    /// Flush and close the stream. Calling it twice is a no-op.
    fn release(&mut self) -> Result<()>;
}

/// Opens [`FrameWriter`]s for an output path
pub trait WriterBackend {
    type Writer: FrameWriter;

    fn open(&self, path: &Path, params: &StreamParams) -> Result<Self::Writer>;
}

/// Encodes through an external `ffmpeg` process fed raw frames on stdin
#[derive(Debug, Clone, Copy, Default)]
pub struct FfmpegBackend;

impl FfmpegBackend {
    pub fn is_available() -> bool {
        Command::new("ffmpeg")
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    fn build_command(path: &Path, params: &StreamParams, encoder: &str) -> Command {
        let pixel_format = if params.is_color { "rgb24" } else { "gray" };

        let mut cmd = Command::new("ffmpeg");
        cmd.args(["-y", "-loglevel", "error"]);
        cmd.args([
            "-f", "rawvideo",
            "-pixel_format", pixel_format,
            "-video_size", &params.size.to_string(),
            "-framerate", &params.fps.to_string(),
            "-i", "-",
        ]);
        cmd.args(["-c:v", encoder]);

        // mp4/mov muxers reject most foreign tags
        let tagged_container = matches!(
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.to_ascii_lowercase())
                .as_deref(),
            Some("avi") | Some("mkv")
        );
        if tagged_container {
            cmd.args(["-vtag", params.codec.as_str()]);
        }

        cmd.arg(path);
        cmd
    }
}

impl WriterBackend for FfmpegBackend {
    type Writer = FfmpegWriter;

    fn open(&self, path: &Path, params: &StreamParams) -> Result<FfmpegWriter> {
        let encoder = params.codec.encoder().ok_or_else(|| VideoError::UnsupportedCodec {
            fourcc: params.codec.to_string(),
        })?;

        if !Self::is_available() {
            return Err(VideoError::EncodingFailed {
                reason: "FFmpeg not found. Please install FFmpeg.".to_string(),
            }
            .into());
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut child = Self::build_command(path, params, encoder)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| VideoError::EncodingFailed {
                reason: format!("Failed to start FFmpeg: {}", e),
            })?;

        let stdin = child.stdin.take().ok_or_else(|| VideoError::EncodingFailed {
            reason: "Failed to open FFmpeg stdin".to_string(),
        })?;

        info!(
            "Opened {} stream {} @ {} fps ({}) -> {}",
            params.codec,
            params.size,
            params.fps,
            encoder,
            path.display()
        );

        Ok(FfmpegWriter {
            path: path.to_path_buf(),
            size: params.size,
            is_color: params.is_color,
            child: Some(child),
            stdin: Some(stdin),
            frames_written: 0,
        })
    }
}

/// A running ffmpeg encode; the process is reaped on `release` or drop
pub struct FfmpegWriter {
    path: PathBuf,
    size: FrameSize,
    is_color: bool,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    frames_written: usize,
}

impl FfmpegWriter {
    /// Wait for the process and turn its stderr into an error
    fn reap(&mut self) -> Result<()> {
        // Closing stdin signals end of input
        drop(self.stdin.take());

        let Some(child) = self.child.take() else {
            return Ok(());
        };

        let output = child.wait_with_output().map_err(|e| VideoError::EncodingFailed {
            reason: format!("FFmpeg process error: {}", e),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VideoError::EncodingFailed {
                reason: format!("FFmpeg failed with status {}: {}", output.status, stderr.trim()),
            }
            .into());
        }

        Ok(())
    }
}

impl FrameWriter for FfmpegWriter {
    fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        // The raw pipe has a fixed geometry; a frame of any other size cannot be carried
        if frame.size() != self.size {
            warn!(
                "Skipping {} frame, stream {} is {}",
                frame.size(),
                self.path.display(),
                self.size
            );
            return Ok(());
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(VideoError::EncodingFailed {
                reason: "stream already released".to_string(),
            }
            .into());
        };

        let written = if self.is_color {
            stdin.write_all(frame.as_rgb_bytes())
        } else {
            stdin.write_all(&frame.to_gray_bytes())
        };

        if let Err(e) = written {
            // Prefer ffmpeg's own diagnosis over a bare broken pipe
            let reason = match self.reap() {
                Err(crate::error::CompositorError::Video(VideoError::EncodingFailed { reason })) => reason,
                _ => e.to_string(),
            };
            return Err(VideoError::EncodingFailed {
                reason: format!("failed to write frame {}: {}", self.frames_written, reason),
            }
            .into());
        }

        self.frames_written += 1;
        Ok(())
    }

    fn frames_written(&self) -> usize {
        self.frames_written
    }

    fn release(&mut self) -> Result<()> {
        if self.child.is_none() {
            return Ok(());
        }
        debug!("Releasing stream {} after {} frames", self.path.display(), self.frames_written);
        self.reap()
    }
}

impl Drop for FfmpegWriter {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            warn!("Failed to release video writer: {}", e);
        }
    }
}

/// In-memory backend recording every frame it is handed
#[cfg(test)]
pub(crate) mod recording {
    use std::cell::RefCell;
    use std::path::{Path, PathBuf};
    use std::rc::Rc;

    use super::{FrameWriter, WriterBackend};
    use crate::error::Result;
    use crate::video::types::{Frame, StreamParams};

    #[derive(Debug, Default)]
    pub struct Recording {
        pub opened: Vec<(PathBuf, StreamParams)>,
        pub frames: Vec<Frame>,
        pub released: usize,
    }

    #[derive(Clone, Default)]
    pub struct RecordingBackend {
        pub log: Rc<RefCell<Recording>>,
    }

    pub struct RecordingWriter {
        log: Rc<RefCell<Recording>>,
        count: usize,
        released: bool,
    }

    impl WriterBackend for RecordingBackend {
        type Writer = RecordingWriter;

        fn open(&self, path: &Path, params: &StreamParams) -> Result<RecordingWriter> {
            self.log.borrow_mut().opened.push((path.to_path_buf(), params.clone()));
            Ok(RecordingWriter { log: Rc::clone(&self.log), count: 0, released: false })
        }
    }

    impl FrameWriter for RecordingWriter {
        fn write_frame(&mut self, frame: &Frame) -> Result<()> {
            self.log.borrow_mut().frames.push(frame.clone());
            self.count += 1;
            Ok(())
        }

        fn frames_written(&self) -> usize {
            self.count
        }

        fn release(&mut self) -> Result<()> {
            if !self.released {
                self.released = true;
                self.log.borrow_mut().released += 1;
            }
            Ok(())
        }
    }

    impl Drop for RecordingWriter {
        fn drop(&mut self) {
            let _ = self.release();
        }
    }
}
