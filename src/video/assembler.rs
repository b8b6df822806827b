use std::path::Path;

use image::imageops::FilterType;
use tracing::{debug, info};

use crate::error::{Result, VideoError};
use crate::video::types::{AssembledVideo, Frame, FrameSize, StreamParams, VideoParams};
use crate::video::writer::{FfmpegBackend, FrameWriter, WriterBackend};

/// Kernel used when a still has to be fitted to the stream size
const FRAME_FILTER: FilterType = FilterType::Triangle;

/// Turns an ordered list of image files into a video, one frame per image
pub struct VideoAssembler<B = FfmpegBackend> {
    backend: B,
    params: VideoParams,
}

impl VideoAssembler<FfmpegBackend> {
    pub fn new(params: VideoParams) -> Self {
        Self::with_backend(FfmpegBackend, params)
    }
}

impl<B: WriterBackend> VideoAssembler<B> {
    pub fn with_backend(backend: B, params: VideoParams) -> Self {
        Self { backend, params }
    }

    pub fn params(&self) -> &VideoParams {
        &self.params
    }

    /// Write every image in `images` to `output`, in order
    ///
    /// Paths are checked one at a time as they are reached. The stream is
    /// opened on the first image read; without an explicit size it takes that
    /// image's dimensions. A later image is resized only when both its width
    /// and its height differ from the stream size. The writer is released on
    /// every exit path.
    pub fn assemble<O, P>(&self, output: O, images: &[P]) -> Result<AssembledVideo>
    where
        O: AsRef<Path>,
        P: AsRef<Path>,
    {
        let output = output.as_ref();

        if images.is_empty() {
            return Err(VideoError::NoFrames.into());
        }

        if !(self.params.fps.is_finite() && self.params.fps > 0.0) {
            return Err(VideoError::InvalidParameters {
                details: format!("frame rate must be positive, got {}", self.params.fps),
            }
            .into());
        }

        info!("Assembling {} images into {:?}", images.len(), output);

        let mut size = self.params.size;
        let mut writer: Option<B::Writer> = None;

        for path in images {
            let path = path.as_ref();
            if !path.exists() {
                return Err(VideoError::MissingFile { path: path.to_path_buf() }.into());
            }

            let mut frame = Frame::open(path).map_err(|source| VideoError::Decode {
                path: path.to_path_buf(),
                source,
            })?;

            let stream_size = *size.get_or_insert_with(|| frame.size());

            if needs_resize(frame.size(), stream_size) {
                debug!("Resizing {:?} from {} to {}", path, frame.size(), stream_size);
                frame = frame.resized(stream_size, FRAME_FILTER);
            }

            match writer.as_mut() {
                Some(stream) => stream.write_frame(&frame)?,
                None => {
                    let mut stream = self.backend.open(output, &self.stream_params(stream_size))?;
                    stream.write_frame(&frame)?;
                    writer = Some(stream);
                }
            }
        }

        // A non-empty list either errors above or opens the stream
        let (Some(mut stream), Some(size)) = (writer, size) else {
            return Err(VideoError::NoFrames.into());
        };

        stream.release()?;
        let frame_count = stream.frames_written();

        info!("Wrote {} frames to {:?}", frame_count, output);

        Ok(AssembledVideo {
            path: output.to_path_buf(),
            frame_count,
            size,
        })
    }

    fn stream_params(&self, size: FrameSize) -> StreamParams {
        StreamParams {
            fps: self.params.fps,
            size,
            is_color: self.params.is_color,
            codec: self.params.codec,
        }
    }
}

/// Write `images` to `output` through ffmpeg
pub fn assemble_video<O, P>(output: O, images: &[P], params: &VideoParams) -> Result<AssembledVideo>
where
    O: AsRef<Path>,
    P: AsRef<Path>,
{
    VideoAssembler::new(params.clone()).assemble(output, images)
}

// An image matching the stream on one axis only is passed through as-is.
fn needs_resize(image: FrameSize, stream: FrameSize) -> bool {
    image.width != stream.width && image.height != stream.height
}
