use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use image::imageops::{self, FilterType};
use image::{ImageBuffer, Rgb, RgbImage};
use serde::{Deserialize, Serialize};

use crate::error::VideoError;

/// A single still image, held as an RGB buffer
///
/// Frames are read fresh from disk for every assembly call and have no
/// identity beyond the buffer itself.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    buffer: RgbImage,
}

impl Frame {
    /// Create a new frame from an RGB image buffer
    pub fn new(buffer: RgbImage) -> Self {
        Self { buffer }
    }

    /// Create a new frame with the given dimensions filled with the specified color
    pub fn new_filled(width: u32, height: u32, color: [u8; 3]) -> Self {
        let buffer = ImageBuffer::from_fn(width, height, |_, _| Rgb(color));
        Self { buffer }
    }

    /// Decode an image file into a frame, converting to RGB if needed
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, image::ImageError> {
        let image = image::open(path.as_ref())?;
        let buffer = match image {
            image::DynamicImage::ImageRgb8(img) => img,
            other => other.to_rgb8(),
        };
        Ok(Self { buffer })
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// Dimensions as a [`FrameSize`]
    pub fn size(&self) -> FrameSize {
        FrameSize::new(self.width(), self.height())
    }

    /// Get a pixel at the given coordinates (returns RGB array)
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.buffer.get_pixel(x, y).0
    }

    /// Get the underlying image buffer
    pub fn as_image(&self) -> &RgbImage {
        &self.buffer
    }

    pub fn into_image(self) -> RgbImage {
        self.buffer
    }

    /// Resample to exactly `size`; frames already at that size are copied as-is.
    pub fn resized(&self, size: FrameSize, filter: FilterType) -> Frame {
        if self.size() == size {
            return self.clone();
        }
        Frame::new(imageops::resize(&self.buffer, size.width, size.height, filter))
    }

    /// Raw interleaved RGB24 bytes, row-major
    pub fn as_rgb_bytes(&self) -> &[u8] {
        self.buffer.as_raw()
    }

    /// Luma bytes for grayscale streams
    pub fn to_gray_bytes(&self) -> Vec<u8> {
        imageops::grayscale(&self.buffer).into_raw()
    }

    /// Save the frame; the format follows the file extension
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), image::ImageError> {
        self.buffer.save(path)
    }
}

/// Width and height of a video frame, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for FrameSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for FrameSize {
    type Err = VideoError;

    /// Parse a size written as `WIDTHxHEIGHT`, e.g. `1280x720`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || VideoError::InvalidParameters {
            details: format!("frame size '{}' is not WIDTHxHEIGHT", s),
        };

        let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(invalid)?;
        let width = w.trim().parse().map_err(|_| invalid())?;
        let height = h.trim().parse().map_err(|_| invalid())?;

        let size = FrameSize::new(width, height);
        if size.is_empty() {
            return Err(invalid());
        }
        Ok(size)
    }
}

/// Four-character code naming the video compression scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fourcc([u8; 4]);

impl Fourcc {
    pub const FMP4: Fourcc = Fourcc(*b"FMP4");

    pub fn as_str(&self) -> &str {
        // Constructed only from ASCII in `from_str`
        std::str::from_utf8(&self.0).unwrap_or("????")
    }

    /// The ffmpeg encoder that produces this codec, if known
    pub fn encoder(&self) -> Option<&'static str> {
        let upper = self.as_str().to_ascii_uppercase();
        let encoder = match upper.as_str() {
            "FMP4" | "DIVX" | "XVID" | "DX50" | "MP4V" => "mpeg4",
            "MJPG" => "mjpeg",
            "H264" | "X264" | "AVC1" => "libx264",
            "HEVC" | "H265" | "HVC1" => "libx265",
            "VP80" => "libvpx",
            "VP90" => "libvpx-vp9",
            "FFV1" => "ffv1",
            _ => return None,
        };
        Some(encoder)
    }
}

impl Default for Fourcc {
    fn default() -> Self {
        Self::FMP4
    }
}

impl fmt::Display for Fourcc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Fourcc {
    type Err = VideoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 4 || !bytes.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
            return Err(VideoError::InvalidParameters {
                details: format!("codec identifier '{}' must be four ASCII characters", s),
            });
        }

        let mut code = [0u8; 4];
        code.copy_from_slice(bytes);
        Ok(Fourcc(code))
    }
}

/// Parameters for one assembly call
#[derive(Debug, Clone, PartialEq)]
pub struct VideoParams {
    /// Output frame rate
    pub fps: f64,

    /// Explicit frame size; taken from the first image when `None`
    pub size: Option<FrameSize>,

    /// Write color frames (`false` writes grayscale)
    pub is_color: bool,

    /// Codec identifier
    pub codec: Fourcc,
}

impl Default for VideoParams {
    fn default() -> Self {
        Self {
            fps: 30.0,
            size: None,
            is_color: true,
            codec: Fourcc::default(),
        }
    }
}

/// Stream settings handed to a writer backend when it opens
#[derive(Debug, Clone, PartialEq)]
pub struct StreamParams {
    pub fps: f64,
    pub size: FrameSize,
    pub is_color: bool,
    pub codec: Fourcc,
}

/// Summary of a finished assembly call
#[derive(Debug, Clone)]
pub struct AssembledVideo {
    pub path: PathBuf,
    pub frame_count: usize,
    /// Stream size, explicit or taken from the first image
    pub size: FrameSize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_size_parse() {
        assert_eq!("640x480".parse::<FrameSize>().unwrap(), FrameSize::new(640, 480));
        assert_eq!(" 32X16 ".parse::<FrameSize>().unwrap(), FrameSize::new(32, 16));
        assert!("640".parse::<FrameSize>().is_err());
        assert!("0x480".parse::<FrameSize>().is_err());
        assert!("axb".parse::<FrameSize>().is_err());
    }

    #[test]
    fn test_fourcc_parse_and_encoder() {
        let fourcc: Fourcc = "FMP4".parse().unwrap();
        assert_eq!(fourcc, Fourcc::default());
        assert_eq!(fourcc.encoder(), Some("mpeg4"));
        assert_eq!("mjpg".parse::<Fourcc>().unwrap().encoder(), Some("mjpeg"));
        assert_eq!("ZZZZ".parse::<Fourcc>().unwrap().encoder(), None);
        assert!("H26".parse::<Fourcc>().is_err());
        assert!("H2645".parse::<Fourcc>().is_err());
    }

    #[test]
    fn test_resized_same_size_is_identity() {
        let frame = Frame::new(ImageBuffer::from_fn(8, 4, |x, y| Rgb([x as u8, y as u8, 7])));
        let same = frame.resized(FrameSize::new(8, 4), FilterType::CatmullRom);
        assert_eq!(same, frame);

        let smaller = frame.resized(FrameSize::new(4, 2), FilterType::CatmullRom);
        assert_eq!(smaller.size(), FrameSize::new(4, 2));
    }

    #[test]
    fn test_gray_bytes_length() {
        let frame = Frame::new_filled(5, 3, [255, 255, 255]);
        let gray = frame.to_gray_bytes();
        assert_eq!(gray.len(), 15);
        assert!(gray.iter().all(|&v| v == 255));
    }
}
