use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the Reel-Compositor library
#[derive(Error, Debug)]
pub enum CompositorError {
    #[error("Video assembly error: {0}")]
    Video(#[from] VideoError),

    #[error("Tiling error: {0}")]
    Tile(#[from] TileError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while turning still images into a video
#[derive(Error, Debug)]
pub enum VideoError {
    #[error("Image file not found: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("Failed to decode image {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Cannot derive a numeric sort key from file name: {file_name}")]
    SortKey { file_name: String },

    #[error("No images given, nothing to encode")]
    NoFrames,

    #[error("Unsupported codec identifier: {fourcc}")]
    UnsupportedCodec { fourcc: String },

    #[error("Video encoding failed: {reason}")]
    EncodingFailed { reason: String },

    #[error("Invalid video parameters: {details}")]
    InvalidParameters { details: String },
}

/// Errors raised by the image tiler
#[derive(Error, Debug)]
pub enum TileError {
    #[error("Cannot {operation} an empty list of images")]
    EmptyInput { operation: &'static str },

    #[error("Image has a zero dimension: {width}x{height}")]
    DegenerateImage { width: u32, height: u32 },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using CompositorError
pub type Result<T> = std::result::Result<T, CompositorError>;

impl CompositorError {
    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Video(VideoError::MissingFile { path }) => {
                format!("Image '{}' does not exist. Check the path and try again.", path.display())
            }
            Self::Video(VideoError::SortKey { file_name }) => {
                format!(
                    "File '{}' must start with a number followed by '_' (e.g. 12_frame.jpg).",
                    file_name
                )
            }
            Self::Video(VideoError::UnsupportedCodec { fourcc }) => {
                format!("Codec '{}' is not supported. Try FMP4, MJPG, H264 or VP90.", fourcc)
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_message_names_path() {
        let err: CompositorError = VideoError::MissingFile {
            path: PathBuf::from("frames/7_x.jpg"),
        }
        .into();

        assert!(err.to_string().contains("frames/7_x.jpg"));
        assert!(err.user_message().contains("does not exist"));
    }

    #[test]
    fn test_empty_input_names_operation() {
        let err: CompositorError = TileError::EmptyInput { operation: "join horizontally" }.into();
        assert_eq!(
            err.to_string(),
            "Tiling error: Cannot join horizontally an empty list of images"
        );
    }
}
