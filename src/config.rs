use std::path::Path;
use serde::{Deserialize, Serialize};

use crate::{
    error::{ConfigError, Result},
    tile::Interpolation,
    video::{Fourcc, FrameSize, VideoParams},
};

/// Main configuration for the Reel-Compositor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Video assembly settings
    pub video: VideoConfig,

    /// Tiling settings
    pub tile: TileConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|_| ConfigError::ParseFailed { path: path.display().to_string() })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.video.validate()?;
        Ok(())
    }
}

/// Video assembly configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Output frame rate
    pub fps: f64,

    /// Fixed frame size; omitted means "size of the first image"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<FrameSize>,

    /// Write color frames
    pub is_color: bool,

    /// Four-character codec identifier
    pub codec: String,
}

impl Default for VideoConfig {
    fn default() -> Self {
        let params = VideoParams::default();
        Self {
            fps: params.fps,
            size: params.size,
            is_color: params.is_color,
            codec: params.codec.to_string(),
        }
    }
}

impl VideoConfig {
    fn validate(&self) -> Result<()> {
        if !(self.fps.is_finite() && self.fps > 0.0) {
            return Err(ConfigError::InvalidValue {
                key: "video.fps".to_string(),
                value: self.fps.to_string()
            }.into());
        }

        if let Some(size) = self.size.filter(FrameSize::is_empty) {
            return Err(ConfigError::InvalidValue {
                key: "video.size".to_string(),
                value: size.to_string()
            }.into());
        }

        self.fourcc()?;
        Ok(())
    }

    fn fourcc(&self) -> Result<Fourcc> {
        self.codec.parse::<Fourcc>().map_err(|_| {
            ConfigError::InvalidValue {
                key: "video.codec".to_string(),
                value: self.codec.clone()
            }.into()
        })
    }

    /// Validated assembly parameters
    pub fn params(&self) -> Result<VideoParams> {
        self.validate()?;
        Ok(VideoParams {
            fps: self.fps,
            size: self.size,
            is_color: self.is_color,
            codec: self.fourcc()?,
        })
    }
}

/// Tiling configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileConfig {
    /// Resampling kernel for size normalization
    pub interpolation: Interpolation,
}
