//! # Image Tiling
//!
//! Joins images of mismatched sizes into one composite frame. Images in a row
//! are scaled to the row's smallest height, rows are scaled to the narrowest
//! row's width, and aspect ratios are kept throughout.
//!
//! ```rust,no_run
//! use reel_compositor::tile::{Interpolation, Tiler};
//! use reel_compositor::video::Frame;
//!
//! # fn main() -> reel_compositor::Result<()> {
//! let a = Frame::new_filled(320, 240, [255, 0, 0]);
//! let b = Frame::new_filled(100, 100, [0, 0, 255]);
//!
//! let tiler = Tiler::new(Interpolation::Lanczos);
//! let composite = tiler.join_grid(&[vec![a.clone(), b.clone()], vec![b]])?;
//! # Ok(())
//! # }
//! ```

mod interpolation;

pub use interpolation::Interpolation;

use image::imageops;
use image::RgbImage;
use tracing::debug;

use crate::error::{Result, TileError};
use crate::video::types::{Frame, FrameSize};

/// Concatenates images along shared axes after normalizing their sizes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tiler {
    interpolation: Interpolation,
}

impl Tiler {
    pub fn new(interpolation: Interpolation) -> Self {
        Self { interpolation }
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    /// Scale every image to the smallest height among them, then place them left to right
    pub fn join_horizontal(&self, images: &[Frame]) -> Result<Frame> {
        let h_min = images
            .iter()
            .map(Frame::height)
            .min()
            .ok_or(TileError::EmptyInput { operation: "join horizontally" })?;

        let resized = images
            .iter()
            .map(|image| {
                check_dimensions(image)?;
                let width = scale_length(image.width(), h_min, image.height());
                Ok(image.resized(FrameSize::new(width, h_min), self.interpolation.filter()))
            })
            .collect::<Result<Vec<_>>>()?;

        let width = resized.iter().map(Frame::width).sum();
        let mut canvas = RgbImage::new(width, h_min);
        let mut x = 0i64;
        for image in &resized {
            imageops::replace(&mut canvas, image.as_image(), x, 0);
            x += i64::from(image.width());
        }

        debug!("Joined {} images horizontally into {}x{}", images.len(), width, h_min);
        Ok(Frame::new(canvas))
    }

    /// Scale every image to the smallest width among them, then stack them top to bottom
    pub fn join_vertical(&self, images: &[Frame]) -> Result<Frame> {
        let w_min = images
            .iter()
            .map(Frame::width)
            .min()
            .ok_or(TileError::EmptyInput { operation: "join vertically" })?;

        let resized = images
            .iter()
            .map(|image| {
                check_dimensions(image)?;
                let height = scale_length(image.height(), w_min, image.width());
                Ok(image.resized(FrameSize::new(w_min, height), self.interpolation.filter()))
            })
            .collect::<Result<Vec<_>>>()?;

        let height = resized.iter().map(Frame::height).sum();
        let mut canvas = RgbImage::new(w_min, height);
        let mut y = 0i64;
        for image in &resized {
            imageops::replace(&mut canvas, image.as_image(), 0, y);
            y += i64::from(image.height());
        }

        debug!("Joined {} images vertically into {}x{}", images.len(), w_min, height);
        Ok(Frame::new(canvas))
    }

    /// Join each row horizontally, then stack the row composites
    ///
    /// Rows may hold different numbers of images of any size.
    pub fn join_grid<R: AsRef<[Frame]>>(&self, rows: &[R]) -> Result<Frame> {
        if rows.is_empty() {
            return Err(TileError::EmptyInput { operation: "tile" }.into());
        }

        let composites = rows
            .iter()
            .map(|row| self.join_horizontal(row.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        self.join_vertical(&composites)
    }
}

/// Join with the default (cubic) kernel
pub fn join_horizontal(images: &[Frame]) -> Result<Frame> {
    Tiler::default().join_horizontal(images)
}

/// Join with the default (cubic) kernel
pub fn join_vertical(images: &[Frame]) -> Result<Frame> {
    Tiler::default().join_vertical(images)
}

/// Tile with the default (cubic) kernel
pub fn join_grid<R: AsRef<[Frame]>>(rows: &[R]) -> Result<Frame> {
    Tiler::default().join_grid(rows)
}

// `length * target / reference`, rounded to the nearest pixel and never below one.
fn scale_length(length: u32, target: u32, reference: u32) -> u32 {
    let numerator = u64::from(length) * u64::from(target);
    let denominator = u64::from(reference);
    let rounded = (2 * numerator + denominator) / (2 * denominator);
    u32::try_from(rounded).unwrap_or(u32::MAX).max(1)
}

fn check_dimensions(image: &Frame) -> Result<()> {
    if image.size().is_empty() {
        return Err(TileError::DegenerateImage {
            width: image.width(),
            height: image.height(),
        }
        .into());
    }
    Ok(())
}
