//! This crate splits a horizontal image into three vertical panels for carousel posting.
//! It uses the `image` crate for decoding, cropping, resampling and encoding, and
//! `imageproc` for rectangle handling and preview drawing.
//!
//! Three policies are available:
//! - [`Policy::FreeSplit`]: exact thirds at full height, no resizing.
//! - [`Policy::Grid3x4`]: centered crops matching the target aspect, resized to the target size.
//! - [`Policy::Square`]: the largest centered squares that fit every column.
//!
//! # Example
//! ```
//! use image::{DynamicImage, RgbImage};
//! use trisplit::{Partitioner, Policy, SplitConfig};
//!
//! let img = DynamicImage::ImageRgb8(RgbImage::new(300, 200));
//! let partitioner = Partitioner::new(SplitConfig::default());
//! let set = partitioner.partition(&img, Policy::Square).unwrap();
//! for panel in &set.panels {
//!     assert_eq!((panel.width(), panel.height()), (100, 100));
//! }
//! ```

pub mod batch;
/// Debug previews of a plan drawn over its source image.
///
/// # Example
/// ```no_run
/// use image::{DynamicImage, RgbImage};
/// use trisplit::{drawing::LayoutDrawingConfig, Partitioner, Policy};
///
/// let img = DynamicImage::ImageRgb8(RgbImage::new(300, 200));
/// let plan = Partitioner::default().plan(&img, Policy::Square).unwrap();
/// trisplit::debug::save_image_with_plan(&img, &plan, "preview.png", &LayoutDrawingConfig::default())
///     .unwrap();
/// ```
#[cfg(feature = "drawing")]
pub mod debug;
/// Drawing of column boundaries and crop boxes, via the [`drawing::Drawable`] trait.
#[cfg(feature = "drawing")]
pub mod drawing;
pub mod geometry;
pub mod input;
pub mod output;
pub mod partition;
pub mod policy;

use std::path::PathBuf;

use image::imageops::FilterType;
use thiserror::Error;

pub use geometry::{Column, ColumnSplit, CropBox, PANEL_COUNT};
pub use output::{OutputConfig, OutputFormat};
pub use partition::{OutputSet, Partitioner};
pub use policy::{Panel, Plan, Policy};

const DEFAULT_TARGET_WIDTH: u32 = 1080;
const DEFAULT_TARGET_HEIGHT: u32 = 1440;

#[derive(Error, Debug)]
pub enum SplitError {
    #[error("Invalid image dimensions: width={width}, height={height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Image too narrow to split into three columns: width={width}")]
    TooNarrow { width: u32 },

    #[error("Column {column} produced an empty crop: {width}x{height}")]
    DegenerateCrop {
        column: usize,
        width: u32,
        height: u32,
    },

    #[error("Crop box {crop:?} does not fit in a {width}x{height} image")]
    CropOutOfBounds {
        crop: CropBox,
        width: u32,
        height: u32,
    },

    #[error("Invalid target size: {width}x{height}")]
    InvalidTarget { width: u32, height: u32 },

    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to list {path}: {message}")]
    Traversal { path: PathBuf, message: String },
}

/// Target geometry and resampling used by the split policies.
///
/// # Example
/// ```
/// use trisplit::SplitConfig;
///
/// let config = SplitConfig::default();
/// assert_eq!(config.target_width, 1080);
/// assert_eq!(config.target_height, 1440);
/// assert_eq!(config.aspect(), 0.75);
/// ```
#[derive(Debug, Clone)]
pub struct SplitConfig {
    /// Width of every grid panel (default: 1080)
    pub target_width: u32,
    /// Height of every grid panel (default: 1440)
    pub target_height: u32,
    /// Resampling filter for the grid resize (default: Lanczos3)
    pub filter: FilterType,
}

impl SplitConfig {
    /// Creates a new `SplitConfig` with the given target size and Lanczos3 resampling.
    ///
    /// # Example
    /// ```
    /// use trisplit::SplitConfig;
    ///
    /// let config = SplitConfig::new(1080, 1350);
    /// assert_eq!(config.target_height, 1350);
    ///
    /// // Zero dimensions are clamped
    /// let config = SplitConfig::new(0, 0);
    /// assert_eq!((config.target_width, config.target_height), (1, 1));
    /// ```
    pub fn new(target_width: u32, target_height: u32) -> Self {
        Self {
            target_width: target_width.max(1),
            target_height: target_height.max(1),
            filter: FilterType::Lanczos3,
        }
    }

    /// Target aspect ratio, width over height.
    pub fn aspect(&self) -> f64 {
        f64::from(self.target_width) / f64::from(self.target_height)
    }

    pub(crate) fn validate(&self) -> Result<(), SplitError> {
        if self.target_width == 0 || self.target_height == 0 {
            return Err(SplitError::InvalidTarget {
                width: self.target_width,
                height: self.target_height,
            });
        }
        Ok(())
    }
}

impl Default for SplitConfig {
    fn default() -> Self {
        SplitConfig::new(DEFAULT_TARGET_WIDTH, DEFAULT_TARGET_HEIGHT)
    }
}
