//! This module draws planned crop boxes and column boundaries on images.
//! It is feature-gated under the `drawing` feature and uses `imageproc` for rasterizing.
//!
//! # Examples
//!
//! ```rust
//! use image::{Rgba, RgbaImage};
//! use trisplit::{drawing::*, Policy, SplitConfig};
//!
//! let mut canvas = RgbaImage::new(300, 200);
//! let plan = Policy::Square.plan(300, 200, &SplitConfig::default()).unwrap();
//!
//! let drawing_config = LayoutDrawingConfig {
//!     column_color: Rgba([0, 0, 255, 255]), // Blue column boundaries
//!     crop_color: Rgba([255, 0, 0, 255]),   // Red crop boxes
//!     crop_color_provider: None,            // Uniform crop color
//!     line_thickness: 1,
//! };
//! plan.draw(&mut canvas, &drawing_config).unwrap();
//! ```

use std::fmt;

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

use crate::geometry::{ColumnSplit, CropBox};
use crate::policy::Plan;
use crate::SplitError;

/// Configuration for drawing a plan.
pub struct LayoutDrawingConfig {
    /// Color of the vertical column boundaries.
    pub column_color: Rgba<u8>,
    /// Default color of crop box outlines.
    pub crop_color: Rgba<u8>,
    /// Optional function giving a crop color per panel index.
    pub crop_color_provider: Option<Box<dyn Fn(usize) -> Rgba<u8>>>,
    /// Thickness of outlines, growing inwards.
    pub line_thickness: u32,
}

impl fmt::Debug for LayoutDrawingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutDrawingConfig")
            .field("column_color", &self.column_color)
            .field("crop_color", &self.crop_color)
            .field("crop_color_provider", &"<function>")
            .field("line_thickness", &self.line_thickness)
            .finish()
    }
}

impl Default for LayoutDrawingConfig {
    fn default() -> Self {
        LayoutDrawingConfig {
            column_color: Rgba([0, 0, 255, 255]), // Blue
            crop_color: Rgba([255, 0, 0, 255]),   // Red
            crop_color_provider: None,
            line_thickness: 2,
        }
    }
}

/// Trait for layout types that can be drawn on an image.
pub trait Drawable {
    /// Draws the object on `image` using `config`.
    ///
    /// # Errors
    /// Returns [`SplitError::CropOutOfBounds`] if the object does not fit the image.
    fn draw(&self, image: &mut RgbaImage, config: &LayoutDrawingConfig) -> Result<(), SplitError>;
}

impl Drawable for CropBox {
    fn draw(&self, image: &mut RgbaImage, config: &LayoutDrawingConfig) -> Result<(), SplitError> {
        draw_outline(image, self, config.crop_color, config.line_thickness)
    }
}

impl Drawable for ColumnSplit {
    fn draw(&self, image: &mut RgbaImage, config: &LayoutDrawingConfig) -> Result<(), SplitError> {
        // Interior boundaries only
        for column in self.iter().skip(1) {
            let x = column.x as f32;
            draw_line_segment_mut(
                image,
                (x, 0.0),
                (x, image.height() as f32),
                config.column_color,
            );
        }
        Ok(())
    }
}

impl Drawable for Plan {
    fn draw(&self, image: &mut RgbaImage, config: &LayoutDrawingConfig) -> Result<(), SplitError> {
        ColumnSplit::new(image.width()).draw(image, config)?;

        for (index, crop) in self.crops().enumerate() {
            let color = match config.crop_color_provider {
                Some(ref provider) => provider(index),
                None => config.crop_color,
            };
            draw_outline(image, crop, color, config.line_thickness)?;
        }
        Ok(())
    }
}

fn draw_outline(
    image: &mut RgbaImage,
    crop: &CropBox,
    color: Rgba<u8>,
    thickness: u32,
) -> Result<(), SplitError> {
    let (width, height) = image.dimensions();
    if !crop.fits_within(width, height) {
        return Err(SplitError::CropOutOfBounds {
            crop: *crop,
            width,
            height,
        });
    }

    let rect = Rect::from(crop);
    for inset in 0..thickness {
        let inner_width = rect.width().saturating_sub(2 * inset);
        let inner_height = rect.height().saturating_sub(2 * inset);
        if inner_width == 0 || inner_height == 0 {
            break;
        }
        let inner = Rect::at(rect.left() + inset as i32, rect.top() + inset as i32)
            .of_size(inner_width, inner_height);
        draw_hollow_rect_mut(image, inner, color);
    }
    Ok(())
}
