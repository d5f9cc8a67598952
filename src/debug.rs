use std::path::Path;

use image::DynamicImage;

use crate::drawing::*;
use crate::{Plan, SplitError};

/// Saves the image with a plan's column boundaries and crop boxes drawn on it.
///
/// # Arguments
/// * `image` - The source image the plan was made for.
/// * `plan` - The plan to draw.
/// * `output_path` - The path to save the preview to; the format follows the extension.
/// * `config` - The drawing configuration.
///
/// # Errors
/// Returns [`SplitError`] if drawing or saving fails.
///
/// # Examples
///
/// ```rust,no_run
/// use image::{DynamicImage, RgbImage};
/// use trisplit::{drawing::*, Partitioner, Policy};
///
/// let img = DynamicImage::ImageRgb8(RgbImage::new(300, 200));
/// let plan = Partitioner::default().plan(&img, Policy::Grid3x4).unwrap();
/// trisplit::debug::save_image_with_plan(&img, &plan, "preview.png", &LayoutDrawingConfig::default())
///     .unwrap();
/// ```
pub fn save_image_with_plan(
    image: &DynamicImage,
    plan: &Plan,
    output_path: impl AsRef<Path>,
    config: &LayoutDrawingConfig,
) -> Result<(), SplitError> {
    let output_path = output_path.as_ref();
    let mut rgba_img = image.to_rgba8();
    plan.draw(&mut rgba_img, config)?;
    rgba_img
        .save(output_path)
        .map_err(|source| SplitError::Encode {
            path: output_path.to_path_buf(),
            source,
        })
}
