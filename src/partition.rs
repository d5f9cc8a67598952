//! Applies a [`Plan`] to decoded pixels.

use image::{DynamicImage, GenericImageView};
use tracing::{debug, trace};

use crate::geometry::PANEL_COUNT;
use crate::policy::{Panel, Plan, Policy};
use crate::{SplitConfig, SplitError};

/// The rendered outputs of one policy for one source image.
#[derive(Debug)]
pub struct OutputSet<'a> {
    pub policy: Policy,
    /// The untouched source, written alongside the panels.
    pub original: &'a DynamicImage,
    /// Left-to-right panels, written as `1`, `2`, `3`.
    pub panels: [DynamicImage; PANEL_COUNT],
}

impl OutputSet<'_> {
    /// `(width, height)` of each panel.
    pub fn dimensions(&self) -> [(u32, u32); PANEL_COUNT] {
        self.panels.each_ref().map(|panel| panel.dimensions())
    }
}

/// Splits images into panels according to a [`SplitConfig`].
///
/// # Example
/// ```
/// use image::{DynamicImage, RgbImage};
/// use trisplit::{Partitioner, Policy, SplitConfig};
///
/// let img = DynamicImage::ImageRgb8(RgbImage::new(90, 30));
/// let partitioner = Partitioner::new(SplitConfig::new(60, 80));
/// let set = partitioner.partition(&img, Policy::Grid3x4).unwrap();
/// assert_eq!(set.dimensions(), [(60, 80); 3]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Partitioner {
    config: SplitConfig,
}

impl Partitioner {
    pub fn new(config: SplitConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Plans `policy` for `image` without rendering it.
    pub fn plan(&self, image: &DynamicImage, policy: Policy) -> Result<Plan, SplitError> {
        let (width, height) = image.dimensions();
        policy.plan(width, height, &self.config)
    }

    /// Renders the three panels of `policy`.
    pub fn partition<'a>(
        &self,
        image: &'a DynamicImage,
        policy: Policy,
    ) -> Result<OutputSet<'a>, SplitError> {
        let plan = self.plan(image, policy)?;
        debug!(policy = policy.name(), "Rendering panels");
        Ok(self.render(image, &plan))
    }

    /// Renders a previously computed plan.
    ///
    /// The plan must have been made for an image of the same dimensions.
    pub fn render<'a>(&self, image: &'a DynamicImage, plan: &Plan) -> OutputSet<'a> {
        OutputSet {
            policy: plan.policy,
            original: image,
            panels: plan.panels.map(|panel| self.render_panel(image, &panel)),
        }
    }

    fn render_panel(&self, image: &DynamicImage, panel: &Panel) -> DynamicImage {
        let crop = &panel.crop;
        trace!(?crop, "Cropping panel");
        let cropped = image.crop_imm(crop.left, crop.top, crop.width(), crop.height());
        match panel.resize {
            Some((width, height)) if cropped.dimensions() != (width, height) => {
                trace!(width, height, "Resizing panel");
                cropped.resize_exact(width, height, self.config.filter)
            }
            _ => cropped,
        }
    }
}
