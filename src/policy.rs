//! Crop planning for the three split policies.
//!
//! Planning is pure arithmetic on the source dimensions: it never touches
//! pixels, so plans can be inspected, tested and drawn without decoding.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, error, trace};

use crate::geometry::{Column, ColumnSplit, CropBox, PANEL_COUNT};
use crate::{SplitConfig, SplitError};

/// A crop/resize strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Policy {
    /// Exact thirds at full height, no resizing.
    FreeSplit,
    /// Centered crops at the target aspect, resized to the target size.
    Grid3x4,
    /// Largest centered squares, never resized.
    Square,
}

impl Policy {
    /// Every policy, in output order.
    pub const ALL: [Policy; 3] = [Policy::FreeSplit, Policy::Grid3x4, Policy::Square];

    /// Directory name used for this policy's outputs.
    pub fn name(&self) -> &'static str {
        match self {
            Policy::FreeSplit => "free_split",
            Policy::Grid3x4 => "grid_3x4",
            Policy::Square => "square",
        }
    }

    /// Plans the three panels for a `width` x `height` source.
    ///
    /// # Errors
    /// - [`SplitError::InvalidDimensions`] if either dimension is zero.
    /// - [`SplitError::TooNarrow`] if `width < 3`.
    /// - [`SplitError::DegenerateCrop`] if a planned crop would be empty.
    ///
    /// # Example
    /// ```
    /// use trisplit::{Policy, SplitConfig};
    ///
    /// let plan = Policy::Square.plan(3000, 900, &SplitConfig::default()).unwrap();
    /// assert_eq!(plan.output_dimensions(), [(900, 900); 3]);
    /// ```
    pub fn plan(&self, width: u32, height: u32, config: &SplitConfig) -> Result<Plan, SplitError> {
        validate_source(width, height)?;
        let split = ColumnSplit::new(width);
        let panels = match self {
            Policy::FreeSplit => plan_free_split(&split, height),
            Policy::Grid3x4 => plan_grid(&split, height, config)?,
            Policy::Square => plan_square(&split, width, height),
        };
        let plan = Plan {
            policy: *self,
            panels,
        };
        plan.check_bounds(width, height)?;
        debug!(policy = self.name(), width, height, "Planned panels");
        Ok(plan)
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Policy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Policy::ALL
            .into_iter()
            .find(|policy| policy.name() == s)
            .ok_or_else(|| format!("unknown policy: {s}"))
    }
}

/// One planned output: a crop in source coordinates and an optional exact resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Panel {
    pub crop: CropBox,
    pub resize: Option<(u32, u32)>,
}

impl Panel {
    fn cropped(crop: CropBox) -> Self {
        Self { crop, resize: None }
    }

    /// Final `(width, height)` of the rendered panel.
    pub fn output_dimensions(&self) -> (u32, u32) {
        self.resize
            .unwrap_or((self.crop.width(), self.crop.height()))
    }
}

/// The three panels a policy produces, left to right.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Plan {
    pub policy: Policy,
    pub panels: [Panel; PANEL_COUNT],
}

impl Plan {
    pub fn output_dimensions(&self) -> [(u32, u32); PANEL_COUNT] {
        self.panels.map(|panel| panel.output_dimensions())
    }

    pub fn crops(&self) -> impl Iterator<Item = &CropBox> {
        self.panels.iter().map(|panel| &panel.crop)
    }

    fn check_bounds(&self, width: u32, height: u32) -> Result<(), SplitError> {
        for (column, crop) in self.crops().enumerate() {
            if crop.is_empty() {
                return Err(SplitError::DegenerateCrop {
                    column,
                    width: crop.width(),
                    height: crop.height(),
                });
            }
            if !crop.fits_within(width, height) {
                error!(?crop, width, height, "Planned crop out of bounds");
                return Err(SplitError::CropOutOfBounds {
                    crop: *crop,
                    width,
                    height,
                });
            }
        }
        Ok(())
    }
}

/// Rejects sources that cannot yield three non-empty columns.
pub fn validate_source(width: u32, height: u32) -> Result<(), SplitError> {
    if width == 0 || height == 0 {
        error!(
            "Invalid image dimensions: width={}, height={}",
            width, height
        );
        return Err(SplitError::InvalidDimensions { width, height });
    }
    if width < PANEL_COUNT as u32 {
        return Err(SplitError::TooNarrow { width });
    }
    Ok(())
}

/// Full-height strips, verbatim.
pub fn plan_free_split(split: &ColumnSplit, height: u32) -> [Panel; PANEL_COUNT] {
    split.columns.map(|column| Panel::cropped(column.strip(height)))
}

/// Centered crops matching the target aspect, resized to the target size.
///
/// With `R = target_width / target_height` and column width `cw`:
/// - if `floor(cw / R) <= height`, the strip is cropped vertically to that height;
/// - otherwise the full height is kept and the strip is cropped horizontally
///   to `floor(height * R)`.
///
/// Both branches use integer floor arithmetic. When the vertical branch is
/// rejected, `floor(height * R) < cw` holds, so the horizontal crop always fits.
pub fn plan_grid(
    split: &ColumnSplit,
    height: u32,
    config: &SplitConfig,
) -> Result<[Panel; PANEL_COUNT], SplitError> {
    config.validate()?;
    let target = (config.target_width, config.target_height);
    Ok(split.columns.map(|column| Panel {
        crop: grid_crop(&column, height, config),
        resize: Some(target),
    }))
}

fn grid_crop(column: &Column, height: u32, config: &SplitConfig) -> CropBox {
    let strip = column.strip(height);
    let ideal_height = scale_floor(column.width, config.target_height, config.target_width);
    if ideal_height <= height {
        trace!(x = column.x, ideal_height, "Grid column tall enough, cropping vertically");
        strip.center_vertically(ideal_height)
    } else {
        let crop_width = scale_floor(height, config.target_width, config.target_height);
        trace!(x = column.x, crop_width, "Grid column too short, cropping horizontally");
        strip.center_horizontally(crop_width)
    }
}

/// `floor(value * num / den)` without intermediate overflow.
fn scale_floor(value: u32, num: u32, den: u32) -> u32 {
    let scaled = u64::from(value) * u64::from(num) / u64::from(den);
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

/// Largest squares that fit both a base column and the full height.
///
/// The edge `side = min(width / 3, height)` and its vertical placement are
/// computed once for the whole image. Any column wider than `side` is then
/// centered horizontally, which always includes the remainder-absorbing last
/// column and, when `height < width / 3`, every column.
pub fn plan_square(split: &ColumnSplit, width: u32, height: u32) -> [Panel; PANEL_COUNT] {
    let side = (width / PANEL_COUNT as u32).min(height);
    let band = CropBox::full(width, height).center_vertically(side);
    split.columns.map(|column| {
        let crop = CropBox::new(column.x, band.top, column.right(), band.bottom);
        let crop = if crop.width() > side {
            crop.center_horizontally(side)
        } else {
            crop
        };
        Panel::cropped(crop)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use test_case::test_case;

    fn config() -> SplitConfig {
        SplitConfig::default()
    }

    #[test]
    fn test_landscape_example() {
        let free = Policy::FreeSplit.plan(3000, 2000, &config()).unwrap();
        assert_eq!(free.output_dimensions(), [(1000, 2000); 3]);

        let grid = Policy::Grid3x4.plan(3000, 2000, &config()).unwrap();
        assert_eq!(grid.output_dimensions(), [(1080, 1440); 3]);

        let square = Policy::Square.plan(3000, 2000, &config()).unwrap();
        assert_eq!(square.output_dimensions(), [(1000, 1000); 3]);
    }

    #[test]
    fn test_short_banner_squares() {
        let plan = Policy::Square.plan(3000, 900, &config()).unwrap();
        assert_eq!(plan.output_dimensions(), [(900, 900); 3]);
        // Every column is wider than the side, so every column is recentered
        let lefts: Vec<u32> = plan.crops().map(|c| c.left).collect();
        assert_eq!(lefts, vec![50, 1050, 2050]);
    }

    #[test]
    fn test_square_last_column_recentered() {
        // 3002 wide: last column is 1002, side is 1000
        let plan = Policy::Square.plan(3002, 2000, &config()).unwrap();
        assert_eq!(plan.panels[2].crop, CropBox::new(2001, 500, 3001, 1500));
        assert_eq!(plan.panels[0].crop, CropBox::new(0, 500, 1000, 1500));
    }

    #[test]
    fn test_grid_vertical_branch() {
        // cw = 1000, ideal height = 1333 <= 2000
        let plan = Policy::Grid3x4.plan(3000, 2000, &config()).unwrap();
        assert_eq!(plan.panels[0].crop, CropBox::new(0, 333, 1000, 1666));
        assert_eq!(plan.panels[1].crop, CropBox::new(1000, 333, 2000, 1666));
    }

    #[test]
    fn test_grid_horizontal_branch() {
        // cw = 1000, ideal height = 1333 > 900, so crop width = 675
        let plan = Policy::Grid3x4.plan(3000, 900, &config()).unwrap();
        assert_eq!(plan.panels[0].crop, CropBox::new(162, 0, 837, 900));
        assert_eq!(plan.panels[2].crop, CropBox::new(2162, 0, 2837, 900));
        assert_eq!(plan.output_dimensions(), [(1080, 1440); 3]);
    }

    #[test]
    fn test_grid_custom_target() {
        let config = SplitConfig::new(1080, 1080);
        let plan = Policy::Grid3x4.plan(3000, 2000, &config).unwrap();
        assert_eq!(plan.panels[0].crop, CropBox::new(0, 500, 1000, 1500));
        assert_eq!(plan.output_dimensions(), [(1080, 1080); 3]);
    }

    #[test]
    fn test_grid_one_pixel_tall_is_degenerate() {
        let err = Policy::Grid3x4.plan(300, 1, &config()).unwrap_err();
        assert!(matches!(err, SplitError::DegenerateCrop { column: 0, .. }));
    }

    #[test]
    fn test_grid_planner_leaves_empty_crop_to_bounds_check() {
        let split = ColumnSplit::new(300);
        let panels = plan_grid(&split, 1, &config()).unwrap();
        assert!(panels[0].crop.is_empty());

        let plan = Plan {
            policy: Policy::Grid3x4,
            panels,
        };
        let err = plan.check_bounds(300, 1).unwrap_err();
        assert!(matches!(
            err,
            SplitError::DegenerateCrop { column: 0, width: 0, height: 1 }
        ));
    }

    #[test]
    fn test_grid_rejects_zero_target() {
        let config = SplitConfig {
            target_width: 0,
            ..SplitConfig::default()
        };
        let err = Policy::Grid3x4.plan(300, 200, &config).unwrap_err();
        assert!(matches!(err, SplitError::InvalidTarget { .. }));
    }

    #[test_case(Policy::FreeSplit ; "free split")]
    #[test_case(Policy::Grid3x4 ; "grid")]
    #[test_case(Policy::Square ; "square")]
    fn test_narrow_source_rejected(policy: Policy) {
        let err = policy.plan(2, 100, &config()).unwrap_err();
        assert!(matches!(err, SplitError::TooNarrow { width: 2 }));
        let err = policy.plan(300, 0, &config()).unwrap_err();
        assert!(matches!(err, SplitError::InvalidDimensions { .. }));
    }

    #[test_case("free_split", Policy::FreeSplit)]
    #[test_case("grid_3x4", Policy::Grid3x4)]
    #[test_case("square", Policy::Square)]
    fn test_policy_names_round_trip(name: &str, policy: Policy) {
        assert_eq!(policy.name(), name);
        assert_eq!(name.parse::<Policy>().unwrap(), policy);
        assert_eq!(policy.to_string(), name);
    }

    #[test]
    fn test_unknown_policy_name() {
        assert!("panorama".parse::<Policy>().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_square_plan_snapshot() {
        let plan = Policy::Square.plan(10, 4, &config()).unwrap();
        insta::assert_yaml_snapshot!(plan.crops().collect::<Vec<_>>(), @r###"
        - left: 0
          top: 0
          right: 3
          bottom: 3
        - left: 3
          top: 0
          right: 6
          bottom: 3
        - left: 6
          top: 0
          right: 9
          bottom: 3
        "###);
    }

    proptest! {
        #[test]
        fn test_free_split_tiles_source(width in 3..10_000u32, height in 1..10_000u32) {
            let plan = Policy::FreeSplit.plan(width, height, &config()).unwrap();
            let dims = plan.output_dimensions();
            prop_assert_eq!(dims.iter().map(|(w, _)| w).sum::<u32>(), width);
            prop_assert!(dims.iter().all(|&(_, h)| h == height));
            prop_assert!(plan.panels.iter().all(|p| p.resize.is_none()));
        }

        #[test]
        fn test_grid_always_target_size(width in 3..10_000u32, height in 2..10_000u32) {
            let plan = Policy::Grid3x4.plan(width, height, &config()).unwrap();
            prop_assert_eq!(plan.output_dimensions(), [(1080, 1440); 3]);
        }

        #[test]
        fn test_grid_crop_matches_branch(width in 3..10_000u32, height in 2..10_000u32) {
            let plan = Policy::Grid3x4.plan(width, height, &config()).unwrap();
            let split = ColumnSplit::new(width);
            for (panel, column) in plan.panels.iter().zip(split.iter()) {
                let ideal_height = column.width * 4 / 3;
                if ideal_height <= height {
                    prop_assert_eq!(panel.crop.width(), column.width);
                    prop_assert_eq!(panel.crop.height(), ideal_height);
                    prop_assert_eq!(panel.crop.top, (height - ideal_height) / 2);
                } else {
                    let crop_width = height * 3 / 4;
                    prop_assert_eq!(panel.crop.height(), height);
                    prop_assert_eq!(panel.crop.width(), crop_width);
                    prop_assert_eq!(panel.crop.left - column.x, (column.width - crop_width) / 2);
                }
            }
        }

        #[test]
        fn test_squares_identical(width in 3..10_000u32, height in 1..10_000u32) {
            let plan = Policy::Square.plan(width, height, &config()).unwrap();
            let side = (width / 3).min(height);
            prop_assert_eq!(plan.output_dimensions(), [(side, side); 3]);
            for (crop, column) in plan.crops().zip(ColumnSplit::new(width).iter()) {
                prop_assert!(crop.left >= column.x && crop.right <= column.right());
            }
        }
    }
}
