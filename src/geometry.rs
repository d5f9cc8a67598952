//! Integer rectangle arithmetic shared by every split policy.
//!
//! All coordinates are pixel offsets into the source image. Centering always
//! floor-divides the excess margin, so any odd pixel lands on the far side.

use imageproc::rect::Rect;
use tracing::trace;

/// Number of panels every policy produces.
pub const PANEL_COUNT: usize = 3;

/// A crop box `(left, top, right, bottom)` with exclusive right/bottom edges.
///
/// # Example
/// ```
/// use trisplit::CropBox;
///
/// let crop = CropBox::new(10, 20, 110, 220);
/// assert_eq!(crop.width(), 100);
/// assert_eq!(crop.height(), 200);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CropBox {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl CropBox {
    pub fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Box covering an entire `width` x `height` image.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    /// `true` when the box has zero width or zero height.
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Checks `0 <= left < right <= width` and `0 <= top < bottom <= height`.
    ///
    /// # Example
    /// ```
    /// use trisplit::CropBox;
    ///
    /// assert!(CropBox::new(0, 0, 4, 3).fits_within(4, 3));
    /// assert!(!CropBox::new(1, 0, 5, 3).fits_within(4, 3));
    /// assert!(!CropBox::new(2, 0, 2, 3).fits_within(4, 3));
    /// ```
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.left < self.right
            && self.top < self.bottom
            && self.right <= width
            && self.bottom <= height
    }

    /// Sub-box of the given height, vertically centered in `self`.
    ///
    /// Callers guarantee `height <= self.height()`.
    pub fn center_vertically(&self, height: u32) -> Self {
        let top = self.top + (self.height() - height) / 2;
        trace!(top, height, "Centering crop vertically");
        Self::new(self.left, top, self.right, top + height)
    }

    /// Sub-box of the given width, horizontally centered in `self`.
    ///
    /// Callers guarantee `width <= self.width()`.
    pub fn center_horizontally(&self, width: u32) -> Self {
        let left = self.left + (self.width() - width) / 2;
        trace!(left, width, "Centering crop horizontally");
        Self::new(left, self.top, left + width, self.bottom)
    }
}

impl From<&CropBox> for Rect {
    fn from(crop: &CropBox) -> Self {
        Rect::at(crop.left as i32, crop.top as i32).of_size(crop.width(), crop.height())
    }
}

/// One of the three vertical slices of the source width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Column {
    pub x: u32,
    pub width: u32,
}

impl Column {
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// The full-height strip `[x, x + width) x [0, height)` of this column.
    pub fn strip(&self, height: u32) -> CropBox {
        CropBox::new(self.x, 0, self.right(), height)
    }
}

/// Partition of `[0, width)` into three contiguous columns.
///
/// The first two columns are `width / 3` wide. The last column absorbs the
/// remainder, so it is `width - 2 * (width / 3)` wide and may be up to two
/// pixels wider than the others. No validation is done here: for
/// `width < 3` the first two columns have zero width.
///
/// # Example
/// ```
/// use trisplit::ColumnSplit;
///
/// let split = ColumnSplit::new(3001);
/// let widths: Vec<u32> = split.iter().map(|c| c.width).collect();
/// assert_eq!(widths, vec![1000, 1000, 1001]);
/// assert_eq!(split.remainder(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ColumnSplit {
    pub columns: [Column; PANEL_COUNT],
}

impl ColumnSplit {
    pub fn new(width: u32) -> Self {
        let base = width / PANEL_COUNT as u32;
        let last_width = width - base * (PANEL_COUNT as u32 - 1);
        let columns = [
            Column { x: 0, width: base },
            Column {
                x: base,
                width: base,
            },
            Column {
                x: base * 2,
                width: last_width,
            },
        ];
        trace!(width, base, last_width, "Split width into columns");
        Self { columns }
    }

    /// Width shared by the first two columns (`width / 3`).
    pub fn base_width(&self) -> u32 {
        self.columns[0].width
    }

    /// Pixels absorbed by the last column beyond `base_width`.
    pub fn remainder(&self) -> u32 {
        self.columns[PANEL_COUNT - 1].width - self.base_width()
    }

    /// Total width covered by the split.
    pub fn total_width(&self) -> u32 {
        self.columns[PANEL_COUNT - 1].right()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test_case(3000, [1000, 1000, 1000] ; "divisible width")]
    #[test_case(3001, [1000, 1000, 1001] ; "one pixel remainder")]
    #[test_case(3002, [1000, 1000, 1002] ; "two pixel remainder")]
    #[test_case(3, [1, 1, 1] ; "minimal width")]
    #[test_case(2, [0, 0, 2] ; "degenerate width")]
    fn test_column_widths(width: u32, expected: [u32; 3]) {
        let split = ColumnSplit::new(width);
        let widths: Vec<u32> = split.iter().map(|c| c.width).collect();
        assert_eq!(widths, expected.to_vec());
    }

    #[test]
    fn test_strip_spans_full_height() {
        let split = ColumnSplit::new(10);
        assert_eq!(split.columns[2].strip(7), CropBox::new(6, 0, 10, 7));
    }

    #[test]
    fn test_center_vertically_floors_margin() {
        let crop = CropBox::new(0, 0, 4, 11).center_vertically(4);
        // 7 pixels of margin: 3 above, 4 below
        assert_eq!(crop, CropBox::new(0, 3, 4, 7));
    }

    #[test]
    fn test_center_horizontally_is_relative_to_box() {
        let crop = CropBox::new(100, 5, 110, 15).center_horizontally(5);
        assert_eq!(crop, CropBox::new(102, 5, 107, 15));
    }

    #[test]
    fn test_rect_conversion() {
        let rect = Rect::from(&CropBox::new(3, 4, 13, 24));
        assert_eq!((rect.left(), rect.top()), (3, 4));
        assert_eq!((rect.width(), rect.height()), (10, 20));
    }

    #[test]
    fn test_empty_box() {
        assert!(CropBox::new(5, 0, 5, 10).is_empty());
        assert!(!CropBox::full(1, 1).is_empty());
    }

    proptest! {
        #[test]
        fn test_columns_tile_width(width in 0..20_000u32) {
            let split = ColumnSplit::new(width);

            // Contiguous, starting at zero, covering the whole width
            prop_assert_eq!(split.columns[0].x, 0);
            for pair in split.columns.windows(2) {
                prop_assert_eq!(pair[0].right(), pair[1].x);
            }
            prop_assert_eq!(split.total_width(), width);

            // First two columns are exactly width / 3
            prop_assert_eq!(split.columns[0].width, width / 3);
            prop_assert_eq!(split.columns[1].width, width / 3);
            prop_assert!(split.remainder() < 3);
        }

        #[test]
        fn test_centered_box_stays_inside(
            len in 1..5_000u32,
            inner in 1..5_000u32,
        ) {
            let inner = inner.min(len);
            let outer = CropBox::full(len, len);
            let v = outer.center_vertically(inner);
            let h = outer.center_horizontally(inner);
            prop_assert!(v.fits_within(len, len));
            prop_assert!(h.fits_within(len, len));
            prop_assert_eq!(v.height(), inner);
            prop_assert_eq!(h.width(), inner);
            // Leading margin never exceeds trailing margin
            prop_assert!(v.top <= len - v.bottom);
            prop_assert!(h.left <= len - h.right);
        }
    }
}
