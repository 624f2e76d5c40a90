// SPDX-License-Identifier: GPL-3.0-only

//! Pure geometry transforms for planar luma buffers
//!
//! Orientation correction transposes the buffer so that what was column
//! `x` becomes row `x`, swapping width and height. The companion
//! [`ScanRegion::transposed`] keeps the scan region bounding the same
//! semantic area after the buffer transform.

use crate::frame::ScanRegion;

/// Transpose a planar single-channel buffer by 90 degrees
///
/// Returns a new buffer of identical length where the pixel at source
/// position `(x, y)` lands at `(y, x)`; the result is `height` pixels wide
/// and `width` pixels tall. Applying the transform twice restores the
/// original buffer.
pub fn transpose_luma(data: &[u8], width: u32, height: u32) -> Vec<u8> {
    let w = width as usize;
    let h = height as usize;
    debug_assert_eq!(data.len(), w * h);

    let mut out = vec![0u8; data.len()];
    for y in 0..h {
        let row = y * w;
        for x in 0..w {
            out[x * h + y] = data[row + x];
        }
    }
    out
}

impl ScanRegion {
    /// The region bounding the same area after a buffer transpose
    ///
    /// Axes swap, so a region inside a `width x height` buffer always fits
    /// inside the transposed `height x width` buffer. Returns a new value;
    /// the original region is untouched.
    pub fn transposed(&self) -> ScanRegion {
        ScanRegion {
            left: self.top,
            top: self.left,
            width: self.height,
            height: self.width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transpose_preserves_length() {
        let data: Vec<u8> = (0..24).collect();
        let out = transpose_luma(&data, 6, 4);
        assert_eq!(out.len(), data.len());
    }

    #[test]
    fn test_transpose_remaps_columns_to_rows() {
        // 3x2 buffer:
        //   1 2 3
        //   4 5 6
        let data = vec![1, 2, 3, 4, 5, 6];
        let out = transpose_luma(&data, 3, 2);
        // Transposed 2x3:
        //   1 4
        //   2 5
        //   3 6
        assert_eq!(out, vec![1, 4, 2, 5, 3, 6]);
    }

    #[test]
    fn test_transpose_is_self_inverse() {
        let data: Vec<u8> = (0..35).map(|i| (i * 7) as u8).collect();
        let once = transpose_luma(&data, 7, 5);
        let twice = transpose_luma(&once, 5, 7);
        assert_eq!(twice, data);
    }

    #[test]
    fn test_transpose_single_row() {
        let data = vec![9, 8, 7];
        let out = transpose_luma(&data, 3, 1);
        assert_eq!(out, data); // A row becomes a column with identical layout
    }

    #[test]
    fn test_region_transpose_stays_in_bounds() {
        let (width, height) = (640u32, 480u32);
        let region = ScanRegion::new(100, 40, 400, 300);
        assert!(region.fits_within(width, height));

        let transposed = region.transposed();
        assert!(transposed.fits_within(height, width));
        assert_eq!(transposed, ScanRegion::new(40, 100, 300, 400));
    }

    #[test]
    fn test_region_transpose_is_self_inverse() {
        let region = ScanRegion::new(17, 3, 21, 9);
        assert_eq!(region.transposed().transposed(), region);
    }

    #[test]
    fn test_region_transpose_edge_hugging() {
        // Region touching the far corner must still touch it after transpose.
        let region = ScanRegion::new(540, 380, 100, 100);
        assert!(region.fits_within(640, 480));
        let transposed = region.transposed();
        assert!(transposed.fits_within(480, 640));
        assert_eq!(transposed.right(), 480);
        assert_eq!(transposed.bottom(), 640);
    }
}
