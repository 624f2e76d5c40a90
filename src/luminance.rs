// SPDX-License-Identifier: GPL-3.0-only

//! Bounds-checked crop views over planar luma buffers
//!
//! A [`LuminanceView`] restricts a frame buffer to its scan region and is
//! what the Reader capability sees during a decode attempt. It also renders
//! the downscaled grayscale pixels used for the preview thumbnail.

use crate::errors::WorkerFault;
use crate::frame::ScanRegion;
use std::sync::Arc;

/// Subsampling step used when rendering preview thumbnails
const THUMBNAIL_SCALE: u32 = 2;

/// Read-only luminance view restricted to a scan region
pub struct LuminanceView {
    data: Arc<[u8]>,
    frame_width: u32,
    frame_height: u32,
    region: ScanRegion,
}

impl LuminanceView {
    /// Create a view over `region` within a `frame_width x frame_height` buffer
    ///
    /// Fails when the buffer length does not match the stated dimensions or
    /// the region reaches outside the buffer. Both indicate a broken capture
    /// collaborator or geometry bug, so the caller treats this as fatal.
    pub fn new(
        data: Arc<[u8]>,
        frame_width: u32,
        frame_height: u32,
        region: ScanRegion,
    ) -> Result<Self, WorkerFault> {
        let expected = frame_width as usize * frame_height as usize;
        if data.len() != expected {
            return Err(WorkerFault::InvalidRegion(format!(
                "buffer is {} bytes, expected {} for {}x{}",
                data.len(),
                expected,
                frame_width,
                frame_height
            )));
        }
        if region.width == 0 || region.height == 0 {
            return Err(WorkerFault::InvalidRegion(format!(
                "scan region {} is empty",
                region
            )));
        }
        if !region.fits_within(frame_width, frame_height) {
            return Err(WorkerFault::InvalidRegion(format!(
                "scan region {} exceeds {}x{} frame",
                region, frame_width, frame_height
            )));
        }
        Ok(Self {
            data,
            frame_width,
            frame_height,
            region,
        })
    }

    /// Width of the viewed region in pixels
    pub fn width(&self) -> u32 {
        self.region.width
    }

    /// Height of the viewed region in pixels
    pub fn height(&self) -> u32 {
        self.region.height
    }

    /// Width of the underlying frame buffer
    pub fn frame_width(&self) -> u32 {
        self.frame_width
    }

    /// Height of the underlying frame buffer
    pub fn frame_height(&self) -> u32 {
        self.frame_height
    }

    /// The region this view is restricted to
    pub fn region(&self) -> ScanRegion {
        self.region
    }

    /// One row of region pixels, `y` relative to the region top
    pub fn row(&self, y: u32) -> &[u8] {
        debug_assert!(y < self.region.height);
        let start = ((self.region.top + y) * self.frame_width + self.region.left) as usize;
        &self.data[start..start + self.region.width as usize]
    }

    /// Copy the region into a tightly packed `width * height` buffer
    pub fn to_matrix(&self) -> Vec<u8> {
        let mut matrix = Vec::with_capacity(self.region.width as usize * self.region.height as usize);
        for y in 0..self.region.height {
            matrix.extend_from_slice(self.row(y));
        }
        matrix
    }

    /// Render downscaled grayscale thumbnail pixels of the region
    ///
    /// Subsamples every [`THUMBNAIL_SCALE`]-th pixel; returns the pixels and
    /// their dimensions. Never produces a zero-sized image.
    pub fn render_thumbnail(&self) -> (Vec<u8>, u32, u32) {
        let width = (self.region.width / THUMBNAIL_SCALE).max(1);
        let height = (self.region.height / THUMBNAIL_SCALE).max(1);

        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            let src_row =
                ((self.region.top + y * THUMBNAIL_SCALE) * self.frame_width + self.region.left) as usize;
            for x in 0..width {
                pixels.push(self.data[src_row + (x * THUMBNAIL_SCALE) as usize]);
            }
        }
        (pixels, width, height)
    }
}
