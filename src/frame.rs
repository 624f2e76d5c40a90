// SPDX-License-Identifier: GPL-3.0-only

//! Core data types shared across the decode pipeline

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Capture orientation of a frame at the time it was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    /// Buffer rows run along the long edge of the device
    #[default]
    Landscape,
    /// Buffer was captured with the device held upright
    Portrait,
}

impl Orientation {
    /// Check if a frame in this orientation needs a 90° correction
    pub fn is_portrait(&self) -> bool {
        matches!(self, Orientation::Portrait)
    }
}

/// One captured raw luma frame
///
/// `data` is a planar single-channel luminance buffer, one byte per pixel,
/// `width * height` bytes long. Frames are immutable once constructed; the
/// `Arc` lets capture hand a frame to the worker without copying pixels.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Planar luminance bytes, row-major
    pub data: Arc<[u8]>,
    /// Source resolution width in pixels
    pub width: u32,
    /// Source resolution height in pixels
    pub height: u32,
    /// Orientation at capture time
    pub orientation: Orientation,
}

impl Frame {
    /// Create a frame from a luma buffer and its dimensions
    pub fn new(data: impl Into<Arc<[u8]>>, width: u32, height: u32, orientation: Orientation) -> Self {
        Self {
            data: data.into(),
            width,
            height,
            orientation,
        }
    }
}

/// The sub-rectangle of a frame actually searched for a symbol
///
/// Expressed in capture-buffer coordinates. Values are never mutated in
/// place; orientation correction produces a new region via
/// [`ScanRegion::transposed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRegion {
    /// Left edge in pixels
    pub left: u32,
    /// Top edge in pixels
    pub top: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl ScanRegion {
    /// Create a region from its left/top corner and size
    pub fn new(left: u32, top: u32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Exclusive right edge
    pub fn right(&self) -> u32 {
        self.left + self.width
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> u32 {
        self.top + self.height
    }

    /// Check that the region lies fully within a buffer of the given size
    pub fn fits_within(&self, frame_width: u32, frame_height: u32) -> bool {
        self.right() <= frame_width && self.bottom() <= frame_height
    }
}

impl std::fmt::Display for ScanRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}x{}+{}+{}",
            self.width, self.height, self.left, self.top
        )
    }
}

/// Recognized barcode symbologies
///
/// Closed set covering the 1D product/industrial families plus the QR and
/// DataMatrix 2D families. The default Reader option set is the union of
/// all three families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BarcodeFormat {
    UpcA,
    UpcE,
    Ean8,
    Ean13,
    Code39,
    Code93,
    Code128,
    Itf,
    Codabar,
    Rss14,
    RssExpanded,
    QrCode,
    DataMatrix,
}

impl BarcodeFormat {
    /// The 1D product and industrial formats
    pub fn one_d_family() -> &'static [BarcodeFormat] {
        &[
            BarcodeFormat::UpcA,
            BarcodeFormat::UpcE,
            BarcodeFormat::Ean8,
            BarcodeFormat::Ean13,
            BarcodeFormat::Code39,
            BarcodeFormat::Code93,
            BarcodeFormat::Code128,
            BarcodeFormat::Itf,
            BarcodeFormat::Codabar,
            BarcodeFormat::Rss14,
            BarcodeFormat::RssExpanded,
        ]
    }

    /// The QR code family
    pub fn qr_family() -> &'static [BarcodeFormat] {
        &[BarcodeFormat::QrCode]
    }

    /// The DataMatrix family
    pub fn data_matrix_family() -> &'static [BarcodeFormat] {
        &[BarcodeFormat::DataMatrix]
    }
}

impl std::fmt::Display for BarcodeFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BarcodeFormat::UpcA => "UPC-A",
            BarcodeFormat::UpcE => "UPC-E",
            BarcodeFormat::Ean8 => "EAN-8",
            BarcodeFormat::Ean13 => "EAN-13",
            BarcodeFormat::Code39 => "Code 39",
            BarcodeFormat::Code93 => "Code 93",
            BarcodeFormat::Code128 => "Code 128",
            BarcodeFormat::Itf => "ITF",
            BarcodeFormat::Codabar => "Codabar",
            BarcodeFormat::Rss14 => "RSS-14",
            BarcodeFormat::RssExpanded => "RSS Expanded",
            BarcodeFormat::QrCode => "QR Code",
            BarcodeFormat::DataMatrix => "DataMatrix",
        };
        write!(f, "{}", name)
    }
}

/// Terminal result of one decode attempt
///
/// Produced exactly once per processed frame and delivered to the consumer
/// in submission order. Failures carry no payload; retrying is up to the
/// capture side, which simply keeps feeding frames.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeOutcome {
    /// A symbol was decoded
    Success {
        /// Decoded text content
        text: String,
        /// Symbology the text was decoded from
        format: BarcodeFormat,
        /// Encoded JPEG preview, present only when thumbnail return is enabled
        thumbnail: Option<Vec<u8>>,
        /// Thumbnail width / decoded region width, in (0, 1]; absent without a thumbnail
        scale_factor: Option<f32>,
    },
    /// No symbol was found in the frame
    Failure,
}

/// Per-frame phase durations collected for diagnostics
///
/// Logged when debug mode is enabled, then discarded.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhaseTimings {
    /// Orientation-correction duration, absent when no rotation was applied
    pub rotate: Option<Duration>,
    /// Reader decode duration, including the mandatory reset
    pub decode: Duration,
    /// Thumbnail render+encode duration, absent when disabled or on failure
    pub thumbnail: Option<Duration>,
}

impl PhaseTimings {
    /// Total elapsed time across all recorded phases
    pub fn total(&self) -> Duration {
        self.rotate.unwrap_or_default() + self.decode + self.thumbnail.unwrap_or_default()
    }
}
