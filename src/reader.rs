// SPDX-License-Identifier: GPL-3.0-only

//! Reader capability boundary
//!
//! The decoding engine is an external collaborator: the worker only knows
//! the [`Reader`] trait. A bundled [`RqrrReader`] adapter covers the QR
//! family via the `rqrr` crate; other symbologies come from user-supplied
//! implementations.

use crate::errors::ReaderError;
use crate::frame::BarcodeFormat;
use crate::luminance::LuminanceView;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// A possible symbol location reported during a decode attempt
///
/// Coordinates are pixels in the buffer as decoded, not region-relative.
/// When orientation correction transposed the frame, points are in the
/// transposed coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResultPoint {
    pub x: f32,
    pub y: f32,
}

/// Observer notified of candidate result points for live visual feedback
///
/// Notifications are forwarded unchanged from the Reader while a decode
/// attempt is in progress; they are not buffered or persisted.
pub trait ResultPointObserver: Send + Sync {
    fn result_point_found(&self, point: ResultPoint);
}

/// Successful decode payload produced by a Reader
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    /// Decoded text content
    pub text: String,
    /// Symbology the symbol was decoded from
    pub format: BarcodeFormat,
}

/// External decoding engine abstraction
///
/// Implementations may keep internal per-attempt state; the worker calls
/// [`Reader::reset`] after every attempt, success or failure, so no state
/// leaks across frames. A Reader instance is exclusively owned by one
/// worker and never shared.
pub trait Reader: Send {
    /// Attempt to decode a symbol from the viewed region
    fn decode_with_state(&mut self, view: &LuminanceView) -> Result<Decoded, ReaderError>;

    /// Clear internal state accumulated during the last attempt
    fn reset(&mut self);
}

/// Configuration knobs recognized by Readers
///
/// A closed set rather than an open hints map; defaults are filled once at
/// construction via [`ReaderOptions::default`].
#[derive(Clone)]
pub struct ReaderOptions {
    /// Symbologies the Reader should look for
    pub possible_formats: HashSet<BarcodeFormat>,
    /// Character set used when interpreting symbol payloads
    pub character_set: String,
    /// Optional observer for candidate result points
    pub result_point_observer: Option<Arc<dyn ResultPointObserver>>,
}

impl ReaderOptions {
    /// Restrict the recognized symbologies
    pub fn with_formats(mut self, formats: impl IntoIterator<Item = BarcodeFormat>) -> Self {
        self.possible_formats = formats.into_iter().collect();
        self
    }

    /// Attach a result-point observer
    pub fn with_observer(mut self, observer: Arc<dyn ResultPointObserver>) -> Self {
        self.result_point_observer = Some(observer);
        self
    }
}

impl Default for ReaderOptions {
    /// All 1D, QR and DataMatrix families, UTF-8, no observer
    fn default() -> Self {
        let mut possible_formats = HashSet::new();
        possible_formats.extend(BarcodeFormat::one_d_family());
        possible_formats.extend(BarcodeFormat::qr_family());
        possible_formats.extend(BarcodeFormat::data_matrix_family());
        Self {
            possible_formats,
            character_set: "UTF-8".to_string(),
            result_point_observer: None,
        }
    }
}

impl std::fmt::Debug for ReaderOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReaderOptions")
            .field("possible_formats", &self.possible_formats)
            .field("character_set", &self.character_set)
            .field(
                "result_point_observer",
                &self.result_point_observer.is_some(),
            )
            .finish()
    }
}

/// QR reader backed by the `rqrr` crate
///
/// Covers only the QR family; when the configured formats exclude QR every
/// attempt reports no-symbol-found. Finder pattern corners are forwarded to
/// the result-point observer before each grid is decoded.
pub struct RqrrReader {
    options: ReaderOptions,
}

impl RqrrReader {
    pub fn new(options: ReaderOptions) -> Self {
        Self { options }
    }
}

impl Reader for RqrrReader {
    fn decode_with_state(&mut self, view: &LuminanceView) -> Result<Decoded, ReaderError> {
        if !self.options.possible_formats.contains(&BarcodeFormat::QrCode) {
            return Err(ReaderError::NotFound);
        }

        let width = view.width() as usize;
        let height = view.height() as usize;
        let matrix = view.to_matrix();
        let mut prepared =
            rqrr::PreparedImage::prepare_from_greyscale(width, height, |x, y| matrix[y * width + x]);
        let region = view.region();

        for grid in prepared.detect_grids() {
            if let Some(observer) = &self.options.result_point_observer {
                for corner in &grid.bounds {
                    observer.result_point_found(ResultPoint {
                        x: region.left as f32 + corner.x as f32,
                        y: region.top as f32 + corner.y as f32,
                    });
                }
            }

            match grid.decode() {
                Ok((_meta, text)) => {
                    return Ok(Decoded {
                        text,
                        format: BarcodeFormat::QrCode,
                    });
                }
                Err(e) => {
                    // A located grid that fails to decode is still a miss,
                    // not a Reader fault.
                    debug!(error = %e, "Detected grid failed to decode");
                }
            }
        }

        Err(ReaderError::NotFound)
    }

    fn reset(&mut self) {
        // rqrr keeps no state across prepare/decode cycles.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::ScanRegion;

    fn blank_view(width: u32, height: u32) -> LuminanceView {
        let data = vec![255u8; (width * height) as usize];
        LuminanceView::new(data.into(), width, height, ScanRegion::new(0, 0, width, height))
            .unwrap()
    }

    #[test]
    fn test_default_options_cover_all_families() {
        let options = ReaderOptions::default();
        assert!(options.possible_formats.contains(&BarcodeFormat::QrCode));
        assert!(options.possible_formats.contains(&BarcodeFormat::Ean13));
        assert!(options.possible_formats.contains(&BarcodeFormat::DataMatrix));
        assert_eq!(options.character_set, "UTF-8");
        assert!(options.result_point_observer.is_none());
    }

    #[test]
    fn test_with_formats_replaces_default_set() {
        let options = ReaderOptions::default().with_formats([BarcodeFormat::QrCode]);
        assert_eq!(options.possible_formats.len(), 1);
        assert!(options.possible_formats.contains(&BarcodeFormat::QrCode));
    }

    #[test]
    fn test_with_observer_attaches_callback() {
        struct NullObserver;
        impl ResultPointObserver for NullObserver {
            fn result_point_found(&self, _point: ResultPoint) {}
        }

        let options = ReaderOptions::default().with_observer(Arc::new(NullObserver));
        assert!(options.result_point_observer.is_some());
    }

    #[test]
    fn test_blank_frame_reports_not_found() {
        let mut reader = RqrrReader::new(ReaderOptions::default());
        let result = reader.decode_with_state(&blank_view(64, 64));
        assert_eq!(result, Err(ReaderError::NotFound));
        reader.reset();
    }

    #[test]
    fn test_excluded_qr_format_short_circuits() {
        let options = ReaderOptions::default().with_formats([BarcodeFormat::Ean13]);
        let mut reader = RqrrReader::new(options);
        let result = reader.decode_with_state(&blank_view(16, 16));
        assert_eq!(result, Err(ReaderError::NotFound));
    }
}
