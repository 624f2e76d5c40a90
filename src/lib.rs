// SPDX-License-Identifier: GPL-3.0-only

//! Asynchronous barcode decode pipeline for live camera frame streams
//!
//! A [`ScanSession`] owns a dedicated decode worker that consumes raw
//! planar luma frames, applies orientation correction, hands the scan
//! region to a pluggable [`Reader`], times each phase, optionally renders a
//! JPEG preview thumbnail, and delivers exactly one [`DecodeOutcome`] per
//! processed frame to the consumer's [`DecodeListener`], all without
//! blocking frame capture.
//!
//! # Architecture
//!
//! - [`session`]: lifecycle facade and state machine
//! - `worker` (private): the serialized decode actor
//! - [`dispatcher`]: asynchronous outcome delivery to the consumer
//! - [`reader`]: the external decoding engine boundary
//! - [`luminance`] / [`geometry`] / [`thumbnail`]: pixel-level helpers
//!
//! # Example
//!
//! ```no_run
//! use barscan::{
//!     Frame, Orientation, ReaderOptions, RqrrReader, ScanSession, SessionConfig,
//! };
//!
//! struct PrintListener;
//!
//! impl barscan::DecodeListener for PrintListener {
//!     fn on_success(
//!         &mut self,
//!         text: String,
//!         format: barscan::BarcodeFormat,
//!         _thumbnail: Option<Vec<u8>>,
//!         _scale_factor: Option<f32>,
//!     ) {
//!         println!("{}: {}", format, text);
//!     }
//!
//!     fn on_failure(&mut self) {}
//! }
//!
//! let reader = RqrrReader::new(ReaderOptions::default());
//! let mut session = ScanSession::start(
//!     SessionConfig::default(),
//!     Box::new(reader),
//!     Box::new(PrintListener),
//! )
//! .expect("valid config");
//!
//! // Capture collaborator feeds luma frames:
//! let luma = vec![0u8; 640 * 480];
//! session.feed_frame(Frame::new(luma, 640, 480, Orientation::Landscape));
//!
//! session.release();
//! ```

pub mod chronograph;
pub mod dispatcher;
pub mod errors;
pub mod frame;
pub mod geometry;
pub mod luminance;
pub mod reader;
pub mod session;
pub mod thumbnail;
mod worker;

// Re-export the public API surface
pub use chronograph::Chronograph;
pub use dispatcher::DecodeListener;
pub use errors::{ReaderError, ScanError, ScanResult, WorkerFault};
pub use frame::{BarcodeFormat, DecodeOutcome, Frame, Orientation, PhaseTimings, ScanRegion};
pub use luminance::LuminanceView;
pub use reader::{Decoded, Reader, ReaderOptions, ResultPoint, ResultPointObserver, RqrrReader};
pub use session::{ScanSession, SessionConfig, SessionState};
pub use thumbnail::Thumbnail;
