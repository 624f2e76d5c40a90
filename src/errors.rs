// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the decode pipeline

use std::fmt;

/// Result type alias for session-level operations
pub type ScanResult<T> = Result<T, ScanError>;

/// Errors surfaced at the session boundary
#[derive(Debug, Clone)]
pub enum ScanError {
    /// Session configuration rejected at start
    Config(String),
}

/// Failure signals from a Reader during a single decode attempt
///
/// Both variants are absorbed by the worker and reported to the consumer
/// as a plain `Failure` outcome; they never terminate the decode loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReaderError {
    /// No decodable symbol in the frame (expected, frequent)
    NotFound,
    /// Internal fault inside the decoding engine
    Internal(String),
}

/// Faults that terminate the decode worker
///
/// Unlike [`ReaderError`], these are never converted into outcomes. The
/// worker exits and the session transitions to its terminal failed state.
#[derive(Debug, Clone)]
pub enum WorkerFault {
    /// Frame geometry and scan region are inconsistent
    InvalidRegion(String),
    /// Thumbnail rendering or encoding failed
    Thumbnail(String),
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl fmt::Display for ReaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReaderError::NotFound => write!(f, "No symbol found"),
            ReaderError::Internal(msg) => write!(f, "Reader fault: {}", msg),
        }
    }
}

impl fmt::Display for WorkerFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerFault::InvalidRegion(msg) => write!(f, "Invalid scan geometry: {}", msg),
            WorkerFault::Thumbnail(msg) => write!(f, "Thumbnail encoding failed: {}", msg),
        }
    }
}

impl std::error::Error for ScanError {}
impl std::error::Error for ReaderError {}
impl std::error::Error for WorkerFault {}
