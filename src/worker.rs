// SPDX-License-Identifier: GPL-3.0-only

//! The serialized decode worker
//!
//! A dedicated thread consuming an ordered mailbox of [`WorkerCommand`]s.
//! At most one decode executes at any instant; a quit command terminates
//! the loop after any decodes queued ahead of it, and nothing is processed
//! after it. The worker exclusively owns the Reader instance.

use crate::chronograph::Chronograph;
use crate::dispatcher::ResultDispatcher;
use crate::errors::{ReaderError, WorkerFault};
use crate::frame::{Frame, PhaseTimings, ScanRegion};
use crate::geometry::transpose_luma;
use crate::luminance::LuminanceView;
use crate::reader::Reader;
use crate::session::SharedState;
use crate::thumbnail;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use tracing::{debug, error, trace};

/// Commands accepted by the worker mailbox, processed strictly in order
pub(crate) enum WorkerCommand {
    /// Decode one frame and dispatch exactly one outcome
    Decode(Frame),
    /// Acknowledge stop and terminate the loop
    Quit,
}

/// Immutable per-session decode options captured at start
///
/// Passing these in at construction keeps every mode decision off the
/// cross-thread path; the worker never reads a mutable session flag.
#[derive(Debug, Clone)]
pub(crate) struct WorkerOptions {
    pub(crate) scan_region: ScanRegion,
    pub(crate) rotation_before_decode: bool,
    pub(crate) continuous_scan: bool,
    pub(crate) return_thumbnail: bool,
    pub(crate) debug: bool,
}

/// Handle to the decode worker thread
pub(crate) struct DecodeWorker {
    sender: Sender<WorkerCommand>,
    handle: Option<JoinHandle<()>>,
}

impl DecodeWorker {
    /// Spawn the worker thread with its mailbox
    pub(crate) fn spawn(
        reader: Box<dyn Reader>,
        dispatcher: ResultDispatcher,
        options: WorkerOptions,
        state: SharedState,
    ) -> Self {
        let (sender, receiver) = mpsc::channel();

        let handle = thread::spawn(move || {
            let mut decode_loop = DecodeLoop {
                reader,
                dispatcher,
                options,
                state,
                chronograph: Chronograph::new(),
            };
            decode_loop.run(receiver);
        });

        Self {
            sender,
            handle: Some(handle),
        }
    }

    /// Enqueue a frame for decoding
    ///
    /// The worker trusts every command it receives; running-state filtering
    /// happens at the session boundary before this call.
    pub(crate) fn submit(&self, frame: Frame) {
        if self.sender.send(WorkerCommand::Decode(frame)).is_err() {
            trace!("Frame dropped, decode worker has terminated");
        }
    }

    /// Enqueue a quit command; harmless once the worker has terminated
    pub(crate) fn request_stop(&self) {
        let _ = self.sender.send(WorkerCommand::Quit);
    }

    /// Wait for the worker thread to finish; returns true if it panicked
    pub(crate) fn join(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => handle.join().is_err(),
            None => false,
        }
    }
}

/// State owned by the worker thread
struct DecodeLoop {
    reader: Box<dyn Reader>,
    dispatcher: ResultDispatcher,
    options: WorkerOptions,
    state: SharedState,
    chronograph: Chronograph,
}

impl DecodeLoop {
    fn run(&mut self, mailbox: Receiver<WorkerCommand>) {
        debug!("Decode worker started");
        while let Ok(command) = mailbox.recv() {
            match command {
                WorkerCommand::Decode(frame) => {
                    if let Err(fault) = self.process(frame) {
                        // Losing the loop silently would hang the pipeline;
                        // record the terminal state before exiting.
                        error!(error = %fault, "Decode worker fault, terminating");
                        self.state.fail();
                        return;
                    }
                }
                WorkerCommand::Quit => {
                    self.state.mark_stopped();
                    break;
                }
            }
        }
        debug!("Decode worker exiting");
    }

    /// Run the full decode-and-report sequence for one frame
    ///
    /// Reader failures of any kind become a `Failure` outcome; only faults
    /// outside the decode boundary propagate and kill the worker.
    fn process(&mut self, frame: Frame) -> Result<(), WorkerFault> {
        self.chronograph.mark();

        // Checked before the rotation branch: the transpose indexes the
        // buffer by the stated dimensions and must never see a mismatch.
        let expected = frame.width as usize * frame.height as usize;
        if frame.data.len() != expected {
            return Err(WorkerFault::InvalidRegion(format!(
                "frame buffer is {} bytes, expected {} for {}x{}",
                frame.data.len(),
                expected,
                frame.width,
                frame.height
            )));
        }

        let mut data = frame.data;
        let mut width = frame.width;
        let mut height = frame.height;
        let mut region = self.options.scan_region;
        let mut timings = PhaseTimings::default();

        if self.options.rotation_before_decode || frame.orientation.is_portrait() {
            data = transpose_luma(&data, width, height).into();
            std::mem::swap(&mut width, &mut height);
            region = region.transposed();
            timings.rotate = Some(self.chronograph.mark());
        }

        let view = LuminanceView::new(data, width, height, region)?;

        let decoded = self.reader.decode_with_state(&view);
        // Reset unconditionally so no attempt state leaks into the next frame.
        self.reader.reset();
        timings.decode = self.chronograph.mark();

        match decoded {
            Ok(decoded) => {
                let rendered = if self.options.return_thumbnail {
                    let rendered = thumbnail::render(&view)?;
                    timings.thumbnail = Some(self.chronograph.mark());
                    Some(rendered)
                } else {
                    None
                };

                if self.options.debug {
                    debug!(
                        total_ms = timings.total().as_millis() as u64,
                        rotate_ms = timings.rotate.map(|d| d.as_millis() as u64),
                        decode_ms = timings.decode.as_millis() as u64,
                        thumbnail_ms = timings.thumbnail.map(|d| d.as_millis() as u64),
                        text = %decoded.text,
                        format = %decoded.format,
                        "Decode succeeded"
                    );
                }

                let (thumbnail_bytes, scale_factor) = match rendered {
                    Some(t) => (Some(t.bytes), Some(t.scale_factor)),
                    None => (None, None),
                };
                self.dispatcher
                    .success(decoded.text, decoded.format, thumbnail_bytes, scale_factor);

                if !self.options.continuous_scan {
                    self.state.pause();
                }
            }
            Err(failure) => {
                if let ReaderError::Internal(msg) = &failure {
                    // Externally identical to no-symbol-found; keep the
                    // message visible for diagnostics.
                    debug!(error = %msg, "Reader fault absorbed as decode failure");
                }
                if self.options.debug {
                    debug!(
                        total_ms = timings.total().as_millis() as u64,
                        rotate_ms = timings.rotate.map(|d| d.as_millis() as u64),
                        decode_ms = timings.decode.as_millis() as u64,
                        "Decode failed"
                    );
                }
                self.dispatcher.failure();
            }
        }

        Ok(())
    }
}
