// SPDX-License-Identifier: GPL-3.0-only

//! Scan session facade and lifecycle state machine
//!
//! A [`ScanSession`] owns the decode worker and dispatch threads. Capture
//! feeds frames through [`ScanSession::feed_frame`], which never blocks;
//! [`ScanSession::release`] is the only blocking operation and joins both
//! threads before returning.

use crate::dispatcher::{DecodeListener, ResultDispatcher};
use crate::errors::{ScanError, ScanResult};
use crate::frame::{Frame, ScanRegion};
use crate::reader::Reader;
use crate::worker::{DecodeWorker, WorkerOptions};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::thread::JoinHandle;
use tracing::{debug, trace, warn};

/// Lifecycle state of a scan session
///
/// `Stopped -> Running -> {Paused <-> Running} -> Released`, with `Failed`
/// as the terminal state entered when the decode worker dies on an internal
/// fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Worker has acknowledged the quit command
    Stopped,
    /// Frames are accepted and forwarded to the worker
    Running,
    /// Frames are silently dropped until resume
    Paused,
    /// Session resources have been torn down (terminal)
    Released,
    /// The decode worker terminated on an internal fault (terminal)
    Failed,
}

const STATE_STOPPED: u8 = 0;
const STATE_RUNNING: u8 = 1;
const STATE_PAUSED: u8 = 2;
const STATE_RELEASED: u8 = 3;
const STATE_FAILED: u8 = 4;

fn decode_state(raw: u8) -> SessionState {
    match raw {
        STATE_RUNNING => SessionState::Running,
        STATE_PAUSED => SessionState::Paused,
        STATE_RELEASED => SessionState::Released,
        STATE_FAILED => SessionState::Failed,
        _ => SessionState::Stopped,
    }
}

/// Shared lifecycle cell
///
/// The only state crossing the session/worker boundary. The session owns
/// the pause/resume/release transitions; the worker writes it only to
/// auto-pause after a success, to acknowledge quit, and to record a fatal
/// fault.
#[derive(Clone)]
pub(crate) struct SharedState(Arc<AtomicU8>);

impl SharedState {
    fn new(initial: SessionState) -> Self {
        Self(Arc::new(AtomicU8::new(encode(initial))))
    }

    pub(crate) fn get(&self) -> SessionState {
        decode_state(self.0.load(Ordering::Acquire))
    }

    /// Running -> Paused; no effect in any other state
    pub(crate) fn pause(&self) -> bool {
        self.0
            .compare_exchange(
                STATE_RUNNING,
                STATE_PAUSED,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// Paused -> Running; no effect in any other state
    fn resume(&self) -> bool {
        self.0
            .compare_exchange(
                STATE_PAUSED,
                STATE_RUNNING,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// Quit acknowledgement from the worker; terminal states stay terminal
    pub(crate) fn mark_stopped(&self) {
        let _ = self
            .0
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |raw| match raw {
                STATE_RELEASED | STATE_FAILED => None,
                _ => Some(STATE_STOPPED),
            });
    }

    /// Worker-fatal fault; sticks unless the session was already released
    pub(crate) fn fail(&self) {
        let _ = self
            .0
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |raw| match raw {
                STATE_RELEASED => None,
                _ => Some(STATE_FAILED),
            });
    }

    fn release(&self) {
        self.0.store(STATE_RELEASED, Ordering::Release);
    }
}

fn encode(state: SessionState) -> u8 {
    match state {
        SessionState::Stopped => STATE_STOPPED,
        SessionState::Running => STATE_RUNNING,
        SessionState::Paused => STATE_PAUSED,
        SessionState::Released => STATE_RELEASED,
        SessionState::Failed => STATE_FAILED,
    }
}

/// Session configuration captured at start
///
/// Mode flags are immutable for the lifetime of the session; they are
/// handed to the worker at construction so no flag is ever read across
/// threads mid-decode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Capture buffer width in pixels
    pub width: u32,
    /// Capture buffer height in pixels
    pub height: u32,
    /// Sub-rectangle searched for a symbol, in capture-buffer coordinates
    pub scan_region: ScanRegion,
    /// Apply the 90° orientation correction before every decode
    pub rotation_before_decode: bool,
    /// Keep accepting frames after a success instead of auto-pausing
    pub continuous_scan: bool,
    /// Attach an encoded JPEG preview to success outcomes
    pub return_thumbnail: bool,
    /// Emit per-frame phase timing diagnostics
    pub debug: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            scan_region: ScanRegion::new(0, 0, 640, 480),
            rotation_before_decode: false,
            continuous_scan: false,
            return_thumbnail: true,
            debug: false,
        }
    }
}

impl SessionConfig {
    fn validate(&self) -> ScanResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ScanError::Config(format!(
                "capture size {}x{} is empty",
                self.width, self.height
            )));
        }
        if self.scan_region.width == 0 || self.scan_region.height == 0 {
            return Err(ScanError::Config(format!(
                "scan region {} is empty",
                self.scan_region
            )));
        }
        if !self.scan_region.fits_within(self.width, self.height) {
            return Err(ScanError::Config(format!(
                "scan region {} exceeds {}x{} capture buffer",
                self.scan_region, self.width, self.height
            )));
        }
        Ok(())
    }
}

/// The orchestrating facade over the decode pipeline
pub struct ScanSession {
    state: SharedState,
    worker: Option<DecodeWorker>,
    dispatch_handle: Option<JoinHandle<()>>,
    config: SessionConfig,
}

impl ScanSession {
    /// Validate the configuration, spawn the worker and dispatch threads,
    /// and transition to `Running`
    pub fn start(
        config: SessionConfig,
        reader: Box<dyn Reader>,
        listener: Box<dyn DecodeListener>,
    ) -> ScanResult<Self> {
        config.validate()?;

        let state = SharedState::new(SessionState::Running);
        let (dispatcher, dispatch_handle) = ResultDispatcher::spawn(listener);
        let options = WorkerOptions {
            scan_region: config.scan_region,
            rotation_before_decode: config.rotation_before_decode,
            continuous_scan: config.continuous_scan,
            return_thumbnail: config.return_thumbnail,
            debug: config.debug,
        };
        let worker = DecodeWorker::spawn(reader, dispatcher, options, state.clone());

        debug!(
            width = config.width,
            height = config.height,
            region = %config.scan_region,
            continuous = config.continuous_scan,
            "Scan session started"
        );

        Ok(Self {
            state,
            worker: Some(worker),
            dispatch_handle: Some(dispatch_handle),
            config,
        })
    }

    /// Current lifecycle state
    ///
    /// Owners should poll for [`SessionState::Failed`] to detect worker
    /// death instead of waiting on outcomes that will never arrive.
    pub fn state(&self) -> SessionState {
        self.state.get()
    }

    /// Whether frames fed right now would reach the worker
    pub fn is_running(&self) -> bool {
        self.state.get() == SessionState::Running
    }

    /// The configuration this session was started with
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Forward one captured frame to the worker
    ///
    /// Fire-and-forget: never blocks. Outside the `Running` state the frame
    /// is silently dropped; frames are transient and dropping beats
    /// queueing unbounded capture data.
    pub fn feed_frame(&self, frame: Frame) {
        if self.state.get() != SessionState::Running {
            trace!("Frame dropped, session not running");
            return;
        }
        if let Some(worker) = &self.worker {
            worker.submit(frame);
        }
    }

    /// Stop accepting frames; the worker keeps running
    pub fn pause(&self) {
        if self.state.pause() {
            debug!("Scan session paused");
        }
    }

    /// Accept frames again after a pause
    pub fn resume(&self) {
        if self.state.resume() {
            debug!("Scan session resumed");
        }
    }

    /// Tear down the session, blocking until the worker has terminated
    ///
    /// Drains the worker mailbox up to the quit command, joins the worker
    /// and the dispatch thread, then transitions to `Released`. Safe to
    /// call more than once; subsequent calls are no-ops.
    pub fn release(&mut self) {
        let Some(mut worker) = self.worker.take() else {
            return;
        };

        self.state.pause();
        worker.request_stop();
        if worker.join() {
            warn!("Decode worker panicked during release");
        }
        // The worker thread owned the last dispatcher handle, so with it
        // gone the dispatch thread drains and exits.
        if let Some(handle) = self.dispatch_handle.take()
            && handle.join().is_err()
        {
            warn!("Outcome dispatch thread panicked");
        }

        self.state.release();
        debug!("Scan session released");
    }
}

impl Drop for ScanSession {
    fn drop(&mut self) {
        if self.worker.is_some() {
            debug!("Scan session dropped while active, releasing");
            self.release();
        }
    }
}
