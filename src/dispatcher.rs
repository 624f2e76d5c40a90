// SPDX-License-Identifier: GPL-3.0-only

//! Asynchronous delivery of decode outcomes to the consumer
//!
//! The worker pushes outcomes onto a FIFO channel; a dedicated delivery
//! thread drains it and invokes the consumer's [`DecodeListener`]. The
//! worker therefore never blocks on consumer-side handling, and outcomes
//! arrive in the exact order frames were submitted.

use crate::frame::{BarcodeFormat, DecodeOutcome};
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

/// Consumer callback for decode outcomes
///
/// Invoked on the dispatcher's delivery thread, one outcome at a time, in
/// submission order.
pub trait DecodeListener: Send {
    /// A symbol was decoded
    fn on_success(
        &mut self,
        text: String,
        format: BarcodeFormat,
        thumbnail: Option<Vec<u8>>,
        scale_factor: Option<f32>,
    );

    /// No symbol was found in the frame
    fn on_failure(&mut self);
}

/// Queues outcomes for delivery on the consumer's execution context
#[derive(Clone)]
pub(crate) struct ResultDispatcher {
    sender: Sender<DecodeOutcome>,
}

impl ResultDispatcher {
    /// Spawn the delivery thread draining outcomes into `listener`
    ///
    /// The thread exits once every dispatcher handle has been dropped and
    /// the queue is drained; the returned handle is joined by the session
    /// during release.
    pub(crate) fn spawn(mut listener: Box<dyn DecodeListener>) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel();

        let handle = thread::spawn(move || {
            debug!("Outcome dispatch thread started");
            while let Ok(outcome) = receiver.recv() {
                match outcome {
                    DecodeOutcome::Success {
                        text,
                        format,
                        thumbnail,
                        scale_factor,
                    } => listener.on_success(text, format, thumbnail, scale_factor),
                    DecodeOutcome::Failure => listener.on_failure(),
                }
            }
            debug!("Outcome dispatch thread exiting");
        });

        (Self { sender }, handle)
    }

    /// Queue a success outcome
    pub(crate) fn success(
        &self,
        text: String,
        format: BarcodeFormat,
        thumbnail: Option<Vec<u8>>,
        scale_factor: Option<f32>,
    ) {
        self.send(DecodeOutcome::Success {
            text,
            format,
            thumbnail,
            scale_factor,
        });
    }

    /// Queue a failure outcome
    pub(crate) fn failure(&self) {
        self.send(DecodeOutcome::Failure);
    }

    fn send(&self, outcome: DecodeOutcome) {
        if self.sender.send(outcome).is_err() {
            warn!("Decode outcome dropped, dispatch thread is gone");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::Receiver;

    struct ForwardingListener {
        sink: Sender<DecodeOutcome>,
    }

    impl DecodeListener for ForwardingListener {
        fn on_success(
            &mut self,
            text: String,
            format: BarcodeFormat,
            thumbnail: Option<Vec<u8>>,
            scale_factor: Option<f32>,
        ) {
            let _ = self.sink.send(DecodeOutcome::Success {
                text,
                format,
                thumbnail,
                scale_factor,
            });
        }

        fn on_failure(&mut self) {
            let _ = self.sink.send(DecodeOutcome::Failure);
        }
    }

    fn forwarding_pair() -> (ResultDispatcher, JoinHandle<()>, Receiver<DecodeOutcome>) {
        let (sink, received) = mpsc::channel();
        let (dispatcher, handle) = ResultDispatcher::spawn(Box::new(ForwardingListener { sink }));
        (dispatcher, handle, received)
    }

    #[test]
    fn test_outcomes_delivered_in_order() {
        let (dispatcher, handle, received) = forwarding_pair();

        for i in 0..5 {
            if i % 2 == 0 {
                dispatcher.success(format!("code-{}", i), BarcodeFormat::QrCode, None, None);
            } else {
                dispatcher.failure();
            }
        }
        drop(dispatcher);
        handle.join().unwrap();

        let outcomes: Vec<_> = received.iter().collect();
        assert_eq!(outcomes.len(), 5);
        for (i, outcome) in outcomes.iter().enumerate() {
            match outcome {
                DecodeOutcome::Success { text, .. } => {
                    assert_eq!(i % 2, 0);
                    assert_eq!(text, &format!("code-{}", i));
                }
                DecodeOutcome::Failure => assert_eq!(i % 2, 1),
            }
        }
    }

    #[test]
    fn test_thread_exits_when_senders_drop() {
        let (dispatcher, handle, _received) = forwarding_pair();
        let clone = dispatcher.clone();
        drop(dispatcher);
        drop(clone);
        handle.join().unwrap();
    }
}
