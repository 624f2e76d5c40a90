// SPDX-License-Identifier: GPL-3.0-only

//! Monotonic phase timer for per-frame instrumentation

use std::time::{Duration, Instant};

/// Interval timer over successive marks
///
/// Each call to [`Chronograph::mark`] returns the time elapsed since the
/// previous mark (or since construction for the first call) and resets the
/// reference point. Backed by `Instant`, so intervals are monotonic and
/// never negative.
#[derive(Debug)]
pub struct Chronograph {
    last: Instant,
}

impl Chronograph {
    /// Create a timer with the reference point set to now
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    /// Return the interval since the previous mark and reset the reference
    pub fn mark(&mut self) -> Duration {
        let now = Instant::now();
        let interval = now.duration_since(self.last);
        self.last = now;
        interval
    }
}

impl Default for Chronograph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_mark_resets_reference() {
        let mut chrono = Chronograph::new();
        thread::sleep(Duration::from_millis(20));
        let first = chrono.mark();
        let second = chrono.mark();
        // The first interval covers the sleep; the second only the gap
        // between two adjacent calls.
        assert!(first >= Duration::from_millis(20));
        assert!(second < first);
    }

    #[test]
    fn test_intervals_cover_elapsed_time() {
        let start = Instant::now();
        let mut chrono = Chronograph::new();
        thread::sleep(Duration::from_millis(5));
        let a = chrono.mark();
        thread::sleep(Duration::from_millis(5));
        let b = chrono.mark();
        assert!(a + b <= start.elapsed());
    }
}
