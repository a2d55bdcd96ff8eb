//! Step-by-step playback of an already computed solution.
//!
//! The solver hands back a finished list of row ids; playback only paces it
//! out, one placement per step, and stops early once its token is cancelled.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Shared flag for stopping a playback from another thread.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Iterator over the row ids of a solution with a pause between steps.
///
/// The token is checked before and after each pause, so cancelling ends the
/// iteration at the next step boundary. There is no pause after the last step.
pub struct Playback<'a> {
    steps: std::slice::Iter<'a, usize>,
    delay: Duration,
    cancel: CancelToken,
    started: bool,
}

impl<'a> Playback<'a> {
    pub fn new(solution: &'a [usize], delay: Duration, cancel: CancelToken) -> Self {
        Self {
            steps: solution.iter(),
            delay,
            cancel,
            started: false,
        }
    }
}

impl Iterator for Playback<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.cancel.is_cancelled() || self.steps.as_slice().is_empty() {
            return None;
        }
        // no pause before the first step
        if self.started && !self.delay.is_zero() {
            thread::sleep(self.delay);
            if self.cancel.is_cancelled() {
                return None;
            }
        }
        self.started = true;
        self.steps.next().copied()
    }
}
