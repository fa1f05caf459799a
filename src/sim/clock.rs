//! Frame clock and frame-based timers
//!
//! All timing in the simulation is measured in frames. A `Timer` is an
//! immutable expiry snapshot; re-arming means replacing it with a new one.

use serde::{Deserialize, Serialize};

use crate::ms_to_frames;

/// Frame index since the clock was (re)started
pub type Frame = u64;

/// Monotonic frame counter, advanced exactly once per world update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clock {
    frame: Frame,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current frame
    #[inline]
    pub fn now(&self) -> Frame {
        self.frame
    }

    /// Advance one frame.
    ///
    /// # Panics
    /// Panics if the counter would wrap; a run that long is pathological.
    pub fn advance(&mut self) -> Frame {
        self.frame = match self.frame.checked_add(1) {
            Some(next) => next,
            None => panic!("frame counter overflow after {} frames", self.frame),
        };
        self.frame
    }

    /// Restart at frame zero (level start)
    pub fn reset(&mut self) {
        self.frame = 0;
    }
}

/// Scheduled expiry: `end = start + duration * refresh_rate`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    start: Frame,
    end: Frame,
}

impl Timer {
    /// Arm a timer at `start` that lasts `duration_ms`
    pub fn arm(start: Frame, duration_ms: u64, refresh_rate: u32) -> Self {
        // Unrepresentable durations never expire
        let frames = ms_to_frames(duration_ms, refresh_rate).unwrap_or(Frame::MAX);
        Self {
            start,
            end: start.saturating_add(frames),
        }
    }

    #[inline]
    pub fn is_expired(&self, now: Frame) -> bool {
        now >= self.end
    }

    #[inline]
    pub fn start(&self) -> Frame {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Frame {
        self.end
    }

    /// Frames left before expiry (zero once expired)
    pub fn remaining(&self, now: Frame) -> u64 {
        self.end.saturating_sub(now)
    }
}
