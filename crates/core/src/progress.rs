//! Synthetic upload progress.
//!
//! Plain `fetch`-style uploads expose no transport progress, so the
//! client fakes a smooth bar: advance by a fixed step on a fixed
//! interval, hold at a ceiling while the request is outstanding, and
//! snap to 100 when the server answers.  The counter here is pure; the
//! workflow crate drives it from a tokio interval.

use std::time::Duration;

/// Percent added per tick.
pub const PROGRESS_STEP: u8 = 4;

/// Ceiling held while the upload request is outstanding.
pub const PROGRESS_CEILING: u8 = 90;

/// Value snapped to once the server confirms success.
pub const PROGRESS_COMPLETE: u8 = 100;

/// Interval between synthetic ticks.
pub const PROGRESS_TICK: Duration = Duration::from_millis(120);

/// The synthetic progress counter for one upload attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticProgress {
    percent: u8,
}

impl SyntheticProgress {
    /// A fresh counter at 0%.
    pub fn start() -> Self {
        Self { percent: 0 }
    }

    /// Current percentage, 0..=100.
    pub fn percent(self) -> u8 {
        self.percent
    }

    /// Advance one tick.  Returns `true` while still below the ceiling
    /// (i.e. the ticker should keep running).
    pub fn tick(&mut self) -> bool {
        if self.percent >= PROGRESS_CEILING {
            return false;
        }
        self.percent = (self.percent + PROGRESS_STEP).min(PROGRESS_CEILING);
        self.percent < PROGRESS_CEILING
    }

    /// Snap to 100% on confirmed success.
    pub fn complete(&mut self) {
        self.percent = PROGRESS_COMPLETE;
    }
}
