//! Periodic timers for the cooperative main loop.
//!
//! Everything in the firmware that "happens every N ms" (control cycle,
//! status report, day check) is an [`Interval`] polled with the current
//! uptime.  Elapsed time uses wrapping subtraction so the 49-day `u32`
//! millisecond rollover is harmless.

/// Fires once every `period_ms`, measured from the last time it fired.
#[derive(Debug, Clone, Copy)]
pub struct Interval {
    period_ms: u32,
    last_ms: u32,
}

impl Interval {
    /// First firing is due `period_ms` after `start_ms`.
    pub const fn new(period_ms: u32, start_ms: u32) -> Self {
        Self {
            period_ms,
            last_ms: start_ms,
        }
    }

    /// `true` (and the timer rearmed at `now_ms`) once the period elapsed.
    pub fn due(&mut self, now_ms: u32) -> bool {
        if now_ms.wrapping_sub(self.last_ms) >= self.period_ms {
            self.last_ms = now_ms;
            true
        } else {
            false
        }
    }

}
