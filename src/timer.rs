//! Software countdown timers for the cooperative control loop.
//!
//! The loop owns all timing: it samples a monotonic millisecond clock once
//! per iteration and polls each [`Countdown`] with it.  Expiry is observed
//! through a *consuming* check — [`Countdown::take_expired`] disarms the
//! timer as it reports `true`, so at most one poll ever observes a given
//! expiry and no stale expiry can linger across a re-arm or a cancel.

/// A one-shot millisecond countdown.
///
/// Arithmetic is wrapping-safe: the deadline is kept as a start/duration
/// pair, so the timer behaves correctly across `u32` clock rollover as long
/// as durations stay well below `u32::MAX / 2` milliseconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct Countdown {
    armed: Option<Deadline>,
}

#[derive(Debug, Clone, Copy)]
struct Deadline {
    start_ms: u32,
    duration_ms: u32,
}

impl Countdown {
    pub const fn new() -> Self {
        Self { armed: None }
    }

    /// Arm (or re-arm) the countdown.  Any previous deadline, expired or
    /// not, is discarded.
    pub fn arm(&mut self, now_ms: u32, duration_ms: u32) {
        self.armed = Some(Deadline {
            start_ms: now_ms,
            duration_ms,
        });
    }

    /// Disarm without firing.  A latched-but-unobserved expiry is consumed
    /// along with the deadline.
    pub fn cancel(&mut self) {
        self.armed = None;
    }

    /// Consuming expiry check: returns `true` exactly once per armed
    /// deadline, disarming in the same step.
    pub fn take_expired(&mut self, now_ms: u32) -> bool {
        match self.armed {
            Some(d) if now_ms.wrapping_sub(d.start_ms) >= d.duration_ms => {
                self.armed = None;
                true
            }
            _ => false,
        }
    }

    /// Whether a deadline is currently pending.
    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }
}
