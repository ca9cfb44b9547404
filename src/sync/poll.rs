//! Poll scheduling.

use std::time::{Duration, Instant};

/// Recurring poll timer with at most one pending deadline.
///
/// Two states: Idle (no deadline) and Active (one deadline). `start` makes
/// the first tick due immediately; `set_interval` while Active re-anchors
/// the next deadline a full new interval from "now" without an immediate
/// tick.
#[derive(Debug, Clone)]
pub struct PollTimer {
    interval: Duration,
    next_due: Option<Instant>,
}

impl PollTimer {
    /// Creates an Idle timer remembering `interval` for a later `start`.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Begins periodic ticking. The first tick is due immediately; any
    /// previously pending deadline is replaced.
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now);
    }

    /// Cancels the pending deadline. No-op when already Idle.
    pub fn stop(&mut self) {
        self.next_due = None;
    }

    /// Changes the cadence. When Active the single pending deadline moves to
    /// `now + interval`; when Idle only the stored interval changes.
    pub fn set_interval(&mut self, interval: Duration, now: Instant) {
        self.interval = interval;
        if self.next_due.is_some() {
            self.next_due = Some(now + interval);
        }
    }

    /// Reports whether a tick is due, scheduling the next one if so.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if due <= now => {
                self.next_due = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }

    /// The pending deadline, when Active.
    pub fn next_due(&self) -> Option<Instant> {
        self.next_due
    }
}
