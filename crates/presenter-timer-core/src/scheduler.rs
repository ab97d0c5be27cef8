//! Cooperative timer sources.
//!
//! Nothing here sleeps or spawns. The owner passes the current [`Instant`]
//! to `poll`, and the host loop sleeps until [`next_deadline`] of whichever
//! source is due first.
//!
//! [`next_deadline`]: PeriodicTimer::next_deadline

use std::time::{Duration, Instant};

/// Intervals for the three timer sources the presenter owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    pub tick: Duration,
    pub flash: Duration,
    pub debounce: Duration,
}

impl Default for Cadence {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(1),
            flash: crate::alert::FLASH_INTERVAL,
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

/// Fires every `interval` while started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodicTimer {
    interval: Duration,
    next_due: Option<Instant>,
}

impl PeriodicTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// Arm the timer; the first fire is one interval after `now`.
    /// Restarting an armed timer is a no-op.
    pub fn start(&mut self, now: Instant) {
        if self.next_due.is_none() {
            self.next_due = Some(now + self.interval);
        }
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.next_due
    }

    /// Number of periods elapsed since the last poll.
    ///
    /// A late poll catches up with one fire per missed period.
    pub fn poll(&mut self, now: Instant) -> u32 {
        let Some(mut due) = self.next_due else {
            return 0;
        };
        let mut fired = 0;
        while due <= now {
            fired += 1;
            due += self.interval;
        }
        self.next_due = Some(due);
        fired
    }
}

/// Coalesces bursts of changes into one fire after a quiet period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debouncer {
    quiet: Duration,
    deadline: Option<Instant>,
}

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            deadline: None,
        }
    }

    /// Record a change; pushes the deadline out by the quiet period.
    pub fn poke(&mut self, now: Instant) {
        self.deadline = Some(now + self.quiet);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// True once per burst, after the quiet period has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}
