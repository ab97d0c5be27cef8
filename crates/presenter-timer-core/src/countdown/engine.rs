//! Countdown engine implementation.
//!
//! The engine is a tick-driven state machine. It does not use internal
//! threads or read the clock - the caller invokes `tick()` once per elapsed
//! second while the countdown is running.
//!
//! ## State Transitions
//!
//! ```text
//! Stopped -> Running <-> Paused
//!               |
//!               v
//!           Expired (remaining == 0, running == false)
//! ```
//!
//! ## Usage
//!
//! ```
//! use presenter_timer_core::CountdownEngine;
//!
//! let mut engine = CountdownEngine::new();
//! engine.set_duration(0, 0, 2).unwrap();
//! engine.start();
//! engine.tick();
//! engine.tick();
//! assert_eq!(engine.remaining_secs(), 0);
//! assert!(!engine.is_running());
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::hms::Hms;
use crate::alert::AlertTier;
use crate::error::Result;
use crate::events::Event;

/// Remaining time plus run flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CountdownState {
    /// Whole seconds left; never negative.
    pub remaining_secs: u64,
    pub running: bool,
    /// Distinct from stopped: a paused countdown resumes where it left off.
    pub paused: bool,
}

/// Core countdown engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CountdownEngine {
    state: CountdownState,
    /// The last value applied through `set_duration`, re-applied on reset.
    duration: Hms,
    /// Set once the expired signal has fired for the current run.
    #[serde(default)]
    expired_signalled: bool,
}

impl CountdownEngine {
    /// Create a stopped engine with zero duration.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> CountdownState {
        self.state
    }

    pub fn remaining_secs(&self) -> u64 {
        self.state.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn is_paused(&self) -> bool {
        self.state.paused
    }

    pub fn duration(&self) -> Hms {
        self.duration
    }

    /// `hh:mm:ss` rendering of the remaining time.
    pub fn display(&self) -> String {
        Hms::from_secs(self.state.remaining_secs).to_string()
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self, tier: AlertTier, flashing: bool) -> Event {
        Event::StateSnapshot {
            remaining_secs: self.state.remaining_secs,
            display: self.display(),
            running: self.state.running,
            paused: self.state.paused,
            tier,
            flashing,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Replace the duration and remaining time.
    ///
    /// # Errors
    /// Returns `InvalidInput` if any component is negative.
    pub fn set_duration(&mut self, hours: i64, minutes: i64, seconds: i64) -> Result<Event> {
        let hms = Hms::new(hours, minutes, seconds)?;
        Ok(self.apply_duration(hms))
    }

    /// Same as [`set_duration`](Self::set_duration) for an already validated triple.
    ///
    /// A zero duration also stops the countdown, so it never expires.
    pub fn apply_duration(&mut self, hms: Hms) -> Event {
        self.duration = hms;
        self.state.remaining_secs = hms.total_secs();
        self.expired_signalled = false;
        if self.state.remaining_secs == 0 {
            self.state.running = false;
            self.state.paused = false;
        }
        debug!(remaining_secs = self.state.remaining_secs, "countdown duration set");
        self.time_changed()
    }

    /// No-op if already running or nothing is left to count.
    pub fn start(&mut self) -> Option<Event> {
        if self.state.running || self.state.remaining_secs == 0 {
            return None;
        }
        let resumed = self.state.paused;
        self.state.running = true;
        self.state.paused = false;
        let remaining_secs = self.state.remaining_secs;
        Some(if resumed {
            Event::TimerResumed {
                remaining_secs,
                at: Utc::now(),
            }
        } else {
            Event::TimerStarted {
                remaining_secs,
                at: Utc::now(),
            }
        })
    }

    /// Toggle between running and paused. A stopped, unpaused countdown is left alone.
    pub fn pause(&mut self) -> Option<Event> {
        let remaining_secs = self.state.remaining_secs;
        if self.state.running {
            self.state.running = false;
            self.state.paused = true;
            Some(Event::TimerPaused {
                remaining_secs,
                at: Utc::now(),
            })
        } else if self.state.paused {
            self.state.running = true;
            self.state.paused = false;
            Some(Event::TimerResumed {
                remaining_secs,
                at: Utc::now(),
            })
        } else {
            None
        }
    }

    /// Start when stopped, otherwise behave like `pause`.
    pub fn toggle(&mut self) -> Option<Event> {
        if self.state.running || self.state.paused {
            self.pause()
        } else {
            self.start()
        }
    }

    /// Re-apply the last duration and stop.
    pub fn reset(&mut self) -> Vec<Event> {
        self.state.running = false;
        self.state.paused = false;
        self.state.remaining_secs = self.duration.total_secs();
        self.expired_signalled = false;
        vec![
            Event::TimerReset {
                remaining_secs: self.state.remaining_secs,
                at: Utc::now(),
            },
            self.time_changed(),
        ]
    }

    /// Call once per elapsed second.
    ///
    /// Returns `TimeChanged`, followed by `TimerExpired` on the tick that
    /// reaches zero. A stopped or paused engine returns nothing.
    pub fn tick(&mut self) -> Vec<Event> {
        if !self.state.running {
            return Vec::new();
        }
        self.state.remaining_secs = self.state.remaining_secs.saturating_sub(1);
        let mut events = vec![self.time_changed()];
        if self.state.remaining_secs == 0 {
            self.state.running = false;
            self.state.paused = false;
            if !self.expired_signalled {
                self.expired_signalled = true;
                debug!("countdown expired");
                events.push(Event::TimerExpired { at: Utc::now() });
            }
        }
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn time_changed(&self) -> Event {
        Event::TimeChanged {
            remaining_secs: self.state.remaining_secs,
            display: self.display(),
            at: Utc::now(),
        }
    }
}
