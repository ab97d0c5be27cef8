use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::color::ColorName;

/// Cadence of the expiry flash.
pub const FLASH_INTERVAL: Duration = Duration::from_millis(500);

/// Alternates the timer colour with alert red while the countdown is expired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlashState {
    active: bool,
    /// `true` while alert red is showing.
    phase: bool,
    interval: Duration,
    /// Colour captured when flashing began; restored on stop.
    original: Option<ColorName>,
}

impl Default for FlashState {
    fn default() -> Self {
        Self {
            active: false,
            phase: false,
            interval: FLASH_INTERVAL,
            original: None,
        }
    }
}

impl FlashState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            ..Self::default()
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn phase(&self) -> bool {
        self.phase
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn original(&self) -> Option<&ColorName> {
        self.original.as_ref()
    }

    /// Begin flashing, capturing `current` as the colour to restore.
    ///
    /// Returns false if already flashing; the first capture wins.
    pub fn start(&mut self, current: ColorName) -> bool {
        if self.active {
            return false;
        }
        self.active = true;
        self.phase = false;
        self.original = Some(current);
        true
    }

    /// Stop flashing and hand back the captured colour.
    ///
    /// Returns `None` if flashing was not active.
    pub fn stop(&mut self) -> Option<ColorName> {
        if !self.active {
            return None;
        }
        self.active = false;
        self.phase = false;
        self.original.take()
    }

    /// Advance one cadence step and return the colour to render.
    pub fn tick(&mut self) -> Option<ColorName> {
        if !self.active {
            return None;
        }
        self.phase = !self.phase;
        self.current_color()
    }

    /// Colour for the current phase, without advancing.
    pub fn current_color(&self) -> Option<ColorName> {
        if !self.active {
            return None;
        }
        if self.phase {
            Some(ColorName::red())
        } else {
            self.original.clone()
        }
    }
}
