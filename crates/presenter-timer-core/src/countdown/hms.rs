use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// An hours/minutes/seconds triple as picked on the control panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Hms {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Hms {
    /// Build from signed components. Any negative component is rejected;
    /// ranges are not checked here.
    pub fn new(hours: i64, minutes: i64, seconds: i64) -> Result<Self> {
        Ok(Self {
            hours: non_negative("hours", hours)?,
            minutes: non_negative("minutes", minutes)?,
            seconds: non_negative("seconds", seconds)?,
        })
    }

    /// Like [`Hms::new`] but also enforces the picker ranges
    /// (0-23 h, 0-59 m, 0-59 s).
    pub fn validated(hours: i64, minutes: i64, seconds: i64) -> Result<Self> {
        Self::new(hours, minutes, seconds)?.within_picker_range()
    }

    /// Reject components outside the picker ranges.
    pub fn within_picker_range(self) -> Result<Self> {
        if self.hours > 23 {
            return Err(CoreError::invalid_input("hours", "must be between 0 and 23"));
        }
        if self.minutes > 59 {
            return Err(CoreError::invalid_input("minutes", "must be between 0 and 59"));
        }
        if self.seconds > 59 {
            return Err(CoreError::invalid_input("seconds", "must be between 0 and 59"));
        }
        Ok(self)
    }

    pub fn from_secs(total: u64) -> Self {
        Self {
            hours: total / 3600,
            minutes: (total % 3600) / 60,
            seconds: total % 60,
        }
    }

    /// Uses saturating arithmetic so absurd inputs cannot overflow.
    pub fn total_secs(&self) -> u64 {
        self.hours
            .saturating_mul(3600)
            .saturating_add(self.minutes.saturating_mul(60))
            .saturating_add(self.seconds)
    }
}

fn non_negative(field: &str, value: i64) -> Result<u64> {
    u64::try_from(value)
        .map_err(|_| CoreError::invalid_input(field, format!("must not be negative (got {value})")))
}

/// Formats as `hh:mm:ss`.
impl fmt::Display for Hms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

/// Accepts `ss`, `mm:ss` or `hh:mm:ss`.
impl FromStr for Hms {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let parts = s
            .trim()
            .split(':')
            .map(|p| {
                p.trim()
                    .parse::<i64>()
                    .map_err(|_| CoreError::invalid_input("duration", format!("'{s}' is not a number")))
            })
            .collect::<Result<Vec<_>>>()?;

        match parts.as_slice() {
            [s] => Self::new(0, 0, *s),
            [m, s] => Self::new(0, *m, *s),
            [h, m, s] => Self::new(*h, *m, *s),
            _ => Err(CoreError::invalid_input(
                "duration",
                format!("'{s}' must look like hh:mm:ss"),
            )),
        }
    }
}
