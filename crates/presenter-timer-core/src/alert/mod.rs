//! Alert tiers derived from the remaining time, and the expiry flash cadence.

mod flash;

pub use flash::{FlashState, FLASH_INTERVAL};

use serde::{Deserialize, Serialize};

use crate::color::ColorName;

/// Severity bucket for the remaining time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertTier {
    Normal,
    Warning,
    Critical,
    Expired,
}

/// Classify remaining seconds against the yellow and red thresholds.
///
/// Pure and total. `red <= yellow` is assumed but not checked; with
/// `red > yellow` the Warning band is empty and everything at or below `red`
/// is Critical.
pub fn classify(remaining_secs: u64, yellow: u32, red: u32) -> AlertTier {
    if remaining_secs == 0 {
        AlertTier::Expired
    } else if remaining_secs <= u64::from(red) {
        AlertTier::Critical
    } else if remaining_secs <= u64::from(yellow) {
        AlertTier::Warning
    } else {
        AlertTier::Normal
    }
}

/// Timer colour for a non-expired tier. `base` is the user's timer colour.
///
/// Returns `None` for Expired, whose colour comes from [`FlashState`].
pub fn tier_color(tier: AlertTier, base: &ColorName) -> Option<ColorName> {
    match tier {
        AlertTier::Normal => Some(base.clone()),
        AlertTier::Warning => Some(ColorName::yellow()),
        AlertTier::Critical => Some(ColorName::red()),
        AlertTier::Expired => None,
    }
}

/// True when thresholds describe a Critical band wider than the Warning band.
pub fn thresholds_inverted(yellow: u32, red: u32) -> bool {
    red > yellow
}
