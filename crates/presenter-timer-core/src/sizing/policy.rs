//! The two font sizing policies.
//!
//! Timer text shrinks to fit its surface; message text wraps, so it only
//! scales with the surface width.

use super::measure::TextMeasurer;

/// Fraction of the surface width the timer text may occupy.
pub const TIMER_MAX_WIDTH_RATIO: f32 = 0.95;
/// Smallest timer font size in pixels.
pub const TIMER_MIN_FONT_PX: f32 = 10.0;
/// Font pixels per pixel of width at preference 100.
pub const TIMER_SCALE: f32 = 0.2;

pub const MESSAGE_MIN_VALUE: f32 = 20.0;
pub const MESSAGE_DEFAULT_VALUE: f32 = 40.0;
pub const MESSAGE_MAX_VALUE: f32 = 100.0;
/// Font pixels per pixel of width at 100 %.
pub const MESSAGE_SCALE: f32 = 0.05;
/// Message text never exceeds this share of the surface height.
pub const MESSAGE_MAX_HEIGHT_RATIO: f32 = 0.2;

/// Re-measure passes for measurers that are not linear in size.
const FIT_PASSES: usize = 4;

/// Why a sizing request produced no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizingSkip {
    /// Surface dimensions are not known yet.
    NotLaidOut,
    /// The measurer returned a non-finite or negative width.
    MeasurementFault,
}

fn laid_out(width: f32) -> bool {
    width.is_finite() && width > 0.0
}

/// Timer font size for a surface `width` px wide.
///
/// `preference` is the 0-100 size slider. The live `text` is measured at the
/// candidate size and shrunk until it fits `0.95 * width`; the result is
/// never below 10 px.
pub fn timer_font_size(
    width: f32,
    preference: f32,
    text: &str,
    font_family: &str,
    measurer: &dyn TextMeasurer,
) -> Result<f32, SizingSkip> {
    if !laid_out(width) {
        return Err(SizingSkip::NotLaidOut);
    }
    let preference = if preference.is_finite() {
        preference.clamp(0.0, 100.0)
    } else {
        0.0
    };
    let limit = width * TIMER_MAX_WIDTH_RATIO;
    let mut size = width * (preference / 100.0) * TIMER_SCALE;

    for _ in 0..FIT_PASSES {
        if size <= TIMER_MIN_FONT_PX {
            break;
        }
        let measured = measurer.measure(text, font_family, size);
        if !measured.is_finite() || measured < 0.0 {
            return Err(SizingSkip::MeasurementFault);
        }
        if measured <= limit {
            break;
        }
        size *= limit / measured;
    }

    Ok(size.max(TIMER_MIN_FONT_PX))
}

/// Map the message slider value to a share of the surface width, in percent.
///
/// `[20, 40]` maps linearly onto `[40, 75]` and `[40, 100]` onto `[75, 95]`.
pub fn message_width_percentage(value: f32) -> f32 {
    let v = if value.is_finite() {
        value.clamp(MESSAGE_MIN_VALUE, MESSAGE_MAX_VALUE)
    } else {
        MESSAGE_DEFAULT_VALUE
    };
    if v <= MESSAGE_DEFAULT_VALUE {
        40.0 + (v - MESSAGE_MIN_VALUE) * 35.0 / 20.0
    } else {
        75.0 + (v - MESSAGE_DEFAULT_VALUE) * 20.0 / 60.0
    }
}

/// Message font size for a surface `width` px wide.
///
/// When `height` is known the size is capped at 20 % of it.
pub fn message_font_size(width: f32, height: Option<f32>, value: f32) -> Result<f32, SizingSkip> {
    if !laid_out(width) {
        return Err(SizingSkip::NotLaidOut);
    }
    let size = width * (message_width_percentage(value) / 100.0) * MESSAGE_SCALE;
    Ok(match height.filter(|h| laid_out(*h)) {
        Some(h) => size.min(h * MESSAGE_MAX_HEIGHT_RATIO),
        None => size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sizing::measure::AdvanceRatioMeasurer;

    struct Broken;

    impl TextMeasurer for Broken {
        fn measure(&self, _: &str, _: &str, _: f32) -> f32 {
            f32::NAN
        }
    }

    #[test]
    fn timer_candidate_kept_when_it_fits() {
        let m = AdvanceRatioMeasurer::new(0.5);
        // 1000 * 0.5 * 0.2 = 100 px; 8 chars * 100 * 0.5 = 400 px < 950.
        let size = timer_font_size(1000.0, 50.0, "00:10:00", "Arial", &m).unwrap();
        assert!((size - 100.0).abs() < 1e-4);
    }

    #[test]
    fn timer_shrinks_to_ninety_five_percent() {
        let m = AdvanceRatioMeasurer::new(1.0);
        // Candidate 200 px renders 1600 px wide; limit is 950.
        let size = timer_font_size(1000.0, 100.0, "00:10:00", "Arial", &m).unwrap();
        let width = m.measure("00:10:00", "Arial", size);
        assert!(width <= 950.0 * 1.0001, "rendered {width}");
        assert!(width >= 949.0);
    }

    #[test]
    fn timer_floor_is_ten_pixels() {
        let m = AdvanceRatioMeasurer::default();
        assert_eq!(timer_font_size(1000.0, 0.0, "00:00:00", "Arial", &m), Ok(10.0));
        assert_eq!(timer_font_size(20.0, 100.0, "00:00:00", "Arial", &m), Ok(10.0));
    }

    #[test]
    fn timer_not_laid_out() {
        let m = AdvanceRatioMeasurer::default();
        assert_eq!(
            timer_font_size(0.0, 50.0, "00:00:00", "Arial", &m),
            Err(SizingSkip::NotLaidOut)
        );
        assert_eq!(
            timer_font_size(f32::NAN, 50.0, "00:00:00", "Arial", &m),
            Err(SizingSkip::NotLaidOut)
        );
    }

    #[test]
    fn timer_measurement_fault() {
        assert_eq!(
            timer_font_size(1000.0, 50.0, "00:00:00", "Arial", &Broken),
            Err(SizingSkip::MeasurementFault)
        );
    }

    #[test]
    fn message_percentage_anchor_points() {
        assert_eq!(message_width_percentage(20.0), 40.0);
        assert_eq!(message_width_percentage(30.0), 57.5);
        assert_eq!(message_width_percentage(40.0), 75.0);
        assert_eq!(message_width_percentage(100.0), 95.0);
        assert_eq!(message_width_percentage(5.0), 40.0);
        assert_eq!(message_width_percentage(150.0), 95.0);
    }

    #[test]
    fn message_percentage_is_continuous_at_default() {
        let below = message_width_percentage(40.0 - 1e-3);
        let above = message_width_percentage(40.0 + 1e-3);
        assert!((above - below).abs() < 0.01);
    }

    #[test]
    fn message_size_scales_with_width_and_caps_by_height() {
        // 1920 * 0.75 * 0.05 = 72
        assert!((message_font_size(1920.0, None, 40.0).unwrap() - 72.0).abs() < 1e-3);
        assert!((message_font_size(1920.0, Some(200.0), 40.0).unwrap() - 40.0).abs() < 1e-3);
        assert_eq!(message_font_size(0.0, Some(1080.0), 40.0), Err(SizingSkip::NotLaidOut));
    }
}
