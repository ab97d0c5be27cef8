//! Property tests for the timer and message sizing policies.

use presenter_timer_core::sizing::{
    message_font_size, message_width_percentage, preview_font_size, timer_font_size,
    AdvanceRatioMeasurer, TextMeasurer, TIMER_MAX_WIDTH_RATIO, TIMER_MIN_FONT_PX,
};
use presenter_timer_core::{AdaptiveSizer, SizingTarget, SurfaceLayout, SurfaceSize};
use proptest::prelude::*;

proptest! {
    #[test]
    fn timer_text_fits_width_or_sits_at_floor(
        width in 200f32..4000.0,
        pref in 0f32..=100.0,
        ratio in 0.3f32..1.5,
        len in 1usize..20,
    ) {
        let measurer = AdvanceRatioMeasurer::new(ratio);
        let text = "8".repeat(len);
        let size = timer_font_size(width, pref, &text, "Arial", &measurer).unwrap();

        prop_assert!(size >= TIMER_MIN_FONT_PX);
        if size > TIMER_MIN_FONT_PX {
            let measured = measurer.measure(&text, "Arial", size);
            prop_assert!(measured <= width * TIMER_MAX_WIDTH_RATIO * (1.0 + 1e-3));
        }
    }

    #[test]
    fn message_percentage_is_monotonic(a in 20f32..=100.0, b in 20f32..=100.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(message_width_percentage(lo) <= message_width_percentage(hi));
    }

    #[test]
    fn previews_scale_with_width(
        primary_width in 400f32..4000.0,
        preview_width in 50f32..1000.0,
        pref in 10f32..=100.0,
    ) {
        let mut layout = SurfaceLayout::new();
        layout.set_primary(SurfaceSize::new(primary_width, primary_width * 0.5625));
        let idx = layout.add_preview(Some(SurfaceSize::new(preview_width, preview_width * 0.5625)));

        let mut sizer = AdaptiveSizer::new();
        let primary = sizer
            .resize_timer(&layout, pref, "00:00:00", "Arial", &AdvanceRatioMeasurer::default())
            .unwrap();
        let preview = sizer.timer().font_size(SizingTarget::Preview(idx)).unwrap();
        let expected = preview_font_size(primary, primary_width, preview_width);
        prop_assert!((preview - expected).abs() <= expected * 1e-5);
        prop_assert!((preview - primary * preview_width / primary_width).abs() <= expected * 1e-4);
    }
}

#[test]
fn message_mapping_anchor_points() {
    assert_eq!(message_width_percentage(20.0), 40.0);
    assert_eq!(message_width_percentage(40.0), 75.0);
    assert_eq!(message_width_percentage(100.0), 95.0);
    let left = message_width_percentage(39.999);
    let right = message_width_percentage(40.001);
    assert!((left - 75.0).abs() < 0.01);
    assert!((right - 75.0).abs() < 0.01);
}

#[test]
fn message_size_has_no_overflow_pass_but_respects_height() {
    // 1000 * 0.75 * 0.05 = 37.5
    assert_eq!(message_font_size(1000.0, None, 40.0).unwrap(), 37.5);
    // 20 % of 100 px tall caps it at 20.
    assert_eq!(message_font_size(1000.0, Some(100.0), 40.0).unwrap(), 20.0);
}
