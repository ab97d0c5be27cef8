//! Property tests for the countdown engine, the tier classifier and the
//! expiry flash.

use presenter_timer_core::{classify, AlertTier, ColorName, CountdownEngine, Event, FlashState};
use proptest::prelude::*;

fn expired_count(events: &[Event]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, Event::TimerExpired { .. }))
        .count()
}

proptest! {
    #[test]
    fn counting_down_the_full_duration_expires_once(h in 0i64..2, m in 0i64..60, s in 0i64..60) {
        let mut engine = CountdownEngine::new();
        engine.set_duration(h, m, s).unwrap();
        let total = (h * 3600 + m * 60 + s) as u64;
        prop_assert_eq!(engine.remaining_secs(), total);

        engine.start();
        let mut fired = 0;
        for _ in 0..total {
            fired += expired_count(&engine.tick());
        }
        // Extra ticks after expiry change nothing.
        fired += expired_count(&engine.tick());

        prop_assert_eq!(engine.remaining_secs(), 0);
        prop_assert!(!engine.is_running());
        prop_assert_eq!(fired, usize::from(total > 0));
    }

    #[test]
    fn negative_components_are_rejected(h in -100i64..0, m in 0i64..60, s in 0i64..60) {
        let mut engine = CountdownEngine::new();
        prop_assert!(engine.set_duration(h, m, s).is_err());
        prop_assert!(engine.set_duration(m, h, s).is_err());
        prop_assert!(engine.set_duration(m, s, h).is_err());
    }

    #[test]
    fn classification_boundaries(red in 1u32..600, gap in 1u32..600) {
        let yellow = red + gap;
        prop_assert_eq!(classify(0, yellow, red), AlertTier::Expired);
        prop_assert_eq!(classify(1, yellow, red), AlertTier::Critical);
        prop_assert_eq!(classify(u64::from(red), yellow, red), AlertTier::Critical);
        prop_assert_eq!(classify(u64::from(red) + 1, yellow, red), AlertTier::Warning);
        prop_assert_eq!(classify(u64::from(yellow), yellow, red), AlertTier::Warning);
        prop_assert_eq!(classify(u64::from(yellow) + 1, yellow, red), AlertTier::Normal);
    }

    #[test]
    fn flash_alternates_every_step(steps in 1usize..64) {
        let mut flash = FlashState::new();
        flash.start(ColorName::white());
        for step in 1..=steps {
            let color = flash.tick().unwrap();
            let expected = if step % 2 == 1 { ColorName::red() } else { ColorName::white() };
            prop_assert_eq!(color, expected);
        }
        prop_assert_eq!(flash.stop(), Some(ColorName::white()));
        prop_assert_eq!(flash.tick(), None);
    }
}

#[test]
fn default_thresholds_examples() {
    assert_eq!(classify(60, 300, 60), AlertTier::Critical);
    assert_eq!(classify(61, 300, 60), AlertTier::Warning);
    assert_eq!(classify(300, 300, 60), AlertTier::Warning);
    assert_eq!(classify(301, 300, 60), AlertTier::Normal);
    assert_eq!(classify(0, 300, 60), AlertTier::Expired);
}

#[test]
fn inverted_thresholds_leave_no_warning_band() {
    assert_eq!(classify(100, 60, 300), AlertTier::Critical);
    assert_eq!(classify(301, 60, 300), AlertTier::Normal);
}
