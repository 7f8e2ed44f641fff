//! Property tests for the operating window
//!
//! The wrapping membership rule has enough edge cases (midnight wrap,
//! inclusive bounds, single-minute windows) to deserve checking against
//! an independent formulation.

#![cfg(test)]

use proptest::prelude::*;

use pumpguard_core::{ReportingWindow, TimeOfDay};

/// Plain restatement of the deployed schedule: active from 06:05
/// through midnight to 00:25, quiet otherwise.
fn deployed_schedule_active(hour: u8, minute: u8) -> bool {
    match hour {
        0 => minute <= 25,
        1..=5 => false,
        6 => minute >= 5,
        _ => true,
    }
}

proptest! {
    #[test]
    fn default_window_matches_the_deployed_schedule(hour in 0u8..24, minute in 0u8..60) {
        let window = ReportingWindow::default();
        prop_assert_eq!(
            window.contains(TimeOfDay::new(hour, minute)),
            deployed_schedule_active(hour, minute)
        );
    }

    // Membership is "minutes since open, wrapped" staying within
    // "minutes from open to close, wrapped". One rule covers wrapping
    // and non-wrapping windows alike.
    #[test]
    fn membership_is_offset_from_open(
        open in 0u16..1440,
        close in 0u16..1440,
        t in 0u16..1440,
    ) {
        let window = ReportingWindow::new(
            TimeOfDay::from_minute_of_day(open),
            TimeOfDay::from_minute_of_day(close),
        );
        let offset = (i32::from(t) - i32::from(open)).rem_euclid(1440);
        let span = (i32::from(close) - i32::from(open)).rem_euclid(1440);
        prop_assert_eq!(window.contains(TimeOfDay::from_minute_of_day(t)), offset <= span);
    }

    #[test]
    fn open_and_close_are_always_inside(open in 0u16..1440, close in 0u16..1440) {
        let window = ReportingWindow::new(
            TimeOfDay::from_minute_of_day(open),
            TimeOfDay::from_minute_of_day(close),
        );
        prop_assert!(window.contains(window.open()));
        prop_assert!(window.contains(window.close()));
    }

    #[test]
    fn span_counts_the_member_minutes(open in 0u16..1440, close in 0u16..1440) {
        let window = ReportingWindow::new(
            TimeOfDay::from_minute_of_day(open),
            TimeOfDay::from_minute_of_day(close),
        );
        let members = (0u16..1440)
            .filter(|&m| window.contains(TimeOfDay::from_minute_of_day(m)))
            .count();
        prop_assert_eq!(members, usize::from(window.span_minutes()));
    }
}
