//! Operating Window Gate
//!
//! The monitoring server mutes pump alerts overnight, so the device
//! stops reporting in the same stretch instead of piling up stale
//! results. The shipped window runs from 06:05 through 00:25 the next
//! day - only 00:26 to 06:04 is quiet time.
//!
//! [`ReportingWindow::contains`] is a pure predicate over a
//! [`TimeOfDay`]; the state machine consults it every cycle and drops
//! into the dormant phase while it reports false. Windows where open
//! comes after close wrap past midnight; both bounds are inclusive.

use crate::constants::{
    MINUTES_PER_DAY, WINDOW_CLOSE_HOUR, WINDOW_CLOSE_MINUTE, WINDOW_OPEN_HOUR, WINDOW_OPEN_MINUTE,
};
use crate::time::TimeOfDay;

/// Inclusive daily time-of-day window, wrapping past midnight when the
/// opening edge comes after the closing edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportingWindow {
    open: TimeOfDay,
    close: TimeOfDay,
}

impl ReportingWindow {
    /// Window with the given inclusive edges.
    pub const fn new(open: TimeOfDay, close: TimeOfDay) -> Self {
        Self { open, close }
    }

    /// When the window opens.
    pub const fn open(&self) -> TimeOfDay {
        self.open
    }

    /// When the window closes.
    pub const fn close(&self) -> TimeOfDay {
        self.close
    }

    /// Whether `t` falls inside the window.
    pub const fn contains(&self, t: TimeOfDay) -> bool {
        let t = t.minute_of_day();
        let open = self.open.minute_of_day();
        let close = self.close.minute_of_day();
        if open <= close {
            open <= t && t <= close
        } else {
            t >= open || t <= close
        }
    }

    /// Minutes the window spans per day.
    pub const fn span_minutes(&self) -> u16 {
        let open = self.open.minute_of_day();
        let close = self.close.minute_of_day();
        if open <= close {
            close - open + 1
        } else {
            MINUTES_PER_DAY - open + close + 1
        }
    }
}

impl Default for ReportingWindow {
    fn default() -> Self {
        Self::new(
            TimeOfDay::new(WINDOW_OPEN_HOUR, WINDOW_OPEN_MINUTE),
            TimeOfDay::new(WINDOW_CLOSE_HOUR, WINDOW_CLOSE_MINUTE),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_edges_are_inclusive() {
        let w = ReportingWindow::default();

        assert!(!w.contains(TimeOfDay::new(6, 4)));
        assert!(w.contains(TimeOfDay::new(6, 5)));
        assert!(w.contains(TimeOfDay::new(0, 25)));
        assert!(!w.contains(TimeOfDay::new(0, 26)));
    }

    #[test]
    fn default_window_covers_evening_and_midnight_tail() {
        let w = ReportingWindow::default();

        assert!(w.contains(TimeOfDay::new(12, 0)));
        assert!(w.contains(TimeOfDay::new(23, 59)));
        assert!(w.contains(TimeOfDay::new(0, 0)));
    }

    #[test]
    fn default_window_quiet_overnight() {
        let w = ReportingWindow::default();

        for hour in 1..=5 {
            assert!(!w.contains(TimeOfDay::new(hour, 0)));
            assert!(!w.contains(TimeOfDay::new(hour, 59)));
        }
    }

    #[test]
    fn non_wrapping_window_behaves() {
        let w = ReportingWindow::new(TimeOfDay::new(9, 0), TimeOfDay::new(17, 0));

        assert!(!w.contains(TimeOfDay::new(8, 59)));
        assert!(w.contains(TimeOfDay::new(9, 0)));
        assert!(w.contains(TimeOfDay::new(17, 0)));
        assert!(!w.contains(TimeOfDay::new(17, 1)));
        assert!(!w.contains(TimeOfDay::new(0, 0)));
    }

    #[test]
    fn span_counts_inclusive_minutes() {
        let w = ReportingWindow::new(TimeOfDay::new(9, 0), TimeOfDay::new(9, 59));
        assert_eq!(w.span_minutes(), 60);

        // 06:05..=00:25 leaves 00:26..=06:04 quiet
        let d = ReportingWindow::default();
        assert_eq!(d.span_minutes(), 1440 - 339);
    }
}
