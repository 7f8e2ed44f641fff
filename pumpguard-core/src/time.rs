//! Time types for the monitor
//!
//! Two independent notions of time drive the monitor:
//! - Monotonic milliseconds since boot ([`Timestamp`]) for cadence
//!   decisions: report intervals, resync deadlines.
//! - Wall-clock time ([`UnixSeconds`], [`TimeOfDay`]) for the operating
//!   window and the uptime figure in heartbeats.
//!
//! Monotonic time comes from a [`TickSource`]; wall-clock time comes from
//! a [`ClockSource`](crate::traits::ClockSource) implementation. Both have
//! manual doubles here for deterministic tests.

use crate::constants::{MINUTES_PER_DAY, SECS_PER_DAY, SECS_PER_HOUR, SECS_PER_MINUTE};
use crate::traits::clock::{ClockError, ClockSource, SyncPolicy};

/// Milliseconds since boot (monotonic).
pub type Timestamp = u64;

/// Seconds since the Unix epoch.
pub type UnixSeconds = i64;

/// Monotonic millisecond counter.
pub trait TickSource {
    /// Current milliseconds since an arbitrary fixed origin. Never goes
    /// backwards.
    fn now(&self) -> Timestamp;
}

/// Tick source backed by the OS monotonic clock (requires std).
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct SystemTicks {
    start: std::time::Instant,
}

#[cfg(feature = "std")]
impl SystemTicks {
    /// Start counting from now.
    pub fn new() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for SystemTicks {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl TickSource for SystemTicks {
    fn now(&self) -> Timestamp {
        self.start.elapsed().as_millis() as Timestamp
    }
}

/// Manually driven tick source for testing.
#[derive(Debug, Clone)]
pub struct ManualTicks {
    now: Timestamp,
}

impl ManualTicks {
    /// Start at the given millisecond count.
    pub fn new(start: Timestamp) -> Self {
        Self { now: start }
    }

    /// Move time forward.
    pub fn advance(&mut self, ms: u64) {
        self.now += ms;
    }

    /// Jump to an absolute value.
    pub fn set(&mut self, ms: Timestamp) {
        self.now = ms;
    }
}

impl TickSource for ManualTicks {
    fn now(&self) -> Timestamp {
        self.now
    }
}

/// Local wall-clock time of day, minute resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeOfDay {
    /// Hour, 0..=23.
    pub hour: u8,
    /// Minute, 0..=59.
    pub minute: u8,
}

impl TimeOfDay {
    /// Build from hour and minute.
    pub const fn new(hour: u8, minute: u8) -> Self {
        Self { hour, minute }
    }

    /// Minutes past midnight.
    pub const fn minute_of_day(&self) -> u16 {
        self.hour as u16 * 60 + self.minute as u16
    }

    /// Inverse of [`minute_of_day`](Self::minute_of_day); wraps past
    /// midnight.
    pub const fn from_minute_of_day(minutes: u16) -> Self {
        let m = minutes % MINUTES_PER_DAY;
        Self {
            hour: (m / 60) as u8,
            minute: (m % 60) as u8,
        }
    }
}

impl core::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Elapsed time since the boot epoch, split the way heartbeats report it.
///
/// The split uses integer division: 90061 s is 1 day, 1 hour, 1 minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Uptime {
    total: u64,
}

impl Uptime {
    /// Zero uptime, used before the boot epoch is known.
    pub const fn zero() -> Self {
        Self { total: 0 }
    }

    /// From a raw second count.
    pub const fn from_secs(secs: u64) -> Self {
        Self { total: secs }
    }

    /// Elapsed seconds between two wall-clock instants, clamped at zero
    /// if the clock stepped backwards across the start.
    pub fn between(start: UnixSeconds, now: UnixSeconds) -> Self {
        let secs = now.saturating_sub(start).max(0) as u64;
        Self { total: secs }
    }

    /// Total elapsed seconds.
    pub const fn total_secs(&self) -> u64 {
        self.total
    }

    /// Whole days.
    pub const fn days(&self) -> u64 {
        self.total / SECS_PER_DAY
    }

    /// Whole hours past the last full day.
    pub const fn hours(&self) -> u64 {
        (self.total % SECS_PER_DAY) / SECS_PER_HOUR
    }

    /// Whole minutes past the last full hour.
    pub const fn minutes(&self) -> u64 {
        (self.total % SECS_PER_HOUR) / SECS_PER_MINUTE
    }
}

impl core::fmt::Display for Uptime {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} day(s) {} hour(s) {} minute(s)",
            self.days(),
            self.hours(),
            self.minutes()
        )
    }
}

/// Manually driven wall clock for testing.
///
/// Epoch and time of day are set independently so tests can pin the
/// operating window without calendar math.
#[derive(Debug, Clone)]
pub struct ManualClock {
    epoch: UnixSeconds,
    tod: TimeOfDay,
    trusted: bool,
    sync_fails: bool,
    syncs: u32,
}

impl ManualClock {
    /// New clock that has not synced yet.
    pub fn new(epoch: UnixSeconds, tod: TimeOfDay) -> Self {
        Self {
            epoch,
            tod,
            trusted: false,
            sync_fails: false,
            syncs: 0,
        }
    }

    /// New clock that is already trusted.
    pub fn trusted_at(epoch: UnixSeconds, tod: TimeOfDay) -> Self {
        let mut clock = Self::new(epoch, tod);
        clock.trusted = true;
        clock
    }

    /// Override the trusted flag.
    pub fn set_trusted(&mut self, trusted: bool) {
        self.trusted = trusted;
    }

    /// Jump the epoch.
    pub fn set_epoch(&mut self, epoch: UnixSeconds) {
        self.epoch = epoch;
    }

    /// Jump the local time of day.
    pub fn set_time_of_day(&mut self, tod: TimeOfDay) {
        self.tod = tod;
    }

    /// Advance both epoch and time of day. Sub-minute remainders are
    /// dropped from the time of day, which has minute resolution.
    pub fn advance(&mut self, secs: u64) {
        self.epoch += secs as i64;
        let added = ((secs / SECS_PER_MINUTE) % MINUTES_PER_DAY as u64) as u16;
        self.tod = TimeOfDay::from_minute_of_day(self.tod.minute_of_day() + added);
    }

    /// Make every following sync attempt fail.
    pub fn set_sync_fails(&mut self, fails: bool) {
        self.sync_fails = fails;
    }

    /// How many sync requests have succeeded.
    pub fn syncs(&self) -> u32 {
        self.syncs
    }
}

impl ClockSource for ManualClock {
    fn now(&self) -> UnixSeconds {
        self.epoch
    }

    fn time_of_day(&self) -> TimeOfDay {
        self.tod
    }

    fn trusted(&self) -> bool {
        self.trusted
    }

    fn sync(&mut self, policy: &SyncPolicy) -> Result<(), ClockError> {
        if self.sync_fails {
            return Err(ClockError::SyncTimeout {
                waited_ms: policy.timeout.as_millis() as u64,
            });
        }
        self.trusted = true;
        self.syncs += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_ticks_advance() {
        let mut ticks = ManualTicks::new(1000);
        assert_eq!(ticks.now(), 1000);

        ticks.advance(500);
        assert_eq!(ticks.now(), 1500);
    }

    #[test]
    fn minute_of_day_round_trips() {
        let t = TimeOfDay::new(6, 5);
        assert_eq!(t.minute_of_day(), 365);
        assert_eq!(TimeOfDay::from_minute_of_day(365), t);

        // wraps past midnight
        assert_eq!(TimeOfDay::from_minute_of_day(1440), TimeOfDay::new(0, 0));
        assert_eq!(TimeOfDay::from_minute_of_day(1465), TimeOfDay::new(0, 25));
    }

    #[test]
    fn uptime_splits_with_integer_division() {
        let up = Uptime::from_secs(90_061);
        assert_eq!(up.days(), 1);
        assert_eq!(up.hours(), 1);
        assert_eq!(up.minutes(), 1);
        assert_eq!(up.total_secs(), 90_061);
    }

    #[test]
    fn uptime_display_matches_heartbeat_phrasing() {
        let up = Uptime::from_secs(90_061);
        let mut text = heapless::String::<64>::new();
        core::fmt::write(&mut text, format_args!("{}", up)).unwrap();
        assert_eq!(text.as_str(), "1 day(s) 1 hour(s) 1 minute(s)");
    }

    #[test]
    fn uptime_clamps_backwards_clock() {
        assert_eq!(Uptime::between(1000, 500).total_secs(), 0);
        assert_eq!(Uptime::between(1000, 1060).total_secs(), 60);
    }

    #[test]
    fn manual_clock_sync_sets_trust() {
        let mut clock = ManualClock::new(100, TimeOfDay::new(12, 0));
        assert!(!clock.trusted());

        clock.sync(&SyncPolicy::default()).unwrap();
        assert!(clock.trusted());
        assert_eq!(clock.syncs(), 1);
    }

    #[test]
    fn manual_clock_sync_can_fail() {
        let mut clock = ManualClock::new(100, TimeOfDay::new(12, 0));
        clock.set_sync_fails(true);

        let err = clock.sync(&SyncPolicy::default()).unwrap_err();
        assert!(matches!(err, ClockError::SyncTimeout { .. }));
        assert!(!clock.trusted());
    }

    #[test]
    fn manual_clock_advance_rolls_time_of_day() {
        let mut clock = ManualClock::trusted_at(1000, TimeOfDay::new(23, 50));
        clock.advance(20 * 60);
        assert_eq!(clock.now(), 1000 + 1200);
        assert_eq!(clock.time_of_day(), TimeOfDay::new(0, 10));
    }
}
