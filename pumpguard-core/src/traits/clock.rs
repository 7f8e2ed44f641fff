//! Wall-Clock Contract
//!
//! The monitor needs three things from a clock: the epoch time for
//! uptime arithmetic, the local time of day for the operating window,
//! and an honest answer to "can this reading be trusted yet". A clock
//! fresh out of reset reports some time, just not a meaningful one, so
//! trust is an explicit part of the contract rather than an assumption.
//!
//! Synchronization is a blocking, bounded call: it returns once the
//! clock is trustworthy or fails with [`ClockError::SyncTimeout`], which
//! the driver escalates to a restart.

use core::time::Duration;

use thiserror_no_std::Error;

use crate::constants::{NTP_SERVERS, SYNC_POLL_DELAY_MS, SYNC_TIMEOUT_S, TZ_SPEC};
use crate::time::{TimeOfDay, UnixSeconds};

/// Errors a clock can report from a sync attempt.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockError {
    /// The clock never became trustworthy within the sync timeout.
    #[error("time sync timed out after {waited_ms} ms")]
    SyncTimeout {
        /// Milliseconds spent waiting.
        waited_ms: u64,
    },

    /// The platform has no clock to sync.
    #[error("clock unavailable: {reason}")]
    Unavailable {
        /// What is missing.
        reason: &'static str,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for ClockError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::SyncTimeout { waited_ms } => {
                defmt::write!(fmt, "sync timed out after {} ms", waited_ms)
            }
            Self::Unavailable { reason } => defmt::write!(fmt, "clock unavailable: {}", reason),
        }
    }
}

/// How a sync attempt should behave.
///
/// Firmware implementations drive SNTP with the timezone rule and server
/// list; host implementations lean on the OS clock and only honor the
/// timeout and poll delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncPolicy {
    /// POSIX TZ rule for deriving local time of day.
    pub tz: &'static str,
    /// Time servers in preference order.
    pub ntp_servers: &'static [&'static str],
    /// Give up after this long.
    pub timeout: Duration,
    /// Pause between trust checks while waiting.
    pub poll_delay: Duration,
}

impl Default for SyncPolicy {
    fn default() -> Self {
        Self {
            tz: TZ_SPEC,
            ntp_servers: &NTP_SERVERS,
            timeout: Duration::from_secs(SYNC_TIMEOUT_S),
            poll_delay: Duration::from_millis(SYNC_POLL_DELAY_MS),
        }
    }
}

/// Source of wall-clock time.
pub trait ClockSource {
    /// Current epoch seconds. Meaningful only once [`trusted`] holds.
    ///
    /// [`trusted`]: Self::trusted
    fn now(&self) -> UnixSeconds;

    /// Local time of day under the configured timezone rule.
    fn time_of_day(&self) -> TimeOfDay;

    /// Whether the reported time is accurate enough for window and
    /// uptime decisions.
    fn trusted(&self) -> bool;

    /// Block until the clock is trustworthy, within `policy.timeout`.
    fn sync(&mut self, policy: &SyncPolicy) -> Result<(), ClockError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_carries_sync_constants() {
        let policy = SyncPolicy::default();
        assert_eq!(policy.timeout, Duration::from_secs(30));
        assert_eq!(policy.poll_delay, Duration::from_millis(500));
        assert_eq!(policy.ntp_servers.len(), 3);
        assert!(policy.tz.starts_with("CET"));
    }
}
