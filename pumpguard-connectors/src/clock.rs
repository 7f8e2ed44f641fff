//! System Clock Source
//!
//! Backs the monitor's clock with the host clock via chrono. On any
//! reasonable host the OS already disciplines the clock with NTP, so a
//! sync attempt amounts to waiting until the reported epoch clears the
//! trust threshold.

use std::thread;
use std::time::Instant;

use chrono::{Local, Timelike, Utc};

use pumpguard_core::constants::TRUSTED_EPOCH_MIN;
use pumpguard_core::{ClockError, ClockSource, SyncPolicy, TimeOfDay, UnixSeconds};

/// Clock source backed by the host system clock.
///
/// `time_of_day` reports the host's local timezone. The POSIX TZ rule
/// and NTP server list in [`SyncPolicy`] are for firmware targets that
/// own their clock; here only the timeout and poll delay apply.
#[derive(Debug, Clone)]
pub struct SystemClock {
    min_epoch: UnixSeconds,
}

impl SystemClock {
    /// Clock trusting any epoch past the default threshold.
    pub fn new() -> Self {
        Self {
            min_epoch: TRUSTED_EPOCH_MIN,
        }
    }

    /// Clock with a custom trust threshold, for tests and odd hosts.
    pub fn with_trust_threshold(min_epoch: UnixSeconds) -> Self {
        Self { min_epoch }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockSource for SystemClock {
    fn now(&self) -> UnixSeconds {
        Utc::now().timestamp()
    }

    fn time_of_day(&self) -> TimeOfDay {
        let local = Local::now();
        TimeOfDay::new(local.hour() as u8, local.minute() as u8)
    }

    fn trusted(&self) -> bool {
        self.now() >= self.min_epoch
    }

    fn sync(&mut self, policy: &SyncPolicy) -> Result<(), ClockError> {
        let deadline = Instant::now() + policy.timeout;
        while !self.trusted() {
            if Instant::now() >= deadline {
                return Err(ClockError::SyncTimeout {
                    waited_ms: policy.timeout.as_millis() as u64,
                });
            }
            thread::sleep(policy.poll_delay);
        }
        Ok(())
    }
}
