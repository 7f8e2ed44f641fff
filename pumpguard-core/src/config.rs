//! Monitor Configuration
//!
//! Everything tunable about the monitor sits in [`MonitorConfig`], with
//! defaults matching the deployed device: 50 ms polling, 300 s report
//! interval, 4 h clock resyncs, the 06:05-00:25 operating window, and
//! the `kanal` / `Pumpen Alarm` check identity.
//!
//! Identity strings are validated at construction so payload composition
//! stays total: names are length-capped and restricted to characters
//! that need no JSON escaping. Firmware builds pass `&'static str`
//! literals; nothing here allocates.

use core::time::Duration;

use thiserror_no_std::Error;

use crate::constants::{
    DEFAULT_HOST_NAME, DEFAULT_SERVICE_NAME, DORMANT_IDLE_S, MAX_HOST_NAME_LEN,
    MAX_SERVICE_NAME_LEN, POLL_INTERVAL_MS, REPORT_INTERVAL_S, RESYNC_INTERVAL_S,
};
use crate::gate::ReportingWindow;
use crate::traits::clock::SyncPolicy;
use crate::traits::transport::LinkPolicy;

/// Invalid configuration value.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A name exceeds its length cap.
    #[error("{field} longer than {max} bytes")]
    NameTooLong {
        /// Which name.
        field: &'static str,
        /// The cap in bytes.
        max: usize,
    },

    /// A name holds a character that would need JSON escaping.
    #[error("{field} contains a quote, backslash, or control character")]
    NameNotPlain {
        /// Which name.
        field: &'static str,
    },
}

/// Names the monitoring server files results under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostIdentity {
    /// Host object name.
    pub host: &'static str,
    /// Service description on that host.
    pub service: &'static str,
}

impl HostIdentity {
    /// The deployed device's identity.
    pub const DEFAULT: Self = Self {
        host: DEFAULT_HOST_NAME,
        service: DEFAULT_SERVICE_NAME,
    };

    /// Validated identity. Names must fit their length caps and contain
    /// no quotes, backslashes, or control characters, so they can be
    /// spliced into payload JSON verbatim.
    pub fn new(host: &'static str, service: &'static str) -> Result<Self, ConfigError> {
        Self::check("host name", host, MAX_HOST_NAME_LEN)?;
        Self::check("service name", service, MAX_SERVICE_NAME_LEN)?;
        Ok(Self { host, service })
    }

    fn check(field: &'static str, value: &str, max: usize) -> Result<(), ConfigError> {
        if value.len() > max {
            return Err(ConfigError::NameTooLong { field, max });
        }
        if value
            .chars()
            .any(|c| c == '"' || c == '\\' || c.is_control())
        {
            return Err(ConfigError::NameNotPlain { field });
        }
        Ok(())
    }
}

impl Default for HostIdentity {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Full monitor configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Check identity on the monitoring server.
    pub identity: HostIdentity,
    /// Cycle cadence while active.
    pub poll_interval: Duration,
    /// Interval between unforced reports.
    pub report_interval: Duration,
    /// Interval between clock resync requests.
    pub resync_interval: Duration,
    /// Cycle cadence while dormant.
    pub dormant_idle: Duration,
    /// Hours during which reports are wanted.
    pub window: ReportingWindow,
    /// Link establishment retry budget.
    pub link: LinkPolicy,
    /// Clock synchronization behavior.
    pub sync: SyncPolicy,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            identity: HostIdentity::DEFAULT,
            poll_interval: Duration::from_millis(POLL_INTERVAL_MS),
            report_interval: Duration::from_secs(REPORT_INTERVAL_S),
            resync_interval: Duration::from_secs(RESYNC_INTERVAL_S),
            dormant_idle: Duration::from_secs(DORMANT_IDLE_S),
            window: ReportingWindow::default(),
            link: LinkPolicy::default(),
            sync: SyncPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::TimeOfDay;

    #[test]
    fn defaults_match_the_deployed_device() {
        let cfg = MonitorConfig::default();

        assert_eq!(cfg.identity.host, "kanal");
        assert_eq!(cfg.identity.service, "Pumpen Alarm");
        assert_eq!(cfg.poll_interval, Duration::from_millis(50));
        assert_eq!(cfg.report_interval, Duration::from_secs(300));
        assert_eq!(cfg.resync_interval, Duration::from_secs(4 * 3600));
        assert_eq!(cfg.dormant_idle, Duration::from_secs(60));
        assert_eq!(cfg.window.open(), TimeOfDay::new(6, 5));
        assert_eq!(cfg.window.close(), TimeOfDay::new(0, 25));
    }

    #[test]
    fn identity_rejects_oversized_names() {
        let long = "this-host-name-is-far-too-long-to-fit-the-cap";
        assert_eq!(
            HostIdentity::new(long, "ok"),
            Err(ConfigError::NameTooLong {
                field: "host name",
                max: MAX_HOST_NAME_LEN
            })
        );
    }

    #[test]
    fn identity_rejects_names_needing_escapes() {
        assert!(matches!(
            HostIdentity::new("ka\"nal", "Pumpen Alarm"),
            Err(ConfigError::NameNotPlain { field: "host name" })
        ));
        assert!(matches!(
            HostIdentity::new("kanal", "Pumpen\\Alarm"),
            Err(ConfigError::NameNotPlain {
                field: "service name"
            })
        ));
    }

    #[test]
    fn identity_accepts_spaces() {
        let identity = HostIdentity::new("kanal", "Pumpen Alarm").unwrap();
        assert_eq!(identity.service, "Pumpen Alarm");
    }
}
