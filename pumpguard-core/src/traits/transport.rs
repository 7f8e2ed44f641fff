//! Delivery Contract
//!
//! A transport moves one formatted payload to the monitoring server and
//! reports what happened. The contract deliberately mirrors how the
//! device treats the answer:
//!
//! - `Ok(status)` means an HTTP response came back. Any response counts
//!   as delivered, a 500 included - the server saw us, and the monitor
//!   never retries within a cycle.
//! - `Err` means the request died below HTTP: no link, DNS, TLS, or I/O
//!   failure. Also not retried; the next report carries the state anyway.
//!
//! Transports additionally expose link state, which the driver polls
//! under the [`LinkPolicy`] retry budget before every delivery, and the
//! received signal strength fed into heartbeats.

use core::time::Duration;

use thiserror_no_std::Error;

use crate::constants::{LINK_RETRY_ATTEMPTS, LINK_RETRY_DELAY_MS};
use crate::report::Payload;

/// Transport-level delivery failure (no HTTP response came back).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendError {
    /// No usable link at the time of the attempt.
    #[error("network link down")]
    LinkDown,

    /// The request left the device but produced no response.
    #[error("transport failure: {reason}")]
    Transport {
        /// Failure class, e.g. "dns" or "tls".
        reason: &'static str,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for SendError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::LinkDown => defmt::write!(fmt, "link down"),
            Self::Transport { reason } => defmt::write!(fmt, "transport failure: {}", reason),
        }
    }
}

/// Retry budget for waiting on the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkPolicy {
    /// Checks before the wait is declared fatal.
    pub attempts: u32,
    /// Pause between checks.
    pub retry_delay: Duration,
}

impl Default for LinkPolicy {
    fn default() -> Self {
        Self {
            attempts: LINK_RETRY_ATTEMPTS,
            retry_delay: Duration::from_millis(LINK_RETRY_DELAY_MS),
        }
    }
}

/// Delivery channel to the monitoring server.
pub trait Transport {
    /// Whether the link currently looks usable. Stateless transports may
    /// always answer true and let [`send`](Self::send) find out.
    fn connected(&self) -> bool;

    /// Deliver one payload. Returns the HTTP status of whatever response
    /// came back; errors only when no response came back at all.
    fn send(&mut self, payload: &Payload) -> Result<u16, SendError>;

    /// Last observed signal strength in dBm, 0 when unknown. Advisory,
    /// reported in heartbeats.
    fn signal_strength(&self) -> i32;
}
