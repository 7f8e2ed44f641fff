//! Fatal Errors That Demand a Device Restart
//!
//! ## Design Philosophy
//!
//! The monitor sorts failures into exactly two classes:
//!
//! 1. **Recoverable**: a single report delivery failing. It is logged and
//!    the cycle continues; the next transition or interval expiry sends a
//!    fresh report anyway. See
//!    [`SendError`](crate::traits::transport::SendError).
//!
//! 2. **Fatal**: the link cannot be established within its retry budget,
//!    or the clock cannot be synced within its timeout. The device has no
//!    degraded mode worth running in either case, so these propagate as
//!    [`FatalError`] out of the driver and the platform resets the
//!    hardware, re-entering the boot sequence with a clean slate.
//!
//! Errors stay small and `Copy` - no heap, only inline data and
//! `&'static str` reasons - so they can be returned through every layer
//! of a no_std build.

use thiserror_no_std::Error;

use crate::traits::clock::ClockError;

/// A condition the monitor cannot run through. The holder is expected to
/// reset the device.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatalError {
    /// The network link stayed down through the whole retry budget.
    #[error("network link unavailable after {attempts} attempts")]
    LinkUnavailable {
        /// Attempts made before giving up.
        attempts: u32,
    },

    /// Wall-clock synchronization failed.
    #[error("clock synchronization failed: {0}")]
    ClockSync(#[from] ClockError),
}

#[cfg(feature = "defmt")]
impl defmt::Format for FatalError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::LinkUnavailable { attempts } => {
                defmt::write!(fmt, "link unavailable after {} attempts", attempts)
            }
            Self::ClockSync(err) => defmt::write!(fmt, "clock sync failed: {}", err),
        }
    }
}
