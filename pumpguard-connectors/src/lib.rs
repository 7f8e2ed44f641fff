//! Host-Side Connectors for Pumpguard
//!
//! ## Overview
//!
//! `pumpguard-core` keeps every monitoring decision behind traits; this
//! crate supplies the implementations a Linux host needs to run the
//! monitor for real:
//!
//! - [`ThrukConnector`]: delivers check results to a Thruk/Naemon
//!   server over authenticated HTTPS (feature `thruk`, on by default)
//! - [`SystemClock`]: wall clock and local time from the OS
//! - [`DryRunConnector`]: logs payloads instead of sending them, for
//!   bench tests against a production server you must not touch
//!
//! Firmware targets implement the same traits against their own HTTP
//! and SNTP stacks; nothing in `pumpguard-core` depends on this crate.
//!
//! ## Delivery Semantics
//!
//! The monitor treats any HTTP response as a delivery, server errors
//! included, and never retries a payload. A lost report is covered by
//! the next periodic interval and by the server's freshness check, so
//! the connector stays deliberately simple: one PUT per payload, no
//! queue, no backoff.
//!
//! ## Example Usage
//!
//! ```
//! use pumpguard_connectors::{ThrukConfig, ThrukConnector};
//!
//! # fn main() -> Result<(), pumpguard_connectors::ThrukError> {
//! let config = ThrukConfig::new("https://monitor.example.net/thruk/r/cmd")
//!     .api_key("s3cr3t-key")
//!     .timeout_secs(10);
//!
//! let connector = ThrukConnector::new(config)?;
//! // Hand it to pumpguard_core::Runner together with a clock and a
//! // sensor line.
//! # let _ = connector;
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod dry_run;

#[cfg(feature = "thruk")]
pub mod thruk;

// Re-export common types
pub use clock::SystemClock;
pub use dry_run::DryRunConnector;

#[cfg(feature = "thruk")]
pub use thruk::{AuthMethod, ThrukConfig, ThrukConnector, ThrukError};
