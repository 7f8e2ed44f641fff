//! Monitoring core for Pumpguard
//!
//! Watches a pump-failure contact through a digital line and reports
//! its state as passive check results to a Naemon-compatible server.
//! Designed for small always-on boards sitting next to the pump.
//!
//! Key constraints:
//! - Runs on ESP32-class devices, no heap allocation
//! - Every monitoring decision lives in a pure step function
//! - Hardware, clock, and transport enter through traits
//!
//! ```
//! use pumpguard_core::{CycleInput, LineLevel, Monitor, MonitorConfig, MonitorPhase, TimeOfDay};
//!
//! let mut monitor = Monitor::new(MonitorConfig::default());
//!
//! // One poll cycle right after power-on, link already up.
//! let outcome = monitor.step(CycleInput {
//!     now: 0,
//!     wall: 1_700_000_000,
//!     local: TimeOfDay::new(12, 0),
//!     clock_trusted: false,
//!     link_up: true,
//!     level: LineLevel::Low,
//!     rssi_dbm: -58,
//! }).unwrap();
//!
//! // First order of business is a trustworthy clock.
//! assert_eq!(monitor.phase(), MonitorPhase::Syncing);
//! assert_eq!(outcome.effects.len(), 1);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod constants;
pub mod errors;
pub mod gate;
pub mod monitor;
pub mod report;
pub mod time;
pub mod traits;

#[cfg(feature = "std")]
pub mod runner;

// Public API
pub use config::{ConfigError, HostIdentity, MonitorConfig};
pub use errors::FatalError;
pub use gate::ReportingWindow;
pub use monitor::{CycleInput, CycleOutcome, Effect, Monitor, MonitorContext, MonitorPhase};
pub use report::{CheckKind, ComposeError, Payload, ReportBatch, ReportComposer, ReportTrigger};
pub use time::{TickSource, TimeOfDay, Timestamp, UnixSeconds, Uptime};
pub use traits::{
    ClockError, ClockSource, LineLevel, LinkPolicy, SendError, SensorLine, SensorState,
    SyncPolicy, Transport,
};

#[cfg(feature = "std")]
pub use runner::Runner;

/// Crate version, straight from the manifest.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
