//! Dry-Run Connector
//!
//! Pretends every delivery succeeded and logs the payload instead of
//! putting it on the wire. Wire it into the runner when bench-testing a
//! device so the production server never sees rehearsal check results.

use pumpguard_core::{Payload, SendError, Transport};

/// Transport that logs payloads instead of delivering them.
#[derive(Debug, Default)]
pub struct DryRunConnector {
    rssi_dbm: i32,
    delivered: u64,
}

impl DryRunConnector {
    /// Connector reporting no radio signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Connector reporting a fixed signal strength, so rehearsed
    /// heartbeats look like the real thing.
    pub fn with_signal(rssi_dbm: i32) -> Self {
        Self {
            rssi_dbm,
            delivered: 0,
        }
    }

    /// How many payloads were swallowed so far.
    pub fn delivered(&self) -> u64 {
        self.delivered
    }
}

impl Transport for DryRunConnector {
    fn connected(&self) -> bool {
        true
    }

    fn send(&mut self, payload: &Payload) -> Result<u16, SendError> {
        self.delivered += 1;
        log::info!("dry run, not sent: {}", payload.body);
        Ok(200)
    }

    fn signal_strength(&self) -> i32 {
        self.rssi_dbm
    }
}
