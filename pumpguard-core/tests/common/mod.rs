//! Shared doubles for integration tests
//!
//! A contact line tests flip by hand, a transport that records every
//! payload it is handed, and a cycle input builder with calm daytime
//! defaults.

#![allow(dead_code)]

use pumpguard_core::{
    CycleInput, LineLevel, Payload, SendError, SensorLine, TimeOfDay, Timestamp, Transport,
};

/// Wall-clock second most tests boot at.
pub const BOOT_WALL: i64 = 1_700_000_000;

/// Contact line with a settable level.
pub struct SwitchSensor {
    level: LineLevel,
}

impl SwitchSensor {
    pub fn new(level: LineLevel) -> Self {
        Self { level }
    }

    pub fn set(&mut self, level: LineLevel) {
        self.level = level;
    }
}

impl SensorLine for SwitchSensor {
    fn level(&mut self) -> LineLevel {
        self.level
    }
}

/// Transport that records every send attempt.
///
/// Attempts are recorded even when wired to fail, so tests can tell
/// "never tried" apart from "tried and lost".
pub struct RecordingTransport {
    pub connected: bool,
    pub rssi_dbm: i32,
    pub fail_sends: bool,
    pub status: u16,
    pub attempts: Vec<Payload>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self {
            connected: true,
            rssi_dbm: -61,
            fail_sends: false,
            status: 200,
            attempts: Vec::new(),
        }
    }

    pub fn bodies(&self) -> Vec<&str> {
        self.attempts.iter().map(|p| p.body.as_str()).collect()
    }
}

impl Transport for RecordingTransport {
    fn connected(&self) -> bool {
        self.connected
    }

    fn send(&mut self, payload: &Payload) -> Result<u16, SendError> {
        self.attempts.push(payload.clone());
        if self.fail_sends {
            Err(SendError::Transport {
                reason: "wired to fail",
            })
        } else {
            Ok(self.status)
        }
    }

    fn signal_strength(&self) -> i32 {
        self.rssi_dbm
    }
}

/// Midday cycle input with the link up and the line calm.
pub fn daytime_input(now: Timestamp) -> CycleInput {
    CycleInput {
        now,
        wall: BOOT_WALL,
        local: TimeOfDay::new(12, 0),
        clock_trusted: true,
        link_up: true,
        level: LineLevel::Low,
        rssi_dbm: -61,
    }
}
