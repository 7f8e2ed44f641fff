//! Blocking Driver Loop
//!
//! [`Runner`] wires the pure [`Monitor`] to real collaborators and
//! performs the effects it requests. One call to [`Runner::run`] is one
//! firmware lifetime: the loop only returns with the [`FatalError`]
//! that should restart the device.
//!
//! Delivery failures are deliberately not fatal and not retried. The
//! periodic timer has already advanced, so the next interval or
//! transition carries the current state again and the server's
//! freshness check covers the gap.

use core::time::Duration;
use std::thread;

use crate::config::MonitorConfig;
use crate::errors::FatalError;
use crate::monitor::{CycleInput, Effect, Monitor};
use crate::report::Payload;
use crate::time::TickSource;
use crate::traits::clock::ClockSource;
use crate::traits::sensor::SensorLine;
use crate::traits::transport::Transport;

/// Owns the monitor and its collaborators and drives the poll loop.
pub struct Runner<K, C, T, S> {
    monitor: Monitor,
    ticks: K,
    clock: C,
    transport: T,
    sensor: S,
}

impl<K, C, T, S> Runner<K, C, T, S>
where
    K: TickSource,
    C: ClockSource,
    T: Transport,
    S: SensorLine,
{
    /// Runner in the boot phase.
    pub fn new(cfg: MonitorConfig, ticks: K, clock: C, transport: T, sensor: S) -> Self {
        Self {
            monitor: Monitor::new(cfg),
            ticks,
            clock,
            transport,
            sensor,
        }
    }

    /// The state machine being driven.
    pub fn monitor(&self) -> &Monitor {
        &self.monitor
    }

    /// The tick source, for tests that steer time.
    pub fn ticks_mut(&mut self) -> &mut K {
        &mut self.ticks
    }

    /// The wall clock.
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// The transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The transport, mutably.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// The contact line.
    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    /// Run until a fatal condition stops the device.
    ///
    /// The caller decides what a restart means: `std::process::exit`,
    /// a watchdog kick, or a platform reset on embedded targets.
    pub fn run(&mut self) -> FatalError {
        loop {
            match self.cycle() {
                Ok(idle) => thread::sleep(idle),
                Err(fatal) => {
                    log::error!("restarting: {}", fatal);
                    return fatal;
                }
            }
        }
    }

    /// One poll cycle: observe, step, execute. Returns how long to
    /// idle before the next cycle.
    pub fn cycle(&mut self) -> Result<Duration, FatalError> {
        let input = self.observe();
        let before = self.monitor.phase();

        let outcome = match self.monitor.step(input) {
            Ok(outcome) => outcome,
            Err(e) => {
                // Overflow means a report was lost, not that the device
                // is broken. Keep polling.
                log::warn!("report dropped: {}", e);
                return Ok(self.monitor.config().poll_interval);
            }
        };

        if before != self.monitor.phase() {
            log::info!("phase {:?} -> {:?}", before, self.monitor.phase());
        }

        for effect in outcome.effects {
            self.execute(effect)?;
        }
        Ok(outcome.idle)
    }

    fn observe(&mut self) -> CycleInput {
        CycleInput {
            now: self.ticks.now(),
            wall: self.clock.now(),
            local: self.clock.time_of_day(),
            clock_trusted: self.clock.trusted(),
            link_up: self.transport.connected(),
            // Read every cycle; the monitor discards the sample outside
            // the operating window.
            level: self.sensor.level(),
            rssi_dbm: self.transport.signal_strength(),
        }
    }

    fn execute(&mut self, effect: Effect) -> Result<(), FatalError> {
        match effect {
            Effect::EstablishLink => self.wait_for_link(),
            Effect::SyncClock => {
                log::info!("synchronizing clock");
                self.clock.sync(&self.monitor.config().sync)?;
                Ok(())
            }
            Effect::Send(payload) => self.deliver(&payload),
        }
    }

    /// Wait for the link under the configured retry budget.
    fn wait_for_link(&mut self) -> Result<(), FatalError> {
        let policy = self.monitor.config().link;
        for _ in 0..policy.attempts {
            if self.transport.connected() {
                log::info!(
                    "link up, signal {} dBm",
                    self.transport.signal_strength()
                );
                return Ok(());
            }
            thread::sleep(policy.retry_delay);
        }
        Err(FatalError::LinkUnavailable {
            attempts: policy.attempts,
        })
    }

    /// Send one payload, re-establishing the link first if it dropped.
    fn deliver(&mut self, payload: &Payload) -> Result<(), FatalError> {
        if !self.transport.connected() {
            self.wait_for_link()?;
        }
        match self.transport.send(payload) {
            // Any response from the server counts as delivered, error
            // statuses included.
            Ok(status) => log::debug!("delivered {:?} check, status {}", payload.kind, status),
            Err(e) => log::warn!("send failed: {}", e),
        }
        Ok(())
    }
}
