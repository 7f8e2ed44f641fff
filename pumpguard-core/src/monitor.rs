//! Monitor State Machine
//!
//! The deterministic core of the device. [`Monitor::step`] consumes one
//! [`CycleInput`] snapshot per poll cycle and answers with the effects
//! the driver must perform plus how long to idle before the next cycle.
//! No trait object, clock, or socket is touched here, which keeps every
//! monitoring decision testable without hardware.
//!
//! ## Phases
//!
//! ```text
//! Booting --link up--> Syncing --clock trusted--> Active <--window--> Dormant
//! ```
//!
//! Fatal conditions (link retry budget exhausted, sync timeout) are not
//! phases: the driver returns a [`FatalError`](crate::errors::FatalError)
//! and the platform restarts the device into Booting.
//!
//! ## One active cycle
//!
//! 1. Note the signal strength for the next heartbeat.
//! 2. If the link is up and the resync interval expired, request a clock
//!    sync. This runs ahead of the window gate so dormant nights still
//!    keep the clock fresh.
//! 3. Consult the operating window; outside it, go dormant and idle a
//!    minute. Sampling and reporting are skipped entirely.
//! 4. Sample the contact line.
//! 5. On a state change: compose and request the report pair, reset the
//!    periodic timer.
//! 6. Otherwise, if the report interval expired: same pair, same reset.
//!    A change and the interval never both fire in one cycle.
//! 7. Store the state for the next cycle's comparison.
//!
//! The periodic timer advances when sends are requested, not when they
//! succeed. A delivery failure is logged by the driver and the next
//! interval or transition reports the state regardless, so the server's
//! freshness check is the backstop for persistent loss.

use core::time::Duration;

use heapless::Vec;

use crate::config::MonitorConfig;
use crate::constants::MAX_EFFECTS_PER_CYCLE;
use crate::report::{ComposeError, Payload, ReportComposer, ReportTrigger};
use crate::time::{TimeOfDay, Timestamp, UnixSeconds, Uptime};
use crate::traits::sensor::{LineLevel, SensorState};

/// Where the monitor currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorPhase {
    /// Waiting for the network link after power-on.
    Booting,
    /// Link up, waiting for a trustworthy clock.
    Syncing,
    /// Sampling and reporting inside the operating window.
    Active,
    /// Outside the operating window; sampling suspended.
    Dormant,
}

#[cfg(feature = "defmt")]
impl defmt::Format for MonitorPhase {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Booting => defmt::write!(fmt, "booting"),
            Self::Syncing => defmt::write!(fmt, "syncing"),
            Self::Active => defmt::write!(fmt, "active"),
            Self::Dormant => defmt::write!(fmt, "dormant"),
        }
    }
}

/// Everything the monitor remembers between cycles.
///
/// One owned struct, mutated only through [`Monitor::step`]. Resets to
/// [`MonitorContext::new`] on every power cycle; nothing persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorContext {
    /// Current phase.
    pub phase: MonitorPhase,
    /// Contact state from the previous cycle's sample.
    pub sensor: SensorState,
    /// When the last report pair was requested (monotonic ms).
    pub last_report_at: Timestamp,
    /// When the last clock sync was requested (monotonic ms).
    pub last_sync_at: Timestamp,
    /// Wall-clock second the clock first became trusted. Set once per
    /// boot; uptime is always derived from it, never stored.
    pub start_epoch: Option<UnixSeconds>,
    /// Last observed signal strength (dBm, 0 unknown).
    pub rssi_dbm: i32,
}

impl MonitorContext {
    /// Fresh boot state.
    pub const fn new() -> Self {
        Self {
            phase: MonitorPhase::Booting,
            sensor: SensorState::Unknown,
            last_report_at: 0,
            last_sync_at: 0,
            start_epoch: None,
            rssi_dbm: 0,
        }
    }
}

impl Default for MonitorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of the collaborators, gathered by the driver each cycle.
#[derive(Debug, Clone, Copy)]
pub struct CycleInput {
    /// Monotonic milliseconds since boot.
    pub now: Timestamp,
    /// Wall-clock epoch seconds.
    pub wall: UnixSeconds,
    /// Local time of day for the window gate.
    pub local: TimeOfDay,
    /// Whether the wall clock is trustworthy.
    pub clock_trusted: bool,
    /// Whether the link currently looks usable.
    pub link_up: bool,
    /// Sampled contact level. Ignored outside the active path.
    pub level: LineLevel,
    /// Current signal strength (dBm, 0 unknown).
    pub rssi_dbm: i32,
}

/// Side effect the driver must perform after a step.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Wait for the link under the configured retry budget; exhausting
    /// it is fatal.
    EstablishLink,
    /// Run a bounded clock sync; timing out is fatal.
    SyncClock,
    /// Deliver one payload; failure is logged and the cycle continues.
    Send(Payload),
}

/// Effects requested by one step, in execution order.
pub type EffectVec = Vec<Effect, MAX_EFFECTS_PER_CYCLE>;

/// What one step decided.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleOutcome {
    /// Effects to perform, in order.
    pub effects: EffectVec,
    /// How long to idle before the next cycle.
    pub idle: Duration,
}

/// The monitoring state machine.
pub struct Monitor {
    cfg: MonitorConfig,
    composer: ReportComposer,
    ctx: MonitorContext,
}

impl Monitor {
    /// Monitor in the boot phase.
    pub fn new(cfg: MonitorConfig) -> Self {
        let composer = ReportComposer::new(cfg.identity);
        Self {
            cfg,
            composer,
            ctx: MonitorContext::new(),
        }
    }

    /// The configuration the monitor runs under.
    pub fn config(&self) -> &MonitorConfig {
        &self.cfg
    }

    /// Current phase.
    pub fn phase(&self) -> MonitorPhase {
        self.ctx.phase
    }

    /// Full context, for diagnostics and tests.
    pub fn context(&self) -> &MonitorContext {
        &self.ctx
    }

    /// Advance one poll cycle.
    ///
    /// Pure with respect to the collaborators: all observations arrive
    /// in `input`, all actions leave as [`Effect`]s. The only error is
    /// a payload overflowing its buffer, which accepted identities rule
    /// out.
    pub fn step(&mut self, input: CycleInput) -> Result<CycleOutcome, ComposeError> {
        let mut effects = EffectVec::new();
        self.ctx.rssi_dbm = input.rssi_dbm;

        match self.ctx.phase {
            MonitorPhase::Booting => {
                if input.link_up {
                    self.ctx.phase = MonitorPhase::Syncing;
                    self.ctx.last_sync_at = input.now;
                    emit(&mut effects, Effect::SyncClock);
                } else {
                    emit(&mut effects, Effect::EstablishLink);
                }
                return Ok(CycleOutcome {
                    effects,
                    idle: self.cfg.poll_interval,
                });
            }
            MonitorPhase::Syncing => {
                if !input.clock_trusted {
                    self.ctx.last_sync_at = input.now;
                    emit(&mut effects, Effect::SyncClock);
                    return Ok(CycleOutcome {
                        effects,
                        idle: self.cfg.poll_interval,
                    });
                }
                if self.ctx.start_epoch.is_none() {
                    self.ctx.start_epoch = Some(input.wall);
                }
                // First monitoring cycle runs immediately below.
                self.ctx.phase = MonitorPhase::Active;
            }
            MonitorPhase::Active | MonitorPhase::Dormant => {}
        }

        // Resync ahead of the window gate so dormant nights still keep
        // the clock fresh.
        if input.link_up
            && elapsed(input.now, self.ctx.last_sync_at) >= as_ms(self.cfg.resync_interval)
        {
            self.ctx.last_sync_at = input.now;
            emit(&mut effects, Effect::SyncClock);
        }

        if !self.cfg.window.contains(input.local) {
            self.ctx.phase = MonitorPhase::Dormant;
            return Ok(CycleOutcome {
                effects,
                idle: self.cfg.dormant_idle,
            });
        }
        self.ctx.phase = MonitorPhase::Active;

        let state = SensorState::from(input.level);
        let transition = state != self.ctx.sensor;
        let interval_due =
            elapsed(input.now, self.ctx.last_report_at) >= as_ms(self.cfg.report_interval);

        // A transition resets the periodic timer, so both triggers never
        // fire in the same cycle.
        if transition || interval_due {
            let trigger = if transition {
                ReportTrigger::Transition
            } else {
                ReportTrigger::Periodic
            };
            let batch =
                self.composer
                    .compose(state, trigger, self.uptime_at(input.wall), input.rssi_dbm)?;
            for payload in batch.into_payloads() {
                emit(&mut effects, Effect::Send(payload));
            }
            // Advances when the sends are requested; delivery failures
            // do not roll it back.
            self.ctx.last_report_at = input.now;
        }
        self.ctx.sensor = state;

        Ok(CycleOutcome {
            effects,
            idle: self.cfg.poll_interval,
        })
    }

    fn uptime_at(&self, wall: UnixSeconds) -> Uptime {
        match self.ctx.start_epoch {
            Some(start) => Uptime::between(start, wall),
            None => Uptime::zero(),
        }
    }
}

fn as_ms(d: Duration) -> u64 {
    d.as_millis() as u64
}

fn elapsed(now: Timestamp, since: Timestamp) -> u64 {
    now.saturating_sub(since)
}

fn emit(effects: &mut EffectVec, effect: Effect) {
    // Capacity covers the worst cycle: one resync plus two sends.
    let _ = effects.push(effect);
}

#[cfg(test)]
mod tests {
    use super::*;

    const WALL: UnixSeconds = 1_700_000_000;

    fn input_at(now: Timestamp) -> CycleInput {
        CycleInput {
            now,
            wall: WALL,
            local: TimeOfDay::new(12, 0),
            clock_trusted: true,
            link_up: true,
            level: LineLevel::Low,
            rssi_dbm: -61,
        }
    }

    /// Monitor booted, synced, and past its first report.
    fn active_monitor() -> Monitor {
        let mut m = Monitor::new(MonitorConfig::default());
        m.step(input_at(0)).unwrap();
        m.step(input_at(50)).unwrap();
        assert_eq!(m.phase(), MonitorPhase::Active);
        m
    }

    fn send_count(outcome: &CycleOutcome) -> usize {
        outcome
            .effects
            .iter()
            .filter(|e| matches!(e, Effect::Send(_)))
            .count()
    }

    fn send_bodies(outcome: &CycleOutcome) -> std::vec::Vec<&str> {
        outcome
            .effects
            .iter()
            .filter_map(|e| match e {
                Effect::Send(p) => Some(p.body.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn boot_without_link_requests_establishment() {
        let mut m = Monitor::new(MonitorConfig::default());
        let mut input = input_at(0);
        input.link_up = false;

        let outcome = m.step(input).unwrap();
        assert_eq!(outcome.effects.as_slice(), &[Effect::EstablishLink]);
        assert_eq!(m.phase(), MonitorPhase::Booting);
    }

    #[test]
    fn boot_with_link_requests_sync() {
        let mut m = Monitor::new(MonitorConfig::default());

        let outcome = m.step(input_at(0)).unwrap();
        assert_eq!(outcome.effects.as_slice(), &[Effect::SyncClock]);
        assert_eq!(m.phase(), MonitorPhase::Syncing);
    }

    #[test]
    fn sync_completion_starts_monitoring_immediately() {
        let mut m = Monitor::new(MonitorConfig::default());
        m.step(input_at(0)).unwrap();

        // First trusted cycle enters Active and reports the first read
        // as a transition out of the unknown state.
        let outcome = m.step(input_at(50)).unwrap();
        assert_eq!(m.phase(), MonitorPhase::Active);
        assert_eq!(send_count(&outcome), 2);
        assert_eq!(m.context().start_epoch, Some(WALL));
        assert_eq!(m.context().sensor, SensorState::Ok);
        assert_eq!(m.context().last_report_at, 50);
    }

    #[test]
    fn sync_repeats_while_clock_untrusted() {
        let mut m = Monitor::new(MonitorConfig::default());
        m.step(input_at(0)).unwrap();

        let mut input = input_at(50);
        input.clock_trusted = false;
        let outcome = m.step(input).unwrap();
        assert_eq!(outcome.effects.as_slice(), &[Effect::SyncClock]);
        assert_eq!(m.phase(), MonitorPhase::Syncing);
        assert_eq!(m.context().start_epoch, None);
    }

    #[test]
    fn start_epoch_is_set_once() {
        let mut m = active_monitor();
        assert_eq!(m.context().start_epoch, Some(WALL));

        let mut input = input_at(100);
        input.wall = WALL + 500;
        m.step(input).unwrap();
        assert_eq!(m.context().start_epoch, Some(WALL));
    }

    #[test]
    fn transition_sends_service_then_heartbeat() {
        let mut m = active_monitor();

        let mut input = input_at(1_000);
        input.level = LineLevel::High;
        let outcome = m.step(input).unwrap();

        let bodies = send_bodies(&outcome);
        assert_eq!(bodies.len(), 2);
        assert!(bodies[0].contains("PROCESS_SERVICE_CHECK_RESULT"));
        assert!(bodies[0].contains("\"plugin_output\":\"FEHLER\""));
        assert!(bodies[1].contains("PROCESS_HOST_CHECK_RESULT"));
        assert_eq!(m.context().sensor, SensorState::Fault);
        assert_eq!(m.context().last_report_at, 1_000);
    }

    #[test]
    fn recovery_transition_reports_ok() {
        let mut m = active_monitor();

        let mut fault = input_at(1_000);
        fault.level = LineLevel::High;
        m.step(fault).unwrap();

        let outcome = m.step(input_at(1_050)).unwrap();
        let bodies = send_bodies(&outcome);
        assert!(bodies[0].contains("\"plugin_output\":\"OK\""));
        assert_eq!(m.context().sensor, SensorState::Ok);
    }

    #[test]
    fn periodic_report_fires_at_interval_not_before() {
        let mut m = active_monitor();
        let first_report = m.context().last_report_at;

        let outcome = m.step(input_at(first_report + 299_999)).unwrap();
        assert_eq!(send_count(&outcome), 0);

        let outcome = m.step(input_at(first_report + 300_000)).unwrap();
        assert_eq!(send_count(&outcome), 2);
        assert_eq!(m.context().last_report_at, first_report + 300_000);
    }

    #[test]
    fn transition_resets_periodic_timer() {
        let mut m = active_monitor();

        let mut input = input_at(200_000);
        input.level = LineLevel::High;
        m.step(input).unwrap();

        // Interval now counts from the transition, not the earlier report.
        let mut quiet = input_at(200_000 + 299_950);
        quiet.level = LineLevel::High;
        let outcome = m.step(quiet).unwrap();
        assert_eq!(
            send_count(&outcome),
            0,
            "timer should restart at the transition"
        );

        let mut due = input_at(200_000 + 300_000);
        due.level = LineLevel::High;
        let outcome = m.step(due).unwrap();
        assert_eq!(send_count(&outcome), 2);
    }

    #[test]
    fn change_and_expiry_in_one_cycle_send_one_pair() {
        let mut m = active_monitor();
        let first_report = m.context().last_report_at;

        let mut input = input_at(first_report + 400_000);
        input.level = LineLevel::High;
        let outcome = m.step(input).unwrap();

        assert_eq!(send_count(&outcome), 2);
    }

    #[test]
    fn dormant_suppresses_sampling_and_reports() {
        let mut m = active_monitor();

        let mut night = input_at(600_000);
        night.local = TimeOfDay::new(3, 0);
        night.level = LineLevel::High;
        let outcome = m.step(night).unwrap();

        assert_eq!(send_count(&outcome), 0);
        assert_eq!(outcome.idle, Duration::from_secs(60));
        assert_eq!(m.phase(), MonitorPhase::Dormant);
        // The sample is discarded, not stored.
        assert_eq!(m.context().sensor, SensorState::Ok);
    }

    #[test]
    fn dormant_still_requests_resync() {
        let mut m = active_monitor();
        let synced_at = m.context().last_sync_at;

        let mut night = input_at(synced_at + 4 * 3_600_000);
        night.local = TimeOfDay::new(3, 0);
        let outcome = m.step(night).unwrap();

        assert_eq!(outcome.effects.as_slice(), &[Effect::SyncClock]);
        assert_eq!(m.phase(), MonitorPhase::Dormant);
    }

    #[test]
    fn resync_waits_for_link() {
        let mut m = active_monitor();
        let synced_at = m.context().last_sync_at;

        let mut input = input_at(synced_at + 5 * 3_600_000);
        input.link_up = false;
        let outcome = m.step(input).unwrap();

        assert!(!outcome.effects.contains(&Effect::SyncClock));

        // Next cycle with the link back requests it.
        let outcome = m.step(input_at(synced_at + 5 * 3_600_000 + 50)).unwrap();
        assert!(outcome.effects.contains(&Effect::SyncClock));
    }

    #[test]
    fn resync_interval_counts_from_last_request() {
        let mut m = active_monitor();
        let synced_at = m.context().last_sync_at;

        let outcome = m.step(input_at(synced_at + 4 * 3_600_000 - 1)).unwrap();
        assert!(!outcome.effects.contains(&Effect::SyncClock));

        let outcome = m.step(input_at(synced_at + 4 * 3_600_000)).unwrap();
        assert!(outcome.effects.contains(&Effect::SyncClock));
        assert_eq!(m.context().last_sync_at, synced_at + 4 * 3_600_000);
    }

    #[test]
    fn window_reopen_resumes_with_periodic_report() {
        let mut m = active_monitor();

        let mut night = input_at(1_000_000);
        night.local = TimeOfDay::new(3, 0);
        m.step(night).unwrap();
        assert_eq!(m.phase(), MonitorPhase::Dormant);

        let mut morning = input_at(25_000_000);
        morning.local = TimeOfDay::new(6, 5);
        let outcome = m.step(morning).unwrap();

        assert_eq!(m.phase(), MonitorPhase::Active);
        assert_eq!(send_count(&outcome), 2);
        assert_eq!(m.context().last_report_at, 25_000_000);
    }

    #[test]
    fn heartbeat_carries_current_rssi_and_uptime() {
        let mut m = active_monitor();
        let first_report = m.context().last_report_at;

        let mut input = input_at(first_report + 300_000);
        input.wall = WALL + 90_061;
        input.rssi_dbm = -67;
        let outcome = m.step(input).unwrap();

        let bodies = send_bodies(&outcome);
        assert!(bodies[1].contains("1 day(s) 1 hour(s) 1 minute(s)"));
        assert!(bodies[1].contains("rssi=-67"));
        assert!(bodies[1].contains("uptime=90061"));
    }

    #[test]
    fn quiet_cycles_request_nothing() {
        let mut m = active_monitor();

        let outcome = m.step(input_at(m.context().last_report_at + 50)).unwrap();
        assert!(outcome.effects.is_empty());
        assert_eq!(outcome.idle, Duration::from_millis(50));
    }
}
