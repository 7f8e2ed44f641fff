//! Simulated Monitoring Day Example
//!
//! Walks the monitor through the interesting moments of one day on the
//! default configuration: a night-time power-on, the window opening at
//! 06:05, periodic heartbeats, a four-hourly clock resync, and lights
//! out at 00:26.
//!
//! ## What You'll Learn
//!
//! - Feeding [`Monitor::step`] by hand, no hardware required
//! - How the operating window gates sampling and reporting
//! - The service-then-heartbeat pair every report travels as
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_simulated_day
//! ```

use pumpguard_core::{
    CycleInput, CycleOutcome, Effect, LineLevel, Monitor, MonitorConfig, TimeOfDay, UnixSeconds,
};

/// Wall clock at power-on. Only feeds the uptime figure; the time of
/// day is passed per cycle below.
const BOOT_WALL: UnixSeconds = 1_700_000_000;

fn main() {
    let cfg = MonitorConfig::default();

    println!("Pumpguard Simulated Day");
    println!("=======================\n");
    println!("Check identity:  {} / {}", cfg.identity.host, cfg.identity.service);
    println!("Window:          {} to {}", cfg.window.open(), cfg.window.close());
    println!(
        "Cadence:         poll {}ms, report {}s, resync {}h\n",
        cfg.poll_interval.as_millis(),
        cfg.report_interval.as_secs(),
        cfg.resync_interval.as_secs() / 3600,
    );

    let mut monitor = Monitor::new(cfg);

    // Power-on at 05:58, WiFi not yet associated.
    let mut boot = input(0, TimeOfDay::new(5, 58), LineLevel::Low);
    boot.link_up = false;
    boot.clock_trusted = false;
    show("05:58  power-on, link still down", &monitor.step(boot).unwrap());

    // Link came up, clock still untrusted.
    let mut linked = input(500, TimeOfDay::new(5, 58), LineLevel::Low);
    linked.clock_trusted = false;
    show("05:58  link up", &monitor.step(linked).unwrap());

    // Clock trusted, but the window is still shut. The monitor goes
    // dormant without reporting anything.
    let outcome = monitor.step(input(1_000, TimeOfDay::new(5, 59), LineLevel::Low)).unwrap();
    show("05:59  clock trusted, quiet hours", &outcome);

    // 06:05, the window opens. First read leaves the unknown state, so
    // the pair goes out as a transition.
    let outcome = monitor.step(input(400_000, TimeOfDay::new(6, 5), LineLevel::Low)).unwrap();
    show("06:05  window opens", &outcome);

    // Five minutes later the periodic interval expires.
    let outcome = monitor.step(input(700_000, TimeOfDay::new(6, 10), LineLevel::Low)).unwrap();
    show("06:10  periodic heartbeat", &outcome);

    // Two minutes after that, nothing is due.
    let outcome = monitor.step(input(820_000, TimeOfDay::new(6, 12), LineLevel::Low)).unwrap();
    show("06:12  between intervals", &outcome);

    // Four hours after the boot sync the clock is refreshed, in the
    // same cycle as a periodic report.
    let outcome = monitor.step(input(14_800_000, TimeOfDay::new(10, 5), LineLevel::Low)).unwrap();
    show("10:05  four-hourly resync", &outcome);

    // Last report of the day at the inclusive window edge. The resync
    // interval has lapsed again along the way.
    let outcome = monitor.step(input(66_400_000, TimeOfDay::new(0, 25), LineLevel::Low)).unwrap();
    show("00:25  last report of the day", &outcome);

    // One minute later the window is shut.
    let outcome = monitor.step(input(66_460_000, TimeOfDay::new(0, 26), LineLevel::Low)).unwrap();
    show("00:26  window closes", &outcome);

    println!("{}", "=".repeat(60));
    println!("Key Insights:");
    println!("- Boot and clock sync ignore the window; reporting does not");
    println!("- Every report is a pair: service check first, host heartbeat second");
    println!("- A dormant monitor idles a minute per cycle instead of 50ms");
    println!("- Clock resyncs keep running through the night");
}

fn input(now: u64, local: TimeOfDay, level: LineLevel) -> CycleInput {
    CycleInput {
        now,
        wall: BOOT_WALL + (now / 1_000) as i64,
        local,
        clock_trusted: true,
        link_up: true,
        level,
        rssi_dbm: -58,
    }
}

fn show(label: &str, outcome: &CycleOutcome) {
    println!("{label}");
    if outcome.effects.is_empty() {
        println!("   nothing to do, idle {}ms", outcome.idle.as_millis());
    }
    for effect in &outcome.effects {
        match effect {
            Effect::EstablishLink => println!("   -> establish network link"),
            Effect::SyncClock => println!("   -> synchronize clock"),
            Effect::Send(payload) => println!("   -> send {:?} check: {}", payload.kind, payload.body),
        }
    }
    println!();
}
