//! Pump Fault Walkthrough Example
//!
//! Wires the [`Runner`] to stand-in hardware and replays a pump fault:
//! the float switch trips, the fault is reported immediately, repeated
//! on the periodic cadence, and the recovery is reported the moment the
//! switch releases.
//!
//! ## What You'll Learn
//!
//! - Implementing [`SensorLine`] and [`Transport`] for your own hardware
//! - Driving cycles by hand with the manual tick source and clock
//! - Transition reports versus periodic repeats
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 02_pump_fault
//! ```

use core::time::Duration;

use pumpguard_core::time::{ManualClock, ManualTicks};
use pumpguard_core::{
    LineLevel, MonitorConfig, Payload, Runner, SendError, SensorLine, TimeOfDay, Transport,
};

/// Float switch that trips for a stretch of reads.
///
/// Swap this for a `PinDriver` wrapper on real hardware.
struct FloatSwitch {
    reads: u32,
    trip_after: u32,
    release_after: u32,
}

impl SensorLine for FloatSwitch {
    fn level(&mut self) -> LineLevel {
        self.reads += 1;
        if self.reads > self.trip_after && self.reads <= self.release_after {
            LineLevel::High
        } else {
            LineLevel::Low
        }
    }
}

/// Transport that prints what a real connector would deliver.
struct ConsoleTransport {
    delivered: u32,
}

impl Transport for ConsoleTransport {
    fn connected(&self) -> bool {
        true
    }

    fn send(&mut self, payload: &Payload) -> Result<u16, SendError> {
        self.delivered += 1;
        println!("   PUT {}", payload.body);
        Ok(200)
    }

    fn signal_strength(&self) -> i32 {
        -63
    }
}

fn main() {
    println!("Pumpguard Fault Walkthrough");
    println!("===========================\n");

    // Shrink the report interval so the replay fits in thirty cycles.
    let mut cfg = MonitorConfig::default();
    cfg.report_interval = Duration::from_secs(2);

    let mut runner = Runner::new(
        cfg,
        ManualTicks::new(0),
        ManualClock::new(1_700_000_000, TimeOfDay::new(9, 30)),
        ConsoleTransport { delivered: 0 },
        FloatSwitch {
            reads: 0,
            trip_after: 10,
            release_after: 20,
        },
    );

    // Half-second cycles instead of the deployed 50ms, purely to keep
    // the printout short.
    for cycle in 0..30u32 {
        let before = runner.transport().delivered;
        runner.cycle().unwrap();

        if runner.transport().delivered != before {
            println!(
                "   (cycle {cycle}, t={:.1}s, phase {:?})\n",
                cycle as f32 * 0.5,
                runner.monitor().phase()
            );
        }
        runner.ticks_mut().advance(500);
    }

    println!("{}", "=".repeat(60));
    println!("Delivered {} payloads.", runner.transport().delivered);
    println!("Key Insights:");
    println!("- A tripped switch is reported in the same 50ms cycle it is read");
    println!("- While tripped, the fault repeats on the periodic cadence");
    println!("- The recovery is its own transition report, timer reset included");
    println!("- In production, Runner::run() loops until a fatal error asks for a restart");
}
