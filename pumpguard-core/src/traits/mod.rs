//! Collaborator Contracts
//!
//! The monitor never talks to hardware or the network directly. Every
//! outside dependency sits behind one of three small traits:
//!
//! - [`clock`] - wall-clock time, local time of day, and bounded sync
//! - [`transport`] - payload delivery and link state
//! - [`sensor`] - the single digital input line
//!
//! The state machine consumes snapshots of these (see
//! [`CycleInput`](crate::monitor::CycleInput)) and stays a pure function;
//! only the driver in [`runner`](crate::runner) calls the traits. That
//! split keeps every monitoring decision unit-testable with the manual
//! doubles in [`time`](crate::time) and plain structs.

pub mod clock;
pub mod sensor;
pub mod transport;

// Re-export the contracts at the module level for convenience
pub use clock::{ClockError, ClockSource, SyncPolicy};
pub use sensor::{LineLevel, SensorLine, SensorState};
pub use transport::{LinkPolicy, SendError, Transport};
