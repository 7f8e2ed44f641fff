//! Sensor Contract
//!
//! The whole sensing surface is one digital line wired to the pump's
//! failure contact: open (low) while the pump is healthy, closed (high)
//! when it has tripped. Reading the line is total - there is no failure
//! mode a GPIO read can report - so the contract has no error channel.

/// Electrical level of the failure contact line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineLevel {
    /// Contact open, pump healthy.
    Low,
    /// Contact closed, pump tripped.
    High,
}

/// Pump state as the monitor tracks it between cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SensorState {
    /// Contact open.
    Ok,
    /// Contact closed.
    Fault,
    /// No read yet this boot. Guarantees the first read registers as a
    /// transition and reports immediately.
    #[default]
    Unknown,
}

impl From<LineLevel> for SensorState {
    fn from(level: LineLevel) -> Self {
        match level {
            LineLevel::Low => Self::Ok,
            LineLevel::High => Self::Fault,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SensorState {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Ok => defmt::write!(fmt, "ok"),
            Self::Fault => defmt::write!(fmt, "fault"),
            Self::Unknown => defmt::write!(fmt, "unknown"),
        }
    }
}

/// The failure contact line.
pub trait SensorLine {
    /// Sample the current level.
    fn level(&mut self) -> LineLevel;
}
