//! Report Composer
//!
//! Builds the wire payloads the monitoring server accepts: flat JSON
//! check-result commands, one per check. Every trigger produces the same
//! pair - a service result carrying the pump state, then a host
//! heartbeat carrying uptime and signal metrics - so the server's
//! freshness view of host and service never drift apart.
//!
//! Payloads are formatted straight into fixed [`heapless::String`]
//! buffers; nothing here allocates. Field order is part of the wire
//! contract: `cmd`, `host`, `service` (service results only),
//! `plugin_output`, `plugin_state`.
//!
//! Composition is idempotent: the same state, uptime, and signal always
//! yield byte-identical payloads.

use core::fmt::Write;

use heapless::String;
use thiserror_no_std::Error;

use crate::config::HostIdentity;
use crate::constants::{
    CMD_HOST_CHECK, CMD_SERVICE_CHECK, MAX_PAYLOAD_BYTES, PLUGIN_STATE_CRITICAL, PLUGIN_STATE_OK,
    SERVICE_OUTPUT_FAULT, SERVICE_OUTPUT_OK,
};
use crate::time::Uptime;
use crate::traits::sensor::SensorState;

/// One formatted payload body.
pub type PayloadString = String<MAX_PAYLOAD_BYTES>;

/// Failure to fit a payload into its buffer.
///
/// Unreachable for identities accepted by
/// [`HostIdentity::new`](crate::config::HostIdentity::new); the name
/// length caps keep the worst case under the buffer size.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeError {
    /// The formatted payload would exceed the buffer.
    #[error("report payload exceeds buffer capacity")]
    PayloadOverflow,
}

/// Which check a payload reports against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    /// The pump alarm service check.
    Service,
    /// The host heartbeat check.
    Host,
}

/// Why a report went out. Carried for diagnostics; payload content does
/// not depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportTrigger {
    /// The contact changed state since the previous cycle.
    Transition,
    /// The periodic interval expired without a change.
    Periodic,
}

/// A single wire payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    /// Which check this result belongs to.
    pub kind: CheckKind,
    /// Ready-to-send JSON body.
    pub body: PayloadString,
}

/// The payloads one report trigger produces, in delivery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportBatch {
    /// What prompted the batch.
    pub trigger: ReportTrigger,
    /// Pump state result; absent only for the unknown state.
    pub service: Option<Payload>,
    /// Heartbeat, always present.
    pub heartbeat: Payload,
}

impl ReportBatch {
    /// Payloads in delivery order: service first, heartbeat second.
    pub fn into_payloads(self) -> impl Iterator<Item = Payload> {
        self.service.into_iter().chain(core::iter::once(self.heartbeat))
    }

    /// How many payloads the batch holds.
    pub fn len(&self) -> usize {
        if self.service.is_some() {
            2
        } else {
            1
        }
    }

    /// Whether the batch holds no payloads. Never true today; present to
    /// pair with [`len`](Self::len).
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Builds check-result payloads for one device identity.
#[derive(Debug, Clone)]
pub struct ReportComposer {
    identity: HostIdentity,
}

impl ReportComposer {
    /// Composer reporting under the given identity.
    pub fn new(identity: HostIdentity) -> Self {
        Self { identity }
    }

    /// Compose the payloads for one report trigger.
    ///
    /// The service result maps the pump state to plugin output and
    /// state; the unknown state yields no service result. The heartbeat
    /// always rides along.
    pub fn compose(
        &self,
        state: SensorState,
        trigger: ReportTrigger,
        uptime: Uptime,
        rssi_dbm: i32,
    ) -> Result<ReportBatch, ComposeError> {
        let service = match state {
            SensorState::Ok => Some(self.service_payload(SERVICE_OUTPUT_OK, PLUGIN_STATE_OK)?),
            SensorState::Fault => {
                Some(self.service_payload(SERVICE_OUTPUT_FAULT, PLUGIN_STATE_CRITICAL)?)
            }
            SensorState::Unknown => None,
        };

        Ok(ReportBatch {
            trigger,
            service,
            heartbeat: self.heartbeat_payload(uptime, rssi_dbm)?,
        })
    }

    fn service_payload(&self, output: &str, state: u8) -> Result<Payload, ComposeError> {
        let mut body = PayloadString::new();
        write!(
            body,
            "{{\"cmd\":\"{}\",\"host\":\"{}\",\"service\":\"{}\",\"plugin_output\":\"{}\",\"plugin_state\":{}}}",
            CMD_SERVICE_CHECK, self.identity.host, self.identity.service, output, state,
        )
        .map_err(|_| ComposeError::PayloadOverflow)?;

        Ok(Payload {
            kind: CheckKind::Service,
            body,
        })
    }

    fn heartbeat_payload(&self, uptime: Uptime, rssi_dbm: i32) -> Result<Payload, ComposeError> {
        let mut body = PayloadString::new();
        write!(
            body,
            "{{\"cmd\":\"{}\",\"host\":\"{}\",\"plugin_output\":\"OK - Uptime: {} | rssi={}, uptime={}\",\"plugin_state\":{}}}",
            CMD_HOST_CHECK, self.identity.host, uptime, rssi_dbm, uptime.total_secs(), PLUGIN_STATE_OK,
        )
        .map_err(|_| ComposeError::PayloadOverflow)?;

        Ok(Payload {
            kind: CheckKind::Host,
            body,
        })
    }
}
