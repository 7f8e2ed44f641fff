//! Constants for Pumpguard Core
//!
//! This module centralizes every numeric and string constant used by the
//! monitor so there are no magic numbers scattered through the code. Each
//! constant documents its purpose and, where one exists, the external
//! convention it comes from.
//!
//! ## Organization
//!
//! Constants are grouped by domain:
//! - **Time units**: Conversion factors
//! - **Check identity**: Names the monitoring server knows the device by
//! - **Cadence**: Polling, reporting, and idle intervals
//! - **Operating window**: Hours during which reports are wanted
//! - **Network link**: Retry budget for link establishment
//! - **Clock sync**: NTP servers, timezone rule, trust threshold
//! - **Wire format**: Command strings and payload limits

// ===== TIME UNITS =====

/// Seconds per minute.
pub const SECS_PER_MINUTE: u64 = 60;

/// Seconds per hour.
pub const SECS_PER_HOUR: u64 = 3_600;

/// Seconds per day.
pub const SECS_PER_DAY: u64 = 86_400;

/// Minutes per day.
pub const MINUTES_PER_DAY: u16 = 1_440;

// ===== CHECK IDENTITY =====

/// Host name the monitoring server files results under.
pub const DEFAULT_HOST_NAME: &str = "kanal";

/// Service name for the pump alarm check on that host.
pub const DEFAULT_SERVICE_NAME: &str = "Pumpen Alarm";

/// Longest accepted host name, in bytes.
///
/// Together with [`MAX_SERVICE_NAME_LEN`] this caps the formatted payload
/// well below [`MAX_PAYLOAD_BYTES`], so composing a report cannot overflow
/// its buffer for any accepted configuration.
pub const MAX_HOST_NAME_LEN: usize = 32;

/// Longest accepted service name, in bytes.
pub const MAX_SERVICE_NAME_LEN: usize = 48;

// ===== CADENCE =====

/// Delay between poll cycles (milliseconds).
///
/// Fast enough that no contact closure is missed, slow enough to leave
/// the CPU idle. Independent of the reporting interval.
pub const POLL_INTERVAL_MS: u64 = 50;

/// Interval between unforced reports (seconds).
///
/// A report goes out this often even without a state change so the
/// monitoring server's freshness check stays green.
///
/// Source: check_interval of the server-side service definition
pub const REPORT_INTERVAL_S: u64 = 300;

/// Idle time per cycle while outside the operating window (seconds).
///
/// Minute resolution is plenty for deciding when the window reopens.
pub const DORMANT_IDLE_S: u64 = 60;

// ===== OPERATING WINDOW =====

/// Hour at which the reporting window opens.
pub const WINDOW_OPEN_HOUR: u8 = 6;

/// Minute past [`WINDOW_OPEN_HOUR`] at which the window opens.
pub const WINDOW_OPEN_MINUTE: u8 = 5;

/// Hour at which the reporting window closes (past midnight).
pub const WINDOW_CLOSE_HOUR: u8 = 0;

/// Minute past [`WINDOW_CLOSE_HOUR`] at which the window closes.
pub const WINDOW_CLOSE_MINUTE: u8 = 25;

// ===== NETWORK LINK =====

/// Attempts to find the link up before giving up as fatal.
pub const LINK_RETRY_ATTEMPTS: u32 = 30;

/// Delay between link checks (milliseconds).
///
/// 30 attempts at 500 ms gives the access point 15 s to come back
/// before the device restarts.
pub const LINK_RETRY_DELAY_MS: u64 = 500;

// ===== CLOCK SYNC =====

/// Interval between clock resync requests (seconds). Four hours.
pub const RESYNC_INTERVAL_S: u64 = 4 * SECS_PER_HOUR;

/// Longest wait for the clock to become trustworthy (seconds).
pub const SYNC_TIMEOUT_S: u64 = 30;

/// Delay between trust checks while waiting for sync (milliseconds).
pub const SYNC_POLL_DELAY_MS: u64 = 500;

/// Lowest epoch second a synced clock can plausibly report.
///
/// A clock still counting from power-on sits in January 1970; anything
/// below 16:00 UTC on day one is treated as unsynced.
pub const TRUSTED_EPOCH_MIN: i64 = 57_600;

/// Timezone rule for local time-of-day decisions.
///
/// Source: POSIX TZ string for Central European Time with EU DST rules
pub const TZ_SPEC: &str = "CET-1CEST,M3.5.0/2,M10.5.0/3";

/// NTP servers to sync against, in preference order.
pub const NTP_SERVERS: [&str; 3] = ["de.pool.ntp.org", "pool.ntp.org", "time.nist.gov"];

// ===== WIRE FORMAT =====

/// Command submitting a host check result.
///
/// Source: Naemon/Thruk external command names
pub const CMD_HOST_CHECK: &str = "PROCESS_HOST_CHECK_RESULT";

/// Command submitting a service check result.
pub const CMD_SERVICE_CHECK: &str = "PROCESS_SERVICE_CHECK_RESULT";

/// Plugin state for an OK result.
///
/// Source: Nagios plugin return codes
pub const PLUGIN_STATE_OK: u8 = 0;

/// Plugin state for a critical result.
pub const PLUGIN_STATE_CRITICAL: u8 = 2;

/// Service plugin output while the pump contact is open.
pub const SERVICE_OUTPUT_OK: &str = "OK";

/// Service plugin output while the pump contact is closed.
pub const SERVICE_OUTPUT_FAULT: &str = "FEHLER";

/// Request header carrying the monitoring server's API key.
///
/// Source: Thruk REST API authentication
pub const AUTH_KEY_HEADER: &str = "X-Thruk-Auth-Key";

/// Capacity of one formatted payload, in bytes.
///
/// The longest payload is the heartbeat: fixed JSON skeleton plus a
/// host name capped at [`MAX_HOST_NAME_LEN`] and formatted integers.
/// 256 bytes leaves slack over the worst case.
pub const MAX_PAYLOAD_BYTES: usize = 256;

/// Most effects one poll cycle can request.
///
/// Worst case is a resync plus a service report plus a heartbeat.
pub const MAX_EFFECTS_PER_CYCLE: usize = 4;
