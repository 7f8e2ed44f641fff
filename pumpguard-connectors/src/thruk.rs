//! Thruk HTTP Connector - Passive Check Submission
//!
//! ## Overview
//!
//! Sends `PROCESS_SERVICE_CHECK_RESULT` and `PROCESS_HOST_CHECK_RESULT`
//! payloads to a Thruk REST endpoint, one HTTPS PUT per payload. Thruk
//! forwards them to Naemon as passive check results.
//!
//! ## Design Decisions
//!
//! The connector is intentionally thin:
//! - No retry and no queue. The monitor repeats the current state every
//!   reporting interval anyway, and the server's freshness check flags
//!   a device that stays silent.
//! - Any HTTP status counts as delivered. A 500 from Thruk still means
//!   the payload arrived; only transport-level failures are errors.
//! - One request per payload keeps memory flat on small hosts.
//!
//! ## Security
//!
//! - HTTPS with certificate verification through ureq's rustls stack
//! - API key in the `X-Thruk-Auth-Key` header, or HTTP basic auth for
//!   servers fronted by a classic htpasswd setup
//!
//! ## Example Usage
//!
//! ```
//! use pumpguard_connectors::thruk::{ThrukConfig, ThrukConnector};
//!
//! # fn main() -> Result<(), pumpguard_connectors::ThrukError> {
//! let connector = ThrukConnector::new(
//!     ThrukConfig::new("https://monitor.example.net/thruk/r/cmd").api_key("s3cr3t-key"),
//! )?;
//! # let _ = connector;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use thiserror::Error;

use pumpguard_core::constants::AUTH_KEY_HEADER;
use pumpguard_core::{Payload, SendError, Transport};

/// Errors from setting up the connector.
#[derive(Debug, Error)]
pub enum ThrukError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Connection settings for the Thruk command endpoint.
#[derive(Clone)]
pub struct ThrukConfig {
    /// Full URL of the command endpoint
    pub url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Authentication method
    pub auth: AuthMethod,
    /// User agent string
    pub user_agent: String,
}

/// Authentication methods
#[derive(Clone)]
pub enum AuthMethod {
    /// No authentication
    None,
    /// API key in the `X-Thruk-Auth-Key` header
    ApiKey(String),
    /// Basic authentication
    Basic {
        /// Login name
        username: String,
        /// Password
        password: String,
    },
}

impl ThrukConfig {
    /// Create new configuration for the given endpoint URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(10),
            auth: AuthMethod::None,
            user_agent: format!("Pumpguard/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Authenticate with a Thruk API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.auth = AuthMethod::ApiKey(key.into());
        self
    }

    /// Authenticate with HTTP basic auth.
    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = AuthMethod::Basic {
            username: username.into(),
            password: password.into(),
        };
        self
    }

    /// Set request timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }
}

/// Thruk connector using the lightweight ureq client.
pub struct ThrukConnector {
    config: ThrukConfig,
    agent: ureq::Agent,
}

impl ThrukConnector {
    /// Create new connector, validating the endpoint URL.
    pub fn new(config: ThrukConfig) -> Result<Self, ThrukError> {
        if !config.url.starts_with("http://") && !config.url.starts_with("https://") {
            return Err(ThrukError::Config(
                "URL must start with http:// or https://".into(),
            ));
        }

        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build();

        Ok(Self { config, agent })
    }

    /// PUT one payload body at the command endpoint.
    ///
    /// Returns the HTTP status for any answer the server gives, error
    /// codes included; only failures below HTTP come back as
    /// [`SendError`].
    pub fn put(&self, body: &str) -> Result<u16, SendError> {
        let mut request = self
            .agent
            .put(&self.config.url)
            .set("Content-Type", "application/json");

        match &self.config.auth {
            AuthMethod::None => {}
            AuthMethod::ApiKey(key) => {
                request = request.set(AUTH_KEY_HEADER, key);
            }
            AuthMethod::Basic { username, password } => {
                let credentials = STANDARD.encode(format!("{}:{}", username, password));
                request = request.set("Authorization", &format!("Basic {}", credentials));
            }
        }

        match request.send_string(body) {
            Ok(response) => {
                log::debug!("thruk answered {}", response.status());
                Ok(response.status())
            }
            Err(ureq::Error::Status(code, response)) => {
                log::debug!(
                    "thruk answered {}: {}",
                    code,
                    response.into_string().unwrap_or_default()
                );
                Ok(code)
            }
            Err(ureq::Error::Transport(transport)) => {
                log::warn!("thruk unreachable: {}", transport);
                Err(SendError::Transport {
                    reason: "http transport",
                })
            }
        }
    }
}

impl Transport for ThrukConnector {
    fn connected(&self) -> bool {
        // HTTP is stateless; reachability shows up per request.
        true
    }

    fn send(&mut self, payload: &Payload) -> Result<u16, SendError> {
        self.put(payload.body.as_str())
    }

    fn signal_strength(&self) -> i32 {
        // No radio on the host side.
        0
    }
}
