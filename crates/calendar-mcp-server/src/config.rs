//! Server configuration.

use std::path::PathBuf;
use std::time::Duration;

use calendar_mcp_providers::GatewayConfig;

use crate::error::{ServerError, ServerResult};

/// Default location of the service-account key.
pub const DEFAULT_CREDENTIALS_FILE: &str = "service-account.json";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Path to the service-account JSON key.
    pub credentials_path: PathBuf,

    /// Calendar the calendar resources read.
    pub calendar_id: String,

    /// HTTP request timeout for calendar and token requests.
    pub request_timeout: Duration,

    /// Server name reported in the MCP handshake.
    pub name: String,

    /// Server version reported in the MCP handshake.
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            credentials_path: PathBuf::from(DEFAULT_CREDENTIALS_FILE),
            calendar_id: GatewayConfig::DEFAULT_CALENDAR_ID.to_string(),
            request_timeout: Duration::from_secs(GatewayConfig::DEFAULT_TIMEOUT_SECS),
            name: "calendar-mcp".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl ServerConfig {
    /// Creates a configuration reading the key at `credentials_path`.
    pub fn new(credentials_path: impl Into<PathBuf>) -> Self {
        Self {
            credentials_path: credentials_path.into(),
            ..Default::default()
        }
    }

    /// Builder: set calendar id.
    pub fn with_calendar_id(mut self, id: impl Into<String>) -> Self {
        self.calendar_id = id.into();
        self
    }

    /// Builder: set request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Builder: set the advertised server name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Gateway settings derived from this configuration.
    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig::new(&self.credentials_path)
            .with_calendar_id(&self.calendar_id)
            .with_timeout(self.request_timeout)
            .with_user_agent(format!("{}/{}", self.name, self.version))
    }

    /// Validates the configuration.
    ///
    /// The key file is not opened here: a missing file is reported when a
    /// calendar resource is first read.
    pub fn validate(&self) -> ServerResult<()> {
        self.gateway_config().validate().map_err(ServerError::config)
    }
}
