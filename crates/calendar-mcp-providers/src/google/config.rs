//! Calendar gateway configuration.

use std::path::PathBuf;
use std::time::Duration;

use super::assertion::CALENDAR_READONLY_SCOPE;

/// Configuration for a [`CalendarGateway`](super::CalendarGateway).
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Path of the service-account JSON key.
    pub credentials_path: PathBuf,

    /// The one calendar this gateway reads. Defaults to `"primary"`.
    pub calendar_id: String,

    /// OAuth scopes to request.
    ///
    /// Defaults to `["https://www.googleapis.com/auth/calendar.readonly"]`.
    pub scopes: Vec<String>,

    /// HTTP request timeout.
    pub timeout: Duration,

    /// User agent string for API requests.
    pub user_agent: String,
}

impl GatewayConfig {
    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Calendar used when none is configured.
    pub const DEFAULT_CALENDAR_ID: &'static str = "primary";

    /// Creates a configuration reading the key at `credentials_path`.
    pub fn new(credentials_path: impl Into<PathBuf>) -> Self {
        Self {
            credentials_path: credentials_path.into(),
            calendar_id: Self::DEFAULT_CALENDAR_ID.to_string(),
            scopes: vec![CALENDAR_READONLY_SCOPE.to_string()],
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("calendar-mcp/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Sets the calendar id. A blank id falls back to `"primary"`.
    pub fn with_calendar_id(mut self, id: impl Into<String>) -> Self {
        let id = id.into();
        self.calendar_id = if id.trim().is_empty() {
            Self::DEFAULT_CALENDAR_ID.to_string()
        } else {
            id.trim().to_string()
        };
        self
    }

    /// Sets the OAuth scopes.
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.credentials_path.as_os_str().is_empty() {
            return Err("credentials path is required".to_string());
        }

        if self.scopes.is_empty() {
            return Err("at least one OAuth scope is required".to_string());
        }

        if self.timeout.is_zero() {
            return Err("timeout must be greater than zero".to_string());
        }

        Ok(())
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::new("service-account.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = GatewayConfig::default();
        assert_eq!(config.credentials_path, PathBuf::from("service-account.json"));
        assert_eq!(config.calendar_id, "primary");
        assert_eq!(
            config.scopes,
            vec!["https://www.googleapis.com/auth/calendar.readonly"]
        );
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("calendar-mcp/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_methods() {
        let config = GatewayConfig::new("/etc/calendar/key.json")
            .with_calendar_id("team@group.calendar.google.com")
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("custom/1.0");

        assert_eq!(config.calendar_id, "team@group.calendar.google.com");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "custom/1.0");
    }

    #[test]
    fn blank_calendar_id_falls_back_to_primary() {
        assert_eq!(GatewayConfig::default().with_calendar_id("").calendar_id, "primary");
        assert_eq!(GatewayConfig::default().with_calendar_id("   ").calendar_id, "primary");
    }

    #[test]
    fn validation() {
        assert!(GatewayConfig::new("").validate().is_err());
        assert!(GatewayConfig::default().with_scopes(vec![]).validate().is_err());
        assert!(
            GatewayConfig::default()
                .with_timeout(Duration::ZERO)
                .validate()
                .is_err()
        );
    }
}
