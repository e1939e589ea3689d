//! Command-line interface definition.

use std::path::PathBuf;
use std::time::Duration;

use calendar_mcp_core::{TracingConfig, TracingOutputFormat};
use clap::{Parser, ValueEnum};

use crate::config::ServerConfig;

/// calendar-mcp - Google Calendar resources for MCP clients over stdio
#[derive(Debug, Parser)]
#[command(name = "calendar-mcp")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the service-account JSON key
    #[arg(
        long,
        env = "GOOGLE_SERVICE_ACCOUNT_FILE",
        default_value = crate::config::DEFAULT_CREDENTIALS_FILE
    )]
    pub credentials_file: PathBuf,

    /// Calendar to read (an email-like id, or "primary")
    #[arg(long, env = "GOOGLE_CALENDAR_ID", default_value = "primary")]
    pub calendar_id: String,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Log output format (logs go to stderr)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormat> for TracingOutputFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Pretty => TracingOutputFormat::Pretty,
            LogFormat::Compact => TracingOutputFormat::Compact,
            LogFormat::Json => TracingOutputFormat::Json,
        }
    }
}

impl Cli {
    /// Server configuration from the parsed arguments.
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig::new(&self.credentials_file)
            .with_calendar_id(&self.calendar_id)
            .with_request_timeout(Duration::from_secs(self.timeout))
    }

    /// Tracing configuration from the parsed arguments.
    pub fn tracing_config(&self) -> TracingConfig {
        let config = if self.debug {
            TracingConfig::debug()
        } else {
            TracingConfig::default()
        };
        config.with_format(self.log_format.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn explicit_arguments() {
        let cli = Cli::try_parse_from([
            "calendar-mcp",
            "--credentials-file",
            "/secrets/key.json",
            "--calendar-id",
            "team@group.calendar.google.com",
            "--timeout",
            "5",
            "--log-format",
            "json",
            "-v",
        ])
        .unwrap();

        let config = cli.server_config();
        assert_eq!(config.credentials_path, PathBuf::from("/secrets/key.json"));
        assert_eq!(config.calendar_id, "team@group.calendar.google.com");
        assert_eq!(config.request_timeout, Duration::from_secs(5));

        let tracing = cli.tracing_config();
        assert_eq!(tracing.default_level, Level::DEBUG);
        assert_eq!(tracing.output_format, TracingOutputFormat::Json);
    }

    #[test]
    fn rejects_unknown_log_format() {
        assert!(Cli::try_parse_from(["calendar-mcp", "--log-format", "xml"]).is_err());
    }

    #[test]
    fn log_format_mapping() {
        assert_eq!(
            TracingOutputFormat::from(LogFormat::Pretty),
            TracingOutputFormat::Pretty
        );
        assert_eq!(
            TracingOutputFormat::from(LogFormat::Compact),
            TracingOutputFormat::Compact
        );
    }
}
