//! MCP server exposing Google Calendar events as read-only resources.
//!
//! This crate wires the calendar gateway into an MCP server speaking JSON-RPC
//! over stdio:
//! - [`ResourceRegistry`] holds the hello-world, today and weekly resources
//! - [`CalendarMcpServer`] answers `resources/list` and `resources/read`
//! - [`serve_stdio`] builds everything from a [`ServerConfig`] and runs it
//!
//! # Example
//!
//! ```rust,no_run
//! use calendar_mcp_server::{ServerConfig, serve_stdio};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::new("service-account.json")
//!         .with_calendar_id("team@group.calendar.google.com");
//!     serve_stdio(config).await?;
//!     Ok(())
//! }
//! ```

pub mod cli;
mod config;
mod envelope;
mod error;
mod handler;
mod resources;

pub use config::{DEFAULT_CREDENTIALS_FILE, ServerConfig};
pub use envelope::{EventsPayload, JSON_MIME_TYPE, ResourceEnvelope, format_timestamp};
pub use error::{ServerError, ServerResult};
pub use handler::{CalendarMcpServer, serve_stdio};
pub use resources::{
    CalendarQuery, CalendarResource, Customer, CustomerDirectory, HelloWorldResource, Resource,
    ResourceRegistry,
};
