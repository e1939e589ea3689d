//! Google Calendar access through a service account.
//!
//! This module provides a [`CalendarGateway`] bound to one calendar. It
//! authenticates with a service-account key instead of an interactive login.
//!
//! # Authentication Flow
//!
//! 1. Read the service-account JSON key from disk
//! 2. Sign a short-lived RS256 JWT assertion with the private key
//! 3. Exchange it at the token endpoint for an access token
//! 4. Re-sign and exchange again when the token is about to expire
//!
//! The first step runs lazily on the first query and exactly once, even when
//! several queries race. A failed attempt is forgotten, so the next query
//! tries again.
//!
//! # Example
//!
//! ```ignore
//! use calendar_mcp_providers::google::{CalendarGateway, GatewayConfig};
//!
//! let config = GatewayConfig::new("service-account.json")
//!     .with_calendar_id("team@example.com");
//!
//! let gateway = CalendarGateway::new(config)?;
//! let events = gateway.today_events().await?;
//! ```

mod assertion;
mod client;
mod config;
mod credentials;
mod gateway;
mod token;

pub use assertion::{
    AssertionClient, CALENDAR_READONLY_SCOPE, GoogleTokenEndpoint, JWT_BEARER_GRANT, TokenEndpoint,
    TokenGrant, sign_assertion,
};
pub use client::{EventsApi, GoogleCalendarClient};
pub use config::GatewayConfig;
pub use credentials::{DEFAULT_TOKEN_URI, ServiceAccountKey};
pub use gateway::{CalendarGateway, Clock};
pub use token::AccessToken;
