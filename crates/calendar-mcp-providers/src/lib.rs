//! Google Calendar gateway for calendar-mcp.
//!
//! This crate owns everything between a resource read and the calendar service:
//!
//! - [`EventSource`] - The seam the server's resource adapters call through
//! - [`CalendarGateway`] - Lazily authenticated access to one Google calendar
//! - [`RawEvent`] - Event records exactly as the Calendar API returns them
//! - [`normalize_event`] - Mapping from raw records to [`CalendarEvent`]
//! - [`ProviderError`] - The four-kind error taxonomy
//!
//! # Architecture
//!
//! ```text
//!   service-account.json
//!            │ ServiceAccountKey::from_file
//!            ▼
//!   ┌──────────────────┐  signed JWT   ┌───────────────┐
//!   │ AssertionClient  │──────────────▶│ TokenEndpoint │
//!   └────────┬─────────┘  access token └───────────────┘
//!            │
//!            ▼
//!   ┌──────────────────┐  events.list  ┌───────────────┐
//!   │ CalendarGateway  │──────────────▶│   EventsApi   │
//!   └────────┬─────────┘   RawEvent    └───────────────┘
//!            │ normalize_events()
//!            ▼
//!     Vec<CalendarEvent>
//! ```
//!
//! [`CalendarEvent`]: calendar_mcp_core::CalendarEvent

pub mod error;
pub mod google;
pub mod normalize;
pub mod provider;
pub mod raw_event;

// Re-export main types at crate root
pub use error::{ErrorKind, FetchFailure, ProviderError, ProviderResult};
pub use google::{CalendarGateway, GatewayConfig};
pub use normalize::{normalize_event, normalize_events};
pub use provider::{BoxFuture, EventSource};
pub use raw_event::{RawAttendee, RawEvent, RawEventList, RawEventTime, RawOrganizer};
