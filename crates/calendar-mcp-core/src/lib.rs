//! Core types: calendar events, time windows, tracing setup

pub mod event;
pub mod time;
pub mod tracing;

pub use event::{Attendee, CalendarEvent, EventTime, Organizer};
pub use time::{TimeWindow, start_of_day};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
