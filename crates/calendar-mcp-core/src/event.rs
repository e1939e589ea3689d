//! Event types for calendar events.
//!
//! This module provides the normalized shape that calendar queries return:
//! - [`CalendarEvent`]: a flat, provider-agnostic event record
//! - [`EventTime`]: a start or end time, either a timed instant or an all-day date
//! - [`Attendee`] and [`Organizer`]: the people attached to an event
//!
//! Times keep the exact string the calendar service sent. All-day events are
//! not converted into instants, so a consumer can still tell them apart from
//! timed events.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// The start or end of a calendar event.
///
/// Serializes to the same object shape the Google Calendar API uses:
/// `{"dateTime": "...", "timeZone": "..."}` for timed events and
/// `{"date": "YYYY-MM-DD"}` for all-day events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventTime {
    /// A specific instant, as an RFC 3339 string.
    DateTime {
        #[serde(rename = "dateTime")]
        date_time: String,
        /// IANA timezone the event was created in, if the service reported one.
        #[serde(rename = "timeZone", default, skip_serializing_if = "Option::is_none")]
        time_zone: Option<String>,
    },
    /// An all-day date, as `YYYY-MM-DD`.
    Date { date: String },
}

impl EventTime {
    /// Creates a timed event time from an RFC 3339 string.
    pub fn date_time(value: impl Into<String>) -> Self {
        Self::DateTime {
            date_time: value.into(),
            time_zone: None,
        }
    }

    /// Creates an all-day event time from a `YYYY-MM-DD` string.
    pub fn date(value: impl Into<String>) -> Self {
        Self::Date { date: value.into() }
    }

    /// Sets the source timezone. No effect on all-day times.
    pub fn with_time_zone(self, tz: impl Into<String>) -> Self {
        match self {
            Self::DateTime { date_time, .. } => Self::DateTime {
                date_time,
                time_zone: Some(tz.into()),
            },
            other => other,
        }
    }

    /// Returns `true` if this is an all-day date.
    pub fn is_all_day(&self) -> bool {
        matches!(self, Self::Date { .. })
    }

    /// Returns the raw ISO-8601 string, unmodified.
    pub fn as_str(&self) -> &str {
        match self {
            Self::DateTime { date_time, .. } => date_time,
            Self::Date { date } => date,
        }
    }

    /// Parses the raw string into an instant for comparison.
    ///
    /// All-day dates resolve to midnight UTC on that date.
    pub fn instant(&self) -> Result<DateTime<Utc>, chrono::ParseError> {
        match self {
            Self::DateTime { date_time, .. } => {
                DateTime::parse_from_rfc3339(date_time).map(|dt| dt.with_timezone(&Utc))
            }
            Self::Date { date } => NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .map(|d| d.and_time(chrono::NaiveTime::MIN).and_utc()),
        }
    }
}

/// An invited attendee of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    pub email: String,
    /// Upstream response status (`accepted`, `declined`, `tentative`, `needsAction`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_status: Option<String>,
}

impl Attendee {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            response_status: None,
        }
    }

    pub fn with_response_status(mut self, status: impl Into<String>) -> Self {
        self.response_status = Some(status.into());
        self
    }
}

/// The organizer of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organizer {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl Organizer {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

/// A normalized calendar event.
///
/// Built fresh for every query and discarded once serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    /// Upstream event identifier. Recurring instances get their own id.
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub start: EventTime,
    pub end: EventTime,
    #[serde(default)]
    pub attendees: Vec<Attendee>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer: Option<Organizer>,
    /// `confirmed`, `tentative` or `cancelled`.
    pub status: String,
    /// Link to the event in the calendar web UI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_link: Option<String>,
}

impl CalendarEvent {
    /// Creates an event with only the required fields set.
    pub fn new(
        id: impl Into<String>,
        start: EventTime,
        end: EventTime,
        status: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            summary: None,
            description: None,
            location: None,
            start,
            end,
            attendees: Vec::new(),
            organizer: None,
            status: status.into(),
            html_link: None,
        }
    }

    /// Returns `true` if this is an all-day event.
    pub fn is_all_day(&self) -> bool {
        self.start.is_all_day()
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_attendee(mut self, attendee: Attendee) -> Self {
        self.attendees.push(attendee);
        self
    }

    pub fn with_organizer(mut self, organizer: Organizer) -> Self {
        self.organizer = Some(organizer);
        self
    }

    pub fn with_html_link(mut self, link: impl Into<String>) -> Self {
        self.html_link = Some(link.into());
        self
    }
}
