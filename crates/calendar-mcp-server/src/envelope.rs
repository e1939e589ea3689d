//! Resource envelopes: what a resource read hands back to the MCP host.

use calendar_mcp_core::CalendarEvent;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// MIME type of every resource body.
pub const JSON_MIME_TYPE: &str = "application/json";

/// One read result: a fixed URI, a content type and a serialized JSON body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceEnvelope {
    pub uri: String,
    pub mime_type: String,
    pub text: String,
}

impl ResourceEnvelope {
    /// Wraps an already serialized JSON body.
    pub fn json(uri: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            mime_type: JSON_MIME_TYPE.to_string(),
            text: text.into(),
        }
    }
}

/// Body of a calendar resource.
///
/// `count` always equals `events.len()`. On failure `events` is empty and
/// `error` carries a fixed message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventsPayload {
    pub events: Vec<CalendarEvent>,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Construction time, ISO-8601 UTC with milliseconds.
    pub timestamp: String,
}

impl EventsPayload {
    /// A successful payload.
    pub fn events(events: Vec<CalendarEvent>, now: DateTime<Utc>) -> Self {
        Self {
            count: events.len(),
            events,
            error: None,
            timestamp: format_timestamp(now),
        }
    }

    /// A degraded payload: no events, an error marker.
    pub fn failed(error: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            events: Vec::new(),
            count: 0,
            error: Some(error.into()),
            timestamp: format_timestamp(now),
        }
    }

    /// Returns true if this is a degraded payload.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Serializes the payload.
    ///
    /// Falls back to a degraded body if the events cannot be serialized.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to serialize events payload");
            serde_json::json!({
                "events": [],
                "count": 0,
                "error": "Failed to serialize calendar events",
                "timestamp": self.timestamp,
            })
            .to_string()
        })
    }
}

/// `2025-02-05T15:00:00.000Z`
pub fn format_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}
