//! Google Calendar API client.
//!
//! Low-level HTTP access to the two endpoints the gateway uses: the events
//! list of one calendar, and that calendar's entry in the caller's calendar
//! list.

use std::time::Duration;

use calendar_mcp_core::TimeWindow;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use crate::error::{FetchFailure, ProviderError, ProviderResult};
use crate::provider::BoxFuture;
use crate::raw_event::RawEventList;

/// Base URL for Google Calendar API v3.
const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Upstream calendar operations the gateway depends on.
pub trait EventsApi: Send + Sync {
    /// Lists events of `calendar_id` intersecting `window`, recurring events
    /// expanded and ordered by start time. Returns the first page only.
    fn list_events<'a>(
        &'a self,
        access_token: &'a str,
        calendar_id: &'a str,
        window: &'a TimeWindow,
    ) -> BoxFuture<'a, ProviderResult<RawEventList>>;

    /// Looks up the display name of `calendar_id`.
    fn calendar_summary<'a>(
        &'a self,
        access_token: &'a str,
        calendar_id: &'a str,
    ) -> BoxFuture<'a, ProviderResult<Option<String>>>;
}

/// [`EventsApi`] over HTTPS.
#[derive(Debug, Clone)]
pub struct GoogleCalendarClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl GoogleCalendarClient {
    pub fn new(timeout: Duration, user_agent: &str) -> ProviderResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| {
                ProviderError::network(format!("failed to create HTTP client: {}", e))
                    .with_source(e)
            })?;

        Ok(Self {
            http_client,
            base_url: CALENDAR_API_BASE.to_string(),
        })
    }

    /// Points the client at another API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn events_url(&self, calendar_id: &str) -> String {
        format!(
            "{}/calendars/{}/events",
            self.base_url,
            urlencoding::encode(calendar_id)
        )
    }

    fn calendar_list_url(&self, calendar_id: &str) -> String {
        format!(
            "{}/users/me/calendarList/{}",
            self.base_url,
            urlencoding::encode(calendar_id)
        )
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        access_token: &str,
        query: &[(&str, String)],
    ) -> ProviderResult<T> {
        let response = self
            .http_client
            .get(url)
            .bearer_auth(access_token)
            .query(query)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        debug!(status = %status, url, "calendar API response");

        let body = response.text().await.map_err(|e| {
            ProviderError::network(format!("failed to read response: {}", e)).with_source(e)
        })?;

        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            ProviderError::invalid_response(format!("failed to parse response: {}", e))
                .with_source(e)
        })
    }
}

impl EventsApi for GoogleCalendarClient {
    fn list_events<'a>(
        &'a self,
        access_token: &'a str,
        calendar_id: &'a str,
        window: &'a TimeWindow,
    ) -> BoxFuture<'a, ProviderResult<RawEventList>> {
        Box::pin(async move {
            let url = self.events_url(calendar_id);
            self.get_json(&url, access_token, &events_query(window))
                .await
        })
    }

    fn calendar_summary<'a>(
        &'a self,
        access_token: &'a str,
        calendar_id: &'a str,
    ) -> BoxFuture<'a, ProviderResult<Option<String>>> {
        Box::pin(async move {
            let url = self.calendar_list_url(calendar_id);
            let entry: CalendarListEntry = self.get_json(&url, access_token, &[]).await?;
            Ok(entry.summary_override.or(entry.summary))
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalendarListEntry {
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    summary_override: Option<String>,
}

/// Query parameters for one windowed events request.
fn events_query(window: &TimeWindow) -> Vec<(&'static str, String)> {
    vec![
        ("timeMin", window.time_min()),
        ("timeMax", window.time_max()),
        ("singleEvents", "true".to_string()),
        ("orderBy", "startTime".to_string()),
    ]
}

fn request_error(e: reqwest::Error) -> ProviderError {
    let message = if e.is_timeout() {
        "request timeout".to_string()
    } else if e.is_connect() {
        format!("connection failed: {}", e)
    } else {
        format!("request failed: {}", e)
    };
    ProviderError::network(message).with_source(e)
}

/// Classifies a non-success response.
fn status_error(status: StatusCode, body: &str) -> ProviderError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => {
            ProviderError::fetch(FetchFailure::RateLimited, "rate limit exceeded")
        }
        // Calendar reports quota exhaustion as 403
        StatusCode::FORBIDDEN
            if body.contains("rateLimitExceeded") || body.contains("quotaExceeded") =>
        {
            ProviderError::fetch(FetchFailure::RateLimited, "quota exceeded")
        }
        StatusCode::FORBIDDEN => ProviderError::fetch(
            FetchFailure::Forbidden,
            "access denied to calendar; share it with the service account",
        ),
        StatusCode::UNAUTHORIZED => ProviderError::fetch(
            FetchFailure::Unauthorized,
            "access token expired or invalid",
        ),
        StatusCode::NOT_FOUND => ProviderError::fetch(FetchFailure::NotFound, "calendar not found"),
        _ => ProviderError::fetch(
            FetchFailure::Server,
            format!("API error ({}): {}", status, body),
        ),
    }
}
