//! Resource adapters.
//!
//! Each resource is a fixed pairing of URI, title, description and query.
//! Reading a resource never fails: calendar errors are logged and turned
//! into a degraded envelope with an empty event list and an error marker.
//!
//! | URI | body |
//! |---|---|
//! | `resource://hello-world` | `{"customers": [...]}` |
//! | `resource://today-calendar` | events from local midnight to the next local midnight |
//! | `resource://weekly-calendar` | events from local midnight to seven days later |

use std::sync::Arc;

use calendar_mcp_core::CalendarEvent;
use calendar_mcp_providers::{BoxFuture, EventSource, ProviderResult};
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, error};

use crate::envelope::{EventsPayload, JSON_MIME_TYPE, ResourceEnvelope};

/// A read-only, URI-addressed resource.
pub trait Resource: Send + Sync {
    fn uri(&self) -> &str;

    /// Human-readable title.
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn mime_type(&self) -> &str {
        JSON_MIME_TYPE
    }

    /// Reads the resource. Always returns exactly one envelope.
    fn read(&self) -> BoxFuture<'_, Vec<ResourceEnvelope>>;
}

/// Which window a calendar resource reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarQuery {
    Today,
    Week,
}

impl CalendarQuery {
    pub fn uri(&self) -> &'static str {
        match self {
            Self::Today => "resource://today-calendar",
            Self::Week => "resource://weekly-calendar",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Today => "Today's Calendar Events",
            Self::Week => "Weekly Calendar Events",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Today => "Returns events scheduled for today from Google Calendar",
            Self::Week => "Returns events scheduled for the next 7 days from Google Calendar",
        }
    }

    /// The error marker placed in a degraded envelope.
    pub fn error_message(&self) -> &'static str {
        match self {
            Self::Today => "Failed to fetch calendar events",
            Self::Week => "Failed to fetch calendar events for the next 7 days",
        }
    }
}

/// A calendar resource bound to one query of an [`EventSource`].
pub struct CalendarResource {
    query: CalendarQuery,
    source: Arc<dyn EventSource>,
}

impl CalendarResource {
    pub fn new(query: CalendarQuery, source: Arc<dyn EventSource>) -> Self {
        Self { query, source }
    }

    pub fn today(source: Arc<dyn EventSource>) -> Self {
        Self::new(CalendarQuery::Today, source)
    }

    pub fn week(source: Arc<dyn EventSource>) -> Self {
        Self::new(CalendarQuery::Week, source)
    }

    pub fn query(&self) -> CalendarQuery {
        self.query
    }

    async fn fetch(&self) -> ProviderResult<Vec<CalendarEvent>> {
        match self.query {
            CalendarQuery::Today => self.source.today_events().await,
            CalendarQuery::Week => self.source.week_events().await,
        }
    }
}

impl Resource for CalendarResource {
    fn uri(&self) -> &str {
        self.query.uri()
    }

    fn name(&self) -> &str {
        self.query.name()
    }

    fn description(&self) -> &str {
        self.query.description()
    }

    fn read(&self) -> BoxFuture<'_, Vec<ResourceEnvelope>> {
        Box::pin(async move {
            let payload = match self.fetch().await {
                Ok(events) => {
                    debug!(uri = self.uri(), count = events.len(), "read calendar resource");
                    EventsPayload::events(events, Utc::now())
                }
                Err(e) => {
                    error!(
                        uri = self.uri(),
                        source = self.source.name(),
                        kind = %e.kind(),
                        error = %e,
                        "error fetching events"
                    );
                    EventsPayload::failed(self.query.error_message(), Utc::now())
                }
            };
            vec![ResourceEnvelope::json(self.uri(), payload.to_json())]
        })
    }
}

/// A customer record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Customer {
    pub id: u64,
    pub name: String,
}

impl Customer {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// In-process customer store backing the hello-world resource.
#[derive(Debug, Clone, Default)]
pub struct CustomerDirectory {
    customers: Vec<Customer>,
}

impl CustomerDirectory {
    pub fn new(customers: Vec<Customer>) -> Self {
        Self { customers }
    }

    /// The single demo customer.
    pub fn sample() -> Self {
        Self::new(vec![Customer::new(1, "John Doe")])
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }
}

#[derive(Serialize)]
struct CustomersPayload<'a> {
    customers: &'a [Customer],
}

/// Demo resource listing the customer directory.
#[derive(Debug, Clone)]
pub struct HelloWorldResource {
    directory: CustomerDirectory,
}

impl HelloWorldResource {
    pub const URI: &'static str = "resource://hello-world";

    pub fn new(directory: CustomerDirectory) -> Self {
        Self { directory }
    }
}

impl Default for HelloWorldResource {
    fn default() -> Self {
        Self::new(CustomerDirectory::sample())
    }
}

impl Resource for HelloWorldResource {
    fn uri(&self) -> &str {
        Self::URI
    }

    fn name(&self) -> &str {
        "Hello World"
    }

    fn description(&self) -> &str {
        "Hello World Resource"
    }

    fn read(&self) -> BoxFuture<'_, Vec<ResourceEnvelope>> {
        Box::pin(async move {
            let payload = CustomersPayload {
                customers: self.directory.customers(),
            };
            let text = serde_json::to_string(&payload).unwrap_or_else(|e| {
                error!(error = %e, "failed to serialize customers");
                r#"{"customers":[]}"#.to_string()
            });
            vec![ResourceEnvelope::json(Self::URI, text)]
        })
    }
}

/// The set of resources a server exposes, in listing order.
#[derive(Clone, Default)]
pub struct ResourceRegistry {
    resources: Vec<Arc<dyn Resource>>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The three standard resources: hello-world, today, weekly.
    pub fn standard(source: Arc<dyn EventSource>) -> Self {
        Self::new()
            .with(HelloWorldResource::default())
            .with(CalendarResource::today(Arc::clone(&source)))
            .with(CalendarResource::week(source))
    }

    /// Adds a resource, replacing any with the same URI.
    pub fn with(mut self, resource: impl Resource + 'static) -> Self {
        self.register(Arc::new(resource));
        self
    }

    pub fn register(&mut self, resource: Arc<dyn Resource>) {
        self.resources.retain(|r| r.uri() != resource.uri());
        self.resources.push(resource);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Resource>> {
        self.resources.iter()
    }

    pub fn get(&self, uri: &str) -> Option<&Arc<dyn Resource>> {
        self.resources.iter().find(|r| r.uri() == uri)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Reads the resource at `uri`, or `None` if nothing is registered there.
    pub async fn read(&self, uri: &str) -> Option<Vec<ResourceEnvelope>> {
        match self.get(uri) {
            Some(resource) => Some(resource.read().await),
            None => None,
        }
    }
}

impl std::fmt::Debug for ResourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.resources.iter().map(|r| r.uri()))
            .finish()
    }
}
