//! The calendar gateway: one calendar, one lazily authenticated client.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use calendar_mcp_core::{CalendarEvent, TimeWindow};
use chrono::{DateTime, Local};
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info, warn};

use crate::error::{ProviderError, ProviderResult};
use crate::normalize::normalize_events;
use crate::provider::{BoxFuture, EventSource};

use super::assertion::{AssertionClient, GoogleTokenEndpoint, TokenEndpoint};
use super::client::{EventsApi, GoogleCalendarClient};
use super::config::GatewayConfig;
use super::credentials::ServiceAccountKey;

/// Source of "now" for window computation.
pub type Clock = fn() -> DateTime<Local>;

/// Authenticated, read-only access to one Google calendar.
///
/// The gateway starts unauthenticated. The first call to
/// [`authenticate`](Self::authenticate) or to a windowed query loads the key,
/// signs an assertion and keeps the resulting client for the rest of the
/// process. Concurrent first calls share a single attempt and all receive
/// its outcome. A failed attempt leaves the gateway unauthenticated, so the
/// next call made after it retries.
pub struct CalendarGateway {
    config: GatewayConfig,
    api: Arc<dyn EventsApi>,
    token_endpoint: Arc<dyn TokenEndpoint>,
    client: OnceCell<Arc<AssertionClient>>,
    /// Held for the duration of an attempt; keeps the last failure.
    auth_gate: Mutex<Option<FailedAttempt>>,
    finished_attempts: AtomicU64,
    clock: Clock,
}

/// Outcome of the most recent failed authentication attempt.
struct FailedAttempt {
    attempt: u64,
    error: ProviderError,
}

impl CalendarGateway {
    /// Creates a gateway talking to Google over HTTPS.
    ///
    /// Nothing is read from disk until the first query.
    pub fn new(config: GatewayConfig) -> ProviderResult<Self> {
        let api = GoogleCalendarClient::new(config.timeout, &config.user_agent)?;
        let token_endpoint = GoogleTokenEndpoint::new(config.timeout, &config.user_agent)?;
        Ok(Self::with_backends(
            config,
            Arc::new(api),
            Arc::new(token_endpoint),
        ))
    }

    /// Creates a gateway over the given upstream implementations.
    pub fn with_backends(
        config: GatewayConfig,
        api: Arc<dyn EventsApi>,
        token_endpoint: Arc<dyn TokenEndpoint>,
    ) -> Self {
        Self {
            config,
            api,
            token_endpoint,
            client: OnceCell::new(),
            auth_gate: Mutex::new(None),
            finished_attempts: AtomicU64::new(0),
            clock: Local::now,
        }
    }

    /// Replaces the wall clock used to compute query windows.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// The calendar this gateway reads.
    pub fn calendar_id(&self) -> &str {
        &self.config.calendar_id
    }

    /// Returns true once a client has been established.
    pub fn is_authenticated(&self) -> bool {
        self.client.initialized()
    }

    /// Establishes the authenticated client if it does not exist yet.
    ///
    /// # Errors
    ///
    /// `CredentialRead` or `CredentialParse` if the key file is unusable,
    /// `Authentication` if the assertion cannot be signed or is rejected.
    pub async fn authenticate(&self) -> ProviderResult<()> {
        self.client().await.map(|_| ())
    }

    /// Events from local midnight today to the next local midnight.
    pub async fn today_events(&self) -> ProviderResult<Vec<CalendarEvent>> {
        let window = TimeWindow::today(&(self.clock)());
        self.events_in(&window).await
    }

    /// Events from local midnight today to local midnight seven days later.
    pub async fn week_events(&self) -> ProviderResult<Vec<CalendarEvent>> {
        let window = TimeWindow::week(&(self.clock)());
        self.events_in(&window).await
    }

    /// Events of the configured calendar intersecting `window`, in upstream
    /// order.
    pub async fn events_in(&self, window: &TimeWindow) -> ProviderResult<Vec<CalendarEvent>> {
        let client = self.client().await?;
        let access_token = client.access_token().await?;

        debug!(
            calendar_id = %self.config.calendar_id,
            time_min = %window.time_min(),
            time_max = %window.time_max(),
            "listing events"
        );

        let list = self
            .api
            .list_events(&access_token, &self.config.calendar_id, window)
            .await?;

        if list.next_page_token.is_some() {
            debug!("more events than fit in one page, returning the first page only");
        }

        let events = normalize_events(&list.items)?;
        info!(
            calendar_id = %self.config.calendar_id,
            time_zone = list.time_zone.as_deref().unwrap_or("-"),
            count = events.len(),
            "fetched events"
        );
        Ok(events)
    }

    async fn client(&self) -> ProviderResult<Arc<AssertionClient>> {
        if let Some(client) = self.client.get() {
            return Ok(Arc::clone(client));
        }

        let arrived_after = self.finished_attempts.load(Ordering::Acquire);
        let mut last_failure = self.auth_gate.lock().await;
        if let Some(client) = self.client.get() {
            return Ok(Arc::clone(client));
        }
        // An attempt finished while this caller waited on the gate
        if let Some(failed) = (*last_failure)
            .as_ref()
            .filter(|failed| failed.attempt > arrived_after)
        {
            debug!(attempt = failed.attempt, "sharing failed authentication attempt");
            return Err(failed.error.clone());
        }

        let result = self.connect().await;
        let attempt = self.finished_attempts.fetch_add(1, Ordering::AcqRel) + 1;
        match result {
            Ok(client) => {
                let _ = self.client.set(Arc::clone(&client));
                *last_failure = None;
                Ok(client)
            }
            Err(error) => {
                *last_failure = Some(FailedAttempt {
                    attempt,
                    error: error.clone(),
                });
                Err(error)
            }
        }
    }

    async fn connect(&self) -> ProviderResult<Arc<AssertionClient>> {
        let key = ServiceAccountKey::from_file(&self.config.credentials_path)?;
        info!(
            client_email = %key.client_email,
            project_id = key.project_id.as_deref().unwrap_or("-"),
            calendar_id = %self.config.calendar_id,
            "authenticating with service account"
        );

        let client = AssertionClient::connect(
            key,
            self.config.scopes.clone(),
            Arc::clone(&self.token_endpoint),
        )
        .await
        .inspect_err(|e| warn!(error = %e, "authentication failed"))?;

        let client = Arc::new(client);
        self.spawn_probe(Arc::clone(&client));
        Ok(client)
    }

    /// Looks up the calendar's display name in the background and logs it.
    fn spawn_probe(&self, client: Arc<AssertionClient>) {
        let api = Arc::clone(&self.api);
        let calendar_id = self.config.calendar_id.clone();

        tokio::spawn(async move {
            let result = match client.access_token().await {
                Ok(token) => api.calendar_summary(&token, &calendar_id).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(summary) => info!(
                    calendar_id = %calendar_id,
                    summary = summary.as_deref().unwrap_or("(unnamed)"),
                    "connected to calendar"
                ),
                Err(e) => warn!(calendar_id = %calendar_id, error = %e, "calendar lookup failed"),
            }
        });
    }
}

impl std::fmt::Debug for CalendarGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalendarGateway")
            .field("calendar_id", &self.config.calendar_id)
            .field("credentials_path", &self.config.credentials_path)
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

impl EventSource for CalendarGateway {
    fn name(&self) -> &str {
        "google"
    }

    fn today_events(&self) -> BoxFuture<'_, ProviderResult<Vec<CalendarEvent>>> {
        Box::pin(CalendarGateway::today_events(self))
    }

    fn week_events(&self) -> BoxFuture<'_, ProviderResult<Vec<CalendarEvent>>> {
        Box::pin(CalendarGateway::week_events(self))
    }
}
