//! EventSource trait definition.
//!
//! [`EventSource`] is the seam between the MCP resources and the calendar
//! backend. The server only ever asks two questions: what is on the calendar
//! today, and what is on it over the next seven days.

use std::future::Future;
use std::pin::Pin;

use calendar_mcp_core::CalendarEvent;

use crate::error::ProviderResult;

/// A boxed future for async trait methods.
///
/// Boxed futures keep the trait object-safe, so the server can hold an
/// `Arc<dyn EventSource>`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A source of normalized calendar events.
///
/// Implementations authenticate lazily on first use and must be safe to call
/// from concurrent resource reads.
///
/// # Example Implementation
///
/// ```ignore
/// struct FixedSource(Vec<CalendarEvent>);
///
/// impl EventSource for FixedSource {
///     fn name(&self) -> &str { "fixed" }
///
///     fn today_events(&self) -> BoxFuture<'_, ProviderResult<Vec<CalendarEvent>>> {
///         Box::pin(async move { Ok(self.0.clone()) })
///     }
///
///     fn week_events(&self) -> BoxFuture<'_, ProviderResult<Vec<CalendarEvent>>> {
///         Box::pin(async move { Ok(self.0.clone()) })
///     }
/// }
/// ```
pub trait EventSource: Send + Sync {
    /// Returns the name of this source (e.g., "google").
    fn name(&self) -> &str;

    /// Events intersecting local midnight today up to the next local midnight.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` if credentials cannot be loaded, authentication
    /// fails, or the upstream query fails. Partial results are never returned.
    fn today_events(&self) -> BoxFuture<'_, ProviderResult<Vec<CalendarEvent>>>;

    /// Events intersecting local midnight today up to local midnight seven
    /// days later.
    ///
    /// # Errors
    ///
    /// Same as [`EventSource::today_events`].
    fn week_events(&self) -> BoxFuture<'_, ProviderResult<Vec<CalendarEvent>>>;
}
