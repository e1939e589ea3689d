//! RawEvent to CalendarEvent conversion.
//!
//! Normalization is strict: a record the gateway cannot make sense of fails
//! the whole batch with [`FetchFailure::InvalidResponse`] rather than being
//! silently dropped. Order and length are preserved, cancelled events
//! included.
//!
//! [`FetchFailure::InvalidResponse`]: crate::error::FetchFailure::InvalidResponse

use calendar_mcp_core::{Attendee, CalendarEvent, EventTime, Organizer};

use crate::error::{ProviderError, ProviderResult};
use crate::raw_event::{RawAttendee, RawEvent, RawEventTime, RawOrganizer};

/// Status used when upstream omits one.
pub const DEFAULT_STATUS: &str = "confirmed";

/// Converts a [`RawEvent`] to a [`CalendarEvent`].
///
/// # Errors
///
/// Fails when the id, start or end is missing, when a time does not parse,
/// when start and end disagree on being all-day, or when start is after end.
pub fn normalize_event(raw: &RawEvent) -> ProviderResult<CalendarEvent> {
    let id = raw
        .id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ProviderError::invalid_response("event without an id"))?;

    let start = convert_time(id, "start", raw.start.as_ref())?;
    let end = convert_time(id, "end", raw.end.as_ref())?;

    if start.is_all_day() != end.is_all_day() {
        return Err(ProviderError::invalid_response(format!(
            "event {id}: start and end mix all-day and timed values"
        )));
    }

    let start_at = start.instant().map_err(|e| {
        ProviderError::invalid_response(format!("event {id}: bad start '{}'", start.as_str()))
            .with_source(e)
    })?;
    let end_at = end.instant().map_err(|e| {
        ProviderError::invalid_response(format!("event {id}: bad end '{}'", end.as_str()))
            .with_source(e)
    })?;
    if start_at > end_at {
        return Err(ProviderError::invalid_response(format!(
            "event {id}: start is after end"
        )));
    }

    let status = raw.status.as_deref().unwrap_or(DEFAULT_STATUS);
    let mut event = CalendarEvent::new(id, start, end, status);
    event.summary = raw.summary.clone();
    event.description = raw.description.clone();
    event.location = raw.location.clone();
    event.html_link = raw.html_link.clone();
    event.organizer = raw.organizer.as_ref().and_then(convert_organizer);
    event.attendees = raw
        .attendees
        .iter()
        .flatten()
        .filter_map(convert_attendee)
        .collect();

    Ok(event)
}

/// Normalizes a batch, failing on the first bad record.
pub fn normalize_events(raw_events: &[RawEvent]) -> ProviderResult<Vec<CalendarEvent>> {
    raw_events.iter().map(normalize_event).collect()
}

fn convert_time(id: &str, which: &str, raw: Option<&RawEventTime>) -> ProviderResult<EventTime> {
    let raw = raw.ok_or_else(|| {
        ProviderError::invalid_response(format!("event {id}: missing {which} time"))
    })?;

    // dateTime wins when upstream sends both
    match (&raw.date_time, &raw.date) {
        (Some(dt), _) => {
            let time = EventTime::date_time(dt);
            Ok(match &raw.time_zone {
                Some(tz) => time.with_time_zone(tz),
                None => time,
            })
        }
        (None, Some(date)) => Ok(EventTime::date(date)),
        (None, None) => Err(ProviderError::invalid_response(format!(
            "event {id}: {which} has neither dateTime nor date"
        ))),
    }
}

fn convert_attendee(raw: &RawAttendee) -> Option<Attendee> {
    let email = raw.email.as_deref().filter(|e| !e.is_empty())?;
    let mut attendee = Attendee::new(email);
    attendee.response_status = raw.response_status.clone();
    Some(attendee)
}

fn convert_organizer(raw: &RawOrganizer) -> Option<Organizer> {
    let email = raw.email.as_deref().filter(|e| !e.is_empty())?;
    let mut organizer = Organizer::new(email);
    organizer.display_name = raw.display_name.clone();
    Some(organizer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, FetchFailure};

    fn timed(id: &str, start: &str, end: &str) -> RawEvent {
        RawEvent::new(id, RawEventTime::date_time(start), RawEventTime::date_time(end))
    }

    fn assert_invalid(result: ProviderResult<CalendarEvent>) {
        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EventFetch);
        assert_eq!(err.failure(), Some(FetchFailure::InvalidResponse));
    }

    mod basic_normalization {
        use super::*;

        #[test]
        fn normalizes_minimal_event() {
            let raw = timed("evt-1", "2025-02-05T10:00:00Z", "2025-02-05T11:00:00Z");
            let event = normalize_event(&raw).unwrap();

            assert_eq!(event.id, "evt-1");
            assert_eq!(event.status, "confirmed");
            assert_eq!(event.start, EventTime::date_time("2025-02-05T10:00:00Z"));
            assert!(event.summary.is_none());
            assert!(event.attendees.is_empty());
            assert!(event.organizer.is_none());
        }

        #[test]
        fn copies_optional_fields() {
            let raw = timed("evt-2", "2025-02-05T10:00:00+01:00", "2025-02-05T11:00:00+01:00")
                .with_status("tentative")
                .with_summary("Review")
                .with_description("Quarterly numbers")
                .with_location("Room 4")
                .with_html_link("https://calendar.google.com/event?eid=evt-2")
                .with_attendee(RawAttendee::new("a@example.com").with_response_status("accepted"))
                .with_organizer(RawOrganizer::new("boss@example.com").with_display_name("Boss"));

            let event = normalize_event(&raw).unwrap();
            assert_eq!(event.status, "tentative");
            assert_eq!(event.summary.as_deref(), Some("Review"));
            assert_eq!(event.description.as_deref(), Some("Quarterly numbers"));
            assert_eq!(event.location.as_deref(), Some("Room 4"));
            assert_eq!(
                event.html_link.as_deref(),
                Some("https://calendar.google.com/event?eid=evt-2")
            );
            assert_eq!(
                event.attendees,
                vec![Attendee::new("a@example.com").with_response_status("accepted")]
            );
            assert_eq!(
                event.organizer,
                Some(Organizer::new("boss@example.com").with_display_name("Boss"))
            );
        }

        #[test]
        fn keeps_time_zone_and_raw_offset() {
            let mut raw = timed("evt-3", "2025-02-05T10:00:00-05:00", "2025-02-05T10:30:00-05:00");
            raw.start = raw.start.map(|t| t.with_time_zone("America/New_York"));

            let event = normalize_event(&raw).unwrap();
            assert_eq!(
                event.start,
                EventTime::date_time("2025-02-05T10:00:00-05:00").with_time_zone("America/New_York")
            );
            assert_eq!(event.end.as_str(), "2025-02-05T10:30:00-05:00");
        }

        #[test]
        fn all_day_event_stays_a_date() {
            let raw = RawEvent::new(
                "holiday",
                RawEventTime::date("2025-02-05"),
                RawEventTime::date("2025-02-06"),
            );
            let event = normalize_event(&raw).unwrap();
            assert!(event.is_all_day());
            assert_eq!(event.start, EventTime::date("2025-02-05"));
            assert_eq!(event.end, EventTime::date("2025-02-06"));
        }

        #[test]
        fn zero_length_event_is_valid() {
            let raw = timed("reminder", "2025-02-05T10:00:00Z", "2025-02-05T10:00:00Z");
            assert!(normalize_event(&raw).is_ok());
        }
    }

    mod people {
        use super::*;

        #[test]
        fn drops_attendees_without_email() {
            let raw = timed("evt", "2025-02-05T10:00:00Z", "2025-02-05T11:00:00Z")
                .with_attendee(RawAttendee::new("a@example.com"))
                .with_attendee(RawAttendee {
                    display_name: Some("Room 4".into()),
                    ..RawAttendee::default()
                })
                .with_attendee(RawAttendee::new("b@example.com"));

            let event = normalize_event(&raw).unwrap();
            let emails: Vec<_> = event.attendees.iter().map(|a| a.email.as_str()).collect();
            assert_eq!(emails, ["a@example.com", "b@example.com"]);
        }

        #[test]
        fn organizer_without_email_is_dropped() {
            let raw = timed("evt", "2025-02-05T10:00:00Z", "2025-02-05T11:00:00Z").with_organizer(
                RawOrganizer {
                    email: None,
                    display_name: Some("Someone".into()),
                },
            );
            assert!(normalize_event(&raw).unwrap().organizer.is_none());
        }
    }

    mod rejection {
        use super::*;

        #[test]
        fn missing_id() {
            let mut raw = timed("x", "2025-02-05T10:00:00Z", "2025-02-05T11:00:00Z");
            raw.id = None;
            assert_invalid(normalize_event(&raw));
        }

        #[test]
        fn missing_end() {
            let mut raw = timed("x", "2025-02-05T10:00:00Z", "2025-02-05T11:00:00Z");
            raw.end = None;
            assert_invalid(normalize_event(&raw));
        }

        #[test]
        fn empty_time_object() {
            let mut raw = timed("x", "2025-02-05T10:00:00Z", "2025-02-05T11:00:00Z");
            raw.start = Some(RawEventTime::default());
            assert_invalid(normalize_event(&raw));
        }

        #[test]
        fn mixed_all_day_and_timed() {
            let raw = RawEvent::new(
                "x",
                RawEventTime::date("2025-02-05"),
                RawEventTime::date_time("2025-02-05T11:00:00Z"),
            );
            assert_invalid(normalize_event(&raw));
        }

        #[test]
        fn unparseable_time() {
            let raw = timed("x", "next tuesday", "2025-02-05T11:00:00Z");
            assert_invalid(normalize_event(&raw));
        }

        #[test]
        fn start_after_end() {
            let raw = timed("x", "2025-02-05T12:00:00Z", "2025-02-05T11:00:00Z");
            assert_invalid(normalize_event(&raw));
        }
    }

    mod batches {
        use super::*;

        #[test]
        fn preserves_order_and_cancelled_events() {
            let raws = vec![
                timed("b", "2025-02-05T12:00:00Z", "2025-02-05T13:00:00Z"),
                timed("a", "2025-02-05T09:00:00Z", "2025-02-05T10:00:00Z").with_status("cancelled"),
                timed("c", "2025-02-05T15:00:00Z", "2025-02-05T16:00:00Z"),
            ];

            let events = normalize_events(&raws).unwrap();
            let ids: Vec<_> = events.iter().map(|e| e.id.as_str()).collect();
            assert_eq!(ids, ["b", "a", "c"]);
            assert_eq!(events[1].status, "cancelled");
        }

        #[test]
        fn one_bad_record_fails_the_batch() {
            let mut bad = timed("bad", "2025-02-05T12:00:00Z", "2025-02-05T13:00:00Z");
            bad.start = None;
            let raws = vec![
                timed("ok", "2025-02-05T09:00:00Z", "2025-02-05T10:00:00Z"),
                bad,
            ];

            let err = normalize_events(&raws).unwrap_err();
            assert_eq!(err.failure(), Some(FetchFailure::InvalidResponse));
            assert!(err.message().contains("bad"));
        }

        #[test]
        fn empty_batch() {
            assert!(normalize_events(&[]).unwrap().is_empty());
        }
    }
}
