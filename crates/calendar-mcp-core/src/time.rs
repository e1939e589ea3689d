//! Query windows for calendar lookups.
//!
//! A [`TimeWindow`] is a half-open interval `[start, end)` in UTC. The
//! day-based constructors anchor on local midnight of "now" in whatever
//! timezone `now` carries, and end on local midnight N calendar days later.

use chrono::{DateTime, Days, Duration, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Hours scanned past midnight for a valid local time. Covers DST gaps and
/// whole skipped days.
const GAP_SCAN_HOURS: i64 = 48;

/// Returns the instant local midnight begins on `date` in `tz`.
///
/// When midnight falls inside a gap, the first valid local time on the hour
/// after it is used instead. For a skipped day that is midnight of the next
/// day that exists. A zone with no valid local time in range falls back to
/// midnight UTC.
pub fn start_of_day<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    (0..=GAP_SCAN_HOURS)
        .map(|h| midnight + Duration::hours(h))
        .find_map(|local| tz.from_local_datetime(&local).earliest())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| midnight.and_utc())
}

/// A time window for querying calendar events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Start of the window (inclusive).
    pub start: DateTime<Utc>,
    /// End of the window (exclusive).
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Creates a new time window.
    ///
    /// # Panics
    ///
    /// Panics if `start` is after `end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        assert!(start <= end, "TimeWindow start must be <= end");
        Self { start, end }
    }

    /// Window from local midnight of `now` to local midnight `days` calendar
    /// days later.
    pub fn local_days<Tz: TimeZone>(now: &DateTime<Tz>, days: u64) -> Self {
        let tz = now.timezone();
        let today = now.date_naive();
        let last = today.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX);
        Self::new(start_of_day(today, &tz), start_of_day(last, &tz))
    }

    /// Today's window: `[midnight, next midnight)`.
    pub fn today<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        Self::local_days(now, 1)
    }

    /// The seven-day window starting at today's midnight.
    pub fn week<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        Self::local_days(now, 7)
    }

    /// Returns the duration of this time window.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Checks if a datetime falls within `[start, end)`.
    pub fn contains(&self, dt: DateTime<Utc>) -> bool {
        self.start <= dt && dt < self.end
    }

    /// `timeMin` query value, RFC 3339 with a `Z` suffix.
    pub fn time_min(&self) -> String {
        self.start.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    /// `timeMax` query value, RFC 3339 with a `Z` suffix.
    pub fn time_max(&self) -> String {
        self.end.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, MappedLocalTime, NaiveDateTime};

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    fn at(offset_hours: i32, y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(offset_hours * 3600)
            .unwrap()
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap()
    }

    #[test]
    fn today_starts_at_local_midnight() {
        let now = at(2, 2025, 2, 5, 14, 30);
        let window = TimeWindow::today(&now);
        // 00:00 at UTC+2 is 22:00 UTC the previous day
        assert_eq!(window.start, utc(2025, 2, 4, 22, 0, 0));
        assert_eq!(window.end, utc(2025, 2, 5, 22, 0, 0));
        assert_eq!(window.duration(), Duration::hours(24));
    }

    #[test]
    fn today_end_is_exclusive() {
        let window = TimeWindow::today(&utc(2025, 2, 5, 9, 0, 0));
        assert!(window.contains(utc(2025, 2, 5, 0, 0, 0)));
        assert!(window.contains(utc(2025, 2, 5, 23, 59, 59)));
        assert!(!window.contains(utc(2025, 2, 6, 0, 0, 0)));
    }

    #[test]
    fn today_just_before_midnight() {
        let now = at(-5, 2025, 12, 31, 23, 59);
        let window = TimeWindow::today(&now);
        assert_eq!(window.start, utc(2025, 12, 31, 5, 0, 0));
        assert_eq!(window.end, utc(2026, 1, 1, 5, 0, 0));
    }

    #[test]
    fn week_spans_seven_days() {
        let now = at(-8, 2025, 2, 26, 8, 15);
        let window = TimeWindow::week(&now);
        assert_eq!(window.start, utc(2025, 2, 26, 8, 0, 0));
        // Crosses the end of February
        assert_eq!(window.end, utc(2025, 3, 5, 8, 0, 0));
        assert_eq!(window.duration(), Duration::days(7));
    }

    #[test]
    fn week_upper_bound_is_next_midnight_not_end_of_day() {
        let window = TimeWindow::week(&utc(2025, 2, 5, 12, 0, 0));
        assert!(window.contains(utc(2025, 2, 11, 23, 59, 59)));
        assert!(!window.contains(utc(2025, 2, 12, 0, 0, 0)));
    }

    #[test]
    fn query_bounds_format() {
        let window = TimeWindow::today(&utc(2025, 2, 5, 12, 0, 0));
        assert_eq!(window.time_min(), "2025-02-05T00:00:00Z");
        assert_eq!(window.time_max(), "2025-02-06T00:00:00Z");
    }

    #[test]
    fn start_of_day_in_utc() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(start_of_day(date, &Utc), utc(2024, 2, 29, 0, 0, 0));
    }

    #[test]
    #[should_panic(expected = "start must be <= end")]
    fn invalid_window() {
        TimeWindow::new(utc(2025, 2, 5, 17, 0, 0), utc(2025, 2, 5, 9, 0, 0));
    }

    #[test]
    fn serde_roundtrip() {
        let window = TimeWindow::week(&utc(2025, 2, 5, 12, 0, 0));
        let json = serde_json::to_string(&window).unwrap();
        let parsed: TimeWindow = serde_json::from_str(&json).unwrap();
        assert_eq!(window, parsed);
    }

    mod dst {
        use super::*;
        use chrono_tz::America::{New_York, Sao_Paulo};
        use chrono_tz::Pacific::Apia;

        fn date(y: i32, m: u32, d: u32) -> NaiveDate {
            NaiveDate::from_ymd_opt(y, m, d).unwrap()
        }

        #[test]
        fn week_across_spring_forward_is_167_hours() {
            // New York moves to EDT on 2025-03-09
            let now = New_York.with_ymd_and_hms(2025, 3, 5, 10, 0, 0).unwrap();
            let window = TimeWindow::week(&now);
            assert_eq!(window.start, utc(2025, 3, 5, 5, 0, 0));
            assert_eq!(window.end, utc(2025, 3, 12, 4, 0, 0));
            assert_eq!(window.duration(), Duration::hours(167));
        }

        #[test]
        fn week_across_fall_back_is_169_hours() {
            // Back to EST on 2025-11-02
            let now = New_York.with_ymd_and_hms(2025, 10, 30, 10, 0, 0).unwrap();
            let window = TimeWindow::week(&now);
            assert_eq!(window.start, utc(2025, 10, 30, 4, 0, 0));
            assert_eq!(window.end, utc(2025, 11, 6, 5, 0, 0));
            assert_eq!(window.duration(), Duration::hours(169));
        }

        #[test]
        fn transition_days() {
            let spring = New_York.with_ymd_and_hms(2025, 3, 9, 12, 0, 0).unwrap();
            assert_eq!(TimeWindow::today(&spring).duration(), Duration::hours(23));

            let fall = New_York.with_ymd_and_hms(2025, 11, 2, 12, 0, 0).unwrap();
            let window = TimeWindow::today(&fall);
            assert_eq!(window.start, utc(2025, 11, 2, 4, 0, 0));
            assert_eq!(window.duration(), Duration::hours(25));
        }

        #[test]
        fn midnight_in_gap_starts_at_first_valid_hour() {
            // Sao Paulo skipped 00:00-01:00 on 2018-11-04
            let day = date(2018, 11, 4);
            let midnight = day.and_time(NaiveTime::MIN);
            assert!(Sao_Paulo.from_local_datetime(&midnight).earliest().is_none());

            // 01:00 at UTC-2
            assert_eq!(start_of_day(day, &Sao_Paulo), utc(2018, 11, 4, 3, 0, 0));

            let now = Sao_Paulo.with_ymd_and_hms(2018, 11, 4, 12, 0, 0).unwrap();
            let window = TimeWindow::today(&now);
            assert_eq!(window.start, utc(2018, 11, 4, 3, 0, 0));
            assert_eq!(window.end, utc(2018, 11, 5, 2, 0, 0));
            assert_eq!(window.duration(), Duration::hours(23));
        }

        #[test]
        fn skipped_day_starts_with_the_next_day() {
            // Apia jumped from 2011-12-29 24:00 (UTC-10) to 2011-12-31 00:00 (UTC+14)
            let jump = utc(2011, 12, 30, 10, 0, 0);
            assert_eq!(start_of_day(date(2011, 12, 30), &Apia), jump);
            assert_eq!(start_of_day(date(2011, 12, 31), &Apia), jump);

            let now = Apia.with_ymd_and_hms(2011, 12, 29, 12, 0, 0).unwrap();
            let window = TimeWindow::today(&now);
            assert_eq!(window.end, jump);
            assert_eq!(window.duration(), Duration::hours(24));
        }

        /// A zone in which no local time exists.
        #[derive(Debug, Clone, Copy)]
        struct Void;

        impl TimeZone for Void {
            type Offset = FixedOffset;

            fn from_offset(_offset: &FixedOffset) -> Self {
                Void
            }

            fn offset_from_local_date(&self, _local: &NaiveDate) -> MappedLocalTime<FixedOffset> {
                MappedLocalTime::None
            }

            fn offset_from_local_datetime(
                &self,
                _local: &NaiveDateTime,
            ) -> MappedLocalTime<FixedOffset> {
                MappedLocalTime::None
            }

            fn offset_from_utc_date(&self, _utc: &NaiveDate) -> FixedOffset {
                FixedOffset::east_opt(0).unwrap()
            }

            fn offset_from_utc_datetime(&self, _utc: &NaiveDateTime) -> FixedOffset {
                FixedOffset::east_opt(0).unwrap()
            }
        }

        #[test]
        fn no_valid_local_time_falls_back_to_utc_midnight() {
            assert_eq!(start_of_day(date(2025, 2, 5), &Void), utc(2025, 2, 5, 0, 0, 0));
        }
    }
}
