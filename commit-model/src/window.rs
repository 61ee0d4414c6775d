//! Bounded time windows used to scope report generation.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, TimeZone, Weekday};

/// An inclusive-start, exclusive-end interval in local wall-clock time.
///
/// Membership is always `start <= timestamp < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl TimeWindow {
    pub fn new(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, timestamp: &DateTime<FixedOffset>) -> bool {
        *timestamp >= self.start && *timestamp < self.end
    }

    /// One calendar day, local midnight to the following midnight.
    pub fn for_day(date: NaiveDate, tz: FixedOffset) -> Self {
        let start = tz
            .from_local_datetime(&date.and_hms_opt(0, 0, 0).unwrap())
            .single()
            .expect("local midnight is unambiguous for a fixed offset");
        Self::new(start, start + Duration::days(1))
    }

    /// ISO week: Monday 00:00 to the following Monday 00:00.
    pub fn for_iso_week(iso_year: i32, iso_week: u32, tz: FixedOffset) -> Self {
        let monday = NaiveDate::from_isoywd_opt(iso_year, iso_week, Weekday::Mon)
            .expect("valid ISO year/week");
        let start = tz
            .from_local_datetime(&monday.and_hms_opt(0, 0, 0).unwrap())
            .single()
            .unwrap();
        Self::new(start, start + Duration::days(7))
    }

    /// A calendar month, first day 00:00 to the first day of the next month.
    pub fn for_month(year: i32, month: u32, tz: FixedOffset) -> Self {
        let first = NaiveDate::from_ymd_opt(year, month, 1).expect("valid year/month");
        let next_first = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1).unwrap()
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1).unwrap()
        };
        let start = tz
            .from_local_datetime(&first.and_hms_opt(0, 0, 0).unwrap())
            .single()
            .unwrap();
        let end = tz
            .from_local_datetime(&next_first.and_hms_opt(0, 0, 0).unwrap())
            .single()
            .unwrap();
        Self::new(start, end)
    }

    /// A window spanning the last `days` days ending now, used by the
    /// dashboard presets.
    pub fn trailing_days(days: i64, now: DateTime<FixedOffset>) -> Self {
        Self::new(now - Duration::days(days), now)
    }

    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// Number of calendar weeks (Monday-starting, ISO) a calendar month spans,
/// used by the monthly reporter's week-of-month breakdown.
pub fn weeks_in_month(year: i32, month: u32) -> Vec<(i32, u32)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).expect("valid year/month");
    let next_month_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1).unwrap()
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1).unwrap()
    };

    let mut weeks = Vec::new();
    let mut cursor = first;
    while cursor < next_month_first {
        let key = (cursor.iso_week().year(), cursor.iso_week().week());
        if weeks.last() != Some(&key) {
            weeks.push(key);
        }
        cursor += Duration::days(1);
    }
    weeks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn day_window_is_half_open() {
        let w = TimeWindow::for_day(NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(), utc());
        assert!(w.contains(&w.start));
        assert!(!w.contains(&w.end));
        assert_eq!(w.duration_days(), 1);
    }

    #[test]
    fn iso_week_starts_monday() {
        let w = TimeWindow::for_iso_week(2025, 2, utc());
        assert_eq!(w.start.weekday(), Weekday::Mon);
        assert_eq!(w.duration_days(), 7);
    }

    #[test]
    fn month_window_spans_calendar_month() {
        let w = TimeWindow::for_month(2025, 2, utc());
        assert_eq!(w.start.day(), 1);
        assert_eq!(w.start.month(), 2);
        assert_eq!(w.end.month(), 3);
    }
}
