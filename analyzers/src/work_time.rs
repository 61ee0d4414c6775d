//! Work-time classification: late-night, weekend, overtime.
//!
//! Classes are independent and not mutually exclusive. The late-night
//! window may cross midnight (e.g. 22:00-06:00) and MUST be tested with
//! modular-arithmetic membership, never a half-open range comparison.

use chrono::{DateTime, FixedOffset, NaiveTime, Timelike, Weekday};
use config::WorkingHours;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkTimeClasses {
    pub late_night: bool,
    pub weekend: bool,
    pub overtime: bool,
}

impl WorkTimeClasses {
    pub fn any_abnormal(&self) -> bool {
        self.late_night || self.weekend
    }
}

/// Parses an `"HH:MM"` string into a `NaiveTime`, defaulting to midnight on
/// malformed input so a single bad config value never aborts a run (this is
/// a Data-kind failure, not Configuration, since it only affects display).
fn parse_hm(s: &str) -> NaiveTime {
    NaiveTime::parse_from_str(s, "%H:%M").unwrap_or_else(|_| NaiveTime::from_hms_opt(0, 0, 0).unwrap())
}

/// True if `time` falls in `[start, end)` on a 24-hour dial, where `end`
/// may be numerically before `start` to indicate the window crosses
/// midnight.
fn in_wrapping_window(time: NaiveTime, start: NaiveTime, end: NaiveTime) -> bool {
    if start <= end {
        time >= start && time < end
    } else {
        time >= start || time < end
    }
}

/// Classifies a single commit timestamp against configured working-hours
/// boundaries.
pub fn classify(timestamp: &DateTime<FixedOffset>, hours: &WorkingHours) -> WorkTimeClasses {
    let time = timestamp.time();
    let weekend = matches!(timestamp.weekday(), Weekday::Sat | Weekday::Sun);

    let late_night = in_wrapping_window(
        time,
        parse_hm(&hours.late_night_start),
        parse_hm(&hours.late_night_end),
    );
    let overtime = in_wrapping_window(
        time,
        parse_hm(&hours.overtime_start),
        parse_hm(&hours.overtime_end),
    );

    WorkTimeClasses {
        late_night,
        weekend,
        overtime,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn hours() -> WorkingHours {
        WorkingHours {
            normal_start: "09:00".into(),
            normal_end: "18:00".into(),
            overtime_start: "18:00".into(),
            overtime_end: "21:00".into(),
            late_night_start: "22:00".into(),
            late_night_end: "06:00".into(),
        }
    }

    fn at(hour: u32, min: u32, weekday_offset_from_monday: i64) -> DateTime<FixedOffset> {
        let tz = FixedOffset::east_opt(0).unwrap();
        // 2025-01-06 is a Monday.
        let base = tz.with_ymd_and_hms(2025, 1, 6, 0, 0, 0).unwrap();
        (base + chrono::Duration::days(weekday_offset_from_monday))
            .with_hour(hour)
            .unwrap()
            .with_minute(min)
            .unwrap()
    }

    #[test]
    fn b1_late_night_crosses_midnight() {
        let h = hours();
        assert!(classify(&at(23, 30, 0), &h).late_night);
        assert!(classify(&at(2, 30, 0), &h).late_night);
        assert!(!classify(&at(21, 30, 0), &h).late_night);
    }

    #[test]
    fn weekend_classification_matches_saturday_and_sunday() {
        let h = hours();
        // offset 5 = Saturday, 6 = Sunday.
        assert!(classify(&at(12, 0, 5), &h).weekend);
        assert!(classify(&at(12, 0, 6), &h).weekend);
        assert!(!classify(&at(12, 0, 0), &h).weekend);
    }

    #[test]
    fn e4_saturday_late_night_sets_both_classes_but_not_overtime() {
        let h = hours();
        let classes = classify(&at(23, 15, 5), &h);
        assert!(classes.late_night);
        assert!(classes.weekend);
        assert!(!classes.overtime);
    }

    #[test]
    fn overtime_window_does_not_cross_midnight() {
        let h = hours();
        assert!(classify(&at(19, 0, 0), &h).overtime);
        assert!(!classify(&at(22, 0, 0), &h).overtime);
    }
}
