//! Next-week forecast window
//!
//! Week-ahead providers get a calendar week (Monday onwards in the local
//! time zone) rather than a rolling seven days from now.

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Local anchor hours for a window starting on the next Monday
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSpec {
    pub start_hour: u32,
    /// Days from the start date to the end date
    pub span_days: i64,
    pub end_hour: u32,
}

/// Window bounds in UTC seconds since epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    pub start: i64,
    pub end: i64,
}

/// Window starting on the first Monday strictly after `now`'s local date
pub fn next_week_window(now: DateTime<Utc>, tz: Tz, spec: WindowSpec) -> WeekWindow {
    let today = now.with_timezone(&tz).date_naive();
    let days_ahead = 7 - i64::from(today.weekday().num_days_from_monday());
    let start_date = today + Duration::days(days_ahead);
    let end_date = start_date + Duration::days(spec.span_days);

    WeekWindow {
        start: local_instant(tz, start_date, spec.start_hour).timestamp(),
        end: local_instant(tz, end_date, spec.end_hour).timestamp(),
    }
}

/// `date` at `hour:00` local time; ambiguous times take the earlier instant,
/// times inside a DST gap move forward one hour
fn local_instant(tz: Tz, date: NaiveDate, hour: u32) -> DateTime<Utc> {
    let time = NaiveTime::from_hms_opt(hour.min(23), 0, 0).unwrap_or_default();
    let naive = date.and_time(time);
    let local = match tz.from_local_datetime(&naive) {
        LocalResult::Single(t) => Some(t),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => tz.from_local_datetime(&(naive + Duration::hours(1))).earliest(),
    };
    local
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc())
}
