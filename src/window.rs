// Week window selection.
//
// Reports always cover an inclusive Monday-Sunday range. Either the caller
// names the start date explicitly, or we derive the most recently completed
// week relative to "today" in US Eastern time, so a report generated on any
// weekday covers the same week regardless of the machine's local zone.
use chrono::{Datelike, Duration, NaiveDate, Utc};
use chrono_tz::America::New_York;

/// Inclusive 7-day reporting range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekWindow {
    /// Explicit mode: a window starting on `start`.
    ///
    /// We do not check that `start` is actually a Monday; that is the
    /// caller's responsibility.
    pub fn from_start(start: NaiveDate) -> WeekWindow {
        WeekWindow { start, end: start + Duration::days(6) }
    }

    /// The last full Monday-Sunday week that ended strictly before `today`.
    ///
    /// `end` is the most recent Sunday before `today`, so the window never
    /// includes `today` or any day of an in-progress week.
    pub fn last_full_week(today: NaiveDate) -> WeekWindow {
        let weekday = today.weekday().num_days_from_monday() as i64;
        let end = today - Duration::days(weekday + 1);
        WeekWindow { start: end - Duration::days(6), end }
    }

    /// Default mode: last full week relative to today in US Eastern time.
    pub fn current() -> WeekWindow {
        let today = Utc::now().with_timezone(&New_York).date_naive();
        WeekWindow::last_full_week(today)
    }

    /// Whether a record's received date falls inside the window.
    /// Null dates are never in the window.
    pub fn contains(&self, date: Option<NaiveDate>) -> bool {
        date.is_some_and(|d| self.start <= d && d <= self.end)
    }
}
