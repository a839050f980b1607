//! The calendar day being summarized.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};

/// A single calendar day in a given timezone.
///
/// Membership is decided by comparing calendar dates in the window's
/// timezone, never by an instant range, so a timestamp at 23:59 local time
/// is still "today" regardless of its UTC offset.
#[derive(Debug, Clone)]
pub struct DayWindow<Tz: TimeZone = Local> {
    date: NaiveDate,
    tz: Tz,
}

impl DayWindow<Local> {
    /// Creates a window for the given local calendar day.
    pub const fn new(date: NaiveDate) -> Self {
        Self { date, tz: Local }
    }

    /// Window for the current local day.
    pub fn today() -> Self {
        Self::new(Local::now().date_naive())
    }
}

impl<Tz: TimeZone> DayWindow<Tz> {
    /// Creates a window for `date` as observed in `tz`.
    pub const fn with_timezone(date: NaiveDate, tz: Tz) -> Self {
        Self { date, tz }
    }

    /// Creates the window whose day contains `instant` in `tz`.
    pub fn containing<T: TimeZone>(instant: &DateTime<T>, tz: Tz) -> Self {
        let date = instant.with_timezone(&tz).date_naive();
        Self { date, tz }
    }

    /// The calendar day this window represents.
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns `true` if `timestamp` falls on this window's calendar day.
    pub fn contains<T: TimeZone>(&self, timestamp: &DateTime<T>) -> bool {
        timestamp.with_timezone(&self.tz).date_naive() == self.date
    }

    /// Half-open UTC interval `[start, end)` covering the day.
    ///
    /// Used as a server-side query filter; membership tests should go
    /// through [`DayWindow::contains`].
    pub fn bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let next = self.date.succ_opt().unwrap_or(NaiveDate::MAX);
        (self.midnight_utc(self.date), self.midnight_utc(next))
    }

    /// Local midnight of `date` in UTC.
    ///
    /// Ambiguous midnights (DST fall-back) resolve to the earlier instant;
    /// a midnight inside a spring-forward gap falls back to 01:00 local.
    fn midnight_utc(&self, date: NaiveDate) -> DateTime<Utc> {
        let midnight = date.and_time(NaiveTime::MIN);
        self.tz
            .from_local_datetime(&midnight)
            .earliest()
            .or_else(|| {
                self.tz
                    .from_local_datetime(&(midnight + Duration::hours(1)))
                    .earliest()
            })
            .map_or_else(
                || Utc.from_utc_datetime(&midnight),
                |dt| dt.with_timezone(&Utc),
            )
    }
}
