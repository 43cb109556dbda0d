//! Date window for fetching and filtering events.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Half-open time window `[from, to)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl DateRange {
    /// Window reaching `days_in_past` back and `days_in_future` ahead of `now`.
    ///
    /// `None` when either end falls outside the representable date range.
    pub fn around(now: DateTime<Utc>, days_in_past: u32, days_in_future: u32) -> Option<Self> {
        Some(DateRange {
            from: now.checked_sub_signed(Duration::try_days(days_in_past.into())?)?,
            to: now.checked_add_signed(Duration::try_days(days_in_future.into())?)?,
        })
    }

    pub fn around_now(days_in_past: u32, days_in_future: u32) -> Option<Self> {
        Self::around(Utc::now(), days_in_past, days_in_future)
    }

    /// Monday 00:00 UTC to the following Monday of the given ISO week.
    pub fn iso_week(year: i32, week: u32) -> Option<Self> {
        let monday = NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)?;
        let from = monday.and_hms_opt(0, 0, 0)?.and_utc();
        Some(DateRange {
            from,
            to: from.checked_add_signed(Duration::weeks(1))?,
        })
    }

    /// The ISO week containing `now`, shifted by `offset` weeks.
    ///
    /// `None` when the shifted week is out of range.
    pub fn week_of(now: DateTime<Utc>, offset: i64) -> Option<Self> {
        let day = now
            .date_naive()
            .checked_add_signed(Duration::try_weeks(offset)?)?;
        let week = day.iso_week();
        Self::iso_week(week.year(), week.week())
    }

    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        *instant >= self.from && *instant < self.to
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.from
            .date_naive()
            .iter_days()
            .take_while(move |d| d.and_hms_opt(0, 0, 0).is_some_and(|t| t.and_utc() < self.to))
    }

    pub fn from_rfc3339(&self) -> String {
        self.from.to_rfc3339()
    }

    pub fn to_rfc3339(&self) -> String {
        self.to.to_rfc3339()
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} to {}",
            self.from.format("%Y-%m-%d"),
            self.to.format("%Y-%m-%d")
        )
    }
}
