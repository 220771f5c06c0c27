//! Daily bucket keys.
//!
//! "Today" is the calendar day in Asia/Seoul, never the viewer's local day.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Asia::Seoul;

/// Source of "today" for a store; tests pin it to a fixed day.
pub type Clock = fn() -> DayKey;

/// Calendar day of a daily counter bucket, rendered as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey(NaiveDate);

impl DayKey {
    pub fn today() -> Self {
        Self::at(Utc::now())
    }

    /// The Seoul calendar day containing `instant`.
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self(instant.with_timezone(&Seoul).date_naive())
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}
