//! Local calendar of the gym.
//!
//! Subscription windows are defined in wall-clock terms ("one month from
//! today", "until midnight"), so calendar math runs in the gym's fixed UTC
//! offset and the results are stored back as UTC timestamps.

use chrono::{DateTime, FixedOffset, Months, NaiveDate, Offset, Utc};

use super::{Timestamp, ValidationError};

/// Largest offset chrono accepts, in minutes (just under 24h).
const MAX_OFFSET_MINUTES: i32 = 24 * 60 - 1;

/// Fixed-offset calendar used for month arithmetic and day boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalCalendar {
    offset: FixedOffset,
}

impl LocalCalendar {
    /// Creates a calendar from an offset east of UTC in minutes.
    pub fn from_offset_minutes(minutes: i32) -> Result<Self, ValidationError> {
        if minutes.abs() > MAX_OFFSET_MINUTES {
            return Err(ValidationError::out_of_range(
                "utc_offset_minutes",
                -(MAX_OFFSET_MINUTES as i64),
                MAX_OFFSET_MINUTES as i64,
                minutes as i64,
            ));
        }
        let offset = FixedOffset::east_opt(minutes * 60).ok_or_else(|| {
            ValidationError::invalid_format("utc_offset_minutes", "offset out of range")
        })?;
        Ok(Self { offset })
    }

    /// Calendar aligned with UTC.
    pub fn utc() -> Self {
        Self {
            offset: Utc.fix(),
        }
    }

    /// Returns the underlying offset.
    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Local calendar date of the timestamp.
    pub fn date_of(&self, ts: Timestamp) -> NaiveDate {
        self.local(ts).date_naive()
    }

    /// Adds calendar months, keeping the local time of day.
    ///
    /// The day of month is clamped to the length of the target month, so
    /// Jan 31 + 1 month lands on the last day of February.
    pub fn add_months(&self, ts: Timestamp, months: u32) -> Result<Timestamp, ValidationError> {
        self.local(ts)
            .checked_add_months(Months::new(months))
            .map(|dt| Timestamp::from_datetime(dt.with_timezone(&Utc)))
            .ok_or_else(|| ValidationError::invalid_format("months", "date out of range"))
    }

    /// Local midnight at the start of the timestamp's calendar day.
    pub fn start_of_day(&self, ts: Timestamp) -> Result<Timestamp, ValidationError> {
        self.midnight(self.date_of(ts))
    }

    /// Local midnight at the start of the day after the timestamp's date.
    pub fn start_of_next_day(&self, ts: Timestamp) -> Result<Timestamp, ValidationError> {
        let next = self
            .date_of(ts)
            .succ_opt()
            .ok_or_else(|| ValidationError::invalid_format("date", "date out of range"))?;
        self.midnight(next)
    }

    /// Local midnight of the given date, as a UTC timestamp.
    pub fn midnight(&self, date: NaiveDate) -> Result<Timestamp, ValidationError> {
        date.and_hms_opt(0, 0, 0)
            .and_then(|naive| naive.and_local_timezone(self.offset).single())
            .map(|dt| Timestamp::from_datetime(dt.with_timezone(&Utc)))
            .ok_or_else(|| ValidationError::invalid_format("date", "no local midnight"))
    }

    fn local(&self, ts: Timestamp) -> DateTime<FixedOffset> {
        ts.as_datetime().with_timezone(&self.offset)
    }
}

impl Default for LocalCalendar {
    fn default() -> Self {
        Self::utc()
    }
}
