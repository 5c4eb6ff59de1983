use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, Utc};

use crate::core::{AppError, Result};

/// Single reporting timezone shared by every date bucketing operation.
///
/// Orders are stored with UTC timestamps; analytics see them shifted into
/// this offset so that "today", weekday labels and month keys agree with the
/// dashboard's wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportingTimezone {
    offset: FixedOffset,
}

impl ReportingTimezone {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }

    /// Build from an offset in minutes east of UTC (e.g. 60 for CET)
    pub fn from_offset_minutes(minutes: i32) -> Result<Self> {
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(Self::new)
            .ok_or_else(|| {
                AppError::Configuration(format!("Invalid reporting UTC offset: {} minutes", minutes))
            })
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Convert a stored UTC timestamp to reporting wall-clock time
    pub fn localize(&self, utc_time: NaiveDateTime) -> NaiveDateTime {
        utc_time.and_utc().with_timezone(&self.offset).naive_local()
    }

    /// Current reporting wall-clock time
    pub fn now(&self) -> NaiveDateTime {
        self.at(Utc::now())
    }

    pub fn at(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.with_timezone(&self.offset).naive_local()
    }
}

impl Default for ReportingTimezone {
    fn default() -> Self {
        Self::utc()
    }
}
