use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    calendar::{self, Calendar},
    domain::Granularity,
    errors::{EngineError, Result},
};

/// The period a user is looking at: a local day plus the unit they browse by.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PeriodCursor {
    pub day: NaiveDate,
    pub granularity: Granularity,
}

impl PeriodCursor {
    pub fn new(day: NaiveDate, granularity: Granularity) -> Self {
        Self { day, granularity }
    }

    /// Cursor on the local day containing `instant`.
    pub fn at(
        calendar: &Calendar,
        instant: DateTime<Utc>,
        granularity: Granularity,
    ) -> Result<Self> {
        Ok(Self::new(calendar.local_date(instant)?, granularity))
    }

    /// Moves `steps` periods forward (or back when negative).
    pub fn step(&self, steps: i32) -> Result<Self> {
        let day = match self.granularity {
            Granularity::Day => calendar::shift_days(self.day, i64::from(steps)),
            Granularity::Week => calendar::shift_days(self.day, i64::from(steps) * 7),
            Granularity::Month => calendar::shift_months(self.day, steps),
        }
        .ok_or_else(|| {
            EngineError::CalendarResolution(format!(
                "cannot move {} {}s from {}",
                steps, self.granularity, self.day
            ))
        })?;
        Ok(Self::new(day, self.granularity))
    }

    pub fn toggle_granularity(&self) -> Self {
        Self::new(self.day, self.granularity.next())
    }

    /// Reference instant handed to the engine: the start of the cursor day.
    pub fn reference(&self, calendar: &Calendar) -> Result<DateTime<Utc>> {
        calendar.start_of_day(self.day)
    }

    /// Heading for the period, e.g. `Week 11` or `Month 3 of 2023`.
    /// The year is appended only when it differs from `today`'s.
    pub fn label(&self, calendar: &Calendar, today: NaiveDate) -> Result<String> {
        let mut label = match self.granularity {
            Granularity::Day => self.day.format("%-d %b %Y").to_string(),
            Granularity::Week => format!("Week {}", calendar.week_of_year(self.day)?),
            Granularity::Month => format!("Month {}", self.day.month()),
        };
        if self.granularity != Granularity::Day && self.day.year() != today.year() {
            label.push_str(&format!(" of {}", self.day.year()));
        }
        Ok(label)
    }
}
