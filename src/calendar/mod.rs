//! Calendar boundary helpers shared by the window resolver, the bucketizer
//! and period navigation.
//!
//! A [`Calendar`] pairs a time zone with a week-start policy. Every
//! day/week/month boundary in the crate is derived from one, so the chart
//! and the comparison never disagree on where a week begins.

use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    TimeZone, Utc, Weekday,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::{EngineError, Result};

/// Step used when local midnight falls inside a daylight-saving gap.
const GAP_PROBE_MINUTES: i64 = 15;
const GAP_PROBE_LIMIT_MINUTES: i64 = 180;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Calendar {
    tz: Tz,
    first_weekday: Weekday,
}

impl Default for Calendar {
    fn default() -> Self {
        Self::utc()
    }
}

impl Calendar {
    pub fn new(tz: Tz, first_weekday: Weekday) -> Self {
        Self { tz, first_weekday }
    }

    /// UTC days with ISO-8601 Monday weeks.
    pub fn utc() -> Self {
        Self::new(Tz::UTC, Weekday::Mon)
    }

    pub fn time_zone(&self) -> Tz {
        self.tz
    }

    pub fn first_weekday(&self) -> Weekday {
        self.first_weekday
    }

    /// Calendar-local date of an instant.
    ///
    /// Fails when the zone offset pushes the instant past the representable
    /// date range.
    pub fn local_date(&self, instant: DateTime<Utc>) -> Result<NaiveDate> {
        let utc = instant.naive_utc();
        let offset = self.tz.offset_from_utc_datetime(&utc).fix();
        utc.checked_add_offset(offset)
            .map(|local| local.date())
            .ok_or_else(|| {
                EngineError::CalendarResolution(format!(
                    "{} has no local date in {}",
                    instant, self.tz
                ))
            })
    }

    /// First existing instant of the local `date`.
    ///
    /// Usually local midnight. Zones that spring forward at midnight have no
    /// such instant on the transition day; the first valid quarter hour after
    /// it is used instead.
    pub fn start_of_day(&self, date: NaiveDate) -> Result<DateTime<Utc>> {
        let midnight = date.and_time(NaiveTime::MIN);
        let mut offset = 0;
        while offset <= GAP_PROBE_LIMIT_MINUTES {
            let probe = midnight.checked_add_signed(Duration::minutes(offset));
            if let Some(instant) = probe.and_then(|local| self.resolve_local(local)) {
                return Ok(instant);
            }
            offset += GAP_PROBE_MINUTES;
        }
        warn!(%date, tz = %self.tz, "no valid start of day");
        Err(EngineError::CalendarResolution(format!(
            "{} has no valid start of day in {}",
            date, self.tz
        )))
    }

    /// First day of the week containing `date`.
    pub fn week_start(&self, date: NaiveDate) -> Result<NaiveDate> {
        date.week(self.first_weekday)
            .checked_first_day()
            .ok_or_else(|| out_of_range(date))
    }

    /// True when the zone jumped over `date` entirely, as Samoa did on
    /// 2011-12-30 when it crossed the date line.
    pub fn skips_day(&self, date: NaiveDate) -> Result<bool> {
        let next = shift_days(date, 1).ok_or_else(|| out_of_range(date))?;
        let before_next = self
            .start_of_day(next)?
            .checked_sub_signed(Duration::seconds(1))
            .ok_or_else(|| out_of_range(date))?;
        Ok(self.local_date(before_next)? < date)
    }

    /// 1-based week number; the week containing January 1 is week 1.
    pub fn week_of_year(&self, date: NaiveDate) -> Result<u32> {
        let start = self.week_start(date)?;
        if let Some(last) = shift_days(start, 6) {
            if last.year() > date.year() {
                return Ok(1);
            }
        }
        let first_week = match NaiveDate::from_ymd_opt(date.year(), 1, 1) {
            Some(jan_first) => self.week_start(jan_first)?,
            None => start,
        };
        Ok(((start - first_week).num_days() / 7) as u32 + 1)
    }

    fn resolve_local(&self, local: NaiveDateTime) -> Option<DateTime<Utc>> {
        match self.tz.from_local_datetime(&local) {
            LocalResult::Single(instant) => Some(instant.with_timezone(&Utc)),
            LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
            LocalResult::None => None,
        }
    }
}

fn out_of_range(date: NaiveDate) -> EngineError {
    EngineError::CalendarResolution(format!(
        "{} is too close to the edge of the supported date range",
        date
    ))
}

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)?;
    let last_current = first_next.pred_opt()?;
    Some(last_current.day())
}

/// Moves `date` by whole calendar months, clamping the day to the last valid
/// day of the target month (Jan 31 - 2 months = Nov 30).
pub fn shift_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let index = date.year() * 12 + date.month0() as i32 + months;
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month)?);
    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn shift_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    date.checked_add_signed(Duration::days(days))
}
