use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    calendar::{self, Calendar},
    domain::Granularity,
    errors::{EngineError, Result},
};

/// Half-open `[start, end)` interval of instants.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DateWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if end <= start {
            return Err(EngineError::InvalidWindow(format!(
                "window end {} must be after start {}",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }
}

/// The period containing the reference date and the one right before it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PeriodWindows {
    pub current: DateWindow,
    pub previous: DateWindow,
}

/// Resolves period windows for a granularity under one [`Calendar`].
#[derive(Debug, Clone, Copy)]
pub struct WindowResolver<'a> {
    calendar: &'a Calendar,
}

impl<'a> WindowResolver<'a> {
    pub fn new(calendar: &'a Calendar) -> Self {
        Self { calendar }
    }

    /// Local days `[first, end)` of the period containing `reference`.
    pub fn period_days(
        &self,
        reference: NaiveDate,
        granularity: Granularity,
    ) -> Result<(NaiveDate, NaiveDate)> {
        let (first, end) = match granularity {
            Granularity::Day => (Some(reference), calendar::shift_days(reference, 1)),
            Granularity::Week => {
                let first = self.calendar.week_start(reference)?;
                (Some(first), calendar::shift_days(first, 7))
            }
            Granularity::Month => {
                let first = calendar::month_start(reference);
                (Some(first), calendar::shift_months(first, 1))
            }
        };
        match (first, end) {
            (Some(first), Some(end)) => Ok((first, end)),
            _ => Err(out_of_range(reference, granularity)),
        }
    }

    /// Window of the period containing the local day `reference`.
    pub fn window_for(&self, reference: NaiveDate, granularity: Granularity) -> Result<DateWindow> {
        let (first, end) = self.period_days(reference, granularity)?;
        DateWindow::new(
            self.calendar.start_of_day(first)?,
            self.calendar.start_of_day(end)?,
        )
    }

    /// Shifts `reference` back by one period. Months clamp to the last valid day.
    pub fn previous_reference(
        &self,
        reference: NaiveDate,
        granularity: Granularity,
    ) -> Result<NaiveDate> {
        let shifted = match granularity {
            Granularity::Day => calendar::shift_days(reference, -1),
            Granularity::Week => calendar::shift_days(reference, -7),
            Granularity::Month => calendar::shift_months(reference, -1),
        };
        shifted.ok_or_else(|| out_of_range(reference, granularity))
    }

    pub fn resolve(
        &self,
        reference: DateTime<Utc>,
        granularity: Granularity,
    ) -> Result<PeriodWindows> {
        let day = self.calendar.local_date(reference)?;
        let current = self.window_for(day, granularity)?;
        let previous_day = self.previous_reference(day, granularity)?;
        let previous = self.window_for(previous_day, granularity)?;
        Ok(PeriodWindows { current, previous })
    }
}

fn out_of_range(reference: NaiveDate, granularity: Granularity) -> EngineError {
    EngineError::CalendarResolution(format!(
        "{} period around {} is outside the supported date range",
        granularity, reference
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Weekday};

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn window_rejects_empty_range() {
        let at = utc(2024, 1, 1);
        assert!(DateWindow::new(at, at).is_err());
        let window = DateWindow::new(at, utc(2024, 1, 2)).unwrap();
        assert!(window.contains(at));
        assert!(!window.contains(utc(2024, 1, 2)));
    }

    #[test]
    fn resolves_day_windows() {
        let calendar = Calendar::utc();
        let resolver = WindowResolver::new(&calendar);
        let reference = Utc.with_ymd_and_hms(2024, 3, 1, 15, 45, 0).unwrap();
        let windows = resolver.resolve(reference, Granularity::Day).unwrap();
        assert_eq!(windows.current.start, utc(2024, 3, 1));
        assert_eq!(windows.current.end, utc(2024, 3, 2));
        assert_eq!(windows.previous.start, utc(2024, 2, 29));
        assert_eq!(windows.previous.end, utc(2024, 3, 1));
    }

    #[test]
    fn resolves_week_windows_with_sunday_start() {
        let calendar = Calendar::new(chrono_tz::Tz::UTC, Weekday::Sun);
        let resolver = WindowResolver::new(&calendar);
        let windows = resolver
            .resolve(utc(2024, 3, 13), Granularity::Week)
            .unwrap();
        assert_eq!(windows.current.start, utc(2024, 3, 10));
        assert_eq!(windows.current.end, utc(2024, 3, 17));
        assert_eq!(windows.previous.start, utc(2024, 3, 3));
        assert_eq!(windows.previous.end, windows.current.start);
    }

    #[test]
    fn previous_month_of_march_31_is_february() {
        let calendar = Calendar::utc();
        let resolver = WindowResolver::new(&calendar);
        let windows = resolver
            .resolve(utc(2024, 3, 31), Granularity::Month)
            .unwrap();
        assert_eq!(windows.current.start, utc(2024, 3, 1));
        assert_eq!(windows.current.end, utc(2024, 4, 1));
        assert_eq!(windows.previous.start, utc(2024, 2, 1));
        assert_eq!(windows.previous.end, utc(2024, 3, 1));
    }

    #[test]
    fn local_windows_follow_zone_offsets() {
        let calendar = Calendar::new(chrono_tz::Europe::Berlin, Weekday::Mon);
        let resolver = WindowResolver::new(&calendar);
        // Berlin switches to summer time on 2024-03-31.
        let reference = Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap();
        let windows = resolver.resolve(reference, Granularity::Day).unwrap();
        assert_eq!(
            windows.current.start,
            Utc.with_ymd_and_hms(2024, 3, 30, 23, 0, 0).unwrap()
        );
        assert_eq!(
            windows.current.end,
            Utc.with_ymd_and_hms(2024, 3, 31, 22, 0, 0).unwrap()
        );
    }

    #[test]
    fn periods_past_the_date_range_are_unavailable() {
        let calendar = Calendar::utc();
        let resolver = WindowResolver::new(&calendar);
        for granularity in [Granularity::Day, Granularity::Week, Granularity::Month] {
            assert!(matches!(
                resolver.period_days(NaiveDate::MAX, granularity),
                Err(EngineError::CalendarResolution(_))
            ));
            assert!(matches!(
                resolver.previous_reference(NaiveDate::MIN, granularity),
                Err(EngineError::CalendarResolution(_))
            ));
        }
    }
}
