use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    calendar::{self, Calendar},
    domain::{ExpenseRecord, Granularity},
    errors::{EngineError, Result},
    money,
};

use super::window::{DateWindow, WindowResolver};

/// One local day and the expenses recorded on it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeBucket {
    pub day: NaiveDate,
    pub bucket_start: DateTime<Utc>,
    pub total: Decimal,
}

/// Gap-free, ascending daily series for a chart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BucketSeries {
    pub granularity: Granularity,
    pub window: DateWindow,
    pub buckets: Vec<TimeBucket>,
    pub total: Decimal,
}

impl BucketSeries {
    pub fn total(&self) -> Decimal {
        self.total
    }

    /// True when nothing was spent in the range; callers typically show a
    /// placeholder chart instead.
    pub fn is_all_zero(&self) -> bool {
        self.buckets.iter().all(|bucket| bucket.total.is_zero())
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimeBucket> {
        self.buckets.iter()
    }

    /// Total of the bucket covering `instant`, if it lies inside the series.
    pub fn amount_at(&self, instant: DateTime<Utc>) -> Option<Decimal> {
        if !self.window.contains(instant) {
            return None;
        }
        let index = self
            .buckets
            .partition_point(|bucket| bucket.bucket_start <= instant);
        index
            .checked_sub(1)
            .and_then(|idx| self.buckets.get(idx))
            .map(|bucket| bucket.total)
    }
}

/// Sums expenses into one bucket per local day of the display range.
///
/// Day and Week granularities both chart the week containing the reference
/// date; Month charts every day of the reference month.
#[derive(Debug, Clone, Copy)]
pub struct Bucketizer<'a> {
    calendar: &'a Calendar,
}

impl<'a> Bucketizer<'a> {
    pub fn new(calendar: &'a Calendar) -> Self {
        Self { calendar }
    }

    /// Local days covered by the chart for `reference`.
    pub fn bucket_days(
        &self,
        reference: NaiveDate,
        granularity: Granularity,
    ) -> Result<Vec<NaiveDate>> {
        let display = match granularity {
            Granularity::Day | Granularity::Week => Granularity::Week,
            Granularity::Month => Granularity::Month,
        };
        let (first, end) = WindowResolver::new(self.calendar).period_days(reference, display)?;
        let mut days = Vec::new();
        let mut day = first;
        while day < end {
            days.push(day);
            day = calendar::shift_days(day, 1).ok_or_else(|| {
                EngineError::CalendarResolution(format!("no day follows {}", day))
            })?;
        }
        Ok(days)
    }

    pub fn bucketize(
        &self,
        expenses: &[ExpenseRecord],
        reference: DateTime<Utc>,
        granularity: Granularity,
    ) -> Result<BucketSeries> {
        let reference_day = self.calendar.local_date(reference)?;
        let days = self.bucket_days(reference_day, granularity)?;

        let mut sums: BTreeMap<NaiveDate, Decimal> =
            days.iter().map(|day| (*day, Decimal::ZERO)).collect();
        for expense in expenses {
            let day = match self.calendar.local_date(expense.timestamp) {
                Ok(day) => day,
                Err(err) => {
                    warn!(
                        name = %expense.name,
                        error = %err,
                        "skipping expense without a local date"
                    );
                    continue;
                }
            };
            if let Some(sum) = sums.get_mut(&day) {
                *sum = money::checked_add(*sum, expense.amount)?;
            }
        }

        let mut buckets = Vec::with_capacity(sums.len());
        for (day, total) in sums {
            let bucket_start = match self.calendar.start_of_day(day) {
                Ok(start) => start,
                // A day the zone jumped over holds no instants.
                Err(_) if self.calendar.skips_day(day)? => {
                    debug!(%day, "day skipped by the local calendar");
                    continue;
                }
                Err(err) => return Err(err),
            };
            buckets.push(TimeBucket {
                day,
                bucket_start,
                total,
            });
        }
        buckets.sort_by_key(|bucket| bucket.bucket_start);

        let window = match (buckets.first(), days.last()) {
            (Some(first), Some(last)) => {
                let end = calendar::shift_days(*last, 1).ok_or_else(|| {
                    EngineError::CalendarResolution(format!("no day follows {}", last))
                })?;
                DateWindow::new(first.bucket_start, self.calendar.start_of_day(end)?)?
            }
            _ => {
                return Err(EngineError::CalendarResolution(format!(
                    "empty display range around {}",
                    reference_day
                )))
            }
        };
        let total = money::checked_total(buckets.iter().map(|bucket| bucket.total))?;

        debug!(
            %granularity,
            reference = %reference_day,
            buckets = buckets.len(),
            %total,
            "bucketized expenses"
        );

        Ok(BucketSeries {
            granularity,
            window,
            buckets,
            total,
        })
    }
}
