//! The aggregation engine: daily spending series and period comparisons.
//!
//! Every entry point is a pure function of the expense snapshot, the
//! reference instant and the granularity. Callers re-run it whenever any of
//! those change; nothing is cached between calls.

pub mod bucket;
pub mod comparison;
pub mod cursor;
pub mod window;

pub use bucket::{BucketSeries, Bucketizer, TimeBucket};
pub use comparison::{Comparator, PeriodComparison, Trend};
pub use cursor::PeriodCursor;
pub use window::{DateWindow, PeriodWindows, WindowResolver};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    calendar::Calendar,
    config::EngineConfig,
    domain::{ExpenseOrder, ExpenseRecord, Granularity},
    errors::Result,
};

/// Chart series and trend for one view, as rendered by the app and the widget.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpendingSummary {
    pub windows: PeriodWindows,
    pub series: BucketSeries,
    pub comparison: PeriodComparison,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AggregationEngine {
    calendar: Calendar,
}

impl AggregationEngine {
    pub fn new(calendar: Calendar) -> Self {
        Self { calendar }
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        Ok(Self::new(config.calendar()?))
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn windows(
        &self,
        reference: DateTime<Utc>,
        granularity: Granularity,
    ) -> Result<PeriodWindows> {
        WindowResolver::new(&self.calendar)
            .resolve(reference, granularity)
            .inspect_err(|err| {
                warn!(%reference, %granularity, error = %err, "window unavailable");
            })
    }

    pub fn bucketize(
        &self,
        expenses: &[ExpenseRecord],
        reference: DateTime<Utc>,
        granularity: Granularity,
    ) -> Result<BucketSeries> {
        Bucketizer::new(&self.calendar).bucketize(expenses, reference, granularity)
    }

    pub fn compare(
        &self,
        expenses: &[ExpenseRecord],
        reference: DateTime<Utc>,
        granularity: Granularity,
    ) -> Result<PeriodComparison> {
        let windows = self.windows(reference, granularity)?;
        Comparator::new(&self.calendar).compare_windows(expenses, &windows)
    }

    /// Series and comparison from one snapshot.
    pub fn summarize(
        &self,
        expenses: &[ExpenseRecord],
        reference: DateTime<Utc>,
        granularity: Granularity,
    ) -> Result<SpendingSummary> {
        let windows = self.windows(reference, granularity)?;
        let series = self.bucketize(expenses, reference, granularity)?;
        let comparison = Comparator::new(&self.calendar).compare_windows(expenses, &windows)?;
        Ok(SpendingSummary {
            windows,
            series,
            comparison,
        })
    }

    /// Records of the current period, sorted for the expense list.
    pub fn expenses_in_period<'e>(
        &self,
        expenses: &'e [ExpenseRecord],
        reference: DateTime<Utc>,
        granularity: Granularity,
        order: ExpenseOrder,
    ) -> Result<Vec<&'e ExpenseRecord>> {
        let windows = self.windows(reference, granularity)?;
        let mut selected: Vec<&ExpenseRecord> = expenses
            .iter()
            .filter(|expense| windows.current.contains(expense.timestamp))
            .collect();
        order.sort(&mut selected);
        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Weekday};
    use rust_decimal_macros::dec;

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, d, h, 0, 0).unwrap()
    }

    fn ledger() -> Vec<ExpenseRecord> {
        vec![
            ExpenseRecord::new("Rewe", dec!(10), at(11, 9)),
            ExpenseRecord::new("Aldi", dec!(20), at(13, 18)),
            ExpenseRecord::new("Edeka", dec!(15), at(6, 12)),
        ]
    }

    #[test]
    fn summary_agrees_with_individual_calls() {
        let engine = AggregationEngine::default();
        let expenses = ledger();
        let summary = engine
            .summarize(&expenses, at(13, 12), Granularity::Week)
            .unwrap();
        assert_eq!(
            summary.series,
            engine.bucketize(&expenses, at(13, 12), Granularity::Week).unwrap()
        );
        assert_eq!(
            summary.comparison,
            engine.compare(&expenses, at(13, 12), Granularity::Week).unwrap()
        );
        assert_eq!(summary.series.total(), summary.comparison.current_total);
    }

    #[test]
    fn lists_current_period_in_requested_order() {
        let engine = AggregationEngine::new(Calendar::new(chrono_tz::Tz::UTC, Weekday::Mon));
        let expenses = ledger();
        let listed = engine
            .expenses_in_period(&expenses, at(13, 12), Granularity::Week, ExpenseOrder::Name)
            .unwrap();
        let names: Vec<&str> = listed.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Aldi", "Rewe"]);
    }
}
