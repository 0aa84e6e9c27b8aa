use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    calendar::Calendar,
    domain::{ExpenseRecord, Granularity},
    errors::Result,
    money,
};

use super::window::{DateWindow, PeriodWindows, WindowResolver};

/// Direction of current spending relative to the previous period.
///
/// Only the direction is reported; whether a decrease is good news is up to
/// the presentation layer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Trend {
    Increased,
    Neutral,
    Decreased,
}

impl Trend {
    pub fn between(current: Decimal, previous: Decimal) -> Self {
        match current.cmp(&previous) {
            Ordering::Greater => Trend::Increased,
            Ordering::Equal => Trend::Neutral,
            Ordering::Less => Trend::Decreased,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PeriodComparison {
    pub current_total: Decimal,
    pub previous_total: Decimal,
    pub trend: Trend,
}

impl PeriodComparison {
    pub fn new(current_total: Decimal, previous_total: Decimal) -> Self {
        Self {
            current_total,
            previous_total,
            trend: Trend::between(current_total, previous_total),
        }
    }

    /// Current minus previous total, `None` on overflow.
    pub fn difference(&self) -> Option<Decimal> {
        self.current_total.checked_sub(self.previous_total)
    }
}

/// Compares spending in the reference period with the period before it.
///
/// Both periods are filtered with the same half-open `[start, end)` rule.
#[derive(Debug, Clone, Copy)]
pub struct Comparator<'a> {
    calendar: &'a Calendar,
}

impl<'a> Comparator<'a> {
    pub fn new(calendar: &'a Calendar) -> Self {
        Self { calendar }
    }

    pub fn compare(
        &self,
        expenses: &[ExpenseRecord],
        reference: DateTime<Utc>,
        granularity: Granularity,
    ) -> Result<PeriodComparison> {
        let windows = WindowResolver::new(self.calendar).resolve(reference, granularity)?;
        self.compare_windows(expenses, &windows)
    }

    pub fn compare_windows(
        &self,
        expenses: &[ExpenseRecord],
        windows: &PeriodWindows,
    ) -> Result<PeriodComparison> {
        let current_total = window_total(expenses, &windows.current)?;
        let previous_total = window_total(expenses, &windows.previous)?;
        let comparison = PeriodComparison::new(current_total, previous_total);
        debug!(
            current = %current_total,
            previous = %previous_total,
            trend = ?comparison.trend,
            "compared periods"
        );
        Ok(comparison)
    }
}

/// Sum of amounts whose timestamp falls inside `window`.
pub fn window_total(expenses: &[ExpenseRecord], window: &DateWindow) -> Result<Decimal> {
    money::checked_total(
        expenses
            .iter()
            .filter(|expense| window.contains(expense.timestamp))
            .map(|expense| expense.amount),
    )
}
