#![doc(test(attr(deny(warnings))))]

//! Expense Core turns a snapshot of dated expense records into calendar-aligned
//! spending series and period-over-period comparisons. The same engine backs
//! the phone views and the home-screen widget so both agree on every total.

pub mod aggregation;
pub mod calendar;
pub mod config;
pub mod domain;
pub mod errors;
pub mod money;
pub mod utils;

pub use aggregation::{
    AggregationEngine, BucketSeries, DateWindow, PeriodComparison, PeriodCursor, PeriodWindows,
    SpendingSummary, TimeBucket, Trend,
};
pub use calendar::Calendar;
pub use domain::{Category, ExpenseOrder, ExpenseRecord, Granularity};
pub use errors::{EngineError, Result};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Expense Core tracing initialized.");
    });
}
