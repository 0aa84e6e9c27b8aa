use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::category::Category;

const UNCATEGORIZED_SYMBOL: &str = "💵";

/// A single recorded expense.
///
/// Amounts are expected to be non-negative but refunds entered as negative
/// values are summed like any other amount.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExpenseRecord {
    pub name: String,
    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

impl ExpenseRecord {
    pub fn new(name: impl Into<String>, amount: Decimal, timestamp: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            amount,
            timestamp,
            category: None,
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Glyph shown next to the expense; uncategorized expenses get a banknote.
    pub fn symbol(&self) -> &str {
        self.category
            .as_ref()
            .map(|category| category.symbol.as_str())
            .unwrap_or(UNCATEGORIZED_SYMBOL)
    }
}

/// Sort orders offered by the expense list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseOrder {
    Name,
    #[default]
    NewestFirst,
    Amount,
}

impl ExpenseOrder {
    pub fn compare(&self, a: &ExpenseRecord, b: &ExpenseRecord) -> Ordering {
        match self {
            ExpenseOrder::Name => a.name.cmp(&b.name),
            ExpenseOrder::NewestFirst => b.timestamp.cmp(&a.timestamp),
            ExpenseOrder::Amount => a.amount.cmp(&b.amount),
        }
    }

    /// Stable sort, so records that compare equal keep their snapshot order.
    pub fn sort(&self, records: &mut [&ExpenseRecord]) {
        records.sort_by(|a, b| self.compare(a, b));
    }
}
