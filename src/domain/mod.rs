//! Input records handed to the engine by the persistence layer, plus the
//! small enums the UI layer uses to select a view.

pub mod category;
pub mod expense;
pub mod granularity;

pub use category::Category;
pub use expense::{ExpenseOrder, ExpenseRecord};
pub use granularity::Granularity;
