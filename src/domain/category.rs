use serde::{Deserialize, Serialize};

/// Groups expenses for display. The name is the unique key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Category {
    pub name: String,
    pub symbol: String,
}

impl Category {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
        }
    }

    /// Seed categories inserted into an empty store.
    pub fn defaults() -> Vec<Category> {
        vec![
            Category::new("Groceries", "🛒"),
            Category::new("Insurance", "🛡️"),
            Category::new("Lunch", "🥗"),
        ]
    }
}
