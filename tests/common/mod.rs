#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use expense_core::{config::ConfigManager, Category, ExpenseRecord};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a config manager backed by a unique directory.
pub fn setup_config_env() -> (ConfigManager, PathBuf) {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let manager = ConfigManager::with_base_dir(base.clone()).expect("create config manager");
    (manager, base)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

pub fn expense(name: &str, amount: Decimal, timestamp: DateTime<Utc>) -> ExpenseRecord {
    ExpenseRecord::new(name, amount, timestamp)
}

pub fn grocery(name: &str, amount: Decimal, timestamp: DateTime<Utc>) -> ExpenseRecord {
    ExpenseRecord::new(name, amount, timestamp).with_category(Category::new("Groceries", "🛒"))
}
