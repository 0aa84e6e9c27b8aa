use std::result::Result as StdResult;

use thiserror::Error;

/// Error type shared by the calendar helpers, the aggregation engine and
/// configuration loading.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Calendar resolution failed: {0}")]
    CalendarResolution(String),
    #[error("Invalid window: {0}")]
    InvalidWindow(String),
    #[error("Amount overflow: {0}")]
    AmountOverflow(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = StdResult<T, EngineError>;
