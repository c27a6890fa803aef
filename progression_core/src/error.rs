use sheet_core::StoreError;
use thiserror::Error;

/// A rejected statistic change
///
/// Every variant is a recoverable rules violation whose message can be shown
/// to the player as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgressionError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{statistic} cannot be lower than {min}")]
    TooLow { statistic: String, min: i32 },

    #[error("{statistic} cannot be higher than {max}")]
    TooHigh { statistic: String, max: i32 },

    #[error("Not enough points: tried to use {attempted} but only {available} are available")]
    NotEnoughPoints { attempted: i32, available: i32 },

    #[error("Too many statistics at their maximum value (limit {cap})")]
    TooManyAtMax { cap: u32 },

    #[error("Level too high: {0}")]
    LevelTooHigh(String),

    #[error("Level too low: {0}")]
    LevelTooLow(String),

    #[error("{0} has no value yet")]
    StatisticNotFound(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

impl ProgressionError {
    pub fn not_enough_points(attempted: i32, available: i32) -> Self {
        Self::NotEnoughPoints {
            attempted,
            available,
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }
}

/// Error from a store-backed progression call
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Progression(#[from] ProgressionError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
