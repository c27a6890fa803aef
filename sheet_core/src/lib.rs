//! sheet_core - Statistic model for tabletop character sheets
//!
//! This library provides:
//! - Statistic: Attributes and the Skills they govern
//! - StatisticValue: A character's numeric and proficiency state for one statistic
//! - Character: The aggregate owning those values, experience and point balances
//! - StatisticCatalog: Read-only catalog of every statistic in a rule context
//! - CharacterStore: The persistence collaborator's interface

pub mod catalog;
pub mod character;
pub mod config;
pub mod store;
pub mod types;

pub use catalog::{default_catalog, StatisticCatalog, StatisticRegistry};
pub use character::{level_for_experience, xp_for_level, Character};
pub use store::CharacterStore;
pub use types::{Statistic, StatisticGroup, StatisticId, StatisticKind, StatisticValue};

use std::path::PathBuf;
use thiserror::Error;

/// Error loading a statistic catalog
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading '{path:?}': {error}")]
    Io {
        error: std::io::Error,
        path: Option<PathBuf>,
    },
    #[error("Parse error in '{path}': {error}")]
    Parse {
        error: toml::de::Error,
        path: PathBuf,
    },
    #[error("Validation error in '{path}': {message}")]
    Validation { message: String, path: PathBuf },
}

/// Error reported by a character store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No character found for user {0}")]
    NotFound(u64),
    #[error("Storage backend error: {0}")]
    Backend(String),
}
