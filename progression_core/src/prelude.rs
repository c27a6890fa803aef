//! Prelude module for convenient imports
//!
//! ```rust
//! use progression_core::prelude::*;
//! ```

// Policies
pub use crate::policy::{
    build_policy, GenericPolicy, LevelEconomyPolicy, LevelUp, Phase, PolicyKind, ProgressionPolicy,
};

// Config
pub use crate::config::{GroupOptions, StatisticOptions};

// Errors
pub use crate::error::{ProgressionError, ServiceError};
