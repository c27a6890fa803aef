//! progression_core - Rules for allocating and advancing character statistics
//!
//! This library provides:
//! - StatisticOptions: The tunable rule set of one rule context
//! - ProgressionPolicy: The contract every rule set implements
//! - GenericPolicy: Point-budget allocation during initial setup
//! - LevelEconomyPolicy: Skills seeded from attributes and bought with level-up points
//!
//! # Quick Start
//!
//! ```rust
//! use progression_core::prelude::*;
//! use sheet_core::{default_catalog, Character, StatisticCatalog};
//!
//! let policy = LevelEconomyPolicy::new(default_catalog(), StatisticOptions::default());
//! let mut character = Character::new(1, 42, "Courier");
//!
//! let strength = policy.catalog().find("Strength").unwrap();
//! policy.set_statistic(&mut character, &strength, Some(7)).unwrap();
//! assert_eq!(character.value_of(&strength.id), Some(7));
//! ```

pub mod config;
pub mod error;
pub mod policy;
pub mod prelude;
pub mod service;

pub use config::{GroupOptions, StatisticOptions};
pub use error::{ProgressionError, ServiceError};
pub use policy::{
    build_policy, GenericPolicy, LevelEconomyPolicy, LevelGrant, LevelUp, Phase, PolicyKind,
    ProgressionPolicy,
};
pub use service::mutate_character;
