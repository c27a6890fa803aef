//! roll_core - Graded statistic checks
//!
//! This library provides:
//! - roll_percentage: The deterministic curve from statistic value and d100 draw to a result
//! - RollGrade / roll_message: Named success and failure tiers
//! - RollResolver: Rolls through independent seeded streams, safe to share across threads
//!
//! # Quick Start
//!
//! ```rust
//! use roll_core::RollResolver;
//! use sheet_core::{Character, Statistic};
//!
//! let strength = Statistic::attribute("Strength", "Raw physical power");
//! let mut character = Character::new(1, 42, "Courier");
//! character.set_value(strength.id.clone(), 6);
//!
//! let resolver = RollResolver::new(12345);
//! let result = resolver.roll_statistic(&strength, &character).unwrap();
//! assert!((-125.0..=100.0).contains(&result));
//! ```

pub mod grade;
pub mod resolver;
pub mod seed;

pub use grade::{roll_message, RollGrade};
pub use resolver::{
    max_success_roll, roll_message_with_rng, roll_opposed_with_rng, roll_percentage,
    roll_statistic, roll_statistic_with_rng, OpposedRoll, RollResolver, BEST_ROLL, WORST_ROLL,
};
pub use seed::{RollWorker, SeedSource};
