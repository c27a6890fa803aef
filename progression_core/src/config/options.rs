//! Statistic options - the tunable rule set for one rule context

use serde::{Deserialize, Serialize};
use sheet_core::StatisticGroup;
use std::path::Path;
use std::sync::OnceLock;

use super::ConfigError;

/// Global default options, used where no campaign overrides them
static STATISTIC_OPTIONS: OnceLock<StatisticOptions> = OnceLock::new();

/// Initialize the global options from a TOML file
///
/// Returns error if already initialized or if loading fails.
pub fn init_options(path: &Path) -> Result<(), ConfigError> {
    let options = StatisticOptions::load_from_path(path)?;
    STATISTIC_OPTIONS
        .set(options)
        .map_err(|_| ConfigError::ValidationError("StatisticOptions already initialized".to_string()))
}

/// Initialize the global options with default values
pub fn init_options_default() -> Result<(), ConfigError> {
    STATISTIC_OPTIONS
        .set(StatisticOptions::default())
        .map_err(|_| ConfigError::ValidationError("StatisticOptions already initialized".to_string()))
}

/// Get the global options, falling back to defaults when never initialized
pub fn options() -> &'static StatisticOptions {
    STATISTIC_OPTIONS.get_or_init(StatisticOptions::default)
}

pub fn options_initialized() -> bool {
    STATISTIC_OPTIONS.get().is_some()
}

/// Ensure options are initialized with defaults (idempotent, useful for tests)
pub fn ensure_options_initialized() {
    STATISTIC_OPTIONS.get_or_init(StatisticOptions::default);
}

/// Limits for one statistic group during initial setup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupOptions {
    /// Lowest value a statistic may be set to
    pub min: i32,
    /// Highest value a statistic may be set to
    pub max: i32,
    /// Point budget shared by the whole group
    pub points: i32,
    /// How many statistics may sit at `max` (0 disables the cap)
    #[serde(default)]
    pub at_max: u32,
    /// How many statistics may be proficient
    #[serde(default)]
    pub proficient: u32,
}

impl GroupOptions {
    fn validate(&self, group: &str) -> Result<(), ConfigError> {
        if self.min > self.max {
            return Err(ConfigError::ValidationError(format!(
                "{group}: min ({}) is greater than max ({})",
                self.min, self.max
            )));
        }
        if self.points < self.min {
            return Err(ConfigError::ValidationError(format!(
                "{group}: point budget ({}) is below min ({})",
                self.points, self.min
            )));
        }
        Ok(())
    }
}

/// Rule set governing statistic allocation and advancement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticOptions {
    /// Characters at or below this level are still in initial setup
    #[serde(default = "default_initial_setup_max_level")]
    pub initial_setup_max_level: u32,
    #[serde(default = "default_attribute_options")]
    pub attributes: GroupOptions,
    #[serde(default = "default_skill_options")]
    pub skills: GroupOptions,
    /// Attribute points granted per level gained
    #[serde(default = "default_attribute_points_on_level_up")]
    pub attribute_points_on_level_up: i32,
    /// Base skill points granted per level gained
    #[serde(default = "default_skill_points_on_level_up")]
    pub skill_points_on_level_up: i32,
    /// Extra value gained per point spent on a proficient attribute
    #[serde(default = "default_proficient_attribute_multiplier")]
    pub proficient_attribute_multiplier: f64,
    /// Extra value gained per point spent on a proficient skill
    #[serde(default = "default_proficient_skill_multiplier")]
    pub proficient_skill_multiplier: f64,
}

impl Default for StatisticOptions {
    fn default() -> Self {
        StatisticOptions {
            initial_setup_max_level: default_initial_setup_max_level(),
            attributes: default_attribute_options(),
            skills: default_skill_options(),
            attribute_points_on_level_up: default_attribute_points_on_level_up(),
            skill_points_on_level_up: default_skill_points_on_level_up(),
            proficient_attribute_multiplier: default_proficient_attribute_multiplier(),
            proficient_skill_multiplier: default_proficient_skill_multiplier(),
        }
    }
}

impl StatisticOptions {
    /// Load options from a TOML file
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let options: StatisticOptions = super::load_toml(path)?;
        options.validate()?;
        Ok(options)
    }

    /// Parse options from a TOML string
    pub fn parse(toml: &str) -> Result<Self, ConfigError> {
        let options: StatisticOptions = super::parse_toml(toml)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.attributes.validate("attributes")?;
        self.skills.validate("skills")?;
        if self.proficient_attribute_multiplier < 0.0 || self.proficient_skill_multiplier < 0.0 {
            return Err(ConfigError::ValidationError(
                "proficiency multipliers must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Limits for a statistic group
    pub fn group(&self, group: StatisticGroup) -> &GroupOptions {
        match group {
            StatisticGroup::Attribute => &self.attributes,
            StatisticGroup::Skill => &self.skills,
        }
    }

    pub fn proficient_multiplier(&self, group: StatisticGroup) -> f64 {
        match group {
            StatisticGroup::Attribute => self.proficient_attribute_multiplier,
            StatisticGroup::Skill => self.proficient_skill_multiplier,
        }
    }
}

fn default_initial_setup_max_level() -> u32 {
    1
}

fn default_attribute_options() -> GroupOptions {
    GroupOptions {
        min: 1,
        max: 10,
        points: 40,
        at_max: 7,
        proficient: 0,
    }
}

fn default_skill_options() -> GroupOptions {
    GroupOptions {
        min: 1,
        max: 100,
        points: 100,
        at_max: 0,
        proficient: 3,
    }
}

fn default_attribute_points_on_level_up() -> i32 {
    1
}

fn default_skill_points_on_level_up() -> i32 {
    10
}

fn default_proficient_attribute_multiplier() -> f64 {
    1.0
}

fn default_proficient_skill_multiplier() -> f64 {
    1.5
}
