//! Generic policy - point-budget allocation during initial setup only
//!
//! While a character is at or below the setup level, or a statistic group has
//! not been fully allocated, values in that group are distributed from the
//! group's point budget. Once setup is over the generic rules allow no further
//! changes; advancement belongs to richer policies.

use super::{levels_between, LevelGrant, Phase, ProgressionPolicy};
use crate::config::StatisticOptions;
use crate::error::ProgressionError;
use sheet_core::{Character, Statistic, StatisticCatalog, StatisticGroup};
use tracing::debug;

pub struct GenericPolicy<C> {
    catalog: C,
    options: StatisticOptions,
}

impl<C: StatisticCatalog> GenericPolicy<C> {
    pub fn new(catalog: C, options: StatisticOptions) -> Self {
        GenericPolicy { catalog, options }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Whether every attribute is set and the attribute budget is spent
    pub fn initial_attributes_set(&self, character: &Character) -> bool {
        self.group_set(character, StatisticGroup::Attribute)
    }

    /// Whether every skill is set and the skill budget is spent
    pub fn initial_skills_set(&self, character: &Character) -> bool {
        self.group_set(character, StatisticGroup::Skill)
    }

    /// A group is set when the character holds a value for each of its
    /// statistics and those values add up to at least the group budget
    pub fn group_set(&self, character: &Character, group: StatisticGroup) -> bool {
        let stats = self.catalog.group(group);
        let (count, sum) = character
            .values_for(&stats)
            .fold((0usize, 0i32), |(count, sum), v| (count + 1, sum + v.value));

        count == stats.len() && sum >= self.options.group(group).points
    }

    pub(crate) fn phase_for(&self, character: &Character, group: StatisticGroup) -> Phase {
        if character.level() <= self.options.initial_setup_max_level
            || !self.group_set(character, group)
        {
            Phase::Setup
        } else {
            Phase::Advancement
        }
    }

    /// Allocate `new_value` from the group's point budget
    ///
    /// Nothing is written unless every check passes.
    pub(crate) fn allocate_initial(
        &self,
        character: &mut Character,
        statistic: &Statistic,
        new_value: i32,
    ) -> Result<(), ProgressionError> {
        let group = statistic.group();
        let limits = self.options.group(group);

        if new_value < limits.min {
            return Err(ProgressionError::TooLow {
                statistic: statistic.name.clone(),
                min: limits.min,
            });
        }
        if new_value > limits.max {
            return Err(ProgressionError::TooHigh {
                statistic: statistic.name.clone(),
                max: limits.max,
            });
        }

        // The statistic's current value is refunded before the new one is charged
        let others: Vec<i32> = self
            .catalog
            .group(group)
            .iter()
            .filter(|s| s.id != statistic.id)
            .filter_map(|s| character.value_of(&s.id))
            .collect();

        let total = others.iter().sum::<i32>() + new_value;
        if total > limits.points {
            return Err(ProgressionError::not_enough_points(total, limits.points));
        }

        if limits.at_max > 0 && new_value == limits.max {
            let at_max = others.iter().filter(|&&v| v == limits.max).count() as u32;
            if at_max + 1 > limits.at_max {
                return Err(ProgressionError::TooManyAtMax { cap: limits.at_max });
            }
        }

        let old = character.value_of(&statistic.id);
        character.set_value(statistic.id.clone(), new_value);
        debug!(
            character = character.id,
            statistic = %statistic.id,
            ?old,
            new = new_value,
            total,
            "allocated statistic"
        );
        Ok(())
    }

    /// Validate a proficiency change against the group's proficiency cap
    ///
    /// Returns whether the flag actually changes.
    pub(crate) fn check_proficiency(
        &self,
        character: &Character,
        statistic: &Statistic,
        proficient: bool,
    ) -> Result<bool, ProgressionError> {
        let group = statistic.group();
        let cap = self.options.group(group).proficient;
        let stats = self.catalog.group(group);

        let others = stats
            .iter()
            .filter(|s| s.id != statistic.id)
            .filter_map(|s| character.statistic(&s.id))
            .filter(|v| v.is_proficient)
            .count() as u32;
        let current = character.statistic(&statistic.id);
        let already = current.is_some_and(|v| v.is_proficient);
        let count = others + already as u32;

        if character.level() > self.options.initial_setup_max_level && count >= cap {
            return Err(ProgressionError::LevelTooHigh(format!(
                "all {cap} {group} proficiencies are already chosen"
            )));
        }
        if proficient && !already && others + 1 > cap {
            return Err(ProgressionError::not_enough_points(others as i32 + 1, cap as i32));
        }
        if current.is_none() {
            return Err(ProgressionError::StatisticNotFound(statistic.name.clone()));
        }

        Ok(already != proficient)
    }

    fn reject(&self, character: &Character, err: ProgressionError) -> ProgressionError {
        debug!(character = character.id, error = %err, "rejected statistic change");
        err
    }
}

impl<C: StatisticCatalog> ProgressionPolicy for GenericPolicy<C> {
    fn options(&self) -> &StatisticOptions {
        &self.options
    }

    fn phase(&self, character: &Character, group: StatisticGroup) -> Phase {
        self.phase_for(character, group)
    }

    fn set_statistic(
        &self,
        character: &mut Character,
        statistic: &Statistic,
        new_value: Option<i32>,
    ) -> Result<(), ProgressionError> {
        let Some(new_value) = new_value else {
            return Err(self.reject(
                character,
                ProgressionError::InvalidInput(format!("a value for {} is required", statistic.name)),
            ));
        };

        match self.phase_for(character, statistic.group()) {
            Phase::Setup => self
                .allocate_initial(character, statistic, new_value)
                .map_err(|e| self.reject(character, e)),
            Phase::Advancement => Err(self.reject(
                character,
                ProgressionError::LevelTooHigh(format!(
                    "{} cannot be changed after initial setup (level {})",
                    statistic.name,
                    character.level()
                )),
            )),
        }
    }

    fn set_proficiency(
        &self,
        character: &mut Character,
        statistic: &Statistic,
        proficient: bool,
    ) -> Result<(), ProgressionError> {
        self.check_proficiency(character, statistic, proficient)
            .map_err(|e| self.reject(character, e))?;

        if let Some(value) = character.statistic_mut(&statistic.id) {
            value.is_proficient = proficient;
        }
        debug!(
            character = character.id,
            statistic = %statistic.id,
            proficient,
            "set proficiency"
        );
        Ok(())
    }

    fn reset_character(&self, _character: &mut Character) -> Result<(), ProgressionError> {
        Err(ProgressionError::unsupported(
            "resetting characters is not available under the generic rules",
        ))
    }

    fn levels_grant(&self, _character: &Character, from: u32, to: u32) -> LevelGrant {
        let levels = levels_between(from, to);
        LevelGrant {
            attribute_points: self.options.attribute_points_on_level_up.saturating_mul(levels),
            skill_points: self.options.skill_points_on_level_up.saturating_mul(levels),
        }
    }
}
