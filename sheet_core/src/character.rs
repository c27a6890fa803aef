//! Character aggregate - the sparse mapping of statistics a character holds

use crate::types::{Statistic, StatisticGroup, StatisticId, StatisticValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Experience required to reach `level`
///
/// Level 1 starts at 0, level 2 at 200, level 3 at 550, each level costing
/// 150 more than the previous one.
pub fn xp_for_level(level: u32) -> u64 {
    if level <= 1 {
        return 0;
    }
    let l = level as u128;
    let xp = 25 * (l - 1) * (3 * l + 2);
    u64::try_from(xp).unwrap_or(u64::MAX)
}

/// Highest level whose experience threshold has been reached
pub fn level_for_experience(experience: u64) -> u32 {
    // Invert 75L^2 - 25L - 50 = xp, then settle the float estimate
    let estimate = (25.0 + (625.0 + 300.0 * (experience as f64 + 50.0)).sqrt()) / 150.0;
    let mut level = (estimate.floor() as u32).max(1);
    while level > 1 && xp_for_level(level) > experience {
        level -= 1;
    }
    while level < u32::MAX && xp_for_level(level + 1) <= experience {
        level += 1;
    }
    level
}

/// A player character and the statistic values it holds
///
/// Characters start with no statistics; values are added the first time
/// a progression policy sets them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: u64,
    /// External user that owns this character
    pub user_id: u64,
    pub name: String,
    /// Never decreases
    experience: u64,
    /// Spendable attribute currency, never negative
    attribute_points: i32,
    /// Spendable skill currency, never negative
    skill_points: i32,
    statistics: BTreeMap<StatisticId, StatisticValue>,
}

impl Character {
    pub fn new(id: u64, user_id: u64, name: impl Into<String>) -> Self {
        Character {
            id,
            user_id,
            name: name.into(),
            experience: 0,
            attribute_points: 0,
            skill_points: 0,
            statistics: BTreeMap::new(),
        }
    }

    pub fn experience(&self) -> u64 {
        self.experience
    }

    /// Add experience, saturating at the top of the curve
    pub fn gain_experience(&mut self, amount: u64) {
        self.experience = self.experience.saturating_add(amount);
    }

    pub fn attribute_points(&self) -> i32 {
        self.attribute_points
    }

    pub fn skill_points(&self) -> i32 {
        self.skill_points
    }

    /// Spendable balance for a statistic group
    pub fn points(&self, group: StatisticGroup) -> i32 {
        match group {
            StatisticGroup::Attribute => self.attribute_points,
            StatisticGroup::Skill => self.skill_points,
        }
    }

    /// Credit earned points, saturating at `i32::MAX`
    pub fn grant_points(&mut self, attribute_points: i32, skill_points: i32) {
        self.attribute_points = self.attribute_points.saturating_add(attribute_points.max(0));
        self.skill_points = self.skill_points.saturating_add(skill_points.max(0));
    }

    /// Debit `cost` from a group's balance
    ///
    /// Returns `false` and leaves the balance untouched when it cannot cover
    /// the cost.
    #[must_use]
    pub fn spend_points(&mut self, group: StatisticGroup, cost: i32) -> bool {
        let balance = match group {
            StatisticGroup::Attribute => &mut self.attribute_points,
            StatisticGroup::Skill => &mut self.skill_points,
        };
        if cost < 0 || cost > *balance {
            return false;
        }
        *balance -= cost;
        true
    }

    pub fn clear_points(&mut self) {
        self.attribute_points = 0;
        self.skill_points = 0;
    }

    pub fn level(&self) -> u32 {
        level_for_experience(self.experience)
    }

    /// Experience still needed for the next level
    pub fn experience_to_next_level(&self) -> u64 {
        xp_for_level(self.level() + 1).saturating_sub(self.experience)
    }

    /// Get the value held for a statistic
    pub fn statistic(&self, id: &StatisticId) -> Option<&StatisticValue> {
        self.statistics.get(id)
    }

    pub fn statistic_mut(&mut self, id: &StatisticId) -> Option<&mut StatisticValue> {
        self.statistics.get_mut(id)
    }

    /// Current numeric value for a statistic, if set
    pub fn value_of(&self, id: &StatisticId) -> Option<i32> {
        self.statistics.get(id).map(|v| v.value)
    }

    /// Create or overwrite the numeric value, keeping proficiency state
    pub fn set_value(&mut self, id: StatisticId, value: i32) {
        self.statistics.entry(id).or_default().value = value;
    }

    pub fn has_statistic(&self, id: &StatisticId) -> bool {
        self.statistics.contains_key(id)
    }

    /// Iterate over all held statistic values
    pub fn statistics(&self) -> impl Iterator<Item = (&StatisticId, &StatisticValue)> {
        self.statistics.iter()
    }

    /// Values held for the given statistics, skipping unset ones
    pub fn values_for<'a>(
        &'a self,
        stats: &'a [Statistic],
    ) -> impl Iterator<Item = &'a StatisticValue> + 'a {
        stats.iter().filter_map(move |s| self.statistics.get(&s.id))
    }

    pub fn clear_statistics(&mut self) {
        self.statistics.clear();
    }
}
