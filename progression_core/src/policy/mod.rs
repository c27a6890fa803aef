//! Progression policies - pluggable rules for changing a character's statistics

mod generic;
mod level_economy;

pub use generic::GenericPolicy;
pub use level_economy::{LevelEconomyPolicy, SKILL_BASE, TAG_BONUS};

use crate::config::StatisticOptions;
use crate::error::ProgressionError;
use serde::{Deserialize, Serialize};
use sheet_core::{Character, Statistic, StatisticCatalog, StatisticGroup};
use tracing::info;

/// Which rules apply to a statistic group at the moment of a call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Values are allocated from a fixed point budget
    Setup,
    /// Values are bought with points earned by levelling
    Advancement,
}

/// Points granted for a span of levels gained
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelGrant {
    pub attribute_points: i32,
    pub skill_points: i32,
}

/// Summary of an experience gain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUp {
    pub from: u32,
    pub to: u32,
    pub attribute_points: i32,
    pub skill_points: i32,
}

impl LevelUp {
    pub fn levels_gained(&self) -> u32 {
        self.to - self.from
    }
}

/// The rule set governing how a character's statistics may change
pub trait ProgressionPolicy {
    fn options(&self) -> &StatisticOptions;

    /// Which phase a statistic group of `character` is in
    fn phase(&self, character: &Character, group: StatisticGroup) -> Phase;

    /// Set a statistic to `new_value`; `None` is rejected as missing input
    fn set_statistic(
        &self,
        character: &mut Character,
        statistic: &Statistic,
        new_value: Option<i32>,
    ) -> Result<(), ProgressionError>;

    /// Mark or unmark a statistic as proficient
    fn set_proficiency(
        &self,
        character: &mut Character,
        statistic: &Statistic,
        proficient: bool,
    ) -> Result<(), ProgressionError>;

    /// Revert a character to the state before initial setup
    fn reset_character(&self, character: &mut Character) -> Result<(), ProgressionError>;

    /// Points granted for every level in `from + 1..=to`, saturating
    ///
    /// Must run in constant time regardless of how many levels are crossed.
    fn levels_grant(&self, character: &Character, from: u32, to: u32) -> LevelGrant;

    /// Add experience, granting points once for every level gained
    fn add_experience(
        &self,
        character: &mut Character,
        amount: u64,
    ) -> Result<LevelUp, ProgressionError> {
        let from = character.level();
        character.gain_experience(amount);
        let to = character.level();

        let grant = if to > from {
            self.levels_grant(character, from, to)
        } else {
            LevelGrant::default()
        };
        character.grant_points(grant.attribute_points, grant.skill_points);
        let summary = LevelUp {
            from,
            to,
            attribute_points: grant.attribute_points,
            skill_points: grant.skill_points,
        };

        if to > from {
            info!(
                character = character.id,
                from,
                to,
                attribute_points = summary.attribute_points,
                skill_points = summary.skill_points,
                "character levelled up"
            );
        }
        Ok(summary)
    }
}

/// Selectable policy variants, e.g. from campaign settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    #[default]
    Generic,
    LevelEconomy,
}

/// Number of levels in `from + 1..=to` as a point multiplier
pub(crate) fn levels_between(from: u32, to: u32) -> i32 {
    i32::try_from(to.saturating_sub(from)).unwrap_or(i32::MAX)
}

/// Build the policy for a rule context
pub fn build_policy<C>(
    kind: PolicyKind,
    catalog: C,
    options: StatisticOptions,
) -> Box<dyn ProgressionPolicy + Send + Sync>
where
    C: StatisticCatalog + Send + Sync + 'static,
{
    match kind {
        PolicyKind::Generic => Box::new(GenericPolicy::new(catalog, options)),
        PolicyKind::LevelEconomy => Box::new(LevelEconomyPolicy::new(catalog, options)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheet_core::{default_catalog, xp_for_level};

    #[test]
    fn test_generic_add_experience_grants_per_level() {
        let policy = build_policy(PolicyKind::Generic, default_catalog(), StatisticOptions::default());
        let mut character = Character::new(1, 1, "Wanderer");

        let level_up = policy
            .add_experience(&mut character, xp_for_level(4))
            .unwrap();

        assert_eq!(level_up.from, 1);
        assert_eq!(level_up.to, 4);
        assert_eq!(level_up.levels_gained(), 3);
        assert_eq!(character.attribute_points(), 3);
        assert_eq!(character.skill_points(), 30);
    }

    #[test]
    fn test_add_experience_without_level_up() {
        let policy = build_policy(PolicyKind::Generic, default_catalog(), StatisticOptions::default());
        let mut character = Character::new(1, 1, "Wanderer");

        let level_up = policy.add_experience(&mut character, 50).unwrap();

        assert_eq!(level_up.levels_gained(), 0);
        assert_eq!(character.experience(), 50);
        assert_eq!(character.skill_points(), 0);
    }

    #[test]
    fn test_huge_experience_gain_saturates_balances() {
        for kind in [PolicyKind::Generic, PolicyKind::LevelEconomy] {
            let policy = build_policy(kind, default_catalog(), StatisticOptions::default());
            let mut character = Character::new(1, 1, "Wanderer");

            let level_up = policy
                .add_experience(&mut character, 4_000_000_000_000_000_000)
                .unwrap();
            assert!(level_up.levels_gained() > 100_000_000);
            assert_eq!(character.skill_points(), level_up.skill_points);

            policy.add_experience(&mut character, u64::MAX).unwrap();
            assert_eq!(character.experience(), u64::MAX);
            assert_eq!(character.skill_points(), i32::MAX);
            assert!(character.attribute_points() > 0);
        }
    }

    #[test]
    fn test_policy_kind_from_toml() {
        #[derive(Deserialize)]
        struct Campaign {
            policy: PolicyKind,
        }
        let campaign: Campaign = toml::from_str("policy = \"level_economy\"").unwrap();
        assert_eq!(campaign.policy, PolicyKind::LevelEconomy);
    }
}
