//! Level economy policy - skills derived from attributes, bought with level-up points
//!
//! Attributes are allocated from the setup budget exactly as under the generic
//! rules. Skills are never hand-set during setup: once every attribute is in
//! place each skill is seeded from its governing attribute and Luck, and is
//! re-derived on every later attribute change until setup ends. After setup,
//! attribute and skill points earned by levelling buy increases.

use super::generic::GenericPolicy;
use super::{levels_between, LevelGrant, Phase, ProgressionPolicy};
use crate::config::StatisticOptions;
use crate::error::ProgressionError;
use sheet_core::{Character, Statistic, StatisticCatalog, StatisticGroup, StatisticId};
use tracing::debug;

/// Base value every seeded skill starts from
pub const SKILL_BASE: i32 = 2;

/// Flat value added to a skill when it is tagged proficient
pub const TAG_BONUS: i32 = 15;

const INTELLIGENCE: &str = "Intelligence";
const LUCK: &str = "Luck";

pub struct LevelEconomyPolicy<C> {
    base: GenericPolicy<C>,
}

impl<C: StatisticCatalog> LevelEconomyPolicy<C> {
    pub fn new(catalog: C, options: StatisticOptions) -> Self {
        LevelEconomyPolicy {
            base: GenericPolicy::new(catalog, options),
        }
    }

    pub fn catalog(&self) -> &C {
        self.base.catalog()
    }

    pub fn initial_attributes_set(&self, character: &Character) -> bool {
        self.base.initial_attributes_set(character)
    }

    /// Skill points for reaching `new_level` with the given intelligence
    ///
    /// Half of intelligence (rounded down) is added to the base grant; odd
    /// intelligence earns one more point on every even level.
    pub fn skill_points_for_level(&self, intelligence: i32, new_level: u32) -> i32 {
        let bonus = if intelligence % 2 != 0 && new_level % 2 == 0 {
            1
        } else {
            0
        };
        self.base
            .options()
            .skill_points_on_level_up
            .saturating_add(intelligence.div_euclid(2))
            .saturating_add(bonus)
    }

    /// Whether skills have been seeded on this character
    fn skills_seeded(&self, character: &Character) -> bool {
        self.catalog()
            .skills()
            .iter()
            .any(|skill| character.has_statistic(&skill.id))
    }

    /// Seeded value of a skill from its governing attribute and Luck
    pub fn seeded_skill_value(&self, character: &Character, skill: &Statistic) -> i32 {
        let attribute = skill
            .governing_attribute()
            .and_then(|id| character.value_of(id))
            .unwrap_or(0);
        let luck = self.named_value(character, LUCK);
        SKILL_BASE + attribute * 2 + luck.div_euclid(2)
    }

    /// Re-derive every skill from the current attributes
    ///
    /// Tagged skills keep their proficiency bonus on top of the seeded value.
    fn seed_skills(&self, character: &mut Character) {
        for skill in self.catalog().skills() {
            let seeded = self.seeded_skill_value(character, &skill);
            let bonus = character
                .statistic(&skill.id)
                .filter(|v| v.is_proficient)
                .map_or(0, |v| v.proficiency);
            character.set_value(skill.id.clone(), seeded + bonus);
        }
        debug!(character = character.id, "seeded skills from attributes");
    }

    fn named_value(&self, character: &Character, name: &str) -> i32 {
        let id = self
            .catalog()
            .find(name)
            .map(|s| s.id)
            .unwrap_or_else(|| StatisticId::new(name));
        character.value_of(&id).unwrap_or(0)
    }

    /// Buy an increase with the group's earned points
    fn spend(
        &self,
        character: &mut Character,
        statistic: &Statistic,
        new_value: i32,
    ) -> Result<(), ProgressionError> {
        let group = statistic.group();
        let options = self.base.options();
        let current = character
            .statistic(&statistic.id)
            .copied()
            .ok_or_else(|| ProgressionError::StatisticNotFound(statistic.name.clone()))?;

        if new_value < current.value {
            return Err(ProgressionError::TooLow {
                statistic: statistic.name.clone(),
                min: current.value,
            });
        }
        let max = options.group(group).max;
        if new_value > max {
            return Err(ProgressionError::TooHigh {
                statistic: statistic.name.clone(),
                max,
            });
        }

        let cost = new_value - current.value;
        let balance = character.points(group);
        if !character.spend_points(group, cost) {
            return Err(ProgressionError::not_enough_points(cost, balance));
        }

        // Proficiency inflates the gain, never the cost
        let gain = if current.is_proficient {
            (cost as f64 * options.proficient_multiplier(group)).floor() as i32
        } else {
            cost
        };
        let stored = current.value.saturating_add(gain);

        character.set_value(statistic.id.clone(), stored);
        debug!(
            character = character.id,
            statistic = %statistic.id,
            old = current.value,
            new = stored,
            cost,
            "bought statistic increase"
        );
        Ok(())
    }

    fn set_statistic_inner(
        &self,
        character: &mut Character,
        statistic: &Statistic,
        new_value: Option<i32>,
    ) -> Result<(), ProgressionError> {
        let new_value = new_value.ok_or_else(|| {
            ProgressionError::InvalidInput(format!("a value for {} is required", statistic.name))
        })?;

        match statistic.group() {
            StatisticGroup::Attribute => match self.phase(character, StatisticGroup::Attribute) {
                Phase::Setup => {
                    self.base.allocate_initial(character, statistic, new_value)?;
                    if self.skills_seeded(character) || self.base.initial_attributes_set(character) {
                        self.seed_skills(character);
                    }
                    Ok(())
                }
                Phase::Advancement => self.spend(character, statistic, new_value),
            },
            StatisticGroup::Skill => match self.phase(character, StatisticGroup::Skill) {
                Phase::Setup => Err(ProgressionError::unsupported(format!(
                    "{} is derived from attributes during initial setup",
                    statistic.name
                ))),
                Phase::Advancement if !self.base.initial_attributes_set(character) => {
                    Err(ProgressionError::LevelTooLow(format!(
                        "attributes must be fully set before {} can be raised",
                        statistic.name
                    )))
                }
                Phase::Advancement => self.spend(character, statistic, new_value),
            },
        }
    }

    fn set_proficiency_inner(
        &self,
        character: &mut Character,
        statistic: &Statistic,
        proficient: bool,
    ) -> Result<(), ProgressionError> {
        if statistic.is_attribute() {
            return Err(ProgressionError::unsupported(format!(
                "attributes such as {} cannot be tagged",
                statistic.name
            )));
        }
        if !self.base.check_proficiency(character, statistic, proficient)? {
            return Ok(());
        }

        if let Some(value) = character.statistic_mut(&statistic.id) {
            value.is_proficient = proficient;
            if proficient {
                value.value += TAG_BONUS;
                value.proficiency = TAG_BONUS;
            } else {
                value.value -= value.proficiency;
                value.proficiency = 0;
            }
        }
        debug!(
            character = character.id,
            statistic = %statistic.id,
            proficient,
            "tagged skill"
        );
        Ok(())
    }
}

impl<C: StatisticCatalog> ProgressionPolicy for LevelEconomyPolicy<C> {
    fn options(&self) -> &StatisticOptions {
        self.base.options()
    }

    /// Skills follow the setup level alone, since their completeness is
    /// derived from attributes rather than a spent budget
    fn phase(&self, character: &Character, group: StatisticGroup) -> Phase {
        match group {
            StatisticGroup::Attribute => self.base.phase_for(character, group),
            StatisticGroup::Skill => {
                if character.level() <= self.options().initial_setup_max_level {
                    Phase::Setup
                } else {
                    Phase::Advancement
                }
            }
        }
    }

    fn set_statistic(
        &self,
        character: &mut Character,
        statistic: &Statistic,
        new_value: Option<i32>,
    ) -> Result<(), ProgressionError> {
        self.set_statistic_inner(character, statistic, new_value)
            .inspect_err(|e| debug!(character = character.id, error = %e, "rejected statistic change"))
    }

    fn set_proficiency(
        &self,
        character: &mut Character,
        statistic: &Statistic,
        proficient: bool,
    ) -> Result<(), ProgressionError> {
        self.set_proficiency_inner(character, statistic, proficient)
            .inspect_err(|e| debug!(character = character.id, error = %e, "rejected proficiency change"))
    }

    fn reset_character(&self, character: &mut Character) -> Result<(), ProgressionError> {
        character.clear_statistics();
        character.clear_points();
        debug!(character = character.id, "reset character statistics");
        Ok(())
    }

    /// Every level earns the odd-level grant; odd intelligence adds one
    /// point per even level crossed
    fn levels_grant(&self, character: &Character, from: u32, to: u32) -> LevelGrant {
        let intelligence = self.named_value(character, INTELLIGENCE);
        let levels = levels_between(from, to);
        let per_level = self.skill_points_for_level(intelligence, 1);
        let parity_bonus = if intelligence % 2 != 0 {
            levels_between(from / 2, to / 2)
        } else {
            0
        };
        LevelGrant {
            attribute_points: self
                .options()
                .attribute_points_on_level_up
                .saturating_mul(levels),
            skill_points: per_level.saturating_mul(levels).saturating_add(parity_bonus),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheet_core::{default_catalog, xp_for_level, StatisticRegistry};

    fn policy() -> LevelEconomyPolicy<StatisticRegistry> {
        LevelEconomyPolicy::new(default_catalog(), StatisticOptions::default())
    }

    fn stat(policy: &LevelEconomyPolicy<StatisticRegistry>, name: &str) -> Statistic {
        policy.catalog().find(name).unwrap()
    }

    fn set(
        policy: &LevelEconomyPolicy<StatisticRegistry>,
        character: &mut Character,
        name: &str,
        value: i32,
    ) -> Result<(), ProgressionError> {
        let s = stat(policy, name);
        policy.set_statistic(character, &s, Some(value))
    }

    fn value(policy: &LevelEconomyPolicy<StatisticRegistry>, character: &Character, name: &str) -> i32 {
        character.value_of(&stat(policy, name).id).unwrap()
    }

    /// Strength 10, Perception 2, Endurance 6, Charisma 6, Intelligence 6, Agility 5, Luck 5
    fn set_up_character(policy: &LevelEconomyPolicy<StatisticRegistry>) -> Character {
        let mut character = Character::new(7, 70, "Courier");
        for (name, v) in [
            ("Strength", 10),
            ("Perception", 2),
            ("Endurance", 6),
            ("Charisma", 6),
            ("Intelligence", 6),
            ("Agility", 5),
            ("Luck", 5),
        ] {
            set(policy, &mut character, name, v).unwrap();
        }
        character
    }

    fn advance(policy: &LevelEconomyPolicy<StatisticRegistry>, character: &mut Character, level: u32) {
        let needed = xp_for_level(level) - character.experience();
        policy.add_experience(character, needed).unwrap();
    }

    #[test]
    fn test_skill_points_parity_matrix() {
        let policy = policy();
        let base = StatisticOptions::default().skill_points_on_level_up;

        // (intelligence, new level, expected bonus over base)
        let cases = [
            (5, 2, 2 + 1),
            (5, 3, 2),
            (5, 4, 2 + 1),
            (6, 2, 3),
            (6, 3, 3),
            (1, 2, 0 + 1),
            (0, 2, 0),
            (9, 10, 4 + 1),
            (9, 11, 4),
        ];
        for (intelligence, level, extra) in cases {
            assert_eq!(
                policy.skill_points_for_level(intelligence, level),
                base + extra,
                "intelligence {intelligence}, level {level}"
            );
        }
    }

    #[test]
    fn test_level_up_from_even_to_odd_has_no_bonus() {
        let policy = policy();
        let mut character = set_up_character(&policy);
        set(&policy, &mut character, "Intelligence", 5).unwrap();
        advance(&policy, &mut character, 2);
        let before = character.skill_points();

        let level_up = policy
            .add_experience(&mut character, xp_for_level(3) - xp_for_level(2))
            .unwrap();

        assert_eq!(level_up.levels_gained(), 1);
        let base = policy.options().skill_points_on_level_up;
        assert_eq!(character.skill_points() - before, base + 2);
    }

    #[test]
    fn test_multiple_levels_evaluated_per_level() {
        let policy = policy();
        let mut character = set_up_character(&policy);
        set(&policy, &mut character, "Intelligence", 5).unwrap();
        set(&policy, &mut character, "Luck", 6).unwrap();

        // 1 -> 5 crosses levels 2, 3, 4, 5: two even levels earn the bonus
        let level_up = policy.add_experience(&mut character, xp_for_level(5)).unwrap();

        let base = policy.options().skill_points_on_level_up;
        assert_eq!(level_up.to, 5);
        assert_eq!(level_up.skill_points, 4 * (base + 2) + 2);
        assert_eq!(character.skill_points(), level_up.skill_points);
        assert_eq!(character.attribute_points(), 4);
    }

    #[test]
    fn test_skills_seeded_once_attributes_set() {
        let policy = policy();
        let mut character = Character::new(1, 1, "Courier");
        set(&policy, &mut character, "Strength", 10).unwrap();
        assert!(!character.has_statistic(&stat(&policy, "Melee Weapons").id));

        let character = set_up_character(&policy);
        // 2 + Strength 10 * 2 + Luck 5 / 2
        assert_eq!(value(&policy, &character, "Melee Weapons"), 24);
        // 2 + Perception 2 * 2 + 2
        assert_eq!(value(&policy, &character, "Lockpick"), 8);
        assert_eq!(value(&policy, &character, "Science"), 16);
    }

    #[test]
    fn test_skills_reseeded_when_luck_changes() {
        let policy = policy();
        let mut character = set_up_character(&policy);
        set(&policy, &mut character, "Luck", 3).unwrap();
        set(&policy, &mut character, "Strength", 10).unwrap();
        set(&policy, &mut character, "Agility", 7).unwrap();

        assert_eq!(value(&policy, &character, "Melee Weapons"), 23);
        assert_eq!(value(&policy, &character, "Sneak"), 2 + 14 + 1);
    }

    #[test]
    fn test_skills_follow_attributes_that_drop_below_budget() {
        let policy = policy();
        let mut character = set_up_character(&policy);

        set(&policy, &mut character, "Luck", 1).unwrap();
        assert!(!policy.initial_attributes_set(&character));

        for skill in policy.catalog().skills() {
            assert_eq!(
                character.value_of(&skill.id),
                Some(policy.seeded_skill_value(&character, &skill)),
                "{}",
                skill.name
            );
        }
        // 2 + Strength 10 * 2 + Luck 1 / 2
        assert_eq!(value(&policy, &character, "Melee Weapons"), 22);

        set(&policy, &mut character, "Strength", 8).unwrap();
        assert_eq!(value(&policy, &character, "Melee Weapons"), 18);
    }

    #[test]
    fn test_closed_form_grant_matches_per_level_sum() {
        let policy = policy();
        let mut character = set_up_character(&policy);
        for intelligence in [5, 6] {
            set(&policy, &mut character, "Intelligence", intelligence).unwrap();
            for (from, to) in [(1, 2), (2, 3), (1, 9), (4, 11), (7, 8)] {
                let expected: i32 = (from + 1..=to)
                    .map(|level| policy.skill_points_for_level(intelligence, level))
                    .sum();
                assert_eq!(
                    policy.levels_grant(&character, from, to).skill_points,
                    expected,
                    "intelligence {intelligence}, {from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn test_huge_proficiency_multiplier_saturates() {
        let options = StatisticOptions {
            proficient_skill_multiplier: 1.0e12,
            ..StatisticOptions::default()
        };
        let policy = LevelEconomyPolicy::new(default_catalog(), options);
        let mut character = set_up_character(&policy);
        let guns = stat(&policy, "Guns");
        policy.set_proficiency(&mut character, &guns, true).unwrap();
        advance(&policy, &mut character, 2);
        let tagged = value(&policy, &character, "Guns");

        set(&policy, &mut character, "Guns", tagged + 1).unwrap();
        assert_eq!(value(&policy, &character, "Guns"), i32::MAX);
    }

    #[test]
    fn test_skills_cannot_be_hand_set_during_setup() {
        let policy = policy();
        let mut character = set_up_character(&policy);

        let result = set(&policy, &mut character, "Sneak", 30);
        assert!(matches!(result, Err(ProgressionError::Unsupported(_))));
    }

    #[test]
    fn test_skills_need_attributes_after_setup_level() {
        let policy = policy();
        let mut character = Character::new(1, 1, "Courier");
        character.gain_experience(xp_for_level(3));

        let result = set(&policy, &mut character, "Sneak", 30);
        assert!(matches!(result, Err(ProgressionError::LevelTooLow(_))));
    }

    #[test]
    fn test_attribute_purchase_after_setup() {
        let policy = policy();
        let mut character = set_up_character(&policy);
        advance(&policy, &mut character, 3);
        assert_eq!(character.attribute_points(), 2);

        set(&policy, &mut character, "Perception", 4).unwrap();
        assert_eq!(value(&policy, &character, "Perception"), 4);
        assert_eq!(character.attribute_points(), 0);

        let result = set(&policy, &mut character, "Perception", 5);
        assert_eq!(result, Err(ProgressionError::not_enough_points(1, 0)));
        assert_eq!(value(&policy, &character, "Perception"), 4);
    }

    #[test]
    fn test_attributes_cannot_be_lowered_after_setup() {
        let policy = policy();
        let mut character = set_up_character(&policy);
        advance(&policy, &mut character, 2);

        let result = set(&policy, &mut character, "Strength", 9);
        assert!(matches!(result, Err(ProgressionError::TooLow { min: 10, .. })));
    }

    #[test]
    fn test_proficient_skill_gain_is_multiplied() {
        let policy = policy();
        let mut character = set_up_character(&policy);
        let sneak = stat(&policy, "Sneak");
        policy.set_proficiency(&mut character, &sneak, true).unwrap();
        let tagged = value(&policy, &character, "Sneak");
        assert_eq!(tagged, 2 + 10 + 2 + TAG_BONUS);

        advance(&policy, &mut character, 2);
        let points = character.skill_points();

        set(&policy, &mut character, "Sneak", tagged + 10).unwrap();
        assert_eq!(value(&policy, &character, "Sneak"), tagged + 15);
        assert_eq!(character.skill_points(), points - 10);
    }

    #[test]
    fn test_unproficient_skill_gain_is_flat() {
        let policy = policy();
        let mut character = set_up_character(&policy);
        advance(&policy, &mut character, 2);
        let guns = value(&policy, &character, "Guns");

        set(&policy, &mut character, "Guns", guns + 5).unwrap();
        assert_eq!(value(&policy, &character, "Guns"), guns + 5);
    }

    #[test]
    fn test_skill_purchase_requires_points() {
        let policy = policy();
        let mut character = set_up_character(&policy);
        advance(&policy, &mut character, 2);
        let points = character.skill_points();
        let guns = value(&policy, &character, "Guns");

        let result = set(&policy, &mut character, "Guns", guns + points + 1);
        assert_eq!(result, Err(ProgressionError::not_enough_points(points + 1, points)));
    }

    #[test]
    fn test_skill_purchase_capped_at_max() {
        let policy = policy();
        let mut character = set_up_character(&policy);
        advance(&policy, &mut character, 2);

        let result = set(&policy, &mut character, "Guns", 101);
        assert!(matches!(result, Err(ProgressionError::TooHigh { max: 100, .. })));
    }

    #[test]
    fn test_attributes_cannot_be_tagged() {
        let policy = policy();
        let mut character = set_up_character(&policy);
        let strength = stat(&policy, "Strength");

        let result = policy.set_proficiency(&mut character, &strength, true);
        assert!(matches!(result, Err(ProgressionError::Unsupported(_))));
    }

    #[test]
    fn test_tag_cap_after_setup() {
        let policy = policy();
        let mut character = set_up_character(&policy);
        for name in ["Sneak", "Guns"] {
            let s = stat(&policy, name);
            policy.set_proficiency(&mut character, &s, true).unwrap();
        }
        advance(&policy, &mut character, 2);

        // One tag left after setup
        let science = stat(&policy, "Science");
        policy.set_proficiency(&mut character, &science, true).unwrap();
        assert_eq!(value(&policy, &character, "Science"), 16 + TAG_BONUS);

        let repair = stat(&policy, "Repair");
        let result = policy.set_proficiency(&mut character, &repair, true);
        assert!(matches!(result, Err(ProgressionError::LevelTooHigh(_))));
    }

    #[test]
    fn test_untag_removes_bonus_and_survives_reseed() {
        let policy = policy();
        let mut character = set_up_character(&policy);
        let sneak = stat(&policy, "Sneak");

        policy.set_proficiency(&mut character, &sneak, true).unwrap();
        set(&policy, &mut character, "Agility", 4).unwrap();
        set(&policy, &mut character, "Luck", 6).unwrap();
        assert_eq!(value(&policy, &character, "Sneak"), 2 + 8 + 3 + TAG_BONUS);

        policy.set_proficiency(&mut character, &sneak, false).unwrap();
        assert_eq!(value(&policy, &character, "Sneak"), 2 + 8 + 3);
        assert_eq!(character.statistic(&sneak.id).unwrap().proficiency, 0);
    }

    #[test]
    fn test_reset_character() {
        let policy = policy();
        let mut character = set_up_character(&policy);
        advance(&policy, &mut character, 3);

        policy.reset_character(&mut character).unwrap();
        assert_eq!(character.statistics().count(), 0);
        assert_eq!(character.attribute_points(), 0);
        assert_eq!(character.skill_points(), 0);
        assert_eq!(character.level(), 3);
        assert_eq!(policy.phase(&character, StatisticGroup::Attribute), Phase::Setup);
    }
}
