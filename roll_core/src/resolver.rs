//! Roll resolution - turning a statistic value and a d100 draw into a graded percentage
//!
//! Each statistic value maps to a success ceiling. The draw is compared to the
//! ceiling and the margin is expressed as a percentage of it:
//! - Attribute ceiling: round(32.2 * sqrt(value) - 7)
//! - Skill ceiling: round(10 * sqrt(value) - 0.225 * value - 1)
//! - result = round((ceiling - draw) / ceiling * 100, 1), clamped to [-125, 100]

use crate::grade::roll_message;
use crate::seed::{RollWorker, SeedSource};
use rand::Rng;
use sheet_core::{Character, Statistic, StatisticGroup};
use std::cell::RefCell;
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Worst possible result, reserved for unusable statistics and the deepest failures
pub const WORST_ROLL: f64 = -125.0;

/// Best possible result
pub const BEST_ROLL: f64 = 100.0;

/// Process-wide seed generator for the thread-local workers
static GLOBAL_SEEDS: OnceLock<Arc<SeedSource>> = OnceLock::new();

thread_local! {
    static THREAD_WORKER: RefCell<Option<RollWorker>> = const { RefCell::new(None) };
}

fn global_seeds() -> &'static Arc<SeedSource> {
    GLOBAL_SEEDS.get_or_init(|| Arc::new(SeedSource::from_entropy()))
}

/// Highest draw that still succeeds for a statistic at `value`
pub fn max_success_roll(group: StatisticGroup, value: i32) -> f64 {
    let v = value as f64;
    let ceiling = match group {
        StatisticGroup::Attribute => 32.2 * v.sqrt() - 7.0,
        StatisticGroup::Skill => 10.0 * v.sqrt() - 0.225 * v - 1.0,
    };
    ceiling.round_ties_even()
}

/// Graded percentage for a fixed draw in `1..=100`
pub fn roll_percentage(statistic: &Statistic, value: i32, draw: u32) -> f64 {
    let unusable = value <= 0 || statistic.min_value().is_some_and(|min| value < min);
    if unusable {
        return WORST_ROLL;
    }

    let ceiling = max_success_roll(statistic.group(), value);
    if ceiling <= 0.0 {
        return WORST_ROLL;
    }

    let percentage = (ceiling - draw as f64) / ceiling * 100.0;
    let rounded = (percentage * 10.0).round_ties_even() / 10.0;
    rounded.clamp(WORST_ROLL, BEST_ROLL)
}

/// Roll a statistic with a provided RNG (for deterministic testing)
///
/// Returns `None` when the character holds no value for the statistic.
pub fn roll_statistic_with_rng(
    statistic: &Statistic,
    character: &Character,
    rng: &mut impl Rng,
) -> Option<f64> {
    let value = character.value_of(&statistic.id)?;
    let draw = rng.gen_range(1..=100);
    let result = roll_percentage(statistic, value, draw);
    debug!(
        character = character.id,
        statistic = %statistic.id,
        value,
        draw,
        result,
        "rolled statistic"
    );
    Some(result)
}

/// Roll a statistic on this thread's worker stream
pub fn roll_statistic(statistic: &Statistic, character: &Character) -> Option<f64> {
    THREAD_WORKER.with(|cell| {
        let mut worker = cell.borrow_mut();
        let worker = worker.get_or_insert_with(|| global_seeds().worker());
        worker.roll_statistic(statistic, character)
    })
}

/// Outcome of two characters rolling against each other
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpposedRoll {
    pub attacker: f64,
    pub defender: f64,
}

impl OpposedRoll {
    /// Ties go to the defender
    pub fn attacker_wins(&self) -> bool {
        self.attacker > self.defender
    }

    pub fn margin(&self) -> f64 {
        self.attacker - self.defender
    }
}

/// Roll both sides of an opposed check with one RNG
pub fn roll_opposed_with_rng(
    attacker: &Character,
    attacker_stat: &Statistic,
    defender: &Character,
    defender_stat: &Statistic,
    rng: &mut impl Rng,
) -> Option<OpposedRoll> {
    let attacker = roll_statistic_with_rng(attacker_stat, attacker, rng)?;
    let defender = roll_statistic_with_rng(defender_stat, defender, rng)?;
    Some(OpposedRoll { attacker, defender })
}

/// Resolves statistic checks, handing each caller an independent random stream
#[derive(Debug, Clone)]
pub struct RollResolver {
    seeds: Arc<SeedSource>,
}

impl RollResolver {
    /// Reproducible resolver: the same seed yields the same worker streams
    pub fn new(seed: u64) -> Self {
        RollResolver {
            seeds: Arc::new(SeedSource::new(seed)),
        }
    }

    pub fn from_entropy() -> Self {
        RollResolver {
            seeds: Arc::new(SeedSource::from_entropy()),
        }
    }

    pub fn with_seed_source(seeds: Arc<SeedSource>) -> Self {
        RollResolver { seeds }
    }

    /// A worker with its own stream, for one command evaluation or thread
    pub fn worker(&self) -> RollWorker {
        self.seeds.worker()
    }

    pub fn roll_statistic(&self, statistic: &Statistic, character: &Character) -> Option<f64> {
        self.worker().roll_statistic(statistic, character)
    }

    pub fn roll_message(&self, statistic: &Statistic, character: &Character) -> Option<String> {
        self.worker().roll_message(statistic, character)
    }

    pub fn roll_opposed(
        &self,
        attacker: &Character,
        attacker_stat: &Statistic,
        defender: &Character,
        defender_stat: &Statistic,
    ) -> Option<OpposedRoll> {
        let mut worker = self.worker();
        roll_opposed_with_rng(attacker, attacker_stat, defender, defender_stat, worker.rng_mut())
    }
}

/// Roll and grade a statistic with a provided RNG
pub fn roll_message_with_rng(
    statistic: &Statistic,
    character: &Character,
    rng: &mut impl Rng,
) -> Option<String> {
    let result = roll_statistic_with_rng(statistic, character, rng)?;
    Some(roll_message(statistic, character, result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    fn strength() -> Statistic {
        Statistic::attribute("Strength", "Raw physical power")
    }

    fn sneak() -> Statistic {
        Statistic::skill("Sneak", "Moving unseen", "Agility")
    }

    fn make_test_rng() -> StdRng {
        StdRng::seed_from_u64(12345)
    }

    #[test]
    fn test_success_ceilings() {
        assert_close(max_success_roll(StatisticGroup::Attribute, 1), 25.0);
        assert_close(max_success_roll(StatisticGroup::Attribute, 5), 65.0);
        assert_close(max_success_roll(StatisticGroup::Attribute, 10), 95.0);
        assert_close(max_success_roll(StatisticGroup::Skill, 16), 35.0);
        assert_close(max_success_roll(StatisticGroup::Skill, 25), 43.0);
    }

    #[test]
    fn test_attribute_percentages() {
        let stat = strength();
        assert_close(roll_percentage(&stat, 5, 1), 98.5);
        assert_close(roll_percentage(&stat, 5, 65), 0.0);
        assert_close(roll_percentage(&stat, 5, 100), -53.8);
        assert_close(roll_percentage(&stat, 10, 50), 47.4);
    }

    #[test]
    fn test_skill_percentages() {
        let stat = sneak();
        assert_close(roll_percentage(&stat, 25, 1), 97.7);
        assert_close(roll_percentage(&stat, 16, 10), 71.4);
    }

    #[test]
    fn test_results_clamped_to_worst() {
        assert_close(roll_percentage(&sneak(), 25, 100), WORST_ROLL);
        assert_close(roll_percentage(&strength(), 1, 100), WORST_ROLL);
    }

    #[test]
    fn test_zero_value_is_worst_roll() {
        for draw in [1, 50, 100] {
            assert_close(roll_percentage(&strength(), 0, draw), WORST_ROLL);
            assert_close(roll_percentage(&strength(), -3, draw), WORST_ROLL);
        }
    }

    #[test]
    fn test_below_skill_minimum_is_worst_roll() {
        let stat = sneak().with_min_value(10);
        assert_close(roll_percentage(&stat, 9, 1), WORST_ROLL);
        assert!(roll_percentage(&stat, 10, 1) > 0.0);
    }

    #[test]
    fn test_roll_without_value_is_none() {
        let character = Character::new(1, 1, "Veronica");
        let mut rng = make_test_rng();
        assert!(roll_statistic_with_rng(&strength(), &character, &mut rng).is_none());
        assert!(roll_message_with_rng(&strength(), &character, &mut rng).is_none());
    }

    #[test]
    fn test_roll_in_range() {
        let stat = strength();
        let mut character = Character::new(1, 1, "Veronica");
        character.set_value(stat.id.clone(), 6);
        let mut rng = make_test_rng();

        for _ in 0..1000 {
            let result = roll_statistic_with_rng(&stat, &character, &mut rng).unwrap();
            assert!((WORST_ROLL..=BEST_ROLL).contains(&result));
        }
    }

    #[test]
    fn test_zero_strength_message() {
        let stat = strength();
        let mut character = Character::new(1, 1, "Veronica");
        character.set_value(stat.id.clone(), 0);
        let mut rng = make_test_rng();

        assert_eq!(roll_statistic_with_rng(&stat, &character, &mut rng), Some(WORST_ROLL));
        let message = roll_message_with_rng(&stat, &character, &mut rng).unwrap();
        assert!(message.contains("CRITICAL STRENGTH FAILURE"));
        assert!(message.contains("Veronica"));
        assert!(message.contains("125%"));
    }

    #[test]
    fn test_thread_worker_roll() {
        let stat = strength();
        let mut character = Character::new(1, 1, "Veronica");
        character.set_value(stat.id.clone(), 4);

        let result = roll_statistic(&stat, &character).unwrap();
        assert!((WORST_ROLL..=BEST_ROLL).contains(&result));
    }

    #[test]
    fn test_resolver_reproducible() {
        let stat = sneak();
        let mut character = Character::new(1, 1, "Veronica");
        character.set_value(stat.id.clone(), 40);

        let a = RollResolver::new(99);
        let b = RollResolver::new(99);
        for _ in 0..20 {
            assert_eq!(a.roll_statistic(&stat, &character), b.roll_statistic(&stat, &character));
        }
    }

    #[test]
    fn test_opposed_roll() {
        let stat = strength();
        let mut strong = Character::new(1, 1, "Lanius");
        strong.set_value(stat.id.clone(), 10);
        let mut weak = Character::new(2, 2, "Raider");
        weak.set_value(stat.id.clone(), 0);

        let resolver = RollResolver::new(7);
        let outcome = resolver.roll_opposed(&strong, &stat, &weak, &stat).unwrap();
        assert_close(outcome.defender, WORST_ROLL);
        assert!(outcome.attacker_wins());
        assert!(outcome.margin() > 0.0);

        let tie = OpposedRoll {
            attacker: 10.0,
            defender: 10.0,
        };
        assert!(!tie.attacker_wins());
    }

    #[test]
    fn test_opposed_roll_needs_both_values() {
        let stat = strength();
        let mut strong = Character::new(1, 1, "Lanius");
        strong.set_value(stat.id.clone(), 10);
        let empty = Character::new(2, 2, "Raider");

        let resolver = RollResolver::new(7);
        assert!(resolver.roll_opposed(&strong, &stat, &empty, &stat).is_none());
    }

    proptest! {
        #[test]
        fn prop_higher_draw_lowers_result(value in 1i32..=100, draw in 1u32..100, skill in any::<bool>()) {
            let stat = if skill { sneak() } else { strength() };
            let low = roll_percentage(&stat, value, draw);
            let high = roll_percentage(&stat, value, draw + 1);
            if high > WORST_ROLL {
                prop_assert!(high < low);
            } else {
                prop_assert!(high <= low);
            }
        }

        #[test]
        fn prop_higher_value_never_lowers_result(value in 1i32..100, draw in 1u32..=100, skill in any::<bool>()) {
            let stat = if skill { sneak() } else { strength() };
            let low = roll_percentage(&stat, value, draw);
            let high = roll_percentage(&stat, value + 1, draw);
            prop_assert!(high >= low);
        }
    }
}
