//! Seeded random streams for concurrent roll evaluation
//!
//! A single lock-protected generator hands out seeds; every worker owns the
//! stream built from its seed, so concurrent evaluations never share a
//! mutable generator.

use crate::resolver::{roll_message_with_rng, roll_statistic_with_rng};
use rand::{Rng, SeedableRng};
use rand_chacha::{ChaCha20Rng, ChaCha8Rng};
use sheet_core::{Character, Statistic};
use std::sync::Mutex;

/// Lock-protected generator of worker seeds
#[derive(Debug)]
pub struct SeedSource {
    rng: Mutex<ChaCha20Rng>,
}

impl SeedSource {
    pub fn new(seed: u64) -> Self {
        SeedSource {
            rng: Mutex::new(ChaCha20Rng::seed_from_u64(seed)),
        }
    }

    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Draw the seed for the next worker stream
    pub fn next_seed(&self) -> u64 {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen()
    }

    pub fn worker(&self) -> RollWorker {
        RollWorker::new(self.next_seed())
    }
}

/// One independent random stream, owned by a single evaluation or thread
#[derive(Debug, Clone)]
pub struct RollWorker {
    rng: ChaCha8Rng,
}

impl RollWorker {
    pub fn new(seed: u64) -> Self {
        RollWorker {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    pub fn roll_statistic(&mut self, statistic: &Statistic, character: &Character) -> Option<f64> {
        roll_statistic_with_rng(statistic, character, &mut self.rng)
    }

    pub fn roll_message(&mut self, statistic: &Statistic, character: &Character) -> Option<String> {
        roll_message_with_rng(statistic, character, &mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_seed_source_is_reproducible() {
        let a = SeedSource::new(42);
        let b = SeedSource::new(42);
        let seeds_a: Vec<u64> = (0..5).map(|_| a.next_seed()).collect();
        let seeds_b: Vec<u64> = (0..5).map(|_| b.next_seed()).collect();
        assert_eq!(seeds_a, seeds_b);
    }

    #[test]
    fn test_workers_get_distinct_streams() {
        let source = SeedSource::new(1);
        let mut first = source.worker();
        let mut second = source.worker();

        let a: Vec<u32> = (0..8).map(|_| first.rng_mut().gen()).collect();
        let b: Vec<u32> = (0..8).map(|_| second.rng_mut().gen()).collect();
        assert_ne!(a, b);
    }

    #[test]
    fn test_concurrent_workers() {
        let source = Arc::new(SeedSource::new(2024));
        let stat = Statistic::attribute("Agility", "Coordination");
        let mut character = Character::new(1, 1, "Cass");
        character.set_value(stat.id.clone(), 7);
        let character = Arc::new(character);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let source = Arc::clone(&source);
                let stat = stat.clone();
                let character = Arc::clone(&character);
                thread::spawn(move || {
                    let mut worker = source.worker();
                    let seed_marker: u64 = worker.rng_mut().gen();
                    for _ in 0..100 {
                        let result = worker.roll_statistic(&stat, &character).unwrap();
                        assert!((-125.0..=100.0).contains(&result));
                    }
                    seed_marker
                })
            })
            .collect();

        let markers: HashSet<u64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(markers.len(), 8);
    }
}
