use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("city rotation requires at least one city")]
pub struct EmptyCitySet;

/// Shuffle-then-drain rotation: every city is handed out once before any
/// city repeats, and each cycle gets a fresh order.
#[derive(Debug, Clone)]
pub struct CityQueue {
    cities: Vec<&'static str>,
    pending: Vec<&'static str>,
}

impl CityQueue {
    pub fn new(cities: Vec<&'static str>) -> Result<Self, EmptyCitySet> {
        if cities.is_empty() {
            return Err(EmptyCitySet);
        }

        Ok(Self {
            cities,
            pending: Vec::new(),
        })
    }

    /// Rotation over every city in the reference city/state table.
    pub fn standard() -> Result<Self, EmptyCitySet> {
        Self::new(super::reference::known_cities())
    }

    pub fn cycle_len(&self) -> usize {
        self.cities.len()
    }

    pub fn remaining_in_cycle(&self) -> usize {
        self.pending.len()
    }

    pub fn next_city(&mut self, rng: &mut ChaCha8Rng) -> Result<&'static str, EmptyCitySet> {
        if self.pending.is_empty() {
            self.pending = self.cities.clone();
            self.pending.shuffle(rng);
        }

        self.pending.pop().ok_or(EmptyCitySet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn rejects_empty_city_set() {
        assert_eq!(CityQueue::new(Vec::new()).unwrap_err(), EmptyCitySet);
    }

    #[test]
    fn each_cycle_covers_every_city_once() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut queue = CityQueue::standard().expect("reference cities");
        let cycle = queue.cycle_len();

        for _ in 0..3 {
            let drawn: HashSet<_> = (0..cycle)
                .map(|_| queue.next_city(&mut rng).expect("city"))
                .collect();
            assert_eq!(drawn.len(), cycle);
            assert_eq!(queue.remaining_in_cycle(), 0);
        }
    }

    #[test]
    fn refills_only_when_drained() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut queue = CityQueue::new(vec!["Omaha", "Denver", "Miami"]).expect("non-empty");

        queue.next_city(&mut rng).expect("city");
        assert_eq!(queue.remaining_in_cycle(), 2);
        queue.next_city(&mut rng).expect("city");
        queue.next_city(&mut rng).expect("city");
        assert_eq!(queue.remaining_in_cycle(), 0);
        queue.next_city(&mut rng).expect("city");
        assert_eq!(queue.remaining_in_cycle(), 2);
    }

    #[test]
    fn standard_rotation_uses_the_checked_constructor() {
        let queue = CityQueue::standard().expect("reference cities");
        assert_eq!(queue.cycle_len(), crate::generation::reference::known_cities().len());
        assert_eq!(queue.remaining_in_cycle(), 0);
    }

    #[test]
    fn drained_empty_rotation_reports_error() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut queue = CityQueue {
            cities: Vec::new(),
            pending: Vec::new(),
        };
        assert_eq!(queue.next_city(&mut rng), Err(EmptyCitySet));
    }
}
