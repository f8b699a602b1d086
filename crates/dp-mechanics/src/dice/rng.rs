//! RNG-backed dice.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::DiceEvaluator;
use crate::error::{MechError, MechResult};

/// A [`DiceEvaluator`] that draws faces from a random number generator.
///
/// Seeding it makes a whole session of rolls reproducible.
#[derive(Debug, Clone)]
pub struct RngDice<R = StdRng> {
    rng: R,
}

impl RngDice<StdRng> {
    /// Create dice from a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create dice seeded from the operating system's entropy source.
    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl<R: Rng> RngDice<R> {
    /// Wrap an existing RNG.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Unwrap the underlying RNG.
    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl<R: Rng> DiceEvaluator for RngDice<R> {
    fn roll(&mut self, faces: u32, count: u32) -> MechResult<Vec<u32>> {
        if faces == 0 {
            return Err(MechError::DiceSource("cannot roll a zero-sided die".to_string()));
        }
        Ok((0..count)
            .map(|_| self.rng.random_range(1..=faces))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roll_produces_valid_values() {
        let mut dice = RngDice::seeded(42);
        let values = dice.roll(6, 10).unwrap();
        assert_eq!(values.len(), 10);
        for value in &values {
            assert!((1..=6).contains(value));
        }
    }

    #[test]
    fn roll_deterministic_with_seed() {
        let mut a = RngDice::seeded(99);
        let mut b = RngDice::seeded(99);
        assert_eq!(a.roll(20, 3).unwrap(), b.roll(20, 3).unwrap());
    }

    #[test]
    fn zero_count_is_empty() {
        let mut dice = RngDice::seeded(1);
        assert!(dice.roll(6, 0).unwrap().is_empty());
    }

    #[test]
    fn zero_faces_is_an_error() {
        let mut dice = RngDice::new(StdRng::seed_from_u64(1));
        assert!(matches!(dice.roll(0, 1), Err(MechError::DiceSource(_))));
    }
}
