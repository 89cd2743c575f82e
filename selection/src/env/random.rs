//! Randomness capability.
//!
//! Randomness is injected, never ambient: anything that needs it takes a
//! [`RandomSource`]. Tests and simulations seed a [`SeededRandom`] so every
//! run is reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_core::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A probability outside `[0, 1]`.
#[derive(Debug, Error, PartialEq)]
pub enum ProbabilityError {
    /// The offending value (NaN included).
    #[error("probability {0} is outside [0, 1]")]
    OutOfRange(f64),
}

/// A value in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Probability(f64);

impl Probability {
    /// Never happens.
    pub const NEVER: Probability = Probability(0.0);

    /// Always happens.
    pub const ALWAYS: Probability = Probability(1.0);

    /// Validates `p`.
    pub fn new(p: f64) -> Result<Self, ProbabilityError> {
        if (0.0..=1.0).contains(&p) {
            Ok(Self(p))
        } else {
            Err(ProbabilityError::OutOfRange(p))
        }
    }

    /// The raw value.
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Probability {
    type Error = ProbabilityError;

    fn try_from(p: f64) -> Result<Self, Self::Error> {
        Probability::new(p)
    }
}

impl From<Probability> for f64 {
    fn from(p: Probability) -> f64 {
        p.0
    }
}

/// Runs random-generation procedures.
pub trait RandomSource {
    /// The generator handed to procedures.
    type Rng: RngCore;

    /// Direct access to the generator.
    fn rng(&mut self) -> &mut Self::Rng;

    /// Runs `generator` against this source's generator.
    fn run_random<T, G>(&mut self, generator: G) -> T
    where
        G: FnOnce(&mut Self::Rng) -> T,
    {
        generator(self.rng())
    }

    /// Weighted coin toss. `NEVER` is false on every toss, `ALWAYS` is true
    /// on every toss, whatever the generator produces.
    fn coin_toss(&mut self, p: Probability) -> bool {
        if p.value() <= 0.0 {
            return false;
        }
        if p.value() >= 1.0 {
            return true;
        }
        self.run_random(|rng| rng.gen_bool(p.value()))
    }
}

/// Randomness from a seeded [`StdRng`].
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    /// Reproducible source for `seed`.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Source seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl RandomSource for SeededRandom {
    type Rng = StdRng;

    fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probability_bounds() {
        assert!(Probability::new(0.0).is_ok());
        assert!(Probability::new(1.0).is_ok());
        assert_eq!(
            Probability::new(-0.1),
            Err(ProbabilityError::OutOfRange(-0.1))
        );
        assert!(Probability::new(1.0001).is_err());
        assert!(Probability::new(f64::NAN).is_err());
    }

    #[test]
    fn never_is_always_false() {
        let mut random = SeededRandom::from_seed(1);
        assert!((0..10_000).all(|_| !random.coin_toss(Probability::NEVER)));
    }

    #[test]
    fn always_is_always_true() {
        let mut random = SeededRandom::from_seed(2);
        assert!((0..10_000).all(|_| random.coin_toss(Probability::ALWAYS)));
    }

    #[test]
    fn fair_coin_lands_both_ways() {
        let mut random = SeededRandom::from_seed(3);
        let half = Probability::new(0.5).expect("valid");
        let heads = (0..1_000).filter(|_| random.coin_toss(half)).count();
        assert!(heads > 350 && heads < 650, "heads = {heads}");
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SeededRandom::from_seed(42);
        let mut b = SeededRandom::from_seed(42);
        let xs: Vec<u64> = (0..8).map(|_| a.run_random(|r| r.gen())).collect();
        let ys: Vec<u64> = (0..8).map(|_| b.run_random(|r| r.gen())).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn probability_deserialization_validates() {
        let ok: Probability = serde_json::from_str("0.25").expect("valid");
        assert_eq!(ok.value(), 0.25);
        let bad: Result<Probability, _> = serde_json::from_str("2.0");
        assert!(bad.is_err());
    }
}
