// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use rand::{
    rngs::SmallRng,
    Rng,
    SeedableRng,
};

use crate::{
    config::Config,
    errs::{
        Result,
        SkipListError,
    },
};

/// Upon the insertion of a new node in the list, the node is replicated to high
/// levels with a certain probability as determined by a `LevelGenerator`.
pub trait LevelGenerator {
    /// The total number of levels that are assumed to exist for this level
    /// generator.
    fn total(&self) -> usize;
    /// Generate a random level for a new node in the range `[0, total)`.
    ///
    /// This must never return a level that is `>= self.total()`.
    fn random(&mut self) -> usize;
}

/// A level generator which will produce geometrically distributed numbers.
///
/// Every node starts on level 0 and is promoted one level at a time for as
/// long as a coin weighted with `p` keeps landing heads, truncated at the
/// maximum number of levels allowed.
#[derive(Debug, Clone)]
pub struct GeometricalLevelGenerator {
    total: usize,
    p: f64,
    rng: SmallRng, // Fast generator
}

impl GeometricalLevelGenerator {
    /// Create a new GeometricalLevelGenerator with `total` number of levels,
    /// and `p` as the probability that a given node is present in the next
    /// level. The generator is seeded from system entropy.
    ///
    /// # Errors
    ///
    /// `p` must be strictly between 0 and 1, and `total` must be at least 1.
    pub fn new(total: usize, p: f64) -> Result<Self> {
        Self::with_rng(total, p, SmallRng::from_entropy())
    }

    /// Same as [`GeometricalLevelGenerator::new`] but with a reproducible
    /// sequence of levels.
    pub fn seeded(total: usize, p: f64, seed: u64) -> Result<Self> {
        Self::with_rng(total, p, SmallRng::seed_from_u64(seed))
    }

    pub fn from_config(total: usize, config: &Config) -> Result<Self> {
        match config.seed() {
            | Some(seed) => Self::seeded(total, config.probability(), seed),
            | None => Self::new(total, config.probability()),
        }
    }

    fn with_rng(total: usize, p: f64, rng: SmallRng) -> Result<Self> {
        if total == 0 {
            return Err(SkipListError::InvalidLevels(total));
        }
        Config::new(p).validate()?;
        Ok(GeometricalLevelGenerator { total, p, rng })
    }

    pub fn probability(&self) -> f64 {
        self.p
    }
}

impl LevelGenerator for GeometricalLevelGenerator {
    fn random(&mut self) -> usize {
        let mut h = 0;
        while h + 1 < self.total && self.rng.gen_bool(self.p) {
            h += 1;
        }
        h
    }

    fn total(&self) -> usize {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::{
        GeometricalLevelGenerator,
        LevelGenerator,
    };
    use crate::errs::SkipListError;

    #[test]
    fn invalid_total() {
        assert_eq!(
            GeometricalLevelGenerator::new(0, 0.5).unwrap_err(),
            SkipListError::InvalidLevels(0)
        );
    }

    #[test]
    fn invalid_p_0() {
        assert!(GeometricalLevelGenerator::new(1, 0.0).is_err());
    }

    #[test]
    fn invalid_p_1() {
        assert!(GeometricalLevelGenerator::new(1, 1.0).is_err());
    }

    #[test]
    fn new() {
        let generator = GeometricalLevelGenerator::new(1, 0.5).unwrap();
        assert_eq!(generator.total(), 1);
        assert_eq!(generator.probability(), 0.5);
    }

    #[test]
    fn single_level_never_promotes() {
        let mut generator = GeometricalLevelGenerator::seeded(1, 0.99, 3).unwrap();
        for _ in 0..1_000 {
            assert_eq!(generator.random(), 0);
        }
    }

    #[test]
    fn levels_stay_in_range() {
        let mut generator = GeometricalLevelGenerator::seeded(4, 0.9, 11).unwrap();
        let mut seen_top = false;
        for _ in 0..10_000 {
            let level = generator.random();
            assert!(level < 4);
            seen_top |= level == 3;
        }
        assert!(seen_top, "with p = 0.9 the top level must be reached");
    }

    #[test]
    fn distribution_is_roughly_geometric() {
        let mut generator = GeometricalLevelGenerator::seeded(16, 0.5, 42).unwrap();
        let mut counts = [0usize; 16];
        let draws = 100_000;
        for _ in 0..draws {
            counts[generator.random()] += 1;
        }
        // about half of the draws stay on level 0, a quarter reach exactly 1
        assert!((45_000..55_000).contains(&counts[0]), "level 0: {}", counts[0]);
        assert!((22_000..28_000).contains(&counts[1]), "level 1: {}", counts[1]);
    }

    #[test]
    fn seeded_is_reproducible() {
        let mut a = GeometricalLevelGenerator::seeded(8, 0.5, 99).unwrap();
        let mut b = GeometricalLevelGenerator::seeded(8, 0.5, 99).unwrap();
        for _ in 0..100 {
            assert_eq!(a.random(), b.random());
        }
    }
}
