// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use getset::CopyGetters;

use crate::errs::{
    Result,
    SkipListError,
};

/// The default promotion probability. Half the nodes on level `n` also
/// occupy level `n + 1`.
pub const DEFAULT_PROBABILITY: f64 = 0.5;

/// The default number of express lanes, enough for ~65K elements at the
/// default probability.
pub const DEFAULT_LEVELS: usize = 16;

/// Construction parameters for a [`SkipList`](crate::SkipList).
#[derive(Debug, Clone, Copy, PartialEq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct Config {
    /// Probability that a node on one level is promoted to the next.
    probability: f64,
    /// Fixed seed for the level generator. `None` seeds from entropy.
    seed: Option<u64>,
}

impl Config {
    pub fn new(probability: f64) -> Self {
        Config {
            probability,
            seed: None,
        }
    }

    pub fn with_probability(mut self, probability: f64) -> Self {
        self.probability = probability;
        self
    }

    /// Pin the level generator to a seed so level assignment is reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.probability.is_finite() || self.probability <= 0.0 || self.probability >= 1.0 {
            return Err(SkipListError::InvalidProbability(self.probability));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new(DEFAULT_PROBABILITY)
    }
}
