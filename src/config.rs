// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use getset::CopyGetters;

use crate::errs::SkipListError;

/// The default number of levels above the base level. 40 levels comfortably
/// index around 10^12 elements at the expected balance.
pub const MAX_LEVEL: usize = 40;

/// A tolerance that works for most floating point key domains.
pub const RECOMMENDED_EPS: f64 = 1e-9;

/// Hard upper bound on the number of levels, including the base level. The
/// counter level generator works on `u64` bit positions, so `max_level` must
/// stay below this.
pub const MAX_SUPPORTED_LEVELS: usize = 64;

/// The default probability that a node is promoted to the next level.
pub const DEFAULT_P: f64 = 0.5;

/// How new nodes get their level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LevelStrategy {
    /// Independent geometric draws, promoting to the next level with
    /// probability `p`.
    Geometric { p: f64 },
    /// A seeded counter whose trailing zero bits give the level. The sequence
    /// is deterministic after the seed and only geometric in aggregate.
    Counter,
}

impl Default for LevelStrategy {
    fn default() -> Self {
        LevelStrategy::Geometric { p: DEFAULT_P }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct Config {
    /// Half width of the equality band around every key.
    eps: f64,
    /// Highest level a node may occupy. The head sentinel always has it.
    max_level: usize,
    strategy: LevelStrategy,
    /// Seed for the level generator. `None` seeds from the thread rng.
    seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            eps: RECOMMENDED_EPS,
            max_level: MAX_LEVEL,
            strategy: LevelStrategy::default(),
            seed: None,
        }
    }
}

impl Config {
    pub fn new(eps: f64) -> Self {
        Config {
            eps,
            ..Default::default()
        }
    }

    pub fn with_eps(mut self, eps: f64) -> Self {
        self.eps = eps;
        self
    }

    pub fn with_max_level(mut self, max_level: usize) -> Self {
        self.max_level = max_level;
        self
    }

    pub fn with_strategy(mut self, strategy: LevelStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Rejects settings the list cannot work with. Nothing is clamped.
    pub fn validate(&self) -> Result<(), SkipListError> {
        if self.eps.is_nan() || self.eps.is_infinite() {
            return Err(SkipListError::NonFiniteEpsilon(self.eps));
        }
        if self.eps < 0.0 {
            return Err(SkipListError::NegativeEpsilon(self.eps));
        }
        if self.max_level == 0 || self.max_level >= MAX_SUPPORTED_LEVELS {
            return Err(SkipListError::InvalidMaxLevel(self.max_level));
        }
        if let LevelStrategy::Geometric { p } = self.strategy {
            if !(p > 0.0 && p < 1.0) {
                return Err(SkipListError::InvalidProbability(p));
            }
        }
        Ok(())
    }
}
