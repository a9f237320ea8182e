// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use rand::prelude::*;

use crate::{
    config::{
        LevelStrategy,
        MAX_SUPPORTED_LEVELS,
    },
    errs::SkipListError,
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
/// The probability of generating level `n` is `p` times the probability of
/// generating level `n-1`, with the probability truncated at the maximum number
/// of levels allowed.
#[derive(Debug, Clone)]
pub struct GeometricalLevelGenerator {
    total: usize,
    p: f64,
    rng: SmallRng, // Fast generator
}

impl GeometricalLevelGenerator {
    /// Create a new GeometricalLevelGenerator with `total` number of levels,
    /// and `p` as the probability that a given node is present in the next
    /// level.
    ///
    /// `p` must be in `(0, 1)` and `total` must be in `[1, 64]`.
    pub fn new(total: usize, p: f64) -> Result<Self, SkipListError> {
        let rng = SmallRng::from_rng(thread_rng()).unwrap_or_else(|_| SmallRng::from_entropy());
        Self::with_rng(total, p, rng)
    }

    /// Same as [`GeometricalLevelGenerator::new`] with a reproducible stream.
    pub fn with_seed(total: usize, p: f64, seed: u64) -> Result<Self, SkipListError> {
        Self::with_rng(total, p, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(total: usize, p: f64, rng: SmallRng) -> Result<Self, SkipListError> {
        if total == 0 || total > MAX_SUPPORTED_LEVELS {
            return Err(SkipListError::InvalidMaxLevel(total.saturating_sub(1)));
        }
        if !(p > 0.0 && p < 1.0) {
            return Err(SkipListError::InvalidProbability(p));
        }
        Ok(GeometricalLevelGenerator { total, p, rng })
    }
}

impl LevelGenerator for GeometricalLevelGenerator {
    fn random(&mut self) -> usize {
        let mut h = 0;
        let mut x = self.p;
        let f = 1.0 - self.rng.gen::<f64>();
        while x > f && h + 1 < self.total {
            h += 1;
            x *= self.p
        }
        h
    }

    fn total(&self) -> usize {
        self.total
    }
}

/// A level generator driven by an incrementing counter. Each draw bumps the
/// counter and returns its number of trailing zero bits, capped by a sentinel
/// bit at `total - 1`.
///
/// Half of all integers end in a one bit, a quarter in `10`, and so on, so in
/// aggregate level `n` turns up with probability `2^-(n+1)`. Consecutive draws
/// are not independent: the whole sequence follows from the starting seed.
#[derive(Debug, Clone)]
pub struct CounterLevelGenerator {
    total: usize,
    counter: u64,
}

impl CounterLevelGenerator {
    pub fn new(total: usize) -> Result<Self, SkipListError> {
        Self::with_seed(total, thread_rng().gen())
    }

    pub fn with_seed(total: usize, seed: u64) -> Result<Self, SkipListError> {
        if total < 2 || total > MAX_SUPPORTED_LEVELS {
            return Err(SkipListError::InvalidMaxLevel(total.saturating_sub(1)));
        }
        Ok(CounterLevelGenerator {
            total,
            counter: seed,
        })
    }
}

impl LevelGenerator for CounterLevelGenerator {
    fn random(&mut self) -> usize {
        self.counter = self.counter.wrapping_add(1);
        let cap = 1u64 << (self.total - 1);
        (self.counter | cap).trailing_zeros() as usize
    }

    fn total(&self) -> usize {
        self.total
    }
}

/// The generator a list owns, picked from its [`LevelStrategy`].
#[derive(Debug, Clone)]
pub enum Levels {
    Geometric(GeometricalLevelGenerator),
    Counter(CounterLevelGenerator),
}

impl Levels {
    /// Builds a generator producing levels in `[0, max_level]`.
    pub fn from_strategy(
        strategy: LevelStrategy,
        max_level: usize,
        seed: Option<u64>,
    ) -> Result<Self, SkipListError> {
        let total = max_level + 1;
        Ok(match (strategy, seed) {
            | (LevelStrategy::Geometric { p }, Some(seed)) => {
                Levels::Geometric(GeometricalLevelGenerator::with_seed(total, p, seed)?)
            },
            | (LevelStrategy::Geometric { p }, None) => {
                Levels::Geometric(GeometricalLevelGenerator::new(total, p)?)
            },
            | (LevelStrategy::Counter, Some(seed)) => {
                Levels::Counter(CounterLevelGenerator::with_seed(total, seed)?)
            },
            | (LevelStrategy::Counter, None) => Levels::Counter(CounterLevelGenerator::new(total)?),
        })
    }
}

impl LevelGenerator for Levels {
    #[inline]
    fn random(&mut self) -> usize {
        match self {
            | Levels::Geometric(g) => g.random(),
            | Levels::Counter(c) => c.random(),
        }
    }

    #[inline]
    fn total(&self) -> usize {
        match self {
            | Levels::Geometric(g) => g.total(),
            | Levels::Counter(c) => c.total(),
        }
    }
}
