// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum SkipListError {
    #[error("epsilon must not be negative, got {0}")]
    NegativeEpsilon(f64),
    #[error("epsilon must be finite, got {0}")]
    NonFiniteEpsilon(f64),
    #[error("max level must be in [1, 63], got {0}")]
    InvalidMaxLevel(usize),
    #[error("level probability must be in (0, 1), got {0}")]
    InvalidProbability(f64),
}
