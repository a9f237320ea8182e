/// Tunables and their defaults.
pub mod config;
pub mod errs;
/// Ordering keys and epsilon tolerant comparison.
pub mod key;

/// An epsilon tolerant [`skip list`] keyed by `f64`.
///
/// [`skip list`]: https://en.wikipedia.org/wiki/Skip_list
pub mod skiplist;

pub use config::{
    Config,
    LevelStrategy,
    MAX_LEVEL,
    MAX_SUPPORTED_LEVELS,
    RECOMMENDED_EPS,
};
pub use errs::SkipListError;
pub use key::{
    ExtendedKey,
    Tolerance,
};
pub use skiplist::{
    level_generator::{
        CounterLevelGenerator,
        GeometricalLevelGenerator,
        LevelGenerator,
    },
    skiplist::{
        Entry,
        Iter,
        SkipList,
    },
};
