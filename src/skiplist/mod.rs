//! An ordered index over floating point keys, built as a skiplist.
//!
//! SkipLists use a probabilistic distribution of nodes over the internal
//! levels, whereby the lowest level (level 0) contains all the nodes, and each
//! level `n > 0` will contain a random subset of the nodes on level `n - 1`.
//! Searches start at the top level and drop a level whenever the next node
//! would overshoot, which gives expected `O(log n)` lookups, inserts and
//! deletes without any rebalancing.
//!
//! Most commonly, a geometric distribution is used whereby the chance that a
//! node occupies level `n` is `p` times the chance of occupying level `n-1`
//! (with `0 < p < 1`).
//!
//! Nodes live in an index addressed arena rather than behind pointers, and
//! the per-level predecessors a search produces are kept on the caller's stack,
//! so read-only lookups can run side by side.

pub mod level_generator;
#[allow(clippy::module_inception)]
pub mod skiplist;
mod skipnode;
