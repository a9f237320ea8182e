// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use std::{
    fmt,
    iter::FusedIterator,
    mem,
};

use tracing::{
    debug,
    instrument,
};

use crate::{
    config::{
        Config,
        MAX_SUPPORTED_LEVELS,
    },
    errs::SkipListError,
    key::{
        ExtendedKey,
        Tolerance,
    },
    skiplist::{
        level_generator::{
            LevelGenerator,
            Levels,
        },
        skipnode::{
            NodeArena,
            SkipNode,
        },
    },
};

/// The last node before the target key at every level, as recorded by a
/// search. `None` stands for the head sentinel.
type UpdatePath = [Option<usize>; MAX_SUPPORTED_LEVELS];

/// An ordered index over payloads keyed by a floating point value.
///
/// Keys within `eps` of each other are treated as the same key: inserting a
/// payload whose key is tolerance-equal to a stored one replaces it in place.
///
/// Every search records its per-level predecessors in a buffer on its own
/// stack frame, so lookups only need `&self` and never interfere with each
/// other. Mutation needs `&mut self`.
pub struct SkipList<T> {
    arena: NodeArena<T>,
    // forward links of the head sentinel, one per level in `0..=max_level`
    head: Vec<Option<usize>>,
    tail: Option<usize>,
    len: usize,
    // highest level currently in use
    level: usize,
    max_level: usize,
    cmp: Tolerance,
    levels: Levels,
}

// ///////////////////////////////////////////////
// Construction
// ///////////////////////////////////////////////

impl<T: ExtendedKey> SkipList<T> {
    /// Create an empty list using `eps` as the equality tolerance and the
    /// default level settings.
    pub fn new(eps: f64) -> Result<Self, SkipListError> {
        Self::with_config(Config::new(eps))
    }

    pub fn with_config(config: Config) -> Result<Self, SkipListError> {
        config.validate()?;
        let levels = Levels::from_strategy(config.strategy(), config.max_level(), config.seed())?;
        debug!(
            eps = config.eps(),
            max_level = config.max_level(),
            "created skiplist"
        );

        Ok(SkipList {
            arena: NodeArena::default(),
            head: vec![None; config.max_level() + 1],
            tail: None,
            len: 0,
            level: 0,
            max_level: config.max_level(),
            cmp: Tolerance::new(config.eps()),
            levels,
        })
    }
}

// ///////////////////////////////////////////////
// Search
// ///////////////////////////////////////////////

impl<T> SkipList<T> {
    #[inline]
    fn forward(&self, at: Option<usize>, level: usize) -> Option<usize> {
        match at {
            | None => self.head[level],
            | Some(idx) => self.arena[idx].forward[level],
        }
    }

    #[inline]
    fn set_forward(&mut self, at: Option<usize>, level: usize, to: Option<usize>) {
        match at {
            | None => self.head[level] = to,
            | Some(idx) => self.arena[idx].forward[level] = to,
        }
    }

    /// Walks down from the current top level, recording in `update` the last
    /// node at each level whose key is less than `key`. Returns the first node
    /// at level 0 that is not less than `key`, and the level the walk started
    /// from. Entries of `update` above that level are left untouched.
    #[instrument(level = "trace", skip(self, update))]
    fn inner_find(&self, key: f64, update: &mut UpdatePath) -> (Option<usize>, usize) {
        let top = self.level;
        let mut node = None;
        for i in (0..=top).rev() {
            while let Some(next) = self.forward(node, i) {
                if !self.cmp.less(self.arena[next].key, key) {
                    break;
                }
                node = Some(next);
            }
            update[i] = node;
        }
        (self.forward(node, 0), top)
    }

    /// The node holding a key tolerance-equal to `key`.
    fn find_idx(&self, key: f64) -> Option<usize> {
        if key.is_nan() {
            return None;
        }
        let mut update: UpdatePath = [None; MAX_SUPPORTED_LEVELS];
        let (found, _) = self.inner_find(key, &mut update);
        found.filter(|&idx| self.cmp.equal(key, self.arena[idx].key))
    }

    /// The node with the smallest key not less than `key`.
    fn ceiling_idx(&self, key: f64) -> Option<usize> {
        if key.is_nan() {
            return None;
        }
        let mut update: UpdatePath = [None; MAX_SUPPORTED_LEVELS];
        let (found, _) = self.inner_find(key, &mut update);
        found.filter(|&idx| !self.cmp.less(self.arena[idx].key, key))
    }

    fn entry(&self, idx: usize) -> Entry<'_, T> {
        Entry { list: self, idx }
    }
}

// ///////////////////////////////////////////////
// Lookups and accessors
// ///////////////////////////////////////////////

impl<T> SkipList<T> {
    /// The payload stored under a key tolerance-equal to `key`.
    #[instrument(level = "trace", skip(self))]
    pub fn find(&self, key: f64) -> Option<&T> {
        self.find_idx(key).map(|idx| &self.arena[idx].payload)
    }

    /// The payload with the smallest key that is greater than or equal to
    /// `key`, within tolerance.
    #[instrument(level = "trace", skip(self))]
    pub fn find_bigger_or_equal(&self, key: f64) -> Option<&T> {
        self.ceiling_idx(key).map(|idx| &self.arena[idx].payload)
    }

    /// Like [`SkipList::find`], but returns a cursor that can keep walking the
    /// list from the match.
    pub fn find_entry(&self, key: f64) -> Option<Entry<'_, T>> {
        self.find_idx(key).map(|idx| self.entry(idx))
    }

    /// Like [`SkipList::find_bigger_or_equal`], but returns a cursor.
    pub fn find_bigger_or_equal_entry(&self, key: f64) -> Option<Entry<'_, T>> {
        self.ceiling_idx(key).map(|idx| self.entry(idx))
    }

    pub fn contains(&self, key: f64) -> bool {
        self.find_idx(key).is_some()
    }

    /// The entry with the smallest key.
    pub fn minimal(&self) -> Option<Entry<'_, T>> {
        self.head[0].map(|idx| self.entry(idx))
    }

    /// The entry with the largest key.
    pub fn maximal(&self) -> Option<Entry<'_, T>> {
        self.tail.map(|idx| self.entry(idx))
    }

    /// The entry after `entry`. Same as [`Entry::next`].
    pub fn next<'a>(&'a self, entry: &Entry<'a, T>) -> Option<Entry<'a, T>> {
        entry.next()
    }

    /// The entry before `entry`. Same as [`Entry::before`].
    pub fn before<'a>(&'a self, entry: &Entry<'a, T>) -> Option<Entry<'a, T>> {
        entry.before()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Alias of [`SkipList::len`].
    pub fn size(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The highest level any node currently occupies.
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn max_level(&self) -> usize {
        self.max_level
    }

    pub fn eps(&self) -> f64 {
        self.cmp.eps()
    }

    /// Iterates the payloads in key order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            front: self.head[0],
            back: self.tail,
            remaining: self.len,
        }
    }
}

// ///////////////////////////////////////////////
// Mutation
// ///////////////////////////////////////////////

impl<T: ExtendedKey> SkipList<T> {
    /// Inserts `payload`. If a key tolerance-equal to its key is already
    /// present, that node's payload and key are replaced in place and the old
    /// payload is returned.
    ///
    /// # Panics
    ///
    /// If `payload.extended_key()` is NaN, since NaN has no position in the
    /// order.
    #[instrument(level = "debug", skip(self, payload))]
    pub fn insert(&mut self, payload: T) -> Option<T> {
        let key = payload.extended_key();
        assert!(!key.is_nan(), "skiplist keys must not be NaN");

        let mut update: UpdatePath = [None; MAX_SUPPORTED_LEVELS];
        let (found, top) = self.inner_find(key, &mut update);
        if let Some(idx) = found {
            if self.cmp.equal(key, self.arena[idx].key) {
                let node = &mut self.arena[idx];
                node.key = key;
                return Some(mem::replace(&mut node.payload, payload));
            }
        }

        let level = self.levels.random();
        let mut node = SkipNode::new(payload, key, level);
        node.back = update[0];
        let idx = self.arena.alloc(node);

        for i in 0..=level {
            // levels the search never visited only have the head in front
            let pred = if i > top { None } else { update[i] };
            let succ = self.forward(pred, i);
            self.arena[idx].forward[i] = succ;
            self.set_forward(pred, i, Some(idx));
        }

        match self.arena[idx].next() {
            | Some(next) => self.arena[next].back = Some(idx),
            | None => self.tail = Some(idx),
        }
        if level > self.level {
            debug!(from = self.level, to = level, "skiplist level grew");
            self.level = level;
        }
        self.len += 1;

        None
    }

    /// Removes the entry under a key tolerance-equal to `key`, returning
    /// `true` if there was one.
    pub fn delete(&mut self, key: f64) -> bool {
        self.remove(key).is_some()
    }

    /// Removes the entry under a key tolerance-equal to `key` and hands back
    /// its payload.
    #[instrument(level = "debug", skip(self))]
    pub fn remove(&mut self, key: f64) -> Option<T> {
        if key.is_nan() {
            return None;
        }
        let mut update: UpdatePath = [None; MAX_SUPPORTED_LEVELS];
        let (found, _) = self.inner_find(key, &mut update);
        let idx = found.filter(|&idx| self.cmp.equal(key, self.arena[idx].key))?;

        for i in (0..=self.arena[idx].level).rev() {
            let succ = self.arena[idx].forward[i];
            self.set_forward(update[i], i, succ);
        }

        let back = self.arena[idx].back.take();
        if let Some(next) = self.arena[idx].next() {
            self.arena[next].back = back;
        }
        if self.tail == Some(idx) {
            self.tail = back;
        }

        let top = self.level;
        while self.level > 0 && self.head[self.level].is_none() {
            self.level -= 1;
        }
        if self.level != top {
            debug!(from = top, to = self.level, "skiplist level shrank");
        }
        self.len -= 1;

        self.arena.release(idx).map(|node| node.payload)
    }

    /// Drops every entry.
    #[instrument(level = "debug", skip(self))]
    pub fn clear(&mut self) {
        self.arena.clear();
        self.head.iter_mut().for_each(|link| *link = None);
        self.tail = None;
        self.len = 0;
        self.level = 0;
    }
}

impl<T: ExtendedKey> Extend<T> for SkipList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for payload in iter {
            self.insert(payload);
        }
    }
}

impl<T> fmt::Display for SkipList<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Head")?;
        let mut cursor = self.head[0];
        while let Some(idx) = cursor {
            write!(f, " -> {:.5}", self.arena[idx].key)?;
            cursor = self.arena[idx].next();
        }
        write!(f, " End")
    }
}

impl<T: fmt::Debug> fmt::Debug for SkipList<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, T> IntoIterator for &'a SkipList<T> {
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ///////////////////////////////////////////////
// Cursors
// ///////////////////////////////////////////////

/// A cursor onto one element of a [`SkipList`]. It borrows the list, so the
/// list cannot change while the cursor is alive.
pub struct Entry<'a, T> {
    list: &'a SkipList<T>,
    idx: usize,
}

impl<'a, T> Entry<'a, T> {
    #[inline]
    fn node(&self) -> &'a SkipNode<T> {
        let list: &'a SkipList<T> = self.list;
        &list.arena[self.idx]
    }

    /// The cached ordering key.
    pub fn key(&self) -> f64 {
        self.node().key
    }

    pub fn value(&self) -> &'a T {
        &self.node().payload
    }

    /// The highest level this element participates in.
    pub fn level(&self) -> usize {
        self.node().level
    }

    pub fn next(&self) -> Option<Entry<'a, T>> {
        self.node().next().map(|idx| self.list.entry(idx))
    }

    /// The previous element, or `None` at the front of the list.
    pub fn before(&self) -> Option<Entry<'a, T>> {
        self.node().back.map(|idx| self.list.entry(idx))
    }
}

impl<T> Clone for Entry<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Entry<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for Entry<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Entry")
            .field("key", &self.key())
            .field("value", self.value())
            .finish()
    }
}

/// Borrowing iterator over the payloads of a [`SkipList`] in key order.
pub struct Iter<'a, T> {
    list: &'a SkipList<T>,
    front: Option<usize>,
    back: Option<usize>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = &self.list.arena[self.front?];
        self.front = node.next();
        self.remaining -= 1;
        Some(&node.payload)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = &self.list.arena[self.back?];
        self.back = node.back;
        self.remaining -= 1;
        Some(&node.payload)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

// ///////////////////////////////////////////////
// Invariant checks
// ///////////////////////////////////////////////

#[cfg(test)]
impl<T> SkipList<T> {
    /// Walks every level and asserts the structural invariants.
    pub(crate) fn check_invariants(&self) {
        // level 0: ordered, doubly linked, counted, ending at the tail
        let mut count = 0;
        let mut prev: Option<usize> = None;
        let mut cursor = self.head[0];
        let mut top = 0;
        while let Some(idx) = cursor {
            let node = &self.arena[idx];
            assert_eq!(node.forward.len(), node.level + 1);
            assert!(node.level <= self.max_level);
            assert_eq!(node.back, prev, "back link of {} is stale", node.key);
            if let Some(p) = prev {
                assert!(
                    self.arena[p].key < node.key,
                    "{} is not ordered after {}",
                    node.key,
                    self.arena[p].key
                );
            }
            top = top.max(node.level);
            count += 1;
            prev = Some(idx);
            cursor = node.next();
        }
        assert_eq!(count, self.len);
        assert_eq!(self.arena.len(), self.len);
        assert_eq!(self.tail, prev);
        assert_eq!(self.level, top);

        // upper levels: ordered and exactly the nodes tall enough for them
        for level in 1..=self.max_level {
            let mut expected = Vec::new();
            let mut cursor = self.head[0];
            while let Some(idx) = cursor {
                if self.arena[idx].level >= level {
                    expected.push(idx);
                }
                cursor = self.arena[idx].next();
            }

            let mut actual = Vec::new();
            let mut cursor = self.head[level];
            while let Some(idx) = cursor {
                actual.push(idx);
                cursor = self.arena[idx].forward[level];
            }
            assert_eq!(actual, expected, "level {} is miswired", level);
        }
    }
}
