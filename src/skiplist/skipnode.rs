// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use std::{
    fmt,
    iter,
    ops::{
        Index,
        IndexMut,
    },
};

/// SkipNodes make up the SkipList. They live in a [`NodeArena`] and point at
/// each other by slot index, so no node ever holds a reference to another.
///
/// The node has a `level` which corresponds to how 'high' the node reaches,
/// and `forward` always has `level + 1` entries, one per level.
///
/// `back` is the level 0 predecessor. It is `None` both when the predecessor is
/// the head sentinel and once the node has been unlinked.
#[derive(Clone, Debug)]
pub(crate) struct SkipNode<T> {
    pub(crate) payload: T,
    // cached `payload.extended_key()`
    pub(crate) key: f64,
    pub(crate) level: usize,
    pub(crate) back: Option<usize>,
    pub(crate) forward: Vec<Option<usize>>,
}

impl<T> SkipNode<T> {
    /// Create a new unlinked node reaching up to `level`.
    pub(crate) fn new(payload: T, key: f64, level: usize) -> Self {
        SkipNode {
            payload,
            key,
            level,
            back: None,
            forward: iter::repeat(None).take(level + 1).collect(),
        }
    }

    #[inline]
    pub(crate) fn next(&self) -> Option<usize> {
        self.forward[0]
    }
}

impl<T> fmt::Display for SkipNode<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.key)
    }
}

/// A growable slab of nodes addressed by stable indices. Freed slots are
/// recycled before the backing vector grows.
#[derive(Clone, Debug)]
pub(crate) struct NodeArena<T> {
    slots: Vec<Option<SkipNode<T>>>,
    free: Vec<usize>,
}

impl<T> Default for NodeArena<T> {
    fn default() -> Self {
        NodeArena {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }
}

impl<T> NodeArena<T> {
    /// Stores `node` and returns the slot it landed in.
    pub(crate) fn alloc(&mut self, node: SkipNode<T>) -> usize {
        match self.free.pop() {
            | Some(idx) => {
                debug_assert!(self.slots[idx].is_none());
                self.slots[idx] = Some(node);
                idx
            },
            | None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            },
        }
    }

    /// Takes the node out of `idx`, leaving the slot for reuse.
    pub(crate) fn release(&mut self, idx: usize) -> Option<SkipNode<T>> {
        let node = self.slots.get_mut(idx)?.take()?;
        self.free.push(idx);
        Some(node)
    }

    #[cfg(test)]
    pub(crate) fn get(&self, idx: usize) -> Option<&SkipNode<T>> {
        self.slots.get(idx)?.as_ref()
    }

    /// Number of live nodes.
    pub(crate) fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Number of slots, live or free.
    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}

impl<T> Index<usize> for NodeArena<T> {
    type Output = SkipNode<T>;

    fn index(&self, idx: usize) -> &Self::Output {
        match self.slots[idx] {
            | Some(ref node) => node,
            | None => panic!("skiplist node slot {} is vacant", idx),
        }
    }
}

impl<T> IndexMut<usize> for NodeArena<T> {
    fn index_mut(&mut self, idx: usize) -> &mut Self::Output {
        match self.slots[idx] {
            | Some(ref mut node) => node,
            | None => panic!("skiplist node slot {} is vacant", idx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_node_is_unlinked() {
        let node = SkipNode::new("a", 1.0, 3);
        assert_eq!(node.forward.len(), 4);
        assert!(node.forward.iter().all(Option::is_none));
        assert_eq!(node.back, None);
        assert_eq!(node.next(), None);
        assert_eq!(node.to_string(), "1");
    }

    #[test]
    fn test_arena_reuses_slots() {
        let mut arena = NodeArena::default();
        let a = arena.alloc(SkipNode::new(1, 1.0, 0));
        let b = arena.alloc(SkipNode::new(2, 2.0, 0));
        assert_eq!(arena.len(), 2);
        assert_ne!(a, b);

        let released = arena.release(a).unwrap();
        assert_eq!(released.payload, 1);
        assert_eq!(arena.len(), 1);
        assert!(arena.get(a).is_none());
        assert!(arena.release(a).is_none());

        let c = arena.alloc(SkipNode::new(3, 3.0, 0));
        assert_eq!(c, a);
        assert_eq!(arena[c].payload, 3);
        assert_eq!(arena.capacity(), 2);

        arena.clear();
        assert_eq!(arena.len(), 0);
        assert_eq!(arena.capacity(), 0);
    }

    #[test]
    #[should_panic]
    fn test_vacant_index_panics() {
        let mut arena = NodeArena::default();
        let a = arena.alloc(SkipNode::new((), 0.0, 0));
        arena.release(a);
        let _ = &arena[a];
    }
}
