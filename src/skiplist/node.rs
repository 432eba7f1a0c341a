// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use std::fmt;

/// A handle to a node owned by a [`SkipList`](crate::SkipList).
///
/// Handles are plain indices into the list's arena plus the generation of the
/// slot at the time the node was allocated, so a handle to a removed node never
/// resolves to whatever node reuses the slot later. Index `0` is reserved for
/// the sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl NodeId {
    /// The sentinel ("pre-head") of every list. It is both the start and the
    /// terminator of all traversals.
    pub const SENTINEL: NodeId = NodeId {
        index: 0,
        generation: 0,
    };

    pub(crate) fn new(index: u32, generation: u32) -> Self {
        NodeId { index, generation }
    }

    #[inline]
    pub fn is_sentinel(self) -> bool {
        self == NodeId::SENTINEL
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_sentinel() {
            write!(f, "<sentinel>")
        } else {
            write!(f, "#{}.{}", self.index, self.generation)
        }
    }
}

/// The linkage of one node: its level-0 successor plus one express lane per
/// level it participates in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Lanes<const LEVELS: usize> {
    pub(crate) next: Option<NodeId>,
    pub(crate) level_highest: Option<usize>,
    pub(crate) next_jump: [Option<NodeId>; LEVELS],
}

impl<const LEVELS: usize> Lanes<LEVELS> {
    pub(crate) fn cleared() -> Self {
        Lanes {
            next: None,
            level_highest: None,
            next_jump: [None; LEVELS],
        }
    }

    /// Sentinel linkage: present on every level, every lane loops back to
    /// itself so an empty list terminates immediately.
    pub(crate) fn sentinel() -> Self {
        Lanes {
            next: Some(NodeId::SENTINEL),
            level_highest: LEVELS.checked_sub(1),
            next_jump: [Some(NodeId::SENTINEL); LEVELS],
        }
    }

    pub(crate) fn clear(&mut self) {
        self.next_jump = [None; LEVELS];
        self.next = None;
        self.level_highest = None;
    }

    /// Whether the node takes part in the express lane at `level`.
    #[inline]
    pub(crate) fn reaches(&self, level: usize) -> bool {
        matches!(self.level_highest, Some(top) if level <= top)
    }

    /// Successor on `level`. Level 0 is the full chain.
    #[inline]
    pub(crate) fn jump(&self, level: usize) -> Option<NodeId> {
        self.next_jump.get(level).copied().flatten()
    }
}

/// One stored key/value pair and its per-level successors.
///
/// Nodes live inside the list that created them. A node handed back by
/// [`SkipList::remove_next`](crate::SkipList::remove_next) is detached: its
/// lanes are cleared and `level_highest` is `None`, the same state as a freshly
/// constructed node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<K, V, const LEVELS: usize> {
    key: K,
    value: V,
    pub(crate) lanes: Lanes<LEVELS>,
}

impl<K, V, const LEVELS: usize> Node<K, V, LEVELS> {
    pub fn new(key: K, value: V) -> Self {
        Node {
            key,
            value,
            lanes: Lanes::cleared(),
        }
    }

    pub fn with_key(key: K) -> Self
    where
        V: Default,
    {
        Node::new(key, V::default())
    }

    pub fn empty() -> Self
    where
        K: Default,
        V: Default,
    {
        Node::new(K::default(), V::default())
    }

    /// Drops every lane and the level-0 link and marks the node as taking part
    /// in no level.
    pub fn clear(&mut self) {
        self.lanes.clear();
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// The level-0 successor, `None` when detached.
    pub fn next(&self) -> Option<NodeId> {
        self.lanes.next
    }

    /// Index of the highest express lane this node occupies, `None` when the
    /// node is in no lane at all.
    pub fn level_highest(&self) -> Option<usize> {
        self.lanes.level_highest
    }

    /// The successor on the express lane at `level`, `None` for levels the
    /// node does not occupy.
    pub fn next_jump(&self, level: usize) -> Option<NodeId> {
        self.lanes.jump(level)
    }

    pub fn is_detached(&self) -> bool {
        self.lanes.level_highest.is_none() && self.lanes.next.is_none()
    }

    pub fn into_inner(self) -> (K, V) {
        (self.key, self.value)
    }

    pub(crate) fn with_level(key: K, value: V, level_highest: usize) -> Self {
        let mut node = Node::new(key, value);
        node.lanes.level_highest = Some(level_highest);
        node
    }
}

impl<K, V, const LEVELS: usize> fmt::Display for Node<K, V, LEVELS>
where
    K: fmt::Display,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.key, self.value)
    }
}
