// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use std::{
    fmt,
    mem,
};

use tracing::{
    debug,
    instrument,
    trace,
};

use crate::{
    config::{
        Config,
        DEFAULT_LEVELS,
    },
    errs::{
        Result,
        SkipListError,
    },
    skiplist::{
        iter::{
            IntoIter,
            Iter,
            Keys,
            Values,
        },
        level_generator::{
            GeometricalLevelGenerator,
            LevelGenerator,
        },
        node::{
            Lanes,
            Node,
            NodeId,
        },
    },
    stats::Stats,
};

/// One arena cell. Vacant cells form a free list and remember the generation
/// the next occupant will get.
#[derive(Debug)]
enum Slot<K, V, const LEVELS: usize> {
    Occupied {
        generation: u32,
        node: Node<K, V, LEVELS>,
    },
    Vacant {
        generation: u32,
        next_free: Option<u32>,
    },
}

/// An ordered map from `K` to `V` with expected `O(log n)` search, insertion
/// and removal.
///
/// Nodes live in an arena owned by the list and link to each other through
/// [`NodeId`] handles. The sentinel at [`NodeId::SENTINEL`] is the head of
/// every level and also terminates every traversal: an empty list is a
/// sentinel whose lanes all point back at itself.
///
/// Duplicate keys are allowed. A new key is placed after every node already
/// holding an equal key, so equal keys come back out in insertion order.
///
/// The list is not synchronized. Every mutation takes `&mut self`.
pub struct SkipList<K, V, const LEVELS: usize = DEFAULT_LEVELS, G = GeometricalLevelGenerator> {
    pre_head: Lanes<LEVELS>,
    slots: Vec<Slot<K, V, LEVELS>>,
    free_head: Option<u32>,
    generator: G,
    len: usize,
    stats: Stats<LEVELS>,
}

impl<K, V, const LEVELS: usize> SkipList<K, V, LEVELS, GeometricalLevelGenerator>
where
    K: Ord,
{
    /// Create an empty list whose nodes are promoted to the next level with
    /// the given `probability`.
    pub fn new(probability: f64) -> Result<Self> {
        Self::with_config(Config::new(probability))
    }

    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        let generator = GeometricalLevelGenerator::from_config(LEVELS, &config)?;
        Self::with_generator(generator)
    }
}

impl<K, V, const LEVELS: usize, G> SkipList<K, V, LEVELS, G>
where
    K: Ord,
    G: LevelGenerator,
{
    /// Create an empty list drawing node levels from `generator`, which must
    /// produce exactly `LEVELS` levels.
    pub fn with_generator(generator: G) -> Result<Self> {
        if LEVELS == 0 || generator.total() != LEVELS {
            return Err(SkipListError::InvalidLevels(generator.total()));
        }
        Ok(SkipList {
            pre_head: Lanes::sentinel(),
            slots: Vec::new(),
            free_head: None,
            generator,
            len: 0,
            stats: Stats::default(),
        })
    }

    /// Insert `value` under `key`. Duplicate keys are accepted; the new node
    /// lands after all existing nodes with an equal key.
    #[instrument(level = "trace", skip_all)]
    pub fn insert(&mut self, value: V, key: K) -> NodeId {
        let mut prev_nodes = self.descend(&key);

        let level = self.generator.random().min(LEVELS.saturating_sub(1));

        // step past equal keys on every lane the node joins, level 0 included
        for (lane, prev) in prev_nodes.iter_mut().enumerate().take(level + 1) {
            *prev = self.walk(*prev, lane, |_, k| *k <= key);
        }

        let mut node = Node::with_level(key, value, level);
        node.lanes.next = Some(self.successor(prev_nodes[0]));
        for (lane, prev) in prev_nodes.iter().enumerate().take(level + 1) {
            node.lanes.next_jump[lane] = Some(self.jump(*prev, lane));
        }

        let id = self.alloc(node);
        if let Some(lanes) = self.lanes_mut(prev_nodes[0]) {
            lanes.next = Some(id);
        }
        for (lane, prev) in prev_nodes.iter().enumerate().take(level + 1) {
            if let Some(lanes) = self.lanes_mut(*prev) {
                lanes.next_jump[lane] = Some(id);
            }
        }

        self.len += 1;
        self.stats.record_insert(level);
        trace!(%id, height = level, len = self.len, "inserted node");
        id
    }

    /// Key-first spelling of [`SkipList::insert`].
    pub fn put(&mut self, key: K, value: V) -> NodeId {
        self.insert(value, key)
    }
}

impl<K, V, const LEVELS: usize, G> SkipList<K, V, LEVELS, G>
where
    K: Ord,
{
    /// The first node holding `key`, or `None` when no node does.
    #[instrument(level = "trace", skip_all)]
    pub fn find_first(&self, key: &K) -> Option<NodeId> {
        let candidate = self.successor(self.last_less_than(key));
        match self.key_of(candidate) {
            | Some(found) if found == key => Some(candidate),
            | _ => None,
        }
    }

    /// The node right before the first node whose key is not less than `key`,
    /// or the sentinel when there is none. This is the predecessor to hand to
    /// [`SkipList::remove_next`] to remove the first node holding `key`.
    #[instrument(level = "trace", skip_all)]
    pub fn find_last_less_than(&self, key: &K) -> NodeId {
        self.last_less_than(key)
    }

    /// Remove the node directly after `node_before` on level 0 and hand it
    /// back detached.
    ///
    /// # Errors
    ///
    /// [`SkipListError::UnknownNode`] if `node_before` is not a live node of
    /// this list (or the sentinel), [`SkipListError::NoSuccessor`] if nothing
    /// follows it. Nothing is modified on failure.
    #[instrument(level = "trace", skip_all)]
    pub fn remove_next(&mut self, node_before: NodeId) -> Result<Node<K, V, LEVELS>> {
        match self.unlink_plan(node_before) {
            | Ok((target, top, preds)) => {
                let removed = self.unlink(node_before, target, top, &preds);
                trace!(%target, height = top, len = self.len, "removed node");
                removed
            },
            | Err(err) => {
                debug!(%node_before, %err, "rejected removal");
                self.stats.record_rejection();
                Err(err)
            },
        }
    }

    /// Remove the first node with a key equal to `key`, returning its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.find_first(key)?;
        let before = self.find_last_less_than(key);
        self.remove_next(before)
            .ok()
            .map(|node| node.into_inner().1)
    }

    /// Remove and return the smallest entry.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        if self.is_empty() {
            return None;
        }
        self.remove_next(NodeId::SENTINEL)
            .ok()
            .map(Node::into_inner)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.find_first(key).and_then(|id| self.value(id))
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let id = self.find_first(key)?;
        self.value_mut(id)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.find_first(key).is_some()
    }

    /// The largest entry, found by running every lane to its end.
    pub fn last(&self) -> Option<(&K, &V)> {
        let mut current = NodeId::SENTINEL;
        for level in (0..LEVELS).rev() {
            current = self.walk(current, level, |_, _| true);
        }
        self.node(current).map(|node| (node.key(), node.value()))
    }

    /// Forward traversal starting at the first key not less than `key`.
    pub fn range_from(&self, key: &K) -> Iter<'_, K, V, LEVELS, G> {
        Iter::after(self, self.last_less_than(key))
    }

    /// Walk the whole structure and verify the chain is sorted, every lane
    /// links each member to the next member in chain order, and the
    /// bookkeeping agrees with what is reachable.
    pub fn check_invariants(&self) -> Result<()> {
        let violation = |msg: String| Err(SkipListError::InvariantViolation(msg));

        if self.pre_head.level_highest != LEVELS.checked_sub(1) {
            return violation(format!(
                "sentinel spans {:?} levels, expected {}",
                self.pre_head.level_highest, LEVELS
            ));
        }

        let mut order = Vec::with_capacity(self.len);
        let mut current = self.successor(NodeId::SENTINEL);
        while !current.is_sentinel() {
            if order.len() > self.slots.len() {
                return violation("level-0 chain does not return to the sentinel".to_string());
            }
            let node = match self.node(current) {
                | Some(node) => node,
                | None => return violation(format!("chain reaches dead node {}", current)),
            };
            match node.level_highest() {
                | Some(top) if top < LEVELS => {},
                | other => {
                    return violation(format!("node {} has level {:?}", current, other));
                },
            }
            if node.lanes.next != node.lanes.jump(0) {
                return violation(format!("node {} disagrees with its level-0 lane", current));
            }
            if let Some(&prev) = order.last() {
                if self.key_of(prev).is_some_and(|k| k > node.key()) {
                    return violation(format!("node {} sorts before its predecessor", current));
                }
            }
            order.push(current);
            current = self.successor(current);
        }

        if order.len() != self.len {
            return violation(format!("chain holds {} nodes, list claims {}", order.len(), self.len));
        }

        for level in 0..LEVELS {
            let mut prev = NodeId::SENTINEL;
            for &id in &order {
                let lanes = match self.lanes(id) {
                    | Some(lanes) => lanes,
                    | None => return violation(format!("node {} vanished", id)),
                };
                if !lanes.reaches(level) {
                    if lanes.jump(level).is_some() {
                        return violation(format!("node {} has a stray lane at {}", id, level));
                    }
                    continue;
                }
                if self.lanes(prev).and_then(|l| l.jump(level)) != Some(id) {
                    return violation(format!("lane {} skips node {} after {}", level, id, prev));
                }
                prev = id;
            }
            if self.lanes(prev).and_then(|l| l.jump(level)) != Some(NodeId::SENTINEL) {
                return violation(format!("lane {} does not end at the sentinel", level));
            }
        }

        Ok(())
    }

    /// Descend from the top lane, on each level advancing while the next key
    /// is strictly less than `key`. Entry `i` is the last node visited on
    /// level `i`.
    fn descend(&self, key: &K) -> [NodeId; LEVELS] {
        let mut prev_nodes = [NodeId::SENTINEL; LEVELS];
        let mut current = NodeId::SENTINEL;
        for level in (0..LEVELS).rev() {
            current = self.walk(current, level, |_, k| k < key);
            prev_nodes[level] = current;
        }
        prev_nodes
    }

    fn last_less_than(&self, key: &K) -> NodeId {
        match LEVELS {
            | 0 => NodeId::SENTINEL,
            | _ => self.descend(key)[0],
        }
    }

    /// Validate a removal and work out the lane predecessors of the node being
    /// removed. Read-only, so a failure leaves the list untouched.
    fn unlink_plan(&self, node_before: NodeId) -> Result<(NodeId, usize, [NodeId; LEVELS])> {
        let before = self
            .lanes(node_before)
            .ok_or(SkipListError::UnknownNode(node_before))?;
        let target = match before.next {
            | Some(next) if !next.is_sentinel() => next,
            | _ => return Err(SkipListError::NoSuccessor(node_before)),
        };
        let top = self
            .lanes(target)
            .and_then(|lanes| lanes.level_highest)
            .ok_or_else(|| {
                SkipListError::InvariantViolation(format!("successor {} is not linked", target))
            })?;

        // node_before already sits in front of the target on every lane
        if (0..=top).all(|level| before.jump(level) == Some(target)) {
            return Ok((target, top, [node_before; LEVELS]));
        }

        let preds = self.lane_predecessors(target, top).ok_or_else(|| {
            SkipListError::InvariantViolation(format!("no lane predecessors for {}", target))
        })?;
        if preds[0] != node_before {
            return Err(SkipListError::InvariantViolation(format!(
                "level-0 lane puts {} before {}, chain says {}",
                preds[0], target, node_before
            )));
        }
        Ok((target, top, preds))
    }

    /// Predecessors of `target` on each of its lanes, found by a descent from
    /// the sentinel. Needed when the removed node is taller than the node in
    /// front of it.
    fn lane_predecessors(&self, target: NodeId, top: usize) -> Option<[NodeId; LEVELS]> {
        let key = self.key_of(target)?;
        let mut preds = [NodeId::SENTINEL; LEVELS];
        let mut current = NodeId::SENTINEL;
        for level in (0..LEVELS).rev() {
            current = if level > top {
                self.walk(current, level, |_, k| k < key)
            } else {
                self.walk(current, level, |next, k| next != target && k <= key)
            };
            if level <= top && self.jump(current, level) != target {
                return None;
            }
            preds[level] = current;
        }
        Some(preds)
    }

    fn unlink(
        &mut self,
        node_before: NodeId,
        target: NodeId,
        top: usize,
        preds: &[NodeId; LEVELS],
    ) -> Result<Node<K, V, LEVELS>> {
        let (removed_next, removed_jumps) = match self.lanes(target) {
            | Some(lanes) => (lanes.next, lanes.next_jump),
            | None => return Err(SkipListError::UnknownNode(target)),
        };

        for level in (0..=top).rev() {
            if let Some(lanes) = self.lanes_mut(preds[level]) {
                lanes.next_jump[level] = removed_jumps[level];
            }
        }
        if let Some(lanes) = self.lanes_mut(node_before) {
            lanes.next = removed_next;
        }

        let mut node = self
            .free(target)
            .ok_or(SkipListError::UnknownNode(target))?;
        node.clear();
        self.len -= 1;
        self.stats.record_removal(top);
        Ok(node)
    }
}

impl<K, V, const LEVELS: usize, G> SkipList<K, V, LEVELS, G> {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The maximum number of express lanes a node can take part in.
    pub fn level_count(&self) -> usize {
        LEVELS
    }

    pub fn stats(&self) -> &Stats<LEVELS> {
        &self.stats
    }

    pub fn sentinel(&self) -> NodeId {
        NodeId::SENTINEL
    }

    /// Resolve a handle to a live node. The sentinel and stale handles give
    /// `None`.
    pub fn node(&self, id: NodeId) -> Option<&Node<K, V, LEVELS>> {
        match self.slot_index(id).and_then(|pos| self.slots.get(pos)) {
            | Some(Slot::Occupied { generation, node }) if *generation == id.generation => Some(node),
            | _ => None,
        }
    }

    pub fn key(&self, id: NodeId) -> Option<&K> {
        self.node(id).map(Node::key)
    }

    pub fn value(&self, id: NodeId) -> Option<&V> {
        self.node(id).map(Node::value)
    }

    pub fn value_mut(&mut self, id: NodeId) -> Option<&mut V> {
        self.node_mut(id).map(Node::value_mut)
    }

    pub fn first(&self) -> Option<(&K, &V)> {
        self.node(self.successor(NodeId::SENTINEL))
            .map(|node| (node.key(), node.value()))
    }

    pub fn iter(&self) -> Iter<'_, K, V, LEVELS, G> {
        Iter::after(self, NodeId::SENTINEL)
    }

    pub fn keys(&self) -> Keys<'_, K, V, LEVELS, G> {
        Keys::new(self.iter())
    }

    pub fn values(&self) -> Values<'_, K, V, LEVELS, G> {
        Values::new(self.iter())
    }

    /// Release every node, walking the level-0 chain so each one is detached
    /// exactly once, and reset the sentinel. The list stays usable.
    ///
    /// Released slots keep their bumped generations on the free list, so
    /// handles taken before the call never resolve again.
    pub fn clear(&mut self) {
        let mut released = 0usize;
        let mut current = self.successor(NodeId::SENTINEL);
        while !current.is_sentinel() {
            let next = self.successor(current);
            match self.free(current) {
                | Some(mut node) => {
                    node.clear();
                    released += 1;
                },
                | None => break,
            }
            current = next;
        }

        self.pre_head = Lanes::sentinel();
        self.len = 0;
        self.stats.reset_population();
        if released > 0 {
            debug!(released, "released skip list nodes");
        }
    }

    /// Level-0 successor, with dead handles treated as the terminator.
    pub(crate) fn successor(&self, id: NodeId) -> NodeId {
        self.lanes(id)
            .and_then(|lanes| lanes.next)
            .unwrap_or(NodeId::SENTINEL)
    }

    fn jump(&self, id: NodeId, level: usize) -> NodeId {
        self.lanes(id)
            .and_then(|lanes| lanes.jump(level))
            .unwrap_or(NodeId::SENTINEL)
    }

    fn key_of(&self, id: NodeId) -> Option<&K> {
        self.node(id).map(Node::key)
    }

    /// Advance along `level` from `current` while `keep_going` accepts the next
    /// node. Stops at the sentinel.
    fn walk<F>(&self, mut current: NodeId, level: usize, mut keep_going: F) -> NodeId
    where
        F: FnMut(NodeId, &K) -> bool,
    {
        loop {
            let next = self.jump(current, level);
            match self.key_of(next) {
                | Some(key) if keep_going(next, key) => current = next,
                | _ => return current,
            }
        }
    }

    fn lanes(&self, id: NodeId) -> Option<&Lanes<LEVELS>> {
        if id.is_sentinel() {
            return Some(&self.pre_head);
        }
        self.node(id).map(|node| &node.lanes)
    }

    fn lanes_mut(&mut self, id: NodeId) -> Option<&mut Lanes<LEVELS>> {
        if id.is_sentinel() {
            return Some(&mut self.pre_head);
        }
        self.node_mut(id).map(|node| &mut node.lanes)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node<K, V, LEVELS>> {
        match self.slot_index(id).and_then(|pos| self.slots.get_mut(pos)) {
            | Some(Slot::Occupied { generation, node }) if *generation == id.generation => Some(node),
            | _ => None,
        }
    }

    fn slot_index(&self, id: NodeId) -> Option<usize> {
        (id.index as usize).checked_sub(1)
    }

    fn alloc(&mut self, node: Node<K, V, LEVELS>) -> NodeId {
        if let Some(pos) = self.free_head {
            if let Some(Slot::Vacant {
                generation,
                next_free,
            }) = self.slots.get(pos as usize)
            {
                let (generation, next_free) = (*generation, *next_free);
                self.free_head = next_free;
                self.slots[pos as usize] = Slot::Occupied { generation, node };
                return NodeId::new(pos + 1, generation);
            }
            self.free_head = None;
        }

        let pos = self.slots.len();
        assert!(
            pos < u32::MAX as usize,
            "skip list arena is limited to {} nodes",
            u32::MAX - 1
        );
        self.slots.push(Slot::Occupied {
            generation: 0,
            node,
        });
        NodeId::new(pos as u32 + 1, 0)
    }

    fn free(&mut self, id: NodeId) -> Option<Node<K, V, LEVELS>> {
        let pos = self.slot_index(id)?;
        match self.slots.get(pos) {
            | Some(Slot::Occupied { generation, .. }) if *generation == id.generation => {},
            | _ => return None,
        }

        let vacant = Slot::Vacant {
            generation: id.generation.wrapping_add(1),
            next_free: self.free_head,
        };
        match mem::replace(&mut self.slots[pos], vacant) {
            | Slot::Occupied { node, .. } => {
                self.free_head = Some(pos as u32);
                Some(node)
            },
            | Slot::Vacant { .. } => None,
        }
    }
}

impl<K, V, const LEVELS: usize, G> Drop for SkipList<K, V, LEVELS, G> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<K, V, const LEVELS: usize, G> fmt::Debug for SkipList<K, V, LEVELS, G>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, const LEVELS: usize, G> Extend<(K, V)> for SkipList<K, V, LEVELS, G>
where
    K: Ord,
    G: LevelGenerator,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(value, key);
        }
    }
}

impl<'a, K, V, const LEVELS: usize, G> IntoIterator for &'a SkipList<K, V, LEVELS, G> {
    type IntoIter = Iter<'a, K, V, LEVELS, G>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, const LEVELS: usize, G> IntoIterator for SkipList<K, V, LEVELS, G>
where
    K: Ord,
{
    type IntoIter = IntoIter<K, V, LEVELS, G>;
    type Item = (K, V);

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}
