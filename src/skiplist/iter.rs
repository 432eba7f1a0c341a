// Copyright (c) Sienna Satterwhite, CesiumDB Contributors
// SPDX-License-Identifier: GPL-3.0-only WITH Classpath-exception-2.0

use std::iter::FusedIterator;

use crate::skiplist::{
    list::SkipList,
    node::NodeId,
};

/// Forward traversal of the level-0 chain, yielding entries in key order.
pub struct Iter<'a, K, V, const LEVELS: usize, G> {
    list: &'a SkipList<K, V, LEVELS, G>,
    cursor: NodeId,
}

impl<'a, K, V, const LEVELS: usize, G> Iter<'a, K, V, LEVELS, G> {
    /// Start with the node following `cursor`.
    pub(crate) fn after(list: &'a SkipList<K, V, LEVELS, G>, cursor: NodeId) -> Self {
        Iter { list, cursor }
    }
}

impl<'a, K, V, const LEVELS: usize, G> Iterator for Iter<'a, K, V, LEVELS, G> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.list.successor(self.cursor);
        // the sentinel resolves to no node, which ends the walk
        let node = self.list.node(next)?;
        self.cursor = next;
        Some((node.key(), node.value()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.list.len()))
    }
}

impl<K, V, const LEVELS: usize, G> FusedIterator for Iter<'_, K, V, LEVELS, G> {}

pub struct Keys<'a, K, V, const LEVELS: usize, G> {
    inner: Iter<'a, K, V, LEVELS, G>,
}

impl<'a, K, V, const LEVELS: usize, G> Keys<'a, K, V, LEVELS, G> {
    pub(crate) fn new(inner: Iter<'a, K, V, LEVELS, G>) -> Self {
        Keys { inner }
    }
}

impl<'a, K, V, const LEVELS: usize, G> Iterator for Keys<'a, K, V, LEVELS, G> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

pub struct Values<'a, K, V, const LEVELS: usize, G> {
    inner: Iter<'a, K, V, LEVELS, G>,
}

impl<'a, K, V, const LEVELS: usize, G> Values<'a, K, V, LEVELS, G> {
    pub(crate) fn new(inner: Iter<'a, K, V, LEVELS, G>) -> Self {
        Values { inner }
    }
}

impl<'a, K, V, const LEVELS: usize, G> Iterator for Values<'a, K, V, LEVELS, G> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Owning traversal. Each step detaches the front node from the list.
pub struct IntoIter<K, V, const LEVELS: usize, G> {
    list: SkipList<K, V, LEVELS, G>,
}

impl<K, V, const LEVELS: usize, G> IntoIter<K, V, LEVELS, G> {
    pub(crate) fn new(list: SkipList<K, V, LEVELS, G>) -> Self {
        IntoIter { list }
    }
}

impl<K, V, const LEVELS: usize, G> Iterator for IntoIter<K, V, LEVELS, G>
where
    K: Ord,
{
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.list.pop_first()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len(), Some(self.list.len()))
    }
}

impl<K, V, const LEVELS: usize, G> ExactSizeIterator for IntoIter<K, V, LEVELS, G> where K: Ord {}

#[cfg(test)]
mod tests {
    use crate::{
        config::Config,
        skiplist::SkipList,
    };

    fn sample() -> SkipList<u32, char, 8> {
        let mut list = SkipList::with_config(Config::default().with_seed(21)).unwrap();
        for (i, c) in "skiplist".chars().enumerate() {
            list.insert(c, (i as u32) * 10);
        }
        list
    }

    #[test]
    fn test_iter_in_key_order() {
        let list = sample();
        let keys: Vec<u32> = list.keys().copied().collect();
        assert_eq!(keys, vec![0, 10, 20, 30, 40, 50, 60, 70]);
        let word: String = list.values().collect();
        assert_eq!(word, "skiplist");
    }

    #[test]
    fn test_iter_is_fused() {
        let list = sample();
        let mut iter = list.iter();
        assert_eq!(iter.by_ref().count(), 8);
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_into_iter_drains() {
        let list = sample();
        let mut iter = list.into_iter();
        assert_eq!(iter.len(), 8);
        assert_eq!(iter.next(), Some((0, 's')));
        assert_eq!(iter.len(), 7);
        assert_eq!(iter.last(), Some((70, 't')));
    }
}
