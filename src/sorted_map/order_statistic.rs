use core::ops::Index;

use super::SortedMap;
use crate::Rank;
use crate::policy::Compare;

impl<K, V, C> SortedMap<K, V, C> {
    /// Returns the entry at position `rank` in key order without
    /// restructuring the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::SortedMap;
    ///
    /// let map = SortedMap::from([("a", 1), ("b", 2)]);
    /// assert_eq!(map.nth(1), Some((&"b", &2)));
    /// assert_eq!(map.nth(2), None);
    /// ```
    #[must_use]
    pub fn nth(&self, rank: usize) -> Option<(&K, &V)> {
        self.raw.nth(rank).map(|(k, v)| (k, v))
    }

    /// Splays the entry at position `rank` in key order to the root and
    /// returns it.
    pub fn splay_index(&mut self, rank: usize) -> Option<(&K, &V)> {
        self.raw.splay_rank(rank).map(|(k, v)| (k, v))
    }
}

impl<K, V, C: Compare<K>> SortedMap<K, V, C> {
    /// Returns the zero-based rank of `key` in key order, or `None` if the
    /// key is not present.
    pub fn rank_of(&mut self, key: &K) -> Option<usize> {
        if self.locate(key) { self.raw.root_rank() } else { None }
    }
}

/// Indexes into the map by rank, returning the value.
///
/// # Panics
///
/// Panics if `rank` is out of bounds.
///
/// # Examples
///
/// ```
/// use splay_collections::{Rank, SortedMap};
///
/// let map = SortedMap::from([("a", 10), ("b", 20)]);
/// assert_eq!(map[Rank(0)], 10);
/// ```
impl<K, V, C> Index<Rank> for SortedMap<K, V, C> {
    type Output = V;

    fn index(&self, rank: Rank) -> &Self::Output {
        self.nth(rank.0).map(|(_, v)| v).expect("index out of bounds")
    }
}
