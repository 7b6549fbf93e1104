use core::ops::Index;

use super::SortedSet;
use crate::Rank;
use crate::policy::Compare;

impl<T, C> SortedSet<T, C> {
    /// Returns the value at position `rank` in sorted order without
    /// restructuring the tree.
    ///
    /// The rank is zero-based. Returns `None` if `rank` is out of bounds.
    ///
    /// # Complexity
    ///
    /// O(depth of the tree)
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::SortedSet;
    ///
    /// let set = SortedSet::from([10, 20, 30]);
    /// assert_eq!(set.nth(1), Some(&20));
    /// assert!(set.nth(3).is_none());
    /// ```
    #[must_use]
    pub fn nth(&self, rank: usize) -> Option<&T> {
        self.raw.nth(rank)
    }

    /// Splays the value at position `rank` in sorted order to the root and
    /// returns it.
    ///
    /// The rank is zero-based. Returns `None`, leaving the tree untouched, if
    /// `rank` is out of bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::SortedSet;
    ///
    /// let mut set = SortedSet::from([10, 20, 30]);
    /// assert_eq!(set.splay_index(0), Some(&10));
    /// assert_eq!(set.root(), Some(&10));
    /// ```
    pub fn splay_index(&mut self, rank: usize) -> Option<&T> {
        self.raw.splay_rank(rank)
    }

    /// Returns the value at position `rank` in sorted order, splaying it to
    /// the root. Same as [`splay_index`](SortedSet::splay_index).
    pub fn get_by_rank(&mut self, rank: usize) -> Option<&T> {
        self.splay_index(rank)
    }
}

impl<T, C: Compare<T>> SortedSet<T, C> {
    /// Returns the zero-based rank of `value` in sorted order, or `None` if
    /// the value is not present.
    ///
    /// # Complexity
    ///
    /// Amortized O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::SortedSet;
    ///
    /// let mut set = SortedSet::from([10, 20]);
    ///
    /// assert_eq!(set.rank_of(&20), Some(1));
    /// assert_eq!(set.rank_of(&15), None);
    /// ```
    pub fn rank_of(&mut self, value: &T) -> Option<usize> {
        if self.locate(value) { self.raw.root_rank() } else { None }
    }
}

/// Indexes into the set by rank without restructuring the tree.
///
/// # Panics
///
/// Panics if `rank` is out of bounds.
///
/// # Examples
///
/// ```
/// use splay_collections::{Rank, SortedSet};
///
/// let set = SortedSet::from([10, 20, 30]);
/// assert_eq!(set[Rank(1)], 20);
/// ```
impl<T, C> Index<Rank> for SortedSet<T, C> {
    type Output = T;

    fn index(&self, rank: Rank) -> &Self::Output {
        self.nth(rank.0).expect("index out of bounds")
    }
}
