use super::LruSet;
use crate::policy::Natural;

/// The most members an [`LruSet`] keeps before evicting.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Capacity {
    /// Keep at most this many members.
    Bounded(usize),
    /// Never evict.
    #[default]
    Unbounded,
}

impl Capacity {
    /// Returns how many members must be evicted to make room for one more
    /// when `len` are held.
    pub(crate) const fn overflow(self, len: usize) -> usize {
        match self {
            Capacity::Bounded(limit) => (len + 1).saturating_sub(limit),
            Capacity::Unbounded => 0,
        }
    }

    /// Returns true if nothing can ever be admitted.
    pub(crate) const fn is_zero(self) -> bool {
        matches!(self, Capacity::Bounded(0))
    }
}

impl From<usize> for Capacity {
    fn from(limit: usize) -> Self {
        Capacity::Bounded(limit)
    }
}

impl<T> LruSet<T> {
    /// Creates an empty set that keeps at most `capacity` members.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::{Capacity, LruSet};
    ///
    /// let set: LruSet<i32> = LruSet::with_capacity(16);
    /// assert_eq!(set.capacity(), Capacity::Bounded(16));
    /// ```
    #[must_use]
    pub const fn with_capacity(capacity: usize) -> Self {
        Self::with_comparator(Natural, Capacity::Bounded(capacity))
    }
}

impl<T, C> LruSet<T, C> {
    /// Returns the capacity bound of the set.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn capacity(&self) -> Capacity {
        self.capacity
    }
}
