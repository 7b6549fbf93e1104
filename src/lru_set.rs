use alloc::vec::Vec;
use core::fmt;
use core::iter::FusedIterator;

use tracing::debug;

use crate::observe::{Contents, ListenerHandle, Observers, Projected, RangeChange};
use crate::policy::{Compare, Natural};
use crate::sorted_map::{self, SortedMap};

mod capacity;

pub use capacity::Capacity;

/// A set that remembers the order in which its members were last used and
/// evicts the least recently used ones to stay within a [`Capacity`].
///
/// Membership is decided by the comparator `C`; iteration runs from the least
/// recently used member to the most recently used one. Inserting an existing
/// member, or reading it with [`get`](LruSet::get), counts as a use.
///
/// One insertion is reported to listeners as one [`RangeChange`] even when it
/// evicts: `added` holds the new member and `removed` every evicted member,
/// least recent first.
///
/// # Examples
///
/// ```
/// use splay_collections::LruSet;
///
/// let mut recent = LruSet::with_capacity(3);
/// recent.extend([4, 3, 1, 2, 3]);
/// assert_eq!(recent.iter().copied().collect::<Vec<_>>(), [1, 2, 3]);
///
/// assert!(!recent.insert(4));
/// assert_eq!(recent.iter().copied().collect::<Vec<_>>(), [2, 3, 4]);
/// ```
pub struct LruSet<T, C = Natural> {
    /// Member to the stamp of its last use.
    members: SortedMap<T, u64, C>,
    /// Stamp of last use to member; the least recently used member first.
    recency: SortedMap<u64, T>,
    capacity: Capacity,
    next_stamp: u64,
    observers: Observers<T>,
}

/// An iterator over the members of an `LruSet`, least recently used first.
///
/// This `struct` is created by the [`iter`] method on [`LruSet`].
///
/// [`iter`]: LruSet::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T> {
    inner: sorted_map::Values<'a, u64, T>,
}

fn member<T>(entry: &(u64, T)) -> &T {
    &entry.1
}

impl<T> LruSet<T> {
    /// Creates an empty set that never evicts.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_comparator(Natural, Capacity::Unbounded)
    }
}

impl<T, C> LruSet<T, C> {
    /// Creates an empty set deciding membership by `compare` and keeping at
    /// most `capacity` members.
    #[must_use]
    pub const fn with_comparator(compare: C, capacity: Capacity) -> Self {
        Self {
            members: SortedMap::with_comparator(compare),
            recency: SortedMap::new(),
            capacity,
            next_stamp: 0,
            observers: Observers::new(),
        }
    }

    /// Returns the number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.recency.len()
    }

    /// Returns `true` if the set has no members.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.recency.is_empty()
    }

    /// Returns the least recently used member.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.recency.first_key_value().map(|(_, value)| value)
    }

    /// Returns the most recently used member.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.recency.last_key_value().map(|(_, value)| value)
    }

    /// Gets an iterator over the members, least recently used first.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.recency.values(),
        }
    }

    /// Registers a listener called before every structural edit, with the
    /// members in recency order as they are before the edit.
    pub fn observe_range_will_change<F>(&mut self, listener: F) -> ListenerHandle
    where
        F: FnMut(&RangeChange<T>, Contents<'_, T>) + 'static,
    {
        self.observers.observe_will_change(alloc::boxed::Box::new(listener))
    }

    /// Registers a listener called after every structural edit, with the
    /// members in recency order as they are after the edit.
    pub fn observe_range_change<F>(&mut self, listener: F) -> ListenerHandle
    where
        F: FnMut(&RangeChange<T>, Contents<'_, T>) + 'static,
    {
        self.observers.observe_did_change(alloc::boxed::Box::new(listener))
    }

    /// Removes a listener registered with either observation method.
    pub fn unobserve(&mut self, handle: ListenerHandle) -> bool {
        self.observers.unobserve(handle)
    }

    fn stamp(&mut self) -> u64 {
        let stamp = self.next_stamp;
        self.next_stamp += 1;
        stamp
    }

    fn will_change(&mut self, change: Option<&RangeChange<T>>) {
        if let Some(change) = change {
            let projected = Projected::new(self.recency.raw(), member);
            self.observers.will_change(change, Contents::new(&projected));
        }
    }

    fn did_change(&mut self, change: Option<&RangeChange<T>>) {
        if let Some(change) = change {
            let projected = Projected::new(self.recency.raw(), member);
            self.observers.did_change(change, Contents::new(&projected));
        }
    }
}

impl<T: Clone, C: Compare<T>> LruSet<T, C> {
    /// Returns `true` if `value` is a member. This does not count as a use.
    pub fn contains(&mut self, value: &T) -> bool {
        self.members.contains_key(value)
    }

    /// Marks the member equal to `value` as most recently used and returns
    /// it.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::LruSet;
    ///
    /// let mut set = LruSet::with_capacity(2);
    /// set.extend(["a", "b"]);
    /// assert_eq!(set.get(&"a"), Some(&"a"));
    /// set.insert("c");
    /// assert_eq!(set.iter().copied().collect::<Vec<_>>(), ["a", "c"]);
    /// ```
    pub fn get(&mut self, value: &T) -> Option<&T> {
        if self.touch(value) {
            self.last()
        } else {
            None
        }
    }

    /// Moves an existing member to the most recent position, reporting it as
    /// removed from its old rank and added back. Returns `false` if `value`
    /// is not a member.
    fn touch(&mut self, value: &T) -> bool {
        // The lookup leaves the member at the root of `members`; nothing
        // after it calls the comparator.
        let Some(&stamp) = self.members.get(value) else {
            return false;
        };
        let change = if self.observers.is_observed() {
            let index = self.recency.rank_of(&stamp).unwrap_or(0);
            self.recency
                .get(&stamp)
                .map(|stored| RangeChange::new(alloc::vec![stored.clone()], alloc::vec![stored.clone()], index))
        } else {
            None
        };

        self.will_change(change.as_ref());
        let fresh = self.stamp();
        if let Some(last_use) = self.members.root_value_mut() {
            *last_use = fresh;
        }
        if let Some(stored) = self.recency.remove(&stamp) {
            self.recency.insert(fresh, stored);
        }
        self.did_change(change.as_ref());
        true
    }

    /// Adds a value to the set, or marks it as most recently used if it is
    /// already a member.
    ///
    /// Returns whether the set grew. Touching an existing member returns
    /// `false`, and so does admitting a new member into a full set, since the
    /// least recently used member is evicted to make room for it. A set with
    /// a capacity of zero admits nothing.
    ///
    /// If the comparator panics, members already evicted stay evicted; every
    /// remaining member is still tracked in recency order.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::LruSet;
    ///
    /// let mut set = LruSet::with_capacity(2);
    /// assert!(set.insert(1));
    /// assert!(set.insert(2));
    /// assert!(!set.insert(1));
    /// assert!(!set.insert(3));
    /// assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 3]);
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        if self.touch(&value) || self.capacity.is_zero() {
            return false;
        }
        let evict = self.capacity.overflow(self.len());
        let change = self.observers.is_observed().then(|| {
            let removed: Vec<T> = self.recency.values().take(evict).cloned().collect();
            let index = if evict > 0 { 0 } else { self.len() };
            RangeChange::new(alloc::vec![value.clone()], removed, index)
        });

        self.will_change(change.as_ref());
        if evict > 0 {
            debug!(evict, capacity = ?self.capacity, "evicting least recently used members");
        }
        for _ in 0..evict {
            // Forget the member before its stamp, so a panicking comparator
            // leaves both maps agreeing.
            let Some((_, stale)) = self.recency.first_key_value() else {
                break;
            };
            self.members.remove(stale);
            self.recency.pop_first();
        }
        let stamp = self.stamp();
        self.members.insert(value.clone(), stamp);
        self.recency.insert(stamp, value);
        self.did_change(change.as_ref());
        evict == 0
    }

    /// Removes the member equal to `value`. Returns whether it was a member.
    pub fn remove(&mut self, value: &T) -> bool {
        let Some(stamp) = self.members.remove(value) else {
            return false;
        };
        let change = if self.observers.is_observed() {
            let index = self.recency.rank_of(&stamp).unwrap_or(0);
            self.recency
                .get(&stamp)
                .map(|stored| RangeChange::new(Vec::new(), alloc::vec![stored.clone()], index))
        } else {
            None
        };

        self.will_change(change.as_ref());
        self.recency.remove(&stamp);
        self.did_change(change.as_ref());
        true
    }

    /// Removes every member, reporting them as one change in recency order.
    pub fn clear(&mut self) {
        if self.is_empty() {
            return;
        }
        let change = self
            .observers
            .is_observed()
            .then(|| RangeChange::new(Vec::new(), self.iter().cloned().collect(), 0));

        self.will_change(change.as_ref());
        debug!(len = self.len(), "clearing lru set");
        self.members.clear();
        self.recency.clear();
        self.did_change(change.as_ref());
    }
}

impl<T, C> Default for LruSet<T, C>
where
    C: Default,
{
    fn default() -> Self {
        Self::with_comparator(C::default(), Capacity::Unbounded)
    }
}

/// Builds an empty set with the same comparator and capacity and inserts a
/// clone of every member, least recently used first. Listeners are not
/// carried over.
impl<T: Clone, C: Clone + Compare<T>> Clone for LruSet<T, C> {
    fn clone(&self) -> Self {
        let mut copy = Self::with_comparator(self.members.comparator().clone(), self.capacity);
        copy.extend(self.iter().cloned());
        copy
    }
}

impl<T: fmt::Debug, C> fmt::Debug for LruSet<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Clone, C: Compare<T>> Extend<T> for LruSet<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: Ord + Clone> FromIterator<T> for LruSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<'a, T, C> IntoIterator for &'a LruSet<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}
