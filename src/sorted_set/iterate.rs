use core::cmp::Ordering::{Greater, Less};
use core::fmt;
use core::iter::FusedIterator;
use core::mem;
use core::ops::{Bound, RangeBounds};

use super::SortedSet;
use crate::policy::{Compare, Natural};

/// A splaying iterator over a range of values in a `SortedSet`.
///
/// The cursor remembers the last value it returned rather than a position in
/// the tree, and every step is a splaying successor query from that value.
/// Values are returned as clones.
///
/// This `struct` is created by the [`iterate`] method on [`SortedSet`].
///
/// # Examples
///
/// ```
/// use splay_collections::SortedSet;
///
/// let mut set = SortedSet::from([1, 2, 3, 4, 5]);
/// let mut range = set.iterate(2..4);
/// assert_eq!(range.next(), Some(2));
/// assert_eq!(range.next(), Some(3));
/// assert_eq!(range.next(), None);
/// ```
///
/// [`iterate`]: SortedSet::iterate
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iterate<'a, T, C = Natural> {
    set: &'a mut SortedSet<T, C>,
    cursor: Cursor<T>,
    end: Bound<T>,
}

enum Cursor<T> {
    Start(Bound<T>),
    After(T),
    Done,
}

impl<T: Clone, C: Compare<T>> SortedSet<T, C> {
    /// Iterates over the values within `range` in ascending order, splaying
    /// around each one as it is reached.
    ///
    /// An empty or inverted range yields nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::SortedSet;
    ///
    /// let mut set = SortedSet::from([10, 20, 30, 40]);
    /// assert_eq!(set.iterate(15..=30).collect::<Vec<_>>(), [20, 30]);
    /// assert_eq!(set.iterate(..).count(), 4);
    /// ```
    pub fn iterate<R>(&mut self, range: R) -> Iterate<'_, T, C>
    where
        R: RangeBounds<T>,
    {
        Iterate {
            cursor: Cursor::Start(range.start_bound().cloned()),
            end: range.end_bound().cloned(),
            set: self,
        }
    }
}

impl<T: Clone, C: Compare<T>> Iterate<'_, T, C> {
    fn within_end(&self, value: &T) -> bool {
        match &self.end {
            Bound::Unbounded => true,
            Bound::Included(end) => self.set.compare.compare(value, end) != Greater,
            Bound::Excluded(end) => self.set.compare.compare(value, end) == Less,
        }
    }
}

impl<T: Clone, C: Compare<T>> Iterator for Iterate<'_, T, C> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let set = &mut *self.set;
        let next = match mem::replace(&mut self.cursor, Cursor::Done) {
            Cursor::Start(Bound::Unbounded) => set.find_least(),
            Cursor::Start(Bound::Included(start)) => set.find_least_greater_than_or_equal(&start),
            Cursor::Start(Bound::Excluded(start)) | Cursor::After(start) => set.find_least_greater_than(&start),
            Cursor::Done => None,
        }?
        .clone();

        if !self.within_end(&next) {
            return None;
        }
        self.cursor = Cursor::After(next.clone());
        Some(next)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.cursor {
            Cursor::Done => (0, Some(0)),
            _ => (0, Some(self.set.len())),
        }
    }
}

impl<T: Clone, C: Compare<T>> FusedIterator for Iterate<'_, T, C> {}

impl<T: fmt::Debug, C> fmt::Debug for Iterate<'_, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cursor = match &self.cursor {
            Cursor::Start(start) => start.as_ref(),
            Cursor::After(last) => Bound::Excluded(last),
            Cursor::Done => Bound::Unbounded,
        };
        f.debug_struct("Iterate")
            .field("from", &cursor)
            .field("end", &self.end)
            .field("done", &matches!(self.cursor, Cursor::Done))
            .finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use crate::SortedSet;
    use alloc::collections::BTreeSet;
    use alloc::vec::Vec;
    use core::ops::Bound::{self, Excluded, Included, Unbounded};
    use proptest::prelude::*;

    #[test]
    fn every_bound_kind() {
        let mut set = SortedSet::from([1, 3, 5, 7, 9]);
        assert_eq!(set.iterate(3..7).collect::<Vec<_>>(), [3, 5]);
        assert_eq!(set.iterate(3..=7).collect::<Vec<_>>(), [3, 5, 7]);
        assert_eq!(set.iterate(4..).collect::<Vec<_>>(), [5, 7, 9]);
        assert_eq!(set.iterate(..=1).collect::<Vec<_>>(), [1]);
        assert_eq!(set.iterate((Excluded(3), Excluded(9))).collect::<Vec<_>>(), [5, 7]);
        assert_eq!(set.iterate(8..2).count(), 0);
        assert_eq!(set.iterate(10..).count(), 0);
        set.check();
    }

    #[test]
    fn empty_set_yields_nothing() {
        let mut set: SortedSet<u8> = SortedSet::new();
        let mut iterate = set.iterate(..);
        assert_eq!(iterate.next(), None);
        assert_eq!(iterate.next(), None);
    }

    #[test]
    fn each_step_splays() {
        let mut set = SortedSet::from([1, 2, 3, 4]);
        let mut iterate = set.iterate(2..);
        assert_eq!(iterate.next(), Some(2));
        assert_eq!(iterate.next(), Some(3));
        drop(iterate);
        // The successor query for 3 splayed its predecessor.
        assert_eq!(set.root(), Some(&2));
    }

    fn bound(kind: u8, value: u8) -> Bound<u8> {
        match kind % 3 {
            0 => Unbounded,
            1 => Included(value),
            _ => Excluded(value),
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn agrees_with_btree_range(
            values in prop::collection::vec(any::<u8>(), 0..80),
            (start_kind, start, end_kind, end) in (any::<u8>(), any::<u8>(), any::<u8>(), any::<u8>()),
        ) {
            let mut set: SortedSet<u8> = values.iter().copied().collect();
            let model: BTreeSet<u8> = values.iter().copied().collect();
            let range = (bound(start_kind, start), bound(end_kind, end));
            let expected: Vec<u8> = model
                .iter()
                .copied()
                .filter(|v| core::ops::RangeBounds::contains(&range, v))
                .collect();
            prop_assert_eq!(set.iterate(range).collect::<Vec<_>>(), expected);
        }
    }
}
