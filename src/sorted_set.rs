use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering::{self, Equal};
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;

use tracing::debug;

use crate::observe::{Contents, ListenerHandle, Observers, RangeChange};
use crate::policy::{Compare, Content, Natural};
use crate::raw::{self, RawSplayTree};
use crate::tree_log::{self, Charmap, NodeLines};
use crate::{Error, Result};

mod iterate;
mod neighbors;
mod order_statistic;

pub use iterate::Iterate;

/// An ordered set based on a splay tree.
///
/// Every lookup moves the value it finds (or the last value it touched) to
/// the root, so recently used values are cheap to reach again. This is why
/// lookups such as [`contains`](SortedSet::contains) take `&mut self`.
/// [`iter`](SortedSet::iter), [`first`](SortedSet::first),
/// [`last`](SortedSet::last) and [`nth`](SortedSet::nth) never restructure
/// the tree.
///
/// Values are ordered by an explicit comparator `C` (see [`Compare`]); the
/// default [`Natural`] uses the values' [`Ord`] implementation. It is a logic
/// error for a value's ordering to change while it is in the set.
///
/// Every structural edit is reported to registered range-change listeners as
/// a single [`RangeChange`].
///
/// # Complexity
///
/// Amortized O(log n) per splaying operation; a single call can take O(n) on
/// a degenerate shape.
///
/// # Examples
///
/// ```
/// use splay_collections::SortedSet;
///
/// let mut books = SortedSet::new();
///
/// books.insert("A Dance With Dragons");
/// books.insert("To Kill a Mockingbird");
/// books.insert("The Odyssey");
/// books.insert("The Great Gatsby");
///
/// if !books.contains(&"The Winds of Winter") {
///     println!("We have {} books, but The Winds of Winter ain't one.", books.len());
/// }
///
/// books.remove(&"The Odyssey");
///
/// for book in &books {
///     println!("{book}");
/// }
/// ```
pub struct SortedSet<T, C = Natural> {
    raw: RawSplayTree<T>,
    compare: C,
    content: Content<T>,
    observers: Observers<T>,
}

/// An iterator over the values of a `SortedSet`, in ascending order.
///
/// This `struct` is created by the [`iter`] method on [`SortedSet`].
///
/// # Examples
///
/// ```
/// use splay_collections::SortedSet;
///
/// let set = SortedSet::from([3, 1, 2]);
/// let mut iter = set.iter();
/// assert_eq!(iter.next(), Some(&1));
/// assert_eq!(iter.next_back(), Some(&3));
/// assert_eq!(iter.next(), Some(&2));
/// ```
///
/// [`iter`]: SortedSet::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T> {
    inner: raw::Iter<'a, T>,
}

/// An owning iterator over the values of a `SortedSet`, in ascending order.
///
/// This `struct` is created by the [`into_iter`] method on [`SortedSet`]
/// (provided by the [`IntoIterator`] trait).
///
/// [`into_iter`]: SortedSet#method.into_iter
pub struct IntoIter<T> {
    inner: alloc::vec::IntoIter<T>,
}

impl<T> SortedSet<T> {
    /// Makes a new, empty `SortedSet` ordered by [`Ord`].
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::SortedSet;
    ///
    /// let mut set: SortedSet<i32> = SortedSet::new();
    /// assert!(set.is_empty());
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        Self::with_comparator(Natural)
    }
}

impl<T, C> SortedSet<T, C> {
    /// Makes a new, empty `SortedSet` ordered by `compare`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::SortedSet;
    ///
    /// let mut set = SortedSet::with_comparator(|a: &&str, b: &&str| a.len().cmp(&b.len()));
    /// set.insert("ccc");
    /// set.insert("a");
    /// assert!(!set.insert("b"));
    /// assert_eq!(set.iter().copied().collect::<Vec<_>>(), ["a", "ccc"]);
    /// ```
    #[must_use]
    pub const fn with_comparator(compare: C) -> Self {
        Self {
            raw: RawSplayTree::new(),
            compare,
            content: Content::none(),
            observers: Observers::new(),
        }
    }

    /// Sets the factory [`get`](SortedSet::get) consults when a value is
    /// missing.
    ///
    /// The produced value is returned to the caller but is not inserted.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::SortedSet;
    ///
    /// let mut set = SortedSet::from([1, 2]).with_content(|v: &i32| Some(-v));
    /// assert_eq!(set.get(&2).as_deref(), Some(&2));
    /// assert_eq!(set.get(&7).as_deref(), Some(&-7));
    /// assert_eq!(set.len(), 2);
    /// ```
    #[must_use]
    pub fn with_content<F>(mut self, content: F) -> Self
    where
        F: Fn(&T) -> Option<T> + 'static,
    {
        self.content = Content::new(content);
        self
    }

    /// Returns the comparator ordering this set.
    #[must_use]
    pub const fn comparator(&self) -> &C {
        &self.compare
    }

    /// Returns the number of values in the set.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the set contains no values.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the least value without restructuring the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::SortedSet;
    ///
    /// let set = SortedSet::from([3, 1, 2]);
    /// assert_eq!(set.first(), Some(&1));
    /// assert_eq!(set.last(), Some(&3));
    /// ```
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.raw.first()
    }

    /// Returns the greatest value without restructuring the tree.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.raw.last()
    }

    /// Returns the value currently at the root of the tree.
    ///
    /// This is a diagnostic; it is the value most recently touched by a
    /// splaying operation.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::SortedSet;
    ///
    /// let mut set = SortedSet::from([1, 2, 3]);
    /// set.contains(&2);
    /// assert_eq!(set.root(), Some(&2));
    /// ```
    #[must_use]
    pub fn root(&self) -> Option<&T> {
        self.raw.root()
    }

    /// Returns the root value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyContainer`] if the set is empty.
    pub fn one(&self) -> Result<&T> {
        self.raw.root().ok_or(Error::EmptyContainer)
    }

    /// Returns the only value of a one-element set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyContainer`] if the set is empty and
    /// [`Error::MultipleValues`] if it holds more than one value.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::{Error, SortedSet};
    ///
    /// assert_eq!(SortedSet::from([7]).only(), Ok(&7));
    /// assert_eq!(SortedSet::from([7, 8]).only(), Err(Error::MultipleValues));
    /// assert_eq!(SortedSet::<i32>::new().only(), Err(Error::EmptyContainer));
    /// ```
    pub fn only(&self) -> Result<&T> {
        match self.len() {
            0 => Err(Error::EmptyContainer),
            1 => self.one(),
            _ => Err(Error::MultipleValues),
        }
    }

    /// Gets an iterator that visits the values in ascending order.
    ///
    /// The tree is not restructured.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { inner: self.raw.iter() }
    }

    /// Registers a listener called before every structural edit, with the
    /// contents as they are before the edit.
    pub fn observe_range_will_change<F>(&mut self, listener: F) -> ListenerHandle
    where
        F: FnMut(&RangeChange<T>, Contents<'_, T>) + 'static,
    {
        self.observers.observe_will_change(alloc::boxed::Box::new(listener))
    }

    /// Registers a listener called after every structural edit, with the
    /// contents as they are after the edit.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::cell::RefCell;
    /// use std::rc::Rc;
    /// use splay_collections::SortedSet;
    ///
    /// let mirror = Rc::new(RefCell::new(Vec::new()));
    /// let mut set = SortedSet::new();
    /// let sink = Rc::clone(&mirror);
    /// set.observe_range_change(move |change, _| {
    ///     let mut mirror = sink.borrow_mut();
    ///     mirror.splice(change.index..change.index + change.removed.len(), change.added.iter().copied());
    /// });
    ///
    /// set.extend([5, 1, 3]);
    /// set.remove(&1);
    /// assert_eq!(*mirror.borrow(), [3, 5]);
    /// ```
    pub fn observe_range_change<F>(&mut self, listener: F) -> ListenerHandle
    where
        F: FnMut(&RangeChange<T>, Contents<'_, T>) + 'static,
    {
        self.observers.observe_did_change(alloc::boxed::Box::new(listener))
    }

    /// Removes a listener registered with either observation method.
    ///
    /// Returns `false` if no listener is registered under `handle`.
    pub fn unobserve(&mut self, handle: ListenerHandle) -> bool {
        self.observers.unobserve(handle)
    }

    /// Draws the shape of the tree, one line per value in ascending order.
    ///
    /// `label` renders a value; the tree is not restructured.
    pub fn log<F>(&self, charmap: &Charmap, mut label: F) -> Vec<String>
    where
        F: FnMut(&T) -> String,
    {
        tree_log::lines(&self.raw, charmap, |value, out| out.write(label(value)))
    }

    /// Draws the shape of the tree, letting `label` write any number of lines
    /// around each value. See [`NodeLines`].
    pub fn log_with<F>(&self, charmap: &Charmap, label: F) -> Vec<String>
    where
        F: FnMut(&T, &mut NodeLines),
    {
        tree_log::lines(&self.raw, charmap, label)
    }

    /// Renders the shape of the tree as nested `(value <size lesser, greater)`
    /// groups.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::SortedSet;
    ///
    /// let set = SortedSet::from([1, 2]);
    /// assert_eq!(set.summary(), "(2 <2 (1 <1), ())");
    /// ```
    #[must_use]
    pub fn summary(&self) -> String
    where
        T: fmt::Display,
    {
        tree_log::summary(&self.raw, |value| alloc::format!("{value}"))
    }

    fn will_change(&mut self, change: Option<&RangeChange<T>>) {
        if let Some(change) = change {
            self.observers.will_change(change, Contents::new(&self.raw));
        }
    }

    fn did_change(&mut self, change: Option<&RangeChange<T>>) {
        if let Some(change) = change {
            self.observers.did_change(change, Contents::new(&self.raw));
        }
    }
}

impl<T, C: Compare<T>> SortedSet<T, C> {
    /// Splays `value` or its nearest neighbour to the root.
    fn splay_to(&mut self, value: &T) -> Option<Ordering> {
        let compare = &self.compare;
        self.raw.splay_by(|probe| compare.compare(value, probe))
    }

    /// Splays `value` and reports whether the new root is a match.
    fn locate(&mut self, value: &T) -> bool {
        let side = self.splay_to(value);
        self.matches_root(value, side)
    }

    fn matches_root(&self, value: &T, side: Option<Ordering>) -> bool {
        self.raw
            .root()
            .is_some_and(|root| side == Some(Equal) || self.compare.equals(value, root))
    }

    /// Returns `true` if the set contains `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::SortedSet;
    ///
    /// let mut set = SortedSet::from([1, 2, 3]);
    /// assert!(set.contains(&1));
    /// assert!(!set.contains(&4));
    /// ```
    pub fn contains(&mut self, value: &T) -> bool {
        self.locate(value)
    }

    /// Returns a reference to the stored value equal to `value`, if any.
    ///
    /// Unlike [`get`](SortedSet::get), the content factory is not consulted.
    pub fn find(&mut self, value: &T) -> Option<&T> {
        if self.locate(value) { self.raw.root() } else { None }
    }

    /// Returns the stored value equal to `value`, or whatever the content
    /// factory produces for it.
    pub fn get(&mut self, value: &T) -> Option<Cow<'_, T>>
    where
        T: Clone,
    {
        if self.locate(value) {
            self.raw.root().map(Cow::Borrowed)
        } else {
            self.content.produce(value).map(Cow::Owned)
        }
    }
}

impl<T: Clone, C: Compare<T>> SortedSet<T, C> {
    /// Makes a `SortedSet` ordered by `compare` from the values of `iter`.
    ///
    /// Duplicates after the first are ignored.
    pub fn from_iter_with<I>(iter: I, compare: C) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut set = Self::with_comparator(compare);
        set.extend(iter);
        set
    }

    /// Adds a value to the set.
    ///
    /// Returns whether the value was newly inserted. That is:
    ///
    /// - If the set did not previously contain an equal value, `true` is
    ///   returned.
    /// - If the set already contained an equal value, `false` is returned,
    ///   and the entry is not updated.
    ///
    /// Either way the value (or its equal) ends up at the root.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::SortedSet;
    ///
    /// let mut set = SortedSet::new();
    ///
    /// assert_eq!(set.insert(2), true);
    /// assert_eq!(set.insert(2), false);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        let side = self.splay_to(&value);
        if self.matches_root(&value, side) {
            return false;
        }
        let rank = self.raw.root_rank().unwrap_or(0);
        let index = match side {
            Some(Ordering::Greater) => rank + 1,
            _ => rank,
        };
        let change = self
            .observers
            .is_observed()
            .then(|| RangeChange::new(alloc::vec![value.clone()], Vec::new(), index));

        self.will_change(change.as_ref());
        self.raw.attach_root(value, side);
        self.did_change(change.as_ref());
        true
    }

    /// Inserts each of `values` at its sorted position.
    pub fn push<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        for value in values {
            self.insert(value);
        }
    }

    /// Inserts each of `values` at its sorted position.
    ///
    /// Identical to [`push`](SortedSet::push); order is determined by the
    /// comparator, not by the end the values are offered at.
    pub fn unshift<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.push(values);
    }

    /// If the set contains a value equal to `value`, removes it and returns
    /// `true`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::SortedSet;
    ///
    /// let mut set = SortedSet::from([2]);
    /// assert_eq!(set.remove(&2), true);
    /// assert_eq!(set.remove(&2), false);
    /// ```
    pub fn remove(&mut self, value: &T) -> bool {
        self.take(value).is_some()
    }

    /// Removes and returns the stored value equal to `value`, if any.
    pub fn take(&mut self, value: &T) -> Option<T> {
        if self.locate(value) { self.take_root() } else { None }
    }

    /// Removes the root, reporting it as a one-value removal.
    fn take_root(&mut self) -> Option<T> {
        let index = self.raw.root_rank()?;
        let change = if self.observers.is_observed() {
            self.raw.root().map(|root| RangeChange::new(Vec::new(), alloc::vec![root.clone()], index))
        } else {
            None
        };

        self.will_change(change.as_ref());
        let removed = self.raw.detach_root();
        self.did_change(change.as_ref());
        removed
    }

    /// Removes the least value from the set and returns it.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::SortedSet;
    ///
    /// let mut set = SortedSet::from([1, 2, 3]);
    /// assert_eq!(set.pop_first(), Some(1));
    /// assert_eq!(set.pop_last(), Some(3));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn pop_first(&mut self) -> Option<T> {
        self.raw.splay_first()?;
        self.take_root()
    }

    /// Removes the greatest value from the set and returns it.
    pub fn pop_last(&mut self) -> Option<T> {
        self.raw.splay_last()?;
        self.take_root()
    }

    /// Clears the set, removing all values.
    ///
    /// Listeners see one change removing every value from index 0.
    pub fn clear(&mut self) {
        if self.raw.is_empty() {
            return;
        }
        let change = self
            .observers
            .is_observed()
            .then(|| RangeChange::new(Vec::new(), self.raw.iter().cloned().collect(), 0));

        self.will_change(change.as_ref());
        debug!(len = self.raw.len(), "clearing sorted set");
        self.raw.clear();
        self.did_change(change.as_ref());
    }
}

impl<T: Hash, C> Hash for SortedSet<T, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        for value in self {
            value.hash(state);
        }
    }
}

impl<T: PartialEq, C> PartialEq for SortedSet<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq, C> Eq for SortedSet<T, C> {}

/// Builds an empty set with the same comparator and content factory and
/// inserts a clone of every value. Listeners are not carried over.
impl<T: Clone, C: Clone + Compare<T>> Clone for SortedSet<T, C> {
    fn clone(&self) -> Self {
        let mut copy = Self::with_comparator(self.compare.clone());
        copy.content = self.content.clone();
        copy.extend(self.iter().cloned());
        copy
    }
}

impl<T: fmt::Debug, C> fmt::Debug for SortedSet<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, C: Default> Default for SortedSet<T, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<T: Ord + Clone> FromIterator<T> for SortedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_iter_with(iter, Natural)
    }
}

impl<T: Clone, C: Compare<T>> Extend<T> for SortedSet<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.push(iter);
    }
}

impl<'a, T: 'a + Copy, C: Compare<T>> Extend<&'a T> for SortedSet<T, C> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.push(iter.into_iter().copied());
    }
}

impl<T: Ord + Clone, const N: usize> From<[T; N]> for SortedSet<T> {
    /// Converts a `[T; N]` into a `SortedSet<T>`.
    ///
    /// ```
    /// use splay_collections::SortedSet;
    ///
    /// let set1 = SortedSet::from([1, 2, 3, 4]);
    /// let set2: SortedSet<_> = [1, 2, 3, 4].into();
    /// assert_eq!(set1, set2);
    /// ```
    fn from(arr: [T; N]) -> Self {
        Self::from_iter(arr)
    }
}

impl<T, C> IntoIterator for SortedSet<T, C> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Gets an iterator for moving out the `SortedSet`'s contents in
    /// ascending order.
    fn into_iter(self) -> IntoIter<T> {
        IntoIter {
            inner: self.raw.into_vec().into_iter(),
        }
    }
}

impl<'a, T, C> IntoIterator for &'a SortedSet<T, C> {
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

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.as_slice()).finish()
    }
}
