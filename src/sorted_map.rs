use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering::{self, Equal};
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::mem;

use tracing::debug;

use crate::observe::{Contents, ListenerHandle, Observers, RangeChange};
use crate::policy::{Compare, Content, Natural};
use crate::raw::{self, RawSplayTree};
use crate::tree_log::{self, Charmap, NodeLines};

mod neighbors;
mod order_statistic;

/// An ordered map based on a splay tree.
///
/// Entries are `(key, value)` pairs ordered by key through the comparator
/// `C`. Like [`SortedSet`](crate::SortedSet), every keyed lookup splays the
/// entry it reaches to the root and therefore takes `&mut self`.
///
/// Range-change listeners see whole entries: a replaced value is reported as
/// one change removing the old entry and adding the new one at the same
/// index.
///
/// Mutating methods clone keys and values into change reports, so they
/// require `K: Clone` and `V: Clone`.
///
/// # Examples
///
/// ```
/// use splay_collections::SortedMap;
///
/// let mut scores = SortedMap::new();
/// scores.insert("Alice", 100);
/// scores.insert("Bob", 85);
/// scores.insert("Carol", 92);
///
/// assert_eq!(scores.get(&"Bob"), Some(&85));
/// assert_eq!(scores.rank_of(&"Carol"), Some(2));
/// assert_eq!(scores.insert("Bob", 88), Some(85));
/// assert_eq!(scores.values().copied().collect::<Vec<_>>(), [100, 88, 92]);
/// ```
pub struct SortedMap<K, V, C = Natural> {
    raw: RawSplayTree<(K, V)>,
    compare: C,
    content: Content<K, V>,
    observers: Observers<(K, V)>,
}

/// An iterator over the entries of a `SortedMap`, in ascending key order.
///
/// This `struct` is created by the [`iter`] method on [`SortedMap`].
///
/// [`iter`]: SortedMap::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    inner: raw::Iter<'a, (K, V)>,
}

/// An iterator over the keys of a `SortedMap`, in ascending order.
///
/// This `struct` is created by the [`keys`] method on [`SortedMap`].
///
/// [`keys`]: SortedMap::keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// An iterator over the values of a `SortedMap`, in ascending key order.
///
/// This `struct` is created by the [`values`] method on [`SortedMap`].
///
/// [`values`]: SortedMap::values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// An owning iterator over the entries of a `SortedMap`, in ascending key
/// order.
pub struct IntoIter<K, V> {
    inner: alloc::vec::IntoIter<(K, V)>,
}

impl<K, V> SortedMap<K, V> {
    /// Makes a new, empty `SortedMap` ordered by the keys' [`Ord`].
    #[must_use]
    pub const fn new() -> Self {
        Self::with_comparator(Natural)
    }
}

impl<K, V, C> SortedMap<K, V, C> {
    /// Makes a new, empty `SortedMap` ordered by `compare`.
    #[must_use]
    pub const fn with_comparator(compare: C) -> Self {
        Self {
            raw: RawSplayTree::new(),
            compare,
            content: Content::none(),
            observers: Observers::new(),
        }
    }

    /// Sets the factory [`get_or_content`](SortedMap::get_or_content)
    /// consults when a key is missing.
    #[must_use]
    pub fn with_content<F>(mut self, content: F) -> Self
    where
        F: Fn(&K) -> Option<V> + 'static,
    {
        self.content = Content::new(content);
        self
    }

    /// Returns the comparator ordering the keys.
    #[must_use]
    pub const fn comparator(&self) -> &C {
        &self.compare
    }

    /// Returns the number of entries in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the entry with the least key without restructuring the tree.
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.raw.first().map(|(k, v)| (k, v))
    }

    /// Returns the entry with the greatest key without restructuring the
    /// tree.
    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.raw.last().map(|(k, v)| (k, v))
    }

    /// Returns the entry currently at the root of the tree.
    #[must_use]
    pub fn root(&self) -> Option<(&K, &V)> {
        self.raw.root().map(|(k, v)| (k, v))
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter { inner: self.raw.iter() }
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Gets an iterator over the values of the map, in order by key.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Registers a listener called before every structural edit.
    pub fn observe_range_will_change<F>(&mut self, listener: F) -> ListenerHandle
    where
        F: FnMut(&RangeChange<(K, V)>, Contents<'_, (K, V)>) + 'static,
    {
        self.observers.observe_will_change(alloc::boxed::Box::new(listener))
    }

    /// Registers a listener called after every structural edit.
    pub fn observe_range_change<F>(&mut self, listener: F) -> ListenerHandle
    where
        F: FnMut(&RangeChange<(K, V)>, Contents<'_, (K, V)>) + 'static,
    {
        self.observers.observe_did_change(alloc::boxed::Box::new(listener))
    }

    /// Removes a listener registered with either observation method.
    pub fn unobserve(&mut self, handle: ListenerHandle) -> bool {
        self.observers.unobserve(handle)
    }

    /// Draws the shape of the tree, one line per entry in key order.
    pub fn log<F>(&self, charmap: &Charmap, mut label: F) -> Vec<String>
    where
        F: FnMut(&K, &V) -> String,
    {
        tree_log::lines(&self.raw, charmap, |(k, v), out| out.write(label(k, v)))
    }

    /// Draws the shape of the tree, letting `label` write any number of lines
    /// around each entry. See [`NodeLines`].
    pub fn log_with<F>(&self, charmap: &Charmap, mut label: F) -> Vec<String>
    where
        F: FnMut(&K, &V, &mut NodeLines),
    {
        tree_log::lines(&self.raw, charmap, |(k, v), out| label(k, v, out))
    }

    /// Renders the shape of the tree as nested `(key <size lesser, greater)`
    /// groups.
    #[must_use]
    pub fn summary(&self) -> String
    where
        K: fmt::Display,
    {
        tree_log::summary(&self.raw, |(key, _)| alloc::format!("{key}"))
    }

    pub(crate) const fn raw(&self) -> &RawSplayTree<(K, V)> {
        &self.raw
    }

    /// Returns the value at the root without searching.
    pub(crate) fn root_value_mut(&mut self) -> Option<&mut V> {
        self.raw.root_mut().map(|(_, v)| v)
    }

    fn will_change(&mut self, change: Option<&RangeChange<(K, V)>>) {
        if let Some(change) = change {
            self.observers.will_change(change, Contents::new(&self.raw));
        }
    }

    fn did_change(&mut self, change: Option<&RangeChange<(K, V)>>) {
        if let Some(change) = change {
            self.observers.did_change(change, Contents::new(&self.raw));
        }
    }
}

impl<K, V, C: Compare<K>> SortedMap<K, V, C> {
    fn splay_to(&mut self, key: &K) -> Option<Ordering> {
        let compare = &self.compare;
        self.raw.splay_by(|(probe, _)| compare.compare(key, probe))
    }

    fn locate(&mut self, key: &K) -> bool {
        let side = self.splay_to(key);
        self.matches_root(key, side)
    }

    fn matches_root(&self, key: &K, side: Option<Ordering>) -> bool {
        self.raw
            .root()
            .is_some_and(|(root, _)| side == Some(Equal) || self.compare.equals(key, root))
    }

    /// Returns `true` if the map contains an entry for `key`.
    pub fn contains_key(&mut self, key: &K) -> bool {
        self.locate(key)
    }

    /// Returns a reference to the value corresponding to `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::SortedMap;
    ///
    /// let mut map = SortedMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    pub fn get(&mut self, key: &K) -> Option<&V> {
        if self.locate(key) { self.raw.root().map(|(_, v)| v) } else { None }
    }

    /// Returns the stored key and value corresponding to `key`.
    pub fn get_key_value(&mut self, key: &K) -> Option<(&K, &V)> {
        if self.locate(key) { self.raw.root().map(|(k, v)| (k, v)) } else { None }
    }

    /// Returns a mutable reference to the value corresponding to `key`.
    ///
    /// Edits through this reference are not reported to listeners.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        if self.locate(key) { self.raw.root_mut().map(|(_, v)| v) } else { None }
    }

    /// Returns the value corresponding to `key`, or whatever the content
    /// factory produces for it.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::SortedMap;
    ///
    /// let mut map = SortedMap::from([("a", 1)]).with_content(|key: &&str| Some(key.len()));
    /// assert_eq!(map.get_or_content(&"a").as_deref(), Some(&1));
    /// assert_eq!(map.get_or_content(&"abc").as_deref(), Some(&3));
    /// ```
    pub fn get_or_content(&mut self, key: &K) -> Option<Cow<'_, V>>
    where
        V: Clone,
    {
        if self.locate(key) {
            self.raw.root().map(|(_, v)| Cow::Borrowed(v))
        } else {
            self.content.produce(key).map(Cow::Owned)
        }
    }
}

impl<K: Clone, V: Clone, C: Compare<K>> SortedMap<K, V, C> {
    /// Makes a `SortedMap` ordered by `compare` from the entries of `iter`.
    ///
    /// Later entries replace the values of earlier ones with the same key.
    pub fn from_iter_with<I>(iter: I, compare: C) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut map = Self::with_comparator(compare);
        map.extend(iter);
        map
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map did not have this key present, `None` is returned.
    ///
    /// If the map did have this key present, the value is updated, and the
    /// old value is returned. The key is not updated.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let side = self.splay_to(&key);
        if self.matches_root(&key, side) {
            let index = self.raw.root_rank().unwrap_or(0);
            let change = if self.observers.is_observed() {
                self.raw.root().map(|(stored, old)| {
                    RangeChange::new(
                        alloc::vec![(stored.clone(), value.clone())],
                        alloc::vec![(stored.clone(), old.clone())],
                        index,
                    )
                })
            } else {
                None
            };
            self.will_change(change.as_ref());
            let old = self.raw.root_mut().map(|(_, old)| mem::replace(old, value));
            self.did_change(change.as_ref());
            return old;
        }

        let rank = self.raw.root_rank().unwrap_or(0);
        let index = match side {
            Some(Ordering::Greater) => rank + 1,
            _ => rank,
        };
        let change = self
            .observers
            .is_observed()
            .then(|| RangeChange::new(alloc::vec![(key.clone(), value.clone())], Vec::new(), index));

        self.will_change(change.as_ref());
        self.raw.attach_root((key, value), side);
        self.did_change(change.as_ref());
        None
    }

    /// Removes a key from the map, returning the value at the key if the key
    /// was previously in the map.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes a key from the map, returning the stored key and value if the
    /// key was previously in the map.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        if self.locate(key) { self.take_root() } else { None }
    }

    fn take_root(&mut self) -> Option<(K, V)> {
        let index = self.raw.root_rank()?;
        let change = if self.observers.is_observed() {
            self.raw.root().map(|entry| RangeChange::new(Vec::new(), alloc::vec![entry.clone()], index))
        } else {
            None
        };

        self.will_change(change.as_ref());
        let removed = self.raw.detach_root();
        self.did_change(change.as_ref());
        removed
    }

    /// Removes and returns the entry with the least key.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        self.raw.splay_first()?;
        self.take_root()
    }

    /// Removes and returns the entry with the greatest key.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        self.raw.splay_last()?;
        self.take_root()
    }

    /// Clears the map, removing all entries in one reported change.
    pub fn clear(&mut self) {
        if self.raw.is_empty() {
            return;
        }
        let change = self
            .observers
            .is_observed()
            .then(|| RangeChange::new(Vec::new(), self.raw.iter().cloned().collect(), 0));

        self.will_change(change.as_ref());
        debug!(len = self.raw.len(), "clearing sorted map");
        self.raw.clear();
        self.did_change(change.as_ref());
    }
}

impl<K: Hash, V: Hash, C> Hash for SortedMap<K, V, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        for entry in self {
            entry.hash(state);
        }
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for SortedMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, C> Eq for SortedMap<K, V, C> {}

impl<K: Clone, V: Clone, C: Clone + Compare<K>> Clone for SortedMap<K, V, C> {
    fn clone(&self) -> Self {
        let mut copy = Self::with_comparator(self.compare.clone());
        copy.content = self.content.clone();
        copy.extend(self.iter().map(|(k, v)| (k.clone(), v.clone())));
        copy
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for SortedMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C: Default> Default for SortedMap<K, V, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<K: Ord + Clone, V: Clone> FromIterator<(K, V)> for SortedMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_iter_with(iter, Natural)
    }
}

impl<K: Clone, V: Clone, C: Compare<K>> Extend<(K, V)> for SortedMap<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, K: Copy, V: Copy, C: Compare<K>> Extend<(&'a K, &'a V)> for SortedMap<K, V, C> {
    fn extend<I: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: I) {
        self.extend(iter.into_iter().map(|(&key, &value)| (key, value)));
    }
}

impl<K: Ord + Clone, V: Clone, const N: usize> From<[(K, V); N]> for SortedMap<K, V> {
    /// Converts a `[(K, V); N]` into a `SortedMap<K, V>`.
    ///
    /// ```
    /// use splay_collections::SortedMap;
    ///
    /// let map1 = SortedMap::from([(1, 2), (3, 4)]);
    /// let map2: SortedMap<_, _> = [(1, 2), (3, 4)].into();
    /// assert_eq!(map1, map2);
    /// ```
    fn from(arr: [(K, V); N]) -> Self {
        Self::from_iter(arr)
    }
}

impl<K, V, C> IntoIterator for SortedMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter {
            inner: self.raw.into_vec().into_iter(),
        }
    }
}

impl<'a, K, V, C> IntoIterator for &'a SortedMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<(&'a K, &'a V)> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, v)| (k, v))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K, V> FusedIterator for Values<'_, K, V> {}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<(K, V)> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}
