//! Synchronous range-change notification.
//!
//! Every structural edit made by one public call is reported as a single
//! [`RangeChange`], dispatched first to the "will change" listeners (which see
//! the contents before the edit) and then, after the edit is committed, to the
//! "did change" listeners (which see the contents after it). Listeners run in
//! registration order on the caller's stack.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use tracing::trace;

use crate::raw::RawSplayTree;

/// One batch of insertions and removals caused by a single logical edit.
///
/// # Examples
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use splay_collections::{RangeChange, SortedSet};
///
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let mut set = SortedSet::from([10, 30]);
/// let sink = Rc::clone(&seen);
/// set.observe_range_change(move |change, _| sink.borrow_mut().push(change.clone()));
///
/// set.insert(20);
/// assert_eq!(seen.borrow()[0], RangeChange { added: vec![20], removed: vec![], index: 1 });
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct RangeChange<T> {
    /// Values entering the collection, in ascending order.
    pub added: Vec<T>,
    /// Values leaving the collection, in ascending order (eviction order for
    /// an [`LruSet`](crate::LruSet)).
    pub removed: Vec<T>,
    /// Rank at which the batch begins.
    pub index: usize,
}

impl<T> RangeChange<T> {
    pub(crate) fn new(added: Vec<T>, removed: Vec<T>, index: usize) -> Self {
        Self { added, removed, index }
    }
}

/// Identifies a registered listener so that it can be removed again.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ListenerHandle(u64);

/// A read-only view of a collection's contents, handed to listeners.
///
/// Values are visited in the collection's iteration order.
pub struct Contents<'a, T> {
    snapshot: &'a dyn Snapshot<T>,
}

impl<'a, T> Contents<'a, T> {
    pub(crate) fn new(snapshot: &'a dyn Snapshot<T>) -> Self {
        Self { snapshot }
    }

    /// Returns the number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    /// Returns true if there are no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Calls `f` on every value in order.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&T),
    {
        self.snapshot.visit(&mut f);
    }

    /// Collects clones of every value in order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        let mut values = Vec::with_capacity(self.len());
        self.for_each(|value| values.push(value.clone()));
        values
    }
}

impl<T> Clone for Contents<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Contents<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for Contents<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        self.for_each(|value| {
            list.entry(value);
        });
        list.finish()
    }
}

/// Something a [`Contents`] view can walk.
pub(crate) trait Snapshot<T> {
    fn len(&self) -> usize;
    fn visit(&self, f: &mut dyn FnMut(&T));
}

impl<T> Snapshot<T> for RawSplayTree<T> {
    fn len(&self) -> usize {
        RawSplayTree::len(self)
    }

    fn visit(&self, f: &mut dyn FnMut(&T)) {
        self.iter().for_each(f);
    }
}

/// A tree whose elements are viewed through a projection, such as the values
/// of a map's entries.
pub(crate) struct Projected<'a, E, T> {
    tree: &'a RawSplayTree<E>,
    project: fn(&E) -> &T,
}

impl<'a, E, T> Projected<'a, E, T> {
    pub(crate) fn new(tree: &'a RawSplayTree<E>, project: fn(&E) -> &T) -> Self {
        Self { tree, project }
    }
}

impl<E, T> Snapshot<T> for Projected<'_, E, T> {
    fn len(&self) -> usize {
        self.tree.len()
    }

    fn visit(&self, f: &mut dyn FnMut(&T)) {
        for element in self.tree.iter() {
            f((self.project)(element));
        }
    }
}

type Listener<T> = Box<dyn FnMut(&RangeChange<T>, Contents<'_, T>)>;

/// The two listener registries of one collection.
pub(crate) struct Observers<T> {
    will_change: Vec<(ListenerHandle, Listener<T>)>,
    did_change: Vec<(ListenerHandle, Listener<T>)>,
    next_handle: u64,
}

impl<T> Observers<T> {
    pub(crate) const fn new() -> Self {
        Self {
            will_change: Vec::new(),
            did_change: Vec::new(),
            next_handle: 0,
        }
    }

    /// Returns true if any listener is registered on either channel.
    ///
    /// Callers skip building a [`RangeChange`] when this is false.
    pub(crate) fn is_observed(&self) -> bool {
        !self.will_change.is_empty() || !self.did_change.is_empty()
    }

    fn issue(&mut self) -> ListenerHandle {
        let handle = ListenerHandle(self.next_handle);
        self.next_handle += 1;
        handle
    }

    pub(crate) fn observe_will_change(&mut self, listener: Listener<T>) -> ListenerHandle {
        let handle = self.issue();
        self.will_change.push((handle, listener));
        trace!(handle = handle.0, listeners = self.will_change.len(), "registered range-will-change listener");
        handle
    }

    pub(crate) fn observe_did_change(&mut self, listener: Listener<T>) -> ListenerHandle {
        let handle = self.issue();
        self.did_change.push((handle, listener));
        trace!(handle = handle.0, listeners = self.did_change.len(), "registered range-change listener");
        handle
    }

    /// Removes the listener registered under `handle` from whichever channel
    /// holds it. Returns false if there is no such listener.
    pub(crate) fn unobserve(&mut self, handle: ListenerHandle) -> bool {
        for registry in [&mut self.will_change, &mut self.did_change] {
            if let Some(position) = registry.iter().position(|(h, _)| *h == handle) {
                drop(registry.remove(position));
                trace!(handle = handle.0, "removed listener");
                return true;
            }
        }
        false
    }

    /// Dispatches `change` to the "will change" listeners.
    pub(crate) fn will_change(&mut self, change: &RangeChange<T>, contents: Contents<'_, T>) {
        for (_, listener) in &mut self.will_change {
            listener(change, contents);
        }
    }

    /// Dispatches `change` to the "did change" listeners.
    pub(crate) fn did_change(&mut self, change: &RangeChange<T>, contents: Contents<'_, T>) {
        trace!(
            added = change.added.len(),
            removed = change.removed.len(),
            index = change.index,
            "dispatching range change"
        );
        for (_, listener) in &mut self.did_change {
            listener(change, contents);
        }
    }
}

impl<T> Default for Observers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Observers<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("will_change", &self.will_change.len())
            .field("did_change", &self.did_change.len())
            .finish()
    }
}
