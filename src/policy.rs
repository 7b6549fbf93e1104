//! Ordering, equality and miss-handling policy for the collections.
//!
//! Every collection is constructed with an explicit comparator object; the
//! only process-wide default is [`Natural`], which defers to [`Ord`].

use alloc::rc::Rc;
use core::cmp::Ordering;
use core::fmt;

/// A total order over stored values.
///
/// The order must stay consistent for as long as a value is stored. A
/// comparator that panics aborts the operation in progress before the tree is
/// restructured, and the panic propagates to the caller unchanged.
///
/// Any `Fn(&T, &T) -> Ordering` closure is a comparator:
///
/// ```
/// use splay_collections::SortedSet;
///
/// let mut set = SortedSet::with_comparator(|a: &i32, b: &i32| b.cmp(a));
/// set.extend([1, 3, 2]);
/// assert_eq!(set.iter().copied().collect::<Vec<_>>(), [3, 2, 1]);
/// ```
pub trait Compare<T: ?Sized> {
    /// Compares two values.
    fn compare(&self, a: &T, b: &T) -> Ordering;

    /// Returns true if the two values are the same member.
    ///
    /// Overrides must agree with `compare(a, b) == Ordering::Equal`; the
    /// collections use this only to decide whether a search found a match.
    fn equals(&self, a: &T, b: &T) -> bool {
        self.compare(a, b) == Ordering::Equal
    }
}

/// The natural order of `T`, as given by its [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Natural;

impl<T: ?Sized + Ord> Compare<T> for Natural {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }

    #[inline]
    fn equals(&self, a: &T, b: &T) -> bool {
        a == b
    }
}

impl<T: ?Sized, F> Compare<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// Factory consulted by lookups that miss.
///
/// The default produces nothing. Clones share the same factory.
pub(crate) struct Content<K, V = K> {
    factory: Option<Rc<dyn Fn(&K) -> Option<V>>>,
}

impl<K, V> Content<K, V> {
    pub(crate) const fn none() -> Self {
        Self { factory: None }
    }

    pub(crate) fn new<F>(factory: F) -> Self
    where
        F: Fn(&K) -> Option<V> + 'static,
    {
        Self {
            factory: Some(Rc::new(factory)),
        }
    }

    /// Produces the value to report for a missing `key`.
    pub(crate) fn produce(&self, key: &K) -> Option<V> {
        self.factory.as_ref().and_then(|factory| factory(key))
    }
}

impl<K, V> Clone for Content<K, V> {
    fn clone(&self) -> Self {
        Self {
            factory: self.factory.clone(),
        }
    }
}

impl<K, V> fmt::Debug for Content<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Content").field("factory", &self.factory.is_some()).finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    struct CaseInsensitive;

    impl Compare<str> for CaseInsensitive {
        fn compare(&self, a: &str, b: &str) -> Ordering {
            a.bytes().map(|c| c.to_ascii_lowercase()).cmp(b.bytes().map(|c| c.to_ascii_lowercase()))
        }
    }

    #[test]
    fn natural_defers_to_ord() {
        assert_eq!(Natural.compare(&1, &2), Ordering::Less);
        assert!(Natural.equals("a", "a"));
        assert!(!Natural.equals(&3, &4));
    }

    #[test]
    fn closures_are_comparators() {
        let reverse = |a: &i32, b: &i32| b.cmp(a);
        assert_eq!(reverse.compare(&1, &2), Ordering::Greater);
        assert!(reverse.equals(&7, &7));
    }

    #[test]
    fn equality_follows_the_comparator() {
        assert!(CaseInsensitive.equals("Splay", "sPLAY"));
        assert!(!CaseInsensitive.equals("splay", "splat"));
    }

    #[test]
    fn content_factory_is_shared_between_clones() {
        let content: Content<u8, u16> = Content::new(|key| Some(u16::from(*key) * 2));
        let copy = content.clone();
        assert_eq!(content.produce(&4), Some(8));
        assert_eq!(copy.produce(&5), Some(10));
        assert_eq!(Content::<u8>::none().produce(&1), None);
    }
}
