/// A zero-based rank into the sorted order of a map or set.
///
/// Indexing by `Rank` reads without splaying; use
/// [`SortedSet::splay_index`](crate::SortedSet::splay_index) to also bring
/// the value to the root.
///
/// # Examples
///
/// ```
/// use splay_collections::{Rank, SortedMap};
///
/// let mut map = SortedMap::new();
/// map.insert("a", 10);
/// map.insert("b", 20);
///
/// assert_eq!(map[Rank(0)], 10);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Rank(pub usize);
