//! Splay tree collections for Rust.
//!
//! This crate provides [`SortedSet`] and [`SortedMap`], ordered collections
//! backed by a self-adjusting binary search tree, and [`LruSet`], a
//! capacity-bounded set ordered by recency of use.
//!
//! - Every lookup splays the value it reaches to the root, so repeated access
//!   to a small working set is cheap.
//! - Every node tracks the size of its subtree, giving amortized O(log n)
//!   order statistics: [`rank_of`](SortedSet::rank_of),
//!   [`splay_index`](SortedSet::splay_index) and indexing by [`Rank`].
//! - Every structural edit is reported to registered listeners as a single
//!   [`RangeChange`], before and after it is applied.
//!
//! # Example
//!
//! ```
//! use splay_collections::{Rank, SortedSet};
//!
//! let mut set = SortedSet::from([30, 10, 20]);
//!
//! assert!(set.contains(&20));
//! assert_eq!(set.root(), Some(&20)); // the last value touched is at the root
//!
//! assert_eq!(set.rank_of(&30), Some(2));
//! assert_eq!(set[Rank(0)], 10);
//! assert_eq!(set.find_least_greater_than(&15), Some(&20));
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Explicit ordering policy** - Collections take a [`Compare`] object; [`Natural`] defers to [`Ord`]
//! - **Atomic under panics** - A panicking comparator leaves a sorted set or map exactly as it was
//! - **Iterative throughout** - Degenerate, list-shaped trees never overflow the call stack
//!
//! # Implementation
//!
//! Nodes live in an arena and are linked by handles. Splaying is top-down
//! (Sleator and Tarjan), performed in two phases: a read-only descent records
//! the comparison outcomes along the search path, then a replay of that path
//! restructures the tree without calling user code.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod error;
mod observe;
mod order_statistic;
mod policy;
mod raw;
mod tree_log;

pub mod lru_set;
pub mod sorted_map;
pub mod sorted_set;

pub use error::{Error, Result};
pub use lru_set::{Capacity, LruSet};
pub use observe::{Contents, ListenerHandle, RangeChange};
pub use order_statistic::Rank;
pub use policy::{Compare, Natural};
pub use sorted_map::SortedMap;
pub use sorted_set::SortedSet;
pub use tree_log::{Charmap, NodeLines};
