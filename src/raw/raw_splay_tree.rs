use alloc::vec::Vec;
use core::cmp::Ordering::{self, Equal, Greater, Less};
use core::iter::FusedIterator;

use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::Node;

/// Comparison outcomes recorded along a search path, root first.
///
/// Each entry is the ordering of the search target relative to the node
/// visited at that depth.
type Path = SmallVec<[Ordering; 32]>;

/// Nodes linked onto one side of the target during a top-down splay,
/// outermost first.
type Spine = SmallVec<[Handle; 32]>;

/// The splay tree engine backing `SortedSet`, `SortedMap` and `LruSet`.
///
/// The engine knows nothing about comparators: every search is driven by a
/// probe closure returning the ordering of the target relative to a stored
/// element. Value search, key search and rank search all reduce to that.
pub(crate) struct RawSplayTree<T> {
    /// Arena owning every node of the tree.
    nodes: Arena<Node<T>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
}

impl<T> RawSplayTree<T> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
        }
    }

    /// Returns the number of elements in the tree.
    pub(crate) fn len(&self) -> usize {
        self.size(self.root)
    }

    /// Returns true if the tree contains no elements.
    pub(crate) const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Drops every node.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    /// Returns the handle of the root node, if any.
    pub(crate) const fn root_handle(&self) -> Option<Handle> {
        self.root
    }

    /// Returns a node by handle.
    #[inline]
    pub(crate) fn node(&self, handle: Handle) -> &Node<T> {
        self.nodes.get(handle)
    }

    #[inline]
    fn node_mut(&mut self, handle: Handle) -> &mut Node<T> {
        self.nodes.get_mut(handle)
    }

    /// Returns the element stored at the root.
    pub(crate) fn root(&self) -> Option<&T> {
        self.root.map(|h| &self.node(h).value)
    }

    /// Returns the element stored at the root, mutably.
    ///
    /// Callers must not change anything the tree is ordered by.
    pub(crate) fn root_mut(&mut self) -> Option<&mut T> {
        let root = self.root?;
        Some(&mut self.node_mut(root).value)
    }

    /// Returns the rank of the root element: the size of its left subtree.
    pub(crate) fn root_rank(&self) -> Option<usize> {
        self.root.map(|h| self.size(self.node(h).left))
    }

    #[inline]
    fn size(&self, handle: Option<Handle>) -> usize {
        handle.map_or(0, |h| self.node(h).size)
    }

    /// Recomputes the subtree size of `handle` from its children.
    #[inline]
    fn repair(&mut self, handle: Handle) {
        let node = self.node(handle);
        let size = 1 + self.size(node.left) + self.size(node.right);
        self.node_mut(handle).size = size;
    }

    fn leftmost(&self, mut handle: Handle) -> Handle {
        while let Some(left) = self.node(handle).left {
            handle = left;
        }
        handle
    }

    fn rightmost(&self, mut handle: Handle) -> Handle {
        while let Some(right) = self.node(handle).right {
            handle = right;
        }
        handle
    }

    // ─── Splaying ───────────────────────────────────────────────────────────

    /// Walks the ordinary search path for the target described by `probe`
    /// without touching any link.
    ///
    /// Stops at a node the probe reports `Equal` for, or where the next child
    /// is missing. The returned path is empty only when the tree is.
    fn descend<F>(&self, mut probe: F) -> Path
    where
        F: FnMut(&T) -> Ordering,
    {
        let mut path = Path::new();
        let mut cursor = self.root;
        while let Some(handle) = cursor {
            let node = self.node(handle);
            let ordering = probe(&node.value);
            path.push(ordering);
            cursor = match ordering {
                Less => node.left,
                Greater => node.right,
                Equal => None,
            };
        }
        path
    }

    /// Walks toward the node of the given zero-based rank, recording the same
    /// outcomes a value search for that node would have produced.
    ///
    /// Returns an empty path if `rank` is out of bounds.
    fn descend_rank(&self, mut rank: usize) -> Path {
        let mut path = Path::new();
        if rank >= self.len() {
            return path;
        }
        let mut cursor = self.root;
        while let Some(handle) = cursor {
            let node = self.node(handle);
            let left = self.size(node.left);
            cursor = match rank.cmp(&left) {
                Less => {
                    path.push(Less);
                    node.left
                }
                Equal => {
                    path.push(Equal);
                    None
                }
                Greater => {
                    path.push(Greater);
                    rank -= left + 1;
                    node.right
                }
            };
        }
        path
    }

    /// Top-down splay (Sleator and Tarjan) replaying a recorded search path.
    ///
    /// The path was recorded against the current shape, so every decision is
    /// known before the first link changes and no user code runs in here. The
    /// node at the end of the path becomes the root.
    fn replay(&mut self, path: &[Ordering]) {
        let Some(mut root) = self.root else {
            return;
        };
        // Nodes known to be less than the target, each the right child of the
        // previous one once reassembled; and the mirror image.
        let mut less = Spine::new();
        let mut greater = Spine::new();
        let mut step = 0;

        loop {
            match path[step] {
                Less => {
                    let Some(mut child) = self.node(root).left else {
                        break;
                    };
                    if path[step + 1] == Less {
                        // rotate right
                        self.node_mut(root).left = self.node(child).right;
                        self.node_mut(child).right = Some(root);
                        self.repair(root);
                        root = child;
                        step += 1;
                        match self.node(root).left {
                            Some(next) => child = next,
                            None => break,
                        }
                    }
                    // link right
                    greater.push(root);
                    root = child;
                    step += 1;
                }
                Greater => {
                    let Some(mut child) = self.node(root).right else {
                        break;
                    };
                    if path[step + 1] == Greater {
                        // rotate left
                        self.node_mut(root).right = self.node(child).left;
                        self.node_mut(child).left = Some(root);
                        self.repair(root);
                        root = child;
                        step += 1;
                        match self.node(root).right {
                            Some(next) => child = next,
                            None => break,
                        }
                    }
                    // link left
                    less.push(root);
                    root = child;
                    step += 1;
                }
                Equal => break,
            }
        }

        // Reassemble. Spine nodes are repaired innermost first so that every
        // size is computed from already-correct children.
        let mut inner = self.node(root).left;
        for &handle in less.iter().rev() {
            self.node_mut(handle).right = inner;
            self.repair(handle);
            inner = Some(handle);
        }
        self.node_mut(root).left = inner;

        let mut inner = self.node(root).right;
        for &handle in greater.iter().rev() {
            self.node_mut(handle).left = inner;
            self.repair(handle);
            inner = Some(handle);
        }
        self.node_mut(root).right = inner;

        self.repair(root);
        self.root = Some(root);
    }

    /// Splays the target described by `probe` and returns the ordering of the
    /// target relative to the new root.
    ///
    /// `Equal` means the root is a match. Otherwise the root is the in-order
    /// predecessor (`Greater`) or successor (`Less`) of the target. Returns
    /// `None` for an empty tree.
    ///
    /// If `probe` panics the tree is left exactly as it was.
    pub(crate) fn splay_by<F>(&mut self, probe: F) -> Option<Ordering>
    where
        F: FnMut(&T) -> Ordering,
    {
        let path = self.descend(probe);
        let last = path.last().copied()?;
        self.replay(&path);
        Some(last)
    }

    /// Splays the element of the given rank to the root and returns it.
    pub(crate) fn splay_rank(&mut self, rank: usize) -> Option<&T> {
        let path = self.descend_rank(rank);
        if path.is_empty() {
            return None;
        }
        self.replay(&path);
        self.root()
    }

    /// Splays the least element to the root.
    pub(crate) fn splay_first(&mut self) -> Option<&T> {
        self.splay_by(|_| Less)?;
        self.root()
    }

    /// Splays the greatest element to the root.
    pub(crate) fn splay_last(&mut self) -> Option<&T> {
        self.splay_by(|_| Greater)?;
        self.root()
    }

    // ─── Structural edits ───────────────────────────────────────────────────

    /// Installs `value` as the new root.
    ///
    /// `side` must be the ordering of `value` relative to the current root
    /// as returned by the splay that preceded this call, or `None` when the
    /// tree is empty.
    pub(crate) fn attach_root(&mut self, value: T, side: Option<Ordering>) {
        let mut node = Node::new(value);
        if let Some(old) = self.root {
            match side {
                Some(Less) => {
                    //   R        N
                    //  / \  ->  / \
                    // l   r    l   R
                    //               \
                    //                r
                    node.left = self.node_mut(old).left.take();
                    node.right = Some(old);
                }
                Some(Greater) => {
                    //   R        N
                    //  / \  ->  / \
                    // l   r    R   r
                    //         /
                    //        l
                    node.right = self.node_mut(old).right.take();
                    node.left = Some(old);
                }
                _ => unreachable!("`RawSplayTree::attach_root()` - `value` matches the root"),
            }
            self.repair(old);
        }
        let handle = self.nodes.alloc(node);
        self.repair(handle);
        self.root = Some(handle);
    }

    /// Removes the root node and returns its element.
    pub(crate) fn detach_root(&mut self) -> Option<T> {
        let old = self.root?;
        let node = self.node(old);
        let (left, right) = (node.left, node.right);
        match left {
            None => self.root = right,
            Some(left) => {
                // Everything left of the old root is less than it, so splaying
                // the maximum surfaces a node with an empty right child.
                self.root = Some(left);
                self.splay_by(|_| Greater);
                if let Some(top) = self.root {
                    self.node_mut(top).right = right;
                    self.repair(top);
                }
            }
        }
        Some(self.nodes.take(old).value)
    }

    // ─── Neighbours ─────────────────────────────────────────────────────────

    fn predecessor_of_root(&self) -> Option<&T> {
        let left = self.node(self.root?).left?;
        Some(&self.node(self.rightmost(left)).value)
    }

    fn successor_of_root(&self) -> Option<&T> {
        let right = self.node(self.root?).right?;
        Some(&self.node(self.leftmost(right)).value)
    }

    /// Greatest element not greater than the target.
    pub(crate) fn greatest_at_most<F>(&mut self, probe: F) -> Option<&T>
    where
        F: FnMut(&T) -> Ordering,
    {
        match self.splay_by(probe)? {
            Equal | Greater => self.root(),
            Less => self.predecessor_of_root(),
        }
    }

    /// Greatest element strictly less than the target.
    pub(crate) fn greatest_below<F>(&mut self, probe: F) -> Option<&T>
    where
        F: FnMut(&T) -> Ordering,
    {
        match self.splay_by(probe)? {
            Greater => self.root(),
            Equal | Less => self.predecessor_of_root(),
        }
    }

    /// Least element not less than the target.
    pub(crate) fn least_at_least<F>(&mut self, probe: F) -> Option<&T>
    where
        F: FnMut(&T) -> Ordering,
    {
        match self.splay_by(probe)? {
            Equal | Less => self.root(),
            Greater => self.successor_of_root(),
        }
    }

    /// Least element strictly greater than the target.
    pub(crate) fn least_above<F>(&mut self, probe: F) -> Option<&T>
    where
        F: FnMut(&T) -> Ordering,
    {
        match self.splay_by(probe)? {
            Less => self.root(),
            Equal | Greater => self.successor_of_root(),
        }
    }

    // ─── Read-only access ───────────────────────────────────────────────────

    /// Returns the least element without restructuring.
    pub(crate) fn first(&self) -> Option<&T> {
        self.root.map(|h| &self.node(self.leftmost(h)).value)
    }

    /// Returns the greatest element without restructuring.
    pub(crate) fn last(&self) -> Option<&T> {
        self.root.map(|h| &self.node(self.rightmost(h)).value)
    }

    /// Returns the element of the given rank without restructuring.
    pub(crate) fn nth(&self, mut rank: usize) -> Option<&T> {
        let mut cursor = self.root;
        while let Some(handle) = cursor {
            let node = self.node(handle);
            let left = self.size(node.left);
            cursor = match rank.cmp(&left) {
                Less => node.left,
                Equal => return Some(&node.value),
                Greater => {
                    rank -= left + 1;
                    node.right
                }
            };
        }
        None
    }

    /// Returns an in-order iterator that leaves the shape untouched.
    pub(crate) fn iter(&self) -> Iter<'_, T> {
        let mut iter = Iter {
            tree: self,
            front: Vec::new(),
            back: Vec::new(),
            remaining: self.len(),
        };
        iter.descend_front(self.root);
        iter.descend_back(self.root);
        iter
    }

    /// Consumes the tree, returning its elements in ascending order.
    pub(crate) fn into_vec(mut self) -> Vec<T> {
        let order: Vec<Handle> = {
            let mut order = Vec::with_capacity(self.len());
            let mut stack: Vec<Handle> = Vec::new();
            let mut cursor = self.root;
            loop {
                while let Some(handle) = cursor {
                    stack.push(handle);
                    cursor = self.node(handle).left;
                }
                let Some(handle) = stack.pop() else {
                    break;
                };
                order.push(handle);
                cursor = self.node(handle).right;
            }
            order
        };
        self.root = None;
        order.into_iter().map(|h| self.nodes.take(h).value).collect()
    }
}

impl<T> Default for RawSplayTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// In-order iterator over a [`RawSplayTree`] that never restructures it.
///
/// Both ends keep an explicit stack, so a degenerate tree costs heap rather
/// than call-stack depth.
pub(crate) struct Iter<'a, T> {
    tree: &'a RawSplayTree<T>,
    front: Vec<Handle>,
    back: Vec<Handle>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    fn descend_front(&mut self, mut cursor: Option<Handle>) {
        while let Some(handle) = cursor {
            self.front.push(handle);
            cursor = self.tree.node(handle).left;
        }
    }

    fn descend_back(&mut self, mut cursor: Option<Handle>) {
        while let Some(handle) = cursor {
            self.back.push(handle);
            cursor = self.tree.node(handle).right;
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.front.pop()?;
        let node = self.tree.node(handle);
        self.descend_front(node.right);
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.back.pop()?;
        let node = self.tree.node(handle);
        self.descend_back(node.left);
        self.remaining -= 1;
        Some(&node.value)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            tree: self.tree,
            front: self.front.clone(),
            back: self.back.clone(),
            remaining: self.remaining,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
mod tests {
    extern crate std;

    use super::*;
    use alloc::collections::BTreeMap;
    use alloc::collections::BTreeSet;
    use alloc::string::String;
    use alloc::vec;
    use proptest::prelude::*;

    impl<T> RawSplayTree<T> {
        /// Recomputes every subtree size from scratch and checks it against
        /// the maintained counter, and checks that the in-order sequence is
        /// strictly ascending under `compare`. Panics on any violation.
        pub(crate) fn validate_invariants<F>(&self, mut compare: F)
        where
            F: FnMut(&T, &T) -> Ordering,
        {
            let mut errors: Vec<String> = Vec::new();

            // Pre-order puts every parent before its children, so walking it
            // backwards sees children first.
            let mut preorder: Vec<Handle> = Vec::new();
            let mut stack: Vec<Handle> = self.root.into_iter().collect();
            while let Some(handle) = stack.pop() {
                preorder.push(handle);
                let node = self.node(handle);
                stack.extend(node.left);
                stack.extend(node.right);
            }

            let mut computed: BTreeMap<usize, usize> = BTreeMap::new();
            for &handle in preorder.iter().rev() {
                let node = self.node(handle);
                let child = |h: Option<Handle>| h.map_or(0, |h| computed[&h.index()]);
                let size = 1 + child(node.left) + child(node.right);
                if size != node.size {
                    errors.push(alloc::format!(
                        "Size mismatch at handle {:?}: stored={}, computed={}",
                        handle,
                        node.size,
                        size
                    ));
                }
                computed.insert(handle.index(), size);
            }

            if preorder.len() != self.nodes.len() {
                errors.push(alloc::format!(
                    "Unreachable nodes: reachable={}, allocated={}",
                    preorder.len(),
                    self.nodes.len()
                ));
            }

            let values: Vec<&T> = self.iter().collect();
            if values.len() != preorder.len() {
                errors.push(alloc::format!("Iterator yielded {} of {} nodes", values.len(), preorder.len()));
            }
            for (i, pair) in values.windows(2).enumerate() {
                if compare(pair[0], pair[1]) != Less {
                    errors.push(alloc::format!("Order violation between ranks {} and {}", i, i + 1));
                }
            }

            assert!(errors.is_empty(), "Tree invariant violations:\n{}", errors.join("\n"));
        }

        /// Returns `(root, left child, right child)` element references.
        pub(crate) fn top(&self) -> Option<(&T, Option<&T>, Option<&T>)> {
            let node = self.node(self.root?);
            Some((
                &node.value,
                node.left.map(|h| &self.node(h).value),
                node.right.map(|h| &self.node(h).value),
            ))
        }
    }

    fn insert(tree: &mut RawSplayTree<i32>, value: i32) -> bool {
        let side = tree.splay_by(|probe| value.cmp(probe));
        if side == Some(Equal) {
            return false;
        }
        tree.attach_root(value, side);
        true
    }

    fn remove(tree: &mut RawSplayTree<i32>, value: i32) -> bool {
        if tree.splay_by(|probe| value.cmp(probe)) != Some(Equal) {
            return false;
        }
        tree.detach_root().is_some()
    }

    fn build(values: &[i32]) -> RawSplayTree<i32> {
        let mut tree = RawSplayTree::new();
        for &value in values {
            insert(&mut tree, value);
        }
        tree
    }

    #[test]
    fn empty_tree_operations() {
        let mut tree: RawSplayTree<i32> = RawSplayTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.splay_by(|probe| 1.cmp(probe)), None);
        assert_eq!(tree.splay_rank(0), None);
        assert_eq!(tree.detach_root(), None);
        assert_eq!(tree.first(), None);
        assert_eq!(tree.nth(0), None);
        assert_eq!(tree.iter().next(), None);
        tree.validate_invariants(i32::cmp);
    }

    #[test]
    fn ascending_inserts_degenerate_to_left_chain() {
        let mut tree = build(&[1, 2, 3]);
        assert_eq!(tree.top(), Some((&3, Some(&2), None)));
        assert_eq!(tree.splay_by(|probe| 2.cmp(probe)), Some(Equal));
        assert_eq!(tree.top(), Some((&2, Some(&1), Some(&3))));
        tree.validate_invariants(i32::cmp);
    }

    #[test]
    fn splaying_a_missing_value_roots_a_neighbour() {
        let mut tree = build(&[10, 20, 30, 40]);
        let side = tree.splay_by(|probe| 25.cmp(probe));
        match side {
            Some(Less) => assert_eq!(tree.root(), Some(&30)),
            Some(Greater) => assert_eq!(tree.root(), Some(&20)),
            other => panic!("unexpected splay outcome {other:?}"),
        }
        tree.validate_invariants(i32::cmp);
    }

    #[test]
    fn panicking_probe_leaves_tree_untouched() {
        let mut tree = build(&[5, 1, 9, 3, 7, 2, 8]);
        let before: Vec<i32> = tree.iter().copied().collect();
        let shape = tree.top().map(|(root, left, right)| (*root, left.copied(), right.copied()));

        let mut calls = 0;
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            tree.splay_by(|probe| {
                calls += 1;
                assert!(calls < 3, "comparator failure");
                4.cmp(probe)
            })
        }));

        assert!(outcome.is_err());
        assert_eq!(tree.iter().copied().collect::<Vec<_>>(), before);
        assert_eq!(tree.top().map(|(root, left, right)| (*root, left.copied(), right.copied())), shape);
        tree.validate_invariants(i32::cmp);
    }

    #[test]
    fn detach_root_without_left_child_promotes_right() {
        let mut tree = build(&[2, 1, 3]);
        tree.splay_by(|probe| 1.cmp(probe));
        assert_eq!(tree.detach_root(), Some(1));
        assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![2, 3]);
        tree.validate_invariants(i32::cmp);
    }

    #[test]
    fn splay_rank_roots_every_rank() {
        let mut tree = build(&[8, 3, 12, 0, 5, 14, 1, 9, 6, 11, 2, 15, 4, 13, 7, 10]);
        for rank in 0..16 {
            assert_eq!(tree.splay_rank(rank), Some(&(rank as i32)));
            assert_eq!(tree.root_rank(), Some(rank));
            tree.validate_invariants(i32::cmp);
        }
        assert_eq!(tree.splay_rank(16), None);
    }

    #[test]
    fn neighbour_queries_at_the_edges() {
        let mut tree = build(&[10, 20, 30]);
        assert_eq!(tree.greatest_at_most(|p| 5.cmp(p)), None);
        assert_eq!(tree.greatest_below(|p| 10.cmp(p)), None);
        assert_eq!(tree.least_at_least(|p| 31.cmp(p)), None);
        assert_eq!(tree.least_above(|p| 30.cmp(p)), None);
        assert_eq!(tree.greatest_at_most(|p| 25.cmp(p)), Some(&20));
        assert_eq!(tree.greatest_below(|p| 20.cmp(p)), Some(&10));
        assert_eq!(tree.least_at_least(|p| 20.cmp(p)), Some(&20));
        assert_eq!(tree.least_above(|p| 15.cmp(p)), Some(&20));
    }

    #[test]
    fn iter_meets_in_the_middle() {
        let tree = build(&[4, 2, 6, 1, 3, 5, 7]);
        let mut iter = tree.iter();
        assert_eq!(iter.len(), 7);
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.next_back(), Some(&7));
        assert_eq!(iter.next_back(), Some(&6));
        assert_eq!(iter.next(), Some(&2));
        assert_eq!(iter.len(), 3);
        let rest: Vec<i32> = iter.copied().collect();
        assert_eq!(rest, vec![3, 4, 5]);
    }

    #[test]
    fn deep_degenerate_tree_is_handled_iteratively() {
        let values: Vec<i32> = (0..20_000).collect();
        let tree = build(&values);
        assert_eq!(tree.len(), 20_000);
        assert_eq!(tree.nth(19_999), Some(&19_999));
        assert_eq!(tree.iter().rev().next(), Some(&19_999));
        assert_eq!(tree.into_vec(), values);
    }

    // Test operations enum for property testing
    #[derive(Clone, Debug)]
    enum Op {
        Insert(i32),
        Remove(i32),
        Find(i32),
        Rank(usize),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (0i32..300).prop_map(Op::Insert),
            2 => (0i32..300).prop_map(Op::Remove),
            1 => (0i32..300).prop_map(Op::Find),
            1 => (0usize..300).prop_map(Op::Rank),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn sizes_survive_every_operation(ops in prop::collection::vec(op_strategy(), 0..400)) {
            let mut tree: RawSplayTree<i32> = RawSplayTree::new();
            let mut model: BTreeSet<i32> = BTreeSet::new();

            for op in ops {
                match op {
                    Op::Insert(value) => prop_assert_eq!(insert(&mut tree, value), model.insert(value)),
                    Op::Remove(value) => prop_assert_eq!(remove(&mut tree, value), model.remove(&value)),
                    Op::Find(value) => {
                        let found = tree.splay_by(|probe| value.cmp(probe)) == Some(Equal);
                        prop_assert_eq!(found, model.contains(&value));
                    }
                    Op::Rank(rank) => {
                        prop_assert_eq!(tree.splay_rank(rank).copied(), model.iter().nth(rank).copied());
                    }
                }
                tree.validate_invariants(i32::cmp);
                prop_assert_eq!(tree.len(), model.len());
            }

            let expected: Vec<i32> = model.into_iter().collect();
            prop_assert_eq!(tree.into_vec(), expected);
        }

        #[test]
        fn nth_agrees_with_splay_rank(values in prop::collection::btree_set(any::<i16>(), 1..200)) {
            let values: Vec<i32> = values.into_iter().map(i32::from).collect();
            let mut tree = RawSplayTree::new();
            for &value in values.iter().rev() {
                let side = tree.splay_by(|probe: &i32| value.cmp(probe));
                tree.attach_root(value, side);
            }
            for (rank, value) in values.iter().enumerate() {
                prop_assert_eq!(tree.nth(rank), Some(value));
                prop_assert_eq!(tree.splay_rank(rank), Some(value));
            }
        }
    }
}
