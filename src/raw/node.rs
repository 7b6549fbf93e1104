use super::handle::Handle;

/// A binary search tree cell.
///
/// Links point strictly downward; a node is reachable from exactly one parent
/// (or is the root) and there are no back-references.
pub(crate) struct Node<T> {
    pub(crate) value: T,
    pub(crate) left: Option<Handle>,
    pub(crate) right: Option<Handle>,
    // Number of nodes in the subtree rooted here, this node included.
    pub(crate) size: usize,
}

impl<T> Node<T> {
    /// Creates a detached leaf.
    pub(crate) const fn new(value: T) -> Self {
        Self {
            value,
            left: None,
            right: None,
            size: 1,
        }
    }

    pub(crate) const fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}
