use core::num::NonZero;

#[cfg(test)]
type Slot = u16;
#[cfg(not(test))]
type Slot = u32;

/// Position of a node in its arena.
///
/// The slot index is kept one past its value so that an absent child link,
/// `Option<Handle>`, is no wider than the handle itself.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub(crate) struct Handle(NonZero<Slot>);

impl Handle {
    /// Number of slots a handle can address.
    pub(crate) const CAPACITY: usize = Slot::MAX as usize;

    /// Returns the handle of slot `index`, or `None` once the arena is full.
    pub(crate) fn new(index: usize) -> Option<Self> {
        let shifted = Slot::try_from(index.checked_add(1)?).ok()?;
        NonZero::new(shifted).map(Self)
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0.get() as usize - 1
    }
}
