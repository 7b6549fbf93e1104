use alloc::vec::Vec;

use super::handle::Handle;

/// Slot storage for tree nodes.
///
/// A node lives in exactly one slot from insertion until it is taken back out
/// on deletion or eviction; vacated slots are recycled by later insertions.
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    vacant: Vec<Handle>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            vacant: Vec::new(),
        }
    }

    #[cfg(test)]
    pub(crate) const fn len(&self) -> usize {
        self.slots.len().saturating_sub(self.vacant.len())
    }

    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        if let Some(h) = self.vacant.pop() {
            self.slots[h.index()] = Some(element);
            return h;
        }
        let Some(handle) = Handle::new(self.slots.len()) else {
            panic!("`Arena::alloc()` - arena is full ({} slots)", Handle::CAPACITY);
        };
        self.slots.push(Some(element));
        handle
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        self.slots[handle.index()].as_ref().expect("`Arena::get()` - `handle` is vacant!")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        self.slots[handle.index()].as_mut().expect("`Arena::get_mut()` - `handle` is vacant!")
    }

    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let element = self.slots[handle.index()].take().expect("`Arena::take()` - `handle` is vacant!");
        self.vacant.push(handle);
        element
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.vacant.clear();
    }
}
