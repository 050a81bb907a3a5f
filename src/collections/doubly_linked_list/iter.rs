use core::iter::FusedIterator;
use core::marker::PhantomData;

use super::node::{node_at, Slot};
use super::DoublyLinkedList;
use crate::alloc::ElementAlloc;

/// Borrowing iterator over a [`DoublyLinkedList`], front to back.
///
/// Reverse iteration is `iter().rev()`: the same chain walked through the
/// `prev` links, starting at the node before the past-last sentinel.
pub struct Iter<'a, T> {
    pub(super) slots: &'a [Slot<T>],
    pub(super) front: usize,
    pub(super) back: usize,
    pub(super) remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let node = node_at(self.slots, self.front).as_ptr();
        self.remaining -= 1;
        // SAFETY: the slot lies strictly between the sentinels, so the node is
        // live and its value initialized for as long as the list is borrowed.
        unsafe {
            self.front = (*node).next;
            Some((*node).value.assume_init_ref())
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let node = node_at(self.slots, self.back).as_ptr();
        self.remaining -= 1;
        // SAFETY: see `next`.
        unsafe {
            self.back = (*node).prev;
            Some((*node).value.assume_init_ref())
        }
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

/// Mutably borrowing iterator over a [`DoublyLinkedList`].
pub struct IterMut<'a, T> {
    pub(super) slots: &'a [Slot<T>],
    pub(super) front: usize,
    pub(super) back: usize,
    pub(super) remaining: usize,
    pub(super) _marker: PhantomData<&'a mut T>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        if self.remaining == 0 {
            return None;
        }
        let node = node_at(self.slots, self.front).as_ptr();
        self.remaining -= 1;
        // SAFETY: the list is mutably borrowed for 'a and every node is
        // yielded at most once, so the returned references never alias.
        unsafe {
            self.front = (*node).next;
            Some((*node).value.assume_init_mut())
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    fn next_back(&mut self) -> Option<&'a mut T> {
        if self.remaining == 0 {
            return None;
        }
        let node = node_at(self.slots, self.back).as_ptr();
        self.remaining -= 1;
        // SAFETY: see `next`.
        unsafe {
            self.back = (*node).prev;
            Some((*node).value.assume_init_mut())
        }
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}
impl<T> FusedIterator for IterMut<'_, T> {}

/// Consuming iterator for [`DoublyLinkedList`].
pub struct IntoIter<T, A: ElementAlloc<Value = T>> {
    pub(super) list: DoublyLinkedList<T, A>,
}

impl<T, A: ElementAlloc<Value = T>> Iterator for IntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.list.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len(), Some(self.list.len()))
    }
}

impl<T, A: ElementAlloc<Value = T>> DoubleEndedIterator for IntoIter<T, A> {
    fn next_back(&mut self) -> Option<T> {
        self.list.pop_back()
    }
}

impl<T, A: ElementAlloc<Value = T>> ExactSizeIterator for IntoIter<T, A> {}
impl<T, A: ElementAlloc<Value = T>> FusedIterator for IntoIter<T, A> {}
