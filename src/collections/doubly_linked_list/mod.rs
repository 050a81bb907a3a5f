//! `DoublyLinkedList` - a sentinel-bounded doubly linked list over a rebindable allocator.
//!
//! Every node, including the two permanent sentinels, is allocated on its own
//! through the list's allocator rebound to [`Node<T>`]. With a
//! [`TypedAllocator`](crate::alloc::TypedAllocator) this sends small nodes to
//! the size class pool matching the *node* size rather than the element size.
//!
//! Links are indices into a slot table instead of raw pointers:
//! - slot 0 is the before-first sentinel and slot 1 the past-last sentinel;
//! - real elements are exactly the nodes strictly between them;
//! - a slot freed by erase goes on a free list and its generation is bumped,
//!   so a [`Position`] kept across the erase is detected as stale.
//!
//! Insert, erase, push and pop at either end are O(1). Allocation failure is
//! fatal, as in the standard collections.

mod cursor;
mod error;
mod iter;
mod node;

pub use cursor::Cursor;
pub use error::ListError;
pub use iter::{IntoIter, Iter, IterMut};
pub use node::{Node, Position};

use core::alloc::Layout;
use core::fmt;
use core::marker::PhantomData;
use core::mem::MaybeUninit;
use core::ptr::{self, NonNull};
use std::alloc::handle_alloc_error;

use crate::alloc::{ElementAlloc, HeapAllocator};
use node::{next_list_id, next_of, node_at, prev_of, Slot, BEFORE_FIRST, PAST_LAST};

/// A doubly linked list whose nodes come from a rebindable element allocator.
pub struct DoublyLinkedList<T, A: ElementAlloc<Value = T> = HeapAllocator<T>> {
    slots: Vec<Slot<T>>,
    free_slots: Vec<usize>,
    len: usize,
    /// Identity of the current sentinel pair; tags positions with their list.
    owner: u64,
    alloc: A,
    node_alloc: A::Rebind<Node<T>>,
    _owns: PhantomData<T>,
}

impl<T> DoublyLinkedList<T> {
    /// Creates an empty list on the global heap.
    pub fn new() -> Self {
        Self::new_in(HeapAllocator::new())
    }

    /// Creates a list of `count` clones of `value` on the global heap.
    pub fn from_elem(count: usize, value: &T) -> Self
    where
        T: Clone,
    {
        Self::from_elem_in(count, value, HeapAllocator::new())
    }

    /// Creates a list of `count` default values on the global heap.
    pub fn with_len(count: usize) -> Self
    where
        T: Default,
    {
        Self::with_len_in(count, HeapAllocator::new())
    }
}

impl<T, A: ElementAlloc<Value = T>> DoublyLinkedList<T, A> {
    /// Creates an empty list that allocates its nodes through `alloc`.
    pub fn new_in(alloc: A) -> Self {
        let node_alloc = alloc.rebind::<Node<T>>();
        let mut list = Self {
            slots: Vec::with_capacity(2),
            free_slots: Vec::new(),
            len: 0,
            owner: 0,
            alloc,
            node_alloc,
            _owns: PhantomData,
        };
        list.install_sentinels();
        list
    }

    /// Creates a list of `count` clones of `value`.
    pub fn from_elem_in(count: usize, value: &T, alloc: A) -> Self
    where
        T: Clone,
    {
        let mut list = Self::new_in(alloc);
        for _ in 0..count {
            list.push_back(value.clone());
        }
        list
    }

    /// Creates a list of `count` default values.
    pub fn with_len_in(count: usize, alloc: A) -> Self
    where
        T: Default,
    {
        let mut list = Self::new_in(alloc);
        for _ in 0..count {
            list.push_back(T::default());
        }
        list
    }

    /// The element allocator this list was built with.
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Returns the number of elements in the list.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        while self.pop_back().is_some() {}
    }

    /// Pushes an element to the front of the list.
    pub fn push_front(&mut self, value: T) -> Position {
        let first = next_of(&self.slots, BEFORE_FIRST);
        let idx = self.link_before(first, value);
        self.position(idx)
    }

    /// Pushes an element to the back of the list.
    pub fn push_back(&mut self, value: T) -> Position {
        let idx = self.link_before(PAST_LAST, value);
        self.position(idx)
    }

    /// Pops an element from the front of the list.
    pub fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let first = next_of(&self.slots, BEFORE_FIRST);
        Some(self.unlink(first).0)
    }

    /// Pops an element from the back of the list.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let last = prev_of(&self.slots, PAST_LAST);
        Some(self.unlink(last).0)
    }

    /// Returns a reference to the front element.
    pub fn front(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: the list is non-empty, so the first node holds a value.
        Some(unsafe { self.value(next_of(&self.slots, BEFORE_FIRST)) })
    }

    /// Returns a reference to the back element.
    pub fn back(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: the list is non-empty, so the last node holds a value.
        Some(unsafe { self.value(prev_of(&self.slots, PAST_LAST)) })
    }

    /// Returns a mutable reference to the front element.
    pub fn front_mut(&mut self) -> Option<&mut T> {
        if self.is_empty() {
            return None;
        }
        let idx = next_of(&self.slots, BEFORE_FIRST);
        // SAFETY: as in `front`.
        Some(unsafe { self.value_mut(idx) })
    }

    /// Returns a mutable reference to the back element.
    pub fn back_mut(&mut self) -> Option<&mut T> {
        if self.is_empty() {
            return None;
        }
        let idx = prev_of(&self.slots, PAST_LAST);
        // SAFETY: as in `back`.
        Some(unsafe { self.value_mut(idx) })
    }

    /// Returns `true` if the list holds an element equal to `value`.
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.iter().any(|item| item == value)
    }

    /// Position of the first element, or [`end`](Self::end) if empty.
    pub fn begin(&self) -> Position {
        self.position(next_of(&self.slots, BEFORE_FIRST))
    }

    /// Position of the past-last sentinel.
    pub fn end(&self) -> Position {
        self.position(PAST_LAST)
    }

    /// Position of the last element, where reverse traversal starts, or
    /// [`rend`](Self::rend) if empty.
    pub fn rbegin(&self) -> Position {
        self.position(prev_of(&self.slots, PAST_LAST))
    }

    /// Position of the before-first sentinel, where reverse traversal stops.
    pub fn rend(&self) -> Position {
        self.position(BEFORE_FIRST)
    }

    /// The position after `pos`.
    ///
    /// # Errors
    /// [`ListError::InvalidPosition`] for stale or foreign positions,
    /// [`ListError::SentinelPosition`] when `pos` is the past-last sentinel.
    pub fn next_position(&self, pos: Position) -> Result<Position, ListError> {
        let idx = self.resolve(pos)?;
        if idx == PAST_LAST {
            return Err(ListError::SentinelPosition);
        }
        Ok(self.position(next_of(&self.slots, idx)))
    }

    /// The position before `pos`.
    ///
    /// # Errors
    /// [`ListError::InvalidPosition`] for stale or foreign positions,
    /// [`ListError::SentinelPosition`] when `pos` is the before-first sentinel.
    pub fn prev_position(&self, pos: Position) -> Result<Position, ListError> {
        let idx = self.resolve(pos)?;
        if idx == BEFORE_FIRST {
            return Err(ListError::SentinelPosition);
        }
        Ok(self.position(prev_of(&self.slots, idx)))
    }

    /// The element at `pos`.
    ///
    /// # Errors
    /// Fails for stale, foreign or sentinel positions.
    pub fn get(&self, pos: Position) -> Result<&T, ListError> {
        let idx = self.resolve_element(pos)?;
        // SAFETY: `resolve_element` only accepts live element nodes.
        Ok(unsafe { self.value(idx) })
    }

    /// The element at `pos`, mutably.
    ///
    /// # Errors
    /// Fails for stale, foreign or sentinel positions.
    pub fn get_mut(&mut self, pos: Position) -> Result<&mut T, ListError> {
        let idx = self.resolve_element(pos)?;
        // SAFETY: `resolve_element` only accepts live element nodes.
        Ok(unsafe { self.value_mut(idx) })
    }

    /// Inserts `value` immediately before `pos` and returns its position.
    ///
    /// Inserting before [`end`](Self::end) appends.
    ///
    /// # Errors
    /// [`ListError::InvalidPosition`] for stale or foreign positions,
    /// [`ListError::SentinelPosition`] for the before-first sentinel.
    pub fn insert(&mut self, pos: Position, value: T) -> Result<Position, ListError> {
        let idx = self.resolve(pos)?;
        if idx == BEFORE_FIRST {
            return Err(ListError::SentinelPosition);
        }
        let new = self.link_before(idx, value);
        Ok(self.position(new))
    }

    /// Erases the element at `pos` and returns the position that followed it.
    ///
    /// # Errors
    /// Fails for stale, foreign or sentinel positions; the list is unchanged.
    pub fn erase(&mut self, pos: Position) -> Result<Position, ListError> {
        self.remove(pos).map(|(_, next)| next)
    }

    /// Removes the element at `pos`, returning it with the position that followed it.
    ///
    /// # Errors
    /// Fails for stale, foreign or sentinel positions; the list is unchanged.
    pub fn remove(&mut self, pos: Position) -> Result<(T, Position), ListError> {
        let idx = self.resolve_element(pos)?;
        let (value, next) = self.unlink(idx);
        Ok((value, self.position(next)))
    }

    /// A cursor standing on `pos`.
    ///
    /// # Errors
    /// [`ListError::InvalidPosition`] for stale or foreign positions.
    pub fn cursor(&self, pos: Position) -> Result<Cursor<'_, T>, ListError> {
        let index = self.resolve(pos)?;
        Ok(Cursor {
            slots: &self.slots,
            owner: self.owner,
            index,
        })
    }

    /// A cursor standing on the first element (the past-last sentinel if empty).
    pub fn cursor_front(&self) -> Cursor<'_, T> {
        Cursor {
            slots: &self.slots,
            owner: self.owner,
            index: next_of(&self.slots, BEFORE_FIRST),
        }
    }

    /// A cursor standing on the last element (the before-first sentinel if empty).
    pub fn cursor_back(&self) -> Cursor<'_, T> {
        Cursor {
            slots: &self.slots,
            owner: self.owner,
            index: prev_of(&self.slots, PAST_LAST),
        }
    }

    /// Iterates over the list elements.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            slots: &self.slots,
            front: next_of(&self.slots, BEFORE_FIRST),
            back: prev_of(&self.slots, PAST_LAST),
            remaining: self.len,
        }
    }

    /// Iterates over the list elements mutably.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            front: next_of(&self.slots, BEFORE_FIRST),
            back: prev_of(&self.slots, PAST_LAST),
            remaining: self.len,
            slots: &self.slots,
            _marker: PhantomData,
        }
    }

    fn position(&self, idx: usize) -> Position {
        Position {
            owner: self.owner,
            slot: idx,
            generation: self.slots[idx].generation,
        }
    }

    fn resolve(&self, pos: Position) -> Result<usize, ListError> {
        if pos.owner != self.owner {
            return Err(ListError::InvalidPosition);
        }
        match self.slots.get(pos.slot) {
            Some(slot) if slot.node.is_some() && slot.generation == pos.generation => Ok(pos.slot),
            _ => Err(ListError::InvalidPosition),
        }
    }

    fn resolve_element(&self, pos: Position) -> Result<usize, ListError> {
        let idx = self.resolve(pos)?;
        if idx == BEFORE_FIRST || idx == PAST_LAST {
            return Err(ListError::SentinelPosition);
        }
        Ok(idx)
    }

    /// # Safety
    /// `idx` must be a live element slot.
    unsafe fn value(&self, idx: usize) -> &T {
        (*node_at(&self.slots, idx).as_ptr()).value.assume_init_ref()
    }

    /// # Safety
    /// `idx` must be a live element slot.
    unsafe fn value_mut(&mut self, idx: usize) -> &mut T {
        (*node_at(&self.slots, idx).as_ptr()).value.assume_init_mut()
    }

    fn allocate_node(&self, node: Node<T>) -> NonNull<Node<T>> {
        match self.node_alloc.allocate(1) {
            Ok(ptr) => {
                // SAFETY: fresh storage for exactly one node.
                unsafe { ptr.as_ptr().write(node) };
                ptr
            }
            Err(_) => handle_alloc_error(Layout::new::<Node<T>>()),
        }
    }

    fn occupy_slot(&mut self, ptr: NonNull<Node<T>>) -> usize {
        if let Some(idx) = self.free_slots.pop() {
            self.slots[idx].node = Some(ptr);
            idx
        } else {
            self.slots.push(Slot {
                node: Some(ptr),
                generation: 0,
            });
            self.slots.len() - 1
        }
    }

    /// Links a new node holding `value` in front of slot `at`.
    fn link_before(&mut self, at: usize, value: T) -> usize {
        let prev = prev_of(&self.slots, at);
        let ptr = self.allocate_node(Node::new(MaybeUninit::new(value), prev, at));
        let idx = self.occupy_slot(ptr);
        // SAFETY: `prev` and `at` are linked, live nodes.
        unsafe {
            (*node_at(&self.slots, prev).as_ptr()).next = idx;
            (*node_at(&self.slots, at).as_ptr()).prev = idx;
        }
        self.len += 1;
        idx
    }

    /// Unlinks element slot `idx`, returning its value and the slot that followed it.
    fn unlink(&mut self, idx: usize) -> (T, usize) {
        let ptr = node_at(&self.slots, idx);
        // SAFETY: `idx` is a live element node whose neighbours are linked;
        // the node is read out before its storage is returned.
        unsafe {
            let (prev, next) = ((*ptr.as_ptr()).prev, (*ptr.as_ptr()).next);
            (*node_at(&self.slots, prev).as_ptr()).next = next;
            (*node_at(&self.slots, next).as_ptr()).prev = prev;

            let node = ptr::read(ptr.as_ptr());
            self.node_alloc.deallocate(ptr, 1);

            let slot = &mut self.slots[idx];
            slot.node = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free_slots.push(idx);
            self.len -= 1;

            (node.value.assume_init(), next)
        }
    }

    /// Allocates both sentinels and links them to each other.
    fn install_sentinels(&mut self) {
        let before = self.allocate_node(Node::new(MaybeUninit::uninit(), BEFORE_FIRST, PAST_LAST));
        let past = self.allocate_node(Node::new(MaybeUninit::uninit(), BEFORE_FIRST, PAST_LAST));
        for (idx, ptr) in [(BEFORE_FIRST, before), (PAST_LAST, past)] {
            if let Some(slot) = self.slots.get_mut(idx) {
                slot.node = Some(ptr);
                slot.generation = slot.generation.wrapping_add(1);
            } else {
                self.slots.push(Slot {
                    node: Some(ptr),
                    generation: 0,
                });
            }
        }
        self.owner = next_list_id();
    }

    /// Returns both sentinels to the node allocator. The list must be empty.
    fn release_sentinels(&mut self) {
        debug_assert!(self.is_empty());
        for idx in [BEFORE_FIRST, PAST_LAST] {
            if let Some(ptr) = self.slots[idx].node.take() {
                // SAFETY: sentinels were allocated by `node_alloc` and hold no value.
                unsafe { self.node_alloc.deallocate(ptr, 1) };
            }
        }
    }
}

impl<T, A: ElementAlloc<Value = T>> Drop for DoublyLinkedList<T, A> {
    fn drop(&mut self) {
        self.clear();
        self.release_sentinels();
    }
}

impl<T: Clone, A: ElementAlloc<Value = T>> Clone for DoublyLinkedList<T, A> {
    fn clone(&self) -> Self {
        let mut list = Self::new_in(self.alloc.select_on_copy_construction());
        list.extend(self.iter().cloned());
        list
    }

    /// Copy-assignment: drops every element, adopts `source`'s allocator if
    /// `A::PROPAGATE_ON_COPY_ASSIGNMENT`, then clones `source`'s elements.
    ///
    /// When the allocator is replaced the sentinels are reallocated, so every
    /// position taken from `self` before the call is invalidated.
    fn clone_from(&mut self, source: &Self) {
        self.clear();
        if A::PROPAGATE_ON_COPY_ASSIGNMENT {
            self.release_sentinels();
            self.alloc = source.alloc.clone();
            self.node_alloc = self.alloc.rebind::<Node<T>>();
            self.install_sentinels();
        }
        self.extend(source.iter().cloned());
    }
}

impl<T, A: ElementAlloc<Value = T> + Default> Default for DoublyLinkedList<T, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T, A: ElementAlloc<Value = T>> Extend<T> for DoublyLinkedList<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push_back(item);
        }
    }
}

impl<'a, T: Copy + 'a, A: ElementAlloc<Value = T>> Extend<&'a T> for DoublyLinkedList<T, A> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T, A: ElementAlloc<Value = T> + Default> FromIterator<T> for DoublyLinkedList<T, A> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::default();
        list.extend(iter);
        list
    }
}

impl<T, A: ElementAlloc<Value = T>> IntoIterator for DoublyLinkedList<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> IntoIter<T, A> {
        IntoIter { list: self }
    }
}

impl<'a, T, A: ElementAlloc<Value = T>> IntoIterator for &'a DoublyLinkedList<T, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T, A: ElementAlloc<Value = T>> IntoIterator for &'a mut DoublyLinkedList<T, A> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}

impl<T, A, B> PartialEq<DoublyLinkedList<T, B>> for DoublyLinkedList<T, A>
where
    T: PartialEq,
    A: ElementAlloc<Value = T>,
    B: ElementAlloc<Value = T>,
{
    fn eq(&self, other: &DoublyLinkedList<T, B>) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq, A: ElementAlloc<Value = T>> Eq for DoublyLinkedList<T, A> {}

impl<T: fmt::Debug, A: ElementAlloc<Value = T>> fmt::Debug for DoublyLinkedList<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
