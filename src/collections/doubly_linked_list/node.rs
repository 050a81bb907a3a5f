use core::mem::MaybeUninit;
use core::ptr::NonNull;
use std::sync::atomic::{AtomicU64, Ordering};

/// Slot of the before-first sentinel.
pub(crate) const BEFORE_FIRST: usize = 0;
/// Slot of the past-last sentinel.
pub(crate) const PAST_LAST: usize = 1;

/// A list node: one value plus links to its neighbours' slots.
///
/// Sentinel nodes leave `value` uninitialized.
pub struct Node<T> {
    pub(crate) value: MaybeUninit<T>,
    pub(crate) prev: usize,
    pub(crate) next: usize,
}

impl<T> Node<T> {
    pub(crate) fn new(value: MaybeUninit<T>, prev: usize, next: usize) -> Self {
        Self { value, prev, next }
    }
}

/// Entry of the slot table. `node` is `None` while the slot is on the free list.
pub(crate) struct Slot<T> {
    pub(crate) node: Option<NonNull<Node<T>>>,
    pub(crate) generation: u32,
}

/// Hands out list identities. Identities are never reused, so positions of a
/// dropped list cannot match a list that later gets the same memory.
pub(crate) fn next_list_id() -> u64 {
    static NEXT: AtomicU64 = AtomicU64::new(1);
    NEXT.fetch_add(1, Ordering::Relaxed)
}

/// Resolves a linked slot to its node.
///
/// # Panics
/// Panics if the slot is free, which means a link points at an erased node.
#[inline]
pub(crate) fn node_at<T>(slots: &[Slot<T>], idx: usize) -> NonNull<Node<T>> {
    match slots[idx].node {
        Some(ptr) => ptr,
        None => panic!("corrupted list: slot {idx} is linked but free"),
    }
}

/// Index of the node after `idx`.
#[inline]
pub(crate) fn next_of<T>(slots: &[Slot<T>], idx: usize) -> usize {
    // SAFETY: linked slots point at live nodes owned by the list.
    unsafe { (*node_at(slots, idx).as_ptr()).next }
}

/// Index of the node before `idx`.
#[inline]
pub(crate) fn prev_of<T>(slots: &[Slot<T>], idx: usize) -> usize {
    // SAFETY: linked slots point at live nodes owned by the list.
    unsafe { (*node_at(slots, idx).as_ptr()).prev }
}

/// A handle to one node of a [`DoublyLinkedList`](super::DoublyLinkedList),
/// element or sentinel.
///
/// Positions are plain values and do not borrow the list. Two positions are
/// equal iff they name the same node. A position goes stale when its node is
/// erased; the list reports stale positions as
/// [`ListError::InvalidPosition`](super::ListError::InvalidPosition).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub(crate) owner: u64,
    pub(crate) slot: usize,
    pub(crate) generation: u32,
}

impl Position {
    /// Returns `true` if this position names one of the two sentinels.
    pub fn is_sentinel(&self) -> bool {
        self.slot == BEFORE_FIRST || self.slot == PAST_LAST
    }
}
