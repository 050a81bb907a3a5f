//! `HeapAllocator` - the general-purpose heap behind the element allocator contract.
//!
//! This allocator keeps no state and delegates to `std::alloc`. It serves
//! every request the pools do not, and is the default allocator of the
//! collections in this crate.

use core::alloc::Layout;
use core::marker::PhantomData;
use core::ptr::NonNull;
use std::alloc::{alloc, dealloc};

use crate::alloc::allocator::{AllocError, ElementAlloc};

/// Allocates storage for `n` values of `T` from the global heap.
///
/// Zero-byte requests return a dangling, well-aligned pointer.
pub(crate) fn allocate_array<T>(n: usize) -> Result<NonNull<T>, AllocError> {
    let layout = Layout::array::<T>(n).map_err(|_| AllocError::CapacityOverflow)?;
    if layout.size() == 0 {
        return Ok(NonNull::dangling());
    }
    // SAFETY: the layout has a non-zero size.
    let ptr = unsafe { alloc(layout) };
    NonNull::new(ptr.cast::<T>()).ok_or_else(|| AllocError::exhausted(layout))
}

/// Frees storage obtained from [`allocate_array`].
///
/// # Safety
/// `ptr` must come from `allocate_array::<T>(n)` with the same `n`.
pub(crate) unsafe fn deallocate_array<T>(ptr: NonNull<T>, n: usize) {
    if let Ok(layout) = Layout::array::<T>(n) {
        if layout.size() != 0 {
            dealloc(ptr.as_ptr().cast::<u8>(), layout);
        }
    }
}

/// A stateless allocator over the global heap.
pub struct HeapAllocator<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> HeapAllocator<T> {
    /// Creates a heap allocator.
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Clone for HeapAllocator<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for HeapAllocator<T> {}

impl<T> Default for HeapAllocator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PartialEq for HeapAllocator<T> {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl<T> Eq for HeapAllocator<T> {}

impl<T> core::fmt::Debug for HeapAllocator<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("HeapAllocator")
    }
}

impl<T> ElementAlloc for HeapAllocator<T> {
    type Value = T;
    type Rebind<U> = HeapAllocator<U>;

    fn rebind<U>(&self) -> HeapAllocator<U> {
        HeapAllocator::new()
    }

    fn allocate(&self, n: usize) -> Result<NonNull<T>, AllocError> {
        allocate_array(n)
    }

    unsafe fn deallocate(&self, ptr: NonNull<T>, n: usize) {
        deallocate_array(ptr, n);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heap_allocator_roundtrip() {
        let heap = HeapAllocator::<u64>::new();
        let ptr = heap.allocate(4).unwrap();
        unsafe {
            for i in 0..4 {
                ptr.as_ptr().add(i).write(i as u64 * 10);
            }
            assert_eq!(*ptr.as_ptr().add(3), 30);
            heap.deallocate(ptr, 4);
        }
    }

    #[test]
    fn test_zero_sized_requests_do_not_allocate() {
        let heap = HeapAllocator::<u32>::new();
        let ptr = heap.allocate(0).unwrap();
        assert_eq!(ptr, NonNull::dangling());
        unsafe { heap.deallocate(ptr, 0) };

        let unit = HeapAllocator::<()>::new();
        let ptr = unit.allocate(10).unwrap();
        unsafe { unit.deallocate(ptr, 10) };
    }

    #[test]
    fn test_overflowing_request_is_an_error() {
        let heap = HeapAllocator::<u64>::new();
        assert_eq!(heap.allocate(usize::MAX), Err(AllocError::CapacityOverflow));
    }
}
