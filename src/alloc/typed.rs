//! `TypedAllocator` - routes small single-value requests to the size class pools.
//!
//! A request for exactly one `T` with `size_of::<T>()` at or below the
//! registry's small-object threshold is served by the pool whose chunk size is
//! `size_of::<T>()`. Everything else (arrays, large types) goes to the global
//! heap. Deallocation applies the same predicate, so callers must pass the
//! same `n` they allocated with.

use core::marker::PhantomData;
use core::mem::{align_of, size_of};
use core::ptr::NonNull;

use crate::alloc::allocator::{AllocError, ElementAlloc};
use crate::alloc::heap;
use crate::alloc::registry::PoolRegistry;

/// A pool-routing allocator for values of `T`, borrowing a [`PoolRegistry`].
pub struct TypedAllocator<'p, T> {
    registry: &'p PoolRegistry,
    _marker: PhantomData<fn() -> T>,
}

impl<'p, T> TypedAllocator<'p, T> {
    /// Creates an allocator backed by `registry`.
    pub const fn new(registry: &'p PoolRegistry) -> Self {
        Self {
            registry,
            _marker: PhantomData,
        }
    }

    /// The registry this allocator draws pooled chunks from.
    pub fn registry(&self) -> &'p PoolRegistry {
        self.registry
    }

    /// Returns `true` if a request for `n` values is served by a pool.
    pub fn is_pooled(&self, n: usize) -> bool {
        n == 1 && size_of::<T>() != 0 && size_of::<T>() <= self.registry.max_small_size()
    }
}

impl<T> Clone for TypedAllocator<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypedAllocator<'_, T> {}

impl<T> PartialEq for TypedAllocator<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.registry, other.registry)
    }
}

impl<T> Eq for TypedAllocator<'_, T> {}

impl<T> core::fmt::Debug for TypedAllocator<'_, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TypedAllocator")
            .field("registry", &(self.registry as *const PoolRegistry))
            .field("size", &size_of::<T>())
            .finish()
    }
}

impl<'p, T> ElementAlloc for TypedAllocator<'p, T> {
    type Value = T;
    type Rebind<U> = TypedAllocator<'p, U>;

    fn rebind<U>(&self) -> TypedAllocator<'p, U> {
        TypedAllocator::new(self.registry)
    }

    fn allocate(&self, n: usize) -> Result<NonNull<T>, AllocError> {
        if n == 0 || size_of::<T>() == 0 {
            return Ok(NonNull::dangling());
        }
        if self.is_pooled(n) {
            // Chunks are aligned to the largest power of two dividing the size,
            // which is a multiple of `align_of::<T>()`.
            debug_assert_eq!(size_of::<T>() % align_of::<T>(), 0);
            return self.registry.acquire(size_of::<T>()).map(NonNull::cast);
        }
        heap::allocate_array(n)
    }

    unsafe fn deallocate(&self, ptr: NonNull<T>, n: usize) {
        if n == 0 || size_of::<T>() == 0 {
            return;
        }
        if self.is_pooled(n) {
            self.registry.release(size_of::<T>(), ptr.cast());
        } else {
            heap::deallocate_array(ptr, n);
        }
    }
}
