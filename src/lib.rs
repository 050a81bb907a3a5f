//! # `chunkpool` - Size Class Pools and Pool-Backed Containers
//!
//! Small fixed-size allocations are served from growable arenas of equal-size
//! chunks, one arena family per chunk size. Containers reach the pools through
//! a rebindable element allocator, so a linked list of `u32` allocates its
//! *nodes* from the pool sized for `Node<u32>`.
//!
//! ## Architecture
//!
//! 1. **Size class pools** ([`SizeClassPool`]):
//!    - Arenas are never returned before the pool drops
//!    - Capacity grows geometrically (32, 64, 128, ... by default)
//!    - Released chunks are reused LIFO before any new chunk is bumped
//!
//! 2. **Pool registry** ([`PoolRegistry`]):
//!    - One lazily created pool per chunk size up to `max_small_size`
//!    - An explicit, single-threaded owner; there is no process-wide singleton
//!
//! 3. **Element allocators** ([`ElementAlloc`]):
//!    - [`TypedAllocator`] routes single small values to the registry
//!    - [`HeapAllocator`] uses the global heap for everything
//!    - Both rebind to any other element type
//!
//! 4. **Doubly linked list** ([`DoublyLinkedList`]):
//!    - Two permanent sentinel nodes bound the element chain
//!    - Positions are checked: stale or foreign handles are rejected
//!
//! ## Example
//!
//! ```rust
//! use chunkpool::{DoublyLinkedList, PoolRegistry, TypedAllocator};
//!
//! let registry = PoolRegistry::new();
//! let mut list = DoublyLinkedList::new_in(TypedAllocator::<u32>::new(&registry));
//!
//! list.push_back(1);
//! list.push_back(2);
//! list.push_front(0);
//! list.pop_front();
//!
//! let second = list.next_position(list.begin()).unwrap();
//! list.erase(second).unwrap();
//! assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1]);
//! ```
//!
//! ## Features
//!
//! - `tracing` (default): debug events on pool creation and growth

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod alloc;
pub mod collections;

pub use alloc::{
    AllocError, ConfigError, ElementAlloc, HeapAllocator, PoolConfig, PoolRegistry, PoolStats, SizeClassPool,
    TypedAllocator,
};
pub use collections::{DoublyLinkedList, ListError, Position};

// Compile-time layout checks
const _: () = {
    use core::mem;

    // Allocator handles stay pointer-sized or smaller.
    assert!(mem::size_of::<HeapAllocator<u64>>() == 0);
    assert!(mem::size_of::<TypedAllocator<'static, u64>>() == mem::size_of::<usize>());

    // A node of a word-sized element fits the default small-object limit on 64-bit targets.
    #[cfg(target_pointer_width = "64")]
    assert!(mem::size_of::<collections::Node<u32>>() <= alloc::config::DEFAULT_MAX_SMALL_SIZE);
};
