//! Memory allocation: size class pools and the allocators that route to them.
//!
//! - [`SizeClassPool`]: growable arenas of fixed-size chunks with a LIFO free list.
//! - [`PoolRegistry`]: owns one pool per chunk size, created on first use.
//! - [`TypedAllocator`]: sends single small values to the registry, the rest to the heap.
//! - [`HeapAllocator`]: plain global-heap allocator.
//! - [`ElementAlloc`]: the rebindable allocator contract containers consume.

pub mod allocator;
pub mod config;
pub mod heap;
pub mod registry;
pub mod size_class_pool;
pub mod typed;

pub use allocator::{AllocError, ElementAlloc};
pub use config::{ConfigError, PoolConfig};
pub use heap::HeapAllocator;
pub use registry::PoolRegistry;
pub use size_class_pool::{PoolStats, SizeClassPool};
pub use typed::TypedAllocator;
