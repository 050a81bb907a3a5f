//! `SizeClassPool` - growable arenas of fixed-size chunks.
//!
//! A pool serves exactly one chunk size. Chunks are bump-allocated out of the
//! newest arena; when it is exhausted a new arena `growth_factor` times larger
//! is reserved and the old ones are retained. Released chunks go onto a LIFO
//! free list that is consulted before bumping, so the hottest block is handed
//! out again first.
//!
//! Arenas are only returned to the system when the pool is dropped. There is
//! no coalescing, no compaction and no per-chunk bookkeeping.

use core::alloc::Layout;
use core::ptr::NonNull;
use std::alloc::{alloc, dealloc};

use serde::Serialize;

use crate::alloc::allocator::AllocError;
use crate::alloc::config::PoolConfig;

/// One contiguous buffer of `capacity * chunk_size` bytes.
struct Arena {
    ptr: NonNull<u8>,
    layout: Layout,
}

impl Arena {
    fn new(chunk_size: usize, align: usize, capacity: usize) -> Result<Self, AllocError> {
        let size = chunk_size
            .checked_mul(capacity)
            .ok_or(AllocError::CapacityOverflow)?;
        let layout =
            Layout::from_size_align(size, align).map_err(|_| AllocError::CapacityOverflow)?;
        debug_assert!(layout.size() != 0, "arena of zero bytes");
        // SAFETY: chunk sizes are non-zero and validated configs never yield a
        // zero capacity, so `size` is non-zero.
        let ptr = unsafe { alloc(layout) };
        NonNull::new(ptr)
            .map(|ptr| Self { ptr, layout })
            .ok_or_else(|| AllocError::exhausted(layout))
    }

    /// Address of chunk `index`.
    ///
    /// # Safety
    /// `index * chunk_size` must lie inside the arena.
    unsafe fn chunk(&self, index: usize, chunk_size: usize) -> NonNull<u8> {
        NonNull::new_unchecked(self.ptr.as_ptr().add(index * chunk_size))
    }

    fn contains(&self, ptr: *const u8) -> bool {
        let start = self.ptr.as_ptr() as usize;
        let addr = ptr as usize;
        addr >= start && addr < start + self.layout.size()
    }
}

impl Drop for Arena {
    fn drop(&mut self) {
        // SAFETY: allocated in `Arena::new` with exactly this layout.
        unsafe { dealloc(self.ptr.as_ptr(), self.layout) };
    }
}

/// A snapshot of a pool's occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    /// Bytes per chunk.
    pub chunk_size: usize,
    /// Number of arenas reserved so far.
    pub arenas: usize,
    /// Chunk capacity of the newest arena.
    pub capacity: usize,
    /// Chunks handed out from the newest arena by bumping.
    pub bump_used: usize,
    /// Released chunks waiting for reuse.
    pub free_blocks: usize,
    /// Total bytes held by all arenas.
    pub reserved_bytes: usize,
}

/// A pool of fixed-size chunks backed by geometrically growing arenas.
pub struct SizeClassPool {
    chunk_size: usize,
    align: usize,
    growth_factor: usize,
    /// Capacity of the newest arena, in chunks.
    capacity: usize,
    /// Bump cursor into the newest arena, in chunks.
    size: usize,
    arenas: Vec<Arena>,
    free: Vec<NonNull<u8>>,
}

impl SizeClassPool {
    /// Creates a pool for `chunk_size`-byte chunks with the default schedule.
    ///
    /// # Errors
    /// Returns [`AllocError::ZeroSized`] for a zero chunk size,
    /// [`AllocError::InvalidConfig`] if the schedule fails
    /// [`PoolConfig::validate`], or the error of reserving the first arena.
    pub fn new(chunk_size: usize) -> Result<Self, AllocError> {
        Self::with_config(chunk_size, &PoolConfig::default())
    }

    /// Creates a pool whose first arena holds `config.initial_capacity` chunks.
    ///
    /// # Errors
    /// See [`SizeClassPool::new`].
    pub fn with_config(chunk_size: usize, config: &PoolConfig) -> Result<Self, AllocError> {
        if chunk_size == 0 {
            return Err(AllocError::ZeroSized);
        }
        config.validate()?;
        let align = natural_align(chunk_size);
        let first = Arena::new(chunk_size, align, config.initial_capacity)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            chunk_size,
            capacity = config.initial_capacity,
            "size class pool created"
        );

        Ok(Self {
            chunk_size,
            align,
            growth_factor: config.growth_factor,
            capacity: config.initial_capacity,
            size: 0,
            arenas: vec![first],
            free: Vec::new(),
        })
    }

    /// Hands out one chunk.
    ///
    /// Reuses the most recently released chunk if there is one, otherwise bumps
    /// the cursor of the newest arena, growing first if it is full.
    ///
    /// # Errors
    /// Returns an error only if a new arena cannot be reserved.
    pub fn acquire(&mut self) -> Result<NonNull<u8>, AllocError> {
        if let Some(ptr) = self.free.pop() {
            return Ok(ptr);
        }

        if self.size == self.capacity {
            self.grow()?;
        }

        // The first arena is reserved at construction, so there is always a newest one.
        let arena = &self.arenas[self.arenas.len() - 1];
        // SAFETY: `size < capacity`, so the chunk lies inside the newest arena.
        let ptr = unsafe { arena.chunk(self.size, self.chunk_size) };
        self.size += 1;
        Ok(ptr)
    }

    /// Makes a chunk available to future [`SizeClassPool::acquire`] calls.
    ///
    /// # Safety
    /// `ptr` must have been returned by `acquire` on this pool and must not be
    /// released twice. The chunk must not be used afterwards.
    pub unsafe fn release(&mut self, ptr: NonNull<u8>) {
        debug_assert!(
            self.contains(ptr.as_ptr()),
            "chunk {ptr:p} does not belong to the {}-byte pool",
            self.chunk_size
        );
        self.free.push(ptr);
    }

    fn grow(&mut self) -> Result<(), AllocError> {
        let capacity = self
            .capacity
            .checked_mul(self.growth_factor)
            .ok_or(AllocError::CapacityOverflow)?;
        let arena = Arena::new(self.chunk_size, self.align, capacity)?;
        self.arenas.push(arena);
        self.capacity = capacity;
        self.size = 0;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            chunk_size = self.chunk_size,
            capacity,
            arenas = self.arenas.len(),
            "size class pool grew"
        );

        Ok(())
    }

    /// Bytes per chunk.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Alignment of every chunk: the largest power of two dividing the chunk size.
    pub fn align(&self) -> usize {
        self.align
    }

    /// Capacity of the newest arena, in chunks.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of arenas reserved so far.
    pub fn arena_count(&self) -> usize {
        self.arenas.len()
    }

    /// Number of released chunks waiting for reuse.
    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    /// Returns `true` if `ptr` points into one of this pool's arenas.
    pub fn contains(&self, ptr: *const u8) -> bool {
        self.arenas.iter().any(|arena| arena.contains(ptr))
    }

    /// Returns a snapshot of the pool's occupancy.
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            chunk_size: self.chunk_size,
            arenas: self.arenas.len(),
            capacity: self.capacity,
            bump_used: self.size,
            free_blocks: self.free.len(),
            reserved_bytes: self.arenas.iter().map(|a| a.layout.size()).sum(),
        }
    }
}

impl Drop for SizeClassPool {
    fn drop(&mut self) {
        #[cfg(feature = "tracing")]
        tracing::trace!(
            chunk_size = self.chunk_size,
            arenas = self.arenas.len(),
            "releasing size class pool"
        );
    }
}

impl core::fmt::Debug for SizeClassPool {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SizeClassPool")
            .field("chunk_size", &self.chunk_size)
            .field("capacity", &self.capacity)
            .field("size", &self.size)
            .field("arenas", &self.arenas.len())
            .field("free", &self.free.len())
            .finish()
    }
}

/// Largest power of two dividing `size`; every type of that size is aligned to it.
const fn natural_align(size: usize) -> usize {
    1 << size.trailing_zeros()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alloc::config::ConfigError;

    #[test]
    fn test_growth_doubles_capacity() {
        let mut pool = SizeClassPool::new(16).unwrap();
        assert_eq!(pool.capacity(), 32);
        assert_eq!(pool.arena_count(), 1);

        let mut ptrs = Vec::new();
        for _ in 0..32 {
            ptrs.push(pool.acquire().unwrap());
        }
        assert_eq!(pool.arena_count(), 1);

        ptrs.push(pool.acquire().unwrap());
        assert_eq!(pool.arena_count(), 2);
        assert_eq!(pool.capacity(), 64);
        assert_eq!(pool.stats().bump_used, 1);
    }

    #[test]
    fn test_release_is_reused_lifo() {
        let mut pool = SizeClassPool::new(8).unwrap();
        let a = pool.acquire().unwrap();
        let b = pool.acquire().unwrap();

        unsafe {
            pool.release(a);
            pool.release(b);
        }
        assert_eq!(pool.free_len(), 2);
        assert_eq!(pool.acquire().unwrap(), b);
        assert_eq!(pool.acquire().unwrap(), a);
        assert_eq!(pool.free_len(), 0);
    }

    #[test]
    fn test_free_list_consulted_before_growth() {
        let mut pool = SizeClassPool::new(4).unwrap();
        let ptrs: Vec<_> = (0..32).map(|_| pool.acquire().unwrap()).collect();
        let last = ptrs[31];
        unsafe { pool.release(last) };

        assert_eq!(pool.acquire().unwrap(), last);
        assert_eq!(pool.arena_count(), 1);
    }

    #[test]
    fn test_chunks_are_distinct_and_aligned() {
        let mut pool = SizeClassPool::new(24).unwrap();
        assert_eq!(pool.align(), 8);

        let ptrs: Vec<_> = (0..40).map(|_| pool.acquire().unwrap()).collect();
        for (i, p) in ptrs.iter().enumerate() {
            assert_eq!(p.as_ptr() as usize % 8, 0);
            assert!(pool.contains(p.as_ptr()));
            for q in &ptrs[i + 1..] {
                let gap = (p.as_ptr() as usize).abs_diff(q.as_ptr() as usize);
                assert!(gap >= 24);
            }
        }
    }

    #[test]
    fn test_contains_rejects_foreign_memory() {
        let pool = SizeClassPool::new(8).unwrap();
        let boxed = Box::new(0u64);
        assert!(!pool.contains((&*boxed as *const u64).cast()));
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        assert_eq!(SizeClassPool::new(0).unwrap_err(), AllocError::ZeroSized);
    }

    #[test]
    fn test_custom_schedule() {
        let config = PoolConfig::default()
            .with_initial_capacity(2)
            .with_growth_factor(3);
        let mut pool = SizeClassPool::with_config(32, &config).unwrap();
        for _ in 0..3 {
            pool.acquire().unwrap();
        }
        let stats = pool.stats();
        assert_eq!(stats.arenas, 2);
        assert_eq!(stats.capacity, 6);
        assert_eq!(stats.reserved_bytes, (2 + 6) * 32);
    }

    #[test]
    fn test_degenerate_schedules_rejected() {
        let config = PoolConfig::default().with_initial_capacity(0);
        assert_eq!(
            SizeClassPool::with_config(8, &config).unwrap_err(),
            AllocError::InvalidConfig(ConfigError::ZeroInitialCapacity)
        );

        for factor in [0, 1] {
            let config = PoolConfig::default()
                .with_initial_capacity(1)
                .with_growth_factor(factor);
            assert_eq!(
                SizeClassPool::with_config(8, &config).unwrap_err(),
                AllocError::InvalidConfig(ConfigError::GrowthFactorTooSmall { factor })
            );
        }
    }

    #[test]
    fn test_every_chunk_lies_in_an_arena() {
        let config = PoolConfig::default()
            .with_initial_capacity(1)
            .with_growth_factor(2);
        let mut pool = SizeClassPool::with_config(8, &config).unwrap();
        for _ in 0..20 {
            let ptr = pool.acquire().unwrap();
            assert!(pool.contains(ptr.as_ptr()));
        }
        assert_eq!(pool.stats().reserved_bytes, 8 * (1 + 2 + 4 + 8 + 16));
    }
}
