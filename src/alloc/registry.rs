//! `PoolRegistry` - the owner of every size class pool.
//!
//! Allocators borrow a registry instead of reaching for a process-wide
//! singleton, so the lifetime of all pooled memory is the lifetime of the
//! registry value. Pools are created lazily, one per chunk size, the first
//! time that size is requested. Dropping the registry frees every arena.
//!
//! The registry uses `RefCell` internally and is therefore neither `Sync` nor
//! safe to share across threads; give each thread its own registry.

use core::cell::RefCell;
use core::ptr::NonNull;

use crate::alloc::allocator::AllocError;
use crate::alloc::config::{ConfigError, PoolConfig};
use crate::alloc::size_class_pool::{PoolStats, SizeClassPool};

/// Lazily populated table of size class pools.
pub struct PoolRegistry {
    config: PoolConfig,
    /// Indexed by chunk size; slot 0 is never used.
    pools: RefCell<Vec<Option<SizeClassPool>>>,
}

impl PoolRegistry {
    /// Creates an empty registry with the default configuration.
    pub fn new() -> Self {
        Self::from_valid_config(PoolConfig::default())
    }

    /// Creates an empty registry with a custom configuration.
    ///
    /// # Errors
    /// Returns the [`ConfigError`] reported by [`PoolConfig::validate`].
    pub fn with_config(config: PoolConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: PoolConfig) -> Self {
        let slots = config.max_small_size + 1;
        let mut pools = Vec::with_capacity(slots);
        pools.resize_with(slots, || None);
        Self {
            config,
            pools: RefCell::new(pools),
        }
    }

    /// The configuration every pool of this registry was built with.
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Largest chunk size this registry serves.
    pub fn max_small_size(&self) -> usize {
        self.config.max_small_size
    }

    /// Acquires one `chunk_size`-byte chunk, creating its pool on first use.
    ///
    /// # Errors
    /// Returns [`AllocError::ZeroSized`] for size 0,
    /// [`AllocError::UnsupportedSize`] for sizes above the small-object
    /// threshold, or the pool's own arena allocation error.
    pub fn acquire(&self, chunk_size: usize) -> Result<NonNull<u8>, AllocError> {
        if chunk_size == 0 {
            return Err(AllocError::ZeroSized);
        }
        let mut pools = self.pools.borrow_mut();
        let slot = pools
            .get_mut(chunk_size)
            .ok_or(AllocError::UnsupportedSize {
                size: chunk_size,
                max: self.config.max_small_size,
            })?;

        if let Some(pool) = slot.as_mut() {
            return pool.acquire();
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(chunk_size, "registering size class");

        slot.insert(SizeClassPool::with_config(chunk_size, &self.config)?)
            .acquire()
    }

    /// Returns a chunk to the pool of `chunk_size`.
    ///
    /// # Safety
    /// `ptr` must have been acquired from this registry with the same
    /// `chunk_size` and must not be released twice.
    pub unsafe fn release(&self, chunk_size: usize, ptr: NonNull<u8>) {
        let mut pools = self.pools.borrow_mut();
        let pool = pools.get_mut(chunk_size).and_then(Option::as_mut);
        debug_assert!(pool.is_some(), "no {chunk_size}-byte pool owns {ptr:p}");
        if let Some(pool) = pool {
            pool.release(ptr);
        }
    }

    /// Returns `true` if `ptr` lies inside any arena of this registry.
    pub fn owns(&self, ptr: *const u8) -> bool {
        self.pools
            .borrow()
            .iter()
            .flatten()
            .any(|pool| pool.contains(ptr))
    }

    /// Returns `true` if a pool for `chunk_size` has been created.
    pub fn has_pool(&self, chunk_size: usize) -> bool {
        self.pools
            .borrow()
            .get(chunk_size)
            .is_some_and(Option::is_some)
    }

    /// Per-size-class occupancy, ordered by chunk size.
    pub fn stats(&self) -> Vec<PoolStats> {
        self.pools
            .borrow()
            .iter()
            .flatten()
            .map(SizeClassPool::stats)
            .collect()
    }

    /// Occupancy of the `chunk_size` pool, if it exists.
    pub fn stats_for(&self, chunk_size: usize) -> Option<PoolStats> {
        self.pools
            .borrow()
            .get(chunk_size)
            .and_then(|slot| slot.as_ref().map(SizeClassPool::stats))
    }
}

impl Default for PoolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for PoolRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PoolRegistry")
            .field("config", &self.config)
            .field("pools", &self.stats().len())
            .finish()
    }
}
