//! Pool sizing knobs.
//!
//! The defaults reproduce the classic fixed-allocator growth schedule: the
//! first arena of a size class holds 32 chunks, every later arena doubles the
//! previous one, and only elements of at most 32 bytes are pooled.

use serde::{Deserialize, Serialize};

/// Chunks in the first arena of a size class.
pub const DEFAULT_INITIAL_CAPACITY: usize = 32;
/// Capacity multiplier applied on each arena growth.
pub const DEFAULT_GROWTH_FACTOR: usize = 2;
/// Largest element size (in bytes) served from a size class pool.
pub const DEFAULT_MAX_SMALL_SIZE: usize = 32;
/// Upper bound accepted for `max_small_size`; the registry keeps one slot per size.
pub const MAX_SMALL_SIZE_LIMIT: usize = 4096;

/// Configuration shared by every pool of a [`PoolRegistry`](super::PoolRegistry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Number of chunks in the first arena of each size class.
    pub initial_capacity: usize,
    /// Factor by which arena capacity grows when the current arena is full.
    pub growth_factor: usize,
    /// Element sizes up to this many bytes are routed to a pool.
    pub max_small_size: usize,
}

impl PoolConfig {
    /// Sets the first-arena capacity.
    #[must_use]
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    /// Sets the growth factor.
    #[must_use]
    pub fn with_growth_factor(mut self, growth_factor: usize) -> Self {
        self.growth_factor = growth_factor;
        self
    }

    /// Sets the small-object threshold.
    #[must_use]
    pub fn with_max_small_size(mut self, max_small_size: usize) -> Self {
        self.max_small_size = max_small_size;
        self
    }

    /// Checks the configuration for values that cannot drive a pool.
    ///
    /// # Errors
    /// Returns the first offending field as a [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_capacity == 0 {
            return Err(ConfigError::ZeroInitialCapacity);
        }
        if self.growth_factor < 2 {
            return Err(ConfigError::GrowthFactorTooSmall {
                factor: self.growth_factor,
            });
        }
        if self.max_small_size == 0 {
            return Err(ConfigError::ZeroMaxSmallSize);
        }
        if self.max_small_size > MAX_SMALL_SIZE_LIMIT {
            return Err(ConfigError::MaxSmallSizeTooLarge {
                size: self.max_small_size,
                limit: MAX_SMALL_SIZE_LIMIT,
            });
        }
        Ok(())
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            growth_factor: DEFAULT_GROWTH_FACTOR,
            max_small_size: DEFAULT_MAX_SMALL_SIZE,
        }
    }
}

/// Rejected [`PoolConfig`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// `initial_capacity` was zero.
    ZeroInitialCapacity,
    /// `growth_factor` would not grow the arenas.
    GrowthFactorTooSmall {
        /// The rejected factor.
        factor: usize,
    },
    /// `max_small_size` was zero.
    ZeroMaxSmallSize,
    /// `max_small_size` exceeds [`MAX_SMALL_SIZE_LIMIT`].
    MaxSmallSizeTooLarge {
        /// The rejected threshold.
        size: usize,
        /// The largest accepted threshold.
        limit: usize,
    },
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ZeroInitialCapacity => f.write_str("initial arena capacity must be non-zero"),
            Self::GrowthFactorTooSmall { factor } => {
                write!(f, "growth factor {factor} must be at least 2")
            }
            Self::ZeroMaxSmallSize => f.write_str("small-object threshold must be non-zero"),
            Self::MaxSmallSizeTooLarge { size, limit } => {
                write!(f, "small-object threshold {size} exceeds the limit of {limit} bytes")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
