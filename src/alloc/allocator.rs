use core::alloc::Layout;
use core::ptr::NonNull;

use crate::alloc::config::ConfigError;

/// An element-typed allocator that can be rebound to other element types.
///
/// This is the capability a container consumes: it hands out storage for `n`
/// values of [`ElementAlloc::Value`], takes it back, and can derive an
/// allocator of the same family for a different type. Containers use the
/// rebind to allocate their internal node type through the same policy that
/// was supplied for the element type.
pub trait ElementAlloc: Clone {
    /// The type of value this allocator hands out storage for.
    type Value;

    /// The same allocator family, typed for `U`.
    type Rebind<U>: ElementAlloc<Value = U>;

    /// Whether copy-assignment of a container adopts the source's allocator.
    const PROPAGATE_ON_COPY_ASSIGNMENT: bool = false;

    /// Derives an allocator for a different element type.
    fn rebind<U>(&self) -> Self::Rebind<U>;

    /// Allocates uninitialized storage for `n` values.
    ///
    /// # Errors
    /// Returns [`AllocError`] if the request size overflows or the underlying
    /// memory source is exhausted.
    fn allocate(&self, n: usize) -> Result<NonNull<Self::Value>, AllocError>;

    /// Returns storage obtained from [`ElementAlloc::allocate`].
    ///
    /// # Safety
    /// `ptr` must come from `allocate` on an allocator equal to `self`, with
    /// the same `n`, and must not have been deallocated already. Any value
    /// stored in it must already be dropped.
    unsafe fn deallocate(&self, ptr: NonNull<Self::Value>, n: usize);

    /// Picks the allocator a copy-constructed container starts with.
    fn select_on_copy_construction(&self) -> Self {
        self.clone()
    }
}

/// The error type for allocation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
    /// The byte size of the request does not fit in `isize`.
    CapacityOverflow,
    /// A pool was asked to manage zero-sized chunks.
    ZeroSized,
    /// The chunk size exceeds the registry's small-object threshold.
    UnsupportedSize {
        /// Requested chunk size in bytes.
        size: usize,
        /// Largest chunk size the registry serves.
        max: usize,
    },
    /// The pool schedule cannot drive a pool.
    InvalidConfig(ConfigError),
    /// The system allocator could not satisfy the request.
    Exhausted {
        /// Requested size in bytes.
        size: usize,
        /// Requested alignment in bytes.
        align: usize,
    },
}

impl AllocError {
    pub(crate) fn exhausted(layout: Layout) -> Self {
        Self::Exhausted {
            size: layout.size(),
            align: layout.align(),
        }
    }
}

impl core::fmt::Display for AllocError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::CapacityOverflow => f.write_str("allocation size overflows isize"),
            Self::ZeroSized => f.write_str("size class pools need a non-zero chunk size"),
            Self::UnsupportedSize { size, max } => {
                write!(f, "no size class for {size}-byte chunks (limit {max})")
            }
            Self::InvalidConfig(err) => write!(f, "invalid pool configuration: {err}"),
            Self::Exhausted { size, align } => {
                write!(f, "memory allocation of {size} bytes (align {align}) failed")
            }
        }
    }
}

impl From<ConfigError> for AllocError {
    fn from(err: ConfigError) -> Self {
        Self::InvalidConfig(err)
    }
}

impl std::error::Error for AllocError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidConfig(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_error_display() {
        let err = AllocError::exhausted(Layout::from_size_align(64, 8).unwrap());
        assert_eq!(err.to_string(), "memory allocation of 64 bytes (align 8) failed");
        assert_eq!(
            AllocError::CapacityOverflow.to_string(),
            "allocation size overflows isize"
        );
        assert_eq!(
            AllocError::UnsupportedSize { size: 40, max: 32 }.to_string(),
            "no size class for 40-byte chunks (limit 32)"
        );
        let err = AllocError::from(ConfigError::ZeroInitialCapacity);
        assert!(std::error::Error::source(&err).is_some());
    }
}
