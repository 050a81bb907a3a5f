//! Errors reported for misuse of list positions.

use std::error::Error;
use std::fmt;

/// Errors returned by position-based list operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListError {
    /// The position was erased, or belongs to a different list.
    InvalidPosition,
    /// The operation needs an element but the position names a sentinel.
    SentinelPosition,
}

impl fmt::Display for ListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPosition => f.write_str("position does not name a live node of this list"),
            Self::SentinelPosition => f.write_str("position names a sentinel, not an element"),
        }
    }
}

impl Error for ListError {}
