//! Errors raised by the aggregation engine.

use std::error::Error;
use std::fmt;

/// Failure of a single merge call. Both kinds are terminal for that call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    /// The entry is not a valid `a.b.c.d/n` IPv4 CIDR.
    MalformedAddress(String),
    /// Fewer than two ranges were supplied; holds the count received.
    InsufficientRanges(usize),
}

impl fmt::Display for MergeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MergeError::MalformedAddress(entry) => {
                write!(f, "Malformed IPv4 CIDR address: {entry:?}")
            }
            MergeError::InsufficientRanges(count) => {
                write!(f, "Need at least 2 ranges to merge, got {count}")
            }
        }
    }
}

impl Error for MergeError {}
